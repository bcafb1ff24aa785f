//! Configuration for the graphbind demo.

use serde::Deserialize;

use graphbind_core::MapperConfig;
use graphbind_graph::GraphConfig;

/// Top-level demo configuration.
///
/// Loaded from the `[mapper]` and `[neo4j]` sections of `graphbind.toml`,
/// overridden by `GRAPHBIND__MAPPER__*` and `GRAPHBIND__NEO4J__*`
/// environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub mapper: MapperConfig,

    #[serde(default)]
    pub neo4j: GraphConfig,
}

pub fn load(file_prefix: &str) -> anyhow::Result<DemoConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("GRAPHBIND")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    Ok(cfg.try_deserialize()?)
}
