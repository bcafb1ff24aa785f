//! The mapper: owns the schema registry and constraint cache, and exposes
//! the graph operations over caller-supplied sessions.
//!
//! Mutations live in [`crate::mutations`], relationship traversal in
//! [`crate::relationships`].

use serde::de::DeserializeOwned;

use graphbind_core::{hydrate, MapperConfig, NodeHandle, Row, SchemaRegistry};

use crate::client::GraphError;
use crate::constraints::ConstraintCache;

/// Object-graph mapper over Neo4j sessions.
///
/// `Mapper` is `Send + Sync`; share it behind an `Arc` across tasks.
#[derive(Default)]
pub struct Mapper {
    config: MapperConfig,
    registry: SchemaRegistry,
    constraints: ConstraintCache,
}

impl Mapper {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            registry: SchemaRegistry::new(),
            constraints: ConstraintCache::new(),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn constraints(&self) -> &ConstraintCache {
        &self.constraints
    }

    /// Forget which constraints have been issued.
    pub fn reset_constraint_cache(&self) {
        tracing::debug!(cached = self.constraints.len(), "Resetting constraint cache");
        self.constraints.reset();
    }

    /// Map a node's properties onto `T`.
    pub fn unwrap_node_as<T: DeserializeOwned>(
        &self,
        node: Option<&NodeHandle>,
    ) -> Result<T, GraphError> {
        Ok(hydrate::unwrap_node_as(node)?)
    }

    /// Hydrate the single node column of the first row.
    pub fn unwrap_result_as_node<T: DeserializeOwned>(
        &self,
        rows: Vec<Row>,
    ) -> Result<T, GraphError> {
        Ok(hydrate::unwrap_result_as_node(rows)?)
    }
}
