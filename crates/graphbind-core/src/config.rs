//! Mapper configuration.
//!
//! Loaded by the embedding application (see `graphbind-demo`) from, in
//! priority order:
//! 1. Environment variables (GRAPHBIND__MAPPER__ prefix)
//! 2. Config file (`[mapper]` section of graphbind.toml)
//! 3. Defaults

use serde::Deserialize;

/// How the relationship type name reaches the query text.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipTypeBinding {
    /// Bind as the `$rel_name` parameter using dynamic type syntax: `[r:$($rel_name)]`.
    #[default]
    Parameter,
    /// Render the name into the query text. Only plain identifiers are accepted.
    Literal,
}

/// Options for a `Mapper` instance.
#[derive(Debug, Clone, Deserialize)]
pub struct MapperConfig {
    /// Relationship type binding mode (default: parameter).
    #[serde(default)]
    pub relationship_type_binding: RelationshipTypeBinding,

    /// Include statement parameters in the debug log of every statement.
    #[serde(default = "default_true")]
    pub log_parameters: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            relationship_type_binding: RelationshipTypeBinding::default(),
            log_parameters: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        assert_eq!(
            config.relationship_type_binding,
            RelationshipTypeBinding::Parameter
        );
        assert!(config.log_parameters);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: MapperConfig =
            serde_json::from_str(r#"{"relationship_type_binding": "literal"}"#).unwrap();
        assert_eq!(
            config.relationship_type_binding,
            RelationshipTypeBinding::Literal
        );
        assert!(config.log_parameters);
    }
}
