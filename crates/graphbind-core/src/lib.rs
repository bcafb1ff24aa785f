//! graphbind-core: model declarations and schema facts for the graphbind mapper.
//!
//! This crate holds everything that does not touch the database:
//! - Model traits and schema builders (`NodeModel`, `RelationshipModel`, `ModelSchema`)
//! - Raw graph records (rows, node and relationship handles)
//! - The schema registry that resolves and memoizes per-type facts
//! - Hydration of records back into typed models and edges
//! - Mapper configuration and error types

pub mod config;
pub mod error;
pub mod hydrate;
pub mod model;
pub mod registry;
pub mod value;

pub use config::{MapperConfig, RelationshipTypeBinding};
pub use error::ModelError;
pub use model::{
    Cardinality, Direction, Edge, EdgeType, FieldDef, FieldShape, ModelSchema, NoProperties,
    NodeModel, RelationshipFieldDescriptor, RelationshipModel, RelationshipSchema,
};
pub use registry::{EdgeDescriptor, NodeSchema, SchemaRegistry};
pub use value::{NodeHandle, Properties, RawEdge, RelationshipHandle, Row, Value};
