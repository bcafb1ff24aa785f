//! graphbind-graph: the Neo4j side of the graphbind mapper.
//!
//! [`Mapper`] turns model declarations from `graphbind-core` into Cypher
//! statements and runs them against any [`GraphSession`]. Two sessions are
//! provided: [`GraphClient`] (auto-commit over a neo4rs connection pool) and
//! [`TxnSession`] (an explicit transaction). Uniqueness constraints are
//! issued lazily, once per model type, outside explicit transactions.

mod bolt;
pub mod client;
pub mod constraints;
pub mod mapper;
mod mutations;
pub mod queries;
mod relationships;
pub mod session;

pub use client::{GraphClient, GraphConfig, GraphError, TxnSession};
pub use constraints::ConstraintCache;
pub use mapper::Mapper;
pub use session::{GraphSession, Statement};
