//! Neo4j connection management and the neo4rs-backed sessions.

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Txn};
use serde::Deserialize;
use tokio::sync::Mutex;

use graphbind_core::{ModelError, Row};

use crate::bolt;
use crate::session::{GraphSession, Statement};

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Failed to create {0}: no record returned")]
    NoRecord(&'static str),

    #[error("Either a relationship type or relationship properties must be provided")]
    MissingRelationshipType,

    #[error("Invalid Cypher identifier: '{0}'")]
    InvalidIdentifier(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GraphError {
    /// The schema or hydration error behind this one, if any.
    pub fn model_error(&self) -> Option<&ModelError> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "graphbind-dev".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

/// Auto-commit session over a pooled Neo4j connection.
///
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Begin an explicit transaction.
    pub async fn start_txn(&self) -> Result<TxnSession, GraphError> {
        let txn = self.graph.start_txn().await?;
        Ok(TxnSession {
            txn: Mutex::new(txn),
        })
    }
}

#[async_trait]
impl GraphSession for GraphClient {
    async fn run(&self, statement: Statement) -> Result<Vec<Row>, GraphError> {
        let mut stream = self.graph.execute(bolt::to_query(&statement)?).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(bolt::from_row(&row, &statement.columns)?);
        }
        Ok(rows)
    }
}

/// Session bound to an explicit transaction. Nothing is committed until
/// [`TxnSession::commit`].
pub struct TxnSession {
    txn: Mutex<Txn>,
}

impl TxnSession {
    pub async fn commit(self) -> Result<(), GraphError> {
        self.txn.into_inner().commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), GraphError> {
        self.txn.into_inner().rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl GraphSession for TxnSession {
    async fn run(&self, statement: Statement) -> Result<Vec<Row>, GraphError> {
        let mut txn = self.txn.lock().await;
        let mut stream = txn.execute(bolt::to_query(&statement)?).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next(txn.handle()).await? {
            rows.push(bolt::from_row(&row, &statement.columns)?);
        }
        Ok(rows)
    }

    fn is_explicit_transaction(&self) -> bool {
        true
    }
}
