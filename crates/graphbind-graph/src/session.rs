//! The session seam: anything that can run a statement and hand back rows.

use async_trait::async_trait;

use graphbind_core::{Properties, Row};

use crate::client::GraphError;

/// A parameterized Cypher statement and the columns it returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub text: String,
    pub parameters: Properties,
    /// `RETURN` columns, in order. Empty for statements without results.
    pub columns: Vec<String>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    pub fn returns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// Caller-owned capability for issuing statements against the graph.
///
/// Errors from `run` are propagated by the mapper unchanged.
#[async_trait]
pub trait GraphSession: Send + Sync {
    /// Run a statement and collect its rows.
    async fn run(&self, statement: Statement) -> Result<Vec<Row>, GraphError>;

    /// Whether this session is an explicit multi-statement transaction.
    /// Schema statements are not allowed inside one.
    fn is_explicit_transaction(&self) -> bool {
        false
    }
}

/// Log a statement, then run it.
pub(crate) async fn run_logged<S: GraphSession + ?Sized>(
    session: &S,
    statement: Statement,
    log_parameters: bool,
) -> Result<Vec<Row>, GraphError> {
    if log_parameters {
        let params = serde_json::Value::Object(statement.parameters.clone());
        tracing::debug!(query = %statement.text, parameters = %params, "Executing query");
    } else {
        tracing::debug!(query = %statement.text, "Executing query");
    }
    session.run(statement).await
}
