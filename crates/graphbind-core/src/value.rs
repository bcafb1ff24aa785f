//! Raw graph records as returned by a session.
//!
//! These are transport-neutral: the neo4rs session converts Bolt values into
//! them, and test sessions build them directly.

use serde::{Deserialize, Serialize};

/// Property bag of a node or relationship.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A node as returned by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeHandle {
    /// Opaque database identity.
    pub id: String,
    pub labels: Vec<String>,
    pub properties: Properties,
}

impl NodeHandle {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A relationship as returned by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipHandle {
    /// Opaque database identity.
    pub id: String,
    pub rel_type: String,
    pub start_node_id: String,
    pub end_node_id: String,
    pub properties: Properties,
}

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(serde_json::Value),
    Node(NodeHandle),
    Relationship(RelationshipHandle),
}

impl Value {
    pub fn as_node(&self) -> Option<&NodeHandle> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_relationship(&self) -> Option<&RelationshipHandle> {
        match self {
            Self::Relationship(rel) => Some(rel),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<NodeHandle> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_relationship(self) -> Option<RelationshipHandle> {
        match self {
            Self::Relationship(rel) => Some(rel),
            _ => None,
        }
    }
}

/// One result row: named columns in `RETURN` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Remove and return a column by name.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let idx = self.columns.iter().position(|(key, _)| key == name)?;
        Some(self.columns.remove(idx).1)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.columns.into_iter().map(|(_, value)| value).collect()
    }
}

/// A relationship paired with the node on its far side.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEdge {
    pub relationship: RelationshipHandle,
    pub node: NodeHandle,
}
