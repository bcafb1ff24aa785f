//! Result hydration: graph records back into typed values.
//!
//! Property bags are deserialized with serde, so properties a type does not
//! declare are ignored and missing `#[serde(default)]` fields are filled in.

use serde::de::DeserializeOwned;

use crate::error::{ModelError, Result};
use crate::model::EdgeType;
use crate::value::{NodeHandle, Properties, RawEdge, RelationshipHandle, Row, Value};

fn from_properties<T: DeserializeOwned>(props: &Properties) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(
        props.clone(),
    ))?)
}

/// Map a node's properties onto `T`.
pub fn unwrap_node_as<T: DeserializeOwned>(node: Option<&NodeHandle>) -> Result<T> {
    let node = node.ok_or_else(|| ModelError::InvalidValue("No record to unwrap".to_string()))?;
    from_properties(&node.properties)
}

/// Map a relationship's properties onto `T`.
pub fn unwrap_relationship_as<T: DeserializeOwned>(rel: &RelationshipHandle) -> Result<T> {
    from_properties(&rel.properties)
}

/// Take the single column of the first row.
pub fn single_value(rows: Vec<Row>) -> Result<Value> {
    let total = rows.len();
    let row = rows
        .into_iter()
        .next()
        .filter(|row| !row.is_empty())
        .ok_or_else(|| ModelError::InvalidValue("Record is empty".to_string()))?;
    if total > 1 {
        tracing::warn!(rows = total, "Expected a single record, ignoring the rest");
    }
    if row.len() != 1 {
        return Err(ModelError::InvalidValue(
            "Too many nodes in record".to_string(),
        ));
    }
    row.into_values()
        .pop()
        .ok_or_else(|| ModelError::InvalidValue("Record is empty".to_string()))
}

/// Hydrate the single node of a single-row result.
pub fn unwrap_result_as_node<T: DeserializeOwned>(rows: Vec<Row>) -> Result<T> {
    match single_value(rows)? {
        Value::Node(node) => unwrap_node_as(Some(&node)),
        other => Err(ModelError::InvalidValue(format!(
            "Record does not contain a node: {other:?}"
        ))),
    }
}

/// Assemble a typed edge from a relationship and its far node.
pub fn edge_from_raw<E: EdgeType>(raw: &RawEdge) -> Result<E> {
    let properties = unwrap_relationship_as::<E::Properties>(&raw.relationship)?;
    let node = unwrap_node_as::<E::Node>(Some(&raw.node))?;
    Ok(E::from_parts(node, properties))
}
