//! Conversion between statement/row values and neo4rs Bolt types.

use neo4rs::{BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltMap, BoltNull, BoltString, BoltType};

use graphbind_core::{NodeHandle, Properties, RelationshipHandle, Row, Value};

use crate::client::GraphError;
use crate::session::Statement;

/// Build a neo4rs query with every statement parameter bound.
pub(crate) fn to_query(statement: &Statement) -> Result<neo4rs::Query, GraphError> {
    statement
        .parameters
        .iter()
        .try_fold(neo4rs::query(&statement.text), |q, (key, value)| {
            Ok(q.param(key, json_to_bolt(value)?))
        })
}

/// Bolt integers are signed 64-bit; larger unsigned values are rejected.
pub(crate) fn json_to_bolt(value: &serde_json::Value) -> Result<BoltType, GraphError> {
    Ok(match value {
        serde_json::Value::Null => BoltType::Null(BoltNull),
        serde_json::Value::Bool(b) => BoltType::Boolean(BoltBoolean::new(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                BoltType::Integer(BoltInteger::new(i))
            } else if n.is_u64() {
                return Err(GraphError::Serialization(format!(
                    "Integer {n} does not fit a Bolt integer"
                )));
            } else {
                let f = n.as_f64().ok_or_else(|| {
                    GraphError::Serialization(format!("Number {n} is not representable"))
                })?;
                BoltType::Float(BoltFloat::new(f))
            }
        }
        serde_json::Value::String(s) => BoltType::String(BoltString::new(s)),
        serde_json::Value::Array(items) => BoltType::List(BoltList {
            value: items.iter().map(json_to_bolt).collect::<Result<_, _>>()?,
        }),
        serde_json::Value::Object(map) => BoltType::Map(BoltMap {
            value: map
                .iter()
                .map(|(k, v)| Ok((BoltString::new(k), json_to_bolt(v)?)))
                .collect::<Result<_, GraphError>>()?,
        }),
    })
}

/// Read the named columns of a neo4rs row.
pub(crate) fn from_row(row: &neo4rs::Row, columns: &[String]) -> Result<Row, GraphError> {
    let mut values = Vec::with_capacity(columns.len());
    for column in columns {
        let value = if let Ok(node) = row.get::<neo4rs::Node>(column) {
            Value::Node(node_handle(&node)?)
        } else if let Ok(rel) = row.get::<neo4rs::Relation>(column) {
            Value::Relationship(relationship_handle(&rel)?)
        } else {
            let scalar: serde_json::Value = row.get(column).map_err(|e| {
                GraphError::Serialization(format!("Failed to read column {column}: {e}"))
            })?;
            Value::Scalar(scalar)
        };
        values.push((column.clone(), value));
    }
    Ok(Row::new(values))
}

fn property_error(key: &str, e: impl std::fmt::Display) -> GraphError {
    GraphError::Serialization(format!("Failed to read property {key}: {e}"))
}

fn node_handle(node: &neo4rs::Node) -> Result<NodeHandle, GraphError> {
    let mut properties = Properties::new();
    for key in node.keys() {
        let value = node
            .get::<serde_json::Value>(key)
            .map_err(|e| property_error(key, e))?;
        properties.insert(key.to_string(), value);
    }
    Ok(NodeHandle {
        id: node.id().to_string(),
        labels: node.labels().into_iter().map(str::to_string).collect(),
        properties,
    })
}

fn relationship_handle(rel: &neo4rs::Relation) -> Result<RelationshipHandle, GraphError> {
    let mut properties = Properties::new();
    for key in rel.keys() {
        let value = rel
            .get::<serde_json::Value>(key)
            .map_err(|e| property_error(key, e))?;
        properties.insert(key.to_string(), value);
    }
    Ok(RelationshipHandle {
        id: rel.id().to_string(),
        rel_type: rel.typ().to_string(),
        start_node_id: rel.start_node_id().to_string(),
        end_node_id: rel.end_node_id().to_string(),
        properties,
    })
}
