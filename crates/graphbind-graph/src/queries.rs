//! Cypher rendering from schema facts. Nothing here touches the network.
//!
//! Labels and key field names come from static model declarations and are
//! rendered into the text; every value is a bound parameter.

use graphbind_core::{Direction, Properties, RelationshipTypeBinding};

use crate::client::GraphError;
use crate::session::Statement;

/// Parameter holding the source node's key values.
pub const FROM_NODE_PROPS: &str = "from_node_props";
/// Parameter holding the target node's key values.
pub const TO_NODE_PROPS: &str = "to_node_props";
/// Parameter holding the relationship type name.
pub const REL_NAME: &str = "rel_name";
/// Parameter holding the relationship's properties.
pub const REL_PROPS: &str = "rel_props";
/// Parameter holding a created node's properties.
pub const PROPERTIES: &str = "properties";

/// `{k1: $alias.k1, k2: $alias.k2}`, or empty when there are no key fields.
pub fn match_clause(key_fields: &[&str], alias: &str) -> String {
    if key_fields.is_empty() {
        return String::new();
    }
    let entries: Vec<String> = key_fields
        .iter()
        .map(|field| format!("{field}: ${alias}.{field}"))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Label union: `L1&L2`.
pub fn label_expression(labels: &[String]) -> String {
    labels.join("&")
}

fn node_pattern(var: &str, labels: &[String], match_fragment: &str) -> String {
    let labels = label_expression(labels);
    if match_fragment.is_empty() {
        format!("({var}:{labels})")
    } else {
        format!("({var}:{labels} {match_fragment})")
    }
}

/// The relationship type token inside `[r:...]`.
pub fn relationship_type_token(
    binding: RelationshipTypeBinding,
    rel_type: &str,
) -> Result<String, GraphError> {
    match binding {
        RelationshipTypeBinding::Parameter => Ok(format!("$(${REL_NAME})")),
        RelationshipTypeBinding::Literal => {
            if is_valid_identifier(rel_type) {
                Ok(rel_type.to_string())
            } else {
                Err(GraphError::InvalidIdentifier(rel_type.to_string()))
            }
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `CREATE (n:L1&L2 $properties) RETURN n`
pub fn create_node_query(labels: &[String], properties: Properties) -> Statement {
    Statement::new(format!(
        "CREATE (n:{} ${PROPERTIES}) RETURN n",
        label_expression(labels)
    ))
    .param(PROPERTIES, serde_json::Value::Object(properties))
    .returns(["n"])
}

/// MATCH-MATCH-CREATE text for a new relationship from `a` to `b`.
pub fn create_relationship_query(
    source_labels: &[String],
    source_match: &str,
    target_labels: &[String],
    target_match: &str,
    rel_token: &str,
) -> String {
    format!(
        "MATCH {} WITH a MATCH {} CREATE (a)-[r:{rel_token} ${REL_PROPS}]->(b) RETURN r",
        node_pattern("a", source_labels, source_match),
        node_pattern("b", target_labels, target_match),
    )
}

/// Retrieval text returning `r, b` relative to the source node `a`.
pub fn retrieve_relationship_query(
    source_labels: &[String],
    source_match: &str,
    rel_token: &str,
    direction: Direction,
) -> String {
    let source = node_pattern("a", source_labels, source_match);
    match direction {
        Direction::Incoming => format!("MATCH (b)-[r:{rel_token}]->{source} RETURN r, b"),
        Direction::Outgoing => format!("MATCH {source}-[r:{rel_token}]->(b) RETURN r, b"),
        Direction::Undirected => format!("MATCH {source}-[r:{rel_token}]-(b) RETURN r, b"),
    }
}

/// Uniqueness constraint over the key fields, on the first label only.
pub fn constraint_query(type_name: &str, first_label: &str, unique_fields: &[&str]) -> String {
    let props: Vec<String> = unique_fields.iter().map(|f| format!("n.{f}")).collect();
    format!(
        "CREATE CONSTRAINT {type_name}_unique IF NOT EXISTS FOR (n:{first_label}) REQUIRE ({}) IS UNIQUE",
        props.join(", ")
    )
}
