//! In-memory graph session for mapper tests.
//!
//! Interprets the statement shapes the mapper generates: node creation,
//! constraint creation, MATCH-MATCH-CREATE relationship creation, and the
//! three retrieval shapes. Every statement is recorded.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use graphbind_core::{NodeHandle, Properties, RelationshipHandle, Row, Value};
use graphbind_graph::{GraphError, GraphSession, Statement};

const DYNAMIC_TYPE: &str = "$($rel_name)";

#[derive(Default)]
struct State {
    nodes: Vec<NodeHandle>,
    relationships: Vec<RelationshipHandle>,
    statements: Vec<Statement>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        format!("mem:{}", self.next_id)
    }
}

#[derive(Default)]
pub struct MemoryGraph {
    state: Mutex<State>,
    explicit_transaction: bool,
    reject_constraints: AtomicBool,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that reports itself as an explicit transaction.
    pub fn transaction() -> Self {
        Self {
            explicit_transaction: true,
            ..Self::default()
        }
    }

    /// Make constraint statements fail until reset.
    pub fn reject_constraints(&self, reject: bool) {
        self.reject_constraints.store(reject, Ordering::SeqCst);
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.state.lock().unwrap().statements.clone()
    }

    pub fn statement_count(&self) -> usize {
        self.state.lock().unwrap().statements.len()
    }

    pub fn constraint_statements(&self) -> Vec<String> {
        self.statements()
            .into_iter()
            .map(|s| s.text)
            .filter(|t| t.starts_with("CREATE CONSTRAINT"))
            .collect()
    }

    pub fn node_by_id(&self, id: &str) -> Option<NodeHandle> {
        self.state
            .lock()
            .unwrap()
            .nodes
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    pub fn relationship_count(&self) -> usize {
        self.state.lock().unwrap().relationships.len()
    }
}

#[async_trait]
impl GraphSession for MemoryGraph {
    async fn run(&self, statement: Statement) -> Result<Vec<Row>, GraphError> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(statement.clone());
        let text = statement.text.as_str();

        if text.starts_with("CREATE CONSTRAINT") {
            if self.reject_constraints.load(Ordering::SeqCst) {
                return Err(GraphError::Connection("constraint rejected".to_string()));
            }
            return Ok(Vec::new());
        }
        if text.starts_with("CREATE (n:") {
            return Ok(create_node(&mut state, &statement));
        }
        if text.contains(" CREATE (a)-[r:") {
            return Ok(create_relationships(&mut state, &statement));
        }
        if text.ends_with("RETURN r, b") {
            return Ok(retrieve(&state, &statement));
        }
        Err(GraphError::Connection(format!("unsupported statement: {text}")))
    }

    fn is_explicit_transaction(&self) -> bool {
        self.explicit_transaction
    }
}

fn create_node(state: &mut State, statement: &Statement) -> Vec<Row> {
    let labels = labels_after(&statement.text, "CREATE (n:");
    let properties = param_map(statement, "properties");
    let node = NodeHandle {
        id: state.next_id(),
        labels,
        properties,
    };
    state.nodes.push(node.clone());
    vec![Row::new(vec![("n".to_string(), Value::Node(node))])]
}

fn create_relationships(state: &mut State, statement: &Statement) -> Vec<Row> {
    let text = &statement.text;
    let sources = matching(
        state,
        &labels_after(text, "MATCH (a:"),
        &param_map(statement, "from_node_props"),
    );
    let targets = matching(
        state,
        &labels_after(text, "MATCH (b:"),
        &param_map(statement, "to_node_props"),
    );
    let rel_type = rel_type(statement, " $rel_props]");
    let properties = param_map(statement, "rel_props");

    let mut rows = Vec::new();
    for a in &sources {
        for b in &targets {
            let rel = RelationshipHandle {
                id: state.next_id(),
                rel_type: rel_type.clone(),
                start_node_id: a.id.clone(),
                end_node_id: b.id.clone(),
                properties: properties.clone(),
            };
            state.relationships.push(rel.clone());
            rows.push(Row::new(vec![("r".to_string(), Value::Relationship(rel))]));
        }
    }
    rows
}

fn retrieve(state: &State, statement: &Statement) -> Vec<Row> {
    let text = &statement.text;
    let incoming = text.starts_with("MATCH (b)-[r:");
    let undirected = text.contains("]-(b)");
    let source_labels = if incoming {
        labels_after(text, "->(a:")
    } else {
        labels_after(text, "MATCH (a:")
    };
    let sources = matching(state, &source_labels, &param_map(statement, "from_node_props"));
    let rel_type = rel_type(statement, "]");

    let mut rows = Vec::new();
    for a in &sources {
        for rel in state.relationships.iter().filter(|r| r.rel_type == rel_type) {
            let other = if undirected {
                if rel.start_node_id == a.id {
                    Some(&rel.end_node_id)
                } else if rel.end_node_id == a.id {
                    Some(&rel.start_node_id)
                } else {
                    None
                }
            } else if incoming {
                (rel.end_node_id == a.id).then_some(&rel.start_node_id)
            } else {
                (rel.start_node_id == a.id).then_some(&rel.end_node_id)
            };
            let Some(other) = other else { continue };
            if let Some(b) = state.nodes.iter().find(|n| &n.id == other) {
                rows.push(Row::new(vec![
                    ("r".to_string(), Value::Relationship(rel.clone())),
                    ("b".to_string(), Value::Node(b.clone())),
                ]));
            }
        }
    }
    rows
}

/// Labels of the node pattern that starts right after `marker`.
fn labels_after(text: &str, marker: &str) -> Vec<String> {
    let Some(start) = text.find(marker) else {
        return Vec::new();
    };
    text[start + marker.len()..]
        .split([' ', ')'])
        .next()
        .unwrap_or_default()
        .split('&')
        .map(str::to_string)
        .collect()
}

/// Relationship type: the bound name, or the literal token after `[r:`.
fn rel_type(statement: &Statement, terminator: &str) -> String {
    let text = &statement.text;
    let start = text.find("[r:").map(|i| i + 3).unwrap_or_default();
    let token = text[start..].split(terminator).next().unwrap_or_default();
    if token == DYNAMIC_TYPE {
        statement.parameters["rel_name"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    } else {
        token.to_string()
    }
}

fn param_map(statement: &Statement, key: &str) -> Properties {
    statement
        .parameters
        .get(key)
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default()
}

fn matching(state: &State, labels: &[String], props: &Properties) -> Vec<NodeHandle> {
    state
        .nodes
        .iter()
        .filter(|n| labels.iter().all(|l| n.has_label(l)))
        .filter(|n| props.iter().all(|(k, v)| n.properties.get(k) == Some(v)))
        .cloned()
        .collect()
}
