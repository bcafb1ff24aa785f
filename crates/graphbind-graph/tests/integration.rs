//! Integration tests for graphbind-graph against a live Neo4j instance.
//!
//! Run with: cargo test --package graphbind-graph --test integration -- --ignored
//!
//! Skipped automatically if Neo4j is not available. Every test tags its
//! nodes with a fresh `run_id` and deletes them afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use graphbind_core::{Direction, Edge, FieldDef, ModelSchema, NodeModel, RelationshipModel};
use graphbind_graph::{GraphClient, GraphConfig, GraphSession, Mapper, Statement};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Researcher {
    name: String,
    run_id: String,
    #[serde(default)]
    collaborators: Vec<Edge<Researcher, Collaboration>>,
}

impl NodeModel for Researcher {
    fn schema() -> ModelSchema<Self> {
        ModelSchema::new()
            .labels(["Researcher", "GraphbindTest"])
            .field(FieldDef::property("name").unique())
            .field(
                FieldDef::edges("collaborators", |r: &mut Researcher| &mut r.collaborators)
                    .relationship_of::<Collaboration>(Direction::Outgoing),
            )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Collaboration {
    project: String,
    since: DateTime<Utc>,
}

impl RelationshipModel for Collaboration {
    const REL_TYPE: Option<&'static str> = Some("COLLABORATES_WITH");
}

async fn connect_or_skip() -> Option<GraphClient> {
    let config = GraphConfig::default();
    match GraphClient::connect(&config).await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test (Neo4j not available): {e}");
            None
        }
    }
}

fn unique_run() -> String {
    Uuid::new_v4().to_string()
}

fn researcher(name: &str, run_id: &str) -> Researcher {
    Researcher {
        name: format!("{name}-{run_id}"),
        run_id: run_id.to_string(),
        collaborators: Vec::new(),
    }
}

async fn cleanup(client: &GraphClient, run_id: &str) {
    let statement = Statement::new("MATCH (n {run_id: $run_id}) DETACH DELETE n")
        .param("run_id", run_id);
    let _ = client.run(statement).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_create_node_and_read_back() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let run_id = unique_run();
    let mapper = Mapper::default();

    let ada = researcher("Ada", &run_id);
    let node = mapper.create_node(&client, &ada).await.unwrap();
    assert!(node.has_label("Researcher") && node.has_label("GraphbindTest"));

    let restored: Researcher = mapper.unwrap_node_as(Some(&node)).unwrap();
    assert_eq!(restored, ada);

    cleanup(&client, &run_id).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_constraint_and_duplicate_key() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let run_id = unique_run();
    let mapper = Mapper::default();

    let grace = researcher("Grace", &run_id);
    mapper.create_node(&client, &grace).await.unwrap();
    assert!(mapper.constraints().contains::<Researcher>());

    // The uniqueness constraint rejects a second node with the same key.
    assert!(mapper.create_node(&client, &grace).await.is_err());

    cleanup(&client, &run_id).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_relationship_round_trip() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let run_id = unique_run();
    let mapper = Mapper::default();

    let alice = researcher("Alice", &run_id);
    let bob = researcher("Bob", &run_id);
    let alice_node = mapper.create_node(&client, &alice).await.unwrap();
    let bob_node = mapper.create_node(&client, &bob).await.unwrap();

    let collab = Collaboration {
        project: "graphbind".to_string(),
        since: Utc::now(),
    };
    let rel = mapper
        .create_relationship(&client, &alice, &bob, Some(&collab), None)
        .await
        .unwrap();
    assert_eq!(rel.rel_type, "COLLABORATES_WITH");
    assert_eq!(rel.start_node_id, alice_node.id);
    assert_eq!(rel.end_node_id, bob_node.id);

    let mut refreshed = alice.clone();
    mapper
        .refresh_relationship(&client, &mut refreshed, "collaborators")
        .await
        .unwrap();
    assert_eq!(refreshed.collaborators.len(), 1);
    assert_eq!(refreshed.collaborators[0].node.name, bob.name);
    assert_eq!(refreshed.collaborators[0].properties.project, "graphbind");

    let incoming: Vec<Edge<Researcher, Collaboration>> = mapper
        .retrieve_relationship_edges(&client, &bob, "COLLABORATES_WITH", Direction::Incoming)
        .await
        .unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].node.name, alice.name);

    cleanup(&client, &run_id).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_transaction_skips_constraints() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let run_id = unique_run();
    let mapper = Mapper::default();

    let txn = client.start_txn().await.unwrap();
    assert!(txn.is_explicit_transaction());
    mapper
        .create_node(&txn, &researcher("Edsger", &run_id))
        .await
        .unwrap();
    assert!(!mapper.constraints().contains::<Researcher>());
    txn.rollback().await.unwrap();

    cleanup(&client, &run_id).await;
}
