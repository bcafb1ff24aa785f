//! Models for the Neo4j movies example dataset.

use serde::{Deserialize, Serialize};

use graphbind_core::{Direction, Edge, FieldDef, ModelSchema, NodeModel, RelationshipModel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub released: i64,
    pub tagline: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Edge<User, MovieReview>>,
}

impl Movie {
    pub fn key(title: &str, released: i64) -> Self {
        Self {
            title: title.to_string(),
            released,
            tagline: None,
            reviews: Vec::new(),
        }
    }
}

impl NodeModel for Movie {
    fn schema() -> ModelSchema<Self> {
        ModelSchema::new()
            .field(FieldDef::property("title").unique())
            .field(FieldDef::property("released").unique())
            .field(
                FieldDef::edges("reviews", |m: &mut Movie| &mut m.reviews)
                    .relationship_of::<MovieReview>(Direction::Incoming),
            )
    }
}

/// A `Person` node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub born: Option<i64>,
}

impl User {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            born: None,
        }
    }
}

impl NodeModel for User {
    fn schema() -> ModelSchema<Self> {
        ModelSchema::new()
            .labels(["Person"])
            .field(FieldDef::property("name").unique())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieReview {
    pub summary: String,
    pub rating: i64,
}

impl RelationshipModel for MovieReview {
    const REL_TYPE: Option<&'static str> = Some("REVIEWED");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub roles: Vec<String>,
}

impl RelationshipModel for Role {
    const REL_TYPE: Option<&'static str> = Some("ACTED_IN");
}

#[cfg(test)]
mod tests {
    use graphbind_core::SchemaRegistry;

    use super::*;

    #[test]
    fn test_movie_schema() {
        let registry = SchemaRegistry::new();
        assert_eq!(registry.labels::<Movie>(), vec!["Movie".to_string()]);
        assert_eq!(registry.key_fields::<Movie>(), vec!["title", "released"]);

        let reviews = registry.relationship_descriptor::<Movie>("reviews").unwrap();
        assert_eq!(reviews.schema.rel_type, "REVIEWED");
        assert_eq!(reviews.schema.direction, Direction::Incoming);
    }

    #[test]
    fn test_user_is_a_person() {
        let registry = SchemaRegistry::new();
        assert_eq!(registry.labels::<User>(), vec!["Person".to_string()]);
        let edge = registry.edge_descriptor::<Edge<Movie, Role>>().unwrap();
        assert_eq!(edge.rel_type, "ACTED_IN");
        assert_eq!(edge.node_labels, vec!["Movie".to_string()]);
    }
}
