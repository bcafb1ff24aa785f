//! Model declaration surface.
//!
//! A node type implements [`NodeModel`] and describes itself through a
//! [`ModelSchema`]: optional labels, the fields that form its unique key,
//! and the fields that hold relationships. Plain properties need no
//! declaration; every serialized field that is not a relationship field is
//! written to the node.
//!
//! ```
//! use graphbind_core::{Direction, Edge, FieldDef, ModelSchema, NodeModel, RelationshipModel};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Person {
//!     name: String,
//!     #[serde(default)]
//!     friends: Vec<Edge<Person, Friendship>>,
//! }
//!
//! #[derive(Serialize, Deserialize)]
//! struct Friendship {
//!     since: i64,
//! }
//!
//! impl RelationshipModel for Friendship {
//!     const REL_TYPE: Option<&'static str> = Some("FRIENDS_WITH");
//! }
//!
//! impl NodeModel for Person {
//!     fn schema() -> ModelSchema<Self> {
//!         ModelSchema::new()
//!             .field(FieldDef::property("name").unique())
//!             .field(
//!                 FieldDef::edges("friends", |p: &mut Person| &mut p.friends)
//!                     .relationship("FRIENDS_WITH", Direction::Outgoing),
//!             )
//!     }
//! }
//! ```

use std::any::TypeId;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::hydrate;
use crate::registry::EdgeDescriptor;
use crate::value::RawEdge;

/// Last path segment of a Rust type name, without generic arguments.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// ── Relationship metadata ────────────────────────────────────────

/// Traversal orientation of a relationship relative to the reference node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Incoming,
    Outgoing,
    Undirected,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "INCOMING",
            Self::Outgoing => "OUTGOING",
            Self::Undirected => "UNDIRECTED",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "INCOMING" => Ok(Self::Incoming),
            "OUTGOING" => Ok(Self::Outgoing),
            "UNDIRECTED" => Ok(Self::Undirected),
            _ => Err(ModelError::InvalidValue(format!(
                "Invalid direction: {s}. Choose: INCOMING, OUTGOING, UNDIRECTED"
            ))),
        }
    }
}

/// How many related nodes a relationship field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    ZeroOrOne,
    ZeroOrMany,
}

/// Relationship type name plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipSchema {
    pub rel_type: String,
    pub direction: Direction,
}

impl RelationshipSchema {
    pub fn new(rel_type: impl Into<String>, direction: Direction) -> Self {
        Self {
            rel_type: rel_type.into(),
            direction,
        }
    }

    /// Take the type name from a relationship properties type.
    pub fn of<P: RelationshipModel>(direction: Direction) -> Self {
        Self::new(P::relationship_type(), direction)
    }
}

/// The single relationship declaration of a model field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipFieldDescriptor {
    pub field: &'static str,
    pub schema: RelationshipSchema,
    pub cardinality: Cardinality,
}

// ── Model traits ─────────────────────────────────────────────────

/// A type stored as a graph node.
///
/// Relationship fields are never written as properties, so they should be
/// `#[serde(default)]` to hydrate from a node that lacks them.
pub trait NodeModel: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Schema declaration. Resolved once per type by the registry.
    fn schema() -> ModelSchema<Self> {
        ModelSchema::new()
    }
}

/// A type stored as the property bag of a relationship.
pub trait RelationshipModel: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Declared relationship type name. Defaults to the type name.
    const REL_TYPE: Option<&'static str> = None;

    fn relationship_type() -> String {
        Self::REL_TYPE
            .map(str::to_string)
            .unwrap_or_else(|| short_type_name::<Self>().to_string())
    }
}

/// Relationship without properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoProperties {}

impl RelationshipModel for NoProperties {}

/// A retrieved relationship: the node on the far side and the relationship's properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<N, P> {
    pub node: N,
    pub properties: P,
}

/// A pair type usable as the element of a relationship field.
///
/// Implemented for [`Edge`]; implement it for a custom struct to get named
/// accessors or extra derives.
pub trait EdgeType: Send + Sync + Sized + 'static {
    type Node: NodeModel;
    type Properties: RelationshipModel;

    fn from_parts(node: Self::Node, properties: Self::Properties) -> Self;
}

impl<N: NodeModel, P: RelationshipModel> EdgeType for Edge<N, P> {
    type Node = N;
    type Properties = P;

    fn from_parts(node: N, properties: P) -> Self {
        Self { node, properties }
    }
}

// ── Schema declaration ───────────────────────────────────────────

/// Declared schema of a node type.
pub struct ModelSchema<M> {
    type_name: &'static str,
    labels: Option<Vec<String>>,
    fields: Vec<FieldDef<M>>,
}

impl<M: 'static> ModelSchema<M> {
    /// Start a schema named after the Rust type.
    pub fn new() -> Self {
        Self {
            type_name: short_type_name::<M>(),
            labels: None,
            fields: Vec::new(),
        }
    }

    /// Override the type name used for the default label and the constraint name.
    pub fn named(mut self, type_name: &'static str) -> Self {
        self.type_name = type_name;
        self
    }

    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn field(mut self, field: FieldDef<M>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn declared_labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    pub fn fields(&self) -> &[FieldDef<M>] {
        &self.fields
    }

    pub(crate) fn into_parts(self) -> (&'static str, Option<Vec<String>>, Vec<FieldDef<M>>) {
        (self.type_name, self.labels, self.fields)
    }
}

impl<M: 'static> Default for ModelSchema<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Declared shape of a model field.
pub enum FieldShape<M> {
    /// A single value with no element type.
    Property,
    /// A keyed collection.
    Mapping,
    /// Zero-or-one related node.
    Optional,
    /// A list without a declared edge element type.
    List,
    /// A list of typed edges.
    Edges(EdgeBinding<M>),
}

impl<M> FieldShape<M> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Mapping => "mapping",
            Self::Optional => "optional",
            Self::List => "list",
            Self::Edges(_) => "edges",
        }
    }
}

type AssignFn<M> = dyn Fn(&mut M, Vec<RawEdge>) -> Result<()> + Send + Sync;

/// Type-erased link between a list field and its edge element type.
pub struct EdgeBinding<M> {
    edge_type: TypeId,
    edge_name: &'static str,
    describe: fn() -> Result<EdgeDescriptor>,
    assign: Arc<AssignFn<M>>,
}

impl<M> EdgeBinding<M> {
    pub fn edge_type(&self) -> TypeId {
        self.edge_type
    }

    pub fn edge_name(&self) -> &'static str {
        self.edge_name
    }

    /// Validate the element edge type.
    pub fn describe(&self) -> Result<EdgeDescriptor> {
        (self.describe)()
    }

    /// Hydrate raw edges and replace the field's value.
    pub fn assign(&self, model: &mut M, raw: Vec<RawEdge>) -> Result<()> {
        (self.assign)(model, raw)
    }
}

/// One declared field of a node type.
pub struct FieldDef<M> {
    name: &'static str,
    unique: bool,
    relationships: Vec<RelationshipSchema>,
    shape: FieldShape<M>,
}

impl<M> FieldDef<M> {
    fn with_shape(name: &'static str, shape: FieldShape<M>) -> Self {
        Self {
            name,
            unique: false,
            relationships: Vec::new(),
            shape,
        }
    }

    pub fn property(name: &'static str) -> Self {
        Self::with_shape(name, FieldShape::Property)
    }

    pub fn mapping(name: &'static str) -> Self {
        Self::with_shape(name, FieldShape::Mapping)
    }

    pub fn optional(name: &'static str) -> Self {
        Self::with_shape(name, FieldShape::Optional)
    }

    pub fn list(name: &'static str) -> Self {
        Self::with_shape(name, FieldShape::List)
    }

    /// A list of edges of type `E`, reached through `accessor`.
    pub fn edges<E: EdgeType>(name: &'static str, accessor: fn(&mut M) -> &mut Vec<E>) -> Self
    where
        M: 'static,
    {
        let assign = move |model: &mut M, raw: Vec<RawEdge>| -> Result<()> {
            let edges = raw
                .iter()
                .map(hydrate::edge_from_raw::<E>)
                .collect::<Result<Vec<E>>>()?;
            *accessor(model) = edges;
            Ok(())
        };
        Self::with_shape(
            name,
            FieldShape::Edges(EdgeBinding {
                edge_type: TypeId::of::<E>(),
                edge_name: short_type_name::<E>(),
                describe: EdgeDescriptor::describe::<E>,
                assign: Arc::new(assign),
            }),
        )
    }

    /// Mark the field as part of the node's unique key.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Attach a relationship declaration.
    pub fn relationship(mut self, rel_type: impl Into<String>, direction: Direction) -> Self {
        self.relationships
            .push(RelationshipSchema::new(rel_type, direction));
        self
    }

    /// Attach a relationship declaration named after a properties type.
    pub fn relationship_of<P: RelationshipModel>(mut self, direction: Direction) -> Self {
        self.relationships.push(RelationshipSchema::of::<P>(direction));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn relationships(&self) -> &[RelationshipSchema] {
        &self.relationships
    }

    pub fn shape(&self) -> &FieldShape<M> {
        &self.shape
    }

    /// Fields with any relationship declaration are not node properties.
    pub fn is_relationship(&self) -> bool {
        !self.relationships.is_empty()
    }

    pub fn cardinality(&self) -> Cardinality {
        match self.shape {
            FieldShape::List | FieldShape::Edges(_) => Cardinality::ZeroOrMany,
            _ => Cardinality::ZeroOrOne,
        }
    }

    /// The field's single relationship declaration.
    pub fn relationship_descriptor(&self) -> Result<RelationshipFieldDescriptor> {
        match self.relationships.as_slice() {
            [schema] => Ok(RelationshipFieldDescriptor {
                field: self.name,
                schema: schema.clone(),
                cardinality: self.cardinality(),
            }),
            _ => Err(ModelError::InvalidRelationship(format!(
                "Missing or incorrect Relationship for {}",
                self.name
            ))),
        }
    }
}

impl<M> fmt::Debug for FieldDef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("unique", &self.unique)
            .field("relationships", &self.relationships)
            .field("shape", &self.shape.kind())
            .finish()
    }
}
