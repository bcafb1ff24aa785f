//! Schema registry: resolved per-type schema facts, memoized for the
//! lifetime of the owning mapper.
//!
//! Entries are keyed by `TypeId` and never evicted; the number of entries is
//! bounded by the number of declared model and edge types.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{ModelError, Result};
use crate::model::{
    short_type_name, EdgeType, FieldDef, NodeModel, RelationshipFieldDescriptor,
    RelationshipModel,
};
use crate::value::Properties;

/// Resolved schema of a node type.
pub struct NodeSchema<M> {
    pub type_name: &'static str,
    /// Declared labels, or the type name. Never empty.
    pub labels: Vec<String>,
    /// Unique fields in declaration order.
    pub key_fields: Vec<&'static str>,
    pub fields: Vec<FieldDef<M>>,
}

impl<M: NodeModel> NodeSchema<M> {
    pub fn resolve() -> Self {
        let (type_name, labels, fields) = M::schema().into_parts();
        let labels = match labels {
            Some(labels) if !labels.is_empty() => labels,
            _ => vec![type_name.to_string()],
        };
        let key_fields = fields
            .iter()
            .filter(|f| f.is_unique())
            .map(FieldDef::name)
            .collect();
        Self {
            type_name,
            labels,
            key_fields,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef<M>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Serialize a model into its node property map, leaving out relationship fields.
    pub fn property_map(&self, model: &M) -> Result<Properties> {
        let mut props = self.serialize_declared(model)?;
        for field in self.fields.iter().filter(|f| f.is_relationship()) {
            props.remove(field.name());
        }
        Ok(props)
    }

    /// The key-field values of a model, keyed by field name.
    pub fn key_values(&self, model: &M) -> Result<Properties> {
        if self.key_fields.is_empty() {
            return Ok(Properties::new());
        }
        let mut props = self.serialize_declared(model)?;
        Ok(self
            .key_fields
            .iter()
            .filter_map(|key| props.remove_entry(*key))
            .collect())
    }

    /// Serialize `model`, failing if a declared field is not in the output.
    fn serialize_declared(&self, model: &M) -> Result<Properties> {
        let props = serialize_properties(self.type_name, model)?;
        if let Some(missing) = self.fields.iter().find(|f| !props.contains_key(f.name())) {
            return Err(ModelError::InvalidValue(format!(
                "{} has no field {}",
                self.type_name,
                missing.name()
            )));
        }
        Ok(props)
    }
}

/// Serialize any value that must become a property bag.
pub fn serialize_properties<T: serde::Serialize>(type_name: &str, value: &T) -> Result<Properties> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(ModelError::InvalidValue(format!(
            "{type_name} must serialize to a property map, got {other}"
        ))),
    }
}

/// Validated decomposition of an edge type into node and properties types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDescriptor {
    pub edge_name: &'static str,
    pub node_type: &'static str,
    pub node_labels: Vec<String>,
    pub properties_type: &'static str,
    pub rel_type: String,
}

impl EdgeDescriptor {
    /// Validate an edge type's node and properties types.
    pub fn describe<E: EdgeType>() -> Result<Self> {
        let edge_name = short_type_name::<E>();
        let node = NodeSchema::<E::Node>::resolve();

        let mut seen = HashSet::new();
        for field in &node.fields {
            if !seen.insert(field.name()) {
                return Err(ModelError::InvalidEdgeType(format!(
                    "\"node\" type {} of edge {edge_name} declares field {} more than once",
                    node.type_name,
                    field.name()
                )));
            }
            if field.is_unique() && field.is_relationship() {
                return Err(ModelError::InvalidEdgeType(format!(
                    "\"node\" type {} of edge {edge_name} uses relationship field {} as a key",
                    node.type_name,
                    field.name()
                )));
            }
        }

        let rel_type = <E::Properties as RelationshipModel>::relationship_type();
        if rel_type.is_empty() {
            return Err(ModelError::InvalidEdgeType(format!(
                "\"properties\" type {} of edge {edge_name} has an empty relationship type",
                short_type_name::<E::Properties>()
            )));
        }

        Ok(Self {
            edge_name,
            node_type: node.type_name,
            node_labels: node.labels,
            properties_type: short_type_name::<E::Properties>(),
            rel_type,
        })
    }
}

/// Memoized schema facts, keyed by type identity.
#[derive(Default)]
pub struct SchemaRegistry {
    nodes: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    edges: RwLock<HashMap<TypeId, EdgeDescriptor>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved schema of `M`, computed on first use.
    pub fn node<M: NodeModel>(&self) -> Arc<NodeSchema<M>> {
        let key = TypeId::of::<M>();
        let cached = self
            .nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(found) = cached.and_then(|entry| entry.downcast::<NodeSchema<M>>().ok()) {
            return found;
        }

        let built = Arc::new(NodeSchema::<M>::resolve());
        tracing::debug!(
            model = built.type_name,
            labels = ?built.labels,
            key_fields = ?built.key_fields,
            "Registered node schema"
        );
        let entry = self
            .nodes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert_with(|| built.clone() as Arc<dyn Any + Send + Sync>)
            .clone();
        entry.downcast::<NodeSchema<M>>().unwrap_or(built)
    }

    pub fn labels<M: NodeModel>(&self) -> Vec<String> {
        self.node::<M>().labels.clone()
    }

    pub fn key_fields<M: NodeModel>(&self) -> Vec<&'static str> {
        self.node::<M>().key_fields.clone()
    }

    /// The single relationship declaration on `field` of `M`.
    pub fn relationship_descriptor<M: NodeModel>(
        &self,
        field: &str,
    ) -> Result<RelationshipFieldDescriptor> {
        let schema = self.node::<M>();
        let def = schema.field(field).ok_or_else(|| {
            ModelError::InvalidValue(format!("Relation {field} does not exist"))
        })?;
        def.relationship_descriptor()
    }

    /// Validated descriptor of edge type `E`.
    pub fn edge_descriptor<E: EdgeType>(&self) -> Result<EdgeDescriptor> {
        self.edge_descriptor_with(TypeId::of::<E>(), EdgeDescriptor::describe::<E>)
    }

    /// Validated descriptor for a type-erased edge type. Only successful
    /// validations are cached.
    pub fn edge_descriptor_with(
        &self,
        key: TypeId,
        describe: impl FnOnce() -> Result<EdgeDescriptor>,
    ) -> Result<EdgeDescriptor> {
        if let Some(found) = self
            .edges
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(found.clone());
        }
        let descriptor = describe()?;
        self.edges
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert_with(|| descriptor.clone());
        Ok(descriptor)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
