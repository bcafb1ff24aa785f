//! Write operations: node and relationship creation.
//!
//! Creation uses CREATE, not MERGE. Nodes are matched for relationship
//! creation by label and key-field values only.

use graphbind_core::model::short_type_name;
use graphbind_core::registry::serialize_properties;
use graphbind_core::{
    ModelError, NoProperties, NodeHandle, NodeModel, Properties, RelationshipHandle,
    RelationshipModel, Value,
};

use crate::client::GraphError;
use crate::constraints::ensure_constraints;
use crate::mapper::Mapper;
use crate::queries::{self, FROM_NODE_PROPS, REL_NAME, REL_PROPS, TO_NODE_PROPS};
use crate::session::{run_logged, GraphSession, Statement};

impl Mapper {
    // ── Nodes ────────────────────────────────────────────────────

    /// Create a node for `model` and return it as stored.
    ///
    /// The first call for a type with key fields also issues that type's
    /// uniqueness constraint, unless `session` is an explicit transaction.
    pub async fn create_node<S, M>(&self, session: &S, model: &M) -> Result<NodeHandle, GraphError>
    where
        S: GraphSession + ?Sized,
        M: NodeModel,
    {
        let schema = self.registry().node::<M>();
        let properties = schema.property_map(model)?;
        ensure_constraints::<S, M>(
            session,
            self.registry(),
            self.constraints(),
            &schema.labels,
            self.config().log_parameters,
        )
        .await?;

        let statement = queries::create_node_query(&schema.labels, properties);
        let rows = run_logged(session, statement, self.config().log_parameters).await?;

        let mut row = rows
            .into_iter()
            .next()
            .ok_or(GraphError::NoRecord("node"))?;
        match row.take("n") {
            Some(Value::Node(node)) => {
                tracing::debug!(model = schema.type_name, id = %node.id, "Created node");
                Ok(node)
            }
            Some(other) => Err(ModelError::InvalidValue(format!(
                "Record does not contain a node: {other:?}"
            ))
            .into()),
            None => Err(GraphError::NoRecord("node")),
        }
    }

    // ── Relationships ────────────────────────────────────────────

    /// Create a relationship from `source` to `target`.
    ///
    /// The type name is `rel_type` if given, else the type declared by `P`.
    /// With neither a name nor properties this fails before any statement
    /// is issued.
    pub async fn create_relationship<S, A, B, P>(
        &self,
        session: &S,
        source: &A,
        target: &B,
        properties: Option<&P>,
        rel_type: Option<&str>,
    ) -> Result<RelationshipHandle, GraphError>
    where
        S: GraphSession + ?Sized,
        A: NodeModel,
        B: NodeModel,
        P: RelationshipModel,
    {
        let rel_name = match (rel_type, properties) {
            (Some(name), _) => name.to_string(),
            (None, Some(_)) => P::relationship_type(),
            (None, None) => return Err(GraphError::MissingRelationshipType),
        };
        let rel_token =
            queries::relationship_type_token(self.config().relationship_type_binding, &rel_name)?;
        let rel_props = match properties {
            Some(props) => serialize_properties(short_type_name::<P>(), props)?,
            None => Properties::new(),
        };

        let from = self.registry().node::<A>();
        let to = self.registry().node::<B>();
        let text = queries::create_relationship_query(
            &from.labels,
            &queries::match_clause(&from.key_fields, FROM_NODE_PROPS),
            &to.labels,
            &queries::match_clause(&to.key_fields, TO_NODE_PROPS),
            &rel_token,
        );
        let statement = Statement::new(text)
            .param(FROM_NODE_PROPS, serde_json::Value::Object(from.key_values(source)?))
            .param(TO_NODE_PROPS, serde_json::Value::Object(to.key_values(target)?))
            .param(REL_NAME, rel_name.as_str())
            .param(REL_PROPS, serde_json::Value::Object(rel_props))
            .returns(["r"]);

        let rows = run_logged(session, statement, self.config().log_parameters).await?;
        let mut row = rows
            .into_iter()
            .next()
            .ok_or(GraphError::NoRecord("relationship"))?;
        match row.take("r") {
            Some(Value::Relationship(rel)) => {
                tracing::debug!(
                    rel_type = %rel.rel_type,
                    from = from.type_name,
                    to = to.type_name,
                    "Created relationship"
                );
                Ok(rel)
            }
            Some(other) => Err(ModelError::InvalidValue(format!(
                "Record does not contain a relationship: {other:?}"
            ))
            .into()),
            None => Err(GraphError::NoRecord("relationship")),
        }
    }

    /// Create a relationship without properties.
    pub async fn create_typed_relationship<S, A, B>(
        &self,
        session: &S,
        source: &A,
        target: &B,
        rel_type: &str,
    ) -> Result<RelationshipHandle, GraphError>
    where
        S: GraphSession + ?Sized,
        A: NodeModel,
        B: NodeModel,
    {
        self.create_relationship(session, source, target, None::<&NoProperties>, Some(rel_type))
            .await
    }
}
