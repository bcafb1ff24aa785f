//! Relationship traversal: typed edge retrieval and in-place refresh of
//! relationship fields.

use graphbind_core::{
    hydrate, Direction, EdgeType, FieldShape, ModelError, NodeModel, RawEdge, Value,
};

use crate::client::GraphError;
use crate::mapper::Mapper;
use crate::queries::{self, FROM_NODE_PROPS, REL_NAME};
use crate::session::{run_logged, GraphSession, Statement};

impl Mapper {
    /// Fetch every edge of type `rel_name` touching `source` in `direction`,
    /// hydrated as `E`. Rows come back in session order.
    pub async fn retrieve_relationship_edges<S, M, E>(
        &self,
        session: &S,
        source: &M,
        rel_name: &str,
        direction: Direction,
    ) -> Result<Vec<E>, GraphError>
    where
        S: GraphSession + ?Sized,
        M: NodeModel,
        E: EdgeType,
    {
        self.registry().edge_descriptor::<E>()?;
        let raw = self.fetch_edges(session, source, rel_name, direction).await?;
        let edges = raw
            .iter()
            .map(hydrate::edge_from_raw::<E>)
            .collect::<Result<Vec<E>, ModelError>>()?;
        Ok(edges)
    }

    /// Re-read the relationship field `field` of `model` from the graph and
    /// replace its value.
    ///
    /// The field must be a list of edges carrying exactly one relationship
    /// declaration.
    pub async fn refresh_relationship<S, M>(
        &self,
        session: &S,
        model: &mut M,
        field: &str,
    ) -> Result<(), GraphError>
    where
        S: GraphSession + ?Sized,
        M: NodeModel,
    {
        let schema = self.registry().node::<M>();
        let def = schema.field(field).ok_or_else(|| {
            ModelError::InvalidValue(format!("Relation {field} does not exist"))
        })?;
        let binding = match def.shape() {
            FieldShape::Edges(binding) => binding,
            FieldShape::Property | FieldShape::List => {
                return Err(ModelError::InvalidRelationship(format!(
                    "Missing or incorrect generic type for {field}"
                ))
                .into())
            }
            FieldShape::Mapping | FieldShape::Optional => {
                return Err(ModelError::InvalidRelationship(format!(
                    "Relation {field} is not a sequence"
                ))
                .into())
            }
        };
        let descriptor = def.relationship_descriptor()?;
        self.registry()
            .edge_descriptor_with(binding.edge_type(), || binding.describe())?;

        let raw = self
            .fetch_edges(
                session,
                &*model,
                &descriptor.schema.rel_type,
                descriptor.schema.direction,
            )
            .await?;
        let count = raw.len();
        binding.assign(model, raw)?;
        tracing::debug!(
            model = schema.type_name,
            field,
            edge = binding.edge_name(),
            count,
            "Refreshed relationship"
        );
        Ok(())
    }

    async fn fetch_edges<S, M>(
        &self,
        session: &S,
        source: &M,
        rel_name: &str,
        direction: Direction,
    ) -> Result<Vec<RawEdge>, GraphError>
    where
        S: GraphSession + ?Sized,
        M: NodeModel,
    {
        let rel_token =
            queries::relationship_type_token(self.config().relationship_type_binding, rel_name)?;
        let schema = self.registry().node::<M>();
        let text = queries::retrieve_relationship_query(
            &schema.labels,
            &queries::match_clause(&schema.key_fields, FROM_NODE_PROPS),
            &rel_token,
            direction,
        );
        let statement = Statement::new(text)
            .param(
                FROM_NODE_PROPS,
                serde_json::Value::Object(schema.key_values(source)?),
            )
            .param(REL_NAME, rel_name)
            .returns(["r", "b"]);

        let rows = run_logged(session, statement, self.config().log_parameters).await?;
        rows.into_iter()
            .map(|mut row| {
                let relationship = row.take("r").and_then(Value::into_relationship);
                let node = row.take("b").and_then(Value::into_node);
                match (relationship, node) {
                    (Some(relationship), Some(node)) => Ok(RawEdge { relationship, node }),
                    _ => Err(GraphError::from(ModelError::InvalidValue(
                        "Edge record must contain a relationship and a node".to_string(),
                    ))),
                }
            })
            .collect()
    }
}
