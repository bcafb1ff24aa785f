//! Uniqueness constraint bookkeeping.
//!
//! A constraint is issued at most once per model type per mapper, the first
//! time a node of that type is created outside an explicit transaction.

use std::any::TypeId;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use graphbind_core::{NodeModel, SchemaRegistry};

use crate::client::GraphError;
use crate::queries;
use crate::session::{run_logged, GraphSession, Statement};

/// Model types whose constraint statement has already been issued.
#[derive(Debug, Default)]
pub struct ConstraintCache {
    issued: Mutex<HashSet<TypeId>>,
}

impl ConstraintCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains<M: 'static>(&self) -> bool {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&TypeId::of::<M>())
    }

    pub fn insert<M: 'static>(&self) {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<M>());
    }

    pub fn reset(&self) {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.issued.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Issue the uniqueness constraint for `M` if it has not been issued yet.
///
/// Skipped inside explicit transactions, where schema statements are not
/// allowed. Concurrent first calls may both issue the statement; it is
/// idempotent.
pub(crate) async fn ensure_constraints<S, M>(
    session: &S,
    registry: &SchemaRegistry,
    cache: &ConstraintCache,
    labels: &[String],
    log_parameters: bool,
) -> Result<(), GraphError>
where
    S: GraphSession + ?Sized,
    M: NodeModel,
{
    if session.is_explicit_transaction() {
        return Ok(());
    }
    let Some(first_label) = labels.first() else {
        return Ok(());
    };
    if cache.contains::<M>() {
        return Ok(());
    }

    let schema = registry.node::<M>();
    if !schema.key_fields.is_empty() {
        let text = queries::constraint_query(schema.type_name, first_label, &schema.key_fields);
        tracing::info!(
            model = schema.type_name,
            label = %first_label,
            fields = ?schema.key_fields,
            "Ensuring uniqueness constraint"
        );
        run_logged(session, Statement::new(text), log_parameters).await?;
    }
    cache.insert::<M>();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct First;
    struct Second;

    #[test]
    fn test_cache_membership_and_reset() {
        let cache = ConstraintCache::new();
        assert!(cache.is_empty());
        cache.insert::<First>();
        cache.insert::<First>();
        assert!(cache.contains::<First>());
        assert!(!cache.contains::<Second>());
        assert_eq!(cache.len(), 1);

        cache.reset();
        assert!(!cache.contains::<First>());
        assert!(cache.is_empty());
    }
}
