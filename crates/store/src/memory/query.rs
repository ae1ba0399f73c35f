//! Filter and limit over a materialized document map

use eventdesk_core::Value;
use tracing::debug;

use super::DocMap;
use crate::facade::FilterOp;

/// Documents holding `field` with a value deep-equal to `value`.
///
/// Only [`FilterOp::Eq`] is evaluated; any other operator yields no
/// documents.
pub(crate) fn filter_docs(docs: &DocMap, field: &str, op: FilterOp, value: &Value) -> DocMap {
    if op != FilterOp::Eq {
        debug!(field, op = %op, "Operator not evaluated in memory; view is empty");
        return DocMap::default();
    }
    docs.iter()
        .filter(|(_, fields)| fields.get(field) == Some(value))
        .map(|(id, fields)| (id.clone(), fields.clone()))
        .collect()
}

/// First `n` documents in iteration order.
pub(crate) fn limit_docs(docs: &DocMap, n: usize) -> DocMap {
    docs.iter()
        .take(n)
        .map(|(id, fields)| (id.clone(), fields.clone()))
        .collect()
}
