//! Structured queries sent to `:runQuery`
//!
//! Filters accumulate and are ANDed; the server applies them before the
//! limit regardless of the order `filter` and `limit` were chained in.

use eventdesk_core::Value;
use serde_json::{json, Value as Json};

use super::wire::encode_value;
use crate::facade::FilterOp;

/// One `fieldFilter` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Field name, unquoted
    pub field: String,
    /// Comparison
    pub op: FilterOp,
    /// Right-hand operand
    pub value: Value,
}

/// Pending filters and limit of a remote view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteQuery {
    filters: Vec<FieldFilter>,
    limit: Option<usize>,
}

impl RemoteQuery {
    /// Add an AND-ed clause.
    pub fn and_filter(mut self, field: &str, op: FilterOp, value: Value) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            op,
            value,
        });
        self
    }

    /// Cap the result size; repeated limits keep the smallest.
    pub fn with_limit(mut self, n: usize) -> Self {
        self.limit = Some(self.limit.map_or(n, |current| current.min(n)));
        self
    }

    /// Clauses in the order they were added.
    pub fn filters(&self) -> &[FieldFilter] {
        &self.filters
    }

    /// Effective limit, if any
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// `runQuery` request body selecting from `collection_id`.
    pub fn to_request(&self, collection_id: &str) -> Json {
        let mut query = json!({
            "from": [{ "collectionId": collection_id }],
        });

        let mut clauses: Vec<Json> = self.filters.iter().map(field_filter).collect();
        if clauses.len() == 1 {
            query["where"] = clauses.remove(0);
        } else if !clauses.is_empty() {
            query["where"] = json!({
                "compositeFilter": { "op": "AND", "filters": clauses }
            });
        }
        if let Some(limit) = self.limit {
            query["limit"] = json!(limit);
        }

        json!({ "structuredQuery": query })
    }
}

/// Firestore operator name.
pub fn operator_name(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq => "EQUAL",
        FilterOp::NotEq => "NOT_EQUAL",
        FilterOp::Lt => "LESS_THAN",
        FilterOp::Le => "LESS_THAN_OR_EQUAL",
        FilterOp::Gt => "GREATER_THAN",
        FilterOp::Ge => "GREATER_THAN_OR_EQUAL",
        FilterOp::ArrayContains => "ARRAY_CONTAINS",
        FilterOp::In => "IN",
    }
}

/// Field path, backtick-quoted unless it is a plain identifier.
pub fn field_path(field: &str) -> String {
    let mut chars = field.chars();
    let simple = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        field.to_string()
    } else {
        format!("`{}`", field.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

fn field_filter(filter: &FieldFilter) -> Json {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": field_path(&filter.field) },
            "op": operator_name(filter.op),
            "value": encode_value(&filter.value),
        }
    })
}
