//! Query parameter codec
//!
//! Maps between the in-memory [`TableState`] and the flat, query-string-safe
//! [`TableRequestParams`]. Encoding strips client-only filter ids and omits
//! the `filters`/`sort` keys entirely when the lists are empty; decoding is
//! the inverse and never fails — malformed JSON falls back to an empty list,
//! with the fallback recorded on the returned value so callers can surface it.

use super::state::{TableFilter, TableState};
use super::types::{Filter, SortDirection, SortSpec, TableRequestParams};

/// A recoverable problem encountered while decoding transport parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeIssue {
    /// The `filters` param did not parse as a JSON array; the list was
    /// replaced with an empty one.
    MalformedFilters(String),
    /// The `sort` param did not parse as a JSON array; same fallback.
    MalformedSort(String),
    /// One `filters` element was dropped (unknown operator, bad shape).
    DroppedFilter { index: usize, reason: String },
    /// One `sort` element was dropped (missing id, bad direction).
    DroppedSort { index: usize },
}

/// Partial table state recovered from transport parameters.
///
/// Fields absent on the wire stay `None`/empty so callers can merge over
/// their own defaults. `issues` is non-empty whenever a fallback happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedTableState {
    pub filters: Vec<TableFilter>,
    pub sort: Vec<SortSpec>,
    pub search: Option<String>,
    /// 0-based, converted from the wire's 1-based `page`.
    pub page_index: Option<u32>,
    pub page_size: Option<u32>,
    pub issues: Vec<DecodeIssue>,
}

impl DecodedTableState {
    /// True when some part of the input was malformed and fell back.
    pub fn fell_back(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Serialize table state into transport parameters.
pub fn encode(state: &TableState) -> TableRequestParams {
    let filters = if state.filters.is_empty() {
        None
    } else {
        let wire: Vec<Filter> = state.filters.iter().map(TableFilter::to_wire).collect();
        // Vec<Filter> serialization cannot fail.
        Some(serde_json::to_string(&wire).unwrap_or_default())
    };

    let sort = if state.sort.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&state.sort).unwrap_or_default())
    };

    TableRequestParams {
        search: state.search.clone().filter(|s| !s.is_empty()),
        filters,
        sort,
        page: Some(state.pagination.page_index + 1),
        page_size: Some(state.pagination.page_size),
    }
}

/// Recover table state from transport parameters. Never fails; see
/// [`DecodedTableState::issues`] for anything that was dropped.
pub fn decode(params: &TableRequestParams) -> DecodedTableState {
    let mut decoded = DecodedTableState {
        search: params.search.clone().filter(|s| !s.is_empty()),
        page_index: params.page.map(|p| p.saturating_sub(1)),
        page_size: params.page_size,
        ..Default::default()
    };

    if let Some(ref raw) = params.filters {
        decode_filters(raw, &mut decoded);
    }
    if let Some(ref raw) = params.sort {
        decode_sort(raw, &mut decoded);
    }

    decoded
}

fn decode_filters(raw: &str, decoded: &mut DecodedTableState) {
    let items: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!("filters param is valid JSON but not an array, ignoring");
            decoded
                .issues
                .push(DecodeIssue::MalformedFilters("expected a JSON array".into()));
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse filters param, ignoring");
            decoded.issues.push(DecodeIssue::MalformedFilters(e.to_string()));
            return;
        }
    };

    for (index, item) in items.iter().enumerate() {
        match Filter::from_json(item) {
            Ok(filter) => decoded.filters.push(TableFilter::from_wire(filter)),
            Err(reason) => {
                tracing::debug!(index, %reason, "dropped filter while decoding");
                decoded.issues.push(DecodeIssue::DroppedFilter {
                    index,
                    reason: reason.to_string(),
                });
            }
        }
    }
}

fn decode_sort(raw: &str, decoded: &mut DecodedTableState) {
    let items: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!("sort param is valid JSON but not an array, ignoring");
            decoded
                .issues
                .push(DecodeIssue::MalformedSort("expected a JSON array".into()));
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse sort param, ignoring");
            decoded.issues.push(DecodeIssue::MalformedSort(e.to_string()));
            return;
        }
    };

    for (index, item) in items.iter().enumerate() {
        let id = item.get("id").and_then(|v| v.as_str()).unwrap_or_default();
        let direction = match item.get("direction").and_then(|v| v.as_str()) {
            Some("asc") => Some(SortDirection::Asc),
            Some("desc") => Some(SortDirection::Desc),
            _ => None,
        };
        match (id.is_empty(), direction) {
            (false, Some(direction)) => decoded.sort.push(SortSpec {
                id: id.to_string(),
                direction,
            }),
            _ => {
                tracing::debug!(index, "dropped sort entry while decoding");
                decoded.issues.push(DecodeIssue::DroppedSort { index });
            }
        }
    }
}
