//! Transport parameter validation
//!
//! The single gate between untrusted query-string input and the filter
//! compiler: nothing reaches SQL generation without passing through
//! [`validate`]. Every violated rule produces its own [`ErrorEntry`]; any
//! violation rejects the request before a query runs.

use serde::Deserialize;
use stockroom::table::types::{Filter, FilterParseError, FilterValue, SortDirection, SortSpec};

use crate::api::types::ErrorEntry;
use crate::core::constants::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_FILTER_JSON_SIZE, MAX_FILTERS, MAX_PAGE_SIZE,
    MAX_SORT_ENTRIES,
};

/// Raw table-listing params exactly as they arrive on the query string.
/// Numbers stay strings until the validator has looked at them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub filters: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Typed, trusted output of validation. The compiler only ever sees this.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub search: Option<String>,
    pub filters: Vec<Filter>,
    pub sort: Vec<SortSpec>,
    /// 1-based, defaulted.
    pub page: u32,
    pub page_size: u32,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: None,
            filters: Vec::new(),
            sort: Vec::new(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Bare SQL identifier: letters, digits, underscore, not digit-led. Filter
/// fields and sort ids must pass this before they go anywhere near a
/// statement, since unmapped names pass through field resolution unchanged.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate transport parameters into a trusted [`TableQuery`].
pub fn validate(params: &ListParams) -> Result<TableQuery, Vec<ErrorEntry>> {
    let mut errors = Vec::new();
    let mut query = TableQuery::default();

    match &params.search {
        Some(s) if s.is_empty() => {
            errors.push(ErrorEntry::validation(
                "search",
                "EMPTY_SEARCH",
                "search must be a non-empty string",
            ));
        }
        Some(s) => query.search = Some(s.clone()),
        None => {}
    }

    if let Some(raw) = &params.page {
        match raw.parse::<i64>() {
            Ok(page) if page >= 1 && page <= u32::MAX as i64 => query.page = page as u32,
            _ => errors.push(ErrorEntry::validation(
                "page",
                "INVALID_PAGE",
                "page must be an integer >= 1",
            )),
        }
    }

    if let Some(raw) = &params.page_size {
        match raw.parse::<i64>() {
            Ok(size) if (1..=MAX_PAGE_SIZE as i64).contains(&size) => {
                query.page_size = size as u32;
            }
            Ok(_) => errors.push(ErrorEntry::validation(
                "pageSize",
                "PAGE_SIZE_RANGE",
                format!("pageSize must be between 1 and {}", MAX_PAGE_SIZE),
            )),
            Err(_) => errors.push(ErrorEntry::validation(
                "pageSize",
                "INVALID_PAGE_SIZE",
                "pageSize must be an integer",
            )),
        }
    }

    if let Some(raw) = &params.filters {
        query.filters = validate_filters(raw, &mut errors);
    }

    if let Some(raw) = &params.sort {
        query.sort = validate_sort(raw, &mut errors);
    }

    if errors.is_empty() { Ok(query) } else { Err(errors) }
}

fn validate_filters(raw: &str, errors: &mut Vec<ErrorEntry>) -> Vec<Filter> {
    if raw.len() > MAX_FILTER_JSON_SIZE {
        errors.push(ErrorEntry::validation(
            "filters",
            "FILTER_JSON_TOO_LARGE",
            format!("filters JSON exceeds maximum size of {} bytes", MAX_FILTER_JSON_SIZE),
        ));
        return Vec::new();
    }

    let items = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => {
            errors.push(ErrorEntry::validation(
                "filters",
                "INVALID_FILTER_JSON",
                "filters must be a JSON array",
            ));
            return Vec::new();
        }
        Err(e) => {
            errors.push(ErrorEntry::validation(
                "filters",
                "INVALID_FILTER_JSON",
                format!("filters is not valid JSON: {}", e),
            ));
            return Vec::new();
        }
    };

    if items.len() > MAX_FILTERS {
        errors.push(ErrorEntry::validation(
            "filters",
            "TOO_MANY_FILTERS",
            format!("maximum {} filters allowed", MAX_FILTERS),
        ));
        return Vec::new();
    }

    let mut filters = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let entry_field = format!("filters[{}]", index);
        match Filter::from_json(item) {
            Ok(filter) => {
                if !is_identifier(&filter.field) {
                    errors.push(ErrorEntry::validation(
                        entry_field,
                        "INVALID_FILTER_FIELD",
                        format!("filter field is not a valid identifier: {}", filter.field),
                    ));
                } else if matches!(&filter.value, FilterValue::List(items) if items.is_empty()) {
                    errors.push(ErrorEntry::validation(
                        entry_field,
                        "INVALID_FILTER_VALUE",
                        "filter value array must be non-empty",
                    ));
                } else {
                    filters.push(filter);
                }
            }
            Err(e) => {
                let code = match e {
                    FilterParseError::MissingField | FilterParseError::EmptyField => {
                        "INVALID_FILTER_FIELD"
                    }
                    FilterParseError::MissingOperator | FilterParseError::UnknownOperator(_) => {
                        "INVALID_FILTER_OPERATOR"
                    }
                    FilterParseError::BadValue => "INVALID_FILTER_VALUE",
                    FilterParseError::NotAnObject => "INVALID_FILTER",
                };
                errors.push(ErrorEntry::validation(entry_field, code, e.to_string()));
            }
        }
    }

    // One bad element invalidates the whole param; never partially apply.
    if errors.is_empty() { filters } else { Vec::new() }
}

fn validate_sort(raw: &str, errors: &mut Vec<ErrorEntry>) -> Vec<SortSpec> {
    let items = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => {
            errors.push(ErrorEntry::validation(
                "sort",
                "INVALID_SORT_JSON",
                "sort must be a JSON array",
            ));
            return Vec::new();
        }
        Err(e) => {
            errors.push(ErrorEntry::validation(
                "sort",
                "INVALID_SORT_JSON",
                format!("sort is not valid JSON: {}", e),
            ));
            return Vec::new();
        }
    };

    if items.len() > MAX_SORT_ENTRIES {
        errors.push(ErrorEntry::validation(
            "sort",
            "TOO_MANY_SORTS",
            format!("maximum {} sort entries allowed", MAX_SORT_ENTRIES),
        ));
        return Vec::new();
    }

    let mut sort = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let entry_field = format!("sort[{}]", index);
        let id = item.get("id").and_then(|v| v.as_str()).unwrap_or_default();
        let direction = match item.get("direction").and_then(|v| v.as_str()) {
            Some("asc") => Some(SortDirection::Asc),
            Some("desc") => Some(SortDirection::Desc),
            _ => None,
        };

        if id.is_empty() || !is_identifier(id) {
            errors.push(ErrorEntry::validation(
                entry_field,
                "INVALID_SORT",
                "sort id must be a non-empty identifier",
            ));
        } else if let Some(direction) = direction {
            sort.push(SortSpec {
                id: id.to_string(),
                direction,
            });
        } else {
            errors.push(ErrorEntry::validation(
                entry_field,
                "INVALID_SORT",
                "sort direction must be 'asc' or 'desc'",
            ));
        }
    }

    if errors.is_empty() { sort } else { Vec::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom::table::types::{FilterOperator, Scalar};

    fn params(overrides: impl FnOnce(&mut ListParams)) -> ListParams {
        let mut p = ListParams::default();
        overrides(&mut p);
        p
    }

    #[test]
    fn absent_params_yield_defaults() {
        let query = validate(&ListParams::default()).unwrap();
        assert_eq!(query, TableQuery::default());
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 50);
    }

    #[test]
    fn page_size_boundaries() {
        for (raw, ok) in [("0", false), ("1", true), ("1000", true), ("1001", false)] {
            let result = validate(&params(|p| p.page_size = Some(raw.into())));
            assert_eq!(result.is_ok(), ok, "pageSize={}", raw);
        }
    }

    #[test]
    fn page_must_be_positive_integer() {
        assert!(validate(&params(|p| p.page = Some("0".into()))).is_err());
        assert!(validate(&params(|p| p.page = Some("-1".into()))).is_err());
        assert!(validate(&params(|p| p.page = Some("two".into()))).is_err());
        assert_eq!(validate(&params(|p| p.page = Some("3".into()))).unwrap().page, 3);
    }

    #[test]
    fn one_bad_filter_rejects_the_whole_param() {
        let raw = r#"[{"field":"name","operator":"equals","value":"x"},
                      {"field":"price","operator":"bogus_op","value":1}]"#;
        let errors = validate(&params(|p| p.filters = Some(raw.into()))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "INVALID_FILTER_OPERATOR");
        assert_eq!(errors[0].field.as_deref(), Some("filters[1]"));
    }

    #[test]
    fn valid_filters_become_typed() {
        let raw = r#"[{"field":"category","operator":"equals","value":"Electronics"},
                      {"field":"stockQuantity","operator":"greater_than","value":5}]"#;
        let query = validate(&params(|p| p.filters = Some(raw.into()))).unwrap();
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[0].operator, FilterOperator::Equals);
        assert_eq!(
            query.filters[1].value,
            FilterValue::Scalar(Scalar::Number(5.0))
        );
    }

    #[test]
    fn filters_must_be_a_json_array() {
        let errors = validate(&params(|p| p.filters = Some("{}".into()))).unwrap_err();
        assert_eq!(errors[0].code, "INVALID_FILTER_JSON");

        let errors = validate(&params(|p| p.filters = Some("not json".into()))).unwrap_err();
        assert_eq!(errors[0].code, "INVALID_FILTER_JSON");
    }

    #[test]
    fn empty_value_array_is_rejected() {
        let raw = r#"[{"field":"category","operator":"in","value":[]}]"#;
        let errors = validate(&params(|p| p.filters = Some(raw.into()))).unwrap_err();
        assert_eq!(errors[0].code, "INVALID_FILTER_VALUE");
    }

    #[test]
    fn filter_field_must_be_an_identifier() {
        let raw = r#"[{"field":"name; DROP TABLE stores","operator":"equals","value":"x"}]"#;
        let errors = validate(&params(|p| p.filters = Some(raw.into()))).unwrap_err();
        assert_eq!(errors[0].code, "INVALID_FILTER_FIELD");
    }

    #[test]
    fn null_value_is_accepted_for_equals() {
        let raw = r#"[{"field":"category","operator":"equals","value":null}]"#;
        let query = validate(&params(|p| p.filters = Some(raw.into()))).unwrap();
        assert_eq!(query.filters[0].value, FilterValue::Null);
    }

    #[test]
    fn sort_accepts_valid_entries() {
        let raw = r#"[{"id":"price","direction":"asc"},{"id":"name","direction":"desc"}]"#;
        let query = validate(&params(|p| p.sort = Some(raw.into()))).unwrap();
        assert_eq!(query.sort.len(), 2);
        assert_eq!(query.sort[0], SortSpec::asc("price"));
    }

    #[test]
    fn sort_rejects_bad_direction_and_empty_id() {
        let raw = r#"[{"id":"price","direction":"sideways"}]"#;
        let errors = validate(&params(|p| p.sort = Some(raw.into()))).unwrap_err();
        assert_eq!(errors[0].code, "INVALID_SORT");

        let raw = r#"[{"id":"","direction":"asc"}]"#;
        let errors = validate(&params(|p| p.sort = Some(raw.into()))).unwrap_err();
        assert_eq!(errors[0].code, "INVALID_SORT");
    }

    #[test]
    fn sort_rejects_more_than_ten_entries() {
        let entries: Vec<String> = (0..11)
            .map(|i| format!(r#"{{"id":"col{}","direction":"asc"}}"#, i))
            .collect();
        let raw = format!("[{}]", entries.join(","));
        let errors = validate(&params(|p| p.sort = Some(raw))).unwrap_err();
        assert_eq!(errors[0].code, "TOO_MANY_SORTS");
    }

    #[test]
    fn empty_search_is_rejected() {
        let errors = validate(&params(|p| p.search = Some(String::new()))).unwrap_err();
        assert_eq!(errors[0].code, "EMPTY_SEARCH");
    }

    #[test]
    fn multiple_violations_each_get_an_entry() {
        let p = params(|p| {
            p.page = Some("zero".into());
            p.page_size = Some("5000".into());
            p.search = Some(String::new());
        });
        let errors = validate(&p).unwrap_err();
        let codes: Vec<&str> = errors.iter().map(|e| e.code.as_str()).collect();
        assert!(codes.contains(&"INVALID_PAGE"));
        assert!(codes.contains(&"PAGE_SIZE_RANGE"));
        assert!(codes.contains(&"EMPTY_SEARCH"));
    }
}
