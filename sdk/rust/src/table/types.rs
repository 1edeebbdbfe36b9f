//! Wire types for the table query contract
//!
//! These types define the shapes that travel between client and server:
//! filter conditions, sort specs, the flat transport parameters, and the
//! paginated result envelope. The server crate depends on them so both
//! halves of the pipeline agree on one definition.

use serde::{Deserialize, Serialize};

/// A single scalar filter value: string or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(f64),
}

impl Scalar {
    /// Convert a JSON value to a scalar, rejecting anything else.
    pub fn from_json(value: &serde_json::Value) -> Option<Scalar> {
        match value {
            serde_json::Value::String(s) => Some(Scalar::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(Scalar::Number),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

/// The value side of a filter condition: one scalar, a list, or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    #[default]
    Null,
}

/// Closed operator vocabulary for filter conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl FilterOperator {
    /// All operators, in declaration order.
    pub const ALL: &[FilterOperator] = &[
        FilterOperator::Equals,
        FilterOperator::NotEquals,
        FilterOperator::Contains,
        FilterOperator::NotContains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::GreaterThan,
        FilterOperator::LessThan,
        FilterOperator::GreaterThanOrEqual,
        FilterOperator::LessThanOrEqual,
        FilterOperator::In,
        FilterOperator::NotIn,
        FilterOperator::IsNull,
        FilterOperator::IsNotNull,
    ];

    /// Wire name of the operator (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "not_equals",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::StartsWith => "starts_with",
            FilterOperator::EndsWith => "ends_with",
            FilterOperator::GreaterThan => "greater_than",
            FilterOperator::LessThan => "less_than",
            FilterOperator::GreaterThanOrEqual => "greater_than_or_equal",
            FilterOperator::LessThanOrEqual => "less_than_or_equal",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "not_in",
            FilterOperator::IsNull => "is_null",
            FilterOperator::IsNotNull => "is_not_null",
        }
    }

    /// Parse a wire name. Returns `None` for anything outside the closed set;
    /// callers decide whether that is a hard error (server validator) or a
    /// dropped condition (lenient decode).
    pub fn parse(s: &str) -> Option<FilterOperator> {
        FilterOperator::ALL.iter().copied().find(|op| op.as_str() == s)
    }
}

/// One field/operator/value condition as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: FilterValue,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// Why a JSON element could not be turned into a [`Filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterParseError {
    NotAnObject,
    MissingField,
    EmptyField,
    MissingOperator,
    UnknownOperator(String),
    BadValue,
}

impl std::fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterParseError::NotAnObject => write!(f, "filter must be an object"),
            FilterParseError::MissingField => write!(f, "filter is missing 'field'"),
            FilterParseError::EmptyField => write!(f, "filter 'field' must be a non-empty string"),
            FilterParseError::MissingOperator => write!(f, "filter is missing 'operator'"),
            FilterParseError::UnknownOperator(op) => write!(f, "unknown filter operator: {}", op),
            FilterParseError::BadValue => {
                write!(f, "filter 'value' must be a string, number, array, or null")
            }
        }
    }
}

impl Filter {
    /// Convert one JSON array element into a typed filter.
    ///
    /// Shared by the strict server validator (every error rejects the whole
    /// param) and the lenient client decode (errors drop the one element).
    pub fn from_json(value: &serde_json::Value) -> Result<Filter, FilterParseError> {
        let obj = value.as_object().ok_or(FilterParseError::NotAnObject)?;

        let field = obj
            .get("field")
            .ok_or(FilterParseError::MissingField)?
            .as_str()
            .ok_or(FilterParseError::EmptyField)?;
        if field.is_empty() {
            return Err(FilterParseError::EmptyField);
        }

        let op_str = obj
            .get("operator")
            .and_then(|v| v.as_str())
            .ok_or(FilterParseError::MissingOperator)?;
        let operator = FilterOperator::parse(op_str)
            .ok_or_else(|| FilterParseError::UnknownOperator(op_str.to_string()))?;

        let filter_value = match obj.get("value") {
            None | Some(serde_json::Value::Null) => FilterValue::Null,
            Some(serde_json::Value::Array(items)) => {
                let scalars: Option<Vec<Scalar>> = items.iter().map(Scalar::from_json).collect();
                FilterValue::List(scalars.ok_or(FilterParseError::BadValue)?)
            }
            Some(v) => FilterValue::Scalar(Scalar::from_json(v).ok_or(FilterParseError::BadValue)?),
        };

        Ok(Filter {
            field: field.to_string(),
            operator,
            value: filter_value,
        })
    }
}

/// Sort direction, lowercase on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One sort entry. The server honors only the first element of a sort list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub id: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Flat transport representation of a table request.
///
/// `filters` and `sort` are JSON-encoded strings so the whole request fits in
/// a query string; the keys are omitted entirely when the lists are empty,
/// which is what lets the server fall through to its default sort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRequestParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl TableRequestParams {
    /// Key/value pairs for a query string, in stable order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(ref filters) = self.filters {
            pairs.push(("filters", filters.clone()));
        }
        if let Some(ref sort) = self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize", page_size.to_string()));
        }
        pairs
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    pub data: Vec<T>,
    /// Match count before pagination.
    pub total: u64,
    /// Echo of the validated, defaulted request page (1-based).
    pub page: u32,
    pub page_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_wire_names_round_trip() {
        for op in FilterOperator::ALL {
            assert_eq!(FilterOperator::parse(op.as_str()), Some(*op));
        }
        assert_eq!(FilterOperator::parse("bogus_op"), None);
    }

    #[test]
    fn operator_serde_matches_as_str() {
        for op in FilterOperator::ALL {
            let json = serde_json::to_string(op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.as_str()));
        }
    }

    #[test]
    fn filter_from_json_scalar() {
        let v = serde_json::json!({"field": "name", "operator": "equals", "value": "Main Store"});
        let f = Filter::from_json(&v).unwrap();
        assert_eq!(f.field, "name");
        assert_eq!(f.operator, FilterOperator::Equals);
        assert_eq!(f.value, FilterValue::Scalar(Scalar::Text("Main Store".into())));
    }

    #[test]
    fn filter_from_json_list() {
        let v = serde_json::json!({"field": "category", "operator": "in", "value": ["Electronics", "Toys"]});
        let f = Filter::from_json(&v).unwrap();
        assert_eq!(
            f.value,
            FilterValue::List(vec![Scalar::Text("Electronics".into()), Scalar::Text("Toys".into())])
        );
    }

    #[test]
    fn filter_from_json_null_and_missing_value() {
        let with_null =
            serde_json::json!({"field": "category", "operator": "is_null", "value": null});
        assert_eq!(Filter::from_json(&with_null).unwrap().value, FilterValue::Null);

        let without = serde_json::json!({"field": "category", "operator": "is_null"});
        assert_eq!(Filter::from_json(&without).unwrap().value, FilterValue::Null);
    }

    #[test]
    fn filter_from_json_rejects_unknown_operator() {
        let v = serde_json::json!({"field": "price", "operator": "bogus_op", "value": 1});
        assert_eq!(
            Filter::from_json(&v),
            Err(FilterParseError::UnknownOperator("bogus_op".into()))
        );
    }

    #[test]
    fn filter_from_json_rejects_bad_shapes() {
        let empty_field = serde_json::json!({"field": "", "operator": "equals", "value": "x"});
        assert_eq!(Filter::from_json(&empty_field), Err(FilterParseError::EmptyField));

        let bool_value = serde_json::json!({"field": "name", "operator": "equals", "value": true});
        assert_eq!(Filter::from_json(&bool_value), Err(FilterParseError::BadValue));

        let nested = serde_json::json!({"field": "name", "operator": "in", "value": [["x"]]});
        assert_eq!(Filter::from_json(&nested), Err(FilterParseError::BadValue));
    }

    #[test]
    fn params_serialize_omits_empty_keys() {
        let params = TableRequestParams {
            page: Some(1),
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("filters"));
        assert!(!obj.contains_key("sort"));
        assert!(!obj.contains_key("search"));
        assert_eq!(obj.get("page"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn query_pairs_use_camel_case_page_size() {
        let params = TableRequestParams {
            page: Some(2),
            page_size: Some(25),
            ..Default::default()
        };
        assert_eq!(
            params.to_query_pairs(),
            vec![("page", "2".to_string()), ("pageSize", "25".to_string())]
        );
    }
}
