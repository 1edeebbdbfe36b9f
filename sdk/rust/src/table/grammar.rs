//! Filter grammar: which operators are legal for which value types
//!
//! Drives filter-builder UIs: given the value types a column can hold, this
//! module answers which operators to offer. The server enforces its own
//! stricter checks; this is the client-side vocabulary.

use super::types::FilterOperator;

/// Value-type tag for an exposed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Number,
    Date,
    Enum,
    Boolean,
}

const STRING_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::Contains,
    FilterOperator::NotContains,
    FilterOperator::StartsWith,
    FilterOperator::EndsWith,
    FilterOperator::In,
    FilterOperator::NotIn,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const NUMBER_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::GreaterThan,
    FilterOperator::LessThan,
    FilterOperator::GreaterThanOrEqual,
    FilterOperator::LessThanOrEqual,
    FilterOperator::In,
    FilterOperator::NotIn,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const DATE_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::GreaterThan,
    FilterOperator::LessThan,
    FilterOperator::GreaterThanOrEqual,
    FilterOperator::LessThanOrEqual,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const ENUM_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::In,
    FilterOperator::NotIn,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const BOOLEAN_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

impl ValueType {
    fn operators(&self) -> &'static [FilterOperator] {
        match self {
            ValueType::String => STRING_OPERATORS,
            ValueType::Number => NUMBER_OPERATORS,
            ValueType::Date => DATE_OPERATORS,
            ValueType::Enum => ENUM_OPERATORS,
            ValueType::Boolean => BOOLEAN_OPERATORS,
        }
    }
}

/// Union of the operator sets for the given value types, in the closed set's
/// declaration order. An empty slice falls back to the string operator set.
pub fn operators_for(value_types: &[ValueType]) -> Vec<FilterOperator> {
    if value_types.is_empty() {
        return STRING_OPERATORS.to_vec();
    }

    FilterOperator::ALL
        .iter()
        .copied()
        .filter(|op| value_types.iter().any(|vt| vt.operators().contains(op)))
        .collect()
}
