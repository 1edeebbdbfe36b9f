//! Table query pipeline, client half
//!
//! - [`types`] — wire types shared with the server (filters, sort, params)
//! - [`grammar`] — which operators are legal for which value types
//! - [`state`] — the table state machine driving the UI
//! - [`codec`] — encode/decode between state and transport parameters

pub mod codec;
pub mod grammar;
pub mod state;
pub mod types;

pub use codec::{DecodeIssue, DecodedTableState, decode, encode};
pub use grammar::{ValueType, operators_for};
pub use state::{PaginationState, TableAction, TableFilter, TableState};
pub use types::{
    Filter, FilterOperator, FilterValue, QueryResult, Scalar, SortDirection, SortSpec,
    TableRequestParams,
};
