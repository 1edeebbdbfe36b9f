//! Table query pipeline, server half
//!
//! Transport params flow through here in one direction:
//! [`validate`](validate::validate) gates untrusted input, [`compile`]
//! turns trusted filters into parameterized SQL, and
//! [`execute`](execute::fetch_page) runs the count + page queries.

pub mod compile;
pub mod execute;
pub mod fields;
pub mod validate;

pub use compile::{CompiledFilter, SkipReason, SqlParams, SqlValue, WhereClause};
pub use execute::fetch_page;
pub use fields::{FieldMap, TableSpec};
pub use validate::{ListParams, TableQuery, validate};
