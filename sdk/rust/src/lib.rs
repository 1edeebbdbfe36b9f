//! # Stockroom
//!
//! Client SDK for the Stockroom inventory API.
//!
//! Three pieces:
//!
//! - [`table`] — the table state machine, filter grammar, and the codec that
//!   turns table state into query-string parameters (and back).
//! - [`client`] — a typed async HTTP client over the REST API.
//! - [`models`] — entity and request/response shapes.
//!
//! ```no_run
//! use stockroom::client::Client;
//! use stockroom::table::{TableAction, TableState};
//!
//! # async fn demo() -> Result<(), stockroom::error::ClientError> {
//! let client = Client::new("http://127.0.0.1:5570");
//! let mut state = TableState::default();
//! state.apply(TableAction::SearchSet(Some("widget".into())));
//! let page = client.list_products(&state).await?;
//! println!("{} products match", page.total);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod table;

pub use client::Client;
pub use error::ClientError;
