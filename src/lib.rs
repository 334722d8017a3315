#![warn(missing_docs)]
#![crate_name = "l2l_dispatch"]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Dispatch API Client
//!
//! `l2l_dispatch` is a web client for the L2L Dispatch API, a production-tracking and
//! machine dispatch system. Every call is checked against the API's response envelope:
//! a non-2xx status or an unreadable body is a system failure, `success: false` is an
//! application failure.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use l2l_dispatch::{api_base_url, params, ApiKey, ApiResource, DispatchClient};
//! use l2l_dispatch::resources::Line;
//!
//! #[tokio::main]
//! async fn main() -> l2l_dispatch::DispatchResult<()> {
//!     let client = DispatchClient::builder()
//!         .base_url(api_base_url("example.l2l.com")?)
//!         .api_key(ApiKey::new("my-api-key"))
//!         .build()?;
//!     let (client, site) = client.validate_site(1).await?;
//!     let lines = Line::list(&client, params! { "active" => true }).await?;
//!     println!("{}: {} lines", site.description, lines.len());
//!     Ok(())
//! }
//! ```

extern crate reqwest;
extern crate serde;
extern crate serde_json;
extern crate self as l2l_dispatch;

/// Module containing the typed actions of a site scoped client.
pub mod actions;
/// Module containing the client.
pub mod client;
/// Module containing timestamp formatting.
pub mod datetime;
/// Module containing the response envelope.
pub mod envelope;
/// Module containing the error type.
pub mod error;
/// Module containing the macros.
pub mod macros;
/// Module containing offset pagination.
pub mod pagination;
/// Module containing request parameters.
pub mod params;
/// Module containing request types.
pub mod requests;
/// Module containing the remote resource models.
pub mod resources;
/// Module containing traits.
pub mod traits;
/// Module containing the example walkthrough.
pub mod walkthrough;

mod credentials;

pub use client::states::*;
pub use client::{api_base_url, DispatchClient};
pub use credentials::ApiKey;
pub use envelope::{checked_response, ApiResponse, Extract};
pub use error::DispatchError;
pub use pagination::{OffsetCursor, Paginated};
pub use params::{ParamValue, Parameters};
pub use reqwest::Method;
pub use serde_json::Value;
pub use traits::ApiResource;

/// Result type for the l2l-dispatch-rs crate.
pub type DispatchResult<T> = std::result::Result<T, error::DispatchError>;
