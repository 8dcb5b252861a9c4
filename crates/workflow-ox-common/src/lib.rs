#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Shared HTTP plumbing for the workflow-ox engine
//!
//! Request construction, bearer authentication and error-payload formatting live here so the
//! engine crate only deals with workflow semantics.

pub mod error;
pub mod request_builder;

pub use error::{CommonRequestError, parse_error_response};
pub use request_builder::{AuthMethod, Endpoint, HttpMethod, RequestBuilder, RequestConfig};
