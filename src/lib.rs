//! A fluent Rust client for the [Directus](https://directus.io) v8 REST API.
//!
//! # Overview
//!
//! The crate revolves around a [`DirectusClient`] that assembles one request at a time. Select an
//! [`Endpoint`] (or any template with `:name` placeholders), bind its placeholders, add query
//! parameters, body attributes and headers, then execute a verb. The JSON response is returned
//! as a [`serde_json::Value`] and the client resets itself for the next request, keeping the
//! session's project and access token.
//!
//! ```no_run
//! use directus::{ClientConfig, Endpoint, Filter};
//!
//! let mut client = ClientConfig::new("https://cms.example.com")
//!     .project("shop")
//!     .to_client()?;
//!
//! client.authenticate("admin@example.com", "password", None, None)?;
//!
//! let cheap = client
//!     .endpoint(Endpoint::Items)
//!     .parameter("collection", "products")
//!     .filter(Filter::new().condition("price", "lt", 20))
//!     .sort(["price", "-created_on"])
//!     .all()
//!     .get()?;
//! # Ok::<(), directus::Error>(())
//! ```
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum. Local mistakes, such as a placeholder without a
//! value, fail before anything is sent. Network failures and non-JSON responses are returned as
//! errors as well.
//!
//! Errors reported by the API itself are not turned into [`Error`]s: the decoded body is returned
//! as usual and [`DirectusClient::is_error`] tells whether it carries an error.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate for logging
//! messages under the `directus` target. Consider integrating a `log`-compatible logger
//! implementation for better visibility into outgoing requests.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod client;
mod config;
mod endpoint;
mod error;
mod query;
mod template;
mod transport;

pub use client::{DirectusClient, PendingRequest};
pub use config::ClientConfig;
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use query::{normalize, Filter, QueryValue};
pub use template::Template;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
