//! Generic, type-parameterized REST collection client.
//!
//! # Overview
//! Given an entity type that knows its collection's URL segment and how to
//! convert itself to and from JSON, `Api<T>` provides list, get-one, create,
//! update and delete against `{base_url}{segment}` and keeps the last
//! fetched batch of entities in memory.
//!
//! # Design
//! - Entities implement `Jsonable`, or `Resource` when they derive serde.
//! - The network is behind the `Transport` trait; `UreqTransport` is the
//!   blocking default and any `Fn(HttpRequest) -> HttpResult` works too.
//! - Each operation issues one request and reports the `HttpResult` to a
//!   completion callback. Per-operation `ResponseHooks` get a chance to
//!   post-process each entity first.
//!
//! ```no_run
//! use jsonable_core::{Api, ClientConfig, Resource, UreqTransport};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Widget {
//!     id: String,
//!     name: String,
//! }
//!
//! impl Resource for Widget {
//!     const URL_NAME: &'static str = "widgets";
//! }
//!
//! let mut api: Api<Widget> =
//!     Api::with_config(ClientConfig::new("http://localhost:3000/"), UreqTransport::new());
//! api.list(|result| println!("HTTP {}", result.status)).unwrap();
//! for widget in &api {
//!     println!("{widget:?}");
//! }
//! ```

pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;

pub use client::{Api, NoHooks, ResourceId, ResponseHooks};
pub use config::ClientConfig;
pub use entity::{JsonMap, Jsonable, Resource};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResult, Transport, UreqTransport};
