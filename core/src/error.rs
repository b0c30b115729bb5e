//! Error types for the collection client.
//!
//! # Design
//! Only failures that happen *before* a request leaves the client are
//! returned to the caller as `Err`: a base URL that cannot form a valid URL,
//! or an entity list that cannot be serialized. Everything that happens after
//! the round-trip (transport failure, non-2xx status, malformed body) is
//! reported through the `HttpResult` handed to the completion callback.

/// Errors produced by `Api` and the `Jsonable` entity contract.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No base URL was configured before issuing a request.
    #[error("base URL is empty")]
    EmptyBaseUrl,

    /// The entity type declared an empty URL name.
    #[error("entity URL name is empty")]
    EmptyUrlName,

    /// The base URL and the entity's URL name do not form a valid URL.
    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// An entity could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A JSON value could not be deserialized into an entity.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// A JSON object was expected but some other value was found.
    #[error("expected a JSON object")]
    NotAnObject,

    /// A JSON array was expected but some other value was found.
    #[error("expected a JSON array")]
    NotAnArray,
}

pub(crate) type Result<T> = std::result::Result<T, ApiError>;
