//! Generic collection client for a conventionally structured JSON API.
//!
//! # Design
//! `Api<T, H>` owns the most recently fetched batch of `T` entities and talks
//! to `{base_url}{T::url_name()}` through a `Transport`. Every operation
//! issues exactly one request and then, in order:
//!
//! 1. updates `entity_list` from the body (read operations only),
//! 2. runs the matching `ResponseHooks` method once per entity, if the
//!    status is 2xx, the response declares a JSON content type, the body
//!    parses and (for reads) the entities were read from it,
//! 3. calls the completion callback with the `HttpResult`.
//!
//! A non-2xx response or a body that fails to parse leaves `entity_list`
//! alone and skips the hooks; the callback still runs.
//! Only URL and request-body construction failures are returned as `Err`, and
//! in that case no request is sent and the callback is not called.
//!
//! Two behaviors are kept for compatibility and are easy to trip over:
//! `get_one` appends to `entity_list` where `list` replaces it, and
//! iteration walks `entity_list` from the last entity to the first.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::config::{default_headers, ClientConfig};
use crate::entity::Jsonable;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResult, Transport, UreqTransport};

/// Per-operation extension points, called after a successful JSON response.
///
/// Each method receives the index into `entity_list`, the entity at that
/// index, the whole parsed response body and the raw result. All methods
/// default to doing nothing.
///
/// The usual job of `on_create_response` is merging server-assigned
/// identifiers back into the local entities.
#[allow(unused_variables)]
pub trait ResponseHooks<T> {
    fn on_list_response(
        &mut self,
        index: usize,
        entity: &mut T,
        json: &Value,
        result: &HttpResult,
    ) {}

    fn on_get_response(
        &mut self,
        index: usize,
        entity: &mut T,
        json: &Value,
        result: &HttpResult,
    ) {}

    fn on_create_response(
        &mut self,
        index: usize,
        entity: &mut T,
        json: &Value,
        result: &HttpResult,
    ) {}

    fn on_update_response(
        &mut self,
        index: usize,
        entity: &mut T,
        json: &Value,
        result: &HttpResult,
    ) {}

    fn on_delete_response(
        &mut self,
        index: usize,
        entity: &mut T,
        json: &Value,
        result: &HttpResult,
    ) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl<T> ResponseHooks<T> for NoHooks {}

/// Identifier of a single resource, already rendered as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        ResourceId(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        ResourceId(id)
    }
}

impl From<&String> for ResourceId {
    fn from(id: &String) -> Self {
        ResourceId(id.clone())
    }
}

impl From<Uuid> for ResourceId {
    fn from(id: Uuid) -> Self {
        ResourceId(id.to_string())
    }
}

macro_rules! resource_id_from_int {
    ($($int:ty),*) => {
        $(
            impl From<$int> for ResourceId {
                fn from(id: $int) -> Self {
                    ResourceId(id.to_string())
                }
            }
        )*
    };
}

resource_id_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// Client for the collection of `T` entities, with response hooks `H`.
pub struct Api<T, H = NoHooks> {
    entity_list: Vec<T>,
    base_url: String,
    headers: BTreeMap<String, String>,
    hooks: H,
    transport: Box<dyn Transport>,
}

impl<T: fmt::Debug, H: fmt::Debug> fmt::Debug for Api<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("entity_list", &self.entity_list)
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// A client over `UreqTransport` with no base URL and the default JSON
/// content-type header. Set the base URL before the first request.
impl<T: Jsonable> Default for Api<T, NoHooks> {
    fn default() -> Self {
        Self::new(UreqTransport::new())
    }
}

impl<T: Jsonable> Api<T, NoHooks> {
    /// A client with no base URL and the default JSON content-type header.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_config(ClientConfig::default(), transport)
    }

    pub fn with_config(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Api {
            entity_list: Vec::new(),
            base_url: config.base_url,
            headers: config.headers,
            hooks: NoHooks,
            transport: Box::new(transport),
        }
    }
}

impl<T: Jsonable, H: ResponseHooks<T>> Api<T, H> {
    /// Swap in a different set of response hooks, keeping all other state.
    pub fn with_hooks<H2: ResponseHooks<T>>(self, hooks: H2) -> Api<T, H2> {
        Api {
            entity_list: self.entity_list,
            base_url: self.base_url,
            headers: self.headers,
            hooks,
            transport: self.transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.headers
    }

    /// Restore the headers to just the JSON content type.
    pub fn reset_headers(&mut self) {
        self.headers = default_headers();
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// `{base_url}{url_name}`.
    pub fn collection_url(&self) -> Result<String> {
        self.build_url(None)
    }

    /// `{base_url}{url_name}/{id}`.
    pub fn resource_url(&self, id: impl Into<ResourceId>) -> Result<String> {
        self.build_url(Some(&id.into()))
    }

    fn build_url(&self, id: Option<&ResourceId>) -> Result<String> {
        if self.base_url.is_empty() {
            return Err(ApiError::EmptyBaseUrl);
        }
        let url_name = T::url_name();
        if url_name.is_empty() {
            return Err(ApiError::EmptyUrlName);
        }
        let url = match id {
            Some(id) => format!("{}{}/{}", self.base_url, url_name, id),
            None => format!("{}{}", self.base_url, url_name),
        };
        match Url::parse(&url) {
            Ok(_) => Ok(url),
            Err(source) => Err(ApiError::InvalidUrl { url, source }),
        }
    }

    /// Fetch the whole collection and replace `entity_list` with it.
    pub fn list(&mut self, on_complete: impl FnOnce(&HttpResult)) -> Result<()> {
        let url = self.collection_url()?;
        let result = self.send(HttpMethod::Get, url, None);

        if result.is_success() {
            match parse_entity_array::<T>(&result.data) {
                Ok(entities) => {
                    self.entity_list = entities;
                    self.run_hooks(Operation::List, &result);
                }
                Err(err) => warn!(
                    %err,
                    status = result.status,
                    "could not read entity list from response"
                ),
            }
        }

        on_complete(&result);
        Ok(())
    }

    /// Fetch one entity and append it to `entity_list`.
    ///
    /// Existing entities are kept, and `on_get_response` runs for every
    /// entity in the list, not only the new one. Use `get_one_replace` to
    /// discard the previous contents instead.
    pub fn get_one(
        &mut self,
        id: impl Into<ResourceId>,
        on_complete: impl FnOnce(&HttpResult),
    ) -> Result<()> {
        self.fetch_one(id.into(), false, on_complete)
    }

    /// Fetch one entity and make it the only entry of `entity_list`.
    ///
    /// On a malformed body the previous contents are left untouched.
    pub fn get_one_replace(
        &mut self,
        id: impl Into<ResourceId>,
        on_complete: impl FnOnce(&HttpResult),
    ) -> Result<()> {
        self.fetch_one(id.into(), true, on_complete)
    }

    fn fetch_one(
        &mut self,
        id: ResourceId,
        replace: bool,
        on_complete: impl FnOnce(&HttpResult),
    ) -> Result<()> {
        let url = self.resource_url(id)?;
        let result = self.send(HttpMethod::Get, url, None);

        if result.is_success() {
            let mut entity = self.create_type();
            match entity.read_json_bytes(&result.data) {
                Ok(()) => {
                    if replace {
                        self.entity_list.clear();
                    }
                    self.entity_list.push(entity);
                    self.run_hooks(Operation::Get, &result);
                }
                Err(err) => warn!(
                    %err,
                    status = result.status,
                    "could not read entity from response"
                ),
            }
        }

        on_complete(&result);
        Ok(())
    }

    /// POST `entity_list` to the collection as a JSON array.
    pub fn create(&mut self, on_complete: impl FnOnce(&HttpResult)) -> Result<()> {
        self.write(HttpMethod::Post, Operation::Create, on_complete)
    }

    /// PUT `entity_list` to the collection as a JSON array.
    pub fn update(&mut self, on_complete: impl FnOnce(&HttpResult)) -> Result<()> {
        self.write(HttpMethod::Put, Operation::Update, on_complete)
    }

    /// DELETE the entities in `entity_list`, sent as a JSON array body.
    pub fn remove(&mut self, on_complete: impl FnOnce(&HttpResult)) -> Result<()> {
        self.write(HttpMethod::Delete, Operation::Delete, on_complete)
    }

    fn write(
        &mut self,
        method: HttpMethod,
        operation: Operation,
        on_complete: impl FnOnce(&HttpResult),
    ) -> Result<()> {
        let url = self.collection_url()?;
        let body = self.json_array_body()?;
        let result = self.send(method, url, Some(body));

        self.run_hooks(operation, &result);
        on_complete(&result);
        Ok(())
    }

    fn json_array_body(&self) -> Result<Vec<u8>> {
        let array = self
            .entity_list
            .iter()
            .map(|entity| entity.to_json_map().map(Value::Object))
            .collect::<Result<Vec<_>>>()?;
        serde_json::to_vec_pretty(&Value::Array(array)).map_err(ApiError::Serialization)
    }

    fn send(&self, method: HttpMethod, url: String, body: Option<Vec<u8>>) -> HttpResult {
        debug!(
            method = method.as_str(),
            %url,
            entities = self.entity_list.len(),
            "sending request"
        );
        let request = HttpRequest {
            method,
            url,
            headers: self
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            body,
        };
        let result = self.transport.execute(request);
        debug!(status = result.status, bytes = result.data.len(), "received response");
        result
    }

    /// Hooks only see 2xx responses with a JSON body.
    fn run_hooks(&mut self, operation: Operation, result: &HttpResult) {
        if !result.is_success() || !result.is_json() {
            return;
        }
        let json: Value = match serde_json::from_slice(&result.data) {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, ?operation, "skipping response hooks, body is not valid JSON");
                return;
            }
        };

        for (index, entity) in self.entity_list.iter_mut().enumerate() {
            match operation {
                Operation::List => self.hooks.on_list_response(index, entity, &json, result),
                Operation::Get => self.hooks.on_get_response(index, entity, &json, result),
                Operation::Create => self.hooks.on_create_response(index, entity, &json, result),
                Operation::Update => self.hooks.on_update_response(index, entity, &json, result),
                Operation::Delete => self.hooks.on_delete_response(index, entity, &json, result),
            }
        }
    }

    /// A new default entity.
    pub fn create_type(&self) -> T {
        T::create_instance()
    }
}

impl<T, H> Api<T, H> {
    pub fn entities(&self) -> &[T] {
        &self.entity_list
    }

    pub fn entities_mut(&mut self) -> &mut Vec<T> {
        &mut self.entity_list
    }

    pub fn append(&mut self, entity: T) {
        self.entity_list.push(entity);
    }

    pub fn clear(&mut self) {
        self.entity_list.clear();
    }

    pub fn len(&self) -> usize {
        self.entity_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_list.is_empty()
    }

    /// Entities from the last index down to the first.
    pub fn iter(&self) -> std::iter::Rev<std::slice::Iter<'_, T>> {
        self.entity_list.iter().rev()
    }
}

impl<T, H> Index<usize> for Api<T, H> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.entity_list[index]
    }
}

impl<T, H> IndexMut<usize> for Api<T, H> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.entity_list[index]
    }
}

impl<'a, T, H> IntoIterator for &'a Api<T, H> {
    type Item = &'a T;
    type IntoIter = std::iter::Rev<std::slice::Iter<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parse a JSON array of objects into entities; all or nothing.
fn parse_entity_array<T: Jsonable>(data: &[u8]) -> Result<Vec<T>> {
    let value: Value = serde_json::from_slice(data).map_err(ApiError::Deserialization)?;
    let Value::Array(items) = value else {
        return Err(ApiError::NotAnArray);
    };

    items
        .iter()
        .map(|item| {
            let Value::Object(map) = item else {
                return Err(ApiError::NotAnObject);
            };
            let mut entity = T::create_instance();
            entity.read_json_map(map)?;
            Ok(entity)
        })
        .collect()
}
