//! The JSON-codable entity contract.
//!
//! # Design
//! `Jsonable` is the capability set the client needs from an entity type:
//! the URL segment of its collection, a factory for a default instance, and
//! conversion to and from a JSON object. Entities that already derive serde
//! traits can implement the much smaller `Resource` trait instead and get
//! `Jsonable` through the blanket impl below.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

/// A JSON object as produced and consumed by entities.
pub type JsonMap = Map<String, Value>;

/// An entity managed by an `Api` client.
pub trait Jsonable: Sized {
    /// Path segment of the entity's collection, e.g. `"widgets"`.
    fn url_name() -> &'static str;

    /// A fresh default instance that response data is read into.
    fn create_instance() -> Self;

    fn to_json_map(&self) -> Result<JsonMap>;

    /// Overwrite this entity's fields from a JSON object.
    fn read_json_map(&mut self, map: &JsonMap) -> Result<()>;

    /// Overwrite this entity's fields from a raw JSON body.
    ///
    /// The body must hold a single JSON object.
    fn read_json_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        match serde_json::from_slice::<Value>(bytes).map_err(ApiError::Deserialization)? {
            Value::Object(map) => self.read_json_map(&map),
            _ => Err(ApiError::NotAnObject),
        }
    }
}

/// Shortcut for entities that derive `Serialize` and `Deserialize`.
///
/// ```
/// use jsonable_core::Resource;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// struct Widget {
///     id: String,
///     name: String,
/// }
///
/// impl Resource for Widget {
///     const URL_NAME: &'static str = "widgets";
/// }
/// ```
pub trait Resource: Serialize + DeserializeOwned + Default {
    const URL_NAME: &'static str;
}

impl<R: Resource> Jsonable for R {
    fn url_name() -> &'static str {
        R::URL_NAME
    }

    fn create_instance() -> Self {
        R::default()
    }

    fn to_json_map(&self) -> Result<JsonMap> {
        match serde_json::to_value(self).map_err(ApiError::Serialization)? {
            Value::Object(map) => Ok(map),
            _ => Err(ApiError::NotAnObject),
        }
    }

    fn read_json_map(&mut self, map: &JsonMap) -> Result<()> {
        *self = serde_json::from_value(Value::Object(map.clone()))
            .map_err(ApiError::Deserialization)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: String,
        name: String,
        #[serde(default)]
        tags: Vec<String>,
    }

    impl Resource for Widget {
        const URL_NAME: &'static str = "widgets";
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Counter(u32);

    impl Resource for Counter {
        const URL_NAME: &'static str = "counters";
    }

    #[test]
    fn resource_provides_url_name_and_default() {
        assert_eq!(Widget::url_name(), "widgets");
        assert_eq!(Widget::create_instance(), Widget::default());
    }

    #[test]
    fn map_roundtrip_preserves_fields() {
        let widget = Widget {
            id: "7".to_string(),
            name: "sprocket".to_string(),
            tags: vec!["red".to_string()],
        };
        let map = widget.to_json_map().unwrap();
        assert_eq!(map["name"], "sprocket");

        let mut back = Widget::create_instance();
        back.read_json_map(&map).unwrap();
        assert_eq!(back, widget);
    }

    #[test]
    fn read_json_bytes_parses_object() {
        let mut widget = Widget::create_instance();
        widget
            .read_json_bytes(br#"{"id":"1","name":"a"}"#)
            .unwrap();
        assert_eq!(widget.id, "1");
        assert_eq!(widget.name, "a");
        assert!(widget.tags.is_empty());
    }

    #[test]
    fn read_json_bytes_rejects_array() {
        let mut widget = Widget::create_instance();
        let err = widget.read_json_bytes(b"[]").unwrap_err();
        assert!(matches!(err, ApiError::NotAnObject));
    }

    #[test]
    fn read_json_bytes_rejects_malformed_body() {
        let mut widget = Widget::create_instance();
        let err = widget.read_json_bytes(b"not json").unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn read_json_map_missing_field_leaves_entity_untouched() {
        let mut widget = Widget {
            id: "9".to_string(),
            name: "keep".to_string(),
            tags: Vec::new(),
        };
        let map: JsonMap = serde_json::from_str(r#"{"id":"1"}"#).unwrap();
        assert!(widget.read_json_map(&map).is_err());
        assert_eq!(widget.name, "keep");
    }

    #[test]
    fn non_object_serialization_is_rejected() {
        let err = Counter(3).to_json_map().unwrap_err();
        assert!(matches!(err, ApiError::NotAnObject));
    }
}
