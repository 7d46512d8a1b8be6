//! Sub-records attached to a message: error descriptors, plugin calls,
//! translations, and text-to-speech output.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Structured error descriptor stored on a message.
///
/// Used both for generation failures (`error`) and plugin failures
/// (`pluginError`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// Machine-readable error kind, e.g. `InvalidProviderAPIKey`.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raw error body returned by the upstream provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ErrorPayload {
    /// Creates an error payload with only a type.
    #[must_use]
    pub fn new(error_type: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: None,
            body: None,
        }
    }

    /// Sets the human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the raw error body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A plugin (tool) invocation recorded on an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginPayload {
    /// Plugin identifier.
    pub identifier: String,
    /// Name of the API the plugin exposes.
    pub api_name: String,
    /// Call arguments, always stored as JSON text.
    pub arguments: String,
    /// Plugin kind, e.g. `default` or `standalone`.
    #[serde(rename = "type")]
    pub plugin_type: String,
}

/// Arguments for a plugin call as supplied by the caller.
///
/// The remote store keeps plugin arguments as text, so structured values are
/// rendered to compact JSON before they are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginArguments {
    /// Pre-encoded argument text, sent verbatim.
    Raw(String),
    /// Structured arguments, encoded as a JSON object.
    Structured(Map<String, Value>),
}

impl PluginArguments {
    /// Returns the text form stored by the remote side.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::message::domain::PluginArguments;
    /// use serde_json::json;
    ///
    /// let raw = PluginArguments::from("city=Paris");
    /// assert_eq!(raw.into_text(), "city=Paris");
    ///
    /// let map = json!({"a": 1}).as_object().cloned().unwrap_or_default();
    /// assert_eq!(PluginArguments::Structured(map).into_text(), r#"{"a":1}"#);
    /// ```
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Raw(text) => text,
            Self::Structured(map) => Value::Object(map).to_string(),
        }
    }
}

impl From<String> for PluginArguments {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<&str> for PluginArguments {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_owned())
    }
}

impl From<Map<String, Value>> for PluginArguments {
    fn from(value: Map<String, Value>) -> Self {
        Self::Structured(value)
    }
}

/// Translation of a message's content. All fields are optional so the
/// record doubles as a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    /// Detected or declared source language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Target language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Translated text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Text-to-speech output for a message. All fields are optional so the
/// record doubles as a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsRecord {
    /// Digest of the content the audio was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_md5: Option<String>,
    /// Identifier of the stored audio file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Voice used for synthesis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

/// Update for an optional sub-record that can also be removed.
///
/// `Clear` is encoded as the literal boolean `false`, which the remote side
/// reads as "remove this sub-record". `Value` is encoded as the record
/// itself.
///
/// # Examples
///
/// ```
/// use courier::message::domain::{ClearOr, Translation};
///
/// let clear: ClearOr<Translation> = ClearOr::Clear;
/// assert_eq!(serde_json::to_value(&clear).ok(), Some(serde_json::json!(false)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOr<T> {
    /// Remove the sub-record.
    Clear,
    /// Merge the given (possibly partial) record.
    Value(T),
}

impl<T> ClearOr<T> {
    /// Returns `true` for [`ClearOr::Clear`].
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }

    /// Converts to an `Option`, mapping `Clear` to `None`.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Clear => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl<T> From<T> for ClearOr<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: Serialize> Serialize for ClearOr<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Clear => serializer.serialize_bool(false),
            Self::Value(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ClearOr<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            Flag(bool),
            Value(T),
        }

        match Repr::<T>::deserialize(deserializer)? {
            Repr::Flag(false) => Ok(Self::Clear),
            Repr::Flag(true) => Err(D::Error::custom(
                "expected `false` or a record, found `true`",
            )),
            Repr::Value(value) => Ok(Self::Value(value)),
        }
    }
}
