//! Inbound stream messages.
//!
//! Every frame the server sends is one JSON object discriminated by its
//! `type` field. Decoding happens in two passes: the frame is parsed as a
//! generic JSON value to read the discriminator, then the payload of a known
//! kind is decoded into its typed form. Kinds this client does not know about
//! decode to [`ServerMessage::Unknown`] so newer servers stay compatible.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ModelError, Result};
use crate::opportunity::Opportunity;

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// The server accepted the query and echoes it back.
    Ack { query: String },
    /// A pipeline node finished; may carry a fresh result snapshot.
    Step { node: String, state: StepState },
    /// Terminal success.
    Final { state: FinalState },
    /// Terminal failure.
    Error { message: Option<String> },
    /// A message kind this client does not handle.
    Unknown { kind: Option<String> },
}

impl ServerMessage {
    /// Decode one text frame.
    ///
    /// # Errors
    ///
    /// Returns an error when the frame is not JSON, is not an object, or is a
    /// known kind whose payload does not have the expected shape.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(ModelError::NotAnObject);
        }
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_owned);
        match kind.as_deref() {
            Some("ack") => decode::<AckPayload>("ack", value).map(|p| Self::Ack { query: p.query }),
            Some("step") => decode::<StepPayload>("step", value).map(|p| Self::Step {
                node: p.node,
                state: p.state,
            }),
            Some("final") => {
                decode::<FinalPayload>("final", value).map(|p| Self::Final { state: p.state })
            }
            Some("error") => decode::<ErrorPayload>("error", value).map(|p| Self::Error {
                message: p.text(),
            }),
            _ => Ok(Self::Unknown { kind }),
        }
    }

    /// The discriminator as sent on the wire.
    pub fn kind(&self) -> &str {
        match self {
            Self::Ack { .. } => "ack",
            Self::Step { .. } => "step",
            Self::Final { .. } => "final",
            Self::Error { .. } => "error",
            Self::Unknown { kind } => kind.as_deref().unwrap_or("<none>"),
        }
    }
}

/// Partial pipeline state attached to a `step` message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StepState {
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<String>,
    #[serde(default)]
    pub opportunities: Option<Vec<Opportunity>>,
}

impl StepState {
    /// The most recent progress line, if any.
    pub fn last_step(&self) -> Option<&str> {
        self.steps.last().map(String::as_str)
    }
}

/// Accumulated pipeline state attached to a `final` message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FinalState {
    #[serde(default)]
    pub opportunities: Option<Vec<Opportunity>>,
    /// Backend-rendered markdown report of the results.
    #[serde(default)]
    pub result_markdown: Option<String>,
}

#[derive(Deserialize)]
struct AckPayload {
    query: String,
}

#[derive(Deserialize)]
struct StepPayload {
    node: String,
    #[serde(default, deserialize_with = "null_as_default")]
    state: StepState,
}

#[derive(Deserialize)]
struct FinalPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    state: FinalState,
}

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<Value>,
}

impl ErrorPayload {
    fn text(self) -> Option<String> {
        match self.message? {
            Value::String(text) => Some(text),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

fn decode<T: DeserializeOwned>(kind: &'static str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| ModelError::malformed(kind, &err))
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
