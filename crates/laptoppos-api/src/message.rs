//! Live channel wire messages.
//!
//! Inbound frames are JSON objects tagged by `type`. Only three tags carry
//! meaning for the client; anything else is preserved verbatim so the
//! router can log it without failing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ── MessageType ──────────────────────────────────────────────────────

/// Discriminator of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum MessageType {
    /// Server greeting after the socket opens.
    Connected,
    /// Server accepted the auth handshake.
    AuthSuccess,
    /// A domain resource changed.
    DataUpdate,
    /// Any tag this client does not know about.
    Unknown(String),
}

impl From<String> for MessageType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "connected" => Self::Connected,
            "auth_success" => Self::AuthSuccess,
            "data_update" => Self::DataUpdate,
            _ => Self::Unknown(tag),
        }
    }
}

impl From<MessageType> for String {
    fn from(kind: MessageType) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => f.write_str("connected"),
            Self::AuthSuccess => f.write_str("auth_success"),
            Self::DataUpdate => f.write_str("data_update"),
            Self::Unknown(tag) => f.write_str(tag),
        }
    }
}

// ── Action ───────────────────────────────────────────────────────────

/// What happened to the resource named in a `data_update`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Create,
    Update,
    Delete,
    /// Unrecognised action, kept as sent.
    Other(String),
}

impl From<String> for Action {
    fn from(action: String) -> Self {
        match action.as_str() {
            "create" => Self::Create,
            "update" => Self::Update,
            "delete" => Self::Delete,
            _ => Self::Other(action),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Update => f.write_str("update"),
            Self::Delete => f.write_str("delete"),
            Self::Other(action) => f.write_str(action),
        }
    }
}

// ── InboundMessage ───────────────────────────────────────────────────

/// A message pushed by the server over the live channel.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,

    /// Resource class that changed, e.g. `"products"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,

    /// Opaque payload describing the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Entity id. Servers send both numeric and string ids, so it stays raw.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl InboundMessage {
    /// Parse a text frame.
    pub fn parse(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: text.to_owned(),
        })
    }

    /// Build a `data_update` for `resource`.
    pub fn data_update(resource: impl Into<String>, action: Action) -> Self {
        Self {
            kind: MessageType::DataUpdate,
            resource: Some(resource.into()),
            action: Some(action),
            data: None,
            id: None,
            timestamp: None,
        }
    }
}

// ── AuthMessage ──────────────────────────────────────────────────────

/// Handshake sent once right after the socket opens.
///
/// Serializes as `{"type":"auth","tenantId":"..","userId":".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename = "auth", rename_all = "camelCase")]
pub struct AuthMessage {
    pub tenant_id: String,
    pub user_id: String,
}

impl AuthMessage {
    pub fn new(tenant_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
