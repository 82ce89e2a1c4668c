use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::domains::message::{
    NodeMessage, NodeMessageData, NodeMessageType, TeamMessagePayload,
};
use crate::error::{PokerNodeError, Result};

pub const MESSAGE_TYPE_HEADER: &str = "MessageType";
pub const MESSAGE_SUBTYPE_HEADER: &str = "MessageSubtype";
pub const SENDER_ID_HEADER: &str = "SenderId";
pub const RECIPIENT_ID_HEADER: &str = "RecipientId";

const MEMBER_CHANGED_SUBTYPE: &str = "ScrumTeamMemberMessage";
const MEMBER_ESTIMATION_SUBTYPE: &str = "ScrumTeamMemberEstimationMessage";

/// Immutable header record attached to an encoded message. Converts
/// losslessly to and from the string attribute bag used by the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireHeaders {
    pub message_type: String,
    pub message_subtype: Option<String>,
    pub sender_id: String,
    pub recipient_id: String,
}

impl WireHeaders {
    pub fn to_attributes(&self) -> HashMap<String, String> {
        let mut attributes = HashMap::new();
        attributes.insert(MESSAGE_TYPE_HEADER.to_string(), self.message_type.clone());
        if let Some(subtype) = &self.message_subtype {
            attributes.insert(MESSAGE_SUBTYPE_HEADER.to_string(), subtype.clone());
        }
        attributes.insert(SENDER_ID_HEADER.to_string(), self.sender_id.clone());
        attributes.insert(RECIPIENT_ID_HEADER.to_string(), self.recipient_id.clone());
        attributes
    }

    /// Recovers headers from a bus attribute bag. `MessageType` is required;
    /// a missing sender or recipient maps to the empty string (broadcast).
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Result<Self> {
        let message_type = attributes
            .get(MESSAGE_TYPE_HEADER)
            .ok_or_else(|| PokerNodeError::MissingHeader(MESSAGE_TYPE_HEADER.to_string()))?
            .clone();
        Ok(Self {
            message_type,
            message_subtype: attributes.get(MESSAGE_SUBTYPE_HEADER).cloned(),
            sender_id: attributes.get(SENDER_ID_HEADER).cloned().unwrap_or_default(),
            recipient_id: attributes
                .get(RECIPIENT_ID_HEADER)
                .cloned()
                .unwrap_or_default(),
        })
    }
}

/// Transport-neutral form of a node message: an opaque byte body plus
/// string-valued headers.
#[derive(Debug, Clone, PartialEq)]
pub struct WireMessage {
    pub body: Vec<u8>,
    pub headers: WireHeaders,
}

/// Bidirectional, lossless translation between [`NodeMessage`] envelopes and
/// [`WireMessage`]s. Pure and synchronous; safe to call from any task.
pub struct MessageCodec;

impl MessageCodec {
    pub fn encode(message: &NodeMessage) -> Result<WireMessage> {
        let body = match &message.data {
            None => Vec::new(),
            Some(NodeMessageData::SerializedTeam(text))
                if message.message_type.carries_raw_text() =>
            {
                text.clone().into_bytes()
            }
            Some(data) if message.message_type.carries_raw_text() => {
                return Err(PokerNodeError::Serialization(format!(
                    "{} carries pre-serialized text, got {}",
                    message.message_type.as_str(),
                    data.subtype_name()
                )));
            }
            Some(data) => Self::serialize_structured(message.message_type, data)?,
        };

        let headers = WireHeaders {
            message_type: message.message_type.as_str().to_string(),
            message_subtype: message
                .data
                .as_ref()
                .map(|data| data.subtype_name().to_string()),
            sender_id: message.sender_node_id.clone(),
            recipient_id: message.recipient_node_id.clone(),
        };

        Ok(WireMessage { body, headers })
    }

    pub fn decode(wire: &WireMessage) -> Result<NodeMessage> {
        let message_type = NodeMessageType::parse(&wire.headers.message_type)?;
        let mut message = NodeMessage::new(message_type);
        message.sender_node_id = wire.headers.sender_id.clone();
        message.recipient_node_id = wire.headers.recipient_id.clone();
        message.data = Self::decode_body(
            message_type,
            wire.headers.message_subtype.as_deref(),
            &wire.body,
        )?;
        Ok(message)
    }

    /// Serializes a structured payload, rejecting variants the message type
    /// cannot carry. Raw-text types never reach this point.
    fn serialize_structured(
        message_type: NodeMessageType,
        data: &NodeMessageData,
    ) -> Result<Vec<u8>> {
        let raw = match (message_type, data) {
            (
                NodeMessageType::ScrumTeamMessage,
                NodeMessageData::TeamMessage(payload),
            ) => match payload {
                TeamMessagePayload::Base(inner) => serde_json::to_vec(inner),
                TeamMessagePayload::MemberChanged(inner) => serde_json::to_vec(inner),
                TeamMessagePayload::MemberEstimation(inner) => serde_json::to_vec(inner),
            },
            (
                NodeMessageType::TeamList | NodeMessageType::RequestTeams,
                NodeMessageData::TeamList(names),
            ) => serde_json::to_vec(names),
            (message_type, data) => {
                return Err(PokerNodeError::Serialization(format!(
                    "{} cannot carry {}",
                    message_type.as_str(),
                    data.subtype_name()
                )));
            }
        };
        raw.map_err(|e| PokerNodeError::Serialization(e.to_string()))
    }

    fn decode_body(
        message_type: NodeMessageType,
        subtype: Option<&str>,
        body: &[u8],
    ) -> Result<Option<NodeMessageData>> {
        match message_type {
            NodeMessageType::ScrumTeamMessage => {
                if body.is_empty() {
                    return Ok(None);
                }
                let payload = Self::decode_team_message(subtype, body)?;
                Ok(Some(NodeMessageData::TeamMessage(payload)))
            }
            NodeMessageType::TeamCreated | NodeMessageType::InitializeTeam => {
                let text = std::str::from_utf8(body)
                    .map_err(|e| PokerNodeError::MalformedBody(e.to_string()))?;
                Ok(Some(NodeMessageData::SerializedTeam(text.to_string())))
            }
            NodeMessageType::TeamList => {
                if body.is_empty() {
                    return Ok(Some(NodeMessageData::TeamList(Vec::new())));
                }
                Ok(Some(NodeMessageData::TeamList(Self::parse_json(body)?)))
            }
            NodeMessageType::RequestTeams => {
                if body.is_empty() {
                    return Ok(None);
                }
                Ok(Some(NodeMessageData::TeamList(Self::parse_json(body)?)))
            }
        }
    }

    /// Unknown subtypes degrade to the base shape so that a node running an
    /// older protocol version can still consume events from a newer one.
    fn decode_team_message(subtype: Option<&str>, body: &[u8]) -> Result<TeamMessagePayload> {
        let subtype = subtype.unwrap_or_default();
        let payload = if subtype.eq_ignore_ascii_case(MEMBER_CHANGED_SUBTYPE) {
            TeamMessagePayload::MemberChanged(Self::parse_json(body)?)
        } else if subtype.eq_ignore_ascii_case(MEMBER_ESTIMATION_SUBTYPE) {
            TeamMessagePayload::MemberEstimation(Self::parse_json(body)?)
        } else {
            TeamMessagePayload::Base(Self::parse_json(body)?)
        };
        Ok(payload)
    }

    fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
        serde_json::from_slice(body).map_err(|e| PokerNodeError::MalformedBody(e.to_string()))
    }
}
