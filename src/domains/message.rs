use serde::{Deserialize, Serialize};

use crate::error::{PokerNodeError, Result};

/// Kinds of messages exchanged between nodes of the scaled application.
///
/// The canonical names are part of the wire contract and must match exactly
/// across node versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeMessageType {
    ScrumTeamMessage,
    TeamCreated,
    InitializeTeam,
    TeamList,
    RequestTeams,
}

impl NodeMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScrumTeamMessage => "ScrumTeamMessage",
            Self::TeamCreated => "TeamCreated",
            Self::InitializeTeam => "InitializeTeam",
            Self::TeamList => "TeamList",
            Self::RequestTeams => "RequestTeams",
        }
    }

    /// Parses a canonical wire name. Case-sensitive: an unrecognized name
    /// means a protocol mismatch between nodes and must be surfaced.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "ScrumTeamMessage" => Ok(Self::ScrumTeamMessage),
            "TeamCreated" => Ok(Self::TeamCreated),
            "InitializeTeam" => Ok(Self::InitializeTeam),
            "TeamList" => Ok(Self::TeamList),
            "RequestTeams" => Ok(Self::RequestTeams),
            other => Err(PokerNodeError::UnknownMessageType(other.to_string())),
        }
    }

    /// True when the payload is pre-serialized opaque text that must pass
    /// through the codec verbatim instead of a structured body.
    pub fn carries_raw_text(&self) -> bool {
        matches!(self, Self::TeamCreated | Self::InitializeTeam)
    }
}

/// Domain event about a Scrum team. Base shape; subtypes carry member detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrumTeamMessage {
    pub team_name: String,
    pub message_type: String,
}

/// Team event about a member joining, leaving or changing role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrumTeamMemberMessage {
    pub team_name: String,
    pub message_type: String,
    pub member_type: String,
    pub member_name: String,
}

/// Team event carrying a member's submitted estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrumTeamMemberEstimationMessage {
    pub team_name: String,
    pub message_type: String,
    pub member_name: String,
    pub estimation: Option<f64>,
}

/// Concrete shape of a `ScrumTeamMessage` payload. The variant tag travels in
/// the `MessageSubtype` header; the body itself never repeats it.
#[derive(Debug, Clone, PartialEq)]
pub enum TeamMessagePayload {
    Base(ScrumTeamMessage),
    MemberChanged(ScrumTeamMemberMessage),
    MemberEstimation(ScrumTeamMemberEstimationMessage),
}

impl TeamMessagePayload {
    /// Declared shape name used as the `MessageSubtype` header value.
    /// Matched case-insensitively on decode.
    pub fn subtype_name(&self) -> &'static str {
        match self {
            Self::Base(_) => "ScrumTeamMessage",
            Self::MemberChanged(_) => "ScrumTeamMemberMessage",
            Self::MemberEstimation(_) => "ScrumTeamMemberEstimationMessage",
        }
    }
}

/// Payload of a node message. Which variants are valid depends on the
/// envelope's `NodeMessageType`; the codec enforces that on encode.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeMessageData {
    /// A domain event about a team.
    TeamMessage(TeamMessagePayload),
    /// Pre-serialized team state, carried verbatim by `TeamCreated` and
    /// `InitializeTeam`.
    SerializedTeam(String),
    /// Names of all teams known to the sending node.
    TeamList(Vec<String>),
}

impl NodeMessageData {
    pub fn subtype_name(&self) -> &'static str {
        match self {
            Self::TeamMessage(payload) => payload.subtype_name(),
            Self::SerializedTeam(_) => "SerializedTeam",
            Self::TeamList(_) => "TeamList",
        }
    }
}

/// Envelope for one cross-node message. No validation happens at
/// construction; the codec validates payload/type consistency on encode.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMessage {
    pub message_type: NodeMessageType,
    pub sender_node_id: String,
    /// Empty means broadcast to all nodes.
    pub recipient_node_id: String,
    pub data: Option<NodeMessageData>,
}

impl NodeMessage {
    pub fn new(message_type: NodeMessageType) -> Self {
        Self {
            message_type,
            sender_node_id: String::new(),
            recipient_node_id: String::new(),
            data: None,
        }
    }

    pub fn is_broadcast(&self) -> bool {
        self.recipient_node_id.is_empty()
    }
}
