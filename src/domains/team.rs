use serde::{Deserialize, Serialize};

/// Lifecycle state of a team's current estimation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamState {
    Initial,
    EstimationInProgress,
    EstimationFinished,
    EstimationCanceled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub member_type: String,
}

/// One card of the estimation deck. `None` is the "don't know" card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimation {
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResultItem {
    pub member: TeamMember,
    pub estimation: Option<Estimation>,
}

/// Tracks which members have already voted in an in-progress round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationParticipantStatus {
    pub member_name: String,
    pub estimated: bool,
}

/// Full point-in-time view of a team as returned by the server when a user
/// joins. Server-defined shape; this layer only consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrumTeam {
    pub name: String,
    pub scrum_master: Option<TeamMember>,
    #[serde(default)]
    pub members: Vec<TeamMember>,
    #[serde(default)]
    pub observers: Vec<TeamMember>,
    pub state: TeamState,
    #[serde(default)]
    pub available_estimations: Vec<Estimation>,
    #[serde(default)]
    pub estimation_result: Option<Vec<EstimationResultItem>>,
    #[serde(default)]
    pub estimation_participants: Option<Vec<EstimationParticipantStatus>>,
}

/// Snapshot returned when a previously-joined client resumes a dropped
/// connection. Superset of [`ScrumTeam`] carrying resumption metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconnectTeamResult {
    pub scrum_team: ScrumTeam,
    /// Id of the last team message the server has on record for this client.
    pub last_message_id: i64,
    /// Estimation the member had selected before the connection dropped.
    #[serde(default)]
    pub selected_estimation: Option<Estimation>,
}
