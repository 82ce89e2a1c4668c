use tokio::sync::Mutex;
use tracing::debug;

use crate::domains::team::{
    Estimation, EstimationParticipantStatus, EstimationResultItem, ReconnectTeamResult, ScrumTeam,
    TeamState,
};
use crate::error::{PokerNodeError, Result};

/// Local client-side view of one team session. Created on join or reconnect,
/// mutated in place by later domain events, dropped when the user leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSession {
    pub team_name: String,
    pub username: String,
    pub is_scrum_master: bool,
    pub scrum_master_name: Option<String>,
    /// Member names, sorted by name. The snapshot's ordering is not kept;
    /// sorting keeps repeated initializations byte-for-byte identical.
    pub members: Vec<String>,
    /// Observer names, sorted the same way as `members`.
    pub observers: Vec<String>,
    pub state: TeamState,
    pub available_estimations: Vec<Estimation>,
    pub selected_estimation: Option<Estimation>,
    pub estimation_result: Option<Vec<EstimationResultItem>>,
    pub estimation_participants: Option<Vec<EstimationParticipantStatus>>,
    /// Id of the last team message applied to this view.
    pub last_message_id: i64,
}

/// Owns the session slot and (re)builds it from server snapshots.
///
/// Initialization is atomic: the new view is built completely before the
/// slot is touched, so a failure or cancellation at any await point leaves
/// the prior state intact. The slot mutex also serializes concurrent
/// initialization attempts.
pub struct SessionController {
    session: Mutex<Option<TeamSession>>,
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            session: Mutex::new(None),
        }
    }

    /// Builds the session view from a fresh-join snapshot and binds
    /// `username` as the local participant.
    pub async fn initialize_from_snapshot(&self, team: ScrumTeam, username: &str) -> Result<()> {
        let session = build_session(&team, username, 0, None)?;
        debug!(team = %session.team_name, user = %session.username, "initialized session from snapshot");
        let mut slot = self.session.lock().await;
        *slot = Some(session);
        Ok(())
    }

    /// Rebuilds the session view after a dropped connection. State drift that
    /// happened while disconnected is reconciled from the snapshot; the
    /// locally selected estimation is only restored while the round is still
    /// open, and the last observed message id never moves backwards.
    pub async fn initialize_from_reconnect(
        &self,
        reconnect: ReconnectTeamResult,
        username: &str,
    ) -> Result<()> {
        let selected = match reconnect.scrum_team.state {
            TeamState::EstimationInProgress => reconnect.selected_estimation,
            _ => None,
        };
        let mut session = build_session(
            &reconnect.scrum_team,
            username,
            reconnect.last_message_id,
            selected,
        )?;
        debug!(team = %session.team_name, user = %session.username, "initialized session from reconnect");

        let mut slot = self.session.lock().await;
        if let Some(prior) = slot.as_ref() {
            if prior.team_name == session.team_name
                && prior.username.eq_ignore_ascii_case(&session.username)
            {
                session.last_message_id = session.last_message_id.max(prior.last_message_id);
            }
        }
        *slot = Some(session);
        Ok(())
    }

    /// Snapshot of the current session, if one is active.
    pub async fn session(&self) -> Option<TeamSession> {
        self.session.lock().await.clone()
    }

    pub async fn leave(&self) {
        *self.session.lock().await = None;
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

fn build_session(
    team: &ScrumTeam,
    username: &str,
    last_message_id: i64,
    selected_estimation: Option<Estimation>,
) -> Result<TeamSession> {
    if username.trim().is_empty() {
        return Err(PokerNodeError::Runtime(
            "username must not be empty".to_string(),
        ));
    }

    let is_scrum_master = team
        .scrum_master
        .as_ref()
        .is_some_and(|m| m.name.eq_ignore_ascii_case(username));
    let known = is_scrum_master
        || team
            .members
            .iter()
            .any(|m| m.name.eq_ignore_ascii_case(username))
        || team
            .observers
            .iter()
            .any(|m| m.name.eq_ignore_ascii_case(username));
    if !known {
        return Err(PokerNodeError::Runtime(format!(
            "user {username} is not part of team {}",
            team.name
        )));
    }

    let mut members: Vec<String> = team.members.iter().map(|m| m.name.clone()).collect();
    members.sort();
    let mut observers: Vec<String> = team.observers.iter().map(|m| m.name.clone()).collect();
    observers.sort();

    // Result and participant lists only make sense in the matching round
    // state; anything else in the snapshot is stale.
    let estimation_result = if team.state == TeamState::EstimationFinished {
        team.estimation_result.clone()
    } else {
        None
    };
    let estimation_participants = if team.state == TeamState::EstimationInProgress {
        team.estimation_participants.clone()
    } else {
        None
    };

    Ok(TeamSession {
        team_name: team.name.clone(),
        username: username.to_string(),
        is_scrum_master,
        scrum_master_name: team.scrum_master.as_ref().map(|m| m.name.clone()),
        members,
        observers,
        state: team.state,
        available_estimations: team.available_estimations.clone(),
        selected_estimation,
        estimation_result,
        estimation_participants,
        last_message_id,
    })
}
