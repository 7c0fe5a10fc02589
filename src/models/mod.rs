use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub comment: Option<String>,
    pub voting_user_id: Uuid,
    pub voting_user_name: String,
    pub voted_user_id: Uuid,
    pub voted_user_name: String,
    pub nomination: Nomination,
}

/// Payload for casting a vote. The id and timestamp are stamped server-side,
/// never accepted from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVote {
    pub voting_user_id: Uuid,
    pub voted_user_id: Uuid,
    pub nomination: Nomination,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nomination {
    TeamPlayer,
    TechnicalReferent,
    KeyPlayer,
    Motivator,
    Funny,
}

impl Nomination {
    /// Declaration order, which is also the order categories appear in reports.
    pub const ALL: [Nomination; 5] = [
        Nomination::TeamPlayer,
        Nomination::TechnicalReferent,
        Nomination::KeyPlayer,
        Nomination::Motivator,
        Nomination::Funny,
    ];

    /// Display label for the category. A static lookup rather than a stored
    /// field, so cached rows can never go stale.
    pub fn label(&self) -> &'static str {
        match self {
            Nomination::TeamPlayer => "Team Player",
            Nomination::TechnicalReferent => "Technical Referent",
            Nomination::KeyPlayer => "Key Player",
            Nomination::Motivator => "Motivator",
            Nomination::Funny => "Funny",
        }
    }

    /// Storage key used in the votes table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Nomination::TeamPlayer => "team_player",
            Nomination::TechnicalReferent => "technical_referent",
            Nomination::KeyPlayer => "key_player",
            Nomination::Motivator => "motivator",
            Nomination::Funny => "funny",
        }
    }

    pub fn parse(s: &str) -> Option<Nomination> {
        match s {
            "team_player" => Some(Nomination::TeamPlayer),
            "technical_referent" => Some(Nomination::TechnicalReferent),
            "key_player" => Some(Nomination::KeyPlayer),
            "motivator" => Some(Nomination::Motivator),
            "funny" => Some(Nomination::Funny),
            _ => None,
        }
    }
}

impl Vote {
    /// Build a vote from a submission, stamping the id and timestamp. This is
    /// the only place either is assigned.
    pub fn new(payload: NewVote, voting_user_name: String, voted_user_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            // Second granularity, matching what the store keeps.
            created_at: Utc::now().trunc_subsecs(0),
            comment: payload.comment,
            voting_user_id: payload.voting_user_id,
            voting_user_name,
            voted_user_id: payload.voted_user_id,
            voted_user_name,
            nomination: payload.nomination,
        }
    }
}
