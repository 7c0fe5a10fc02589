use thiserror::Error;

use crate::models::{User, Vote};
use crate::voting::Period;

/// Why a vote was turned away. Each variant renders the message the client
/// sees; `Duplicate` carries enough context to point at the exact clash.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoteRejection {
    #[error("no employees exist")]
    NoUsers,

    #[error("voting employee not found")]
    VotingUserNotFound,

    #[error("voted employee not found")]
    VotedUserNotFound,

    #[error("voting and voted employee can't be the same person")]
    SelfVote,

    #[error("{voter} already voted for {nomination} in {year}-{month:02}")]
    Duplicate {
        voter: String,
        year: i32,
        month: u32,
        nomination: String,
    },
}

/// Decide whether `candidate` may be stored, given a consistent snapshot of
/// all users and all existing votes. Checks run in a fixed order and the
/// first failure wins. Pure: the caller stamps the id and timestamp before
/// calling, and persists only on `Ok`.
pub fn validate(candidate: &Vote, users: &[User], votes: &[Vote]) -> Result<(), VoteRejection> {
    if users.is_empty() {
        return Err(VoteRejection::NoUsers);
    }

    let voting_user = users
        .iter()
        .find(|u| u.id == candidate.voting_user_id)
        .ok_or(VoteRejection::VotingUserNotFound)?;

    let voted_user = users
        .iter()
        .find(|u| u.id == candidate.voted_user_id)
        .ok_or(VoteRejection::VotedUserNotFound)?;

    if voting_user.id == voted_user.id {
        return Err(VoteRejection::SelfVote);
    }

    // One vote per (voter, calendar month, category). The voted user is
    // deliberately not part of the key: a voter may nominate two different
    // people in the same category and month, and the second submission wins
    // a rejection only if the category repeats.
    let period = Period::of(&candidate.created_at);

    let duplicate = votes.iter().any(|v| {
        period.contains(&v.created_at)
            && v.voting_user_id == candidate.voting_user_id
            && v.nomination == candidate.nomination
    });

    if duplicate {
        return Err(VoteRejection::Duplicate {
            voter: voting_user.name.clone(),
            year: period.year,
            month: period.month,
            nomination: candidate.nomination.label().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nomination;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            is_admin: false,
        }
    }

    fn vote_at(
        voter: &User,
        votee: &User,
        nomination: Nomination,
        year: i32,
        month: u32,
        day: u32,
    ) -> Vote {
        Vote {
            id: Uuid::new_v4(),
            created_at: Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
            comment: None,
            voting_user_id: voter.id,
            voting_user_name: voter.name.clone(),
            voted_user_id: votee.id,
            voted_user_name: votee.name.clone(),
            nomination,
        }
    }

    #[test]
    fn rejects_when_no_users() {
        let alice = user("Alice");
        let bob = user("Bob");
        let candidate = vote_at(&alice, &bob, Nomination::Funny, 2026, 8, 1);
        assert_eq!(validate(&candidate, &[], &[]), Err(VoteRejection::NoUsers));
    }

    #[test]
    fn rejects_unknown_voting_user() {
        let alice = user("Alice");
        let bob = user("Bob");
        let stranger = user("Stranger");
        let candidate = vote_at(&stranger, &bob, Nomination::Funny, 2026, 8, 1);
        let users = vec![alice, bob];
        assert_eq!(
            validate(&candidate, &users, &[]),
            Err(VoteRejection::VotingUserNotFound)
        );
    }

    #[test]
    fn rejects_unknown_voted_user() {
        let alice = user("Alice");
        let stranger = user("Stranger");
        let candidate = vote_at(&alice, &stranger, Nomination::Funny, 2026, 8, 1);
        let users = vec![alice];
        assert_eq!(
            validate(&candidate, &users, &[]),
            Err(VoteRejection::VotedUserNotFound)
        );
    }

    #[test]
    fn rejects_self_vote() {
        let alice = user("Alice");
        let candidate = vote_at(&alice, &alice, Nomination::KeyPlayer, 2026, 8, 1);
        let users = vec![alice];
        assert_eq!(
            validate(&candidate, &users, &[]),
            Err(VoteRejection::SelfVote)
        );
    }

    #[test]
    fn rejects_duplicate_voter_month_category() {
        let alice = user("Alice");
        let bob = user("Bob");
        let existing = vote_at(&alice, &bob, Nomination::TeamPlayer, 2026, 8, 3);
        let candidate = vote_at(&alice, &bob, Nomination::TeamPlayer, 2026, 8, 20);
        let users = vec![alice.clone(), bob];
        let err = validate(&candidate, &users, &[existing]).unwrap_err();
        assert_eq!(
            err,
            VoteRejection::Duplicate {
                voter: "Alice".to_string(),
                year: 2026,
                month: 8,
                nomination: "Team Player".to_string(),
            }
        );
        assert!(err.to_string().contains("2026-08"));
    }

    #[test]
    fn duplicate_check_ignores_voted_user() {
        // Same voter, month and category but a different votee still clashes.
        let alice = user("Alice");
        let bob = user("Bob");
        let carol = user("Carol");
        let existing = vote_at(&alice, &bob, Nomination::Motivator, 2026, 8, 3);
        let candidate = vote_at(&alice, &carol, Nomination::Motivator, 2026, 8, 4);
        let users = vec![alice, bob, carol];
        assert!(matches!(
            validate(&candidate, &users, &[existing]),
            Err(VoteRejection::Duplicate { .. })
        ));
    }

    #[test]
    fn varying_any_key_field_passes() {
        let alice = user("Alice");
        let bob = user("Bob");
        let carol = user("Carol");
        let existing = vote_at(&alice, &bob, Nomination::TeamPlayer, 2026, 8, 3);
        let users = vec![alice.clone(), bob.clone(), carol.clone()];

        // Different category, same month and voter.
        let other_category = vote_at(&alice, &bob, Nomination::Funny, 2026, 8, 10);
        assert_eq!(validate(&other_category, &users, std::slice::from_ref(&existing)), Ok(()));

        // Different month, same voter and category.
        let other_month = vote_at(&alice, &bob, Nomination::TeamPlayer, 2026, 9, 1);
        assert_eq!(validate(&other_month, &users, std::slice::from_ref(&existing)), Ok(()));

        // Same month in a different year.
        let other_year = vote_at(&alice, &bob, Nomination::TeamPlayer, 2027, 8, 3);
        assert_eq!(validate(&other_year, &users, std::slice::from_ref(&existing)), Ok(()));

        // Different voter, same month and category.
        let other_voter = vote_at(&carol, &bob, Nomination::TeamPlayer, 2026, 8, 3);
        assert_eq!(validate(&other_voter, &users, &[existing]), Ok(()));
    }
}
