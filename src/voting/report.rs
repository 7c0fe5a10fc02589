use std::collections::BTreeMap;

use uuid::Uuid;

use crate::models::{Nomination, User, Vote};
use crate::voting::{MostVoted, Period, Report};

/// Build the monthly report for `period` from a consistent snapshot of all
/// users and votes. Returns `None` when no vote falls inside the period;
/// callers surface that as a precondition failure rather than fabricating an
/// empty report. Grouping preserves first-encounter order, so ties resolve
/// the same way on every run over the same input ordering.
pub fn aggregate(period: Period, users: &[User], votes: &[Vote]) -> Option<Report> {
    let in_period: Vec<&Vote> = votes
        .iter()
        .filter(|v| period.contains(&v.created_at))
        .collect();

    if in_period.is_empty() {
        return None;
    }

    // Overall winner: group by votee, keep first-encounter order.
    let mut by_votee: Vec<(Uuid, &str, usize)> = Vec::new();
    for vote in &in_period {
        match by_votee.iter().position(|(id, _, _)| *id == vote.voted_user_id) {
            Some(i) => by_votee[i].2 += 1,
            None => by_votee.push((vote.voted_user_id, &vote.voted_user_name, 1)),
        }
    }

    // Strict comparison keeps the first-encountered group on ties.
    let mut winner = &by_votee[0];
    for group in &by_votee[1..] {
        if group.2 > winner.2 {
            winner = group;
        }
    }

    let most_voted = MostVoted {
        id: winner.0,
        name: winner.1.to_string(),
        count: winner.2,
    };

    let registered_employee_count = users.iter().filter(|u| !u.is_admin).count();

    // Per-category winners: group by (votee, category), then rank by count.
    let mut by_votee_nomination: Vec<(Uuid, Nomination, &str, usize)> = Vec::new();
    for vote in &in_period {
        match by_votee_nomination
            .iter()
            .position(|(id, n, _, _)| *id == vote.voted_user_id && *n == vote.nomination)
        {
            Some(i) => by_votee_nomination[i].3 += 1,
            None => by_votee_nomination.push((
                vote.voted_user_id,
                vote.nomination,
                &vote.voted_user_name,
                1,
            )),
        }
    }
    // Stable sort: equal counts stay in first-encounter order.
    by_votee_nomination.sort_by_key(|(_, _, _, count)| std::cmp::Reverse(*count));

    let mut nomination_winners = BTreeMap::new();
    for nomination in Nomination::ALL {
        if let Some((_, _, name, _)) = by_votee_nomination
            .iter()
            .find(|(_, n, _, _)| *n == nomination)
        {
            nomination_winners.insert(name.to_string(), nomination.label().to_string());
        }
    }

    Some(Report {
        most_voted,
        period,
        registered_employee_count,
        nomination_winners,
    })
}
