use log::{info, warn};
use uuid::Uuid;

use crate::db::Database;
use crate::error::AppError;
use crate::models::{NewVote, Nomination, User, Vote};

/// Demo roster and votes for local development. Invoked explicitly from
/// startup (never from a read path), idempotent: anything already present is
/// left untouched. Timestamps are stamped at seed time, so the demo report
/// period is the current month.
pub async fn seed_demo_data(db: &Database) -> Result<(), AppError> {
    seed_users(db).await?;
    seed_votes(db).await
}

async fn seed_users(db: &Database) -> Result<(), AppError> {
    if !db.list_users().await?.is_empty() {
        info!("seed: users already present, leaving roster untouched");
        return Ok(());
    }

    let roster = [
        ("Gregg Popovich", "gregg@popovich.com", true),
        ("Manu Ginobili", "manu@ginobili.com", false),
        ("Luis Scola", "luifa@scola.com", false),
        ("Andres Nocioni", "chapu@nocioni.com", false),
        ("Facundo Campazzo", "facu@campazzo.com", false),
    ];

    for (name, email, is_admin) in roster {
        db.insert_user(&User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            is_admin,
        })
        .await?;
    }

    info!("seed: inserted {} demo users", roster.len());
    Ok(())
}

async fn seed_votes(db: &Database) -> Result<(), AppError> {
    if !db.list_votes().await?.is_empty() {
        info!("seed: votes already present, skipping demo votes");
        return Ok(());
    }

    // Roster members are matched by email, the stable natural key.
    let Some(ginobili) = db.find_user_by_email("manu@ginobili.com").await? else {
        warn!("seed: demo roster not found, skipping demo votes");
        return Ok(());
    };
    let Some(scola) = db.find_user_by_email("luifa@scola.com").await? else {
        warn!("seed: demo roster not found, skipping demo votes");
        return Ok(());
    };
    let Some(nocioni) = db.find_user_by_email("chapu@nocioni.com").await? else {
        warn!("seed: demo roster not found, skipping demo votes");
        return Ok(());
    };
    let Some(campazzo) = db.find_user_by_email("facu@campazzo.com").await? else {
        warn!("seed: demo roster not found, skipping demo votes");
        return Ok(());
    };

    let ballots = [
        (&campazzo, &ginobili, Nomination::KeyPlayer, None),
        (&campazzo, &scola, Nomination::TeamPlayer, None),
        (&campazzo, &nocioni, Nomination::Funny, Some("never a dull retro")),
        (&nocioni, &campazzo, Nomination::Funny, None),
        (&nocioni, &ginobili, Nomination::KeyPlayer, None),
        (&nocioni, &scola, Nomination::TeamPlayer, Some("carried the release")),
        (&ginobili, &nocioni, Nomination::Funny, None),
    ];

    for (voter, votee, nomination, comment) in ballots {
        let vote = Vote::new(
            NewVote {
                voting_user_id: voter.id,
                voted_user_id: votee.id,
                nomination,
                comment: comment.map(str::to_string),
            },
            voter.name.clone(),
            votee.name.clone(),
        );
        db.insert_vote(&vote).await?;
    }

    info!("seed: inserted {} demo votes", ballots.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}/test.db", dir.path().display());
        let db = Database::connect(&url).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn seeds_roster_and_votes() {
        let (db, _dir) = test_db().await;
        seed_demo_data(&db).await.unwrap();

        let users = db.list_users().await.unwrap();
        assert_eq!(users.len(), 5);
        assert_eq!(users.iter().filter(|u| u.is_admin).count(), 1);
        assert_eq!(db.list_votes().await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn seeding_twice_changes_nothing() {
        let (db, _dir) = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let before = db.list_votes().await.unwrap();

        seed_demo_data(&db).await.unwrap();
        assert_eq!(db.list_users().await.unwrap().len(), 5);
        assert_eq!(db.list_votes().await.unwrap(), before);
    }

    #[tokio::test]
    async fn seeded_votes_satisfy_the_validator() {
        let (db, _dir) = test_db().await;
        seed_demo_data(&db).await.unwrap();

        let users = db.list_users().await.unwrap();
        let votes = db.list_votes().await.unwrap();
        for (i, vote) in votes.iter().enumerate() {
            let others: Vec<_> = votes
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, v)| v.clone())
                .collect();
            crate::voting::validate::validate(vote, &users, &others).unwrap();
        }
    }
}
