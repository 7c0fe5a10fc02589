use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, migrate::MigrateDatabase};
use std::env;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Nomination, User, Vote};

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new() -> Result<Self, AppError> {
        // Get database URL from environment or use a default
        let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:kudos.db".to_string());
        Self::connect(&db_url).await
    }

    pub async fn connect(db_url: &str) -> Result<Self, AppError> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    // Initialize the database schema
    async fn init_schema(pool: &SqlitePool) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                is_admin BOOLEAN NOT NULL DEFAULT FALSE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS votes (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                comment TEXT,
                voting_user_id TEXT NOT NULL,
                voting_user_name TEXT NOT NULL,
                voted_user_id TEXT NOT NULL,
                voted_user_name TEXT NOT NULL,
                nomination TEXT NOT NULL,
                FOREIGN KEY (voting_user_id) REFERENCES users(id),
                FOREIGN KEY (voted_user_id) REFERENCES users(id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // The validator checks the one-vote-per-voter/month/category rule over
        // a snapshot; this index is the serialization point that closes the
        // race between two submissions passing validation concurrently.
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS votes_voter_period_nomination
            ON votes (voting_user_id, nomination, strftime('%Y-%m', created_at));
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    // ---- user store ----

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, is_admin
            FROM users
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(user_from_row).collect()
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, is_admin
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, is_admin
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    // Users are created externally (seeding); there is no transport surface
    // for this.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, is_admin)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.is_admin)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, "a user with this email already exists"))?;

        Ok(())
    }

    // ---- vote store ----

    pub async fn list_votes(&self) -> Result<Vec<Vote>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, comment, voting_user_id, voting_user_name,
                   voted_user_id, voted_user_name, nomination
            FROM votes
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(vote_from_row).collect()
    }

    pub async fn get_vote(&self, id: Uuid) -> Result<Option<Vote>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, created_at, comment, voting_user_id, voting_user_name,
                   voted_user_id, voted_user_name, nomination
            FROM votes
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(vote_from_row).transpose()
    }

    pub async fn insert_vote(&self, vote: &Vote) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO votes (id, created_at, comment, voting_user_id, voting_user_name,
                               voted_user_id, voted_user_name, nomination)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(vote.id.to_string())
        .bind(encode_timestamp(&vote.created_at))
        .bind(&vote.comment)
        .bind(vote.voting_user_id.to_string())
        .bind(&vote.voting_user_name)
        .bind(vote.voted_user_id.to_string())
        .bind(&vote.voted_user_name)
        .bind(vote.nomination.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            conflict_or_db(
                e,
                "a concurrent submission already stored this voter/period/category vote",
            )
        })?;

        Ok(())
    }

    /// Full replacement by id. A stale update (zero rows touched) is
    /// re-checked once: if the vote is gone the caller gets NotFound,
    /// otherwise a conflict to retry. Never silently overwrites.
    pub async fn replace_vote(&self, vote: &Vote) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE votes
            SET created_at = ?, comment = ?, voting_user_id = ?, voting_user_name = ?,
                voted_user_id = ?, voted_user_name = ?, nomination = ?
            WHERE id = ?
            "#,
        )
        .bind(encode_timestamp(&vote.created_at))
        .bind(&vote.comment)
        .bind(vote.voting_user_id.to_string())
        .bind(&vote.voting_user_name)
        .bind(vote.voted_user_id.to_string())
        .bind(&vote.voted_user_name)
        .bind(vote.nomination.as_str())
        .bind(vote.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, "replacement clashes with an existing vote"))?;

        if result.rows_affected() == 0 {
            return match self.get_vote(vote.id).await? {
                None => Err(AppError::NotFound("vote")),
                Some(_) => Err(AppError::Conflict(
                    "vote was modified concurrently, retry the update".to_string(),
                )),
            };
        }

        Ok(())
    }

    /// Delete by id, returning the deleted vote.
    pub async fn delete_vote(&self, id: Uuid) -> Result<Option<Vote>, AppError> {
        let Some(vote) = self.get_vote(id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM votes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(Some(vote))
    }
}

fn conflict_or_db(e: sqlx::Error, message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(e),
    }
}

// Stored without sub-second noise so SQLite's date functions can index it.
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn decode_timestamp(s: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Decode(format!("bad timestamp '{}': {}", s, e)))
}

fn decode_uuid(s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s).map_err(|e| AppError::Decode(format!("bad uuid '{}': {}", s, e)))
}

fn user_from_row(row: &SqliteRow) -> Result<User, AppError> {
    Ok(User {
        id: decode_uuid(&row.get::<String, _>("id"))?,
        name: row.get("name"),
        email: row.get("email"),
        is_admin: row.get("is_admin"),
    })
}

fn vote_from_row(row: &SqliteRow) -> Result<Vote, AppError> {
    let nomination_str = row.get::<String, _>("nomination");
    let nomination = Nomination::parse(&nomination_str)
        .ok_or_else(|| AppError::Decode(format!("unknown nomination '{}'", nomination_str)))?;

    Ok(Vote {
        id: decode_uuid(&row.get::<String, _>("id"))?,
        created_at: decode_timestamp(&row.get::<String, _>("created_at"))?,
        comment: row.get("comment"),
        voting_user_id: decode_uuid(&row.get::<String, _>("voting_user_id"))?,
        voting_user_name: row.get("voting_user_name"),
        voted_user_id: decode_uuid(&row.get::<String, _>("voted_user_id"))?,
        voted_user_name: row.get("voted_user_name"),
        nomination,
    })
}
