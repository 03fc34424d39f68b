// src/db/message_repository.rs
// DOCUMENTATION: Direct messages between users

use crate::errors::DomicareError;
use crate::models::{ConversationSummary, Message};
use chrono::Utc;
use sqlx::SqlitePool;

pub struct MessageRepository;

impl MessageRepository {
    pub async fn create(
        pool: &SqlitePool,
        sender_id: i64,
        receiver_id: i64,
        reservation_id: Option<i64>,
        content: &str,
    ) -> Result<Message, DomicareError> {
        let result = sqlx::query(
            r#"
            INSERT INTO messages (sender_id, receiver_id, reservation_id, content, is_read, created_at)
            VALUES ($1, $2, $3, $4, 0, $5)
            "#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(reservation_id)
        .bind(content)
        .bind(Utc::now())
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to store message from {}: {}", sender_id, e);
            DomicareError::DatabaseError(e.to_string())
        })?;

        let message = sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1")
            .bind(result.last_insert_rowid())
            .fetch_one(pool)
            .await?;
        Ok(message)
    }

    /// Both directions of a conversation, oldest first
    pub async fn thread(
        pool: &SqlitePool,
        user_id: i64,
        other_id: i64,
    ) -> Result<Vec<Message>, DomicareError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch thread {} <-> {}: {}", user_id, other_id, e);
            DomicareError::DatabaseError(e.to_string())
        })?;

        Ok(messages)
    }

    /// Mark everything `sender_id` sent to `receiver_id` as read
    pub async fn mark_read(
        pool: &SqlitePool,
        receiver_id: i64,
        sender_id: i64,
    ) -> Result<u64, DomicareError> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = 1 WHERE receiver_id = $1 AND sender_id = $2 AND is_read = 0",
        )
        .bind(receiver_id)
        .bind(sender_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Latest message per counterpart, most recent conversation first
    pub async fn conversations(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<ConversationSummary>, DomicareError> {
        let summaries = sqlx::query_as::<_, ConversationSummary>(
            r#"
            SELECT
                c.counterpart_id,
                u.first_name AS counterpart_first_name,
                u.last_name AS counterpart_last_name,
                m.content AS last_message,
                m.created_at AS last_message_at,
                (
                    SELECT COUNT(*) FROM messages x
                    WHERE x.sender_id = c.counterpart_id
                      AND x.receiver_id = $1
                      AND x.is_read = 0
                ) AS unread_count
            FROM (
                SELECT
                    CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END AS counterpart_id,
                    MAX(id) AS last_id
                FROM messages
                WHERE sender_id = $1 OR receiver_id = $1
                GROUP BY counterpart_id
            ) c
            JOIN messages m ON m.id = c.last_id
            JOIN users u ON u.id = c.counterpart_id
            ORDER BY m.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list conversations for {}: {}", user_id, e);
            DomicareError::DatabaseError(e.to_string())
        })?;

        Ok(summaries)
    }

    pub async fn unread_count(pool: &SqlitePool, user_id: i64) -> Result<i64, DomicareError> {
        let count =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = 0")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
