use crate::domain::entities::ChatMessage;
use crate::domain::ports::chat_repository::ChatRepository;
use crate::infrastructure::http::middleware::error::ApiResult;
use crate::infrastructure::persistence::tickets::optional_column;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::any::AnyRow;
use sqlx::Row;

fn row_to_message(row: &AnyRow) -> ApiResult<ChatMessage> {
    Ok(ChatMessage {
        id: row.try_get("id")?,
        ticket_id: row.try_get("ticket_id")?,
        seq: row.try_get("seq")?,
        user_id: row.try_get("user_id")?,
        content: optional_column(row, "content"),
        attachment_url: optional_column(row, "attachment_url"),
        attachment_mime_type: optional_column(row, "attachment_mime_type"),
        attachment_name: optional_column(row, "attachment_name"),
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ChatRepository for Database {
    async fn append_chat_message(&self, message: &ChatMessage) -> ApiResult<ChatMessage> {
        let row = sqlx::query(
            "INSERT INTO chat_messages (id, ticket_id, user_id, content, attachment_url,
                                        attachment_mime_type, attachment_name, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING seq",
        )
        .bind(&message.id)
        .bind(&message.ticket_id)
        .bind(&message.user_id)
        .bind(&message.content)
        .bind(&message.attachment_url)
        .bind(&message.attachment_mime_type)
        .bind(&message.attachment_name)
        .bind(&message.created_at)
        .fetch_one(&self.pool)
        .await?;

        let mut stored = message.clone();
        stored.seq = row.try_get("seq")?;
        Ok(stored)
    }

    async fn list_chat_messages(&self, ticket_id: &str) -> ApiResult<Vec<ChatMessage>> {
        let rows = sqlx::query(
            "SELECT seq, id, ticket_id, user_id, content, attachment_url,
                    attachment_mime_type, attachment_name, created_at
             FROM chat_messages
             WHERE ticket_id = ?
             ORDER BY seq ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_message).collect()
    }

    async fn count_chat_messages(&self, ticket_id: &str) -> ApiResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM chat_messages WHERE ticket_id = ?")
            .bind(ticket_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("count")?)
    }
}
