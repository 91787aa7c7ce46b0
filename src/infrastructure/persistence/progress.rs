use crate::domain::entities::ProgressEntry;
use crate::domain::ports::activity_repository::ActivityRepository;
use crate::infrastructure::http::middleware::error::ApiResult;
use crate::infrastructure::persistence::tickets::parse_column;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::Row;

#[async_trait]
impl ActivityRepository for Database {
    async fn list_progress(&self, ticket_id: &str) -> ApiResult<Vec<ProgressEntry>> {
        let rows = sqlx::query(
            "SELECT seq, id, ticket_id, user_id, description, status, created_at
             FROM progress_entries
             WHERE ticket_id = ?
             ORDER BY created_at DESC, seq DESC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            entries.push(ProgressEntry {
                id: row.try_get("id")?,
                ticket_id: row.try_get("ticket_id")?,
                seq: row.try_get("seq")?,
                user_id: row.try_get("user_id")?,
                description: row.try_get("description")?,
                status: parse_column(row, "status")?,
                created_at: row.try_get("created_at")?,
            });
        }

        Ok(entries)
    }
}
