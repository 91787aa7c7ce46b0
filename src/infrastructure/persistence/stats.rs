use crate::domain::entities::{Department, TicketStatus};
use crate::domain::ports::stats_repository::StatsRepository;
use crate::infrastructure::http::middleware::error::ApiResult;
use crate::infrastructure::persistence::tickets::parse_column;
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::Row;

#[async_trait]
impl StatsRepository for Database {
    async fn count_assigned_by_status(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> ApiResult<Vec<(TicketStatus, i64)>> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) as count
             FROM tickets
             WHERE assigned_to = ? AND created_at >= ? AND created_at < ?
             GROUP BY status",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = Vec::with_capacity(rows.len());
        for row in &rows {
            counts.push((parse_column(row, "status")?, row.try_get("count")?));
        }
        Ok(counts)
    }

    async fn count_by_department_and_status(
        &self,
        department: Option<Department>,
        start: &str,
        end: &str,
    ) -> ApiResult<Vec<(Department, TicketStatus, i64)>> {
        let rows = match department {
            Some(department) => {
                sqlx::query(
                    "SELECT department, status, COUNT(*) as count
                     FROM tickets
                     WHERE department = ? AND created_at >= ? AND created_at < ?
                     GROUP BY department, status",
                )
                .bind(department.as_str())
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT department, status, COUNT(*) as count
                     FROM tickets
                     WHERE created_at >= ? AND created_at < ?
                     GROUP BY department, status",
                )
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut counts = Vec::with_capacity(rows.len());
        for row in &rows {
            counts.push((
                parse_column(row, "department")?,
                parse_column(row, "status")?,
                row.try_get("count")?,
            ));
        }
        Ok(counts)
    }
}
