use crate::domain::entities::{Comment, ProgressEntry, Ticket, TicketFilter};
use crate::domain::ports::ticket_repository::TicketRepository;
use crate::domain::services::state_machine::TicketState;
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};
use crate::infrastructure::persistence::Database;
use crate::shared::utils::timestamp::now_rfc3339;
use async_trait::async_trait;
use sqlx::any::AnyRow;
use sqlx::Row;

const TICKET_COLUMNS: &str = "id, ticket_id, title, department, ticket_type, description, status, \
     priority, accepted, created_by, assigned_to, created_at, updated_at";

pub(crate) fn parse_column<T>(row: &AnyRow, column: &str) -> ApiResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    let raw: String = row.try_get(column)?;
    raw.parse()
        .map_err(|e: String| ApiError::Internal(format!("Corrupt {} column: {}", column, e)))
}

/// Nullable text column. The `Any` driver reports NULL as its own type, so a
/// plain `Option<String>` decode fails instead of yielding `None`.
pub(crate) fn optional_column(row: &AnyRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column).ok().flatten()
}

fn row_to_ticket(row: &AnyRow) -> ApiResult<Ticket> {
    Ok(Ticket {
        id: row.try_get("id")?,
        ticket_id: row.try_get("ticket_id")?,
        title: row.try_get("title")?,
        department: parse_column(row, "department")?,
        ticket_type: row.try_get("ticket_type")?,
        description: row.try_get("description")?,
        status: parse_column(row, "status")?,
        priority: parse_column(row, "priority")?,
        accepted: row.try_get::<i64, _>("accepted")? != 0,
        created_by: row.try_get("created_by")?,
        assigned_to: optional_column(row, "assigned_to"),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_comment(row: &AnyRow) -> ApiResult<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        ticket_id: row.try_get("ticket_id")?,
        seq: row.try_get("seq")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Escape LIKE wildcards so search terms match literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// WHERE clause and its bind values for a listing filter
fn filter_clause(filter: &TicketFilter) -> (String, Vec<String>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut binds: Vec<String> = Vec::new();

    if let Some(department) = filter.department {
        conditions.push("department = ?".to_string());
        binds.push(department.as_str().to_string());
    }
    if let Some(status) = filter.status {
        conditions.push("status = ?".to_string());
        binds.push(status.as_str().to_string());
    }
    if let Some(priority) = filter.priority {
        conditions.push("priority = ?".to_string());
        binds.push(priority.as_str().to_string());
    }
    if let Some(ref assigned_to) = filter.assigned_to {
        conditions.push("assigned_to = ?".to_string());
        binds.push(assigned_to.clone());
    }
    if let Some(ref created_by) = filter.created_by {
        conditions.push("created_by = ?".to_string());
        binds.push(created_by.clone());
    }

    let terms = filter.search_terms();
    if !terms.is_empty() {
        let mut any_term = Vec::with_capacity(terms.len());
        for term in &terms {
            any_term.push(
                "(LOWER(title) LIKE ? ESCAPE '\\' OR LOWER(description) LIKE ? ESCAPE '\\' \
                 OR LOWER(ticket_id) LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
            let pattern = like_pattern(term);
            binds.extend([pattern.clone(), pattern.clone(), pattern]);
        }
        conditions.push(format!("({})", any_term.join(" OR ")));
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), binds)
    }
}

impl Database {
    pub(crate) async fn insert_progress_entry<'e, E>(
        &self,
        executor: E,
        entry: &ProgressEntry,
    ) -> ApiResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Any>,
    {
        sqlx::query(
            "INSERT INTO progress_entries (id, ticket_id, user_id, description, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.id)
        .bind(&entry.ticket_id)
        .bind(&entry.user_id)
        .bind(&entry.description)
        .bind(entry.status.as_str())
        .bind(&entry.created_at)
        .execute(executor)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl TicketRepository for Database {
    async fn create_ticket(&self, ticket: &Ticket, created: &ProgressEntry) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO tickets (id, ticket_id, title, department, ticket_type, description,
                                  status, priority, accepted, created_by, assigned_to,
                                  created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&ticket.id)
        .bind(&ticket.ticket_id)
        .bind(&ticket.title)
        .bind(ticket.department.as_str())
        .bind(&ticket.ticket_type)
        .bind(&ticket.description)
        .bind(ticket.status.as_str())
        .bind(ticket.priority.as_str())
        .bind(ticket.accepted as i64)
        .bind(&ticket.created_by)
        .bind(&ticket.assigned_to)
        .bind(&ticket.created_at)
        .bind(&ticket.updated_at)
        .execute(&mut *tx)
        .await?;

        self.insert_progress_entry(&mut *tx, created).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_ticket(&self, ticket_id: &str) -> ApiResult<Option<Ticket>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tickets WHERE ticket_id = ?",
            TICKET_COLUMNS
        ))
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_ticket).transpose()
    }

    async fn apply_transition(
        &self,
        ticket_id: &str,
        next: &TicketState,
        entry: &ProgressEntry,
    ) -> ApiResult<Option<Ticket>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE tickets
             SET status = ?, accepted = ?, assigned_to = ?, updated_at = ?
             WHERE ticket_id = ?",
        )
        .bind(next.status.as_str())
        .bind(next.accepted as i64)
        .bind(&next.assigned_to)
        .bind(now_rfc3339())
        .bind(ticket_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        self.insert_progress_entry(&mut *tx, entry).await?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM tickets WHERE ticket_id = ?",
            TICKET_COLUMNS
        ))
        .bind(ticket_id)
        .fetch_one(&mut *tx)
        .await?;
        let ticket = row_to_ticket(&row)?;

        tx.commit().await?;
        Ok(Some(ticket))
    }

    async fn list_tickets(
        &self,
        filter: &TicketFilter,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<Ticket>, i64)> {
        let (where_clause, binds) = filter_clause(filter);

        let count_sql = format!("SELECT COUNT(*) as count FROM tickets{}", where_clause);
        let mut count_query = sqlx::query(&count_sql);
        for value in &binds {
            count_query = count_query.bind(value.clone());
        }
        let total: i64 = count_query.fetch_one(&self.pool).await?.try_get("count")?;

        let list_sql = format!(
            "SELECT {} FROM tickets{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            TICKET_COLUMNS, where_clause
        );
        let mut list_query = sqlx::query(&list_sql);
        for value in &binds {
            list_query = list_query.bind(value.clone());
        }
        let rows = list_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let tickets = rows
            .iter()
            .map(row_to_ticket)
            .collect::<ApiResult<Vec<_>>>()?;
        Ok((tickets, total))
    }

    async fn delete_ticket(&self, ticket_id: &str) -> ApiResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Children first; foreign key enforcement is per-connection in SQLite
        for table in ["comments", "chat_messages", "progress_entries"] {
            sqlx::query(&format!("DELETE FROM {} WHERE ticket_id = ?", table))
                .bind(ticket_id)
                .execute(&mut *tx)
                .await?;
        }

        let result = sqlx::query("DELETE FROM tickets WHERE ticket_id = ?")
            .bind(ticket_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn append_comment(&self, comment: &Comment) -> ApiResult<Comment> {
        let row = sqlx::query(
            "INSERT INTO comments (id, ticket_id, user_id, content, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING seq",
        )
        .bind(&comment.id)
        .bind(&comment.ticket_id)
        .bind(&comment.user_id)
        .bind(&comment.content)
        .bind(&comment.created_at)
        .fetch_one(&self.pool)
        .await?;

        let mut stored = comment.clone();
        stored.seq = row.try_get("seq")?;
        Ok(stored)
    }

    async fn list_comments(&self, ticket_id: &str) -> ApiResult<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT seq, id, ticket_id, user_id, content, created_at
             FROM comments
             WHERE ticket_id = ?
             ORDER BY seq ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_comment).collect()
    }
}
