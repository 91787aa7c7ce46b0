use crate::domain::entities::{User, UserSummary};
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::http::middleware::error::ApiResult;
use crate::infrastructure::persistence::tickets::{optional_column, parse_column};
use crate::infrastructure::persistence::Database;
use async_trait::async_trait;
use sqlx::any::AnyRow;
use sqlx::Row;
use std::collections::HashMap;

const USER_COLUMNS: &str = "id, email, name, password_hash, role, department, profile_picture, \
     primary_phone, telegram_id, created_at, updated_at";

fn row_to_user(row: &AnyRow) -> ApiResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        password_hash: optional_column(row, "password_hash"),
        role: parse_column(row, "role")?,
        department: parse_column(row, "department")?,
        profile_picture: row.try_get("profile_picture")?,
        primary_phone: optional_column(row, "primary_phone"),
        telegram_id: optional_column(row, "telegram_id"),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserRepository for Database {
    async fn create_user(&self, user: &User) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, role, department, profile_picture,
                                primary_phone, telegram_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.department.as_str())
        .bind(&user.profile_picture)
        .bind(&user.primary_phone)
        .bind(&user.telegram_id)
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_user_by_id(&self, id: &str) -> ApiResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn list_users(&self, limit: i64, offset: i64) -> ApiResult<(Vec<User>, i64)> {
        let total: i64 = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;

        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC LIMIT ? OFFSET ?",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let users = rows.iter().map(row_to_user).collect::<ApiResult<Vec<_>>>()?;
        Ok((users, total))
    }

    async fn get_user_summaries(&self, ids: &[String]) -> ApiResult<HashMap<String, UserSummary>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, name, email, profile_picture FROM users WHERE id IN ({})",
            placeholders
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.clone());
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut summaries = HashMap::with_capacity(rows.len());
        for row in &rows {
            let summary = UserSummary {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                profile_picture: row.try_get("profile_picture")?,
            };
            summaries.insert(summary.id.clone(), summary);
        }
        Ok(summaries)
    }
}
