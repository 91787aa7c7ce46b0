use crate::domain::entities::{
    Department, DepartmentStats, MyStats, StatsQuery, StatsRecord, User,
};
use crate::domain::ports::stats_repository::StatsRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};
use crate::shared::utils::timestamp::{current_month_year, month_bounds};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read-only monthly aggregates over the ticket store
#[derive(Clone)]
pub struct StatsService {
    stats_repo: Arc<dyn StatsRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl StatsService {
    pub fn new(stats_repo: Arc<dyn StatsRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            stats_repo,
            user_repo,
        }
    }

    /// Per-status counts of the caller's assigned tickets created in the window
    pub async fn get_my_stats(&self, actor_id: Option<&str>, query: StatsQuery) -> ApiResult<MyStats> {
        let actor = self.require_actor(actor_id).await?;
        let (month, year, start, end) = window(&query)?;

        let counts = self
            .stats_repo
            .count_assigned_by_status(&actor.id, &start, &end)
            .await?;

        Ok(MyStats {
            month,
            year,
            stats: StatsRecord::from_counts(&counts),
        })
    }

    /// Per-department counts. Only super-admins see every department; everyone
    /// else gets their own, zeros included.
    pub async fn get_department_stats(
        &self,
        actor_id: Option<&str>,
        query: StatsQuery,
    ) -> ApiResult<DepartmentStats> {
        let actor = self.require_actor(actor_id).await?;
        let (month, year, start, end) = window(&query)?;

        let scope = if actor.role.is_super_admin() {
            None
        } else {
            Some(actor.department)
        };

        let counts = self
            .stats_repo
            .count_by_department_and_status(scope, &start, &end)
            .await?;

        let mut stats: BTreeMap<Department, StatsRecord> = match scope {
            Some(department) => BTreeMap::from([(department, StatsRecord::default())]),
            None => Department::ALL
                .iter()
                .map(|d| (*d, StatsRecord::default()))
                .collect(),
        };
        for (department, status, count) in counts {
            stats.entry(department).or_default().add(status, count);
        }

        Ok(DepartmentStats { month, year, stats })
    }

    async fn require_actor(&self, actor_id: Option<&str>) -> ApiResult<User> {
        let actor_id = actor_id.ok_or(ApiError::Unauthorized)?;
        self.user_repo
            .get_user_by_id(actor_id)
            .await?
            .ok_or(ApiError::Unauthorized)
    }
}

/// Resolve the query to (month, year, start, end), defaulting to the current month
fn window(query: &StatsQuery) -> ApiResult<(u32, i32, String, String)> {
    let (current_month, current_year) = current_month_year();
    let month = query.month.unwrap_or(current_month);
    let year = query.year.unwrap_or(current_year);

    if !(1..=12).contains(&month) {
        return Err(ApiError::BadRequest("Month must be between 1 and 12".to_string()));
    }
    if !(1970..=9999).contains(&year) {
        return Err(ApiError::BadRequest("Year is out of range".to_string()));
    }

    let (start, end) = month_bounds(month, year)
        .ok_or_else(|| ApiError::BadRequest("Invalid month/year".to_string()))?;
    Ok((month, year, start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_rejects_bad_month() {
        let query = StatsQuery {
            month: Some(13),
            year: Some(2025),
        };
        assert!(matches!(window(&query), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_window_defaults_to_current_month() {
        let (month, year, start, _) = window(&StatsQuery::default()).unwrap();
        assert_eq!((month, year), current_month_year());
        assert!(start.starts_with(&format!("{:04}-{:02}-01", year, month)));
    }
}
