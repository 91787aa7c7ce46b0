use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ticket::{Department, TicketStatus};

/// Per-status ticket counts. Always fully populated, zeros included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub total: i64,
    pub open: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub closed: i64,
}

impl StatsRecord {
    pub fn add(&mut self, status: TicketStatus, count: i64) {
        match status {
            TicketStatus::Open => self.open += count,
            TicketStatus::InProgress => self.in_progress += count,
            TicketStatus::Resolved => self.resolved += count,
            TicketStatus::Closed => self.closed += count,
        }
        self.total += count;
    }

    pub fn from_counts(counts: &[(TicketStatus, i64)]) -> Self {
        let mut record = Self::default();
        for (status, count) in counts {
            record.add(*status, *count);
        }
        record
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MyStats {
    pub month: u32,
    pub year: i32,
    pub stats: StatsRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentStats {
    pub month: u32,
    pub year: i32,
    pub stats: BTreeMap<Department, StatsRecord>,
}
