use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_LIMIT: i64 = 50;
pub const MAX_LOG_LIMIT: i64 = 200;

#[derive(Debug, Default, Deserialize)]
pub struct ActivityLogQuery {
    pub limit: Option<i64>,
}

impl ActivityLogQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT)
    }
}

#[derive(Debug, Serialize)]
pub struct DepartmentListResponse {
    pub departments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_limit_bounds() {
        assert_eq!(ActivityLogQuery::default().effective_limit(), 50);
        assert_eq!(ActivityLogQuery { limit: Some(1_000) }.effective_limit(), 200);
        assert_eq!(ActivityLogQuery { limit: Some(0) }.effective_limit(), 1);
    }
}
