use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Server-side ceiling on page size, regardless of what the client asks for.
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub timestamp: i64,
    pub action: String,
    pub user_id: String,
    pub tenant_id: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Query-string filters for audit log listings. Filters are AND-combined.
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub user_id: Option<String>,
    /// Inclusive unix-timestamp lower bound.
    pub from: Option<i64>,
    /// Inclusive unix-timestamp upper bound.
    pub to: Option<i64>,
    /// Tenant filter; only honored on the admin endpoint. The tenant-scoped
    /// endpoint derives the tenant from the principal and ignores this.
    pub tenant: Option<String>,
}

impl AuditLogQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    pub fn pagination(&self, total: i64) -> Pagination {
        let limit = self.limit();
        Pagination {
            page: self.page(),
            limit,
            total,
            pages: (total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct AuditLogPage {
    pub entries: Vec<AuditLog>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped_to_maximum() {
        let query = AuditLogQuery {
            limit: Some(5000),
            ..Default::default()
        };
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn limit_defaults_when_absent_or_nonsense() {
        assert_eq!(AuditLogQuery::default().limit(), DEFAULT_PAGE_SIZE);
        let query = AuditLogQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(query.limit(), 1);
    }

    #[test]
    fn offset_follows_page_and_limit() {
        let query = AuditLogQuery {
            page: Some(3),
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn pagination_rounds_page_count_up() {
        let query = AuditLogQuery {
            limit: Some(10),
            ..Default::default()
        };
        let pagination = query.pagination(25);
        assert_eq!(pagination.pages, 3);
        assert_eq!(pagination.total, 25);
    }
}
