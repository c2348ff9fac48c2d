use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

const DEFAULT_PAGE_LIMIT: u64 = 20;
const MAX_PAGE_LIMIT: u64 = 100;

/// Zero-based page selection used by the admin list screens.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page number. Default: 0.
    pub page_no: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub limit: Option<u64>,
}

impl PageQuery {
    /// Returns `(offset, limit)` with the limit clamped to 1..=100.
    pub fn bounds(&self) -> (u64, u64) {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        let page_no = self.page_no.unwrap_or(0);
        (page_no.saturating_mul(limit), limit)
    }
}

/// Parse a path id, answering `Invalid Request!` when it is not a UUID.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::invalid_id())
}
