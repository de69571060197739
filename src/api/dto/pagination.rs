//! Pagination query parameters.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

/// `?page=&pageSize=` parsed from the query string.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default, alias = "page_size")]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validates the parameters and converts them to `(offset, limit)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for page 0 or a page size outside 1..=100.
    pub fn offset_limit(&self) -> Result<(i64, i64), AppError> {
        let page = self.page();
        let page_size = self.page_size();

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "field": "page" }),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "field": "pageSize" }),
            ));
        }

        let offset = i64::from(page - 1) * i64::from(page_size);
        Ok((offset, i64::from(page_size)))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let page_size = params.page_size();
        Self {
            page: params.page(),
            page_size,
            total,
            total_pages: (total + i64::from(page_size) - 1) / i64::from(page_size),
        }
    }
}
