//! Status filtering and page windows over the task collection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::{Task, TaskStatus};
use crate::{Error, Result};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
/// Larger limits are clamped to this value
pub const MAX_LIMIT: u32 = 100;

/// Restricts a listing to one status, or to none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    /// Parse an optional query value. Absent, empty and `all` mean no filter.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Ok(Self::All),
            Some(value) => value.parse::<TaskStatus>().map(Self::Only),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => task.status == *status,
        }
    }

    /// Value to put in a `status` query parameter, `None` for no filter
    pub fn as_query_value(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status.as_str()),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value().unwrap_or("all"))
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(Some(s))
    }
}

impl From<TaskStatus> for StatusFilter {
    fn from(status: TaskStatus) -> Self {
        Self::Only(status)
    }
}

/// A 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a page window. `page` and `limit` must be at least 1;
    /// limits above [`MAX_LIMIT`] are clamped.
    pub fn new(page: i64, limit: i64) -> Result<Self> {
        if page < 1 {
            return Err(Error::validation("page", "page must be at least 1"));
        }
        if limit < 1 {
            return Err(Error::validation("limit", "limit must be at least 1"));
        }
        let page = u32::try_from(page)
            .map_err(|_| Error::validation("page", "page is out of range"))?;
        Ok(Self {
            page,
            limit: u32::try_from(limit.min(i64::from(MAX_LIMIT))).unwrap_or(MAX_LIMIT),
        })
    }

    /// Fill missing values with [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`]
    pub fn from_optional(page: Option<i64>, limit: Option<i64>) -> Result<Self> {
        Self::new(
            page.unwrap_or(i64::from(DEFAULT_PAGE)),
            limit.unwrap_or(i64::from(DEFAULT_LIMIT)),
        )
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Metadata describing a page of a filtered listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: usize) -> Self {
        let total_pages = total.div_ceil(request.limit as usize);
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: (request.page as usize) < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// One page of tasks along with its pagination info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub pagination: Pagination,
}

/// Filter `tasks`, then cut the requested window out of the result.
///
/// Order is preserved. A page past the end yields an empty list.
pub fn paginate<'a, I>(tasks: I, filter: StatusFilter, request: PageRequest) -> TaskPage
where
    I: IntoIterator<Item = &'a Task>,
{
    let filtered: Vec<&Task> = tasks.into_iter().filter(|t| filter.matches(t)).collect();
    let pagination = Pagination::new(request, filtered.len());
    let tasks = filtered
        .into_iter()
        .skip(request.offset())
        .take(request.limit as usize)
        .cloned()
        .collect();

    TaskPage { tasks, pagination }
}
