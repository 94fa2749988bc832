//! List view state derived from the URL query string
//!
//! The view is a pure function of the query so that reloading or sharing a
//! URL reproduces it.

use std::borrow::Cow;

use taskdesk_core::task::{StatusFilter, Task, TaskStatus, DEFAULT_PAGE};

/// Layout of the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    /// Board with one column per status
    Grid,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Grid => "grid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub filter: StatusFilter,
    pub page: u32,
    pub mode: ViewMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filter: StatusFilter::All,
            page: DEFAULT_PAGE,
            mode: ViewMode::List,
        }
    }
}

impl ViewState {
    /// Derive the view from a query string such as `status=DONE&page=2`.
    ///
    /// A leading `?` is accepted. Missing or malformed values fall back to
    /// their defaults instead of failing.
    pub fn from_query(query: &str) -> Self {
        let mut view = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode(value);
            match &*decode(key) {
                "status" => {
                    view.filter = StatusFilter::parse(Some(&*value)).unwrap_or_default();
                }
                "page" => {
                    view.page = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|page| *page >= 1)
                        .unwrap_or(DEFAULT_PAGE);
                }
                "view" => {
                    view.mode = match &*value {
                        "grid" => ViewMode::Grid,
                        _ => ViewMode::List,
                    };
                }
                _ => {}
            }
        }
        view
    }

    /// Render the shareable query string, without the leading `?`
    pub fn to_query(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(status) = self.filter.as_query_value() {
            parts.push(format!("status={}", urlencoding::encode(status)));
        }
        parts.push(format!("page={}", self.page));
        if self.mode != ViewMode::List {
            parts.push(format!("view={}", self.mode.as_str()));
        }
        parts.join("&")
    }

    /// Change the filter; pagination restarts at page 1
    pub fn with_filter(self, filter: StatusFilter) -> Self {
        Self {
            filter,
            page: DEFAULT_PAGE,
            ..self
        }
    }

    /// Move to `page`, keeping the filter
    pub fn with_page(self, page: u32) -> Self {
        Self {
            page: page.max(DEFAULT_PAGE),
            ..self
        }
    }

    pub fn with_mode(self, mode: ViewMode) -> Self {
        Self { mode, ..self }
    }
}

fn decode(raw: &str) -> Cow<'static, str> {
    let plus_decoded = raw.replace('+', " ");
    match urlencoding::decode(&plus_decoded) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Owned(plus_decoded),
    }
}

/// One board column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusColumn {
    pub status: TaskStatus,
    pub title: &'static str,
    pub tasks: Vec<Task>,
}

/// Split a page of tasks into `TO_DO`, `IN_PROGRESS` and `DONE` columns,
/// keeping the page order inside each column.
pub fn group_by_status(tasks: &[Task]) -> Vec<StatusColumn> {
    TaskStatus::ALL
        .into_iter()
        .map(|status| StatusColumn {
            status,
            title: status.label(),
            tasks: tasks.iter().filter(|t| t.status == status).cloned().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: &str, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            title: format!("task {}", id),
            description: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_query_is_default_view() {
        assert_eq!(ViewState::from_query(""), ViewState::default());
        assert_eq!(ViewState::from_query("?"), ViewState::default());
    }

    #[test]
    fn parses_all_parameters() {
        let view = ViewState::from_query("?status=IN_PROGRESS&page=3&view=grid&utm=x");
        assert_eq!(view.filter, StatusFilter::Only(TaskStatus::InProgress));
        assert_eq!(view.page, 3);
        assert_eq!(view.mode, ViewMode::Grid);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let view = ViewState::from_query("status=BLOCKED&page=-2&view=table");
        assert_eq!(view, ViewState::default());

        assert_eq!(ViewState::from_query("page=0").page, 1);
        assert_eq!(ViewState::from_query("page=abc").page, 1);
        assert_eq!(ViewState::from_query("status=all").filter, StatusFilter::All);
    }

    #[test]
    fn query_round_trip() {
        let view = ViewState::default()
            .with_filter(StatusFilter::Only(TaskStatus::Done))
            .with_page(4)
            .with_mode(ViewMode::Grid);
        assert_eq!(view.to_query(), "status=DONE&page=4&view=grid");
        assert_eq!(ViewState::from_query(&view.to_query()), view);

        assert_eq!(ViewState::default().to_query(), "page=1");
    }

    #[test]
    fn filter_change_resets_page_and_page_change_keeps_filter() {
        let view = ViewState::from_query("status=TO_DO&page=5");

        let paged = view.with_page(6);
        assert_eq!(paged.filter, StatusFilter::Only(TaskStatus::ToDo));
        assert_eq!(paged.page, 6);

        let refiltered = paged.with_filter(StatusFilter::All);
        assert_eq!(refiltered.page, 1);

        let regrid = paged.with_mode(ViewMode::Grid);
        assert_eq!(regrid.page, 6);
        assert_eq!(regrid.filter, paged.filter);
    }

    #[test]
    fn decode_keeps_plus_as_space_on_invalid_utf8() {
        assert_eq!(decode("a+b%20c"), "a b c");
        assert_eq!(decode("a+b%FF"), "a b%FF");
    }

    #[test]
    fn groups_tasks_into_columns() {
        let tasks = vec![
            task("1", TaskStatus::Done),
            task("2", TaskStatus::ToDo),
            task("3", TaskStatus::Done),
        ];
        let columns = group_by_status(&tasks);

        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].title, "To Do");
        assert_eq!(columns[0].tasks.len(), 1);
        assert!(columns[1].tasks.is_empty());
        let done: Vec<&str> = columns[2].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(done, vec!["1", "3"]);
    }
}
