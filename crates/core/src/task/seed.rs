//! Demo tasks loaded into a fresh store

use chrono::{DateTime, TimeZone, Utc};

use super::model::{Task, TaskStatus};

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn demo(
    id: &str,
    title: &str,
    description: &str,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        status,
        created_at,
        updated_at,
    }
}

/// Five sample tasks, newest first
pub fn demo_tasks() -> Vec<Task> {
    vec![
        demo(
            "1",
            "Complete project documentation",
            "Write comprehensive documentation for the new feature",
            TaskStatus::ToDo,
            at(15, 10, 0),
            at(15, 10, 0),
        ),
        demo(
            "2",
            "Review pull requests",
            "Review and approve pending pull requests",
            TaskStatus::InProgress,
            at(14, 14, 30),
            at(15, 9, 15),
        ),
        demo(
            "3",
            "Deploy to production",
            "Deploy the latest changes to production environment",
            TaskStatus::Done,
            at(13, 16, 45),
            at(14, 11, 20),
        ),
        demo(
            "4",
            "Update dependencies",
            "Update all project dependencies to latest versions",
            TaskStatus::ToDo,
            at(12, 9, 0),
            at(12, 9, 0),
        ),
        demo(
            "5",
            "Fix responsive design issues",
            "Address mobile layout problems on the dashboard",
            TaskStatus::InProgress,
            at(11, 13, 20),
            at(15, 8, 45),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_demo_tasks_hold_invariants() {
        let tasks = demo_tasks();
        let ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), tasks.len());

        for task in &tasks {
            assert!(task.created_at <= task.updated_at, "task {}", task.id);
        }
        assert!(tasks
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }
}
