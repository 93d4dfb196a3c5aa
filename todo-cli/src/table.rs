use crate::domain::task::Task;
use crate::timeago;

/// Render tasks as a right-padded table. The status column only appears
/// when completed tasks can show up in the listing.
pub fn render(tasks: &[Task], with_status: bool) -> String {
    let mut headers = vec!["ID", "Description", "Created At"];
    if with_status {
        headers.push("Done");
    }

    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|task| {
            let mut row = vec![
                task.id.to_string(),
                task.title.clone(),
                timeago::time_ago(task.created_at),
            ];
            if with_status {
                row.push(status_label(task).to_string());
            }
            row
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().map(|h| *h), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(|c| c.as_str()), &widths);
    }
    out
}

fn status_label(task: &Task) -> &'static str {
    if task.is_done() { "Done" } else { "Incompleted" }
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("    ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn task(id: i64, title: &str, done: bool) -> Task {
        let created_at = Utc::now() - Duration::days(3);
        Task {
            id,
            title: title.to_string(),
            created_at,
            completed_at: done.then(Utc::now),
            is_deleted: false,
        }
    }

    #[test]
    fn status_column_only_when_showing_all() {
        let tasks = vec![task(1, "write docs", true)];

        let pending_view = render(&tasks, false);
        assert!(pending_view.contains("Created At"));
        assert!(!pending_view.contains("Done"));

        let all_view = render(&tasks, true);
        assert!(all_view.contains("Done"));
    }

    #[test]
    fn incomplete_tasks_are_labelled_incompleted() {
        let out = render(&[task(1, "a", false)], true);
        assert!(out.contains("Incompleted"));
    }

    #[test]
    fn columns_are_left_aligned_and_padded() {
        let tasks = vec![task(1, "x", false), task(12, "longer title", false)];
        let out = render(&tasks, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        // Both data rows start their title at the same offset.
        assert!(lines[1].starts_with("1     x"));
        assert!(lines[2].starts_with("12    longer title"));
    }
}
