use super::{Columns, TableStore, TreeModel, TreeStore};
use std::fmt::Write;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}…", text.chars().take(width - 1).collect::<String>())
    } else {
        text.to_string()
    }
}

fn tree_line(columns: &Columns) -> String {
    format!(
        "{} [{}] {} {}",
        columns.name, columns.pid, columns.cpu, columns.memory
    )
}

/// Renders the store as an indented tree, one row per line.
pub fn render_tree(store: &TreeStore) -> String {
    let mut out = String::new();
    let top_level = store.children(None);

    // (row, prefix inherited from the parent, last sibling, depth)
    let mut stack: Vec<_> = top_level
        .iter()
        .rev()
        .map(|&row| (row, String::new(), false, 0usize))
        .collect();

    while let Some((row, prefix, last, depth)) = stack.pop() {
        let Some(columns) = store.columns(row) else {
            continue;
        };

        let (connector, child_prefix) = if depth == 0 {
            ("", String::new())
        } else if last {
            ("└── ", format!("{prefix}    "))
        } else {
            ("├── ", format!("{prefix}│   "))
        };
        let _ = writeln!(out, "{prefix}{connector}{}", tree_line(columns));

        let children = store.children(Some(row));
        let count = children.len();
        for (i, child) in children.into_iter().enumerate().rev() {
            stack.push((child, child_prefix.clone(), i + 1 == count, depth + 1));
        }
    }

    out
}

/// Renders the store as a boxed table.
pub fn render_table(store: &TableStore, limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "┌──────────┬─────────────────────┬─────────┬─────────────┬──────────────┐"
    );
    let _ = writeln!(
        out,
        "│   PID    │       Process       │  CPU %  │   Memory    │    Status    │"
    );
    let _ = writeln!(
        out,
        "├──────────┼─────────────────────┼─────────┼─────────────┼──────────────┤"
    );

    for columns in store.rows().iter().take(limit) {
        let _ = writeln!(
            out,
            "│ {:>8} │ {:>19} │ {:>7} │ {:>11} │ {:>12} │",
            columns.pid,
            truncate(&columns.name, 19),
            truncate(&columns.cpu, 7),
            truncate(&columns.memory, 11),
            truncate(&columns.status, 12)
        );
    }

    let _ = writeln!(
        out,
        "└──────────┴─────────────────────┴─────────┴─────────────┴──────────────┘"
    );
    out
}
