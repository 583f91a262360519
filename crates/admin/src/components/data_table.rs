//! Data table component types.
//!
//! These types define plain-text tables for the console screens.

use std::fmt::Write as _;

/// Column definition for a data table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether the column is rendered.
    pub default_visible: bool,
}

impl TableColumn {
    /// Create a new visible column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            default_visible: true,
        }
    }

    /// Set whether the column is visible by default.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Text shown instead of the table when there are no rows.
    pub empty_title: String,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            empty_title: "No items found".to_string(),
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set empty state text.
    #[must_use]
    pub fn empty_state(mut self, title: &str) -> Self {
        self.empty_title = title.to_string();
        self
    }

    /// Get default visible columns.
    #[must_use]
    pub fn default_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.default_visible)
            .map(|c| c.key.clone())
            .collect()
    }

    /// Render rows as an aligned text table.
    ///
    /// Each row holds one cell per column in declaration order; cells of
    /// hidden columns are skipped. Missing cells render empty.
    #[must_use]
    pub fn render(&self, rows: &[Vec<String>]) -> String {
        if rows.is_empty() {
            return format!("{}\n", self.empty_title);
        }

        let visible: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.default_visible)
            .map(|(i, _)| i)
            .collect();

        let cell = |row: &[String], index: usize| -> String {
            row.get(index).cloned().unwrap_or_default()
        };

        let widths: Vec<usize> = visible
            .iter()
            .map(|&i| {
                let header = self.columns.get(i).map_or(0, |c| c.label.chars().count());
                rows.iter()
                    .map(|row| cell(row, i).chars().count())
                    .fold(header, usize::max)
            })
            .collect();

        let mut out = String::new();
        let headers: Vec<String> = visible
            .iter()
            .map(|&i| self.columns.get(i).map(|c| c.label.clone()).unwrap_or_default())
            .collect();
        push_line(&mut out, &headers, &widths);

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);

        for row in rows {
            let cells: Vec<String> = visible.iter().map(|&i| cell(row, i)).collect();
            push_line(&mut out, &cells, &widths);
        }

        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (index, (text, width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            line.push_str("  ");
        }
        let padding = width.saturating_sub(text.chars().count());
        let _ = write!(line, "{text}{}", " ".repeat(padding));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
