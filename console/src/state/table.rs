//! Render-ready table grid for entity lists.
//!
//! While loading, when empty, or after a failed load the body is a single
//! placeholder row spanning every column.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use super::data_source::LoadState;

pub const LOADING_TEXT: &str = "Cargando...";
pub const EMPTY_TEXT: &str = "No hay registros.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableRow {
    Data { id: i64, cells: Vec<String> },
    Placeholder { text: String, col_span: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<&'static str>,
    pub rows: Vec<TableRow>,
}

impl TableView {
    /// Build the grid from a load state. `render` returns the row id and one
    /// cell per column.
    pub fn build<T>(columns: &[&'static str], state: &LoadState<T>, render: impl Fn(&T) -> (i64, Vec<String>)) -> Self {
        let placeholder = |text: &str| TableRow::Placeholder { text: text.to_owned(), col_span: columns.len() };
        let rows = match state {
            LoadState::Idle | LoadState::Loading => vec![placeholder(LOADING_TEXT)],
            LoadState::Failed(message) => vec![placeholder(message)],
            LoadState::Ready(items) if items.is_empty() => vec![placeholder(EMPTY_TEXT)],
            LoadState::Ready(items) => items
                .iter()
                .map(|item| {
                    let (id, cells) = render(item);
                    TableRow::Data { id, cells }
                })
                .collect(),
        };
        Self { columns: columns.to_vec(), rows }
    }

    /// The placeholder text, when the body is a placeholder.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        match self.rows.as_slice() {
            [TableRow::Placeholder { text, .. }] => Some(text),
            _ => None,
        }
    }

    pub fn data_rows(&self) -> impl Iterator<Item = (i64, &[String])> {
        self.rows.iter().filter_map(|row| match row {
            TableRow::Data { id, cells } => Some((*id, cells.as_slice())),
            TableRow::Placeholder { .. } => None,
        })
    }

    /// Plain-text rendering with columns padded to their widest cell.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for (_, cells) in self.data_rows() {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = vec![pad_line(self.columns.iter().copied(), &widths)];
        lines.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
        for row in &self.rows {
            match row {
                TableRow::Data { cells, .. } => lines.push(pad_line(cells.iter().map(String::as_str), &widths)),
                TableRow::Placeholder { text, .. } => lines.push(text.clone()),
            }
        }
        lines.join("\n")
    }
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}
