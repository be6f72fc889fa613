//! Tabular data for CLI output and CSV exports

use serde::{Deserialize, Serialize};

/// Rows of strings under a fixed set of headers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { headers: headers.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    /// Append a row, padded with empty cells or truncated to the header count
    pub fn add_row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column, `None` when the index is out of range
    pub fn column(&self, index: usize) -> Option<Vec<&str>> {
        if index >= self.headers.len() {
            return None;
        }
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// ASCII grid:
    ///
    /// ```text
    /// +------+-----+
    /// | name | qty |
    /// +------+-----+
    /// | pen  | 3   |
    /// +------+-----+
    /// ```
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let separator = widths.iter().fold(String::from("+"), |mut line, width| {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
            line
        });

        let format_row = |cells: &[String]| {
            let mut line = String::from("|");
            for (cell, width) in cells.iter().zip(&widths) {
                let padding = width - cell.chars().count();
                line.push(' ');
                line.push_str(cell);
                line.push_str(&" ".repeat(padding + 1));
                line.push('|');
            }
            line
        };

        let mut out = Vec::with_capacity(self.rows.len() + 4);
        out.push(separator.clone());
        out.push(format_row(&self.headers));
        out.push(separator.clone());
        for row in &self.rows {
            out.push(format_row(row));
        }
        if !self.rows.is_empty() {
            out.push(separator);
        }
        out.join("\n")
    }

    /// CSV with the header line first; cells containing the delimiter,
    /// quotes or line breaks are quoted
    pub fn to_csv(&self, delimiter: char) -> String {
        let encode = |cells: &[String]| {
            cells
                .iter()
                .map(|cell| {
                    if cell.contains(delimiter)
                        || cell.contains('"')
                        || cell.contains('\n')
                        || cell.contains('\r')
                    {
                        format!("\"{}\"", cell.replace('"', "\"\""))
                    } else {
                        cell.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(&delimiter.to_string())
        };

        let mut lines = vec![encode(&self.headers)];
        lines.extend(self.rows.iter().map(|row| encode(row)));
        lines.join("\n") + "\n"
    }
}
