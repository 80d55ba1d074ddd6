//! Parser for sqlcmd's delimited text output (`-W -s "|"`).
//!
//! The expected layout is a header line, a ruler line, data lines, and an optional
//! `(N rows affected)` footer. Delimiters inside values are not escaped by sqlcmd, so such
//! values shift the remaining cells of their row.

use serde_json::{Map, Value};

/// One result row, keyed by column name in header order.
pub type Row = Map<String, Value>;

/// Marks sqlcmd's row-count footer; parsing stops at the first line containing it.
pub const ROW_COUNT_FOOTER: &str = "rows affected";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parses captured stdout. Output with fewer than three lines has no rows.
pub fn parse(output: &str, delimiter: char) -> ResultTable {
    let lines: Vec<&str> = output.trim_end().lines().collect();
    if lines.len() < 3 {
        return ResultTable::default();
    }

    let columns: Vec<String> = split_cells(lines[0], delimiter)
        .map(str::to_string)
        .collect();

    let rows = lines[2..]
        .iter()
        .take_while(|line| !line.contains(ROW_COUNT_FOOTER))
        .filter(|line| !line.trim().is_empty())
        .map(|line| build_row(&columns, line, delimiter))
        .collect();

    ResultTable { columns, rows }
}

fn split_cells(line: &str, delimiter: char) -> impl Iterator<Item = &str> {
    line.split(delimiter).map(str::trim)
}

fn build_row(columns: &[String], line: &str, delimiter: char) -> Row {
    let mut cells = split_cells(line, delimiter);
    let mut row = Row::with_capacity(columns.len());

    for column in columns {
        let value = cells
            .next()
            .map(|cell| Value::String(cell.to_string()))
            .unwrap_or(Value::Null);
        row.insert(column.clone(), value);
    }

    row
}
