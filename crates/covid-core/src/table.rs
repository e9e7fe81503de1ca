//! Generic tabular result representation.
//!
//! Every aggregation produces typed rows; the report and export layers only
//! ever see a [`Table`], so one renderer and one CSV writer cover all result
//! shapes.

use std::fmt;

/// A single table value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Free text (country names, period keys, statistic labels).
    Text(String),
    /// Integer counts.
    Int(i64),
    /// Rates, percentages and coordinates.
    Float(f64),
}

impl Cell {
    /// Convenience constructor for text cells.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// The cell as an integer, when it holds one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The cell as a float; integers widen losslessly enough for display
    /// arithmetic.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }

    /// Whether the cell is numeric (affects report column alignment).
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Cell::Text(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(v) => write!(f, "{}", v),
            Cell::Int(v) => write!(f, "{}", v),
            // Two decimals everywhere; non-finite values render as "inf" /
            // "NaN" rather than being masked.
            Cell::Float(v) => write!(f, "{:.2}", v),
        }
    }
}

/// A result type that knows how to lay itself out as table rows.
pub trait Tabular {
    /// Column names, in display order.
    fn columns() -> Vec<String>;
    /// One row of cells matching [`Tabular::columns`].
    fn row(&self) -> Vec<Cell>;
}

/// An ordered, immutable-after-build result table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from typed rows.
    pub fn from_rows<T: Tabular>(rows: &[T]) -> Self {
        let mut table = Table::new(T::columns());
        for row in rows {
            table.push_row(row.row());
        }
        table
    }

    /// Append a row. The cell count must match the column count.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len(), "row/column arity mismatch");
        self.rows.push(row);
    }

    /// Column names in display order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows. An empty table is a valid result,
    /// not an error.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Sum a numeric column; text cells contribute nothing.
    pub fn column_sum(&self, name: &str) -> Option<f64> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row[idx].as_f64())
                .sum(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::new(vec![
            "country".to_string(),
            "confirmed_cases".to_string(),
        ]);
        table.push_row(vec![Cell::text("India"), Cell::Int(100)]);
        table.push_row(vec![Cell::text("Brazil"), Cell::Int(250)]);
        table
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::text("India").to_string(), "India");
        assert_eq!(Cell::Int(1234).to_string(), "1234");
        assert_eq!(Cell::Float(50.0).to_string(), "50.00");
        assert_eq!(Cell::Float(-20.5).to_string(), "-20.50");
        assert_eq!(Cell::Float(1.0 / 3.0).to_string(), "0.33");
    }

    #[test]
    fn test_cell_display_non_finite() {
        assert_eq!(Cell::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(Cell::Float(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_cell_numeric_conversions() {
        assert_eq!(Cell::Int(7).as_i64(), Some(7));
        assert_eq!(Cell::Int(7).as_f64(), Some(7.0));
        assert_eq!(Cell::Float(1.5).as_i64(), None);
        assert_eq!(Cell::text("x").as_f64(), None);
    }

    #[test]
    fn test_column_lookup() {
        let table = sample_table();
        assert_eq!(table.column_index("confirmed_cases"), Some(1));
        assert!(table.has_column("country"));
        assert!(!table.has_column("deaths_cases"));
    }

    #[test]
    fn test_column_sum() {
        let table = sample_table();
        assert_eq!(table.column_sum("confirmed_cases"), Some(350.0));
        assert!(table.column_sum("missing").is_none());
    }

    #[test]
    fn test_empty_table_is_valid() {
        let table = Table::new(vec!["country".to_string()]);
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_from_rows() {
        struct OneCol(i64);
        impl Tabular for OneCol {
            fn columns() -> Vec<String> {
                vec!["value".to_string()]
            }
            fn row(&self) -> Vec<Cell> {
                vec![Cell::Int(self.0)]
            }
        }

        let table = Table::from_rows(&[OneCol(1), OneCol(2)]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), &["value".to_string()]);
    }
}
