use crate::analysis::datatype::detect_data_type;
use crate::analysis::datatype::DataType;
use crate::spreadsheet::reference::index_to_reference;
use serde::Serialize;
use std::fmt::Display;

/// Cell type hint reported by the source format.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CellType {
    /// Text values
    String,
    /// Numeric values (including dates stored as serial numbers)
    Numeric,
    /// Boolean values (true/false)
    Boolean,
    /// Values the source already knows to be dates
    Date,
    /// Formula cells, whose value is the evaluated literal
    Formula,
    #[default]
    Blank,
}

/// The (row, col) position of a cell, used as clustering point and set key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellCoordinate {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
}

impl CellCoordinate {
    pub fn new(row: usize, col: usize) -> Self {
        CellCoordinate { row, col }
    }

    /// Euclidean distance in row/col space.
    pub fn distance(&self, other: &CellCoordinate) -> f64 {
        let rows = self.row.abs_diff(other.row) as f64;
        let cols = self.col.abs_diff(other.col) as f64;
        rows.hypot(cols)
    }

    /// Returns the A1-style reference (e.g., "A1", "B2").
    pub fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }
}

/// A single non-empty cell of a sheet snapshot with its resolved literal value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Row index (0-based)
    #[serde(rename = "rowIndex")]
    pub row: usize,
    /// Column index (0-based)
    #[serde(rename = "columnIndex")]
    pub col: usize,
    /// Cell value as string (evaluated literal for formula cells)
    pub value: String,
    /// Formula text when the cell holds a formula
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Type hint from the source format
    #[serde(rename = "dataType")]
    pub kind: CellType,
}

impl Cell {
    pub fn new(row: usize, col: usize, kind: CellType, value: &str) -> Self {
        Cell {
            row,
            col,
            value: value.to_owned(),
            formula: None,
            kind,
        }
    }

    pub fn coordinate(&self) -> CellCoordinate {
        CellCoordinate::new(self.row, self.col)
    }

    /// Returns the A1-style cell reference (e.g., "A1", "B2").
    pub fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// True when the value holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Coarse data type inferred from the textual value.
    pub fn data_type(&self) -> DataType {
        detect_data_type(&self.value)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_distance() {
        let origin = CellCoordinate::new(0, 0);
        assert_eq!(origin.distance(&CellCoordinate::new(0, 1)), 1.0);
        assert!(origin.distance(&CellCoordinate::new(1, 1)) <= 1.5);
        assert_eq!(origin.distance(&CellCoordinate::new(2, 0)), 2.0);
        assert_eq!(CellCoordinate::new(3, 4).distance(&origin), 5.0);
    }

    #[test]
    fn cell_reference_and_type() {
        let cell = Cell::new(2, 27, CellType::Numeric, "12.5");
        assert_eq!(cell.reference(), "AB3");
        assert_eq!(cell.coordinate(), CellCoordinate::new(2, 27));
        assert_eq!(cell.data_type(), DataType::Number);
        assert!(!cell.is_blank());
        assert!(Cell::new(0, 0, CellType::String, "  ").is_blank());
    }
}
