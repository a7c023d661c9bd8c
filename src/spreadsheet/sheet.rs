use crate::error::RegionError;
use crate::error::ResultMessage;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellCoordinate;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::range::Area;
use crate::spreadsheet::range::ReservedAreas;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::SheetSource;
use std::collections::HashMap;
use tracing::debug;

/// A fully materialized snapshot of one sheet's non-empty, non-reserved cells.
///
/// Every analysis step of a sheet pass reads from this snapshot; it is never
/// shared between passes.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    /// Sheet name
    pub name: String,
    /// All cells in scan order (row-major when built by `scan`)
    cells: Vec<Cell>,
    /// Position of each cell in `cells`
    index: HashMap<CellCoordinate, usize>,
    /// Actual data range (determined from cell data)
    pub row_lower_bound: Option<usize>,
    pub row_upper_bound: Option<usize>,
    pub col_lower_bound: Option<usize>,
    pub col_upper_bound: Option<usize>,
}

impl Sheet {
    /// Creates an empty sheet snapshot.
    pub fn new(name: &str) -> Self {
        Sheet {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    /// Scans a provider sheet into a snapshot.
    ///
    /// Blank cells and cells inside reserved areas are skipped, formula cells are
    /// resolved through the provider's evaluator, and a missing row is treated as
    /// entirely blank.
    ///
    /// # Errors
    ///
    /// Returns the provider's evaluation error, prefixed with the cell reference.
    pub fn scan(source: &dyn SheetSource, reserved: &ReservedAreas) -> Result<Self, RegionError> {
        let mut sheet = Sheet::new(&source.name());
        let Some((last_row, _)) = source.dimensions() else {
            return Ok(sheet);
        };
        let mut skipped = 0usize;
        for row in 0..=last_row {
            let Some(cells) = source.row(row) else {
                continue;
            };
            for (col, cell) in cells {
                if reserved.contains(row, col) {
                    skipped += 1;
                    continue;
                }
                let (value, kind) = if cell.formula.is_some() {
                    let value = source
                        .evaluate(row, col)
                        .map_err(RegionError::from)
                        .with_prefix(&index_to_reference(row, col))?;
                    (value, CellType::Formula)
                } else {
                    (cell.value, cell.kind)
                };
                if value.trim().is_empty() {
                    continue;
                }
                sheet.push(Cell {
                    row,
                    col,
                    value,
                    formula: cell.formula,
                    kind,
                });
            }
        }
        debug!(sheet = %sheet.name, cells = sheet.len(), reserved = skipped, "scanned sheet");
        Ok(sheet)
    }

    /// Returns true if the sheet contains no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Adds a cell to the sheet, replacing any cell already stored at the same position.
    pub fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        match self.index.get(&cell.coordinate()) {
            Some(position) => self.cells[*position] = cell,
            None => {
                self.index.insert(cell.coordinate(), self.cells.len());
                self.cells.push(cell);
            }
        }
    }

    /// Updates the actual data range boundaries based on cell positions.
    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|row_lower_bound| row < row_lower_bound).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_lower_bound.map(|col_lower_bound| col < col_lower_bound).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index
            .get(&CellCoordinate::new(row, col))
            .map(|position| &self.cells[*position])
    }

    /// Returns the literal value at (row, col) unless the position is blank.
    pub fn value(&self, row: usize, col: usize) -> Option<&str> {
        self.cell(row, col)
            .filter(|cell| !cell.is_blank())
            .map(|cell| cell.value.as_str())
    }

    /// Coordinates of every cell, in scan order.
    pub fn coordinates(&self) -> Vec<CellCoordinate> {
        self.cells.iter().map(Cell::coordinate).collect()
    }

    /// The bounding area of all cells, or None for an empty sheet.
    pub fn area(&self) -> Option<Area> {
        let (first_row, last_row) = self.row_lower_bound.zip(self.row_upper_bound)?;
        let (first_col, last_col) = self.col_lower_bound.zip(self.col_upper_bound)?;
        Some(Area {
            first_row,
            first_col,
            last_row,
            last_col,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::spreadsheet::cell::*;
    use crate::spreadsheet::memory::MemorySheet;
    use crate::spreadsheet::range::*;
    use crate::spreadsheet::sheet::Sheet;
    use crate::spreadsheet::SheetSource;
    use crate::spreadsheet::SourceCell;

    fn push(sheet: &mut Sheet, row: usize, col: usize, value: &str) {
        sheet.push(Cell::new(row, col, CellType::String, value));
    }

    #[test]
    fn sheet_initial() {
        let sheet = Sheet::new("");

        assert!(sheet.is_empty());
        assert_eq!(sheet.row_lower_bound, None);
        assert_eq!(sheet.row_upper_bound, None);
        assert_eq!(sheet.col_lower_bound, None);
        assert_eq!(sheet.col_upper_bound, None);
        assert_eq!(sheet.area(), None);
    }

    #[test]
    fn sheet_update() {
        let mut sheet = Sheet::new("");
        push(&mut sheet, 1, 3, "a");
        push(&mut sheet, 1, 1, "b");
        push(&mut sheet, 3, 1, "c");
        push(&mut sheet, 3, 3, "d");

        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet.row_lower_bound, Some(1));
        assert_eq!(sheet.row_upper_bound, Some(3));
        assert_eq!(sheet.col_lower_bound, Some(1));
        assert_eq!(sheet.col_upper_bound, Some(3));
        assert_eq!(sheet.value(3, 1), Some("c"));
        assert_eq!(sheet.value(2, 2), None);
    }

    #[test]
    fn sheet_push_replaces_same_position() {
        let mut sheet = Sheet::new("");
        push(&mut sheet, 0, 0, "old");
        push(&mut sheet, 0, 0, "new");

        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.value(0, 0), Some("new"));
    }

    #[test]
    fn sheet_value_skips_blank() {
        let mut sheet = Sheet::new("");
        push(&mut sheet, 0, 0, "   ");

        assert!(sheet.cell(0, 0).is_some());
        assert_eq!(sheet.value(0, 0), None);
    }

    #[test]
    fn sheet_scan_filters_reserved_and_blank() {
        let mut source = MemorySheet::from_rows("Data", &[
            &["a", "b", ""],
            &["1", "2", "3"],
        ]);
        source.set(4, 0, SourceCell::new(CellType::String, " "));
        source.reserve(ReservedArea::named_table("Sales", Area::try_from("C1:C2").unwrap()));
        let reserved: ReservedAreas = source.reserved_areas().into();
        let sheet = Sheet::scan(&source, &reserved).unwrap();

        assert_eq!(sheet.name, "Data");
        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet.value(1, 2), None);
        assert_eq!(sheet.value(1, 1), Some("2"));
        assert_eq!(sheet.area(), Some(Area::try_from("A1:B2").unwrap()));
        let coordinates = sheet.coordinates();
        assert_eq!(coordinates[0], CellCoordinate::new(0, 0));
        assert_eq!(coordinates[3], CellCoordinate::new(1, 1));
    }

    #[test]
    fn sheet_scan_resolves_formulas() {
        let mut source = MemorySheet::new("Totals");
        source.set(0, 0, SourceCell::new(CellType::Numeric, "2"));
        source.set(0, 1, SourceCell::formula("A1*2", "4"));
        let sheet = Sheet::scan(&source, &ReservedAreas::default()).unwrap();
        let cell = sheet.cell(0, 1).unwrap();

        assert_eq!(cell.value, "4");
        assert_eq!(cell.formula.as_deref(), Some("A1*2"));
        assert_eq!(cell.kind, CellType::Formula);
    }
}
