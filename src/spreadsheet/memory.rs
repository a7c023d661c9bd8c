//! In-memory grid provider for hosts that already hold cell values.
use crate::analysis::datatype::detect_data_type;
use crate::analysis::datatype::DataType;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::range::ReservedArea;
use crate::spreadsheet::SheetSource;
use crate::spreadsheet::SourceCell;
use crate::spreadsheet::Workbook;
use std::collections::BTreeMap;

/// A sheet held entirely in memory, keyed by row then column.
#[derive(Clone, Debug, Default)]
pub struct MemorySheet {
    name: String,
    rows: BTreeMap<usize, BTreeMap<usize, SourceCell>>,
    reserved: Vec<ReservedArea>,
}

impl MemorySheet {
    pub fn new(name: &str) -> Self {
        MemorySheet {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    /// Builds a sheet from rows of text starting at A1. Empty strings leave the cell unset
    /// and type hints are guessed from each value.
    pub fn from_rows(name: &str, rows: &[&[&str]]) -> Self {
        let mut sheet = MemorySheet::new(name);
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                if !value.is_empty() {
                    sheet.set_value(row, col, value);
                }
            }
        }
        sheet
    }

    /// Stores a cell, replacing whatever was at (row, col).
    pub fn set(&mut self, row: usize, col: usize, cell: SourceCell) -> &mut Self {
        self.rows.entry(row).or_default().insert(col, cell);
        self
    }

    /// Stores a text value with a type hint guessed from its content.
    pub fn set_value(&mut self, row: usize, col: usize, value: &str) -> &mut Self {
        let kind = match detect_data_type(value) {
            DataType::Number => CellType::Numeric,
            DataType::Boolean => CellType::Boolean,
            DataType::Date => CellType::Date,
            DataType::String => CellType::String,
        };
        self.set(row, col, SourceCell::new(kind, value))
    }

    /// Marks an area as claimed by a named table or pivot table.
    pub fn reserve(&mut self, area: ReservedArea) -> &mut Self {
        self.reserved.push(area);
        self
    }
}

impl SheetSource for MemorySheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        let last_row = *self.rows.keys().next_back()?;
        let last_col = self
            .rows
            .values()
            .filter_map(|cells| cells.keys().next_back())
            .max()?;
        Some((last_row, *last_col))
    }

    fn cell(&self, row: usize, col: usize) -> Option<SourceCell> {
        self.rows.get(&row)?.get(&col).cloned()
    }

    fn row(&self, row: usize) -> Option<Vec<(usize, SourceCell)>> {
        let cells = self.rows.get(&row)?;
        Some(cells.iter().map(|(col, cell)| (*col, cell.clone())).collect())
    }

    fn reserved_areas(&self) -> Vec<ReservedArea> {
        self.reserved.clone()
    }
}

/// A workbook of in-memory sheets.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorkbook {
    name: String,
    sheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new(name: &str) -> Self {
        MemoryWorkbook {
            name: name.to_owned(),
            sheets: Vec::new(),
        }
    }

    pub fn push(&mut self, sheet: MemorySheet) -> &mut Self {
        self.sheets.push(sheet);
        self
    }
}

impl Workbook for MemoryWorkbook {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn sheets(&self) -> Vec<&dyn SheetSource> {
        self.sheets.iter().map(|sheet| sheet as &dyn SheetSource).collect()
    }
}
