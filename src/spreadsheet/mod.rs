//! # Spreadsheet Grid Module
//!
//! The grid side of region inference: the provider interfaces a host implements
//! to expose its sheets, A1 references and reserved areas, and the in-memory
//! [`Sheet`](sheet::Sheet) snapshot every analysis step reads from.
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::range::ReservedArea;

pub mod cell;
pub mod criteria;
pub mod memory;
pub mod range;
pub mod reference;
pub mod sheet;

/// A cell as reported by the grid provider, before formula resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceCell {
    /// Raw value (cached result for formula cells, if the source keeps one)
    pub value: String,
    /// Formula text when the cell holds a formula
    pub formula: Option<String>,
    /// Type hint from the source format
    pub kind: CellType,
}

impl SourceCell {
    pub fn new(kind: CellType, value: &str) -> Self {
        SourceCell {
            value: value.to_owned(),
            formula: None,
            kind,
        }
    }

    /// A formula cell together with the value the source last computed for it.
    pub fn formula(formula: &str, cached_value: &str) -> Self {
        SourceCell {
            value: cached_value.to_owned(),
            formula: Some(formula.to_owned()),
            kind: CellType::Formula,
        }
    }
}

/// A single sheet exposed by the host.
///
/// Implementors own reading the container format; failures there must be raised
/// before the sheet is handed over. Sheets are analysed on worker threads, hence `Sync`.
pub trait SheetSource: Sync {
    /// Sheet name
    fn name(&self) -> String;

    /// Last used (row, col), zero-based, or None for an empty sheet.
    fn dimensions(&self) -> Option<(usize, usize)>;

    /// Looks up the cell at (row, col).
    fn cell(&self, row: usize, col: usize) -> Option<SourceCell>;

    /// Returns the populated cells of a row as (col, cell) pairs in column order,
    /// or None when the source has no row object at that index.
    fn row(&self, row: usize) -> Option<Vec<(usize, SourceCell)>> {
        let (_, last_col) = self.dimensions()?;
        Some(
            (0..=last_col)
                .filter_map(|col| self.cell(row, col).map(|cell| (col, cell)))
                .collect(),
        )
    }

    /// Evaluates the formula at (row, col) to a literal value.
    fn evaluate(&self, row: usize, col: usize) -> anyhow::Result<String> {
        Ok(self.cell(row, col).map(|cell| cell.value).unwrap_or_default())
    }

    /// Areas already claimed by named tables and pivot tables.
    fn reserved_areas(&self) -> Vec<ReservedArea> {
        Vec::new()
    }
}

/// A workbook exposed by the host: an ordered collection of sheets.
pub trait Workbook: Sync {
    /// Workbook (file) name
    fn name(&self) -> String;

    /// Sheets in workbook order.
    fn sheets(&self) -> Vec<&dyn SheetSource>;
}
