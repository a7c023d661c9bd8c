//! Splits a region's bounding box into vertically stacked table blocks.
use crate::analysis::datatype::detect_data_type;
use crate::analysis::rectangle::extend_span;
use crate::spreadsheet::range::Area;
use crate::spreadsheet::sheet::Sheet;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use tracing::trace;

/// A horizontal boundary line on one row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub row: usize,
    pub first_col: usize,
    pub last_col: usize,
}

/// One block of rows carved out of a region, with the boundary lines first seen in it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBlock {
    #[serde(rename = "boundaries")]
    pub area: Area,
    pub lines: Vec<Line>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Segregation {
    /// Blocks from top to bottom
    pub blocks: Vec<TableBlock>,
    /// Every boundary line reserved while carving
    pub reserved: BTreeSet<Line>,
}

/// Carves `area` into blocks whose columns keep a consistent data type.
///
/// Each step takes the rows from the current first row down to [`last_row_index`],
/// then continues below it with the same column span. The first row strictly increases
/// every step, so the loop always terminates.
pub fn segregate(sheet: &Sheet, area: &Area) -> Segregation {
    let mut segregation = Segregation::default();
    let mut first_row = area.first_row;
    while first_row <= area.last_row {
        let remaining = Area { first_row, ..*area };
        let lines = boundary_lines(sheet, &remaining, &mut segregation.reserved);
        let last_row = last_row_index(sheet, &remaining);
        let block = Area {
            last_row,
            ..remaining
        };
        if has_data(sheet, &block) {
            trace!(block = %block, lines = lines.len(), "table block");
            segregation.blocks.push(TableBlock { area: block, lines });
        }
        first_row = last_row + 1;
    }
    segregation
}

fn has_data(sheet: &Sheet, area: &Area) -> bool {
    area.rows().any(|row| area.cols().any(|col| sheet.value(row, col).is_some()))
}

/// Finds the boundary lines below the blank cells of the first row.
///
/// For every column whose first-row cell is blank, the first non-blank cell further down
/// is a boundary point. Points on the same row form one line, which is then extended over
/// adjacent label cells. Only lines not yet in `reserved` are returned; they are added to it.
pub fn boundary_lines(sheet: &Sheet, area: &Area, reserved: &mut BTreeSet<Line>) -> Vec<Line> {
    let mut rows = BTreeMap::<usize, (usize, usize)>::new();
    for col in area.cols().filter(|col| sheet.value(area.first_row, *col).is_none()) {
        let Some(row) = area.rows().find(|row| sheet.value(*row, col).is_some()) else {
            continue;
        };
        rows.entry(row)
            .and_modify(|(first_col, last_col)| {
                *first_col = (*first_col).min(col);
                *last_col = (*last_col).max(col);
            })
            .or_insert((col, col));
    }

    rows.into_iter()
        .map(|(row, (first_col, last_col))| {
            let (first_col, last_col) = extend_span(sheet, row, first_col, last_col, area, None);
            Line { row, first_col, last_col }
        })
        .filter(|line| reserved.insert(*line))
        .collect()
}

/// Returns the last row of the block starting at the area's first row.
///
/// Each column is scanned downward from the row below the first row: the first value sets
/// the column's type and every later value of the same type extends the column, until a value
/// of another type appears. The block ends at the minimum over the columns that hold any
/// such value, and never before the first row.
pub fn last_row_index(sheet: &Sheet, area: &Area) -> usize {
    area.cols()
        .filter_map(|col| {
            let mut initial = None;
            let mut last_row = None;
            for row in area.first_row + 1..=area.last_row {
                let Some(value) = sheet.value(row, col) else {
                    continue;
                };
                let current = detect_data_type(value);
                if *initial.get_or_insert(current) != current {
                    break;
                }
                last_row = Some(row);
            }
            last_row
        })
        .min()
        .unwrap_or(area.first_row)
}
