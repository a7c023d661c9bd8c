//! Rectangle boundary detection inside a region's bounding box.
//!
//! Rows are scanned top to bottom for runs of unvisited, non-blank cells. Each run is
//! grown downward while the data types of its columns stay consistent, trimmed of
//! trailing blank rows, then marked visited so later runs never overlap it.
use crate::analysis::datatype::check_data_type_row;
use crate::analysis::datatype::detect_data_type;
use crate::analysis::datatype::DataType;
use crate::spreadsheet::range::Area;
use crate::spreadsheet::sheet::Sheet;
use tracing::trace;

/// Tracks which cells of an area are already covered by a discovered rectangle.
#[derive(Clone, Debug)]
pub struct VisitedMask {
    area: Area,
    cells: Vec<bool>,
}

impl VisitedMask {
    pub fn new(area: Area) -> Self {
        VisitedMask {
            area,
            cells: vec![false; area.row_count() * area.col_count()],
        }
    }

    pub fn area(&self) -> &Area {
        &self.area
    }

    fn position(&self, row: usize, col: usize) -> Option<usize> {
        self.area
            .contains(row, col)
            .then(|| (row - self.area.first_row) * self.area.col_count() + (col - self.area.first_col))
    }

    /// Cells outside the mask are never visited.
    pub fn is_visited(&self, row: usize, col: usize) -> bool {
        self.position(row, col).map(|position| self.cells[position]).unwrap_or(false)
    }

    /// Marks every cell of `area` that lies inside the mask.
    pub fn mark(&mut self, area: &Area) {
        if !self.area.intersects(area) {
            return;
        }
        let rows = area.first_row.max(self.area.first_row)..=area.last_row.min(self.area.last_row);
        let cols = area.first_col.max(self.area.first_col)..=area.last_col.min(self.area.last_col);
        for row in rows {
            for col in cols.clone() {
                if let Some(position) = self.position(row, col) {
                    self.cells[position] = true;
                }
            }
        }
    }

    pub fn is_fully_visited(&self, area: &Area) -> bool {
        area.rows().all(|row| area.cols().all(|col| self.is_visited(row, col)))
    }
}

fn is_open(sheet: &Sheet, mask: Option<&VisitedMask>, row: usize, col: usize) -> bool {
    sheet.value(row, col).is_some() && !mask.map(|mask| mask.is_visited(row, col)).unwrap_or(false)
}

/// Finds disjoint rectangles of homogeneous data within `area`.
///
/// # Arguments
/// * `sheet` - The grid snapshot
/// * `area` - The range to scan, usually a region's bounding box or a block of it
/// * `mask` - Visited cells; every returned rectangle is marked in it
///
/// # Returns
/// Rectangles in discovery order (row-major by top-left corner), each inside `area`.
pub fn detect_rectangles(sheet: &Sheet, area: &Area, mask: &mut VisitedMask) -> Vec<Area> {
    let mut rectangles = Vec::new();
    for row in area.rows() {
        let mut col = area.first_col;
        while col <= area.last_col {
            if !is_open(sheet, Some(&*mask), row, col) {
                col += 1;
                continue;
            }
            let mut run_end = col;
            while run_end < area.last_col && is_open(sheet, Some(&*mask), row, run_end + 1) {
                run_end += 1;
            }

            let (first_col, last_col) = extend_span(sheet, row, col, run_end, area, Some(&*mask));
            let last_row = grow(sheet, area, mask, row, first_col, last_col);
            let last_row = narrow_last_row(sheet, row, first_col, last_col, last_row);
            let rectangle = Area {
                first_row: row,
                first_col,
                last_row,
                last_col,
            };
            mask.mark(&rectangle);
            trace!(rectangle = %rectangle, "detected rectangle");
            rectangles.push(rectangle);
            col = last_col.max(run_end) + 1;
        }
    }
    rectangles
}

/// Types of the non-blank cells of one row across a column span.
fn row_types(sheet: &Sheet, row: usize, first_col: usize, last_col: usize) -> Vec<Option<DataType>> {
    (first_col..=last_col)
        .map(|col| sheet.value(row, col).map(detect_data_type))
        .collect()
}

/// Returns the last row of the vertical growth starting below `row`.
///
/// The first row below the segment only sets the baseline (the segment itself is
/// usually a header). Every later row must agree with the last accepted row in each
/// column where both hold a value.
fn grow(sheet: &Sheet, area: &Area, mask: &VisitedMask, row: usize, first_col: usize, last_col: usize) -> usize {
    let mut last_row = row;
    let mut previous: Option<Vec<Option<DataType>>> = None;
    for candidate in row + 1..=area.last_row {
        if (first_col..=last_col).any(|col| mask.is_visited(candidate, col)) {
            break;
        }
        let current = row_types(sheet, candidate, first_col, last_col);
        if current.iter().all(Option::is_none) {
            break;
        }
        if let Some(previous) = &previous {
            let mismatch = previous.iter().zip(current.iter()).any(|types| match types {
                (Some(previous), Some(current)) => previous != current,
                _ => false,
            });
            if mismatch {
                break;
            }
        }
        previous = Some(current);
        last_row = candidate;
    }
    last_row
}

/// Extends a segment left and right over label cells.
///
/// Each side stops at the first blank (or visited) cell or at the edge of `bounds`. If a
/// cell on either side looks like data per [`check_data_type_row`], the extension is
/// abandoned and the original span is returned.
pub fn extend_span(
    sheet: &Sheet,
    row: usize,
    first_col: usize,
    last_col: usize,
    bounds: &Area,
    mask: Option<&VisitedMask>,
) -> (usize, usize) {
    let label = |col: usize| -> Option<Option<usize>> {
        if !is_open(sheet, mask, row, col) {
            return None;
        }
        let value = sheet.value(row, col)?;
        Some((!check_data_type_row(value)).then_some(col))
    };

    let mut left = first_col;
    while left > bounds.first_col {
        match label(left - 1) {
            None => break,
            Some(None) => return (first_col, last_col),
            Some(Some(col)) => left = col,
        }
    }

    let mut right = last_col;
    while right < bounds.last_col {
        match label(right + 1) {
            None => break,
            Some(None) => return (first_col, last_col),
            Some(Some(col)) => right = col,
        }
    }

    (left, right)
}

/// Walks upward from `last_row` to the first row with data in the column span.
/// Returns `last_row` unchanged when no such row exists down to `first_row`.
pub fn narrow_last_row(sheet: &Sheet, first_row: usize, first_col: usize, last_col: usize, last_row: usize) -> usize {
    (first_row..=last_row)
        .rev()
        .find(|row| (first_col..=last_col).any(|col| sheet.value(*row, col).is_some()))
        .unwrap_or(last_row)
}
