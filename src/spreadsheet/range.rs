use crate::error::RegionError;
use crate::spreadsheet::cell::CellCoordinate;
use crate::spreadsheet::reference::col_to_index;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::row_to_index;
use regex::Regex;
use serde::Serialize;
use serde::Serializer;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use thiserror::Error;

/// Errors related to A1-style range parsing.
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Invalid range format '{0}'")]
    FormatError(String),
}

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?([A-Z]+)\$?(\d+)(:\$?([A-Z]+)\$?(\d+))?$").expect("Hardcode regex pattern")
});

/// An axis-aligned block of cells with inclusive, zero-based bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Area {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

/// Start and end cell of an area in A1 notation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Boundaries {
    pub start_cell: String,
    pub end_cell: String,
}

impl Area {
    /// Creates the area spanned by two corners, in any order.
    pub fn new(first: CellCoordinate, last: CellCoordinate) -> Self {
        Area {
            first_row: first.row.min(last.row),
            first_col: first.col.min(last.col),
            last_row: first.row.max(last.row),
            last_col: first.col.max(last.col),
        }
    }

    /// Creates a single-cell area.
    pub fn cell(row: usize, col: usize) -> Self {
        Area {
            first_row: row,
            first_col: col,
            last_row: row,
            last_col: col,
        }
    }

    /// Returns the minimal area covering every coordinate, or None when there are none.
    pub fn around<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = CellCoordinate>,
    {
        coordinates.into_iter().fold(None, |area: Option<Area>, coordinate| {
            Some(match area {
                Some(area) => area.expand(coordinate.row, coordinate.col),
                None => Area::cell(coordinate.row, coordinate.col),
            })
        })
    }

    /// Returns the smallest area covering this one and the given cell.
    pub fn expand(&self, row: usize, col: usize) -> Self {
        Area {
            first_row: self.first_row.min(row),
            first_col: self.first_col.min(col),
            last_row: self.last_row.max(row),
            last_col: self.last_col.max(col),
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.first_row <= row && row <= self.last_row && self.first_col <= col && col <= self.last_col
    }

    pub fn contains_area(&self, other: &Area) -> bool {
        self.contains(other.first_row, other.first_col) && self.contains(other.last_row, other.last_col)
    }

    pub fn intersects(&self, other: &Area) -> bool {
        self.first_row <= other.last_row
            && other.first_row <= self.last_row
            && self.first_col <= other.last_col
            && other.first_col <= self.last_col
    }

    pub fn row_count(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    pub fn col_count(&self) -> usize {
        self.last_col - self.first_col + 1
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.first_row..=self.last_row
    }

    pub fn cols(&self) -> RangeInclusive<usize> {
        self.first_col..=self.last_col
    }

    pub fn boundaries(&self) -> Boundaries {
        Boundaries {
            start_cell: index_to_reference(self.first_row, self.first_col),
            end_cell: index_to_reference(self.last_row, self.last_col),
        }
    }
}

impl TryFrom<&str> for Area {
    type Error = RegionError;

    /// Parses an A1-style area ("B2:D9", "$A$1:$C$3", "C4") optionally prefixed by a sheet name.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let reference = value.rsplit('!').next().unwrap_or(value).to_ascii_uppercase();
        let captures = RANGE_PATTERN
            .captures(reference.as_str())
            .ok_or(RangeError::FormatError(value.to_owned()))?;
        let first_col = captures.get(1).and_then(|it| col_to_index(it.as_str()));
        let first_row = captures.get(2).and_then(|it| row_to_index(it.as_str()));
        let first = first_row
            .zip(first_col)
            .ok_or(RangeError::FormatError(value.to_owned()))?;
        let last = match (captures.get(5), captures.get(4)) {
            (Some(row), Some(col)) => row_to_index(row.as_str())
                .zip(col_to_index(col.as_str()))
                .ok_or(RangeError::FormatError(value.to_owned()))?,
            _ => first,
        };
        Ok(Area::new(CellCoordinate::new(first.0, first.1), CellCoordinate::new(last.0, last.1)))
    }
}

impl Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let boundaries = self.boundaries();
        write!(f, "{}:{}", boundaries.start_cell, boundaries.end_cell)
    }
}

impl Serialize for Area {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.boundaries().serialize(serializer)
    }
}

/// Kind of structure that already claims a reserved area.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReservedKind {
    NamedTable,
    PivotTable,
}

/// A cell range already claimed by a named table or a pivot table.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedArea {
    pub name: Option<String>,
    pub kind: ReservedKind,
    #[serde(rename = "boundaries")]
    pub area: Area,
}

impl ReservedArea {
    pub fn named_table(name: &str, area: Area) -> Self {
        ReservedArea {
            name: Some(name.to_owned()),
            kind: ReservedKind::NamedTable,
            area,
        }
    }

    pub fn pivot_table(name: &str, area: Area) -> Self {
        ReservedArea {
            name: Some(name.to_owned()),
            kind: ReservedKind::PivotTable,
            area,
        }
    }

    /// Builds a reserved area from an A1-style reference such as a pivot table location.
    pub fn parse(kind: ReservedKind, name: Option<&str>, reference: &str) -> Result<Self, RegionError> {
        Ok(ReservedArea {
            name: name.map(str::to_owned),
            kind,
            area: Area::try_from(reference)?,
        })
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.area.contains(row, col)
    }
}

/// Union of reserved areas used as an exclusion filter. Overlaps are harmless.
#[derive(Clone, Debug, Default)]
pub struct ReservedAreas(Vec<ReservedArea>);

impl ReservedAreas {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.0.iter().any(|area| area.contains(row, col))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReservedArea> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ReservedArea> {
        self.0
    }
}

impl From<Vec<ReservedArea>> for ReservedAreas {
    fn from(areas: Vec<ReservedArea>) -> Self {
        ReservedAreas(areas)
    }
}

impl FromIterator<ReservedArea> for ReservedAreas {
    fn from_iter<I: IntoIterator<Item = ReservedArea>>(iter: I) -> Self {
        ReservedAreas(iter.into_iter().collect())
    }
}
