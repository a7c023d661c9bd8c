//! Turns a clustering into table regions and standalone cells.
use crate::analysis::cluster::cluster;
use crate::analysis::cluster::ClusterParams;
use crate::analysis::cluster::Clustering;
use crate::analysis::column::header_columns;
use crate::analysis::column::ColumnInfo;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::range::Area;
use crate::spreadsheet::sheet::Sheet;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

/// A cluster of cells together with its bounding box.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRegion {
    /// Bounding box of the member cells
    #[serde(rename = "boundaries")]
    pub area: Area,
    pub row_count: usize,
    pub col_count: usize,
    /// Member cells in clustering order
    pub cells: Vec<Cell>,
    /// Header columns taken from the first row of the bounding box
    pub columns: Vec<ColumnInfo>,
    /// Rectangles found inside the region by refinement
    pub tables: Vec<Area>,
}

impl TableRegion {
    pub fn builder() -> TableRegionBuilder {
        TableRegionBuilder::default()
    }
}

/// Accumulates member cells in clustering order.
#[derive(Default)]
pub struct TableRegionBuilder {
    cells: Vec<Cell>,
}

impl TableRegionBuilder {
    pub fn push(&mut self, cell: Cell) -> &mut Self {
        self.cells.push(cell);
        self
    }

    /// Builds the region around the pushed cells, or None when no cell was pushed.
    pub fn build(self) -> Option<TableRegion> {
        let area = Area::around(self.cells.iter().map(Cell::coordinate))?;
        Some(TableRegion {
            area,
            row_count: area.row_count(),
            col_count: area.col_count(),
            columns: header_columns(&self.cells, &area),
            cells: self.cells,
            tables: Vec::new(),
        })
    }
}

/// A cell that belongs to no cluster.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonTableRegion {
    pub cell: Cell,
}

/// Classification of every non-blank cell of a sheet.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedSheet {
    pub table_regions: Vec<TableRegion>,
    pub non_table_regions: Vec<NonTableRegion>,
}

/// Materializes a clustering of the sheet's coordinates.
///
/// # Arguments
/// * `sheet` - The snapshot the coordinates were taken from
/// * `clustering` - Clusters and noise over those coordinates
///
/// # Returns
/// One `TableRegion` per non-empty cluster in cluster order, and one `NonTableRegion`
/// per noise point in noise order. Coordinates without a cell in the snapshot are skipped.
pub fn materialize(sheet: &Sheet, clustering: &Clustering) -> ProcessedSheet {
    let mut table_regions = Vec::with_capacity(clustering.clusters.len());
    for members in &clustering.clusters {
        let mut builder = TableRegion::builder();
        for coordinate in members {
            match sheet.cell(coordinate.row, coordinate.col) {
                Some(cell) => {
                    builder.push(cell.clone());
                }
                None => warn!(cell = %coordinate.reference(), "clustered coordinate has no cell"),
            }
        }
        if let Some(region) = builder.build() {
            debug!(boundaries = %region.area, cells = region.cells.len(), "table region");
            table_regions.push(region);
        }
    }

    let non_table_regions = clustering
        .noise
        .iter()
        .filter_map(|coordinate| sheet.cell(coordinate.row, coordinate.col))
        .map(|cell| NonTableRegion { cell: cell.clone() })
        .collect();

    ProcessedSheet {
        table_regions,
        non_table_regions,
    }
}

/// Clusters every cell of the sheet and materializes the result.
pub fn process_cells(sheet: &Sheet, params: &ClusterParams) -> ProcessedSheet {
    materialize(sheet, &cluster(&sheet.coordinates(), params))
}
