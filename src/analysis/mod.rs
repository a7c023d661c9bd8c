//! Region inference over a grid snapshot.
//!
//! A sheet pass runs in two stages: density clustering of the cell coordinates
//! ([`region::process_cells`]), then refinement of every table region into stacked
//! blocks ([`segregate::segregate`]) and disjoint rectangles
//! ([`rectangle::detect_rectangles`]). Each pass owns its snapshot and visited masks,
//! so sheets of a workbook are analysed in parallel.
pub mod cluster;
pub mod column;
pub mod datatype;
pub mod rectangle;
pub mod region;
pub mod segregate;

use crate::analysis::cluster::ClusterParams;
use crate::analysis::rectangle::detect_rectangles;
use crate::analysis::rectangle::VisitedMask;
use crate::analysis::region::process_cells;
use crate::analysis::region::ProcessedSheet;
use crate::analysis::region::TableRegion;
use crate::analysis::segregate::segregate;
use crate::error::RegionError;
use crate::error::ResultMessage;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::range::Area;
use crate::spreadsheet::range::ReservedArea;
use crate::spreadsheet::range::ReservedAreas;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::SheetSource;
use crate::spreadsheet::Workbook;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;
use tracing::trace;

/// Options of an analysis run.
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Clustering parameters
    pub cluster: ClusterParams,
    /// Sheet selection and refinement switch
    pub criteria: Criteria,
}

/// The inferred structure of one sheet.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetAnalysis {
    pub sheet_name: String,
    /// Areas excluded from inference
    pub reserved: Vec<ReservedArea>,
    #[serde(flatten)]
    pub processed: ProcessedSheet,
}

/// Analyses a single sheet.
///
/// # Arguments
/// * `source` - The host's sheet
/// * `options` - Clustering parameters and the refinement switch
///
/// # Returns
/// Table regions and standalone cells of the sheet. When refinement is enabled every
/// table region also lists the rectangles found inside it.
///
/// # Errors
///
/// Returns the provider's formula evaluation error, prefixed with the cell reference.
pub fn analyze_sheet(source: &dyn SheetSource, options: &Options) -> Result<SheetAnalysis, RegionError> {
    let reserved = ReservedAreas::from(source.reserved_areas());
    let sheet = Sheet::scan(source, &reserved)?;
    let mut processed = process_cells(&sheet, &options.cluster);
    if options.criteria.refine {
        for region in processed.table_regions.iter_mut() {
            region.tables = refine(&sheet, region);
        }
    }
    debug!(
        sheet = %sheet.name,
        tables = processed.table_regions.len(),
        cells = processed.non_table_regions.len(),
        "analysed sheet"
    );
    Ok(SheetAnalysis {
        sheet_name: sheet.name,
        reserved: reserved.into_vec(),
        processed,
    })
}

/// Finds the rectangles of a table region.
///
/// The region's bounding box is carved into blocks, and each block is scanned for
/// rectangles with one visited mask shared across the whole region.
pub fn refine(sheet: &Sheet, region: &TableRegion) -> Vec<Area> {
    let mut mask = VisitedMask::new(region.area);
    let segregation = segregate(sheet, &region.area);
    let rectangles: Vec<Area> = segregation
        .blocks
        .iter()
        .flat_map(|block| detect_rectangles(sheet, &block.area, &mut mask))
        .collect();
    trace!(
        region = %region.area,
        blocks = segregation.blocks.len(),
        rectangles = rectangles.len(),
        "refined region"
    );
    rectangles
}

/// Analyses every sheet accepted by the criteria, in parallel.
///
/// Results keep workbook order. The first failing sheet fails the whole call, with the
/// sheet name prefixed to the error.
pub fn analyze_workbook(workbook: &dyn Workbook, options: &Options) -> Result<Vec<SheetAnalysis>, RegionError> {
    let sheets = options.criteria.select(workbook.sheets());
    debug!(workbook = %workbook.name(), sheets = sheets.len(), "analysing workbook");
    sheets
        .par_iter()
        .map(|sheet| analyze_sheet(*sheet, options).with_prefix(&sheet.name()))
        .collect()
}
