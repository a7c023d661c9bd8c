//! # Spreadsheet Region Inference
//!
//! Infers tabular structure from the raw cell grid of a spreadsheet. Given every
//! non-empty cell that is not already claimed by a named table or a pivot table,
//! the crate decides which cells form coherent rectangular tables and which remain
//! scattered, unstructured data.
//!
//! ## Pipeline
//!
//! - **Grid snapshot**: a [`SheetSource`] is scanned into an in-memory [`Sheet`],
//!   skipping blank cells and cells inside reserved areas.
//! - **Density clustering**: cell coordinates are grouped with DBSCAN
//!   (`epsilon = 1.5`, `min_points = 2` by default) into clusters and noise.
//! - **Region materialization**: each cluster becomes a [`TableRegion`], each
//!   noise point a [`NonTableRegion`].
//! - **Refinement**: every table region is carved into stacked blocks and scanned
//!   for disjoint, type-consistent rectangles.
//!
//! Reading spreadsheet files, evaluating formulas and serializing the results are
//! left to the host: the crate only consumes an already materialized grid.
pub mod analysis;
pub mod error;
pub mod spreadsheet;

pub use crate::analysis::analyze_sheet;
pub use crate::analysis::analyze_workbook;
pub use crate::analysis::cluster::ClusterParams;
pub use crate::analysis::datatype::DataType;
pub use crate::analysis::region::NonTableRegion;
pub use crate::analysis::region::ProcessedSheet;
pub use crate::analysis::region::TableRegion;
pub use crate::analysis::Options;
pub use crate::analysis::SheetAnalysis;
pub use crate::error::RegionError;
pub use crate::spreadsheet::cell::Cell;
pub use crate::spreadsheet::cell::CellCoordinate;
pub use crate::spreadsheet::cell::CellType;
pub use crate::spreadsheet::criteria::Criteria;
pub use crate::spreadsheet::memory::MemorySheet;
pub use crate::spreadsheet::memory::MemoryWorkbook;
pub use crate::spreadsheet::range::Area;
pub use crate::spreadsheet::range::ReservedArea;
pub use crate::spreadsheet::sheet::Sheet;
pub use crate::spreadsheet::SheetSource;
pub use crate::spreadsheet::Workbook;
