//! Property-based tests for the inference invariants:
//! - every non-reserved, non-blank cell lands in exactly one region
//! - detection over a fully visited area finds nothing
//! - a larger radius never drops a clustered point or splits a cluster's core
//! - refined rectangles stay inside their region and never overlap
//! - type classification is total and deterministic

use proptest::prelude::*;
use sheet_regions::analysis::cluster::cluster;
use sheet_regions::analysis::datatype::check_data_type_row;
use sheet_regions::analysis::datatype::detect_data_type;
use sheet_regions::analysis::rectangle::detect_rectangles;
use sheet_regions::analysis::rectangle::VisitedMask;
use sheet_regions::analyze_sheet;
use sheet_regions::Area;
use sheet_regions::Cell;
use sheet_regions::CellCoordinate;
use sheet_regions::CellType;
use sheet_regions::ClusterParams;
use sheet_regions::DataType;
use sheet_regions::MemorySheet;
use sheet_regions::Options;
use sheet_regions::ReservedArea;
use sheet_regions::Sheet;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{1,6}",
        "[0-9]{1,4}",
        "[0-9]{1,3}\\.[0-9]{1,2}",
        Just("true".to_owned()),
        Just("2024-01-15".to_owned()),
        Just(" ".to_owned()),
    ]
}

fn cells() -> impl Strategy<Value = BTreeMap<(usize, usize), String>> {
    prop::collection::btree_map((0usize..14, 0usize..10), value(), 0..80)
}

fn coordinates() -> impl Strategy<Value = Vec<CellCoordinate>> {
    prop::collection::vec((0usize..20, 0usize..20), 0..60)
        .prop_map(|points| points.into_iter().map(|(row, col)| CellCoordinate::new(row, col)).collect())
}

fn snapshot(cells: &BTreeMap<(usize, usize), String>) -> Sheet {
    let mut sheet = Sheet::new("Sheet1");
    for ((row, col), value) in cells.iter().filter(|(_, value)| !value.trim().is_empty()) {
        sheet.push(Cell::new(*row, *col, CellType::String, value));
    }
    sheet
}

/// Number of other points within `epsilon`.
fn neighbors(points: &[CellCoordinate], index: usize, epsilon: f64) -> usize {
    points
        .iter()
        .enumerate()
        .filter(|(other, point)| *other != index && point.distance(&points[index]) <= epsilon)
        .count()
}

proptest! {
    #[test]
    fn partition_covers_every_cell_once(cells in cells(), reserved in (0usize..14, 0usize..10, 0usize..4, 0usize..4)) {
        let (row, col, rows, cols) = reserved;
        let reserved = Area::new(CellCoordinate::new(row, col), CellCoordinate::new(row + rows, col + cols));
        let mut source = MemorySheet::new("Sheet1");
        for ((row, col), value) in &cells {
            source.set_value(*row, *col, value);
        }
        source.reserve(ReservedArea::named_table("Reserved", reserved));
        source.reserve(ReservedArea::pivot_table("Overlap", reserved));

        let analysis = analyze_sheet(&source, &Options::default()).unwrap();
        let expected: BTreeSet<(usize, usize)> = cells
            .iter()
            .filter(|((row, col), value)| !value.trim().is_empty() && !reserved.contains(*row, *col))
            .map(|(position, _)| *position)
            .collect();
        let mut seen = Vec::new();
        for region in &analysis.processed.table_regions {
            seen.extend(region.cells.iter().map(|cell| (cell.row, cell.col)));
        }
        seen.extend(analysis.processed.non_table_regions.iter().map(|region| (region.cell.row, region.cell.col)));

        prop_assert_eq!(seen.len(), expected.len());
        prop_assert_eq!(seen.into_iter().collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn detection_marks_everything_once(cells in cells()) {
        let sheet = snapshot(&cells);
        if let Some(area) = sheet.area() {
            let mut mask = VisitedMask::new(area);
            detect_rectangles(&sheet, &area, &mut mask);
            prop_assert!(detect_rectangles(&sheet, &area, &mut mask).is_empty());

            let mut mask = VisitedMask::new(area);
            mask.mark(&area);
            prop_assert!(mask.is_fully_visited(&area));
            prop_assert!(detect_rectangles(&sheet, &area, &mut mask).is_empty());
        }
    }

    #[test]
    fn rectangles_are_contained_and_disjoint(cells in cells()) {
        let mut source = MemorySheet::new("Sheet1");
        for ((row, col), value) in &cells {
            source.set_value(*row, *col, value);
        }
        let analysis = analyze_sheet(&source, &Options::default()).unwrap();
        for region in &analysis.processed.table_regions {
            for (index, rectangle) in region.tables.iter().enumerate() {
                prop_assert!(region.area.contains_area(rectangle));
                prop_assert!(region.tables[index + 1..].iter().all(|other| !other.intersects(rectangle)));
            }
        }
    }

    #[test]
    fn clustering_partitions_input(points in coordinates()) {
        let clustering = cluster(&points, &ClusterParams::default());
        let distinct: BTreeSet<CellCoordinate> = points.iter().copied().collect();
        let mut seen: Vec<CellCoordinate> = clustering.clusters.iter().flatten().copied().collect();
        seen.extend(clustering.noise.iter().copied());
        prop_assert_eq!(seen.len(), distinct.len());
        prop_assert_eq!(seen.into_iter().collect::<BTreeSet<_>>(), distinct);
        prop_assert!(clustering.clusters.iter().all(|members| !members.is_empty()));
    }

    #[test]
    fn larger_radius_never_splits_clusters(
        points in coordinates(),
        epsilon in 1.0f64..3.0,
        delta in 0.0f64..2.0,
        min_points in 1usize..4,
    ) {
        let small = ClusterParams::new(epsilon, min_points).unwrap();
        let large = ClusterParams::new(epsilon + delta, min_points).unwrap();
        let before = cluster(&points, &small);
        let after = cluster(&points, &large);

        let owner: BTreeMap<CellCoordinate, usize> = after
            .clusters
            .iter()
            .enumerate()
            .flat_map(|(id, members)| members.iter().map(move |point| (*point, id)))
            .collect();
        let distinct: Vec<CellCoordinate> = points
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        for members in &before.clusters {
            // Clustered points stay clustered
            prop_assert!(members.iter().all(|point| owner.contains_key(point)));

            // Core points stay together
            let cores: BTreeSet<usize> = members
                .iter()
                .filter(|point| {
                    let index = distinct.iter().position(|other| other == *point).unwrap();
                    neighbors(&distinct, index, epsilon) >= min_points
                })
                .map(|point| owner[point])
                .collect();
            prop_assert!(cores.len() <= 1);
        }
    }

    #[test]
    fn classification_is_total_and_deterministic(value in "\\PC{0,24}") {
        let kind = detect_data_type(&value);
        prop_assert_eq!(kind, detect_data_type(&value));
        if kind != DataType::String {
            prop_assert!(check_data_type_row(&value));
        }
    }
}
