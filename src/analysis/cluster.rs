//! Density-based spatial clustering (DBSCAN) of cell coordinates.
use crate::spreadsheet::cell::CellCoordinate;
use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::debug;

/// Errors related to analysis options.
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Invalid neighborhood radius '{0}': must be a finite number greater than 0")]
    InvalidEpsilon(f64),

    #[error("Invalid minimum neighbor count '{0}': must be at least 1")]
    InvalidMinPoints(usize),
}

/// DBSCAN parameters.
///
/// With the default radius of 1.5, orthogonally and diagonally adjacent cells are
/// neighbors, so a single blank row or column does not split a cluster but a wider
/// gap does.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClusterParams {
    /// Neighborhood radius in row/col space (Euclidean)
    pub epsilon: f64,
    /// Number of other points required within `epsilon` for a core point
    pub min_points: usize,
}

impl ClusterParams {
    pub const DEFAULT_EPSILON: f64 = 1.5;
    pub const DEFAULT_MIN_POINTS: usize = 2;

    pub fn new(epsilon: f64, min_points: usize) -> Result<Self, OptionsError> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            Err(OptionsError::InvalidEpsilon(epsilon))?
        }
        if min_points == 0 {
            Err(OptionsError::InvalidMinPoints(min_points))?
        }
        Ok(ClusterParams { epsilon, min_points })
    }
}

impl Default for ClusterParams {
    fn default() -> Self {
        ClusterParams {
            epsilon: Self::DEFAULT_EPSILON,
            min_points: Self::DEFAULT_MIN_POINTS,
        }
    }
}

/// Result of one clustering call: every input point is in exactly one cluster or in noise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Clustering {
    /// Clusters in discovery order; members in expansion order
    pub clusters: Vec<Vec<CellCoordinate>>,
    /// Points that belong to no cluster, in input order
    pub noise: Vec<CellCoordinate>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Label {
    Unvisited,
    Noise,
    Member(usize),
}

/// Buckets points into square cells of side `epsilon`, so every neighbor of a point
/// lies in the point's own bucket or one of the eight around it.
struct NeighborIndex<'a> {
    points: &'a [CellCoordinate],
    epsilon: f64,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl<'a> NeighborIndex<'a> {
    fn new(points: &'a [CellCoordinate], epsilon: f64) -> Self {
        let mut buckets = HashMap::<(i64, i64), Vec<usize>>::new();
        for (index, point) in points.iter().enumerate() {
            buckets.entry(Self::bucket(point, epsilon)).or_default().push(index);
        }
        NeighborIndex { points, epsilon, buckets }
    }

    fn bucket(point: &CellCoordinate, epsilon: f64) -> (i64, i64) {
        (
            (point.row as f64 / epsilon).floor() as i64,
            (point.col as f64 / epsilon).floor() as i64,
        )
    }

    /// Indexes of the other points within `epsilon` of the given point.
    fn neighbors(&self, index: usize) -> Vec<usize> {
        let point = &self.points[index];
        let (row, col) = Self::bucket(point, self.epsilon);
        let mut neighbors = Vec::new();
        for bucket_row in row - 1..=row + 1 {
            for bucket_col in col - 1..=col + 1 {
                let Some(candidates) = self.buckets.get(&(bucket_row, bucket_col)) else {
                    continue;
                };
                neighbors.extend(candidates.iter().copied().filter(|candidate| {
                    *candidate != index && point.distance(&self.points[*candidate]) <= self.epsilon
                }));
            }
        }
        neighbors.sort_unstable();
        neighbors
    }
}

/// Groups coordinates into density clusters plus noise.
///
/// A point is a core point when at least `min_points` other points lie within
/// `epsilon`. Core points reachable through each other's neighborhoods form one
/// cluster; non-core points next to a core point join it as border points, owned
/// by whichever cluster reaches them first. Duplicate coordinates are collapsed.
pub fn cluster(points: &[CellCoordinate], params: &ClusterParams) -> Clustering {
    let mut seen = HashSet::<CellCoordinate>::new();
    let points: Vec<CellCoordinate> = points.iter().copied().filter(|point| seen.insert(*point)).collect();
    let index = NeighborIndex::new(&points, params.epsilon);
    let mut labels = vec![Label::Unvisited; points.len()];
    let mut clusters = Vec::<Vec<CellCoordinate>>::new();

    for start in 0..points.len() {
        if labels[start] != Label::Unvisited {
            continue;
        }
        let neighbors = index.neighbors(start);
        if neighbors.len() < params.min_points {
            labels[start] = Label::Noise;
            continue;
        }

        let id = clusters.len();
        labels[start] = Label::Member(id);
        let mut members = vec![points[start]];
        let mut queue = VecDeque::from(neighbors);
        while let Some(current) = queue.pop_front() {
            match labels[current] {
                Label::Member(_) => continue,
                Label::Noise => {
                    // Border point: already known not to be core
                    labels[current] = Label::Member(id);
                    members.push(points[current]);
                }
                Label::Unvisited => {
                    labels[current] = Label::Member(id);
                    members.push(points[current]);
                    let neighbors = index.neighbors(current);
                    if neighbors.len() >= params.min_points {
                        queue.extend(neighbors);
                    }
                }
            }
        }
        clusters.push(members);
    }

    let noise: Vec<CellCoordinate> = points
        .iter()
        .zip(labels.iter())
        .filter(|(_, label)| **label == Label::Noise)
        .map(|(point, _)| *point)
        .collect();
    debug!(points = points.len(), clusters = clusters.len(), noise = noise.len(), "clustered cells");
    Clustering { clusters, noise }
}
