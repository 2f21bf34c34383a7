//! Geometric predicates behind layout classification.
//!
//! Every function here reads the absolute boxes of a container's direct
//! children and nothing else. The tolerances are absolute design units and
//! do not scale with node size.
//!
//! # Design decisions
//!
//! * **One implementation per predicate, parameterised by [`Axis`].**  Row
//!   and column detection are the same test with x and y swapped.
//! * **Alignment checks the tolerance strictly (`<`), detection inclusively
//!   (`<=`).**  A 5-unit deviation still counts as "on the line" but no longer
//!   as "flush with the edge".
//! * **Grid buckets round half to even**, so a child at x = 5 shares a
//!   column with x = 0 and one at x = 15 shares a column with x = 20.

use rustc_hash::FxHashMap;
use stratum_core::{visible_px, AxisAlignment, Direction, Geometry};

/// Maximum deviation from the mean cross position for children to share a line.
pub const AXIS_TOLERANCE: f64 = 5.0;
/// Maximum deviation from the mean center for `center` alignment.
pub const CENTER_TOLERANCE: f64 = 10.0;
/// Minimum main-axis spread for a line of children to count as a flow.
pub const MIN_SPREAD: f64 = 20.0;
/// Grid bucket width, in design units.
pub const GRID_BUCKET: f64 = 10.0;
/// Fewest children that can form a grid.
pub const MIN_GRID_CHILDREN: usize = 4;

// ───────────────────────────────────────────────────────────────────
// Axis
// ───────────────────────────────────────────────────────────────────

/// Main axis of a flow. `Horizontal` is a row, `Vertical` a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn direction(self) -> Direction {
        match self {
            Axis::Horizontal => Direction::Horizontal,
            Axis::Vertical => Direction::Vertical,
        }
    }

    #[inline(always)]
    fn main_start(self, g: &Geometry) -> f64 {
        match self {
            Axis::Horizontal => g.x,
            Axis::Vertical => g.y,
        }
    }

    #[inline(always)]
    fn main_end(self, g: &Geometry) -> f64 {
        match self {
            Axis::Horizontal => g.right(),
            Axis::Vertical => g.bottom(),
        }
    }

    #[inline(always)]
    fn cross_start(self, g: &Geometry) -> f64 {
        match self {
            Axis::Horizontal => g.y,
            Axis::Vertical => g.x,
        }
    }

    #[inline(always)]
    fn cross_end(self, g: &Geometry) -> f64 {
        match self {
            Axis::Horizontal => g.bottom(),
            Axis::Vertical => g.right(),
        }
    }

    #[inline(always)]
    fn cross_center(self, g: &Geometry) -> f64 {
        match self {
            Axis::Horizontal => g.center_y(),
            Axis::Vertical => g.center_x(),
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Smallest box enclosing every child.
pub fn bounding_box(children: &[Geometry]) -> Option<Geometry> {
    let (left, right) = min_max(children.iter().flat_map(|g| [g.x, g.right()]))?;
    let (top, bottom) = min_max(children.iter().flat_map(|g| [g.y, g.bottom()]))?;
    Some(Geometry::new(left, top, right - left, bottom - top))
}

// ───────────────────────────────────────────────────────────────────
// Flow detection
// ───────────────────────────────────────────────────────────────────

/// True when the children sit on one line along `axis` and are spread out
/// along it: at least two children, every cross position within
/// [`AXIS_TOLERANCE`] of the mean, main-axis spread above [`MIN_SPREAD`].
pub fn is_aligned(children: &[Geometry], axis: Axis) -> bool {
    if children.len() < 2 {
        return false;
    }
    let cross_mean = mean(children.iter().map(|g| axis.cross_start(g)));
    let on_line = children
        .iter()
        .all(|g| (axis.cross_start(g) - cross_mean).abs() <= AXIS_TOLERANCE);
    if !on_line {
        return false;
    }
    match min_max(children.iter().map(|g| axis.main_start(g))) {
        Some((lo, hi)) => hi - lo > MIN_SPREAD,
        None => false,
    }
}

/// Average positive gap between neighbours along `axis`.
///
/// Overlapping neighbours (negative gap) and touching ones are left out of
/// the average rather than clamped. `None` when no positive gap exists or
/// the average is too small to print as a length.
pub fn flow_gap(children: &[Geometry], axis: Axis) -> Option<f64> {
    let mut sorted: Vec<&Geometry> = children.iter().collect();
    sorted.sort_by(|a, b| axis.main_start(a).total_cmp(&axis.main_start(b)));

    let gaps: Vec<f64> = sorted
        .windows(2)
        .map(|pair| axis.main_start(pair[1]) - axis.main_end(pair[0]))
        .filter(|&gap| gap > 0.0)
        .collect();
    if gaps.is_empty() {
        return None;
    }
    visible_px(mean(gaps.into_iter()))
}

/// Cross-axis alignment of a flow along `axis`, first match wins:
/// start edges flush, end edges flush, centers close, then spread out.
pub fn cross_alignment(children: &[Geometry], axis: Axis) -> Option<AxisAlignment> {
    let (min_start, _) = min_max(children.iter().map(|g| axis.cross_start(g)))?;
    if children
        .iter()
        .all(|g| (axis.cross_start(g) - min_start).abs() < AXIS_TOLERANCE)
    {
        return Some(AxisAlignment::FlexStart);
    }

    let (_, max_end) = min_max(children.iter().map(|g| axis.cross_end(g)))?;
    if children
        .iter()
        .all(|g| (axis.cross_end(g) - max_end).abs() < AXIS_TOLERANCE)
    {
        return Some(AxisAlignment::FlexEnd);
    }

    let center_mean = mean(children.iter().map(|g| axis.cross_center(g)));
    if children
        .iter()
        .all(|g| (axis.cross_center(g) - center_mean).abs() < CENTER_TOLERANCE)
    {
        return Some(AxisAlignment::Center);
    }

    // Reaching here means at least two cross positions differ.
    if children.len() > 2 {
        return Some(AxisAlignment::SpaceBetween);
    }
    None
}

// ───────────────────────────────────────────────────────────────────
// Grid detection
// ───────────────────────────────────────────────────────────────────

/// Bucket index of a coordinate, rounding half to even.
#[inline]
pub fn grid_bucket(coord: f64) -> i32 {
    (coord / GRID_BUCKET).round_ties_even() as i32
}

/// Children grouped by bucket, in ascending bucket order.
fn bucket_groups<'a>(
    children: &'a [Geometry],
    coord: impl Fn(&Geometry) -> f64,
) -> Vec<(i32, Vec<&'a Geometry>)> {
    let mut groups: FxHashMap<i32, Vec<&Geometry>> = FxHashMap::default();
    for g in children {
        groups.entry(grid_bucket(coord(g))).or_default().push(g);
    }
    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_unstable_by_key(|(bucket, _)| *bucket);
    groups
}

/// Shape and spacing of a detected grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
    pub column_gap: Option<f64>,
    pub row_gap: Option<f64>,
}

impl GridShape {
    /// True when the children do not fill the grid cell-for-cell.
    pub fn is_irregular(&self, child_count: usize) -> bool {
        self.columns * self.rows != child_count
    }
}

/// Detect a grid: at least [`MIN_GRID_CHILDREN`] children spread over more
/// than one bucket on both axes.
pub fn grid_shape(children: &[Geometry]) -> Option<GridShape> {
    if children.len() < MIN_GRID_CHILDREN {
        return None;
    }
    let columns = bucket_groups(children, |g| g.x);
    let rows = bucket_groups(children, |g| g.y);
    if columns.len() < 2 || rows.len() < 2 {
        return None;
    }

    Some(GridShape {
        columns: columns.len(),
        rows: rows.len(),
        column_gap: track_gap(&columns, |g| g.x, Geometry::right),
        row_gap: track_gap(&rows, |g| g.y, Geometry::bottom),
    })
}

/// Mean distance from the far edge of one track to the near edge of the
/// next. Unlike flow gaps, negative deltas stay in the average; only the
/// result has to be positive.
fn track_gap(
    tracks: &[(i32, Vec<&Geometry>)],
    start: impl Fn(&Geometry) -> f64,
    end: impl Fn(&Geometry) -> f64,
) -> Option<f64> {
    let deltas: Vec<f64> = tracks
        .windows(2)
        .filter_map(|pair| {
            let far = min_max(pair[0].1.iter().map(|g| end(*g)))?.1;
            let near = min_max(pair[1].1.iter().map(|g| start(*g)))?.0;
            Some(near - far)
        })
        .collect();
    if deltas.is_empty() {
        return None;
    }
    visible_px(mean(deltas.into_iter()))
}

// ───────────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────────
