//! Label placement at a region's visual center.
//!
//! For simple convex regions the centroid would do, but concave shells and
//! holes can push the centroid outside the paintable area entirely. [`place`]
//! instead computes the pole of inaccessibility — the interior point that
//! maximizes the distance to the nearest shell or hole edge — via the cell
//! subdivision search of Mapbox's polylabel algorithm, and returns that
//! distance as the label's clearance.
//!
//! Traced contours are occasionally degenerate (zero-width spurs, bowtie
//! crossings). Self-intersecting rings go through a best-effort [`repair`]
//! that keeps the largest simple loop; a shell that cannot be repaired makes
//! [`place`] return `None`, which callers treat as "leave this region
//! unlabeled", never as a fatal error.

use crate::{region::shoelace_area, region::Region, LabelPoint};
use ordered_float::OrderedFloat;
use std::collections::BinaryHeap;

/// A closed loop of `(x, y)` vertices; the closing edge is implicit.
pub type Ring = Vec<(f64, f64)>;

/// Vertices closer than this are merged when peeling repaired loops apart.
const MERGE_EPSILON: f64 = 1e-9;

/// Repair gives up beyond this many self-intersections.
const MAX_REPAIR_INTERSECTIONS: usize = 256;

/// Hard cap on cells examined by the subdivision search, bounding worst-case
/// latency per region regardless of the tolerance requested.
const MAX_CELLS: usize = 65_536;

/// Computes the label point for a region.
///
/// The returned point lies inside the shell and outside every hole, at the
/// position maximizing clearance, refined until the clearance estimate is
/// within `tolerance` of optimal.
///
/// Returns `None` when the shell is degenerate (fewer than three vertices or
/// zero area), cannot be repaired, or encloses no interior once its holes are
/// accounted for. Holes that cannot be repaired are dropped individually
/// rather than failing the whole region.
#[must_use]
pub fn place(region: &Region, tolerance: f64) -> Option<LabelPoint> {
    let shell = ring_of(region.shell.points());
    if shell.len() < 3 {
        return None;
    }
    let shell = if is_simple(&shell) { shell } else { repair(&shell)? };
    if shoelace_area(&shell) == 0.0 {
        return None;
    }

    let holes = region
        .holes
        .iter()
        .filter_map(|hole| {
            let ring = ring_of(hole.points());
            if ring.len() < 3 || is_simple(&ring) {
                Some(ring)
            } else {
                repair(&ring)
            }
        })
        .collect::<Vec<_>>();

    let found = pole_of_inaccessibility(&shell, &holes, tolerance);
    (found.clearance > 0.0).then_some(found)
}

/// Converts integer contour vertices to a float ring.
fn ring_of(points: &[(i32, i32)]) -> Ring {
    points
        .iter()
        .map(|&(x, y)| (f64::from(x), f64::from(y)))
        .collect()
}

/// Cross product of `(b - a)` and `(c - a)`.
fn cross(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

/// Returns the parameters and location of a proper (transversal) crossing
/// between segments `a1-a2` and `b1-b2`, if any.
///
/// Endpoint touches and collinear overlaps do not count: they leave the
/// enclosed area unambiguous, so rings containing them are accepted as-is.
fn proper_crossing(
    a1: (f64, f64),
    a2: (f64, f64),
    b1: (f64, f64),
    b2: (f64, f64),
) -> Option<(f64, f64, (f64, f64))> {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);

    let crosses = ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0));
    if !crosses {
        return None;
    }

    let ta = d1 / (d1 - d2);
    let tb = d3 / (d3 - d4);
    let point = (a1.0 + ta * (a2.0 - a1.0), a1.1 + ta * (a2.1 - a1.1));
    Some((ta, tb, point))
}

/// Returns `true` if no two non-adjacent edges of the ring properly cross.
#[must_use]
pub fn is_simple(ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    for i in 0..n {
        for j in (i + 1)..n {
            // Adjacent edges share an endpoint; that is not a crossing.
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (a1, a2) = (ring[i], ring[(i + 1) % n]);
            let (b1, b2) = (ring[j], ring[(j + 1) % n]);
            if proper_crossing(a1, a2, b1, b2).is_some() {
                return false;
            }
        }
    }
    true
}

/// Best-effort repair of a self-intersecting ring.
///
/// Splits the ring at every proper edge crossing and keeps the resulting
/// simple loop with the largest enclosed area. Returns `None` when no loop
/// with positive area survives or the ring is too tangled to bother with.
#[must_use]
pub fn repair(ring: &[(f64, f64)]) -> Option<Ring> {
    let n = ring.len();
    if n < 3 {
        return None;
    }

    // Gather per-edge split points, parameterized along each edge.
    let mut splits: Vec<Vec<(f64, (f64, f64))>> = vec![Vec::new(); n];
    let mut crossings = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (a1, a2) = (ring[i], ring[(i + 1) % n]);
            let (b1, b2) = (ring[j], ring[(j + 1) % n]);
            if let Some((ta, tb, point)) = proper_crossing(a1, a2, b1, b2) {
                crossings += 1;
                if crossings > MAX_REPAIR_INTERSECTIONS {
                    return None;
                }
                splits[i].push((ta, point));
                splits[j].push((tb, point));
            }
        }
    }
    if crossings == 0 {
        return Some(ring.to_vec());
    }

    let mut augmented = Vec::with_capacity(n + 2 * crossings);
    for (i, &vertex) in ring.iter().enumerate() {
        augmented.push(vertex);
        splits[i].sort_by_key(|&(t, _)| OrderedFloat(t));
        augmented.extend(splits[i].iter().map(|&(_, p)| p));
    }

    // Peel simple loops off wherever the walk revisits a point.
    let close = |a: (f64, f64), b: (f64, f64)| {
        (a.0 - b.0).abs() < MERGE_EPSILON && (a.1 - b.1).abs() < MERGE_EPSILON
    };
    let mut best: Option<(f64, Ring)> = None;
    let mut stack: Ring = Vec::new();
    for point in augmented {
        if let Some(k) = stack.iter().rposition(|&q| close(q, point)) {
            consider_loop(&stack[k..], &mut best);
            stack.truncate(k + 1);
        } else {
            stack.push(point);
        }
    }
    consider_loop(&stack, &mut best);

    best.map(|(_, ring)| ring)
}

/// Keeps `candidate` as the repair result if it beats the best area so far.
fn consider_loop(candidate: &[(f64, f64)], best: &mut Option<(f64, Ring)>) {
    if candidate.len() < 3 {
        return;
    }
    let area = shoelace_area(candidate);
    if area > 0.0 && best.as_ref().is_none_or(|&(b, _)| area > b) {
        *best = Some((area, candidate.to_vec()));
    }
}

/// Squared distance from `(px, py)` to the segment `a-b`.
fn segment_distance_sq(px: f64, py: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
    let (mut x, mut y) = a;
    let dx = b.0 - x;
    let dy = b.1 - y;

    if dx != 0.0 || dy != 0.0 {
        let t = ((px - x) * dx + (py - y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            (x, y) = b;
        } else if t > 0.0 {
            x += dx * t;
            y += dy * t;
        }
    }

    let dx = px - x;
    let dy = py - y;
    dx * dx + dy * dy
}

/// Signed distance from a point to the polygon boundary: positive inside the
/// shell and outside all holes (even-odd rule over every ring), negative
/// elsewhere.
fn signed_distance(px: f64, py: f64, shell: &[(f64, f64)], holes: &[Ring]) -> f64 {
    let mut inside = false;
    let mut min_sq = f64::INFINITY;

    for ring in std::iter::once(shell).chain(holes.iter().map(Vec::as_slice)) {
        let n = ring.len();
        let mut j = n.wrapping_sub(1);
        for i in 0..n {
            let a = ring[i];
            let b = ring[j];
            if (a.1 > py) != (b.1 > py) && px < (b.0 - a.0) * (py - a.1) / (b.1 - a.1) + a.0 {
                inside = !inside;
            }
            min_sq = min_sq.min(segment_distance_sq(px, py, a, b));
            j = i;
        }
    }

    (if inside { 1.0 } else { -1.0 }) * min_sq.sqrt()
}

/// One candidate square in the subdivision search.
#[derive(Debug, Clone, Copy)]
struct Cell {
    /// Center x.
    x: f64,
    /// Center y.
    y: f64,
    /// Half the side length.
    half: f64,
    /// Signed distance from the center to the polygon boundary.
    dist: f64,
}

impl Cell {
    /// Evaluates a cell centered at `(x, y)`.
    fn new(x: f64, y: f64, half: f64, shell: &[(f64, f64)], holes: &[Ring]) -> Self {
        Self { x, y, half, dist: signed_distance(x, y, shell, holes) }
    }

    /// Upper bound on the distance any point inside the cell can achieve.
    fn potential(&self) -> f64 {
        self.dist + self.half * std::f64::consts::SQRT_2
    }
}

/// Max-heap ordering by potential.
#[derive(Debug, Clone, Copy)]
struct Queued(Cell);

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.0.potential()) == OrderedFloat(other.0.potential())
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        OrderedFloat(self.0.potential()).cmp(&OrderedFloat(other.0.potential()))
    }
}

/// Centroid of a ring, falling back to its first vertex for zero signed area.
fn centroid(ring: &[(f64, f64)]) -> (f64, f64) {
    let n = ring.len();
    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let f = a.0 * b.1 - b.0 * a.1;
        area += f;
        cx += (a.0 + b.0) * f;
        cy += (a.1 + b.1) * f;
    }
    if area == 0.0 {
        ring[0]
    } else {
        (cx / (3.0 * area), cy / (3.0 * area))
    }
}

/// Finds the interior point of the polygon-with-holes that maximizes the
/// distance to the nearest boundary edge.
///
/// Candidate cells are refined until the best achievable improvement drops
/// below `tolerance` (or the internal cell cap is reached). The returned
/// clearance is the true signed distance at the chosen point; it is negative
/// or zero when the polygon encloses no interior at all.
#[must_use]
pub fn pole_of_inaccessibility(shell: &[(f64, f64)], holes: &[Ring], tolerance: f64) -> LabelPoint {
    let xs = shell.iter().map(|p| p.0);
    let ys = shell.iter().map(|p| p.1);
    let min_x = xs.clone().fold(f64::INFINITY, f64::min);
    let max_x = xs.fold(f64::NEG_INFINITY, f64::max);
    let min_y = ys.clone().fold(f64::INFINITY, f64::min);
    let max_y = ys.fold(f64::NEG_INFINITY, f64::max);

    let width = max_x - min_x;
    let height = max_y - min_y;
    let cell_size = width.min(height);
    if cell_size <= 0.0 {
        let dist = signed_distance(min_x, min_y, shell, holes);
        return LabelPoint { x: min_x, y: min_y, clearance: dist };
    }

    let mut queue = BinaryHeap::new();
    let mut half = cell_size / 2.0;
    let mut x = min_x;
    while x < max_x {
        let mut y = min_y;
        while y < max_y {
            queue.push(Queued(Cell::new(x + half, y + half, half, shell, holes)));
            y += cell_size;
        }
        x += cell_size;
    }

    // Two good initial guesses: the centroid and the bbox center.
    let (cx, cy) = centroid(shell);
    let mut best = Cell::new(cx, cy, 0.0, shell, holes);
    let center = Cell::new(min_x + width / 2.0, min_y + height / 2.0, 0.0, shell, holes);
    if center.dist > best.dist {
        best = center;
    }

    let mut examined = 0;
    while let Some(Queued(cell)) = queue.pop() {
        examined += 1;
        if examined > MAX_CELLS {
            break;
        }

        if cell.dist > best.dist {
            best = cell;
        }
        // The whole cell cannot beat the best candidate by enough to matter.
        if cell.potential() - best.dist <= tolerance {
            continue;
        }

        half = cell.half / 2.0;
        for (ox, oy) in [(-half, -half), (half, -half), (-half, half), (half, half)] {
            queue.push(Queued(Cell::new(cell.x + ox, cell.y + oy, half, shell, holes)));
        }
    }

    LabelPoint { x: best.x, y: best.y, clearance: best.dist }
}
