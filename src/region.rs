//! Shell/hole region assembly and small-region pruning.
//!
//! [`build_regions`] converts the flat contour hierarchy from
//! [`trace`](crate::trace) into owned [`Region`]s — one shell contour plus the
//! holes directly inside it. [`prune`] then discards what is too small to
//! paint, under one of two explicitly selected policies.

use crate::trace::{Contour, Traced};
use num_traits::AsPrimitive;

/// The absolute area enclosed by a closed polyline (shoelace formula).
///
/// The closing edge from the last vertex back to the first is implicit.
/// Fewer than three vertices enclose zero area.
#[must_use]
pub fn shoelace_area<T>(points: &[(T, T)]) -> f64
where
    T: Copy + AsPrimitive<f64>,
{
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % n];
        sum += x1.as_() * y2.as_() - x2.as_() * y1.as_();
    }
    sum.abs() / 2.0
}

/// One paintable area of a color: a shell contour and the holes inside it.
///
/// Created from one hierarchy root, possibly shrunk by [`prune`], and
/// consumed exactly once by label placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// The outer boundary.
    pub shell: Contour,
    /// The holes directly inside the shell (empty when there are none).
    pub holes: Vec<Contour>,
}

impl Region {
    /// The shell area minus the hole areas, clamped at zero.
    ///
    /// Traced holes always lie inside their shell, but clamping keeps the
    /// value well-defined for hand-built regions whose holes overlap or
    /// exceed the shell.
    #[must_use]
    pub fn net_area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(Contour::area).sum();
        (self.shell.area() - holes).max(0.0)
    }
}

/// Builds one [`Region`] per hierarchy root.
///
/// Each root contour becomes a shell; its holes are collected by walking the
/// `first_child` link and then the sibling chain until it ends. Contours with
/// a parent are consumed as holes only, never emitted as shells.
#[must_use]
pub fn build_regions(traced: &Traced) -> Vec<Region> {
    let Traced { contours, hierarchy } = traced;

    let mut regions = Vec::new();
    for (index, entry) in hierarchy.iter().enumerate() {
        if entry.parent.is_some() {
            continue;
        }

        let mut holes = Vec::new();
        let mut child = entry.first_child;
        while let Some(i) = child {
            holes.push(contours[i].clone());
            child = hierarchy[i].next;
        }

        regions.push(Region { shell: contours[index].clone(), holes });
    }

    regions
}

/// Selects how [`prune`] treats regions around the minimum area.
///
/// The two policies produce observably different templates, so the choice is
/// an explicit configuration value rather than a hidden default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrunePolicy {
    /// Drop a whole region when its net area (shell minus holes) is at most
    /// the minimum.
    #[default]
    NetArea,
    /// Keep every shell; drop only the individual holes whose own area is at
    /// most the minimum.
    HoleArea,
}

/// Discards regions (or holes) with at most `min_area` of area, per `policy`.
#[must_use]
pub fn prune(regions: Vec<Region>, min_area: f64, policy: PrunePolicy) -> Vec<Region> {
    match policy {
        PrunePolicy::NetArea => regions
            .into_iter()
            .filter(|region| region.net_area() > min_area)
            .collect(),
        PrunePolicy::HoleArea => regions
            .into_iter()
            .map(|mut region| {
                region.holes.retain(|hole| hole.area() > min_area);
                region
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::trace::HierarchyEntry;

    fn square(origin: i32, side: i32) -> Contour {
        Contour::new(vec![
            (origin, origin),
            (origin, origin + side),
            (origin + side, origin + side),
            (origin + side, origin),
        ])
    }

    #[test]
    fn shoelace_matches_known_areas() {
        assert_eq!(shoelace_area(&[(0, 0), (0, 10), (10, 10), (10, 0)]), 100.0);
        assert_eq!(shoelace_area(&[(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)]), 6.0);
        // Winding direction does not matter.
        assert_eq!(shoelace_area(&[(0, 0), (10, 0), (10, 10), (0, 10)]), 100.0);
        assert_eq!(shoelace_area(&[(0, 0), (5, 5)]), 0.0);
    }

    #[test]
    fn shell_with_two_holes_becomes_one_region() {
        let traced = Traced {
            contours: vec![square(0, 100), square(10, 5), square(30, 5)],
            hierarchy: vec![
                HierarchyEntry { first_child: Some(1), ..HierarchyEntry::default() },
                HierarchyEntry { next: Some(2), parent: Some(0), ..HierarchyEntry::default() },
                HierarchyEntry { prev: Some(1), parent: Some(0), ..HierarchyEntry::default() },
            ],
        };

        let regions = build_regions(&traced);

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].holes.len(), 2);
        assert_eq!(regions[0].holes[0], square(10, 5));
        assert_eq!(regions[0].holes[1], square(30, 5));
    }

    #[test]
    fn childless_shell_has_empty_hole_list() {
        let traced = Traced {
            contours: vec![square(0, 10)],
            hierarchy: vec![HierarchyEntry::default()],
        };

        let regions = build_regions(&traced);

        assert_eq!(regions.len(), 1);
        assert!(regions[0].holes.is_empty());
    }

    /// A shell of area 10,000 with holes totalling 9,999.
    fn nearly_hollow_region() -> Region {
        Region {
            shell: square(0, 100),
            // 99 x 101 = 9999.
            holes: vec![Contour::new(vec![(0, 0), (99, 0), (99, 101), (0, 101)])],
        }
    }

    #[test]
    fn net_area_policy_drops_on_threshold() {
        let region = nearly_hollow_region();
        assert_eq!(region.net_area(), 1.0);

        let kept = prune(vec![region.clone()], 0.0, PrunePolicy::NetArea);
        assert_eq!(kept.len(), 1);

        let kept = prune(vec![region], 1.0, PrunePolicy::NetArea);
        assert!(kept.is_empty());
    }

    #[test]
    fn net_area_underflow_is_treated_as_zero() {
        // Hand-built region whose hole is larger than its shell.
        let region = Region { shell: square(0, 10), holes: vec![square(0, 100)] };
        assert_eq!(region.net_area(), 0.0);

        let kept = prune(vec![region], 0.0, PrunePolicy::NetArea);
        assert!(kept.is_empty());
    }

    #[test]
    fn hole_area_policy_keeps_shells() {
        let region = Region {
            shell: square(0, 100),
            holes: vec![square(10, 10), square(30, 20)],
        };

        let kept = prune(vec![region], 100.0, PrunePolicy::HoleArea);

        // The 10x10 hole is dropped, the 20x20 hole and the shell survive.
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].holes, vec![square(30, 20)]);

        // The same input under the net-area policy keeps the region whole.
        let region = Region {
            shell: square(0, 100),
            holes: vec![square(10, 10), square(30, 20)],
        };
        let kept = prune(vec![region], 100.0, PrunePolicy::NetArea);
        assert_eq!(kept[0].holes.len(), 2);
    }
}
