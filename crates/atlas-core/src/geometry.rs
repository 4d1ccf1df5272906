//! Pure geometric queries over normalized point lists.
//!
//! Nothing here knows about layers, input devices, or screens, so every
//! function can be called (and tested) on bare slices of `Point`.

use crate::model::Point;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Iterate the boundary segments of a point list in order.
///
/// Open lists yield `(p[i], p[i + 1])`; closed lists also yield the
/// wrap-around `(p[n - 1], p[0])`. Lists with fewer than two points yield
/// nothing.
pub fn segments(points: &[Point], closed: bool) -> impl Iterator<Item = (Point, Point)> + '_ {
    let wrap = (closed && points.len() >= 2)
        .then(|| (points[points.len() - 1], points[0]));
    points
        .windows(2)
        .map(|w| (w[0], w[1]))
        .chain(wrap)
}

/// Ray-cast point-in-polygon test.
///
/// Casts a horizontal ray to the right of `point` and counts how many
/// polygon edges it crosses; an odd count means inside. The polygon is
/// implicitly closed. When the ray passes exactly through a vertex the
/// result is whatever the strict `>` comparison yields.
pub fn is_inside(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let crossings = segments(polygon, true)
        .filter(|&(p1, p2)| edge_crosses_ray(point, p1, p2))
        .count();
    crossings % 2 == 1
}

fn edge_crosses_ray(point: Point, p1: Point, p2: Point) -> bool {
    // The ray only meets edges that span its height.
    if point.y < p1.y.min(p2.y) || point.y > p1.y.max(p2.y) {
        return false;
    }

    if p1.x == p2.x {
        return p1.x >= point.x;
    }

    // y = a*x + b
    let a = (p2.y - p1.y) / (p2.x - p1.x);
    let b = p1.y - a * p1.x;
    let intersection_x = (point.y - b) / a;
    intersection_x > point.x
}

/// Distance from `point` to the segment `p1`–`p2`, clamped to the nearer
/// endpoint when the projection falls outside the segment span.
pub fn segment_distance(point: Point, p1: Point, p2: Point) -> f64 {
    let length = distance(p1, p2);
    let to_p1 = distance(point, p1);
    let to_p2 = distance(point, p2);

    if length == 0.0 || to_p1 > length || to_p2 > length {
        return to_p1.min(to_p2);
    }

    ((p2.x - p1.x) * (p1.y - point.y) - (p1.x - point.x) * (p2.y - p1.y)).abs() / length
}

/// Find where a new vertex at `point` belongs in `points`.
///
/// Returns the index at which inserting `point` places it between the two
/// endpoints of the nearest boundary segment (`segment_index + 1`). Ties go
/// to the earliest segment. Returns `None` for fewer than two points.
pub fn locate_insertion_index(point: Point, points: &[Point], closed: bool) -> Option<usize> {
    if points.len() < 2 {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (index, (p1, p2)) in segments(points, closed).enumerate() {
        let d = segment_distance(point, p1, p2);
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((index, d)),
        }
    }
    best.map(|(index, _)| index + 1)
}

/// Arithmetic mean of all points. Empty input yields NaN coordinates.
pub fn centroid(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}
