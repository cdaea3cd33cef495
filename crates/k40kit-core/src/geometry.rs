//! Path geometry helpers over `lyon`.
//!
//! Vector elements carry their outline as a `lyon` [`Path`] in scene
//! coordinates (device mils) plus a placement [`Transform`].

pub use lyon::math::{point, vector, Point, Transform, Vector};
pub use lyon::path::Path;

use lyon::path::iterator::PathIterator;
use lyon::path::Event;

/// Flattening tolerance used when measuring curves.
pub const FLATTEN_TOLERANCE: f32 = 0.01;

/// Total length of a path, including closing edges.
///
/// Curves are flattened first. Returns `None` when the result is not a
/// finite number.
pub fn path_length(path: &Path) -> Option<f64> {
    let mut length = 0.0_f64;
    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            Event::Line { from, to } => length += f64::from((to - from).length()),
            Event::End {
                last,
                first,
                close: true,
            } => length += f64::from((first - last).length()),
            _ => {}
        }
    }
    length.is_finite().then_some(length)
}

/// First point of the first sub-path, if any.
pub fn first_point(path: &Path) -> Option<Point> {
    path.iter().find_map(|event| match event {
        Event::Begin { at } => Some(at),
        _ => None,
    })
}

/// Build an open or closed polyline from a list of points.
///
/// Returns an empty path when fewer than one point is given.
pub fn polyline(points: &[Point], closed: bool) -> Path {
    let mut builder = Path::builder();
    if let Some((first, rest)) = points.split_first() {
        builder.begin(*first);
        for p in rest {
            builder.line_to(*p);
        }
        builder.end(closed);
    }
    builder.build()
}

/// Translation components `(e, f)` of an affine transform.
pub fn translation(transform: &Transform) -> (f64, f64) {
    (f64::from(transform.m31), f64::from(transform.m32))
}
