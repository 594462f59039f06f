use flightscene_assets::{Model, Topology};
use flightscene_common::Color;
use glam::{IVec2, IVec3};

use crate::{Canvas, Frame, fill_triangle, probe_point};

/// Draw one world-space edge. Skipped entirely, never clamped, if either
/// endpoint fails the point probe. Returns whether a line was emitted.
pub fn draw_edge<C: Canvas + ?Sized>(
    canvas: &mut C,
    frame: &Frame,
    from: IVec3,
    to: IVec3,
    color: Color,
) -> bool {
    match (probe_point(frame, from), probe_point(frame, to)) {
        (Ok(a), Ok(b)) => {
            canvas.draw_line(a.x, a.y, b.x, b.y, color);
            true
        }
        _ => false,
    }
}

/// Twice the signed screen area of `(p1, p2, p3)`; negative means the face
/// points away from the viewer.
fn facing(p1: IVec2, p2: IVec2, p3: IVec2) -> i64 {
    let u = (p3 - p1).as_i64vec2();
    let v = (p2 - p1).as_i64vec2();
    u.x * v.y - u.y * v.x
}

/// Draw `model`'s faces using `vertices` as its vertex positions.
///
/// `vertices` is usually `model.vertices()`, or a transformed copy of it.
/// Each vertex is probed once into `cache`. Line faces draw when both ends
/// probe; triangles draw when all three probe and the face is not a back
/// face, filled with `fill` and outlined with `line`.
pub fn draw_model<C: Canvas + ?Sized>(
    canvas: &mut C,
    frame: &Frame,
    model: &Model,
    vertices: &[IVec3],
    cache: &mut Vec<Option<IVec2>>,
    fill: Color,
    line: Color,
) {
    cache.clear();
    cache.extend(vertices.iter().map(|&v| probe_point(frame, v).ok()));
    let at = |i: u16| cache.get(i as usize).copied().flatten();

    match model.topology() {
        Topology::Lines => {
            for face in model.faces() {
                if let (Some(a), Some(b)) = (at(face[0]), at(face[1])) {
                    canvas.draw_line(a.x, a.y, b.x, b.y, line);
                }
            }
        }
        Topology::Triangles => {
            for face in model.faces() {
                let (Some(p1), Some(p2), Some(p3)) = (at(face[0]), at(face[1]), at(face[2]))
                else {
                    continue;
                };
                if facing(p1, p2, p3) >= 0 {
                    fill_triangle(canvas, [p1, p2, p3], fill, line);
                }
            }
        }
    }
}
