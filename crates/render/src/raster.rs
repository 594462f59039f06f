use std::mem::swap;

use flightscene_common::Color;
use glam::IVec2;

use crate::Canvas;
use crate::cull::POINT_RANGE;

/// Fractional bits of the per-scanline x increment.
const FRAC_BITS: u32 = 16;
const ONE: i64 = 1 << FRAC_BITS;
/// Increment used for an edge with no vertical extent.
const FLAT_SLOPE: i64 = 0x7f_ffff;
/// Above this x increment per row an edge is nearly horizontal.
const SLIVER_SLOPE: i64 = 1_000_000;

/// Signed 16.16 x-per-row slope from the top vertex, used only to decide
/// which edge is on the left.
fn orientation_slope(top: IVec2, other: IVec2) -> i64 {
    let dx = other.x as i64 - top.x as i64;
    let dy = other.y as i64 - top.y as i64;
    if dy != 0 {
        (dx << FRAC_BITS) / dy
    } else if dx > 0 {
        FLAT_SLOPE
    } else {
        -0x80_0000
    }
}

/// One active edge, stepped a scanline at a time.
#[derive(Debug, Clone, Copy)]
struct Edge {
    x: i32,
    end_x: i32,
    step: i32,
    slope: i64,
    err: i64,
}

impl Edge {
    fn new(from: IVec2, to: IVec2) -> Self {
        let dx = to.x as i64 - from.x as i64;
        let dy = (to.y as i64 - from.y as i64).abs();
        let slope = if dy != 0 {
            (((dx.abs() << FRAC_BITS) + dy / 2) / dy).min(i32::MAX as i64)
        } else {
            FLAT_SLOPE
        };
        Self {
            x: from.x,
            end_x: to.x,
            step: if dx > 0 { 1 } else { -1 },
            slope,
            err: ONE / 2,
        }
    }

    /// Move down one row, reporting each x the boundary passes through.
    /// Never steps past the edge's lower end.
    fn advance(&mut self, mut passed: impl FnMut(i32)) {
        self.err += self.slope;
        while self.err >= ONE && self.x != self.end_x {
            self.x += self.step;
            passed(self.x);
            self.err -= ONE;
        }
    }
}

struct Target<'a, C: ?Sized> {
    canvas: &'a mut C,
    width: i32,
    height: i32,
    outline: Color,
}

impl<C: Canvas + ?Sized> Target<'_, C> {
    fn row_visible(&self, y: i32) -> bool {
        (0..self.height).contains(&y)
    }

    fn outline_at(&mut self, x: i32, y: i32) {
        if (0..self.width).contains(&x) {
            self.canvas.set_pixel(x, y, self.outline);
        }
    }

    /// Outline pixels at both boundaries, `body` strictly between.
    fn span(&mut self, y: i32, left: i32, right: i32, body: Color) {
        let mut x = left.max(0);
        let end = right.min(self.width);
        if (0..self.width).contains(&left) {
            self.canvas.set_pixel(left, y, self.outline);
            x += 1;
        }
        while x < end {
            self.canvas.set_pixel(x, y, body);
            x += 1;
        }
        self.outline_at(right, y);
    }
}

/// Fill a screen-space triangle and outline its edges.
///
/// Pixels are clipped to the canvas viewport. Vertices are sorted before
/// use, so their order does not matter; culling back faces is the caller's
/// job. A triangle with any coordinate outside the point probe's range is
/// not drawn.
pub fn fill_triangle<C: Canvas + ?Sized>(
    canvas: &mut C,
    vertices: [IVec2; 3],
    fill: Color,
    outline: Color,
) {
    let in_range = |c: i32| (-POINT_RANGE..=POINT_RANGE).contains(&(c as i64));
    if !vertices.iter().all(|v| in_range(v.x) && in_range(v.y)) {
        tracing::debug!(?vertices, "triangle outside drawable range");
        return;
    }

    let viewport = canvas.viewport();
    let mut t = Target {
        canvas,
        width: viewport.width,
        height: viewport.height,
        outline,
    };

    let mut sorted = vertices;
    sorted.sort_unstable_by_key(|v| (v.y, v.x));
    let [v0, mut v1, mut v2] = sorted;
    // v0 is the top (leftmost on ties); v0->v1 must be the left edge
    if orientation_slope(v0, v2) < orientation_slope(v0, v1) {
        swap(&mut v1, &mut v2);
    }
    let flat_top = v1.y == v0.y || v2.y == v0.y;

    let mut a = Edge::new(v0, v1);
    let mut b = Edge::new(v0, v2);
    let mut y = v0.y;

    // upper section: until either side reaches its lower vertex
    let split = v1.y.min(v2.y);
    while y < split {
        let visible = t.row_visible(y);
        if visible {
            t.span(y, a.x, b.x, fill);
        }
        for edge in [&mut a, &mut b] {
            edge.advance(|x| {
                if visible {
                    t.outline_at(x, y);
                }
            });
        }
        y += 1;
    }

    // lower section: swap the finished side for the edge to the bottom vertex
    let bottom = if v1.y < v2.y {
        a = Edge::new(v1, v2);
        v2.y
    } else {
        b = Edge::new(v2, v1);
        v1.y
    };
    let bottom = bottom.min(t.height - 1);

    // both sides nearly horizontal: every remaining row is boundary
    let sliver = a.slope > SLIVER_SLOPE && b.slope > SLIVER_SLOPE;

    while y <= bottom {
        let visible = t.row_visible(y);
        if visible {
            let body = if sliver || (flat_top && y == v0.y) {
                outline
            } else {
                fill
            };
            t.span(y, a.x, b.x, body);
        }
        for edge in [&mut a, &mut b] {
            edge.advance(|x| {
                if visible {
                    t.outline_at(x, y);
                }
            });
        }
        y += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Framebuffer;
    use flightscene_common::Viewport;

    const FILL: Color = Color(43);
    const LINE: Color = Color::WHITE;

    fn canvas(w: i32, h: i32) -> Framebuffer {
        let mut fb = Framebuffer::new(Viewport::new(w, h));
        fb.clear(Color::TRANSPARENT);
        fb
    }

    fn touched(fb: &Framebuffer) -> Vec<(i32, i32)> {
        let vp = fb.viewport();
        let mut out = Vec::new();
        for y in 0..vp.height {
            for x in 0..vp.width {
                if fb.pixel(x, y) != Some(Color::TRANSPARENT) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    fn right_triangle() -> [IVec2; 3] {
        [IVec2::new(10, 10), IVec2::new(50, 10), IVec2::new(10, 50)]
    }

    #[test]
    fn right_triangle_outline_and_fill() {
        let mut fb = canvas(100, 100);
        fill_triangle(&mut fb, right_triangle(), FILL, LINE);

        // top edge
        for x in 10..=50 {
            assert_eq!(fb.pixel(x, 10), Some(LINE), "top edge at x={x}");
        }
        // left edge
        for y in 10..50 {
            assert_eq!(fb.pixel(10, y), Some(LINE), "left edge at y={y}");
        }
        // hypotenuse
        for y in 11..50 {
            assert_eq!(fb.pixel(60 - y, y), Some(LINE), "hypotenuse at y={y}");
        }
        assert_eq!(fb.pixel(30, 30), Some(LINE));
        assert_eq!(fb.pixel(11, 49), Some(LINE));

        // interior
        assert_eq!(fb.pixel(20, 20), Some(FILL));
        assert_eq!(fb.pixel(25, 25), Some(FILL));
        assert_eq!(fb.pixel(15, 40), Some(FILL));

        for (x, y) in touched(&fb) {
            assert!((10..=50).contains(&x) && (10..=50).contains(&y), "({x},{y})");
            assert!(x + y <= 60, "({x},{y}) is past the hypotenuse");
        }
    }

    #[test]
    fn vertex_order_does_not_matter() {
        let [p, q, r] = right_triangle();
        let mut reference = canvas(100, 100);
        fill_triangle(&mut reference, [p, q, r], FILL, LINE);
        for order in [[q, r, p], [r, p, q], [p, r, q], [r, q, p], [q, p, r]] {
            let mut fb = canvas(100, 100);
            fill_triangle(&mut fb, order, FILL, LINE);
            assert_eq!(fb.pixels(), reference.pixels());
        }
    }

    #[test]
    fn flat_bottom_triangle_is_outlined() {
        let mut fb = canvas(100, 100);
        fill_triangle(
            &mut fb,
            [IVec2::new(10, 10), IVec2::new(10, 50), IVec2::new(50, 50)],
            FILL,
            LINE,
        );
        assert_eq!(fb.pixel(10, 10), Some(LINE));
        assert_eq!(fb.pixel(10, 30), Some(LINE));
        assert_eq!(fb.pixel(30, 30), Some(LINE));
        assert_eq!(fb.pixel(15, 40), Some(FILL));
        for (x, y) in touched(&fb) {
            assert!((10..=50).contains(&x) && (10..=50).contains(&y));
        }
    }

    #[test]
    fn shallow_lower_edge_keeps_its_outline() {
        let mut fb = canvas(300, 300);
        fill_triangle(
            &mut fb,
            [IVec2::new(150, 10), IVec2::new(50, 105), IVec2::new(250, 110)],
            FILL,
            LINE,
        );
        // right edge runs x = y + 140 all the way to the bottom vertex
        for y in 105..=110 {
            assert_eq!(fb.pixel(y + 140, y), Some(LINE), "right edge at y={y}");
        }
        // shallow lower edge from (50,105) is traced 40 pixels per row
        for (x, y) in [(51, 105), (90, 105), (130, 106), (170, 107), (210, 108)] {
            assert_eq!(fb.pixel(x, y), Some(LINE), "lower edge at ({x},{y})");
        }
        assert_eq!(fb.pixel(200, 106), Some(FILL));
        let bottom_row: Vec<_> = touched(&fb).into_iter().filter(|&(_, y)| y == 110).collect();
        assert_eq!(bottom_row, vec![(250, 110)]);
    }

    #[test]
    fn extreme_coordinates_are_skipped() {
        let mut fb = canvas(64, 64);
        fill_triangle(
            &mut fb,
            [IVec2::new(i32::MIN, 10), IVec2::new(i32::MAX, 10), IVec2::new(0, 20)],
            FILL,
            LINE,
        );
        fill_triangle(
            &mut fb,
            [IVec2::new(0, -i32::MAX), IVec2::new(10, 20), IVec2::new(30, i32::MAX)],
            FILL,
            LINE,
        );
        assert!(touched(&fb).is_empty());

        // the range limit itself is still drawable
        fill_triangle(
            &mut fb,
            [IVec2::new(-16_000, 0), IVec2::new(16_000, 0), IVec2::new(0, 16_000)],
            FILL,
            LINE,
        );
        assert_eq!(fb.pixel(32, 10), Some(FILL));
    }

    #[test]
    fn never_writes_outside_viewport() {
        let mut fb = canvas(32, 24);
        fill_triangle(
            &mut fb,
            [IVec2::new(-50, -40), IVec2::new(80, 5), IVec2::new(10, 90)],
            FILL,
            LINE,
        );
        // Framebuffer ignores stray writes, so count what landed instead
        assert!(fb.count(FILL) > 0);
        assert_eq!(touched(&fb).len(), fb.count(FILL) + fb.count(LINE));
    }

    #[test]
    fn degenerate_triangles_terminate() {
        let mut fb = canvas(64, 64);
        let p = IVec2::new(20, 20);
        fill_triangle(&mut fb, [p, p, p], FILL, LINE);
        assert_eq!(touched(&fb), vec![(20, 20)]);

        let mut fb = canvas(64, 64);
        fill_triangle(
            &mut fb,
            [IVec2::new(5, 30), IVec2::new(60, 30), IVec2::new(30, 30)],
            FILL,
            LINE,
        );
        assert!(touched(&fb).iter().all(|&(_, y)| y == 30));

        let mut fb = canvas(64, 64);
        fill_triangle(
            &mut fb,
            [IVec2::new(8, 2), IVec2::new(8, 60), IVec2::new(9, 31)],
            FILL,
            LINE,
        );
        assert!(touched(&fb).iter().all(|&(x, _)| (8..=9).contains(&x)));
    }

    #[test]
    fn random_triangles_stay_in_bounds() {
        let mut state = 0x5eed_u64;
        let mut next = move || {
            state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            z ^ (z >> 31)
        };
        for _ in 0..200 {
            let mut coord = || (next() % 400) as i32 - 100;
            let tri = [
                IVec2::new(coord(), coord()),
                IVec2::new(coord(), coord()),
                IVec2::new(coord(), coord()),
            ];
            let mut fb = canvas(200, 150);
            fill_triangle(&mut fb, tri, FILL, LINE);
            let lo = tri.iter().fold(IVec2::MAX, |m, v| m.min(*v));
            let hi = tri.iter().fold(IVec2::MIN, |m, v| m.max(*v));
            for (x, y) in touched(&fb) {
                assert!(x >= lo.x && x <= hi.x && y >= lo.y && y <= hi.y, "{tri:?}: ({x},{y})");
            }
        }
    }
}
