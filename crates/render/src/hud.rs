use flightscene_common::Color;

use crate::Canvas;

/// Half-length of each crosshair arm, in pixels.
const CROSSHAIR_ARM: i32 = 4;
/// Status text inset from the left and bottom edges.
const STATUS_INSET: i32 = 20;

/// Nine-pixel cross at the viewport center.
pub fn draw_crosshair<C: Canvas + ?Sized>(canvas: &mut C, color: Color) {
    let c = canvas.viewport().center();
    canvas.draw_line(c.x - CROSSHAIR_ARM, c.y, c.x + CROSSHAIR_ARM, c.y, color);
    canvas.draw_line(c.x, c.y - CROSSHAIR_ARM, c.x, c.y + CROSSHAIR_ARM, color);
}

/// One line of status text near the bottom-left corner.
pub fn draw_status<C: Canvas + ?Sized>(canvas: &mut C, text: &str) {
    let height = canvas.viewport().height;
    canvas.draw_text(STATUS_INSET, height - STATUS_INSET, text);
}
