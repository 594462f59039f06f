use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flightscene_common::{Color, Viewport};
use glam::IVec2;

/// Drawing backend. The renderer only ever talks to these primitives.
///
/// Implementations must ignore writes outside [`Canvas::viewport`] and
/// writes in a transparent color.
pub trait Canvas {
    fn viewport(&self) -> Viewport;

    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);

    fn draw_text(&mut self, x: i32, y: i32, text: &str);
}

/// In-memory palette framebuffer.
///
/// Text is not rasterized; labels are recorded with their anchor so tests
/// and exporters can inspect them.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    viewport: Viewport,
    pixels: Vec<Color>,
    labels: Vec<(IVec2, String)>,
    lines_drawn: usize,
}

impl Framebuffer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            pixels: vec![Color::BLACK; viewport.pixel_count()],
            labels: Vec::new(),
            lines_drawn: 0,
        }
    }

    /// Fill every pixel with `color` and forget labels and counters.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
        self.labels.clear();
        self.lines_drawn = 0;
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.viewport
            .contains(x, y)
            .then(|| (y * self.viewport.width + x) as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Number of pixels currently holding `color`.
    pub fn count(&self, color: Color) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }

    pub fn labels(&self) -> &[(IVec2, String)] {
        &self.labels
    }

    /// Line primitives requested since the last clear, clipped or not.
    pub fn lines_drawn(&self) -> usize {
        self.lines_drawn
    }

    /// Write a binary PPM (P6). Transparent pixels come out black.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(
            out,
            "P6\n{} {}\n255\n",
            self.viewport.width, self.viewport.height
        )?;
        let mut row = Vec::with_capacity(self.viewport.width.max(0) as usize * 3);
        for line in self.pixels.chunks(self.viewport.width.max(1) as usize) {
            row.clear();
            for color in line {
                row.extend_from_slice(&color.to_rgb().unwrap_or([0, 0, 0]));
            }
            out.write_all(&row)?;
        }
        out.flush()
    }

    pub fn save_ppm(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = File::create(path.as_ref())?;
        self.write_ppm(BufWriter::new(file))?;
        tracing::debug!(path = %path.as_ref().display(), "framebuffer written");
        Ok(())
    }
}

impl Canvas for Framebuffer {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if color.is_transparent() {
            return;
        }
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Bresenham with per-pixel clipping. Lines that lie wholly on one side
    /// of the viewport are dropped up front.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.lines_drawn += 1;
        let (w, h) = (self.viewport.width, self.viewport.height);
        if (x0 < 0 && x1 < 0) || (y0 < 0 && y1 < 0) || (x0 >= w && x1 >= w) || (y0 >= h && y1 >= h)
        {
            return;
        }

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        self.labels.push((IVec2::new(x, y), text.to_owned()));
    }
}
