//! Rasterizing a [`BitSampleMatrix`] into an RGB image.
//!
//! The image is a white square. A margin on the top and left holds the sample names; the rest
//! is split into an N x N grid of cells. Each cell gets a black border and a blue diagonal
//! (equal depth in both samples), and every set bit becomes one black pixel, scaled linearly
//! from bit coordinates to the cell's pixel width.

use image::{Rgb, RgbImage};
use log::debug;

use crate::consts::MAX_LABEL_HEIGHT;
use crate::font::{GLYPH_ADVANCE, GLYPH_HEIGHT, is_lit};
use crate::matrix::BitSampleMatrix;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

/// Pixel geometry of the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub image_size: u32,
    /// Offset of the grid from the top and left edges
    pub margin: f64,
    /// Side of one cell
    pub sample_width: f64,
    pub label_height: f64,
}

impl Layout {
    pub fn new(image_size: u32, margin_fraction: f64, n_samples: usize) -> Self {
        let margin = image_size as f64 * margin_fraction;
        let drawing_width = (image_size as f64 - 1.0) - margin;
        let sample_width = drawing_width / n_samples.max(1) as f64;

        Layout {
            image_size,
            margin,
            sample_width,
            label_height: margin.min(MAX_LABEL_HEIGHT),
        }
    }

    /// Top-left corner of cell `(i, j)`
    pub fn cell_origin(&self, i: usize, j: usize) -> (f64, f64) {
        (
            self.margin + i as f64 * self.sample_width,
            self.margin + j as f64 * self.sample_width,
        )
    }

    /// Pixel of bit `(x, y)` of cell `(i, j)` in a matrix with `bit_size` steps per cell
    pub fn bit_to_pixel(&self, i: usize, j: usize, x: usize, y: usize, bit_size: usize) -> (i64, i64) {
        let (origin_x, origin_y) = self.cell_origin(i, j);
        let step = self.sample_width / bit_size as f64;
        (
            (origin_x + step * x as f64).floor() as i64,
            (origin_y + step * y as f64).floor() as i64,
        )
    }
}

pub struct Renderer {
    layout: Layout,
    image: RgbImage,
}

impl Renderer {
    pub fn new(layout: Layout) -> Self {
        Renderer {
            image: RgbImage::from_pixel(layout.image_size, layout.image_size, WHITE),
            layout,
        }
    }

    /// Draw the whole plot and hand back the pixel buffer.
    pub fn render(mut self, matrix: &BitSampleMatrix, sample_names: &[String]) -> RgbImage {
        let layout = self.layout;
        let n = matrix.n_samples();

        for (column, name) in sample_names.iter().enumerate().take(n) {
            let (x, y) = layout.cell_origin(column, column);
            let max_width = layout.sample_width * 0.9;
            let max_height = layout.label_height * 0.9;
            self.draw_label(name, x, layout.margin - layout.label_height, max_width, max_height, false);
            self.draw_label(name, layout.margin, y, max_width, max_height, true);
        }

        for i in 0..n {
            for j in 0..n {
                let (x, y) = layout.cell_origin(i, j);
                let side = layout.sample_width;
                self.draw_line(x, y, x + side, y + side, BLUE);
                self.draw_rect(x, y, side, BLACK);
            }
        }

        let bit_size = matrix.bit_size();
        for i in 0..n {
            for j in 0..n {
                let mut lit = 0usize;
                for (x, y) in matrix.iter_cell(i, j) {
                    let (px, py) = layout.bit_to_pixel(i, j, x, y, bit_size);
                    self.put(px, py, BLACK);
                    lit += 1;
                }
                debug!("Cell ({}, {}): {} depth pairs", i, j, lit);
            }
        }

        self.image
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>) {
        // Bresenham
        let (mut x0, mut y0) = (x0.floor() as i64, y0.floor() as i64);
        let (x1, y1) = (x1.floor() as i64, y1.floor() as i64);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn draw_rect(&mut self, x: f64, y: f64, side: f64, color: Rgb<u8>) {
        self.draw_line(x, y, x + side, y, color);
        self.draw_line(x + side, y, x + side, y + side, color);
        self.draw_line(x + side, y + side, x, y + side, color);
        self.draw_line(x, y + side, x, y, color);
    }

    /// Draw `text` in the box starting at `(x, y)`, scaled to `max_height` and cut to
    /// `max_width`. Vertical labels run downward from `(x, y)` and sit to the left of `x`.
    fn draw_label(&mut self, text: &str, x: f64, y: f64, max_width: f64, max_height: f64, vertical: bool) {
        let scale = (max_height / GLYPH_HEIGHT as f64).floor().max(0.0) as u32;
        if scale == 0 {
            return;
        }
        let fits = (max_width / (GLYPH_ADVANCE * scale) as f64).floor().max(0.0) as usize;
        let (x, y) = (x.floor() as i64, y.floor() as i64);
        let scale_px = scale as i64;

        for (k, c) in text.chars().take(fits).enumerate() {
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_ADVANCE {
                    if !is_lit(c, col, row) {
                        continue;
                    }
                    let along = (k as i64 * GLYPH_ADVANCE as i64 + col as i64) * scale_px;
                    let across = row as i64 * scale_px;
                    let (bx, by) = if vertical {
                        (x - across - scale_px, y + along)
                    } else {
                        (x + along, y + across)
                    };
                    for dy in 0..scale_px {
                        for dx in 0..scale_px {
                            self.put(bx + dx, by + dy, BLACK);
                        }
                    }
                }
            }
        }
    }
}
