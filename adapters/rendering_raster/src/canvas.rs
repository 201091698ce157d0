//! Pixel-level drawing primitives on top of an RGBA image buffer.

use font8x8::{UnicodeFonts, BASIC_FONTS, GREEK_FONTS};
use glam::Vec2;
use growth_model_rendering::Color;
use image::{Rgba, RgbaImage};

/// Length of a painted dash and the gap that follows it, in pixels.
pub(crate) const DASH: (f32, f32) = (6.0, 4.0);
/// Side of one unscaled glyph cell, in pixels.
pub(crate) const GLYPH_SIZE: u32 = 8;

/// Bitmap of `character`, one byte per row with the leftmost pixel in bit 0.
fn glyph(character: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(character)
        .or_else(|| GREEK_FONTS.get(character))
}

/// Lit pixels of `text` laid out left to right, in unscaled glyph units.
fn lit_pixels(text: &str) -> impl Iterator<Item = (u32, u32)> + '_ {
    text.chars().enumerate().flat_map(|(index, character)| {
        let rows = glyph(character).unwrap_or([0; 8]);
        let advance = index as u32 * GLYPH_SIZE;
        (0..GLYPH_SIZE).flat_map(move |row| {
            (0..GLYPH_SIZE)
                .filter(move |&bit| rows[row as usize] & (1 << bit) != 0)
                .map(move |bit| (advance + bit, row))
        })
    })
}

/// Advance of `text` at `scale`, in pixels.
pub(crate) fn text_width(text: &str, scale: u32) -> f32 {
    (text.chars().count() as u32 * GLYPH_SIZE * scale) as f32
}

/// Mutable RGBA surface that clips every write to its bounds.
#[derive(Debug)]
pub(crate) struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Creates a canvas cleared to `background`.
    pub(crate) fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(background.to_rgba8())),
        }
    }

    /// Releases the underlying image.
    pub(crate) fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Paints a square brush of side `width` centred on `center`.
    pub(crate) fn stamp(&mut self, center: Vec2, width: f32, color: Color) {
        let size = width.max(1.0).round() as i64;
        let origin = (center - Vec2::splat(width.max(1.0) / 2.0)).round();
        let rgba = Rgba(color.to_rgba8());

        for dy in 0..size {
            for dx in 0..size {
                self.put(origin.x as i64 + dx, origin.y as i64 + dy, rgba);
            }
        }
    }

    /// Strokes a straight segment by stamping the brush at every pixel step.
    pub(crate) fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let steps = (to - from).abs().max_element().ceil().max(1.0) as u32;
        for step in 0..=steps {
            let point = from.lerp(to, step as f32 / steps as f32);
            self.stamp(point, width, color);
        }
    }

    /// Strokes a segment alternating painted dashes and gaps of [`DASH`].
    pub(crate) fn dashed_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let length = from.distance(to);
        if length <= f32::EPSILON {
            self.stamp(from, width, color);
            return;
        }

        let direction = (to - from) / length;
        let (dash, gap) = DASH;
        let mut offset = 0.0;
        while offset < length {
            let end = (offset + dash).min(length);
            self.line(from + direction * offset, from + direction * end, width, color);
            offset += dash + gap;
        }
    }

    /// Strokes a connected path through `points`.
    ///
    /// A single point is drawn as one brush stamp.
    pub(crate) fn polyline(&mut self, points: &[Vec2], width: f32, color: Color) {
        match points {
            [] => {}
            [point] => self.stamp(*point, width, color),
            _ => {
                for pair in points.windows(2) {
                    self.line(pair[0], pair[1], width, color);
                }
            }
        }
    }

    /// Strokes the outline of an axis-aligned rectangle.
    pub(crate) fn outline(&mut self, top_left: Vec2, bottom_right: Vec2, color: Color) {
        let top_right = Vec2::new(bottom_right.x, top_left.y);
        let bottom_left = Vec2::new(top_left.x, bottom_right.y);
        self.line(top_left, top_right, 1.0, color);
        self.line(top_right, bottom_right, 1.0, color);
        self.line(bottom_right, bottom_left, 1.0, color);
        self.line(bottom_left, top_left, 1.0, color);
    }

    /// Fills an axis-aligned rectangle.
    pub(crate) fn fill(&mut self, top_left: Vec2, bottom_right: Vec2, color: Color) {
        let rgba = Rgba(color.to_rgba8());
        let from = top_left.round();
        let to = bottom_right.round();
        for y in from.y as i64..to.y as i64 {
            for x in from.x as i64..to.x as i64 {
                self.put(x, y, rgba);
            }
        }
    }

    /// Writes `text` left to right with the top-left corner of its first
    /// glyph at `origin`, each glyph pixel enlarged to `scale`.
    ///
    /// Characters without a glyph advance the pen without painting.
    pub(crate) fn text(&mut self, origin: Vec2, text: &str, scale: u32, color: Color) {
        let rgba = Rgba(color.to_rgba8());
        let origin = origin.round();
        for (column, row) in lit_pixels(text) {
            self.block(
                origin.x as i64 + i64::from(column * scale),
                origin.y as i64 + i64::from(row * scale),
                scale,
                rgba,
            );
        }
    }

    /// Writes `text` reading bottom to top, the way a vertical axis label is
    /// set; `origin` is the top-left corner of the rotated block.
    pub(crate) fn text_upwards(&mut self, origin: Vec2, text: &str, scale: u32, color: Color) {
        let rgba = Rgba(color.to_rgba8());
        let origin = origin.round();
        let length = text.chars().count() as u32 * GLYPH_SIZE;
        for (column, row) in lit_pixels(text) {
            self.block(
                origin.x as i64 + i64::from(row * scale),
                origin.y as i64 + i64::from((length - 1 - column) * scale),
                scale,
                rgba,
            );
        }
    }

    fn block(&mut self, x: i64, y: i64, scale: u32, rgba: Rgba<u8>) {
        for dy in 0..i64::from(scale) {
            for dx in 0..i64::from(scale) {
                self.put(x + dx, y + dy, rgba);
            }
        }
    }

    fn put(&mut self, x: i64, y: i64, rgba: Rgba<u8>) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, rgba);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    #[test]
    fn writes_outside_bounds_are_clipped() {
        let mut canvas = Canvas::new(4, 4, Color::WHITE);
        canvas.stamp(Vec2::new(-5.0, 2.0), 3.0, BLACK);
        canvas.stamp(Vec2::new(40.0, 40.0), 3.0, BLACK);

        let image = canvas.into_image();
        assert!(image.pixels().all(|pixel| pixel.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn horizontal_line_covers_every_column() {
        let mut canvas = Canvas::new(10, 3, Color::WHITE);
        canvas.line(Vec2::new(0.5, 1.5), Vec2::new(9.5, 1.5), 1.0, BLACK);

        let image = canvas.into_image();
        for x in 0..10 {
            assert_eq!(image.get_pixel(x, 1).0, [0, 0, 0, 255], "column {x}");
        }
        assert_eq!(image.get_pixel(4, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn dashed_line_leaves_gaps() {
        let mut canvas = Canvas::new(40, 3, Color::WHITE);
        canvas.dashed_line(Vec2::new(0.5, 1.5), Vec2::new(39.5, 1.5), 1.0, BLACK);

        let image = canvas.into_image();
        let painted = (0..40)
            .filter(|&x| image.get_pixel(x, 1).0 == [0, 0, 0, 255])
            .count();
        assert!(painted > 0);
        assert!(painted < 40, "gaps must remain unpainted");
    }

    #[test]
    fn text_paints_inside_its_glyph_cells() {
        let mut canvas = Canvas::new(40, 20, Color::WHITE);
        canvas.text(Vec2::new(4.0, 2.0), "Δ(t)", 1, BLACK);

        let image = canvas.into_image();
        let painted: Vec<(u32, u32)> = image
            .enumerate_pixels()
            .filter(|(_, _, pixel)| pixel.0 == [0, 0, 0, 255])
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!painted.is_empty());
        assert!(painted
            .iter()
            .all(|&(x, y)| (4..4 + 32).contains(&x) && (2..10).contains(&y)));
        // The Greek capital comes from the Greek table rather than being skipped.
        assert!(painted.iter().any(|&(x, _)| x < 12));
    }

    #[test]
    fn scaled_text_covers_four_times_the_pixels() {
        let count = |scale: u32| {
            let mut canvas = Canvas::new(64, 32, Color::WHITE);
            canvas.text(Vec2::ZERO, "G", scale, BLACK);
            canvas
                .into_image()
                .pixels()
                .filter(|pixel| pixel.0 == [0, 0, 0, 255])
                .count()
        };

        assert!(count(1) > 0);
        assert_eq!(count(2), count(1) * 4);
    }

    #[test]
    fn upward_text_is_set_in_a_column() {
        let mut canvas = Canvas::new(20, 40, Color::WHITE);
        canvas.text_upwards(Vec2::new(2.0, 4.0), "Val", 1, BLACK);

        let image = canvas.into_image();
        let painted: Vec<(u32, u32)> = image
            .enumerate_pixels()
            .filter(|(_, _, pixel)| pixel.0 == [0, 0, 0, 255])
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!painted.is_empty());
        assert!(painted
            .iter()
            .all(|&(x, y)| (2..10).contains(&x) && (4..4 + 24).contains(&y)));
        assert_eq!(text_width("Val", 1), 24.0);
    }

    #[test]
    fn fill_covers_the_rectangle_only() {
        let mut canvas = Canvas::new(6, 6, Color::WHITE);
        canvas.fill(Vec2::new(1.0, 1.0), Vec2::new(3.0, 4.0), BLACK);

        let image = canvas.into_image();
        assert_eq!(
            image
                .pixels()
                .filter(|pixel| pixel.0 == [0, 0, 0, 255])
                .count(),
            6
        );
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn single_point_polyline_paints_a_dot() {
        let mut canvas = Canvas::new(5, 5, Color::WHITE);
        canvas.polyline(&[Vec2::new(2.5, 2.5)], 1.0, BLACK);

        let image = canvas.into_image();
        assert_eq!(image.get_pixel(2, 2).0, [0, 0, 0, 255]);
        assert_eq!(
            image
                .pixels()
                .filter(|pixel| pixel.0 == [0, 0, 0, 255])
                .count(),
            1
        );
    }
}
