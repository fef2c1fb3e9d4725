//! Pixel-accurate collision masks
//!
//! A mask is a bitmap of the opaque pixels of an entity's sprite. Paddles
//! are drawn as capsules and balls as discs, so their masks are generated
//! from those shapes instead of being read back from textures.

use serde::{Deserialize, Serialize};

/// Opaque-pixel bitmap, row-major
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl CollisionMask {
    /// Build a mask by sampling `opaque` at every pixel center
    pub fn from_fn(width: usize, height: usize, opaque: impl Fn(f32, f32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x as f32 + 0.5, y as f32 + 0.5));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Disc inscribed in a `width` x `height` box
    pub fn ellipse(width: f32, height: f32) -> Self {
        let (w, h) = (pixel_extent(width), pixel_extent(height));
        let (rx, ry) = (w as f32 / 2.0, h as f32 / 2.0);
        Self::from_fn(w, h, |x, y| {
            let nx = (x - rx) / rx;
            let ny = (y - ry) / ry;
            nx * nx + ny * ny <= 1.0
        })
    }

    /// Rectangle with fully rounded short ends (paddle sprite)
    pub fn capsule(width: f32, height: f32) -> Self {
        let (w, h) = (pixel_extent(width), pixel_extent(height));
        let r = w.min(h) as f32 / 2.0;
        let (wf, hf) = (w as f32, h as f32);
        Self::from_fn(w, h, |x, y| {
            // Nearest point on the capsule's core segment
            let cx = x.clamp(r, wf - r);
            let cy = y.clamp(r, hf - r);
            let (dx, dy) = (x - cx, y - cy);
            dx * dx + dy * dy <= r * r
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.bits[y as usize * self.width + x as usize]
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True if any opaque pixel of `self` lands on an opaque pixel of
    /// `other` when `other`'s origin sits at (`offset_x`, `offset_y`) in
    /// `self`'s pixel space.
    pub fn overlaps(&self, other: &CollisionMask, offset_x: i32, offset_y: i32) -> bool {
        let x0 = offset_x.max(0);
        let y0 = offset_y.max(0);
        let x1 = (offset_x + other.width as i32).min(self.width as i32);
        let y1 = (offset_y + other.height as i32).min(self.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset_x, y - offset_y) {
                    return true;
                }
            }
        }
        false
    }
}

fn pixel_extent(size: f32) -> usize {
    size.round().max(1.0) as usize
}
