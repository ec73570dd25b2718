//! Per-pixel collision masks built from sprite alpha.
//!
//! Hit detection between bullets, enemies and the player tests silhouettes
//! rather than bounding boxes, so a bullet passing through the transparent
//! corner of a bee sprite does not count as a hit.

use image::{Rgba, RgbaImage};

/// Pixels with alpha strictly above this value are solid.
pub const ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn from_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let bits = image
            .pixels()
            .map(|px| px.0[3] > ALPHA_THRESHOLD)
            .collect();
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// True when any solid pixel of `self` coincides with a solid pixel of
    /// `other` placed at `offset` (other's top-left relative to self's).
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (self.width as i32).min(ox + other.width as i32);
        let y1 = (self.height as i32).min(oy + other.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x as u32, y as u32) && other.get((x - ox) as u32, (y - oy) as u32) {
                    return true;
                }
            }
        }
        false
    }

    /// Opaque white where solid, fully transparent elsewhere.
    pub fn to_silhouette(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            if self.get(x, y) {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 image with only the top-left 2x2 quadrant opaque.
    fn corner_image() -> RgbaImage {
        RgbaImage::from_fn(4, 4, |x, y| {
            if x < 2 && y < 2 {
                Rgba([200, 10, 10, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    #[test]
    fn from_image_uses_alpha_threshold() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, ALPHA_THRESHOLD]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, ALPHA_THRESHOLD + 1]));
        let mask = Mask::from_image(&img);
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 0));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn bounding_boxes_overlap_but_silhouettes_do_not() {
        let mask = Mask::from_image(&corner_image());
        // Other mask placed so its solid corner lands on our transparent corner.
        assert!(!mask.overlaps(&mask, (2, 2)));
        assert!(mask.overlaps(&mask, (1, 1)));
        assert!(mask.overlaps(&mask, (-1, 0)));
    }

    #[test]
    fn disjoint_offsets_never_overlap() {
        let mask = Mask::from_image(&corner_image());
        assert!(!mask.overlaps(&mask, (4, 0)));
        assert!(!mask.overlaps(&mask, (-4, -4)));
        assert!(!mask.overlaps(&mask, (100, 100)));
    }

    #[test]
    fn silhouette_matches_mask() {
        let mask = Mask::from_image(&corner_image());
        let sil = mask.to_silhouette();
        assert_eq!(sil.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(sil.get_pixel(3, 3).0[3], 0);
        assert_eq!(Mask::from_image(&sil), mask);
    }
}
