//! CPU rasterizer for the edge blur field
//!
//! Used by the headless backend. Samples at pixel centers, same as
//! `gl_FragCoord`, with a top-left origin.

use image::{Rgba, RgbaImage};

use crate::field::{self, Color};
use crate::geometry::{Vec2, Viewport};
use crate::sim::FrameParams;

fn to_rgba8(color: Color) -> Rgba<u8> {
    Rgba(color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
}

pub fn rasterize(viewport: Viewport, frame: &FrameParams) -> RgbaImage {
    RgbaImage::from_fn(viewport.width, viewport.height, |x, y| {
        let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        to_rgba8(field::evaluate(center, &frame.rect, frame.blur))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::sim::Collision;

    const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn frame(blur: f32) -> FrameParams {
        FrameParams {
            rect: Rect::new(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0)),
            blur,
            collision: Collision::default(),
        }
    }

    #[test]
    fn sharp_frame_is_two_colors() {
        let img = rasterize(Viewport::new(320, 240), &frame(0.0));

        assert_eq!(img.dimensions(), (320, 240));
        for (x, y, px) in img.enumerate_pixels() {
            let inside = (100..200).contains(&x) && (100..200).contains(&y);
            assert_eq!(*px, if inside { YELLOW } else { BLACK }, "at {x},{y}");
        }
    }

    #[test]
    fn blurred_frame_fades_outward() {
        let img = rasterize(Viewport::new(320, 240), &frame(1.0));

        // Walk left from the rect's left edge along its middle row
        let row: Vec<u8> = (40..100).rev().map(|x| img.get_pixel(x, 150)[0]).collect();
        assert!(row.windows(2).all(|w| w[0] >= w[1]));
        assert!(row[0] > 240);
        assert_eq!(*img.get_pixel(40, 150), BLACK);
        assert_eq!(*img.get_pixel(150, 150), YELLOW);
    }
}
