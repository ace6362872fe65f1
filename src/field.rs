//! Edge blur field - the per-pixel color function
//!
//! Mirrors the fragment shader in `shader.rs` one to one. Everything here is
//! a pure function of its arguments so it can run once per pixel with no
//! shared state, on the GPU or in the CPU rasterizer.

use crate::geometry::{Rect, Vec2};

/// RGBA, each channel in [0, 1]
pub type Color = [f32; 4];

/// Opaque yellow
pub const FOREGROUND_COLOR: Color = [1.0, 1.0, 0.0, 1.0];

/// Opaque black
pub const BACKGROUND_COLOR: Color = [0.0, 0.0, 0.0, 1.0];

/// Maximum blur half-width in pixels, reached at blur intensity 1.0
pub const BLUR_EDGE: f32 = 50.0;

/// Cubic Hermite step, same contract as GLSL `smoothstep`
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Component-wise `a * (1 - t) + b * t`, same as GLSL `mix`
pub fn mix(a: Color, b: Color, t: f32) -> Color {
    std::array::from_fn(|i| a[i] * (1.0 - t) + b[i] * t)
}

/// Distance from an outside point to the rect boundary.
///
/// Points beside a straight edge get the 1D distance to the nearer edge
/// line; only the four corner regions pay for a Euclidean distance.
pub fn edge_distance(point: Vec2, rect: &Rect) -> f32 {
    let far = Vec2::new(rect.pos.x + rect.size.x, rect.pos.y + rect.size.y);

    if rect.spans_x(point.x) {
        (point.y - rect.pos.y).abs().min((point.y - far.y).abs())
    } else if rect.spans_y(point.y) {
        (point.x - rect.pos.x).abs().min((point.x - far.x).abs())
    } else {
        rect.corners()
            .iter()
            .map(|&corner| (point - corner).length())
            .fold(f32::INFINITY, f32::min)
    }
}

/// Color of the pixel at `point` for a rect blurred with intensity `blur`
pub fn evaluate(point: Vec2, rect: &Rect, blur: f32) -> Color {
    if rect.contains(point) {
        return FOREGROUND_COLOR;
    }

    let width = blur * BLUR_EDGE;
    let edge = edge_distance(point, rect);

    if edge < width {
        mix(FOREGROUND_COLOR, BACKGROUND_COLOR, smoothstep(0.0, width, edge))
    } else {
        BACKGROUND_COLOR
    }
}
