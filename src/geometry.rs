//! Plain pixel-space geometry shared by the simulation and the renderers

/// A 2D point or extent in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Closed-open containment: left/top edges are in, right/bottom are out
    pub fn contains(&self, point: Vec2) -> bool {
        self.spans_x(point.x) && self.spans_y(point.y)
    }

    pub fn spans_x(&self, x: f32) -> bool {
        self.pos.x <= x && x < self.pos.x + self.size.x
    }

    pub fn spans_y(&self, y: f32) -> bool {
        self.pos.y <= y && y < self.pos.y + self.size.y
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let (x0, y0) = (self.pos.x, self.pos.y);
        let (x1, y1) = (x0 + self.size.x, y0 + self.size.y);
        [
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x0, y1),
            Vec2::new(x1, y1),
        ]
    }
}

/// Fixed drawing surface extents in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Flip a top-left origin rect into the bottom-left origin GL uses for
    /// `gl_FragCoord`. Only the y coordinate changes.
    pub fn to_gl_origin(&self, rect: Rect) -> Vec2 {
        Vec2::new(rect.pos.x, self.height as f32 - rect.pos.y - rect.size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_closed_open() {
        let rect = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(5.0, 5.0));
        assert!(rect.contains(Vec2::new(10.0, 20.0)));
        assert!(rect.contains(Vec2::new(14.9, 24.9)));
        assert!(!rect.contains(Vec2::new(15.0, 22.0)));
        assert!(!rect.contains(Vec2::new(12.0, 25.0)));
        assert!(!rect.contains(Vec2::new(9.9, 22.0)));
    }

    #[test]
    fn gl_origin_flips_y_only() {
        let viewport = Viewport::new(800, 600);
        let rect = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0));
        assert_eq!(viewport.to_gl_origin(rect), Vec2::new(10.0, 490.0));

        // Bottom-left corner of the viewport maps to the GL origin
        let bottom = Rect::new(Vec2::new(0.0, 500.0), Vec2::new(100.0, 100.0));
        assert_eq!(viewport.to_gl_origin(bottom), Vec2::new(0.0, 0.0));
    }
}
