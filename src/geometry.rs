// =============================================================================
// GEOMETRY.RS: Screen-space primitives shared by the UI and the tile map
//
// - Axis-aligned rectangles with half-open containment (UI hit testing)
// - Diamond containment under the Manhattan metric (isometric tiles)
// =============================================================================

pub use glam::Vec2;

/// Axis-aligned rectangle in pixels. `x`/`y` is the top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, w: 0.0, h: 0.0 };

    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Half-open containment: left/top edges inside, right/bottom outside.
    pub fn contains(&self, p: Vec2) -> bool {
        rect_contains(self.x, self.y, self.w, self.h, p.x, p.y)
    }

    /// True when the two rectangles overlap by a non-zero area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn translated(&self, d: Vec2) -> Self {
        Self::new(self.x + d.x, self.y + d.y, self.w, self.h)
    }

    /// Smallest rectangle enclosing every point. `ZERO` for an empty slice.
    pub fn bounding(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::ZERO;
        };
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Self::from_pos_size(min, max - min)
    }
}

/// Returns `true` if pixel point `(px, py)` falls inside the rectangle
/// defined by origin `(rx, ry)` and size `(rw, rh)` using half-open intervals.
pub fn rect_contains(rx: f32, ry: f32, rw: f32, rh: f32, px: f32, py: f32) -> bool {
    px >= rx && px < rx + rw && py >= ry && py < ry + rh
}

/// Point-in-diamond test for a rhombus of full extent `size` centred on
/// `center`: `|dx| / (w/2) + |dy| / (h/2) < 1`. The boundary itself is outside.
pub fn diamond_contains(center: Vec2, size: Vec2, p: Vec2) -> bool {
    let half = size * 0.5;
    if half.x <= 0.0 || half.y <= 0.0 {
        return false;
    }
    (p.x - center.x).abs() / half.x + (p.y - center.y).abs() / half.y < 1.0
}
