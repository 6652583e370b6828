//! CPU-side geometry for the textured quad.
//!
//! The quad is always six vertices (two triangles) in normalised device
//! coordinates. Rotation, pan, and zoom edit the positions in place; the
//! GPU buffers are rebuilt from these values whenever they change.

use std::f32::consts::PI;

/// Vertices in the two-triangle quad.
pub const QUAD_VERTEX_COUNT: usize = 6;

/// Angle applied by one rotate key press.
pub const ROTATION_STEP: f32 = PI / 8.0;

/// Per-vertex colours, cycled across the quad.
pub const COLOUR_PALETTE: [[f32; 3]; 3] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

/// Positions of the six quad vertices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuadVertices {
    points: [[f32; 2]; QUAD_VERTEX_COUNT],
}

impl QuadVertices {
    pub fn from_points(points: [[f32; 2]; QUAD_VERTEX_COUNT]) -> Self {
        Self { points }
    }

    /// Builds the centred quad that preserves a `width`:`height` aspect ratio.
    ///
    /// The longer axis spans `[-1, 1]`; the shorter one is shrunk
    /// proportionally.
    pub fn aspect_fit(width: u32, height: u32) -> Self {
        let (w, h) = aspect_extents(width, height);
        Self::from_points([[-w, -h], [-w, h], [w, h], [w, h], [w, -h], [-w, -h]])
    }

    pub fn points(&self) -> &[[f32; 2]; QUAD_VERTEX_COUNT] {
        &self.points
    }

    /// Rotates every vertex about the origin by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        for [x, y] in &mut self.points {
            let rx = *x * cos - *y * sin;
            let ry = *y * cos + *x * sin;
            *x = rx;
            *y = ry;
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        for [x, y] in &mut self.points {
            *x += dx;
            *y += dy;
        }
    }

    pub fn scale(&mut self, factor: f32) {
        for [x, y] in &mut self.points {
            *x *= factor;
            *y *= factor;
        }
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        self.points.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(min_x, min_y, max_x, max_y), [x, y]| {
                (min_x.min(*x), min_y.min(*y), max_x.max(*x), max_y.max(*y))
            },
        )
    }
}

/// Half-extents `(width, height)` of the aspect-correct quad.
pub fn aspect_extents(width: u32, height: u32) -> (f32, f32) {
    let width = width.max(1) as f32;
    let height = height.max(1) as f32;
    if width > height {
        (1.0, height / width)
    } else {
        (width / height, 1.0)
    }
}

/// Pixel-unit texture coordinates matching [`QuadVertices::aspect_fit`].
///
/// Corners run `(0,0) → (0,H) → (W,H) → (W,0)`, duplicated where the two
/// triangles share an edge.
pub fn texture_coordinates(width: u32, height: u32) -> [[f32; 2]; QUAD_VERTEX_COUNT] {
    let w = width as f32;
    let h = height as f32;
    [[0.0, 0.0], [0.0, h], [w, h], [w, h], [w, 0.0], [0.0, 0.0]]
}

/// Palette colour for every quad vertex.
pub fn vertex_colours() -> [[f32; 3]; QUAD_VERTEX_COUNT] {
    std::array::from_fn(|index| COLOUR_PALETTE[index % COLOUR_PALETTE.len()])
}
