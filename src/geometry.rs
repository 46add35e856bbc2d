//! Coordinate generators for common fixture layouts
//!
//! Every generator returns positions in LED order: element `k` is where LED `start + k` samples
//! from once the positions are assigned to a [crate::led_map::LedMap]. Generators never fail:
//! degenerate inputs (no LEDs, not enough vertices, spacings that would not advance) produce an
//! empty list.

use std::f32::consts::{FRAC_PI_2, TAU};

use derive_more::{Display, From};

mod polygon;
pub use polygon::*;

mod row_layout;
pub use row_layout::*;

/// Rotations smaller than this (in radians) are skipped
const ANGLE_EPSILON: f32 = 0.001;

/// Point in canvas space, before rounding to a pixel
#[derive(Debug, Default, Clone, Copy, PartialEq, From, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Pixel coordinate on the canvas
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, From, Serialize)]
#[display("({x}, {y})")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Nearest pixel to `point`, halves rounding up (`-0.5` becomes `0`)
    pub fn nearest(point: Point) -> Self {
        Self {
            x: round_px(point.x),
            y: round_px(point.y),
        }
    }
}

fn round_px(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// Sine and cosine of `angle`, evaluated in double precision
fn sin_cos(angle: f32) -> (f32, f32) {
    let (sin, cos) = f64::from(angle).sin_cos();
    (sin as f32, cos as f32)
}

/// Rotate `point` by `angle` radians around `center`
fn rotate(point: Point, center: Point, angle: f32) -> Point {
    rotate_past(point, center, angle, ANGLE_EPSILON)
}

/// Rotate `point` around `center` unless `|angle| < epsilon`
fn rotate_past(point: Point, center: Point, angle: f32, epsilon: f32) -> Point {
    if angle.abs() < epsilon {
        return point;
    }

    let (sin, cos) = sin_cos(angle);
    let dx = point.x - center.x;
    let dy = point.y - center.y;

    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Axis-aligned bounding box of a vertex set
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    fn of(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        Some(rest.iter().fold(
            Self {
                min: *first,
                max: *first,
            },
            |b, p| Self {
                min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            },
        ))
    }

    fn shrink(self, margin: f32) -> Self {
        Self {
            min: Point::new(self.min.x + margin, self.min.y + margin),
            max: Point::new(self.max.x - margin, self.max.y - margin),
        }
    }

    fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Range of the coordinate scanlines walk along
    fn scan_range(&self, horizontal: bool) -> (f32, f32) {
        if horizontal {
            (self.min.y, self.max.y)
        } else {
            (self.min.x, self.max.x)
        }
    }
}

/// Single LED at `(x, y)`
pub fn point(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

/// Linear strip of `count` LEDs centered on `center`
///
/// LEDs are `spacing` pixels apart along the direction given by `angle` (radians). When
/// `reversed` is set, the positions are unchanged but assigned from the far end, so the first
/// LED sits at the end of the strip.
pub fn strip(count: usize, center: Point, spacing: f32, angle: f32, reversed: bool) -> Vec<Position> {
    let (sin, cos) = sin_cos(angle);
    let mut positions = vec![Position::default(); count];

    for i in 0..count {
        let offset = (i as f32 - (count as f32 - 1.0) / 2.0) * spacing;
        let target = if reversed { count - 1 - i } else { i };

        positions[target] = Position::nearest(Point::new(
            center.x + offset * cos,
            center.y + offset * sin,
        ));
    }

    positions
}

/// Ring of `count` LEDs around `center`
///
/// LED `i` sits at angle `start_angle + i * 2π / count`, at `center - radius * (cos, sin)`.
pub fn ring(count: usize, center: Point, radius: f32, start_angle: f32) -> Vec<Position> {
    (0..count)
        .map(|i| {
            let (sin, cos) = sin_cos(start_angle + i as f32 * TAU / count as f32);
            Position::nearest(Point::new(center.x - radius * cos, center.y - radius * sin))
        })
        .collect()
}

/// Parallel strips of LEDs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grid {
    /// Number of LEDs in each strip
    pub strip_length: usize,
    /// Number of strips
    pub num_strips: usize,
    /// Center of the whole grid
    pub center: Point,
    /// Distance between LEDs of a strip
    pub led_spacing: f32,
    /// Distance between strips
    pub strip_spacing: f32,
    /// Direction of the strips, in radians
    pub angle: f32,
    /// Reverse every other strip
    pub zigzag: bool,
    /// Reverse the even strips instead of the odd ones
    pub flip: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            strip_length: 1,
            num_strips: 1,
            center: Point::default(),
            led_spacing: 1.0,
            strip_spacing: 1.0,
            angle: 0.0,
            zigzag: false,
            flip: false,
        }
    }
}

/// Grid of LED strips
///
/// Strips are offset perpendicular to `angle`, strip `i` occupying LEDs
/// `i * strip_length .. (i + 1) * strip_length`.
pub fn grid(grid: &Grid) -> Vec<Position> {
    let (sin, cos) = sin_cos(grid.angle + FRAC_PI_2);
    let mut positions = Vec::with_capacity(grid.strip_length * grid.num_strips);

    for i in 0..grid.num_strips {
        let reversed = grid.zigzag && ((i % 2 == 1) != grid.flip);
        let offset = (i as f32 - (grid.num_strips as f32 - 1.0) / 2.0) * grid.strip_spacing;
        let center = Point::new(grid.center.x + offset * cos, grid.center.y + offset * sin);

        positions.extend(strip(
            grid.strip_length,
            center,
            grid.led_spacing,
            grid.angle,
            reversed,
        ));
    }

    positions
}

/// Four corners of a square centered on `center`, rotated by `rotation_degrees`
///
/// Corners are listed top-left, top-right, bottom-right, bottom-left before rotation.
pub fn square_corners(center: Point, size: f32, rotation_degrees: f32) -> Vec<Position> {
    let half = size / 2.0;
    let (sin, cos) = sin_cos(rotation_degrees.to_radians());

    [(-half, -half), (half, -half), (half, half), (-half, half)]
        .iter()
        .map(|&(dx, dy)| {
            Position::nearest(Point::new(
                center.x + dx * cos - dy * sin,
                center.y + dx * sin + dy * cos,
            ))
        })
        .collect()
}
