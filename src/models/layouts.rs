use ambassador::{delegatable_trait, Delegate};
use derive_more::From;
use serde_derive::{Deserialize, Serialize};
use strum_macros::IntoStaticStr;
use validator::Validate;

use crate::geometry::{self, Grid, Point, PolygonFill, Position, RowLayout};

/// Trait for converting a fixture layout to LED positions
#[delegatable_trait]
pub trait ToPositions {
    fn to_positions(&self) -> Vec<Position>;
}

fn default_spacing() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PointLayout {
    pub x: i32,
    pub y: i32,
}

impl ToPositions for PointLayout {
    fn to_positions(&self) -> Vec<Position> {
        vec![geometry::point(self.x, self.y)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct StripLayout {
    #[validate(range(min = 1))]
    pub count: usize,
    pub center: Point,
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    /// Direction of the strip, in radians
    #[serde(default)]
    pub angle: f32,
    #[serde(default)]
    pub reversed: bool,
}

impl ToPositions for StripLayout {
    fn to_positions(&self) -> Vec<Position> {
        geometry::strip(
            self.count,
            self.center,
            self.spacing,
            self.angle,
            self.reversed,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RingLayout {
    #[validate(range(min = 1))]
    pub count: usize,
    pub center: Point,
    #[validate(range(min = 0.))]
    pub radius: f32,
    /// Angle of the first LED, in radians
    #[serde(default)]
    pub start_angle: f32,
}

impl ToPositions for RingLayout {
    fn to_positions(&self) -> Vec<Position> {
        geometry::ring(self.count, self.center, self.radius, self.start_angle)
    }
}

impl Validate for Grid {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();

        if self.strip_length == 0 {
            errors.add("strip_length", validator::ValidationError::new("range"));
        }

        if self.num_strips == 0 {
            errors.add("num_strips", validator::ValidationError::new("range"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl ToPositions for Grid {
    fn to_positions(&self) -> Vec<Position> {
        geometry::grid(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SquareCornersLayout {
    pub center: Point,
    #[validate(range(min = 0.))]
    pub size: f32,
    /// Rotation of the square, in degrees
    #[serde(default)]
    pub rotation: f32,
}

impl ToPositions for SquareCornersLayout {
    fn to_positions(&self) -> Vec<Position> {
        geometry::square_corners(self.center, self.size, self.rotation)
    }
}

/// Validate the spacings of a polygon fill
fn validate_fill(layout: &PolygonLayout) -> Result<(), validator::ValidationError> {
    let fill = &layout.fill;

    if !(fill.row_spacing > 0.) {
        return Err(validator::ValidationError::new("invalid_spacing"));
    }

    if fill.leds_per_row.is_none() && !(fill.led_spacing > 0.) {
        return Err(validator::ValidationError::new("invalid_spacing"));
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_fill", message = "spacings must be positive"))]
pub struct PolygonLayout {
    #[validate(length(min = 3))]
    pub vertices: Vec<Point>,
    #[serde(default)]
    pub fill: PolygonFill,
}

impl ToPositions for PolygonLayout {
    fn to_positions(&self) -> Vec<Position> {
        geometry::polygon_fill(&self.vertices, &self.fill)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RowLayoutConfig {
    #[validate(length(min = 3))]
    pub vertices: Vec<Point>,
    pub rows: RowLayout,
}

impl ToPositions for RowLayoutConfig {
    fn to_positions(&self) -> Vec<Position> {
        geometry::row_layout_fill(&self.vertices, &self.rows)
    }
}

/// Placement of the LEDs of a fixture on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr, Delegate, From)]
#[serde(rename_all = "kebab-case", tag = "type")]
#[strum(serialize_all = "kebab-case")]
#[delegate(ToPositions)]
pub enum Layout {
    Point(PointLayout),
    Strip(StripLayout),
    Ring(RingLayout),
    Grid(Grid),
    SquareCorners(SquareCornersLayout),
    Polygon(PolygonLayout),
    RowLayout(RowLayoutConfig),
}

impl Validate for Layout {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            Layout::Point(layout) => layout.validate(),
            Layout::Strip(layout) => layout.validate(),
            Layout::Ring(layout) => layout.validate(),
            Layout::Grid(layout) => layout.validate(),
            Layout::SquareCorners(layout) => layout.validate(),
            Layout::Polygon(layout) => layout.validate(),
            Layout::RowLayout(layout) => layout.validate(),
        }
    }
}
