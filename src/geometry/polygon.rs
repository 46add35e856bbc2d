//! Scanline fill of arbitrary polygons

use strum_macros::{Display, EnumString, IntoStaticStr};

use super::{rotate, Bounds, Point, Position};

/// Corner of the fill region the first LED is closest to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StartCorner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Default for StartCorner {
    fn default() -> Self {
        Self::TopLeft
    }
}

impl StartCorner {
    pub fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    /// Whether scanlines are walked from the low end of the scan axis
    pub(super) fn scans_forward(self, horizontal: bool) -> bool {
        if horizontal {
            self.is_top()
        } else {
            self.is_left()
        }
    }

    /// Whether the first row is traversed from the high end of the row axis
    pub(super) fn reverses_first_row(self, horizontal: bool) -> bool {
        if horizontal {
            !self.is_left()
        } else {
            !self.is_top()
        }
    }
}

fn default_spacing() -> f32 {
    8.0
}

pub(super) fn default_margin() -> f32 {
    1.0
}

pub(super) fn default_true() -> bool {
    true
}

/// Spacing-driven polygon fill settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonFill {
    #[serde(default)]
    pub start_corner: StartCorner,
    /// Alternate the direction of successive rows
    #[serde(default = "default_true")]
    pub serpentine: bool,
    /// Fill along rows (`true`) or columns (`false`)
    #[serde(default = "default_true")]
    pub horizontal: bool,
    /// Distance between LEDs along a row
    #[serde(default = "default_spacing")]
    pub led_spacing: f32,
    /// Distance between rows
    #[serde(default = "default_spacing")]
    pub row_spacing: f32,
    /// Distribute exactly this many LEDs on every row segment, ignoring `led_spacing`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leds_per_row: Option<u32>,
    /// Rotation of the fill pattern around the fill center, in radians
    #[serde(default)]
    pub angle: f32,
    /// Inset from the polygon edges
    #[serde(default = "default_margin")]
    pub margin: f32,
}

impl Default for PolygonFill {
    fn default() -> Self {
        Self {
            start_corner: StartCorner::TopLeft,
            serpentine: true,
            horizontal: true,
            led_spacing: default_spacing(),
            row_spacing: default_spacing(),
            leds_per_row: None,
            angle: 0.0,
            margin: default_margin(),
        }
    }
}

/// Coordinates where the scanline at `scan` crosses the polygon edges, sorted
///
/// For horizontal scanlines `scan` is a `y` value and the result holds `x` values, and the other
/// way around for vertical ones. An edge crosses when one of its endpoints is at or before the
/// scanline and the other strictly after it.
pub(super) fn crossings(vertices: &[Point], scan: f32, horizontal: bool) -> Vec<f32> {
    let split = |p: &Point| if horizontal { (p.x, p.y) } else { (p.y, p.x) };
    let mut result = Vec::new();

    for (i, vi) in vertices.iter().enumerate() {
        let vj = &vertices[(i + 1) % vertices.len()];
        let (l1, a1) = split(vi);
        let (l2, a2) = split(vj);

        if (a1 <= scan && a2 > scan) || (a2 <= scan && a1 > scan) {
            let t = (scan - a1) / (a2 - a1);
            result.push(l1 + t * (l2 - l1));
        }
    }

    result.sort_by(|a, b| a.total_cmp(b));
    result
}

/// Final pixel for a point given in scanline coordinates
pub(super) fn place(along: f32, across: f32, horizontal: bool, center: Point, angle: f32) -> Position {
    let point = if horizontal {
        Point::new(along, across)
    } else {
        Point::new(across, along)
    };

    Position::nearest(rotate(point, center, angle))
}

/// Whether `point` lies inside the polygon (even-odd rule)
pub fn contains(vertices: &[Point], point: Point) -> bool {
    let mut inside = false;
    let mut j = match vertices.len() {
        0 => return false,
        n => n - 1,
    };

    for (i, vi) in vertices.iter().enumerate() {
        let vj = &vertices[j];
        if (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Fill the polygon described by `vertices` with LEDs
///
/// The polygon is implicitly closed. Scanlines are walked `row_spacing` apart across the
/// margin-shrunk bounding box, both bounds included, starting from the edge `start_corner` lies
/// on. Each pair of edge crossings forms a segment, LEDs are laid on it either every
/// `led_spacing` pixels or, with `leds_per_row`, evenly from one end to the other. A trailing
/// unpaired crossing (self-intersecting polygons) is ignored.
pub fn polygon_fill(vertices: &[Point], fill: &PolygonFill) -> Vec<Position> {
    let bounds = match Bounds::of(vertices) {
        Some(bounds) if vertices.len() >= 3 => bounds.shrink(fill.margin),
        _ => {
            debug!(vertices = vertices.len(), "polygon needs at least 3 vertices");
            return Vec::new();
        }
    };

    let per_row = fill.leds_per_row.filter(|&n| n > 0);
    if !(fill.row_spacing > 0.0) || (per_row.is_none() && !(fill.led_spacing > 0.0)) {
        warn!(
            row_spacing = fill.row_spacing,
            led_spacing = fill.led_spacing,
            "polygon fill spacing must be positive"
        );
        return Vec::new();
    }

    let horizontal = fill.horizontal;
    let center = bounds.center();
    let (low, high) = bounds.scan_range(horizontal);
    let reverse_first = fill.start_corner.reverses_first_row(horizontal);

    let (mut scan, step) = if fill.start_corner.scans_forward(horizontal) {
        (low, fill.row_spacing)
    } else {
        (high, -fill.row_spacing)
    };

    let mut positions = Vec::new();
    let mut row = 0usize;

    while (step > 0.0 && scan <= high) || (step < 0.0 && scan >= low) {
        for pair in crossings(vertices, scan, horizontal).chunks_exact(2) {
            let start = pair[0] + fill.margin;
            let end = pair[1] - fill.margin;

            let mut segment = Vec::new();
            match per_row {
                Some(1) => {
                    segment.push(place((start + end) * 0.5, scan, horizontal, center, fill.angle));
                }
                Some(count) => {
                    let gap = (end - start) / (count - 1) as f32;
                    for k in 0..count {
                        let along = start + gap * k as f32;
                        segment.push(place(along, scan, horizontal, center, fill.angle));
                    }
                }
                None => {
                    let mut along = start;
                    while along <= end {
                        segment.push(place(along, scan, horizontal, center, fill.angle));

                        let next = along + fill.led_spacing;
                        if next == along {
                            break;
                        }
                        along = next;
                    }
                }
            }

            if reverse_first != (fill.serpentine && row % 2 == 1) {
                segment.reverse();
            }

            positions.extend(segment);
        }

        let next = scan + step;
        if next == scan {
            break;
        }
        scan = next;
        row += 1;
    }

    trace!(leds = positions.len(), rows = row, "polygon fill");
    positions
}
