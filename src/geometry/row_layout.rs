//! Polygon fill with a fixed number of LEDs on every row

use super::polygon::{crossings, default_margin, default_true, place};
use super::{rotate_past, Bounds, Point, Position, StartCorner};

/// Vertices are turned into row space for any angle at least this large (radians)
const PRE_ROTATION_EPSILON: f32 = 0.0001;

/// Row-based polygon fill settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowLayout {
    /// LED count of each row, in traversal order
    pub leds_per_row: Vec<u32>,
    #[serde(default)]
    pub start_corner: StartCorner,
    #[serde(default = "default_true")]
    pub serpentine: bool,
    #[serde(default = "default_true")]
    pub horizontal: bool,
    /// Distance between rows; rows are spread evenly over the polygon when `<= 0`
    #[serde(default)]
    pub row_spacing: f32,
    /// Direction of the rows, in degrees
    #[serde(default)]
    pub angle_deg: f32,
    #[serde(default = "default_margin")]
    pub margin: f32,
}

impl RowLayout {
    pub fn new(leds_per_row: Vec<u32>) -> Self {
        Self {
            leds_per_row,
            start_corner: StartCorner::TopLeft,
            serpentine: true,
            horizontal: true,
            row_spacing: 0.0,
            angle_deg: 0.0,
            margin: default_margin(),
        }
    }
}

/// Spread `count` LEDs over the segments of one row, by arc length
///
/// Segments come from pairs of sorted crossings shrunk by `margin`; empty segments are skipped
/// and the gaps between segments do not count towards the distribution.
fn distribute(
    crossings: &[f32],
    count: u32,
    across: f32,
    horizontal: bool,
    center: Point,
    angle: f32,
    margin: f32,
) -> Vec<Position> {
    let segments: Vec<(f32, f32)> = crossings
        .chunks_exact(2)
        .map(|pair| (pair[0] + margin, pair[1] - margin))
        .filter(|(start, end)| end > start)
        .collect();

    let total: f32 = segments.iter().map(|(start, end)| end - start).sum();
    let last_end = match segments.last() {
        Some(&(_, end)) if total > 0.0 => end,
        _ => return Vec::new(),
    };

    (0..count)
        .map(|k| {
            let t = if count == 1 {
                0.5
            } else {
                k as f32 / (count - 1) as f32
            };

            let mut remaining = t * total;
            let mut along = last_end;
            for &(start, end) in &segments {
                if remaining <= end - start {
                    along = start + remaining;
                    break;
                }
                remaining -= end - start;
            }

            place(along, across, horizontal, center, angle)
        })
        .collect()
}

/// Fill the polygon described by `vertices` with `layout.leds_per_row[r]` LEDs on row `r`
///
/// When `angle_deg` is set, the polygon is first rotated the other way around its bounding box
/// center so rows can be scanned axis-aligned, then every LED is rotated back: the returned
/// positions are final canvas coordinates. Rows without any crossing are skipped, along with
/// their LED count.
pub fn row_layout_fill(vertices: &[Point], layout: &RowLayout) -> Vec<Position> {
    let bounds = match Bounds::of(vertices) {
        Some(bounds) if vertices.len() >= 3 && !layout.leds_per_row.is_empty() => bounds,
        _ => {
            debug!(
                vertices = vertices.len(),
                rows = layout.leds_per_row.len(),
                "row layout needs at least 3 vertices and 1 row"
            );
            return Vec::new();
        }
    };

    let center = bounds.center();
    let angle = layout.angle_deg.to_radians();

    let working: Vec<Point> = vertices
        .iter()
        .map(|&vertex| rotate_past(vertex, center, -angle, PRE_ROTATION_EPSILON))
        .collect();
    let bounds = match Bounds::of(&working) {
        Some(bounds) => bounds.shrink(layout.margin),
        None => return Vec::new(),
    };

    let horizontal = layout.horizontal;
    let (low, high) = bounds.scan_range(horizontal);
    let forward = layout.start_corner.scans_forward(horizontal);
    let reverse_first = layout.start_corner.reverses_first_row(horizontal);
    let rows = layout.leds_per_row.len();

    let row_coordinate = |row: usize| -> f32 {
        if layout.row_spacing > 0.0 {
            if forward {
                low + layout.row_spacing * row as f32
            } else {
                high - layout.row_spacing * row as f32
            }
        } else if rows == 1 {
            (low + high) * 0.5
        } else {
            let t = row as f32 / (rows - 1) as f32;
            if forward {
                low + (high - low) * t
            } else {
                high - (high - low) * t
            }
        }
    };

    let mut positions = Vec::new();
    for (row, &count) in layout.leds_per_row.iter().enumerate() {
        let across = row_coordinate(row);
        let row_crossings = crossings(&working, across, horizontal);
        if row_crossings.len() < 2 || count == 0 {
            continue;
        }

        let mut leds = distribute(
            &row_crossings,
            count,
            across,
            horizontal,
            center,
            angle,
            layout.margin,
        );

        if reverse_first != (layout.serpentine && row % 2 == 1) {
            leds.reverse();
        }

        positions.extend(leds);
    }

    trace!(leds = positions.len(), rows, "row layout fill");
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f32) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn even_rows_in_rectangle() {
        let rect = vec![
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 10.0),
            Point::new(0.0, 10.0),
        ];

        assert_eq!(
            row_layout_fill(&rect, &RowLayout::new(vec![3, 2])),
            vec![
                Position::new(1, 1),
                Position::new(10, 1),
                Position::new(19, 1),
                Position::new(19, 9),
                Position::new(1, 9),
            ]
        );
    }

    #[test]
    fn leds_skip_gaps_between_segments() {
        // U shape: the middle row crosses the outline four times
        let u_shape = vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 20.0),
            Point::new(20.0, 20.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 20.0),
            Point::new(0.0, 20.0),
        ];

        let layout = RowLayout {
            margin: 0.0,
            ..RowLayout::new(vec![4])
        };

        assert_eq!(
            row_layout_fill(&u_shape, &layout),
            vec![
                Position::new(0, 10),
                Position::new(7, 10),
                Position::new(23, 10),
                Position::new(30, 10),
            ]
        );
    }

    #[test]
    fn fixed_row_spacing() {
        let layout = RowLayout {
            row_spacing: 4.0,
            serpentine: false,
            start_corner: StartCorner::BottomLeft,
            ..RowLayout::new(vec![1, 1, 1])
        };

        // Rows at y = 19, 15 and 11, one centered LED each
        assert_eq!(
            row_layout_fill(&square(20.0), &layout),
            vec![
                Position::new(10, 19),
                Position::new(10, 15),
                Position::new(10, 11),
            ]
        );
    }

    #[test]
    fn vertical_columns_from_top_left() {
        let rect = vec![
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let layout = RowLayout {
            horizontal: false,
            margin: 0.0,
            ..RowLayout::new(vec![2, 2, 2])
        };

        // Columns at x = 0, 10 and 20; the last one only touches the right edge
        assert_eq!(
            row_layout_fill(&rect, &layout),
            vec![
                Position::new(0, 0),
                Position::new(0, 10),
                Position::new(10, 10),
                Position::new(10, 0),
            ]
        );
    }

    #[test]
    fn vertical_columns_from_bottom_right() {
        let rect = vec![
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let layout = RowLayout {
            horizontal: false,
            serpentine: false,
            start_corner: StartCorner::BottomRight,
            margin: 0.0,
            ..RowLayout::new(vec![2, 2, 2])
        };

        // The x = 20 column has no crossing and is skipped, every column runs bottom to top
        assert_eq!(
            row_layout_fill(&rect, &layout),
            vec![
                Position::new(10, 10),
                Position::new(10, 0),
                Position::new(0, 10),
                Position::new(0, 0),
            ]
        );
    }

    #[test]
    fn rows_outside_the_polygon_are_skipped() {
        let layout = RowLayout {
            row_spacing: 10.0,
            ..RowLayout::new(vec![2, 2, 2])
        };

        // Third row lands at y = 21, past the square
        assert_eq!(row_layout_fill(&square(20.0), &layout).len(), 4);
    }

    #[test]
    fn total_matches_row_counts() {
        let hexagon = vec![
            Point::new(30.0, 0.0),
            Point::new(60.0, 15.0),
            Point::new(60.0, 45.0),
            Point::new(30.0, 60.0),
            Point::new(0.0, 45.0),
            Point::new(0.0, 15.0),
        ];
        let counts = vec![2, 4, 6, 4, 2];
        let layout = RowLayout {
            margin: 2.0,
            ..RowLayout::new(counts.clone())
        };

        let positions = row_layout_fill(&hexagon, &layout);
        assert_eq!(positions.len() as u32, counts.iter().sum::<u32>());
    }

    #[test]
    fn quarter_turn_of_a_square() {
        let straight = row_layout_fill(&square(20.0), &RowLayout::new(vec![2, 2]));
        let turned = row_layout_fill(
            &square(20.0),
            &RowLayout {
                angle_deg: 90.0,
                ..RowLayout::new(vec![2, 2])
            },
        );

        assert_eq!(turned.len(), 4);
        assert_ne!(straight, turned);

        let mut a = straight.clone();
        let mut b = turned.clone();
        a.sort_by_key(|p| (p.x, p.y));
        b.sort_by_key(|p| (p.x, p.y));
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_inputs_map_nothing() {
        assert!(row_layout_fill(&square(20.0), &RowLayout::new(vec![])).is_empty());
        assert!(row_layout_fill(&square(20.0)[..2], &RowLayout::new(vec![3])).is_empty());
        assert!(row_layout_fill(&square(20.0), &RowLayout::new(vec![0, 0])).is_empty());
    }
}
