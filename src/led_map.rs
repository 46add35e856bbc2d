//! LED index to canvas pixel table

use derive_more::{Display, From, Into};
use thiserror::Error;

use crate::geometry::Position;

/// Largest number of LEDs a map can hold
pub const MAX_LEDS: usize = 1 << 20;

/// Row-major index of a pixel in a canvas buffer (`x + width * y`)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize,
)]
pub struct PixelOffset(usize);

impl PixelOffset {
    pub fn value(self) -> usize {
        self.0
    }
}

/// Dimensions of the canvas LEDs are mapped onto
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{width}x{height}")]
pub struct CanvasSize {
    pub width: usize,
    pub height: usize,
}

impl CanvasSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

#[derive(Debug, Clone, Error)]
pub enum LedMapError {
    #[error("cannot map LEDs on an empty canvas ({width}x{height})")]
    EmptyCanvas { width: usize, height: usize },
    #[error("LED index {index} is past the limit of {max} LEDs", max = MAX_LEDS)]
    IndexTooLarge { index: usize },
    #[error("cannot allocate room for LED {index}")]
    OutOfMemory { index: usize },
}

/// Ordered table of the pixel each LED samples from
///
/// The table only grows: assigning an index past the end fills the gap with unmapped entries.
#[derive(Debug, Clone, PartialEq)]
pub struct LedMap {
    offsets: Vec<Option<PixelOffset>>,
    size: CanvasSize,
}

impl LedMap {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            offsets: Vec::new(),
            size,
        }
    }

    pub fn with_capacity(size: CanvasSize, capacity: usize) -> Self {
        Self {
            offsets: Vec::with_capacity(capacity.min(MAX_LEDS)),
            size,
        }
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.size
    }

    /// Change the canvas size used by later assignments and by offset decoding
    ///
    /// Offsets already in the table are kept as they are.
    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        if self.size != size && self.mapped_count() > 0 {
            debug!(from = %self.size, to = %size, "canvas resized with LEDs already mapped");
        }

        self.size = size;
    }

    /// Map LED `index` to the pixel at `(x, y)`, clamped to the canvas
    ///
    /// Indices at or past [MAX_LEDS] are rejected.
    pub fn set_led(&mut self, index: usize, x: i32, y: i32) -> Result<PixelOffset, LedMapError> {
        let CanvasSize { width, height } = self.size;
        if self.size.is_empty() {
            return Err(LedMapError::EmptyCanvas { width, height });
        }

        if index >= MAX_LEDS {
            return Err(LedMapError::IndexTooLarge { index });
        }

        let x = i64::from(x).clamp(0, width as i64 - 1) as usize;
        let y = i64::from(y).clamp(0, height as i64 - 1) as usize;
        let offset = PixelOffset(x + width * y);

        if index >= self.offsets.len() {
            self.offsets
                .try_reserve(index + 1 - self.offsets.len())
                .map_err(|_| LedMapError::OutOfMemory { index })?;
            self.offsets.resize(index + 1, None);
        }
        self.offsets[index] = Some(offset);

        trace!(index, x, y, %offset, "mapped LED");
        Ok(offset)
    }

    /// Map consecutive LEDs starting at `start` to `positions`
    ///
    /// Returns the number of LEDs assigned.
    pub fn assign(&mut self, start: usize, positions: &[Position]) -> Result<usize, LedMapError> {
        for (i, position) in positions.iter().enumerate() {
            let index = start
                .checked_add(i)
                .ok_or(LedMapError::IndexTooLarge { index: start })?;
            self.set_led(index, position.x, position.y)?;
        }

        Ok(positions.len())
    }

    /// Unmap every LED, keeping the table length
    pub fn clear(&mut self) {
        for offset in &mut self.offsets {
            *offset = None;
        }
    }

    /// Highest mapped index plus one; unmapped gaps below it are counted
    pub fn mapped_count(&self) -> usize {
        self.offsets
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |i| i + 1)
    }

    /// Length of the table, including trailing unmapped entries
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PixelOffset> {
        self.offsets.get(index).copied().flatten()
    }

    /// Pixel coordinates of LED `index`, decoded with the current canvas width
    pub fn position(&self, index: usize) -> Option<Position> {
        let width = self.size.width;
        if width == 0 {
            return None;
        }

        self.get(index).map(|offset| {
            Position::new(
                (offset.value() % width) as i32,
                (offset.value() / width) as i32,
            )
        })
    }

    /// Decoded positions of every entry of the table, for overlay drawing
    pub fn positions(&self) -> impl Iterator<Item = (usize, Option<Position>)> + '_ {
        (0..self.offsets.len()).map(move |index| (index, self.position(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> LedMap {
        LedMap::new(CanvasSize::new(64, 32))
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut map = map();

        for &(x, y) in &[(0, 0), (63, 0), (0, 31), (17, 9), (63, 31)] {
            let offset = map.set_led(3, x, y).unwrap();
            assert_eq!(offset.value(), x as usize + 64 * y as usize);
            assert_eq!(map.get(3), Some(offset));
            assert_eq!(map.position(3), Some(Position::new(x, y)));
        }
    }

    #[test]
    fn coordinates_are_clamped() {
        let mut map = map();

        let clamped = map.set_led(0, 64 + 10, -5).unwrap();
        let edge = map.set_led(1, 63, 0).unwrap();
        assert_eq!(clamped, edge);

        assert_eq!(map.set_led(2, i32::MIN, i32::MAX).unwrap().value(), 64 * 31);
    }

    #[test]
    fn growth_fills_gaps() {
        let mut map = map();
        map.set_led(4, 1, 1).unwrap();

        assert_eq!(map.len(), 5);
        assert_eq!(map.mapped_count(), 5);
        assert_eq!(map.get(0), None);
        assert_eq!(map.get(4), Some(PixelOffset::from(65)));
        assert_eq!(map.get(10), None);

        map.set_led(1, 2, 0).unwrap();
        assert_eq!(map.len(), 5);
        assert_eq!(map.get(4), Some(PixelOffset::from(65)));
    }

    #[test]
    fn clear_keeps_length() {
        let mut map = map();
        map.assign(0, &[Position::new(1, 1), Position::new(2, 2)])
            .unwrap();

        map.clear();
        assert_eq!(map.mapped_count(), 0);
        assert_eq!(map.len(), 2);
        assert!(map.positions().all(|(_, p)| p.is_none()));
    }

    #[test]
    fn assign_returns_count() {
        let mut map = map();
        let positions = [Position::new(0, 0), Position::new(5, 0), Position::new(10, 0)];

        assert_eq!(map.assign(10, &positions).unwrap(), 3);
        assert_eq!(map.mapped_count(), 13);
        assert_eq!(map.assign(0, &[]).unwrap(), 0);
    }

    #[test]
    fn empty_canvas_is_rejected() {
        let mut map = LedMap::new(CanvasSize::new(0, 10));
        assert!(matches!(
            map.set_led(0, 0, 0),
            Err(LedMapError::EmptyCanvas {
                width: 0,
                height: 10
            })
        ));
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn resize_keeps_existing_offsets() {
        let mut map = map();
        let before = map.set_led(0, 10, 2).unwrap();

        map.set_canvas_size(CanvasSize::new(32, 32));
        assert_eq!(map.get(0), Some(before));
        // 10 + 64 * 2 decoded with the new width
        assert_eq!(map.position(0), Some(Position::new(10, 4)));

        assert_eq!(map.set_led(1, 40, 2).unwrap().value(), 31 + 32 * 2);
    }

    #[test]
    fn index_limit() {
        let mut map = map();

        assert!(matches!(
            map.set_led(MAX_LEDS, 0, 0),
            Err(LedMapError::IndexTooLarge { index }) if index == MAX_LEDS
        ));
        assert!(matches!(
            map.set_led(usize::MAX, 0, 0),
            Err(LedMapError::IndexTooLarge { .. })
        ));
        assert_eq!(map.len(), 0);

        map.set_led(MAX_LEDS - 1, 1, 0).unwrap();
        assert_eq!(map.mapped_count(), MAX_LEDS);
    }

    #[test]
    fn assign_near_index_overflow() {
        let mut map = map();
        let positions = [Position::new(0, 0), Position::new(1, 0)];

        assert!(matches!(
            map.assign(usize::MAX, &positions),
            Err(LedMapError::IndexTooLarge { .. })
        ));
        assert!(matches!(
            map.assign(MAX_LEDS - 1, &positions),
            Err(LedMapError::IndexTooLarge { index }) if index == MAX_LEDS
        ));
        assert_eq!(map.get(MAX_LEDS - 1), Some(PixelOffset::from(0)));
    }
}
