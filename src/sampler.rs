//! Canvas sampling at mapped LED offsets

use derive_more::Display;

use crate::{
    color::ColorCorrection,
    image::PixelBuffer,
    led_map::{LedMap, PixelOffset},
    models::Color,
};

/// Recoverable problem met while sampling a single LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SamplingFault {
    #[display("no LEDs mapped")]
    NoLedsMapped,
    #[display("LED {led} is not mapped")]
    Unmapped { led: usize },
    #[display("LED {led} maps to offset {offset}, past the {len} pixels of the buffer")]
    OutOfBounds {
        led: usize,
        offset: PixelOffset,
        len: usize,
    },
}

/// Result of sampling a frame
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sample {
    /// Corrected colors, one per LED up to [LedMap::mapped_count]
    pub colors: Vec<Color>,
    /// LEDs that could not be sampled and were set to black
    pub faults: Vec<SamplingFault>,
}

impl Sample {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Sample `buffer` at every mapped LED and correct the result
///
/// Faults never abort the frame: faulty LEDs are black, and the faults are reported together in
/// the result and in a single log event.
#[instrument(skip(map, buffer, correction), fields(leds = map.mapped_count()))]
pub fn sample<B>(map: &LedMap, buffer: &B, correction: &ColorCorrection) -> Sample
where
    B: PixelBuffer + ?Sized,
{
    let count = map.mapped_count();
    if count == 0 {
        debug!("no LEDs mapped");
        return Sample {
            colors: Vec::new(),
            faults: vec![SamplingFault::NoLedsMapped],
        };
    }

    let len = buffer.pixel_count();
    let mut colors = Vec::with_capacity(count);
    let mut faults = Vec::new();

    for led in 0..count {
        let color = match map.get(led) {
            None => {
                faults.push(SamplingFault::Unmapped { led });
                None
            }
            Some(offset) => {
                let color = buffer.color_at(offset.value());
                if color.is_none() {
                    faults.push(SamplingFault::OutOfBounds { led, offset, len });
                }
                color
            }
        };

        colors.push(color.map_or_else(Color::default, |c| correction.correct(c)));
    }

    if let Some(first) = faults.first() {
        let out_of_bounds = faults
            .iter()
            .filter(|f| matches!(f, SamplingFault::OutOfBounds { .. }))
            .count();

        warn!(
            faults = faults.len(),
            out_of_bounds,
            first = %first,
            "some LEDs could not be sampled"
        );
    }

    Sample { colors, faults }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::Position, led_map::CanvasSize};

    fn canvas() -> Vec<u32> {
        // 4x2 canvas, each pixel encodes its own offset in the blue channel
        (0..8u32).map(|i| 0xFF00_0000 | (i * 10)).collect()
    }

    fn map() -> LedMap {
        LedMap::new(CanvasSize::new(4, 2))
    }

    #[test]
    fn samples_in_led_order() {
        let mut map = map();
        map.assign(0, &[Position::new(3, 1), Position::new(0, 0), Position::new(1, 0)])
            .unwrap();

        let sample = sample(&map, canvas().as_slice(), &ColorCorrection::default());
        assert!(sample.is_clean());
        assert_eq!(
            sample.colors,
            vec![
                Color::new(0, 0, 70),
                Color::new(0, 0, 0),
                Color::new(0, 0, 10)
            ]
        );
    }

    #[test]
    fn nothing_mapped() {
        let sample = sample(&map(), canvas().as_slice(), &ColorCorrection::default());
        assert!(sample.colors.is_empty());
        assert_eq!(sample.faults, vec![SamplingFault::NoLedsMapped]);
    }

    #[test]
    fn gaps_are_black() {
        let mut map = map();
        map.set_led(2, 2, 0).unwrap();

        let sample = sample(&map, canvas().as_slice(), &ColorCorrection::default());
        assert_eq!(sample.colors.len(), 3);
        assert_eq!(sample.colors[0], Color::default());
        assert_eq!(sample.colors[2], Color::new(0, 0, 20));
        assert_eq!(
            sample.faults,
            vec![
                SamplingFault::Unmapped { led: 0 },
                SamplingFault::Unmapped { led: 1 }
            ]
        );
    }

    #[test]
    fn out_of_bounds_only_affects_its_led() {
        let mut map = map();
        map.set_led(0, 1, 0).unwrap();
        map.set_led(1, 3, 1).unwrap();

        // Buffer smaller than the canvas the LEDs were mapped on
        let pixels = canvas();
        let sample = sample(&map, &pixels[..4], &ColorCorrection::default());

        assert_eq!(sample.colors, vec![Color::new(0, 0, 10), Color::default()]);
        assert_eq!(
            sample.faults,
            vec![SamplingFault::OutOfBounds {
                led: 1,
                offset: PixelOffset::from(7),
                len: 4
            }]
        );
    }

    #[test]
    fn correction_is_applied() {
        let mut map = map();
        map.set_led(0, 0, 0).unwrap();

        let pixels: &[u32] = &[0xFF80_0000];
        let sample = sample(&map, pixels, &ColorCorrection::new(2.0, 0.0));
        assert_eq!(sample.colors, vec![Color::new(64, 0, 0)]);
    }

    #[test]
    fn fault_messages() {
        assert_eq!(SamplingFault::NoLedsMapped.to_string(), "no LEDs mapped");
        assert_eq!(
            SamplingFault::Unmapped { led: 3 }.to_string(),
            "LED 3 is not mapped"
        );
    }
}
