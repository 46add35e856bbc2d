//! Pixel buffers the sampler reads from

use std::convert::TryFrom;

use thiserror::Error;

use crate::{color::argb_to_color, models::Color};

/// Row-major buffer of colors addressed by [crate::led_map::PixelOffset]
pub trait PixelBuffer {
    /// Number of addressable pixels
    fn pixel_count(&self) -> usize;

    /// Color at `offset`, `None` past the end of the buffer
    fn color_at(&self, offset: usize) -> Option<Color>;
}

/// Packed `0xAARRGGBB` pixels
impl PixelBuffer for [u32] {
    fn pixel_count(&self) -> usize {
        self.len()
    }

    fn color_at(&self, offset: usize) -> Option<Color> {
        self.get(offset).copied().map(argb_to_color)
    }
}

#[derive(Debug, Clone, Error)]
pub enum RawImageError {
    #[error("invalid data ({data} bytes) for the given dimensions ({width} x {height} x {channels} = {expected})")]
    InvalidData {
        data: usize,
        width: usize,
        height: usize,
        channels: usize,
        expected: usize,
    },
}

/// Tightly packed 8-bit RGB image
#[derive(Clone)]
pub struct RawImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl RawImage {
    pub const CHANNELS: usize = 3;

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }

        self.color_at(x + self.width * y)
    }
}

impl std::fmt::Debug for RawImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut f = f.debug_struct("RawImage");
        f.field("width", &self.width);
        f.field("height", &self.height);

        if self.data.len() > 32 {
            f.field("data", &format!("[{} bytes]", self.data.len()));
        } else {
            f.field("data", &self.data);
        }

        f.finish()
    }
}

impl TryFrom<(Vec<u8>, u32, u32)> for RawImage {
    type Error = RawImageError;

    fn try_from((data, width, height): (Vec<u8>, u32, u32)) -> Result<Self, Self::Error> {
        let width = width as usize;
        let height = height as usize;
        let expected = width * height * Self::CHANNELS;

        if data.len() != expected {
            return Err(RawImageError::InvalidData {
                data: data.len(),
                width,
                height,
                channels: Self::CHANNELS,
                expected,
            });
        }

        Ok(Self {
            data,
            width,
            height,
        })
    }
}

impl PixelBuffer for RawImage {
    fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    fn color_at(&self, offset: usize) -> Option<Color> {
        let start = offset.checked_mul(Self::CHANNELS)?;
        let end = start.checked_add(Self::CHANNELS)?;
        match self.data.get(start..end)? {
            &[r, g, b] => Some(Color::new(r, g, b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_slice() {
        let pixels: &[u32] = &[0xFF_01_02_03, 0x00_FF_80_00];

        assert_eq!(pixels.pixel_count(), 2);
        assert_eq!(pixels.color_at(0), Some(Color::new(1, 2, 3)));
        assert_eq!(pixels.color_at(1), Some(Color::new(255, 128, 0)));
        assert_eq!(pixels.color_at(2), None);
    }

    #[test]
    fn raw_image_pixels() {
        let image = RawImage::try_from((vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12], 2, 2)).unwrap();

        assert_eq!(image.pixel_count(), 4);
        assert_eq!(image.get_pixel(1, 0), Some(Color::new(4, 5, 6)));
        assert_eq!(image.get_pixel(0, 1), Some(Color::new(7, 8, 9)));
        assert_eq!(image.color_at(3), Some(Color::new(10, 11, 12)));
        assert_eq!(image.color_at(4), None);
        assert_eq!(image.get_pixel(2, 0), None);
    }

    #[test]
    fn raw_image_size_mismatch() {
        let err = RawImage::try_from((vec![0; 10], 2, 2)).unwrap_err();
        assert!(matches!(
            err,
            RawImageError::InvalidData {
                data: 10,
                expected: 12,
                ..
            }
        ));
    }
}
