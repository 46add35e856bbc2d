//! Color utilities

use crate::models::Color;

/// Unpack a `0xAARRGGBB` pixel, dropping alpha
pub fn argb_to_color(argb: u32) -> Color {
    Color::new((argb >> 16) as u8, (argb >> 8) as u8, argb as u8)
}

/// Pack a color as an opaque `0xAARRGGBB` pixel
pub fn color_to_argb(color: Color) -> u32 {
    let (r, g, b) = color.into_components();
    0xFF00_0000 | u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b)
}

/// Normalize a color to `[0, 1]` components
pub fn color_to_unit(color: Color) -> (f32, f32, f32) {
    color.into_format::<f32>().into_components()
}

/// Scale a `[0, 1]` component back to a byte, saturating
pub fn unit_to_channel(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round().clamp(0.0, 255.0) as u8
}
