use std::convert::TryFrom;

use criterion::{criterion_group, criterion_main, Criterion};

use canvas2dmx::{
    color::ColorCorrection,
    dmx::{self, ChannelLayout},
    geometry::{self, Grid, Point},
    image::RawImage,
    led_map::{CanvasSize, LedMap},
    sampler,
};

fn random_image(width: u32, height: u32) -> RawImage {
    let data: Vec<u8> = (0..width as usize * height as usize * RawImage::CHANNELS)
        .map(|_| rand::random())
        .collect();

    RawImage::try_from((data, width, height)).unwrap()
}

fn grid_map(width: u32, height: u32, strips: usize, strip_length: usize) -> LedMap {
    let mut map = LedMap::new(CanvasSize::new(width as usize, height as usize));

    let positions = geometry::grid(&Grid {
        strip_length,
        num_strips: strips,
        center: Point::new(width as f32 / 2., height as f32 / 2.),
        led_spacing: width as f32 / strip_length as f32,
        strip_spacing: height as f32 / strips as f32,
        zigzag: true,
        ..Default::default()
    });

    map.assign(0, &positions).unwrap();
    map
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let width = 1920 / 4;
    let height = 1080 / 4;
    let map = grid_map(width, height, 16, 32);
    let image = random_image(width, height);
    let layout = ChannelLayout::new("drgb", 1).unwrap().with_default('d', 255);

    let mut correction = ColorCorrection::new(2.2, -0.2);
    c.bench_function(
        &format!("{} px {} leds gamma", width * height, map.mapped_count()),
        |b| b.iter(|| sampler::sample(&map, &image, &correction)),
    );

    correction.load_settings("1.0\n0.0\n0.0\n0.1\n0.4\n1.0\n").unwrap();
    c.bench_function(
        &format!("{} px {} leds curve", width * height, map.mapped_count()),
        |b| b.iter(|| sampler::sample(&map, &image, &correction)),
    );

    let colors = sampler::sample(&map, &image, &correction).colors;
    c.bench_function(&format!("{} leds frame", colors.len()), |b| {
        b.iter(|| dmx::build_frame(&colors, &layout, 4 * dmx::DMX_UNIVERSE_SIZE))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
