//! Output sinks for the command-line host

use std::io::{self, Write};

use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::{dmx::DmxSender, led_map::LedMap, models::Color, sampler::Sample};

/// How a sampled frame is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// One `channel value` line per channel
    Text,
    /// The whole frame as a JSON document
    Json,
    /// Truecolor swatches of the sampled colors
    Ansi,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text
    }
}

/// Sender writing `channel value` lines
///
/// The first write error stops the output and is returned by [TextSender::finish].
pub struct TextSender<W: Write> {
    out: W,
    sent: usize,
    error: Option<io::Error>,
}

impl<W: Write> TextSender<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sent: 0,
            error: None,
        }
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Flush the output and report the first error met while writing
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }

        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> DmxSender for TextSender<W> {
    fn send(&mut self, channel: u32, value: u8) {
        if self.error.is_some() {
            return;
        }

        match writeln!(self.out, "{} {}", channel, value) {
            Ok(()) => self.sent += 1,
            Err(error) => {
                warn!(%error, channel, "failed to write channel");
                self.error = Some(error);
            }
        }
    }
}

/// Frame summary printed by [OutputFormat::Json]
#[derive(Debug, Serialize)]
pub struct FrameReport<'a> {
    pub leds: usize,
    pub colors: Vec<[u8; 3]>,
    pub frame: &'a [u8],
    pub faults: Vec<String>,
}

impl<'a> FrameReport<'a> {
    pub fn new(sample: &Sample, frame: &'a [u8]) -> Self {
        Self {
            leds: sample.colors.len(),
            colors: sample
                .colors
                .iter()
                .map(|c| [c.red, c.green, c.blue])
                .collect(),
            frame,
            faults: sample.faults.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Truecolor ANSI sequence with one block per color
pub fn ansi_swatches(colors: &[Color]) -> String {
    let mut buf: String = colors
        .iter()
        .map(|led| {
            format!(
                "\x1B[38;2;{red};{green};{blue}m█",
                red = led.red,
                green = led.green,
                blue = led.blue
            )
        })
        .collect();

    buf.push_str("\x1B[0m");
    buf
}

/// Log every color as its own event
pub fn log_colors(colors: &[Color]) {
    for (i, led) in colors.iter().enumerate() {
        info!(
            led = %format_args!("{:3}", i),
            red = %format_args!("{:3}", led.red),
            green = %format_args!("{:3}", led.green),
            blue = %format_args!("{:3}", led.blue),
        );
    }
}

/// Write the pixel each LED samples from, `-` for unmapped LEDs
pub fn write_map(map: &LedMap, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "# canvas {}", map.canvas_size())?;

    for (index, position) in map.positions() {
        match position {
            Some(position) => writeln!(out, "{} {}", index, position)?,
            None => writeln!(out, "{} -", index)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dmx::{emit, ChannelLayout},
        geometry::Position,
        led_map::CanvasSize,
        sampler::SamplingFault,
    };

    #[test]
    fn text_sender_lines() {
        let layout = ChannelLayout::new("drgb", 1).unwrap().with_default('d', 255);
        let mut sender = TextSender::new(Vec::new());
        emit(&[Color::new(10, 20, 30)], &layout, &mut sender);

        assert_eq!(sender.sent(), 4);
        let out = sender.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 255\n2 10\n3 20\n4 30\n");
    }

    #[test]
    fn text_sender_keeps_first_error() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut sender = TextSender::new(Broken);
        sender.send(1, 2);
        sender.send(2, 3);

        assert_eq!(sender.sent(), 0);
        assert_eq!(
            sender.finish().err().map(|e| e.kind()),
            Some(io::ErrorKind::BrokenPipe)
        );
    }

    #[test]
    fn ansi_output() {
        assert_eq!(ansi_swatches(&[]), "\x1B[0m");
        assert_eq!(
            ansi_swatches(&[Color::new(1, 2, 3)]),
            "\x1B[38;2;1;2;3m█\x1B[0m"
        );
    }

    #[test]
    fn json_report() {
        let sample = Sample {
            colors: vec![Color::new(1, 2, 3), Color::default()],
            faults: vec![SamplingFault::Unmapped { led: 1 }],
        };
        let frame = [1, 2, 3, 0];

        let value: serde_json::Value =
            serde_json::from_str(&FrameReport::new(&sample, &frame).to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "leds": 2,
                "colors": [[1, 2, 3], [0, 0, 0]],
                "frame": [1, 2, 3, 0],
                "faults": ["LED 1 is not mapped"],
            })
        );
    }

    #[test]
    fn map_listing() {
        let mut map = LedMap::new(CanvasSize::new(10, 10));
        map.assign(1, &[Position::new(3, 4)]).unwrap();

        let mut out = Vec::new();
        write_map(&map, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# canvas 10x10\n0 -\n1 (3, 4)\n"
        );
    }

    #[test]
    fn format_names() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::Ansi.to_string(), "ansi");
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
