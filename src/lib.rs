//! `canvas2dmx` maps a 2D raster canvas onto addressable lighting fixtures.
//!
//! # Structure
//!
//! * [geometry] computes canvas coordinates for common fixture layouts (strips, rings, grids,
//!   polygon fills)
//! * [led_map] stores the LED index to pixel offset table
//! * [color] applies temperature and response correction to sampled colors
//! * [sampler] reads a pixel buffer at the mapped offsets
//! * [dmx] expands a channel pattern into DMX channel/value pairs or frames
//! * [settings] reads and writes color correction settings as plain text
//! * [models] describes a complete setup as a TOML configuration file
//! * [output] holds the sinks used by the `canvas2dmx` binary
//!
//! The pipeline performs no device I/O: pushing the resulting channel values to actual hardware
//! is left to the caller, through the [dmx::DmxSender] trait.
//!
//! # License
//!
//! This source code is released under the [MIT-License](https://opensource.org/licenses/MIT)

#[macro_use]
extern crate tracing;
#[macro_use]
extern crate serde_derive;

pub mod color;
pub mod dmx;
pub mod geometry;
pub mod image;
pub mod led_map;
pub mod models;
pub mod output;
pub mod sampler;
pub mod settings;

pub use models::Color;
