#[macro_use]
extern crate tracing;

use std::{convert::TryFrom, io, path::PathBuf};

use color_eyre::eyre::WrapErr;
use structopt::StructOpt;

use canvas2dmx::{
    dmx,
    image::RawImage,
    models::Config,
    output::{self, OutputFormat, TextSender},
    sampler,
};

#[derive(Debug, StructOpt)]
struct Opts {
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u32,
    /// Path to the TOML setup description
    #[structopt(short, long = "config")]
    config_path: PathBuf,
    /// Frame to sample, as a PNG image the size of the canvas
    #[structopt(short, long = "image")]
    image_path: Option<PathBuf>,
    /// Color settings file overriding the configured color correction
    #[structopt(long = "settings")]
    settings_path: Option<PathBuf>,
    /// Write the color settings in effect to this file
    #[structopt(long = "save-settings")]
    save_settings_path: Option<PathBuf>,
    /// Length of the frame printed by the json format
    #[structopt(long, default_value = "512")]
    frame_length: usize,
    /// Output format: text, json or ansi
    #[structopt(short, long, default_value = "text")]
    format: OutputFormat,
    /// Print the pixel sampled by every LED
    #[structopt(long)]
    show_map: bool,
    #[structopt(long)]
    dump_config: bool,
}

fn run(opts: Opts) -> color_eyre::eyre::Result<()> {
    // Load configuration
    let config = Config::load_file(&opts.config_path)
        .wrap_err_with(|| format!("failed to load {}", opts.config_path.display()))?;

    // Dump configuration if this was asked
    if opts.dump_config {
        print!("{}", config.to_string()?);
        return Ok(());
    }

    let map = config.led_map()?;
    let layout = config.channel_layout()?;
    let mut correction = config.color_correction()?;

    if let Some(path) = opts.settings_path.as_deref() {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        correction
            .load_settings(&text)
            .wrap_err_with(|| format!("invalid settings in {}", path.display()))?;
    }

    if let Some(path) = opts.save_settings_path.as_deref() {
        std::fs::write(path, correction.settings().to_text())
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "saved color settings");
    }

    let leds = map.mapped_count();
    info!(
        leds,
        canvas = %map.canvas_size(),
        channels = layout.channel_count(leds),
        universes = layout.universe_count(leds),
        "LED map ready"
    );

    let stdout = io::stdout();
    if opts.show_map {
        output::write_map(&map, &mut stdout.lock())?;
    }

    let image_path = match opts.image_path.as_deref() {
        Some(path) => path,
        None => return Ok(()),
    };

    // Load the frame
    let frame = image::open(image_path)
        .wrap_err_with(|| format!("failed to open {}", image_path.display()))?
        .to_rgb8();
    let (width, height) = frame.dimensions();

    let canvas = map.canvas_size();
    if (width as usize, height as usize) != (canvas.width, canvas.height) {
        warn!(
            image = %format_args!("{}x{}", width, height),
            %canvas,
            "image size differs from the canvas"
        );
    }

    let image = RawImage::try_from((frame.into_raw(), width, height))?;
    let sample = sampler::sample(&map, &image, &correction);

    match opts.format {
        OutputFormat::Text => {
            let mut sender = TextSender::new(stdout.lock());
            dmx::emit(&sample.colors, &layout, &mut sender);
            sender.finish()?;
        }
        OutputFormat::Json => {
            let frame = dmx::build_frame(&sample.colors, &layout, opts.frame_length)?;
            println!("{}", output::FrameReport::new(&sample, &frame).to_json()?);
        }
        OutputFormat::Ansi => {
            output::log_colors(&sample.colors);
            println!("{}", output::ansi_swatches(&sample.colors));
        }
    }

    Ok(())
}

fn install_tracing(opts: &Opts) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Channel values go to stdout
    let fmt_layer = fmt::layer().with_writer(io::stderr);

    let filter_layer = EnvFilter::try_from_env("CANVAS2DMX_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match opts.verbose {
            0 => "canvas2dmx=warn",
            1 => "canvas2dmx=info",
            2 => "canvas2dmx=debug",
            _ => "canvas2dmx=trace",
        })
    });

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
}

#[paw::main]
fn main(opts: Opts) -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    install_tracing(&opts)?;

    run(opts)
}
