use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use skyray::config::Config;
use skyray::random;
use skyray::render::Renderer;

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    args.apply_to(&mut config);
    config.validate().context("invalid render parameters")?;

    let world = config.build_world();
    let camera = config.camera();
    let settings = config.render_settings();
    let mut rng = random::sampler(config.seed);
    match config.seed {
        Some(seed) => info!("Random seed: {}", seed),
        None => info!("Random seed: from entropy"),
    }

    let renderer = Renderer::new(settings, &camera, &world).with_progress(!args.quiet);

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    renderer.render(BufWriter::new(out), &mut rng)?;

    if let Some(path) = &args.output {
        info!("Image saved as {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logger(args.debug_level.into());

    info!("skyray - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
