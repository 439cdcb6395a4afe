use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

#[allow(unused_imports)]
use log::{debug, info, warn, error};

use spritepack::build_info::BuildInfo;
use spritepack::config::MAX_PIXEL_RATIO;
use spritepack::logging::setup_logger;
use spritepack::{Config, Mode, PackSettings, PackerKind};

/// Generate sprite sheets for maps and the web using SVG files as input
#[derive(Parser, Debug)]
#[command(name = "spritepack", version, long_version = BuildInfo::display_version())]
struct Args {
    /// Output path prefix; writes <prefix>.png and <prefix>.json
    #[arg(required_unless_present = "write_settings")]
    output_prefix: Option<PathBuf>,

    /// Directory containing the *.svg icons
    #[arg(required_unless_present = "write_settings")]
    icons_dir: Option<PathBuf>,

    /// Render at the retina pixel ratio (2 unless overridden in settings)
    #[arg(long)]
    retina: bool,

    /// Explicit pixel ratio, overrides --retina
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_PIXEL_RATIO as i64))]
    pixel_ratio: Option<u32>,

    /// Keep the layout from the existing <prefix>.json and only rewrite the image
    #[arg(long)]
    reuse: bool,

    /// Packing heuristic: guillotine or shelf
    #[arg(long)]
    packer: Option<PackerKind>,

    /// Settings file (defaults to the per-user config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Run on a single thread
    #[arg(long)]
    sequential: bool,

    /// Write a commented settings file with the current values and exit
    #[arg(long, value_name = "PATH")]
    write_settings: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn log_level(&self) -> Option<LevelFilter> {
        match (self.quiet, self.verbose) {
            (true, _) => Some(LevelFilter::Warn),
            (false, 0) => None,
            (false, 1) => Some(LevelFilter::Debug),
            (false, _) => Some(LevelFilter::Trace),
        }
    }

    fn config(&self, settings: &PackSettings) -> Config {
        let mut config = Config::from_settings(settings);
        if let Some(packer) = self.packer {
            config.packer = packer;
        }
        if self.retina {
            config.pixel_ratio = settings.retina_pixel_ratio.clamp(1, MAX_PIXEL_RATIO);
        }
        if let Some(ratio) = self.pixel_ratio {
            config.pixel_ratio = ratio;
        }
        if self.sequential {
            config.parallel = false;
        }
        config
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let settings = PackSettings::load(args.settings.as_deref());

    if let Some(path) = &args.write_settings {
        settings.save(path).context("writing settings file")?;
        return Ok(());
    }

    let (Some(output_prefix), Some(icons_dir)) = (&args.output_prefix, &args.icons_dir) else {
        anyhow::bail!("OUTPUT_PREFIX and ICONS_DIR are required");
    };

    let config = args.config(&settings);
    debug!("Config: {:?}", config);

    let mode = if args.reuse { Mode::Reuse } else { Mode::FullPack };
    spritepack::run(&config, icons_dir, output_prefix, mode)
        .with_context(|| format!("building sprite from {}", icons_dir.display()))?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logger(args.log_level());
    debug!("spritepack {}", BuildInfo::display_version());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
