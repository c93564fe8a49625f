use clap::{Parser, Subcommand};
use lighttable::batch::{self, ThumbnailJob};
use lighttable::output::{self, ImageInfo};
use lighttable::{Format, ImagingError, Lighttable, config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lighttable")]
#[command(about = "Decode, orient, resize and thumbnail images")]
#[command(long_about = "\
Decode, orient, resize and thumbnail images

Images are turned upright from their EXIF orientation when opened, so every
size reported or written is the size as it should be displayed.

Formats:
  read     PNG, JPEG, TIFF, WebP (sniffed from content, not the extension)
  write    PNG, JPEG, TIFF, WebP (lossless), AVIF (chosen by extension)

Examples:
  lighttable thumbnail photos/                  # photos/**/x.jpg → x_thumb.jpg
  lighttable thumbnail --size 256 --square -o thumbs --format webp photos/
  lighttable resize in.png out.jpg --width 800 --height 600
  lighttable identify --json photos/dawn.jpg

Run 'lighttable gen-config' to generate a documented lighttable.toml.")]
#[command(version)]
struct Cli {
    /// Config file (stock defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log decode, orientation and encode steps
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a thumbnail next to (or under --output) every image
    Thumbnail {
        /// Longer edge of each thumbnail, in pixels
        #[arg(long, default_value_t = 100)]
        size: u32,

        /// Crop to a centered square first
        #[arg(long)]
        square: bool,

        /// Directory for thumbnails
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format extension (png, jpg, tif, webp, avif)
        #[arg(long, value_parser = parse_format)]
        format: Option<Format>,

        /// Image files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Resize one image to exact dimensions
    Resize {
        input: PathBuf,
        /// Destination; the extension selects the format
        output: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        width: f64,
        #[arg(long, allow_negative_numbers = true)]
        height: f64,
    },
    /// Print format and upright dimensions
    Identify {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print a stock lighttable.toml with all options documented
    GenConfig,
}

fn parse_format(value: &str) -> Result<Format, String> {
    Format::from_target(value).map_err(|e| e.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = config::load_config(cli.config.as_deref())?;
    let lighttable = Lighttable::new(&config);

    match cli.command {
        Command::Thumbnail {
            size,
            square,
            output,
            format,
            paths,
        } => {
            init_thread_pool(&config.processing);
            let job = ThumbnailJob {
                size,
                square,
                output_dir: output,
                format,
            };
            let files = batch::collect_inputs(&paths);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    let line = output::format_batch_event(&event);
                    if event.is_failure() {
                        eprintln!("{}", line);
                    } else {
                        println!("{}", line);
                    }
                }
            });
            let summary = batch::thumbnail_all(&lighttable, &files, &job, Some(tx))?;
            printer
                .join()
                .map_err(|_| "output thread panicked".to_string())?;
            output::print_batch_summary(&summary);
            if summary.failed > 0 {
                std::process::exit(1);
            }
        }
        Command::Resize {
            input,
            output,
            width,
            height,
        } => {
            let dims = lighttable.with_image(&input, |img| {
                img.resize(width, height, |resized| {
                    resized.save(&output)?;
                    Ok::<_, ImagingError>(resized.dimensions())
                })
            })?;
            println!(
                "{} → {} ({}x{})",
                input.display(),
                output.display(),
                dims.0,
                dims.1
            );
        }
        Command::Identify { json, paths } => {
            let mut infos = Vec::new();
            let mut failed = false;
            for path in &paths {
                match lighttable.with_image(path, |img| {
                    Ok::<_, ImagingError>(ImageInfo::new(path, img))
                }) {
                    Ok(info) => infos.push(info),
                    Err(e) => {
                        eprintln!("{}: {e}", path.display());
                        failed = true;
                    }
                }
            }
            if json {
                println!("{}", output::format_identify_json(&infos)?);
            } else {
                output::print_identify(&infos);
            }
            if failed {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
