use clap::{Parser, Subcommand};
use rasterkit::batch::{self, BatchJob};
use rasterkit::config::{self, CONFIG_FILENAME, EngineConfig};
use rasterkit::imaging::{Color, Dimension, ImageDocument, ImageFormat, ResizeFlags};
use rasterkit::output::{self, ImageInfo};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// How a resize maps the source onto the requested box.
#[derive(clap::Args, Clone)]
struct ResizeArgs {
    /// Fit inside the box, keeping the aspect ratio (default)
    #[arg(long, group = "mode")]
    fit: bool,
    /// Fill the box, possibly overflowing one side
    #[arg(long, group = "mode")]
    fill: bool,
    /// Ignore aspect ratio and hit both sides exactly
    #[arg(long, group = "mode")]
    stretch: bool,
    /// Fill the box then center-crop to exactly its size
    #[arg(long, group = "mode")]
    exact: bool,
    /// Never enlarge the source
    #[arg(long)]
    shrink_only: bool,
    /// Sharpen after resizing
    #[arg(long)]
    sharpen: bool,
}

impl ResizeArgs {
    fn flags(&self) -> ResizeFlags {
        let mut flags = if self.fit {
            ResizeFlags::FIT
        } else if self.fill {
            ResizeFlags::FILL
        } else if self.stretch {
            ResizeFlags::STRETCH
        } else if self.exact {
            ResizeFlags::EXACT
        } else {
            ResizeFlags::FIT
        };
        if self.shrink_only {
            flags |= ResizeFlags::SHRINK_ONLY;
        }
        flags
    }
}

#[derive(Parser)]
#[command(name = "rasterkit")]
#[command(about = "Resize, crop, composite and convert raster images")]
#[command(long_about = "\
Resize, crop, composite and convert raster images

Supported formats: JPEG, PNG, GIF, WEBP, BMP. Input format is detected from
the file content; output format comes from the output file extension.

Lengths accept pixels (400), percentages (50%) and, for resize, negative
values which mirror the result on that axis (-400).

Run 'rasterkit gen-config' to generate a documented rasterkit.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show format and size of image files
    Identify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print a JSON array instead of text
        #[arg(long)]
        json: bool,
    },
    /// Resize an image
    Resize {
        input: PathBuf,
        output: PathBuf,
        #[arg(allow_hyphen_values = true)]
        width: Dimension,
        #[arg(allow_hyphen_values = true)]
        height: Dimension,
        #[command(flatten)]
        mode: ResizeArgs,
        /// Encode quality (format default when omitted)
        #[arg(long)]
        quality: Option<u8>,
    },
    /// Cut a rectangle out of an image
    Crop {
        input: PathBuf,
        output: PathBuf,
        #[arg(allow_hyphen_values = true)]
        left: Dimension,
        #[arg(allow_hyphen_values = true)]
        top: Dimension,
        width: Dimension,
        height: Dimension,
        #[arg(long)]
        quality: Option<u8>,
    },
    /// Place one image on top of another
    Place {
        base: PathBuf,
        overlay: PathBuf,
        output: PathBuf,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        left: Dimension,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        top: Dimension,
        /// 0 (invisible) to 100 (copied verbatim)
        #[arg(long, default_value_t = 100)]
        opacity: i32,
        #[arg(long)]
        quality: Option<u8>,
    },
    /// Re-encode an image in the format of the output extension
    Convert {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        quality: Option<u8>,
    },
    /// Write a blank canvas
    Blank {
        output: PathBuf,
        width: u32,
        height: u32,
        /// Fill color as r,g,b or r,g,b,alpha (alpha 0 opaque .. 127 transparent)
        #[arg(long)]
        color: Option<Color>,
    },
    /// Resize every image under a directory in parallel
    Batch {
        input_dir: PathBuf,
        output_dir: PathBuf,
        #[arg(allow_hyphen_values = true)]
        width: Dimension,
        #[arg(allow_hyphen_values = true)]
        height: Dimension,
        #[command(flatten)]
        mode: ResizeArgs,
        /// Output format extension (keeps each file's format when omitted)
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        quality: Option<u8>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock rasterkit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let load = || config::load_config(&cli.config);

    match cli.command {
        Command::Identify { files, json } => {
            let config = load()?;
            let limits = config.decode_limits();
            let results: Vec<(PathBuf, Result<ImageInfo, String>)> = files
                .into_iter()
                .map(|path| {
                    let info = ImageDocument::from_path_with_limits(&path, &limits)
                        .map(|(doc, format)| ImageInfo::new(&path, format, &doc))
                        .map_err(|e| e.to_string());
                    (path, info)
                })
                .collect();
            if json {
                let infos: Vec<&ImageInfo> =
                    results.iter().filter_map(|(_, r)| r.as_ref().ok()).collect();
                println!("{}", serde_json::to_string_pretty(&infos)?);
            } else {
                output::print_identify(&results);
            }
        }
        Command::Resize {
            input,
            output,
            width,
            height,
            mode,
            quality,
        } => {
            let config = load()?;
            let mut doc = open(&input, &config)?;
            doc.resize(width, height, mode.flags())?;
            if mode.sharpen {
                doc.sharpen();
            }
            doc.save(&output, quality, None)?;
            output::print_written(Some(&input), &output, &doc);
        }
        Command::Crop {
            input,
            output,
            left,
            top,
            width,
            height,
            quality,
        } => {
            let config = load()?;
            let mut doc = open(&input, &config)?;
            doc.crop(left, top, width, height)?;
            doc.save(&output, quality, None)?;
            output::print_written(Some(&input), &output, &doc);
        }
        Command::Place {
            base,
            overlay,
            output,
            left,
            top,
            opacity,
            quality,
        } => {
            let config = load()?;
            let mut doc = open(&base, &config)?;
            let top_doc = open(&overlay, &config)?;
            doc.place(&top_doc, left, top, opacity)?;
            doc.save(&output, quality, None)?;
            output::print_written(Some(&base), &output, &doc);
        }
        Command::Convert {
            input,
            output,
            quality,
        } => {
            let config = load()?;
            let doc = open(&input, &config)?;
            doc.save(&output, quality, None)?;
            output::print_written(Some(&input), &output, &doc);
        }
        Command::Blank {
            output,
            width,
            height,
            color,
        } => {
            let config = load()?;
            let doc = ImageDocument::blank(width, height, color)?
                .with_encode_options(config.encode_options());
            doc.save(&output, None, None)?;
            output::print_written(None, &output, &doc);
        }
        Command::Batch {
            input_dir,
            output_dir,
            width,
            height,
            mode,
            format,
            quality,
            json,
        } => {
            let config = load()?;
            let format = format
                .as_deref()
                .map(ImageFormat::from_extension)
                .transpose()?;
            let job = BatchJob {
                input_dir,
                output_dir,
                width,
                height,
                flags: mode.flags(),
                sharpen: mode.sharpen,
                format,
                quality,
            };
            let report = batch::run(&job, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_batch_report(&report, &job.input_dir);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Decode `path` with the configured limits and default qualities.
fn open(path: &Path, config: &EngineConfig) -> Result<ImageDocument, Box<dyn std::error::Error>> {
    let (doc, format) = ImageDocument::from_path_with_limits(path, &config.decode_limits())?;
    tracing::info!(path = %path.display(), %format, width = doc.width(), height = doc.height(), "opened");
    Ok(doc.with_encode_options(config.encode_options()))
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
