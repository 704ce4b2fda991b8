use clap::{Parser, Subcommand};
use responsive_gal::config::{self, ResizerConfig};
use responsive_gal::locator::check_store_key;
use responsive_gal::output::{self, BucketHeading};
use responsive_gal::sizing::{BucketRange, ResizeConfig, bucket_sizes};
use responsive_gal::store::{LocalStore, RustBackend};
use responsive_gal::{plan, types::Viewport};
use std::path::PathBuf;

/// Layout flags shared by commands that size one group of images.
///
/// Either name a configured attachment, give both values explicitly, or
/// combine them (explicit flags win).
#[derive(clap::Args, Clone)]
struct LayoutArgs {
    /// Take the layout from this `[[attachments]]` entry
    #[arg(long)]
    attachment: Option<String>,

    /// Image aspect ratio as width / height (1.33 for 4:3)
    #[arg(long)]
    aspect_ratio: Option<f64>,

    /// Fraction of the viewport width the image occupies
    #[arg(long)]
    real_estate: Option<f64>,
}

/// Viewport range overrides shared by `buckets` and `render`.
#[derive(clap::Args, Clone)]
struct RangeArgs {
    /// Widest logical viewport, up to 16384 (default from config)
    #[arg(long)]
    max_viewport: Option<f64>,

    /// Densest pixel ratio, 1 to 8 (default from config)
    #[arg(long)]
    max_pixel_ratio: Option<f64>,
}

#[derive(Parser)]
#[command(name = "responsive-gal")]
#[command(about = "Pick grid-snapped image resolutions for a viewport")]
#[command(long_about = "\
Pick grid-snapped image resolutions for a viewport

Image locators end in a _WIDTHxHEIGHT suffix naming the resolution to fetch:

  https://cdn.example/photo_640x480

The requested width is ceil(viewport × pixel ratio × real estate / 300) × 320,
and the height follows from the aspect ratio. A locator is only rewritten when
that width moves to a different bucket.

'responsive-gal render' fills an image store with the KEY_WxH renditions a
layout can ask for, so none has to be rendered on the first request.

Run 'responsive-gal gen-config' to generate a documented responsive-gal.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding responsive-gal.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show what an attachment would do to one locator
    Plan {
        /// Locator ending in _WIDTHxHEIGHT
        #[arg(long)]
        locator: String,
        /// Logical viewport width in CSS pixels
        #[arg(long)]
        viewport_width: f64,
        /// Device pixel ratio (omit for a standard-density display)
        #[arg(long)]
        pixel_ratio: Option<f64>,
        #[command(flatten)]
        layout: LayoutArgs,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every resolution a layout can request, for pre-rendering
    Buckets {
        #[command(flatten)]
        layout: LayoutArgs,
        #[command(flatten)]
        range: RangeArgs,
        /// Store key to show rendition keys for
        #[arg(long)]
        key: Option<String>,
        /// Print the sizes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render every missing KEY_WxH rendition of one stored image
    Render {
        /// Store key of the source image
        #[arg(long)]
        key: String,
        /// Directory holding the source image
        #[arg(long)]
        source_dir: PathBuf,
        /// Directory to write renditions to (default: next to the source)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[command(flatten)]
        layout: LayoutArgs,
        #[command(flatten)]
        range: RangeArgs,
        /// JPEG quality (default from config)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,
        /// Center-crop to each rendition's aspect ratio
        #[arg(long)]
        crop: bool,
        /// Re-render renditions that already exist
        #[arg(long)]
        force: bool,
        /// Print the renditions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate responsive-gal.toml and list its attachments
    Check,
    /// Print a stock responsive-gal.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Plan {
            locator,
            viewport_width,
            pixel_ratio,
            layout,
            json,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let resize = resolve_layout(&config, &layout)?;
            let viewport = Viewport {
                width: viewport_width,
                pixel_ratio,
            };
            let plan = plan::plan(
                config.grid,
                &locator,
                viewport,
                resize.aspect_ratio(),
                resize.width_real_estate(),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                output::print_plan(&plan);
            }
        }
        Command::Buckets {
            layout,
            range,
            key,
            json,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let resize = resolve_layout(&config, &layout)?;
            if let Some(key) = &key {
                check_store_key(key)?;
            }
            let range = resolve_range(&config, &range)?;
            let heading = BucketHeading {
                aspect_ratio: resize.aspect_ratio(),
                width_real_estate: resize.width_real_estate(),
                max_viewport_width: range.max_viewport_width(),
                max_pixel_ratio: range.max_pixel_ratio(),
            };
            let sizes = bucket_sizes(&config.grid, &resize, &range)?;
            log::debug!("{} buckets for {:?}", sizes.len(), layout.attachment);
            if json {
                println!("{}", serde_json::to_string_pretty(&sizes)?);
            } else {
                output::print_buckets(&heading, &sizes, key.as_deref());
            }
        }
        Command::Render {
            key,
            source_dir,
            out_dir,
            layout,
            range,
            quality,
            crop,
            force,
            json,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let resize = resolve_layout(&config, &layout)?;
            let range = resolve_range(&config, &range)?;
            let sizes = bucket_sizes(&config.grid, &resize, &range)?;

            let mut render = config.render.clone();
            if let Some(quality) = quality {
                render.quality = quality;
            }
            render.crop |= crop;

            let mut store = LocalStore::new(&source_dir).with_render_config(render);
            if let Some(out_dir) = &out_dir {
                std::fs::create_dir_all(out_dir)?;
                store = store.with_thumbnail_dir(out_dir);
            }
            log::info!(
                "Rendering {} sizes of {} from {}",
                sizes.len(),
                key,
                store.root().display()
            );
            let renditions = store.render_missing(&RustBackend::new(), &key, &sizes, force)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&renditions)?);
            } else {
                output::print_renditions(&key, &renditions);
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.config_dir.join(config::CONFIG_FILE).display());
            let config = config::load_config(&cli.config_dir)?;
            output::print_config(&config);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Config bucket range with flag overrides, held to the same bounds.
fn resolve_range(
    config: &ResizerConfig,
    range: &RangeArgs,
) -> Result<BucketRange, Box<dyn std::error::Error>> {
    Ok(config
        .buckets
        .range(range.max_viewport, range.max_pixel_ratio)?)
}

/// Combine a named attachment's layout with explicit flag overrides.
fn resolve_layout(
    config: &ResizerConfig,
    layout: &LayoutArgs,
) -> Result<ResizeConfig, Box<dyn std::error::Error>> {
    let named = match &layout.attachment {
        Some(name) => Some(
            config
                .attachment(name)
                .ok_or_else(|| format!("no attachment named {name:?} in config"))?,
        ),
        None => None,
    };
    let aspect_ratio = layout
        .aspect_ratio
        .or(named.map(|a| a.aspect_ratio))
        .ok_or("--aspect-ratio or --attachment is required")?;
    let width_real_estate = layout
        .real_estate
        .or(named.map(|a| a.width_real_estate))
        .ok_or("--real-estate or --attachment is required")?;
    Ok(ResizeConfig::new(aspect_ratio, width_real_estate)?)
}
