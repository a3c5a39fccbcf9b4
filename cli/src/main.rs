//! pagexml CLI - PAGE layout XML inspection tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use pagexml::{import_file_with_options, IdCounter, ImportOptions, ImportedPage, JsonFormat};

#[derive(Parser)]
#[command(name = "pagexml")]
#[command(version)]
#[command(about = "Inspect PAGE layout XML: regions, masks and polygon matching", long_about = None)]
struct Cli {
    /// Skip invalid regions instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document information
    Info {
        /// Input PAGE file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Export regions and metadata as JSON
    Regions {
        /// Input PAGE file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Render the region mask as a PNG
    Mask {
        /// Input PAGE file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Mask width (page width if not specified)
        #[arg(long)]
        width: Option<u32>,

        /// Mask height (page height if not specified)
        #[arg(long)]
        height: Option<u32>,

        /// Pixel value written for region pixels
        #[arg(long, default_value = "255")]
        scale: u8,
    },

    /// Find the region matching a polygon
    Match {
        /// Input PAGE file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Polygon in PAGE points notation ("x1,y1 x2,y2 ...")
        #[arg(short, long)]
        coords: String,
    },

    /// Print sequential region and line ids
    Ids {
        /// Number of region ids
        #[arg(long, default_value = "1")]
        regions: u32,

        /// Number of line ids per region
        #[arg(long, default_value = "0")]
        lines: u32,

        /// Region counter value to continue from
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        start_region: i64,

        /// Line counter value to continue from
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        start_line: i64,
    },

    /// Write the imported document back as XML
    Export {
        /// Input PAGE file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = if cli.lenient {
        ImportOptions::new().lenient()
    } else {
        ImportOptions::new()
    };

    let result = match cli.command {
        Commands::Info { input } => cmd_info(&input, options),
        Commands::Regions {
            input,
            output,
            compact,
        } => cmd_regions(&input, output.as_deref(), compact, options),
        Commands::Mask {
            input,
            output,
            width,
            height,
            scale,
        } => cmd_mask(&input, &output, width, height, scale, options),
        Commands::Match { input, coords } => cmd_match(&input, &coords, options),
        Commands::Ids {
            regions,
            lines,
            start_region,
            start_line,
        } => {
            cmd_ids(regions, lines, start_region, start_line);
            Ok(())
        }
        Commands::Export { input, output } => cmd_export(&input, output.as_deref(), options),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load(input: &Path, options: ImportOptions) -> Result<ImportedPage, Box<dyn std::error::Error>> {
    log::debug!("Importing {}", input.display());
    Ok(import_file_with_options(input, options)?)
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_info(input: &Path, options: ImportOptions) -> Result<(), Box<dyn std::error::Error>> {
    let page = load(input, options)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), page.format());
    println!("{}: {} x {}", "Size".bold(), page.width(), page.height());
    println!("{}: {}", "Regions".bold(), page.region_count());

    let metadata = page.metadata();
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref last_change) = metadata.last_change {
        println!("{}: {}", "Last change".bold(), last_change);
    }

    println!();
    println!("{}", "Regions".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for region in page.regions() {
        let kind = if region.region_type.is_empty() {
            "-"
        } else {
            region.region_type.as_str()
        };
        let marker = if region.has_text() { "text" } else { "" };
        println!(
            "{} {} {} {}",
            region.id.bold(),
            kind,
            format!("({} points)", region.polygon.len()).dimmed(),
            marker.dimmed()
        );
    }

    Ok(())
}

fn cmd_regions(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    options: ImportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load(input, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = pagexml::render::to_json(&page, format)?;
    write_or_print(output, &json)
}

fn cmd_mask(
    input: &Path,
    output: &Path,
    width: Option<u32>,
    height: Option<u32>,
    scale: u8,
    options: ImportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load(input, options)?;
    let width = width.unwrap_or(page.width());
    let height = height.unwrap_or(page.height());

    let mut mask = page.all_regions_mask_image(width, height);
    for pixel in mask.pixels_mut() {
        pixel[0] = pixel[0].saturating_mul(scale);
    }
    mask.save(output)?;

    println!(
        "{} {} ({} x {})",
        "Saved to".green(),
        output.display(),
        width,
        height
    );
    Ok(())
}

fn cmd_match(
    input: &Path,
    coords: &str,
    options: ImportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load(input, options)?;

    match page.find_matching_region(coords)? {
        Some(region) => println!("{}", region.id),
        None => println!("{}", "no match".yellow()),
    }
    Ok(())
}

fn cmd_ids(regions: u32, lines: u32, start_region: i64, start_line: i64) {
    let mut ids = IdCounter::with_start(start_region, start_line);

    for _ in 0..regions {
        println!("{}", ids.next_region_id());
        for _ in 0..lines {
            println!("  {}", ids.next_line_id());
        }
    }
}

fn cmd_export(
    input: &Path,
    output: Option<&Path>,
    options: ImportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load(input, options)?;
    let xml = pagexml::render::to_xml(&page)?;
    write_or_print(output, &xml)
}

fn cmd_version() {
    println!("{} {}", "pagexml".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PAGE layout XML inspection tool");
    println!();
    println!("License: MIT");
}
