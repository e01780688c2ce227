//! carrier-stego - hide files inside images, PDFs and DOCX documents.

use anyhow::Context;
use carrier_stego::codec::ImageReport;
use carrier_stego::{
    DocxHiddenRunCodec, EmbedReport, ErrorKind, ExtractReport, PayloadCodec, PdfMetadataCodec,
    PixelNibbleCodec, StegoConfig,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit status when the carrier holds nothing.
const EXIT_NOT_FOUND: i32 = 3;

#[derive(Parser)]
#[command(name = "carrier-stego")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Hide files inside images, PDFs and DOCX documents",
    long_about = "Hides a grayscale image in the low nibble of a cover image, or any file as base64 in PDF metadata or a hidden DOCX run, and recovers it."
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a secret image inside a cover image
    ImageHide {
        /// Cover image
        cover: PathBuf,

        /// Secret image (converted to grayscale, resized to the cover)
        secret: PathBuf,

        /// Encoded image to write (use a lossless format such as .png)
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Recover the secret image from an encoded image
    ImageExtract {
        /// Encoded image
        encoded: PathBuf,

        /// Recovered grayscale image to write
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Hide a file inside a PDF's metadata
    PdfHide {
        /// File to hide
        payload: PathBuf,

        /// Base PDF whose pages are carried over
        base: PathBuf,

        /// PDF to write
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Recover a file hidden in a PDF's metadata
    PdfExtract {
        /// PDF holding the payload
        carrier: PathBuf,

        /// Recovered file to write
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Hide a file inside a hidden DOCX text run
    DocxHide {
        /// File to hide
        payload: PathBuf,

        /// Base DOCX document
        base: PathBuf,

        /// DOCX to write
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Recover a file hidden in a DOCX document
    DocxExtract {
        /// DOCX holding the payload
        carrier: PathBuf,

        /// Recovered file to write
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Print the effective configuration as JSON
    ShowConfig,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        let code = match e.downcast_ref::<carrier_stego::Error>() {
            Some(err) => {
                eprintln!("Error [{}]: {:#}", err.kind(), e);
                if err.kind() == ErrorKind::PayloadNotFound {
                    EXIT_NOT_FOUND
                } else {
                    1
                }
            }
            None => {
                eprintln!("Error: {:#}", e);
                1
            }
        };
        std::process::exit(code);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => StegoConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => StegoConfig::default(),
    };

    match cli.command {
        Commands::ImageHide {
            cover,
            secret,
            output,
        } => cmd_image_hide(&config, &cover, &secret, &output),

        Commands::ImageExtract { encoded, output } => cmd_image_extract(&config, &encoded, &output),

        Commands::PdfHide {
            payload,
            base,
            output,
        } => cmd_hide(&PdfMetadataCodec::new(&config), &payload, &base, &output),

        Commands::PdfExtract { carrier, output } => {
            cmd_extract(&PdfMetadataCodec::new(&config), &carrier, &output)
        }

        Commands::DocxHide {
            payload,
            base,
            output,
        } => cmd_hide(&DocxHiddenRunCodec::new(), &payload, &base, &output),

        Commands::DocxExtract { carrier, output } => {
            cmd_extract(&DocxHiddenRunCodec::new(), &carrier, &output)
        }

        Commands::ShowConfig => cmd_show_config(&config),
    }
}

fn cmd_image_hide(
    config: &StegoConfig,
    cover: &Path,
    secret: &Path,
    output: &Path,
) -> anyhow::Result<()> {
    let report = PixelNibbleCodec::new(config).embed_to_file(cover, secret, output)?;

    println!("Secret image hidden successfully!");
    print_image_report(&report);
    Ok(())
}

fn cmd_image_extract(config: &StegoConfig, encoded: &Path, output: &Path) -> anyhow::Result<()> {
    let report = PixelNibbleCodec::new(config).extract_to_file(encoded, output)?;

    println!("Secret image extracted successfully!");
    print_image_report(&report);
    Ok(())
}

fn print_image_report(report: &ImageReport) {
    println!("  Output:      {}", report.output.display());
    println!("  Dimensions:  {}x{}", report.width, report.height);
    println!("  Format:      {:?}", report.format);
}

fn cmd_hide(
    codec: &dyn PayloadCodec,
    payload: &Path,
    base: &Path,
    output: &Path,
) -> anyhow::Result<()> {
    let report: EmbedReport = codec.embed(payload, base, output)?;

    println!("Payload hidden successfully!");
    println!("  Carrier:     {} ({})", report.output.display(), report.format);
    println!("  Payload:     {} bytes", report.payload_len);
    println!("  Size:        {} bytes", report.carrier_len);
    println!("  SHA-256:     {}", report.digest);
    Ok(())
}

fn cmd_extract(codec: &dyn PayloadCodec, carrier: &Path, output: &Path) -> anyhow::Result<()> {
    let report: ExtractReport = codec.extract_to(carrier, output)?;

    println!("Payload extracted successfully!");
    println!("  Output:      {}", report.output.display());
    println!("  Payload:     {} bytes", report.payload_len);
    println!("  SHA-256:     {}", report.digest);
    Ok(())
}

fn cmd_show_config(config: &StegoConfig) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
