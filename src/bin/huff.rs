use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Report, WrapErr};
use console::style;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod progress;
use progress::{fmt_ratio, fmt_size, ProgressMonitor};

#[derive(Parser)]
#[command(version, about = "Compress or decompress files with Huffman coding", long_about = None)]
struct Cli {
    /// Log more details, pass twice for even more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a payload and the dictionary needed to restore it
    Compress {
        input_file: PathBuf,
        /// Where to write the payload [default: INPUT_FILE.huff]
        #[arg(short, long)]
        output_file: Option<PathBuf>,
        /// Where to write the dictionary [default: OUTPUT_FILE.dict]
        #[arg(short, long)]
        dictionary_file: Option<PathBuf>,
    },
    /// Restore a file from a payload and its dictionary
    Decompress {
        input_file: PathBuf,
        /// Where to write the restored file [default: INPUT_FILE without .huff]
        #[arg(short, long)]
        output_file: Option<PathBuf>,
        /// Where to read the dictionary from [default: INPUT_FILE.dict]
        #[arg(short, long)]
        dictionary_file: Option<PathBuf>,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Compress {
            input_file,
            output_file,
            dictionary_file,
        } => {
            let output_file = output_file.unwrap_or_else(|| with_suffix(&input_file, "huff"));
            let dictionary_file =
                dictionary_file.unwrap_or_else(|| with_suffix(&output_file, "dict"));
            compress(&input_file, &output_file, &dictionary_file)?;
        }
        Commands::Decompress {
            input_file,
            output_file,
            dictionary_file,
        } => {
            let output_file = match output_file {
                Some(output_file) => output_file,
                None => strip_huff_extension(&input_file)?,
            };
            let dictionary_file =
                dictionary_file.unwrap_or_else(|| with_suffix(&input_file, "dict"));
            decompress(&input_file, &output_file, &dictionary_file)?;
        }
    }

    if !cli.quiet {
        eprintln!("{}", style("done").green().bold());
    }
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(level)
        .init();
}

fn compress(input: &Path, output: &Path, dictionary: &Path) -> color_eyre::Result<()> {
    info!("compressing {} into {}", input.display(), output.display());
    let data = read_file(input).wrap_err("Failed to open the input file")?;
    let compressed = ruhuff::compress(&data)
        .wrap_err_with(|| format!("Failed to compress {}", input.display()))?;

    for (symbol, code) in compressed.codes.iter() {
        debug!(
            "{:?} == {} | frequency == {}",
            symbol as char,
            code,
            compressed.frequencies.get(symbol)
        );
    }

    let payload_out = File::create(output).wrap_err("Failed to open the output file")?;
    let dictionary_out = match File::create(dictionary) {
        Ok(file) => file,
        Err(e) => {
            discard(&[output]);
            return Err(Report::new(e).wrap_err("Failed to open the dictionary file"));
        }
    };
    if let Err(e) = compressed.write_to(BufWriter::new(payload_out), BufWriter::new(dictionary_out))
    {
        discard(&[output, dictionary]);
        return Err(Report::new(e).wrap_err("Failed to write the compressed data"));
    }

    info!(
        "Number of bits before compression == {}",
        compressed.original_bits()
    );
    info!(
        "Number of bits after compression == {}",
        compressed.encoded_bits
    );
    info!(
        "{} -> {} payload + {} dictionary ({} of the input)",
        fmt_size(data.len() as u64),
        fmt_size(compressed.payload.len() as u64),
        fmt_size(compressed.dictionary.len() as u64),
        fmt_ratio(
            data.len(),
            compressed.payload.len() + compressed.dictionary.len()
        )
    );
    Ok(())
}

fn decompress(input: &Path, output: &Path, dictionary: &Path) -> color_eyre::Result<()> {
    info!("decompressing {} into {}", input.display(), output.display());
    let dictionary_bytes = read_file(dictionary).wrap_err("Failed to open the dictionary file")?;
    let payload = read_file(input).wrap_err("Failed to open the input file")?;
    let data = ruhuff::decompress(&payload, &dictionary_bytes)
        .wrap_err_with(|| format!("Failed to decompress {}", input.display()))?;

    if let Err(e) = fs::write(output, &data) {
        discard(&[output]);
        return Err(Report::new(e).wrap_err("Failed to write the output file"));
    }
    info!(
        "{} -> {}",
        fmt_size(payload.len() as u64),
        fmt_size(data.len() as u64)
    );
    Ok(())
}

fn read_file(path: &Path) -> color_eyre::Result<Vec<u8>> {
    let file = File::open(path).wrap_err_with(|| format!("Can't open {}", path.display()))?;
    let size = file.metadata()?.len();
    let mut monitor = ProgressMonitor::new(BufReader::new(file), size);
    let mut data = Vec::with_capacity(size as usize);
    monitor
        .read_to_end(&mut data)
        .wrap_err_with(|| format!("Can't read {}", path.display()))?;
    Ok(data)
}

/// Removes artifacts of a run that failed halfway
fn discard(paths: &[&Path]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("could not remove {}: {}", path.display(), e);
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn strip_huff_extension(input: &Path) -> color_eyre::Result<PathBuf> {
    match input.extension() {
        Some(extension) if extension == "huff" => Ok(input.with_extension("")),
        _ => bail!(
            "Can't derive an output file name from {}, pass one with --output-file",
            input.display()
        ),
    }
}
