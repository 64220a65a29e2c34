use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use amplicon_demux::pipeline::{
    run_demux, run_tally, DemuxConfig, TallyConfig, DEFAULT_ID_FORMAT, DEFAULT_PROGRESS_INTERVAL,
};
use amplicon_demux::{BarcodeTransform, InputFormat, Normalization, OutputFormat};

#[derive(Parser)]
#[command(name = "amplicon-demux")]
#[command(about = "Demultiplex paired reads by barcode read and tally cluster assignments")]
struct Cli {
    #[arg(short = 'v', long, global = true, default_value = "false", help = "Verbose output showing progress")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a pooled run into relabeled per-sample read pairs
    Demux {
        #[arg(short = 'b', long, help = "Barcode file (name,sequence per line, no header)")]
        barcodes: PathBuf,

        #[arg(short = '1', long, help = "Left read file")]
        left: PathBuf,

        #[arg(short = 'i', long, help = "Barcode (index) read file")]
        index: PathBuf,

        #[arg(short = '2', long, help = "Right read file")]
        right: PathBuf,

        #[arg(short = 'o', long, help = "Output file for matched pairs (.gz to compress)")]
        output: PathBuf,

        #[arg(long, help = "Write right reads here instead of interleaving them")]
        right_output: Option<PathBuf>,

        #[arg(long, help = "Write unmatched pairs here")]
        unmatched_output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = InputFormat::Fastq, help = "Input read format")]
        input_format: InputFormat,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Fastq, help = "Output read format")]
        output_format: OutputFormat,

        #[arg(long, default_value = DEFAULT_ID_FORMAT, help = "Record id template ({sampleId}, {index}, {label}, {barcodeSeq})")]
        id_format: String,

        #[arg(long, help = "Value substituted for {label} in the id template")]
        label: Option<String>,

        #[arg(short = 'r', long, default_value = "false", help = "Reverse barcodes from the barcode file")]
        reverse: bool,

        #[arg(short = 'c', long, default_value = "false", help = "Complement barcodes from the barcode file")]
        complement: bool,

        #[arg(short = 't', long, default_value = "identity", value_parser = parse_transform, help = "Barcode read preprocessing: identity, truncate:N or slice:START:END")]
        barcode_transform: BarcodeTransform,

        #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL, help = "Log progress every N matched pairs (0 disables)")]
        progress_interval: u64,
    },
    /// Count classification records per sample and cluster into a CSV table
    Tally {
        #[arg(short = 'i', long, help = "Clustering tool output (.uc)")]
        input: PathBuf,

        #[arg(short = 'o', long, help = "Output CSV")]
        output: PathBuf,
    },
}

fn parse_transform(s: &str) -> std::result::Result<BarcodeTransform, String> {
    s.parse().map_err(|e: amplicon_demux::Error| e.to_string())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Demux {
            barcodes,
            left,
            index,
            right,
            output,
            right_output,
            unmatched_output,
            input_format,
            output_format,
            id_format,
            label,
            reverse,
            complement,
            barcode_transform,
            progress_interval,
        } => {
            let mut config = DemuxConfig::new(barcodes, left, index, right, output);
            config.right_output = right_output;
            config.unmatched_output = unmatched_output;
            config.input_format = input_format;
            config.output_format = output_format;
            config.id_format = id_format;
            config.label = label;
            config.normalization = Normalization::new(reverse, complement);
            config.transform = barcode_transform;
            config.progress_interval = progress_interval;

            let stats = run_demux(&config)
                .with_context(|| format!("demultiplexing into {} failed", config.output.display()))?;

            println!("Processing complete!");
            println!("Matched read pairs: {}", stats.matched);
            println!("Skipped read pairs: {}", stats.skipped);
            println!("Output file: {}", config.output.display());
        }
        Commands::Tally { input, output } => {
            let config = TallyConfig { input, output };
            let summary = run_tally(&config)
                .with_context(|| format!("tallying {} failed", config.input.display()))?;

            println!("Processing complete!");
            println!("Records: {}", summary.records);
            println!("Samples: {}", summary.samples);
            println!("Clusters: {}", summary.clusters);
            println!("Output file: {}", config.output.display());
        }
    }

    Ok(())
}
