use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use mediaprobe::{
    ffmpeg::{parse_timecode, Timecode},
    MediaDescriptor, Prober,
};
use rayon::{prelude::*, ThreadPoolBuilder};

#[derive(Parser)]
pub struct Cli {
    /// ffprobe program to run
    #[clap(long, global = true, default_value = "ffprobe")]
    pub ffprobe: PathBuf,
    #[command(subcommand)]
    pub subcommand: Commands,
}

#[derive(Parser)]
pub enum Commands {
    /// Probe files and print their descriptors
    #[clap(name = "show")]
    Show(ShowArgs),
    /// Resolve the duration of one stream
    #[clap(name = "duration")]
    Duration(DurationArgs),
    /// Convert a timecode to seconds
    #[clap(name = "timecode")]
    Timecode { text: String },
    /// Parse captured ffprobe JSON (`-` for stdin)
    #[clap(name = "decode")]
    Decode { json: PathBuf },
}

#[derive(Parser)]
pub struct ShowArgs {
    #[clap(required = true)]
    pub files: Vec<PathBuf>,
    /// Files probed concurrently; defaults to the number of CPUs
    #[clap(long)]
    pub jobs: Option<usize>,
}

#[derive(Parser)]
pub struct DurationArgs {
    pub file: PathBuf,
    /// Position of the stream in the probe output
    #[clap(long, default_value_t = 0)]
    pub stream: usize,
}

fn cmd_show(prober: &Prober, args: &ShowArgs) -> anyhow::Result<()> {
    let mut tp = ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        tp = tp.num_threads(jobs);
    }
    let tp = tp.build().context("Failed to create thread pool")?;

    info!("Probing {} files", args.files.len());
    let descriptors = tp.install(|| {
        args.files
            .par_iter()
            .map(|file| {
                prober
                    .probe(file)
                    .with_context(|| format!("Failed to probe {}", file.display()))
            })
            .collect::<Vec<_>>()
    });

    for descriptor in descriptors {
        println!("{}", descriptor?);
    }

    Ok(())
}

fn cmd_duration(prober: &Prober, args: &DurationArgs) -> anyhow::Result<()> {
    let descriptor = prober
        .probe(&args.file)
        .with_context(|| format!("Failed to probe {}", args.file.display()))?;
    let resolved = descriptor.resolve_stream_duration(args.stream);
    debug!("stream {}: {:?}", args.stream, resolved);

    if resolved.status.has_value() {
        println!(
            "{:.6}\t{}\t{}",
            resolved.seconds,
            Timecode::from_float_seconds(resolved.seconds),
            resolved.status
        );
    } else {
        println!("{:.6}\t{}", resolved.seconds, resolved.status);
    }

    Ok(())
}

fn cmd_decode(json: &Path) -> anyhow::Result<()> {
    let decoded = if json.as_os_str() == "-" {
        MediaDescriptor::from_reader(io::stdin().lock())
    } else {
        let file =
            File::open(json).with_context(|| format!("Failed to open {}", json.display()))?;
        MediaDescriptor::from_reader(io::BufReader::new(file))
    };
    let descriptor = decoded.with_context(|| format!("Failed to decode {}", json.display()))?;

    println!("{}", descriptor);

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let prober = Prober::with_program(&cli.ffprobe);
    match cli.subcommand {
        Commands::Show(ref args) => cmd_show(&prober, args),
        Commands::Duration(ref args) => cmd_duration(&prober, args),
        Commands::Timecode { ref text } => {
            println!("{}", parse_timecode(text));
            Ok(())
        }
        Commands::Decode { ref json } => cmd_decode(json),
    }
}
