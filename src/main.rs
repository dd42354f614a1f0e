//! Scires CLI - Command-line tool for Sierra SCI game resources.
//!
//! This is the main entry point for the scires command-line application.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use scires::audio::read_voice_requests;
use scires::prelude::*;
use scires::vocab::{read_vocab_csv, write_vocab_csv, VocabRow};

/// Scires - Sierra SCI resource tool
#[derive(Parser)]
#[command(name = "scires")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a parser vocabulary to CSV
    VocabExport {
        /// Vocabulary resource (vocab.000 or vocab.900)
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Vocabulary layout
        #[arg(long, value_enum, default_value_t = FormatArg::Old)]
        format: FormatArg,

        /// Override the number of 16-bit pointer slots to skip
        #[arg(long)]
        pointer_slots: Option<usize>,

        /// Code page of new-format text
        #[arg(long, env = "SCIRES_CODE_PAGE", default_value = "windows-1255")]
        code_page: String,
    },

    /// Build a new-format vocabulary from CSV
    VocabImport {
        /// Input CSV file with the columns "words, class, group"
        #[arg(short, long)]
        input: PathBuf,

        /// Output vocabulary resource
        #[arg(short, long)]
        output: PathBuf,

        /// Code page of the encoded text
        #[arg(long, env = "SCIRES_CODE_PAGE", default_value = "windows-1255")]
        code_page: String,
    },

    /// Extract message voices listed in a CSV file
    VoiceExport {
        /// CSV file with the columns "room, noun, verb, cond, seq"
        csv_file: PathBuf,

        /// Directory holding RESOURCE.AUD and the room maps
        #[arg(long, env = "SCIRES_GAME_DIR", default_value = ".")]
        input_dir: PathBuf,

        /// Output directory
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// ffmpeg executable used to convert SOL chunks to WAV
        #[arg(long, env = "SCIRES_FFMPEG")]
        ffmpeg: Option<PathBuf>,
    },

    /// List the entries of a room's audio map
    MapList {
        /// Room number
        room: u16,

        /// Directory holding the room maps
        #[arg(long, env = "SCIRES_GAME_DIR", default_value = ".")]
        input_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// vocab.000: 26 pointer slots, high-bit terminated text
    Old,
    /// vocab.900: signature, 255 pointer slots, zero terminated text
    New,
}

impl From<FormatArg> for VocabFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Old => VocabFormat::Old,
            FormatArg::New => VocabFormat::New,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::VocabExport {
            input,
            output,
            format,
            pointer_slots,
            code_page,
        } => {
            cmd_vocab_export(&input, &output, format.into(), pointer_slots, &code_page)?;
        }
        Commands::VocabImport {
            input,
            output,
            code_page,
        } => {
            cmd_vocab_import(&input, &output, &code_page)?;
        }
        Commands::VoiceExport {
            csv_file,
            input_dir,
            output_dir,
            ffmpeg,
        } => {
            cmd_voice_export(&csv_file, &input_dir, &output_dir, ffmpeg)?;
        }
        Commands::MapList { room, input_dir } => {
            cmd_map_list(room, &input_dir)?;
        }
    }

    Ok(())
}

fn parse_code_page(label: &str) -> Result<CodePage> {
    CodePage::for_label(label)
        .with_context(|| format!("Unsupported code page: {label} (single-byte encodings only)"))
}

fn cmd_vocab_export(
    input: &Path,
    output: &Path,
    format: VocabFormat,
    pointer_slots: Option<usize>,
    code_page: &str,
) -> Result<()> {
    println!("Decoding vocabulary: {}", input.display());

    let data = fs::read(input).context("Failed to read input file")?;

    let mut decoder = VocabDecoder::new(format).with_code_page(parse_code_page(code_page)?);
    if let Some(slots) = pointer_slots {
        decoder = decoder.with_pointer_slots(slots);
    }

    let entries = decoder.decode(&data).context("Failed to decode vocabulary")?;
    let word_count = entries.len();
    let grouped = GroupedVocab::from_entries(entries);

    let file = File::create(output).context("Failed to create output file")?;
    write_vocab_csv(BufWriter::new(file), grouped.iter()).context("Failed to write CSV")?;

    println!(
        "Exported {} words in {} groups to {} ({} class mismatches)",
        word_count,
        grouped.len(),
        output.display(),
        grouped.mismatches().len()
    );

    Ok(())
}

fn cmd_vocab_import(input: &Path, output: &Path, code_page: &str) -> Result<()> {
    println!("Encoding vocabulary: {} -> {}", input.display(), output.display());

    let file = File::open(input).context("Failed to open input file")?;
    let rows = read_vocab_csv(BufReader::new(file)).context("Failed to read CSV")?;
    let groups = rows
        .iter()
        .map(VocabRow::to_encoder_group)
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Invalid vocabulary row")?;

    let encoded = VocabEncoder::new()
        .with_code_page(parse_code_page(code_page)?)
        .encode(&groups)
        .context("Failed to encode vocabulary")?;

    for rejected in &encoded.rejected {
        println!(
            "  Rejected {:?} in group {}: {}",
            rejected.word, rejected.group, rejected.reason
        );
    }

    fs::write(output, &encoded.bytes).context("Failed to write output file")?;

    println!(
        "Wrote {} words in {} groups ({} rejected)",
        encoded.word_count,
        groups.len(),
        encoded.rejected.len()
    );

    Ok(())
}

fn cmd_voice_export(
    csv_file: &Path,
    input_dir: &Path,
    output_dir: &Path,
    ffmpeg: Option<PathBuf>,
) -> Result<()> {
    let file = File::open(csv_file).context("Failed to open CSV file")?;
    let requests = read_voice_requests(BufReader::new(file)).context("Failed to read CSV")?;

    let mut library = VoiceLibrary::open(input_dir)
        .with_context(|| format!("Failed to open audio resources in {}", input_dir.display()))?;

    println!(
        "Extracting {} voices from {}...",
        requests.len(),
        library.resource_path().display()
    );

    fs::create_dir_all(output_dir)?;

    let start = Instant::now();
    let selectors: Vec<(u16, Selector)> = requests
        .iter()
        .map(|request| (request.room, request.selector()))
        .collect();
    let results = library
        .extract_parallel(&selectors)
        .context("Failed to load audio maps")?;

    let pb = ProgressBar::new(requests.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let mut exported = 0;
    let mut missing = 0;
    let mut skipped = 0;
    let mut sol_files = Vec::new();

    for (&(room, selector), result) in selectors.iter().zip(results) {
        let extraction =
            result.with_context(|| format!("Failed to extract room {room} voice {selector}"))?;

        match extraction {
            Extraction::Found(voice) => {
                let output_path = output_dir.join(voice.file_name());
                fs::write(&output_path, &voice.chunk.data)?;
                if matches!(voice.chunk.header, ChunkHeader::Sol { .. }) {
                    sol_files.push(output_path);
                }
                exported += 1;
            }
            Extraction::NotInMap => {
                pb.println(format!("Not in map: room {room} voice {selector}"));
                missing += 1;
            }
            Extraction::Skipped(reason) => {
                pb.println(format!("Skipped: room {room} voice {selector}: {reason}"));
                skipped += 1;
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    println!(
        "Exported {} voices in {:?} ({} not in map, {} skipped)",
        exported,
        start.elapsed(),
        missing,
        skipped
    );

    if sol_files.is_empty() {
        return Ok(());
    }

    match ffmpeg.or_else(|| which::which("ffmpeg").ok()) {
        Some(ffmpeg) => {
            println!("Converting {} SOL files with {}...", sol_files.len(), ffmpeg.display());
            for sol in &sol_files {
                convert_sol(&ffmpeg, sol)?;
            }
        }
        None => {
            println!(
                "ffmpeg not found: {} SOL files were left as-is. \
                 Install ffmpeg or pass --ffmpeg to convert them to WAV.",
                sol_files.len()
            );
        }
    }

    Ok(())
}

/// Convert a SOL file to WAV next to it, then remove the SOL file.
fn convert_sol(ffmpeg: &Path, sol: &Path) -> Result<()> {
    let wav = sol.with_extension("wav");
    let status = Command::new(ffmpeg)
        .args(["-loglevel", "fatal", "-y", "-i"])
        .arg(sol)
        .arg(&wav)
        .status()
        .with_context(|| format!("Failed to run {}", ffmpeg.display()))?;

    if !status.success() {
        anyhow::bail!("ffmpeg failed to convert {} ({})", sol.display(), status);
    }

    fs::remove_file(sol).context("Failed to remove converted SOL file")?;
    tracing::debug!(path = %wav.display(), "converted SOL to WAV");

    Ok(())
}

fn cmd_map_list(room: u16, input_dir: &Path) -> Result<()> {
    let map = AudioMap::open(input_dir, room)
        .with_context(|| format!("Failed to read map for room {room}"))?;

    println!(
        "{:>5} {:>4} {:>4} {:>4} {:>4} {:>10}",
        "room", "noun", "verb", "cond", "seq", "offset"
    );
    for entry in map.entries() {
        println!(
            "{:>5} {:>4} {:>4} {:>4} {:>4} {:>#10x}",
            entry.room, entry.noun, entry.verb, entry.cond, entry.seq, entry.offset
        );
    }

    println!("\nTotal: {} entries ({} bytes)", map.entries().len(), map.consumed());

    Ok(())
}
