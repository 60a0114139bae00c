//! cbcont - continuous-action bandit label tool
//!
//! Reads label text (one example per line, label section before the first
//! `|`) and converts it to and from the binary label cache.
//!
//! ## Commands
//!
//! - `parse`: Parse a text file and print one JSON label per line
//! - `cache`: Parse a text file and write the binary cache
//! - `dump`: Print the labels stored in a cache file as text or JSON
//! - `stats`: Summarise a cache file (header/test/train counts, digest)

use anyhow::{Context, Result};
use cb_cont_label::{
    init_tracing, CacheReader, CacheWriter, CodecConfig, EvalLabel, Label, LabelCodec,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};

#[derive(Parser)]
#[command(name = "cbcont")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parse and cache continuous-action bandit labels", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Seed for hashing action names
    #[arg(long, global = true, env = "CBCONT_HASH_SEED", default_value_t = 0)]
    hash_seed: u32,

    /// Treat labels as evaluation labels (`action event...`)
    #[arg(long, global = true)]
    eval: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a label text file and print one JSON label per line
    Parse {
        /// Input text file
        input: PathBuf,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a label text file and write the binary cache
    Cache {
        /// Input text file
        input: PathBuf,

        /// Cache file to create
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the labels stored in a cache file
    Dump {
        /// Cache file to read
        cache: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = DumpFormat::Text)]
        format: DumpFormat,
    },

    /// Summarise a cache file
    Stats {
        /// Cache file to read
        cache: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DumpFormat {
    Text,
    Json,
}

/// What the tool needs from a label type beyond [`LabelCodec`].
trait CliLabel: LabelCodec + Serialize {
    fn render(&self) -> String;
    fn is_header(&self) -> bool;
    fn entries(&self) -> usize;
}

impl CliLabel for Label {
    fn render(&self) -> String {
        self.to_text()
    }

    fn is_header(&self) -> bool {
        Label::is_header(self)
    }

    fn entries(&self) -> usize {
        self.len()
    }
}

impl CliLabel for EvalLabel {
    fn render(&self) -> String {
        self.to_text()
    }

    fn is_header(&self) -> bool {
        self.event.is_header()
    }

    fn entries(&self) -> usize {
        self.event.len()
    }
}

#[derive(Debug, Default, PartialEq, Serialize)]
struct CacheStats {
    kind: &'static str,
    labels: u64,
    headers: u64,
    test: u64,
    train: u64,
    entries: u64,
    bytes: u64,
    sha256: String,
}

impl CacheStats {
    fn record<L: CliLabel>(&mut self, label: &L) {
        self.labels += 1;
        self.entries += label.entries() as u64;
        if label.is_header() {
            self.headers += 1;
        } else if label.is_test() {
            self.test += 1;
        } else {
            self.train += 1;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    let config = CodecConfig::new(cli.hash_seed);
    if cli.eval {
        run::<EvalLabel>(cli.command, &config)
    } else {
        run::<Label>(cli.command, &config)
    }
}

fn run<L: CliLabel>(command: Commands, config: &CodecConfig) -> Result<()> {
    match command {
        Commands::Parse { input, output } => {
            let reader = open_input(&input)?;
            let mut out = open_output(output.as_deref())?;
            let count = parse_to_json::<L, _, _>(reader, &mut out, config)?;
            out.flush()?;
            info!(event = "parse.finished", kind = L::KIND, labels = count);
        }
        Commands::Cache { input, output } => {
            let reader = open_input(&input)?;
            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            let (labels, bytes) =
                text_to_cache::<L, _, _>(reader, BufWriter::new(file), config)?;
            info!(
                event = "cache.written",
                kind = L::KIND,
                path = %output.display(),
                labels = labels,
                bytes = bytes
            );
        }
        Commands::Dump { cache, format } => {
            let data = read_cache_file(&cache)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            dump::<L, _>(&data, format, &mut out)?;
            out.flush()?;
        }
        Commands::Stats { cache } => {
            let data = read_cache_file(&cache)?;
            let stats = cache_stats::<L>(&data)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Failed to create {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

fn read_cache_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read cache {}", path.display()))
}

/// Parse every non-blank line of `input`, calling `f` with each label.
/// The first bad line aborts with its 1-based line number.
fn for_each_text_label<L, R, F>(input: R, config: &CodecConfig, mut f: F) -> Result<u64>
where
    L: CliLabel,
    R: BufRead,
    F: FnMut(&L) -> Result<()>,
{
    let mut label = L::default();
    let mut count = 0u64;
    for (idx, line) in input.lines().enumerate() {
        let lineno = idx + 1;
        let line = line.with_context(|| format!("Failed to read line {lineno}"))?;
        if line.trim().is_empty() {
            continue;
        }
        label
            .parse_line(&line, config)
            .with_context(|| format!("line {lineno}: {line:?}"))?;
        f(&label)?;
        count += 1;
    }
    debug!(event = "text.parsed", kind = L::KIND, labels = count);
    Ok(count)
}

fn parse_to_json<L, R, W>(input: R, out: &mut W, config: &CodecConfig) -> Result<u64>
where
    L: CliLabel,
    R: BufRead,
    W: Write,
{
    for_each_text_label::<L, _, _>(input, config, |label| {
        serde_json::to_writer(&mut *out, label)?;
        out.write_all(b"\n")?;
        Ok(())
    })
}

/// Returns `(labels, bytes)` written.
fn text_to_cache<L, R, W>(input: R, output: W, config: &CodecConfig) -> Result<(u64, u64)>
where
    L: CliLabel,
    R: BufRead,
    W: Write,
{
    let mut writer = CacheWriter::new(output);
    for_each_text_label::<L, _, _>(input, config, |label| {
        writer.write(label)?;
        Ok(())
    })?;
    let counts = (writer.labels_written(), writer.bytes_written());
    writer.finish()?;
    Ok(counts)
}

fn dump<L: CliLabel, W: Write>(data: &[u8], format: DumpFormat, out: &mut W) -> Result<u64> {
    let mut reader = CacheReader::<_, L>::new(data);
    let mut label = L::default();
    let mut count = 0u64;
    while reader
        .read_into(&mut label)
        .with_context(|| format!("record {} is corrupt", count + 1))?
    {
        match format {
            DumpFormat::Text => writeln!(out, "{}", label.render())?,
            DumpFormat::Json => {
                serde_json::to_writer(&mut *out, &label)?;
                out.write_all(b"\n")?;
            }
        }
        count += 1;
    }
    Ok(count)
}

fn cache_stats<L: CliLabel>(data: &[u8]) -> Result<CacheStats> {
    let mut stats = CacheStats {
        kind: L::KIND,
        bytes: data.len() as u64,
        sha256: hex::encode(Sha256::digest(data)),
        ..CacheStats::default()
    };
    let mut reader = CacheReader::<_, L>::new(data);
    let mut label = L::default();
    while reader
        .read_into(&mut label)
        .with_context(|| format!("record {} is corrupt", stats.labels + 1))?
    {
        stats.record(&label);
    }
    Ok(stats)
}
