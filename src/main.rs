use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use trundle::bencode::{decode, Value};
use trundle::sweep::{ExportOptions, TransferMode, WorkingDir};

#[derive(Parser, Debug)]
#[command(version, about = "Sweep a Transmission-style working directory", long_about = None)]
struct Args {
    /// Verbose debug logging.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List transfers whose torrent file is missing.
    Orphans {
        /// Path to the client working directory.
        path: PathBuf,
    },
    /// Copy or move torrent files out under their content names.
    Export {
        /// Only export transfers filed under this group.
        #[arg(short, long)]
        group: Option<i64>,

        /// Transfer mode.
        #[arg(long, value_enum, default_value_t = ModeArg::Simulate)]
        mode: ModeArg,

        /// Path to the client working directory.
        path: PathBuf,

        /// Directory to deliver torrent files into.
        dest_path: PathBuf,
    },
    /// Decode one bencoded file and print it as JSON.
    Show {
        /// Path to a .torrent or .resume file.
        file: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    Copy,
    Move,
    Simulate,
}

impl From<ModeArg> for TransferMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Copy => TransferMode::Copy,
            ModeArg::Move => TransferMode::Move,
            ModeArg::Simulate => TransferMode::Simulate,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    match args.command {
        Command::Orphans { path } => {
            let dir = WorkingDir::open(&path)
                .with_context(|| format!("open working directory {}", path.display()))?;
            for orphan in dir.find_orphans().context("scan resume entries")? {
                println!("{}", orphan.name);
            }
        }
        Command::Export {
            group,
            mode,
            path,
            dest_path,
        } => {
            let dir = WorkingDir::open(&path)
                .with_context(|| format!("open working directory {}", path.display()))?;
            let options = ExportOptions {
                group,
                mode: mode.into(),
            };
            let report = dir
                .export(&dest_path, &options)
                .context("export transfers")?;
            if matches!(options.mode, TransferMode::Simulate) {
                println!(
                    "Files have not been transferred in simulate mode. \
                     Pick --mode copy or --mode move to write."
                );
            }
            println!("Files transferred: {}", report.transferred);
            if report.skipped > 0 {
                println!("Files skipped: {}", report.skipped);
            }
        }
        Command::Show { file } => {
            let data =
                std::fs::read(&file).with_context(|| format!("read {}", file.display()))?;
            let value = decode(&data).context("decode bencode")?;
            println!("{}", serde_json::to_string_pretty(&value_to_json(&value))?);
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

/// Renders a decoded value as JSON for display, hex-encoding byte strings
/// that are not UTF-8.
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Integer(i) => json!(i),
        Value::Bytes(b) => match std::str::from_utf8(b) {
            Ok(text) => json!(text),
            Err(_) => json!(hex::encode(b)),
        },
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Dict(dict) => {
            let mut map = serde_json::Map::new();
            for (key, val) in dict.iter() {
                map.insert(key.to_string(), value_to_json(val));
            }
            serde_json::Value::Object(map)
        }
    }
}
