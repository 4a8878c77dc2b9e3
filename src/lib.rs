pub mod cli;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

pub use model::{Compilation, Diagnostic, DiagnosticKind, FrameTable, Instruction, Stick};
pub use processor::{KeyDict, KeyTable, ScriptCompiler, compile};

use anyhow::Context;
use clap::Parser;
use log::info;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_logging(args.log_level.as_deref());

    // 1. ── Load ───────────────────────────────────────────────────────
    let raw = parser::load(&args.input, args.keys.as_deref(), args.name.as_deref())
        .with_context(|| "Loading inputs")?;

    // 2. ── Compile ────────────────────────────────────────────────────
    let processed = processor::run(&raw);

    if let Some(frame) = args.frame {
        match processed.compilation.table.frame_at(frame) {
            Some(instruction) => info!("frame {frame}: {instruction:?}"),
            None => info!("frame {frame}: unspecified"),
        }
    }

    // 3. ── Write outputs ──────────────────────────────────────────────
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Creating {}", args.output.display()))?;

    writer::json::emit(&processed, &args.output).with_context(|| "Writing JSON frame table")?;
    writer::c::emit(&processed, &args.output).with_context(|| "Writing C header")?;

    Ok(())
}

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.init();
}
