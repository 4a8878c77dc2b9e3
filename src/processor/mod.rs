//! The functional core: script text in, frame table out.
pub mod analog;
pub mod ast;
pub mod compiler;
pub mod decoder;
pub mod keys;
pub mod lexer;
pub mod script_parser;

pub use compiler::{ScriptCompiler, compile};
pub use keys::{KeyDict, KeyTable, Lookup, Resolver};

use crate::model::{Compilation, ProcessedProject, RawProject};
use log::info;

/// Compiles the project's script and returns a read-only structure for writers.
pub fn run(raw: &RawProject) -> ProcessedProject {
    let (compilation, keys) = match &raw.keys {
        Some(custom) => with_keys(custom, &raw.script),
        None => with_keys(&KeyDict, &raw.script),
    };

    info!(
        "compiled `{}`: {} frames, last frame {}, {} diagnostics",
        raw.name,
        compilation.table.len(),
        compilation.table.last_frame(),
        compilation.diagnostics.len()
    );

    ProcessedProject {
        name: raw.name.clone(),
        compilation,
        keys,
    }
}

fn with_keys<K: KeyTable + ?Sized>(keys: &K, script: &str) -> (Compilation, Vec<(String, u8)>) {
    let compilation = ScriptCompiler::new(keys).compile(script);
    (compilation, keys.entries())
}
