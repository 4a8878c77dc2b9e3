//! Script compiler: one pass over the lines, building the frame table.
//!
//! Outside a loop every instruction lands in the table directly. Inside a
//! loop instructions are collected at loop-relative offsets and replayed
//! `repetitions` times when the loop closes, each pass laid out right after
//! the previous one.

use std::collections::BTreeMap;
use std::ops::Range;

use log::{debug, log_enabled, warn};

use crate::model::{Compilation, Diagnostic, DiagnosticKind, FrameTable, Instruction, MAX_FRAME};

use super::ast::Line;
use super::decoder::{self, Decoded};
use super::keys::{KeyDict, KeyTable, Resolver};
use super::script_parser::parse_line;

/// Compile with the built-in key table, dropping diagnostics.
pub fn compile(script: &str) -> FrameTable {
    ScriptCompiler::new(&KeyDict).compile(script).table
}

/// Holds no per-script state, so one compiler can be reused for any number
/// of scripts.
pub struct ScriptCompiler<'k, K: KeyTable + ?Sized> {
    resolver: Resolver<'k, K>,
}

impl<'k, K: KeyTable + ?Sized> ScriptCompiler<'k, K> {
    pub fn new(keys: &'k K) -> Self {
        Self::with_resolver(Resolver::new(keys))
    }

    pub fn with_resolver(resolver: Resolver<'k, K>) -> Self {
        Self { resolver }
    }

    /// Every repetition of every loop is written out frame by frame, so the
    /// table grows with `repetitions * body length`; nothing bounds either.
    pub fn compile(&self, script: &str) -> Compilation {
        let mut session = Session::default();

        for (idx, raw) in script.lines().enumerate() {
            let line_no = idx + 1;
            match parse_line(raw) {
                Line::LoopStart { repetitions } => session.open_loop(line_no, repetitions),
                Line::LoopEnd => session.close_loop(line_no),
                Line::Instruction(line) => {
                    let base = session.offset_base();
                    let decoded = decoder::decode(&line, base, &self.resolver);
                    session.emit(line_no, decoded);
                }
                Line::Ignore => {
                    if !raw.trim().is_empty() {
                        session.note(line_no, DiagnosticKind::IgnoredLine);
                    }
                }
            }
        }

        session.finish(script.lines().count())
    }
}

/// Instructions of one loop body, keyed by offset from the loop's start.
#[derive(Debug)]
struct LoopBody {
    repetitions: u64,
    frames: BTreeMap<u64, Instruction>,
    /// Loop-local cursor: end frame of the last instruction line.
    cursor: u64,
    /// Highest offset written so far; one pass spans `0..=max_offset`.
    max_offset: Option<u64>,
}

impl LoopBody {
    fn new(repetitions: u64) -> Self {
        Self {
            repetitions,
            frames: BTreeMap::new(),
            cursor: 0,
            max_offset: None,
        }
    }

    fn insert(&mut self, frames: Range<u64>, instruction: &Instruction) {
        let last = frames.end - 1;
        for offset in frames {
            self.frames.insert(offset, instruction.clone());
        }
        self.cursor = last;
        self.max_offset = Some(self.max_offset.map_or(last, |max| max.max(last)));
    }

    /// Replay the body onto `table`, re-anchoring on the table cursor after
    /// every pass. Returns `false` when a pass would run past `MAX_FRAME`;
    /// that pass and the ones after it are dropped.
    fn expand_into(self, table: &mut FrameTable) -> bool {
        let Some(max_offset) = self.max_offset else {
            return true;
        };

        for _ in 0..self.repetitions {
            let Some(anchor) = table.last_frame().checked_add(1) else {
                return false;
            };
            let Some(last) = anchor.checked_add(max_offset as i64) else {
                return false;
            };
            for (offset, instruction) in &self.frames {
                table.insert(anchor as u64 + offset, instruction.clone());
            }
            table.set_last_frame(last);
        }
        true
    }
}

/// Mutable state of a single `compile` call.
#[derive(Default)]
struct Session {
    table: FrameTable,
    looping: Option<LoopBody>,
    diagnostics: Vec<Diagnostic>,
}

impl Session {
    fn note(&mut self, line: usize, kind: DiagnosticKind) {
        match &kind {
            DiagnosticKind::IgnoredLine => debug!("line {line}: ignored"),
            DiagnosticKind::UnknownButton(name) => warn!("line {line}: unknown button `{name}`"),
            DiagnosticKind::NestedLoop => {
                warn!("line {line}: loop opened inside a loop, dropping the outer body")
            }
            DiagnosticKind::StrayLoopEnd => warn!("line {line}: `}}` without an open loop"),
            DiagnosticKind::UnterminatedLoop => {
                warn!("line {line}: script ended inside a loop, dropping its body")
            }
            DiagnosticKind::EmptyRange => warn!("line {line}: frame range ends before it starts"),
            DiagnosticKind::FrameOverflow => warn!("line {line}: frames run past {MAX_FRAME}"),
        }
        self.diagnostics.push(Diagnostic { line, kind });
    }

    /// Where `+N` counts from right now.
    fn offset_base(&self) -> u64 {
        match &self.looping {
            Some(body) => body.cursor,
            // -1 wraps to 0, MAX_FRAME to MAX_FRAME + 1
            None => (self.table.last_frame() as u64).wrapping_add(1),
        }
    }

    fn open_loop(&mut self, line: usize, repetitions: u64) {
        if self.looping.is_some() {
            self.note(line, DiagnosticKind::NestedLoop);
        }
        self.looping = Some(LoopBody::new(repetitions));
    }

    fn close_loop(&mut self, line: usize) {
        match self.looping.take() {
            Some(body) => {
                if !body.expand_into(&mut self.table) {
                    self.note(line, DiagnosticKind::FrameOverflow);
                }
            }
            None => self.note(line, DiagnosticKind::StrayLoopEnd),
        }
    }

    fn emit(&mut self, line: usize, decoded: Decoded) {
        let Decoded {
            frames,
            instruction,
            unknown,
        } = decoded;

        for name in unknown {
            self.note(line, DiagnosticKind::UnknownButton(name));
        }
        let Some(frames) = frames else {
            self.note(line, DiagnosticKind::FrameOverflow);
            return;
        };
        if frames.is_empty() {
            // the loop-local cursor still moves to the written end frame
            if let Some(body) = &mut self.looping {
                body.cursor = frames.end.saturating_sub(1);
            }
            self.note(line, DiagnosticKind::EmptyRange);
            return;
        }

        match &mut self.looping {
            Some(body) => body.insert(frames, &instruction),
            None => {
                let last = (frames.end - 1) as i64;
                for frame in frames {
                    self.table.insert(frame, instruction.clone());
                }
                if last > self.table.last_frame() {
                    self.table.set_last_frame(last);
                }
            }
        }
    }

    fn finish(mut self, line_count: usize) -> Compilation {
        if self.looping.take().is_some() {
            self.note(line_count, DiagnosticKind::UnterminatedLoop);
        }

        if log_enabled!(log::Level::Debug) {
            if let Ok(json) = serde_json::to_string_pretty(&self.table) {
                debug!("compiled frames:\n{json}");
            }
        }

        Compilation {
            table: self.table,
            diagnostics: self.diagnostics,
        }
    }
}
