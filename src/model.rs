use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

/// Raw script integers are divided by this to get the stick axis value.
pub const ANALOG_SCALE: f64 = 300.0;

/// Stick power never reports more than this.
pub const MAX_POWER: f64 = 100.0;

/// Highest addressable frame; the cursor is signed so `-1` can mean "empty".
pub const MAX_FRAME: u64 = i64::MAX as u64;

/// One analog stick, both as cartesian axes and as polar power/angle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Stick {
    pub x: f64,
    pub y: f64,
    /// `min(hypot(x, y), 100)`
    pub power: f64,
    /// Radians, in `(-PI, PI]`.
    pub angle: f64,
}

/// Controller state for one frame: pressed buttons plus both sticks.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Instruction {
    pub buttons: BTreeSet<u8>,
    pub left_stick: Stick,
    pub right_stick: Stick,
}

/// Sparse frame index -> controller state lookup produced by the compiler.
///
/// Frames that no script line touched are absent; what an absent frame means
/// is up to whoever plays the table back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameTable {
    last_frame: i64,
    frames: BTreeMap<u64, Instruction>,
}

impl Default for FrameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTable {
    pub fn new() -> Self {
        Self {
            last_frame: -1,
            frames: BTreeMap::new(),
        }
    }

    /// Highest committed frame, `-1` when nothing was committed.
    pub fn last_frame(&self) -> i64 {
        self.last_frame
    }

    pub fn frame_at(&self, frame: u64) -> Option<&Instruction> {
        self.frames.get(&frame)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Instruction)> {
        self.frames.iter().map(|(f, i)| (*f, i))
    }

    /// Overwrites any earlier instruction on the same frame.
    pub(crate) fn insert(&mut self, frame: u64, instruction: Instruction) {
        self.frames.insert(frame, instruction);
    }

    pub(crate) fn set_last_frame(&mut self, last_frame: i64) {
        self.last_frame = last_frame;
    }
}

/// Something the compiler tolerated rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// Non-blank line that is neither a loop marker nor an instruction.
    IgnoredLine,
    UnknownButton(String),
    /// Loop opened while another was still open; the older body was dropped.
    NestedLoop,
    /// `}` without an open loop.
    StrayLoopEnd,
    /// Input ended inside a loop body; the body was dropped.
    UnterminatedLoop,
    /// Frame range whose end lies before its start.
    EmptyRange,
    /// Frames past `MAX_FRAME`; the line (or the rest of a loop) was dropped.
    FrameOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based source line.
    pub line: usize,
    pub kind: DiagnosticKind,
}

/// Result of compiling one script.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub table: FrameTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything read from disk before compiling.
#[derive(Debug, Clone)]
pub struct RawProject {
    pub name: String,
    pub script: String,
    /// `None` means the built-in key table.
    pub keys: Option<HashMap<String, u8>>,
}

/// Fully processed output handed to `writer`.
pub struct ProcessedProject {
    pub name: String,
    pub compilation: Compilation,
    /// `(name, code)` pairs of the key table the script was compiled with,
    /// sorted by code.
    pub keys: Vec<(String, u8)>,
}
