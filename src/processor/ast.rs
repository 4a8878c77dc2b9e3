//! Syntax of one script line, *before* buttons are resolved and frames are
//! placed on the timeline.

/// How an instruction line addresses its frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSpec {
    /// `5` or `5-9`: absolute first and last frame.
    Absolute { start: u64, end: Option<u64> },
    /// `+2` or `+2-4`: distance from the running cursor, plus a frame count.
    Offset { delta: u64, count: Option<u64> },
}

/// Raw `X;Y` stick pair as written in the script.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawStick {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstructionLine {
    pub frames: FrameSpec,
    /// Button names as written, `;`-separated tokens, empty ones dropped.
    pub buttons: Vec<String>,
    pub left_stick: Option<RawStick>,
    pub right_stick: Option<RawStick>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// `3x{`
    LoopStart { repetitions: u64 },
    /// `}`
    LoopEnd,
    Instruction(InstructionLine),
    /// Blank line, comment, or anything else we don't understand.
    Ignore,
}
