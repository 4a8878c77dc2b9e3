//! Turns a parsed instruction line into concrete frames and controller state.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::model::{Instruction, MAX_FRAME};

use super::analog;
use super::ast::{FrameSpec, InstructionLine};
use super::keys::{KeyTable, Resolver};

#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Half-open; empty when the script wrote an end before its start,
    /// `None` when the frames run past `MAX_FRAME`.
    pub frames: Option<Range<u64>>,
    pub instruction: Instruction,
    /// Button tokens no lookup strategy could resolve.
    pub unknown: Vec<String>,
}

/// Place a frame spec on the timeline.
///
/// `base` is where offset addressing counts from: the first uncommitted frame
/// outside a loop, the loop-local cursor inside one.
pub fn frame_range(spec: FrameSpec, base: u64) -> Option<Range<u64>> {
    let frames = match spec {
        FrameSpec::Absolute { start, end } => start..end.unwrap_or(start).checked_add(1)?,
        FrameSpec::Offset { delta, count } => {
            let start = base.checked_add(delta)?;
            start..start.checked_add(count.unwrap_or(1))?
        }
    };

    if frames.start > MAX_FRAME || frames.end > MAX_FRAME + 1 {
        return None;
    }
    Some(frames)
}

pub fn decode<K: KeyTable + ?Sized>(
    line: &InstructionLine,
    base: u64,
    resolver: &Resolver<'_, K>,
) -> Decoded {
    let mut buttons = BTreeSet::new();
    let mut unknown = Vec::new();
    for name in &line.buttons {
        match resolver.resolve(name) {
            Some(code) => {
                buttons.insert(code);
            }
            None => unknown.push(name.clone()),
        }
    }

    Decoded {
        frames: frame_range(line.frames, base),
        instruction: Instruction {
            buttons,
            left_stick: analog::convert(line.left_stick),
            right_stick: analog::convert(line.right_stick),
        },
        unknown,
    }
}
