//! Emit a C++ header with the key enum and the compiled frame array, for
//! firmware that replays the table without parsing scripts itself.

use crate::model::{ProcessedProject, Stick};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub fn emit(project: &ProcessedProject, out_dir: &Path) -> io::Result<()> {
    let file = File::create(out_dir.join(format!("{}_frames.h", project.name)))?;
    let mut h = BufWriter::new(file);
    write(project, &mut h)?;
    h.flush()
}

pub fn write<W: Write>(project: &ProcessedProject, mut h: W) -> io::Result<()> {
    let n = c_ident(&project.name);
    let table = &project.compilation.table;

    writeln!(h, "#pragma once")?;
    writeln!(h, "#include <cmath>")?;
    writeln!(h, "#include <cstdint>")?;
    writeln!(h, "// Auto-generated – DO NOT EDIT\n")?;

    // ---------------------------------------------------------------
    // 1. Enum-class for key codes (bit index in PadFrame::buttons)
    // ---------------------------------------------------------------
    writeln!(h, "enum class PadKey : uint8_t {{")?;
    for (name, code) in &project.keys {
        writeln!(h, "    {} = {},", c_ident(name), code)?;
    }
    writeln!(h, "}};\n")?;

    writeln!(h, "struct PadStick {{ float x, y, power, angle; }};")?;
    writeln!(
        h,
        "struct PadFrame {{ uint64_t frame; uint32_t buttons; PadStick left; PadStick right; }};\n"
    )?;

    // ---------------------------------------------------------------
    // 2. Frame table & size symbols
    // ---------------------------------------------------------------
    writeln!(h, "static const int64_t  {n}_last_frame = {};", table.last_frame())?;
    writeln!(h, "static const uint32_t {n}_frame_count = {};", table.len())?;

    if table.is_empty() {
        writeln!(h, "static const PadFrame* const {n}_frames = nullptr;")?;
        return Ok(());
    }

    writeln!(h, "static const PadFrame {n}_frames[] = {{")?;
    for (frame, instruction) in table.iter() {
        let mut mask = 0u32;
        for code in &instruction.buttons {
            let bit = 1u32.checked_shl(u32::from(*code)).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("key code {code} does not fit the 32-bit button mask"),
                )
            })?;
            mask |= bit;
        }
        writeln!(
            h,
            "    {{ {frame}ull, 0x{mask:x}u, {}, {} }},",
            stick(&instruction.left_stick),
            stick(&instruction.right_stick)
        )?;
    }
    writeln!(h, "}};")?;

    Ok(())
}

fn stick(s: &Stick) -> String {
    format!(
        "{{ {}, {}, {}, {} }}",
        float(s.x),
        float(s.y),
        float(s.power),
        float(s.angle)
    )
}

fn float(v: f64) -> String {
    if v.is_finite() {
        format!("{:?}f", v as f32)
    } else if v > 0.0 {
        "INFINITY".into()
    } else {
        "-INFINITY".into()
    }
}

/// Anything that isn't `[A-Za-z0-9_]` becomes `_`; a leading digit gets a `_`.
fn c_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
