//! Dump the frame table (and what the compiler tolerated) as JSON.

use crate::model::{Diagnostic, FrameTable, ProcessedProject};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct Document<'a> {
    name: &'a str,
    #[serde(flatten)]
    table: &'a FrameTable,
    diagnostics: &'a [Diagnostic],
}

pub fn emit(project: &ProcessedProject, out_dir: &Path) -> io::Result<()> {
    let file = File::create(out_dir.join(format!("{}_frames.json", project.name)))?;
    let mut out = BufWriter::new(file);
    write(project, &mut out)?;
    out.flush()
}

pub fn write<W: Write>(project: &ProcessedProject, out: W) -> io::Result<()> {
    let doc = Document {
        name: &project.name,
        table: &project.compilation.table,
        diagnostics: &project.compilation.diagnostics,
    };
    serde_json::to_writer_pretty(out, &doc).map_err(io::Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawProject;
    use crate::processor;
    use serde_json::{Value, json};

    #[test]
    fn test_json_layout() {
        let raw = RawProject {
            name: "demo".into(),
            script: "2 A;B 300;0\nnoise".into(),
            keys: None,
        };
        let project = processor::run(&raw);

        let mut buf = Vec::new();
        write(&project, &mut buf).unwrap();
        let doc: Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(doc["name"], "demo");
        assert_eq!(doc["last_frame"], 2);
        assert_eq!(doc["frames"]["2"]["buttons"], json!([1, 2]));
        assert_eq!(doc["frames"]["2"]["left_stick"]["x"], 1.0);
        assert_eq!(doc["frames"]["2"]["right_stick"]["power"], 0.0);
        assert_eq!(
            doc["diagnostics"],
            json!([{ "line": 2, "kind": "IgnoredLine" }])
        );
    }
}
