use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One document per line, trimmed. Blank lines are kept so ids match line numbers.
/// Files ending in `.gz` are decompressed on the fly.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader: Box<dyn BufRead> = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    read_from(reader).with_context(|| format!("reading {}", path.display()))
}

pub fn read_from<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?.trim().to_string());
    }
    Ok(lines)
}

/// Non-blank lines of a query file.
pub fn read_queries(path: &Path) -> Result<Vec<String>> {
    Ok(read_lines(path)?.into_iter().filter(|q| !q.is_empty()).collect())
}
