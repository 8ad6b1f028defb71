//! Line-file reading/writing and atomic file replacement.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Read a text file as a list of lines.
///
/// Empty lines are dropped here, mirroring the way outline and metadata
/// files tolerate blank separator lines; a missing file reads as an
/// empty list.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let mut line = line?;
        if line.ends_with('\r') {
            line.pop();
        }
        if line.is_empty() {
            continue;
        }
        lines.push(line);
    }
    Ok(lines)
}

/// Write lines to a text file, one per line, creating parent
/// directories as needed.
pub fn write_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a file through a temporary in the same directory, renaming it
/// over `target` only after `write` succeeds.
///
/// On any failure the temporary is discarded and the target is left
/// untouched. The temporary lives next to the target so the final
/// rename stays on one filesystem.
pub fn replace_file<F>(target: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    write(temp.as_file_mut())?;
    temp.as_file_mut().flush()?;
    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
