//! Keyframe CSV (`.kcsv`) storage.
//!
//! ```text
//! # CameraPath  file version = 0.1.0
//! # columns = time,posX,posY,posZ,focX,focY,focZ,viewX,viewY,viewZ
//! 0,0,0,10,0,0,0,0,1,0
//! ```
//!
//! Lines starting with `#` and blank lines are ignored when reading.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flythrough_core::keyframe::validate_time;
use flythrough_core::{CameraPath, FlythroughError, Keyframe, Result};
use glam::DVec3;

/// Default file extension for keyframe files.
pub const KCSV_EXTENSION: &str = "kcsv";

/// Column header written after the version line.
const COLUMNS: &str = "time,posX,posY,posZ,focX,focY,focZ,viewX,viewY,viewZ";

const FIELDS_PER_ROW: usize = 10;

/// Writes the keyframes of `path` in ascending time order.
pub fn write_key_frames<W: Write>(mut writer: W, path: &CameraPath) -> Result<()> {
    writeln!(
        writer,
        "# CameraPath  file version = {}",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(writer, "# columns = {COLUMNS}")?;

    for key in path.key_frames() {
        let p = key.position();
        let f = key.focal_point();
        let u = key.view_up();
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{}",
            key.time, p.x, p.y, p.z, f.x, f.y, f.z, u.x, u.y, u.z
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Replaces the keyframes of `path` with those read from `reader`.
///
/// The whole input is parsed before `path` is touched, so a malformed file
/// leaves it unchanged.
pub fn read_key_frames<R: BufRead>(reader: R, path: &mut CameraPath) -> Result<()> {
    let mut key_frames = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        key_frames.push(parse_row(trimmed, index + 1)?);
    }

    path.set_key_frames(key_frames)?;
    log::info!("read {} keyframes", path.num_key_frames());
    Ok(())
}

/// Saves the keyframes of `path` to a file.
pub fn save(file: impl AsRef<Path>, path: &CameraPath) -> Result<()> {
    let file = file.as_ref();
    write_key_frames(BufWriter::new(File::create(file)?), path)?;
    log::info!("saved {} keyframes to {}", path.num_key_frames(), file.display());
    Ok(())
}

/// Loads a camera path from a file. The returned path is not built yet.
pub fn load(file: impl AsRef<Path>) -> Result<CameraPath> {
    let mut path = CameraPath::new();
    read_key_frames(BufReader::new(File::open(file)?), &mut path)?;
    Ok(path)
}

fn parse_row(row: &str, line: usize) -> Result<Keyframe> {
    let values = row
        .split(',')
        .map(|field| {
            field.trim().parse::<f64>().map_err(|e| FlythroughError::Parse {
                line,
                message: format!("invalid number '{}': {e}", field.trim()),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    if values.len() != FIELDS_PER_ROW {
        return Err(FlythroughError::Parse {
            line,
            message: format!(
                "expected {FIELDS_PER_ROW} values, found {}",
                values.len()
            ),
        });
    }

    let time = validate_time(values[0]).map_err(|e| FlythroughError::Parse {
        line,
        message: e.to_string(),
    })?;
    let vec3 = |i: usize| DVec3::new(values[i], values[i + 1], values[i + 2]);
    Ok(Keyframe::new(time, vec3(1), vec3(4), vec3(7)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_path() -> CameraPath {
        let mut path = CameraPath::new();
        path.add_key_frame(0.0, DVec3::new(0.0, 0.0, 10.0), DVec3::ZERO, DVec3::Y)
            .unwrap();
        path.add_key_frame(
            100.0,
            DVec3::new(10.5, -2.25, 3.0),
            DVec3::new(0.1, 0.2, 0.3),
            DVec3::new(0.0, 0.0, 1.0),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_write_header_and_rows() {
        let mut buffer = Vec::new();
        write_key_frames(&mut buffer, &sample_path()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("# CameraPath  file version = "));
        assert_eq!(lines[1], format!("# columns = {COLUMNS}"));
        assert_eq!(lines[2], "0,0,0,10,0,0,0,0,1,0");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_write_then_read() {
        let original = sample_path();
        let mut buffer = Vec::new();
        write_key_frames(&mut buffer, &original).unwrap();

        let mut path = CameraPath::new();
        path.add_key_frame(999.0, DVec3::ONE, DVec3::ONE, DVec3::ONE)
            .unwrap();
        read_key_frames(buffer.as_slice(), &mut path).unwrap();
        assert_eq!(path.key_frames(), original.key_frames());
    }

    #[test]
    fn test_read_skips_comments_and_blank_lines() {
        let text = "# header\n\n  \n200,1,2,3,4,5,6,0,1,0\n# trailing\n0, 0,0,0, 0,0,-1, 0,1,0\n";
        let mut path = CameraPath::new();
        read_key_frames(text.as_bytes(), &mut path).unwrap();
        assert_eq!(path.num_key_frames(), 2);
        assert_eq!(path.min_time(), Some(0.0));
        assert_eq!(path.key_frame(1).unwrap().focal_point(), DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_read_malformed_row_reports_line() {
        let text = "# header\n0,0,0,0,0,0,0,0,1,0\n100,1,2,abc,0,0,0,0,1,0\n";
        let mut path = sample_path();
        let err = read_key_frames(text.as_bytes(), &mut path).unwrap_err();
        assert!(matches!(err, FlythroughError::Parse { line: 3, .. }));
        // Untouched on failure.
        assert_eq!(path.num_key_frames(), 2);
        assert_eq!(path.max_time(), Some(100.0));
    }

    #[test]
    fn test_read_wrong_field_count() {
        let text = "0,1,2,3\n";
        let mut path = CameraPath::new();
        assert!(matches!(
            read_key_frames(text.as_bytes(), &mut path),
            Err(FlythroughError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_read_negative_time() {
        let text = "-5,0,0,0,0,0,0,0,1,0\n";
        let mut path = sample_path();
        assert!(matches!(
            read_key_frames(text.as_bytes(), &mut path),
            Err(FlythroughError::Parse { line: 1, .. })
        ));
        assert_eq!(path.num_key_frames(), 2);
    }

    #[test]
    fn test_save_and_load_file() {
        let file = std::env::temp_dir().join(format!("flythrough_storage_test.{KCSV_EXTENSION}"));
        let original = sample_path();
        save(&file, &original).unwrap();
        let loaded = load(&file).unwrap();
        assert_eq!(loaded.key_frames(), original.key_frames());
        let _ = std::fs::remove_file(&file);
    }
}
