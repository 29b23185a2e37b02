//! Headerless 8-bit height files: `size * size` bytes, row-major.

use std::fs;
use std::path::Path;

use nebula_roam::HeightField;
use tracing::info;

use crate::error::TerrainError;

/// Load a `size x size` raw height file.
pub fn load_raw(path: &Path, size: usize) -> Result<HeightField, TerrainError> {
    let bytes = fs::read(path).map_err(|source| TerrainError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let expected = size * size;
    if bytes.len() != expected {
        return Err(TerrainError::SizeMismatch {
            path: path.to_path_buf(),
            size,
            expected,
            actual: bytes.len(),
        });
    }
    let field = HeightField::from_samples(size, bytes)?;
    info!(path = %path.display(), size, "loaded raw height field");
    Ok(field)
}

/// Write `field` as a raw height file.
pub fn save_raw(path: &Path, field: &HeightField) -> Result<(), TerrainError> {
    fs::write(path, field.samples()).map_err(|source| TerrainError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_roam::HeightFieldError;

    #[test]
    fn test_save_then_load_preserves_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.raw");
        let field = HeightField::from_fn(16, |x, y| (x * 16 + y) as u8);

        save_raw(&path, &field).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 256);
        let loaded = load_raw(&path, 16).unwrap();
        assert_eq!(loaded, field);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.raw");
        fs::write(&path, vec![0u8; 100]).unwrap();

        let err = load_raw(&path, 16).unwrap_err();
        match err {
            TerrainError::SizeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, 256);
                assert_eq!(actual, 100);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.raw");
        fs::write(&path, b"").unwrap();
        assert!(matches!(
            load_raw(&path, 0),
            Err(TerrainError::HeightField(HeightFieldError::Empty))
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.raw");
        let err = load_raw(&path, 8).unwrap_err();
        assert!(matches!(err, TerrainError::Io { .. }));
        assert!(err.to_string().contains("missing.raw"));
    }
}
