use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Read a generated C source file in full.
pub fn load_source(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file at {}", path.display()))?;
    info!(path = %path.display(), bytes = text.len(), "loaded source");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_source_reads_text() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("model.cc");
        std::fs::write(&path, "0x01,\n").unwrap();
        assert_eq!(load_source(&path).unwrap(), "0x01,\n");
    }

    #[test]
    fn test_load_source_missing_file_names_path() {
        let err = load_source(Path::new("does/not/exist.cc")).unwrap_err();
        assert!(
            err.to_string().contains("does/not/exist.cc"),
            "got: {err}"
        );
    }
}
