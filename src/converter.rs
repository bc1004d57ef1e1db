use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::extractor::{ExtractMode, extract_text};
use crate::input::load_source;
use crate::pack::PackFormat;
use crate::utils::{ConversionJob, ConversionReport, ConvertOptions};

/// FlatBuffers file identifier of a TensorFlow Lite model, at byte offset 4.
const TFLITE_IDENTIFIER: &[u8; 4] = b"TFL3";

/// Convert one source file into one binary file.
///
/// The whole source is extracted before the destination is touched, so a
/// parse or pack failure leaves no output behind. The destination is created
/// or truncated; its parent directories are created if missing.
pub fn convert(
    source: &Path,
    destination: &Path,
    mode: ExtractMode,
    format: PackFormat,
    options: ConvertOptions,
) -> Result<ConversionReport> {
    let text = load_source(source)?;
    let extraction = extract_text(&text, mode, format, options.policy)
        .with_context(|| format!("failed to extract {mode} array from {}", source.display()))?;
    debug_assert_eq!(extraction.bytes.len(), extraction.tokens * format.size());

    if destination.extension().is_some_and(|ext| ext == "tflite") {
        check_tflite_identifier(destination, &extraction.bytes);
    }

    if options.dry_run {
        info!(
            destination = %destination.display(),
            bytes = extraction.bytes.len(),
            "dry-run: skipping write"
        );
    } else {
        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }
        fs::write(destination, &extraction.bytes)
            .with_context(|| format!("failed to write {}", destination.display()))?;
        info!(
            destination = %destination.display(),
            bytes = extraction.bytes.len(),
            tokens = extraction.tokens,
            "wrote binary"
        );
    }

    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| destination.display().to_string());

    Ok(ConversionReport {
        name,
        destination: destination.to_path_buf(),
        mode,
        format,
        tokens: extraction.tokens,
        bytes: extraction.bytes.len(),
        matched_lines: extraction.matched_lines,
        skipped_lines: extraction.skipped_lines,
        written: !options.dry_run,
    })
}

/// Run `jobs` in order. The first failure aborts the batch; outputs of jobs
/// that already completed stay on disk.
pub fn run_jobs(
    jobs: &[ConversionJob],
    source_root: &Path,
    output_dir: &Path,
    options: ConvertOptions,
) -> Result<Vec<ConversionReport>> {
    let mut reports = Vec::with_capacity(jobs.len());
    for (i, job) in jobs.iter().enumerate() {
        let source = source_root.join(&job.source);
        let destination = output_dir.join(&job.name);
        info!(
            job = i + 1,
            total = jobs.len(),
            name = %job.name,
            mode = %job.mode,
            "converting"
        );
        let report = convert(
            &source,
            &destination,
            job.mode,
            job.effective_format(),
            options,
        )
        .with_context(|| format!("job '{}' failed", job.name))?;
        reports.push(report);
    }
    Ok(reports)
}

fn check_tflite_identifier(destination: &Path, bytes: &[u8]) {
    if bytes.get(4..8) != Some(&TFLITE_IDENTIFIER[..]) {
        warn!(
            destination = %destination.display(),
            bytes = bytes.len(),
            "output does not carry the TFL3 identifier; is this really a model array?"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ScanPolicy;
    use tempfile::tempdir;

    #[test]
    fn test_convert_writes_exact_bytes() {
        let tmp = tempdir().expect("tempdir");
        let src = tmp.path().join("model.cc");
        fs::write(&src, "const unsigned char m[] = {\n  0x01, 0xff, 0x00,\n};\n").unwrap();
        let dst = tmp.path().join("out/model.bin");

        let report = convert(
            &src,
            &dst,
            ExtractMode::Hex,
            PackFormat::UNSIGNED_BYTE,
            ConvertOptions::default(),
        )
        .expect("convert");

        assert_eq!(fs::read(&dst).unwrap(), vec![0x01, 0xFF, 0x00]);
        assert_eq!(report.name, "model.bin");
        assert_eq!(report.tokens, 3);
        assert!(report.written);
    }

    #[test]
    fn test_convert_truncates_existing_destination() {
        let tmp = tempdir().expect("tempdir");
        let src = tmp.path().join("data.cc");
        fs::write(&src, "7,\n").unwrap();
        let dst = tmp.path().join("data.data");
        fs::write(&dst, vec![0u8; 64]).unwrap();

        convert(
            &src,
            &dst,
            ExtractMode::Decimal,
            PackFormat::UNSIGNED_BYTE,
            ConvertOptions::default(),
        )
        .expect("convert");
        assert_eq!(fs::read(&dst).unwrap(), vec![7]);
    }

    #[test]
    fn test_convert_dry_run_writes_nothing() {
        let tmp = tempdir().expect("tempdir");
        let src = tmp.path().join("data.cc");
        fs::write(&src, "1, 2,\n").unwrap();
        let dst = tmp.path().join("data.data");

        let report = convert(
            &src,
            &dst,
            ExtractMode::Decimal,
            PackFormat::UNSIGNED_BYTE,
            ConvertOptions {
                dry_run: true,
                policy: ScanPolicy::Lenient,
            },
        )
        .expect("convert");
        assert!(!dst.exists());
        assert!(!report.written);
        assert_eq!(report.bytes, 2);
    }

    #[test]
    fn test_convert_failure_leaves_no_output() {
        let tmp = tempdir().expect("tempdir");
        let src = tmp.path().join("data.cc");
        fs::write(&src, "1, 2,\n300,\n").unwrap();
        let dst = tmp.path().join("data.data");

        let err = convert(
            &src,
            &dst,
            ExtractMode::Decimal,
            PackFormat::UNSIGNED_BYTE,
            ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "got: {err:#}");
        assert!(!dst.exists());
    }

    #[test]
    fn test_run_jobs_stops_at_first_failure() {
        let tmp = tempdir().expect("tempdir");
        let root = tmp.path().join("src");
        let out = tmp.path().join("models");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.cc"), "0x0a,\n").unwrap();
        fs::write(root.join("c.cc"), "0x0c,\n").unwrap();

        let jobs = vec![
            ConversionJob::new("a.data", "a.cc", ExtractMode::Hex),
            ConversionJob::new("b.data", "missing.cc", ExtractMode::Hex),
            ConversionJob::new("c.data", "c.cc", ExtractMode::Hex),
        ];
        let err = run_jobs(&jobs, &root, &out, ConvertOptions::default()).unwrap_err();

        assert!(format!("{err:#}").contains("job 'b.data' failed"), "got: {err:#}");
        assert_eq!(fs::read(out.join("a.data")).unwrap(), vec![0x0a]);
        assert!(!out.join("b.data").exists());
        assert!(!out.join("c.data").exists());
    }

    #[test]
    fn test_tflite_identifier_check_is_not_fatal() {
        let tmp = tempdir().expect("tempdir");
        let src = tmp.path().join("model.cc");
        fs::write(&src, "0x00, 0x01,\n").unwrap();
        let dst = tmp.path().join("model.tflite");

        convert(
            &src,
            &dst,
            ExtractMode::Hex,
            PackFormat::UNSIGNED_BYTE,
            ConvertOptions::default(),
        )
        .expect("non-model payload still converts");
        assert_eq!(fs::read(&dst).unwrap(), vec![0x00, 0x01]);
    }
}
