use std::path::{Path, PathBuf};

use crate::extractor::{ExtractMode, ScanPolicy};
use crate::pack::PackFormat;

/// One entry of a conversion manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// File name of the output inside the output directory.
    pub name: String,
    /// Source path, relative to the source root.
    pub source: PathBuf,
    pub mode: ExtractMode,
    /// Overrides the mode's default format.
    pub format: Option<PackFormat>,
}

impl ConversionJob {
    pub fn new(name: &str, source: &str, mode: ExtractMode) -> Self {
        Self {
            name: name.to_string(),
            source: PathBuf::from(source),
            mode,
            format: None,
        }
    }

    pub fn with_format(mut self, format: PackFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn effective_format(&self) -> PackFormat {
        self.format.unwrap_or_else(|| self.mode.default_format())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Extract but do not write.
    pub dry_run: bool,
    pub policy: ScanPolicy,
}

#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub name: String,
    pub destination: PathBuf,
    pub mode: ExtractMode,
    pub format: PackFormat,
    pub tokens: usize,
    pub bytes: usize,
    pub matched_lines: usize,
    pub skipped_lines: usize,
    pub written: bool,
}

/// Render the run summary as a fixed-width table.
pub fn render_summary(reports: &[ConversionReport], output_dir: &Path) -> String {
    let name_width = reports
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0)
        .max("output".len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:<name_width$}  {:<7}  {:<6}  {:>8}  {:>10}  {:>13}  {}\n",
        "output", "mode", "format", "tokens", "bytes", "lines (m/s)", "status"
    ));
    out.push_str(&format!("{}\n", "-".repeat(name_width + 63)));
    for r in reports {
        let status = if r.written { "written" } else { "dry-run" };
        out.push_str(&format!(
            "{:<name_width$}  {:<7}  {:<6}  {:>8}  {:>10}  {:>13}  {}\n",
            r.name,
            r.mode.to_string(),
            r.format.to_string(),
            r.tokens,
            r.bytes,
            format!("{}/{}", r.matched_lines, r.skipped_lines),
            status
        ));
    }
    let total: usize = reports.iter().map(|r| r.bytes).sum();
    out.push_str(&format!(
        "{} file(s), {} byte(s) -> {}\n",
        reports.len(),
        total,
        output_dir.display()
    ));
    out
}

pub fn print_summary(reports: &[ConversionReport], output_dir: &Path) {
    print!("{}", render_summary(reports, output_dir));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(name: &str, bytes: usize, written: bool) -> ConversionReport {
        ConversionReport {
            name: name.to_string(),
            destination: PathBuf::from("models").join(name),
            mode: ExtractMode::Decimal,
            format: PackFormat::LITTLE_ENDIAN_I16,
            tokens: bytes / 2,
            bytes,
            matched_lines: 1,
            skipped_lines: 0,
            written,
        }
    }

    #[test]
    fn test_effective_format_defaults_to_mode() {
        let job = ConversionJob::new("a.data", "a.cc", ExtractMode::Float);
        assert_eq!(job.effective_format(), PackFormat::BIG_ENDIAN_F32);
        let job = job.with_format(PackFormat::UNSIGNED_BYTE);
        assert_eq!(job.effective_format(), PackFormat::UNSIGNED_BYTE);
    }

    #[test]
    fn test_render_summary_lists_every_job() {
        let reports = vec![
            report("yes_1000ms_sample.data", 32000, true),
            report("no.data", 4, false),
        ];
        let table = render_summary(&reports, Path::new("models"));
        assert!(table.contains("yes_1000ms_sample.data"), "got:\n{table}");
        assert!(table.contains("dry-run"), "got:\n{table}");
        assert!(table.contains("<h"), "got:\n{table}");
        assert!(table.contains("2 file(s), 32004 byte(s)"), "got:\n{table}");
        assert!(table.contains("1/0"), "line counts missing:\n{table}");
    }
}
