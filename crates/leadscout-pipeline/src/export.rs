//! CSV export of classified records.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use leadscout_core::ClassifiedRecord;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no businesses to export")]
    Empty,

    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Column order of every export.
pub const CSV_COLUMNS: [&str; 9] = [
    "name",
    "phone",
    "address",
    "categories",
    "rating",
    "review_count",
    "has_website",
    "website_url",
    "lead_priority",
];

/// Field names double as the CSV header and must stay in [`CSV_COLUMNS`] order.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    phone: &'a str,
    address: String,
    categories: String,
    rating: Option<String>,
    review_count: u32,
    has_website: &'static str,
    website_url: &'a str,
    lead_priority: String,
}

impl<'a> From<&'a ClassifiedRecord> for CsvRow<'a> {
    fn from(classified: &'a ClassifiedRecord) -> Self {
        let record = classified.record();
        Self {
            name: record.name(),
            phone: record.phone().unwrap_or("N/A"),
            address: record.display_address(),
            categories: record.display_categories(),
            rating: record.rating().map(|r| r.to_string()),
            review_count: record.review_count(),
            has_website: if classified.has_website() { "Yes" } else { "No" },
            website_url: record.website_url(),
            lead_priority: classified.lead_priority().to_string(),
        }
    }
}

/// Writes a header row plus one row per record.
///
/// # Errors
///
/// Returns [`ExportError::Empty`] for an empty slice (nothing is written), or
/// [`ExportError::Csv`] if writing fails.
pub fn write_csv<W: Write>(writer: W, records: &[ClassifiedRecord]) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(CsvRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders records to an in-memory CSV document.
///
/// # Errors
///
/// See [`write_csv`].
pub fn render_csv(records: &[ClassifiedRecord]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    Ok(buf)
}

/// `businesses_YYYYMMDD_HHMMSS.csv` for the given instant.
#[must_use]
pub fn export_filename(at: DateTime<Local>) -> String {
    format!("businesses_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Writes timestamped CSV files into an export directory.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `records` to a new file and returns its path.
    ///
    /// The directory is created on first use. When a file with the same
    /// timestamp already exists a `_<n>` suffix is appended.
    ///
    /// # Errors
    ///
    /// - [`ExportError::Empty`] if `records` is empty; no file is created.
    /// - [`ExportError::Io`] if the directory or file cannot be created.
    /// - [`ExportError::Csv`] if writing a row fails.
    pub fn export(&self, records: &[ClassifiedRecord]) -> Result<PathBuf, ExportError> {
        self.export_at(records, Local::now())
    }

    /// Same as [`CsvExporter::export`] with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// See [`CsvExporter::export`].
    pub fn export_at(
        &self,
        records: &[ClassifiedRecord],
        at: DateTime<Local>,
    ) -> Result<PathBuf, ExportError> {
        if records.is_empty() {
            return Err(ExportError::Empty);
        }

        fs::create_dir_all(&self.dir)?;
        let filename = export_filename(at);
        let (path, file) = self.create_unique(&filename)?;

        write_or_discard(&path, file, records)?;
        tracing::info!(path = %path.display(), rows = records.len(), "CSV export written");
        Ok(path)
    }

    fn create_unique(&self, filename: &str) -> Result<(PathBuf, fs::File), ExportError> {
        let stem = filename.trim_end_matches(".csv");
        let mut candidate = self.dir.join(filename);
        let mut n = 0_u32;
        loop {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    n += 1;
                    candidate = self.dir.join(format!("{stem}_{n}.csv"));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Writes `records` through `writer`, removing the half-written file at
/// `path` if any row or the final flush fails.
fn write_or_discard<W: Write>(
    path: &Path,
    writer: W,
    records: &[ClassifiedRecord],
) -> Result<(), ExportError> {
    write_csv(writer, records).inspect_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "CSV export failed; removing partial file");
        if let Err(remove_err) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %remove_err, "failed to remove partial export");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use leadscout_core::{BusinessRecord, Rating};

    fn classified(name: &str, website: &str, rating: Option<f64>) -> ClassifiedRecord {
        let record = BusinessRecord::new(name)
            .expect("valid name")
            .with_phone("(775) 555-0101")
            .with_address(["12 Oak Ave", "Reno, NV"])
            .with_categories(["Plumbing", "Water Heaters"])
            .with_rating(rating.and_then(Rating::new))
            .with_review_count(42)
            .with_website_url(website);
        let has_website = !website.is_empty();
        ClassifiedRecord::new(record, has_website)
    }

    #[test]
    fn header_matches_column_order() {
        let csv = render_csv(&[classified("A", "", None)]).expect("renders");
        let text = String::from_utf8(csv).expect("utf8");
        assert_eq!(text.lines().next(), Some(CSV_COLUMNS.join(",").as_str()));
    }

    #[test]
    fn rows_render_flags_and_joined_fields() {
        let csv = render_csv(&[
            classified("No Site Plumbing", "", Some(4.0)),
            classified("Has Site Plumbing", "https://hassite.example", None),
        ])
        .expect("renders");
        let text = String::from_utf8(csv).expect("utf8");
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "No Site Plumbing,(775) 555-0101,\"12 Oak Ave, Reno, NV\",\"Plumbing, Water Heaters\",4.0,42,No,,HIGH"
        );
        assert_eq!(
            lines[2],
            "Has Site Plumbing,(775) 555-0101,\"12 Oak Ave, Reno, NV\",\"Plumbing, Water Heaters\",,42,Yes,https://hassite.example,LOW"
        );
    }

    #[test]
    fn missing_phone_renders_not_available() {
        let record = BusinessRecord::new("Quiet").expect("valid name");
        let csv = render_csv(&[ClassifiedRecord::new(record, false)]).expect("renders");
        let text = String::from_utf8(csv).expect("utf8");
        assert!(text.lines().nth(1).is_some_and(|l| l.starts_with("Quiet,N/A,")));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(render_csv(&[]), Err(ExportError::Empty)));
    }

    struct BrokenDisk;

    impl Write for BrokenDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }

    #[test]
    fn failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("businesses_20240309_140507.csv");
        fs::write(&path, "Business Name,").expect("seed partial file");

        let result = write_or_discard(&path, BrokenDisk, &[classified("A", "", None)]);

        assert!(matches!(result, Err(ExportError::Io(_) | ExportError::Csv(_))));
        assert!(!path.exists());
    }

    #[test]
    fn filename_uses_timestamp() {
        let at = Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .expect("unambiguous local time");
        assert_eq!(export_filename(at), "businesses_20240309_140507.csv");
    }
}
