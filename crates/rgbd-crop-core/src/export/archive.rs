//! Single-file zip packaging of an [`ExportBundle`].

use std::io::{Cursor, Write};

use chrono::{DateTime, Datelike, Timelike, Utc};
use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{ExportBundle, ExportError};

impl ExportBundle {
    /// `<folder_name>.zip`
    pub fn zip_file_name(&self) -> String {
        format!("{}.zip", self.folder_name)
    }

    /// Pack every file under `<folder_name>/` into one deflated zip archive.
    ///
    /// Entries are stamped with the bundle's creation time and appear in the
    /// same order as [`ExportBundle::files`].
    pub fn to_zip(&self) -> Result<Vec<u8>, ExportError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, bytes) in self.files() {
            writer.start_file(format!("{}/{}", self.folder_name, path), self.entry_options())?;
            writer.write_all(bytes).map_err(ZipError::from)?;
        }
        let archive = writer.finish()?.into_inner();

        debug!(
            folder = %self.folder_name,
            bytes = archive.len(),
            "Export bundle zipped"
        );
        Ok(archive)
    }

    fn entry_options(&self) -> SimpleFileOptions {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        match zip_time(&self.created_at) {
            Some(modified) => options.last_modified_time(modified),
            None => options,
        }
    }
}

/// Zip timestamps cover 1980..=2107 at two-second resolution; out of range
/// times leave the writer's default.
fn zip_time(t: &DateTime<Utc>) -> Option<zip::DateTime> {
    let year = u16::try_from(t.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        t.month() as u8,
        t.day() as u8,
        t.hour() as u8,
        t.minute() as u8,
        t.second() as u8,
    )
    .ok()
}
