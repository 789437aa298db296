use std::path::{Path, PathBuf};

use leadops_core::Lead;

use crate::persist::{AtomicFileWriter, PersistError};

pub const CSV_HEADERS: [&str; 8] = [
    "Name", "Address", "Phone", "Website", "Email", "Country", "City", "Keyword",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Renders leads as CSV text. Absent fields keep the text the server sent, so a
/// sentinel such as "No website" survives the export and a missing value is
/// an empty cell.
pub fn leads_to_csv(leads: &[Lead]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;
    for lead in leads {
        writer.write_record([
            lead.name.raw_text(),
            lead.address.raw_text(),
            lead.phone.raw_text(),
            lead.website.raw_text(),
            lead.email.raw_text(),
            lead.country.raw_text(),
            lead.city.raw_text(),
            lead.keyword.raw_text(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn write_leads_csv(dir: &Path, filename: &str, leads: &[Lead]) -> Result<PathBuf, ExportError> {
    let text = leads_to_csv(leads)?;
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    Ok(writer.write(filename, &text)?)
}
