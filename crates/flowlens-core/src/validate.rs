//! Upload validation: size and type checks that run before any parsing.

use crate::{Error, Result};

/// Maximum accepted upload size.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub const MIME_CSV: &str = "text/csv";
pub const MIME_PLAIN: &str = "text/plain";
pub const MIME_XLS: &str = "application/vnd.ms-excel";
pub const MIME_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Infers a MIME type from a file name, for callers that only have a path.
pub fn mime_for_filename(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".csv") {
        MIME_CSV
    } else if lower.ends_with(".xls") {
        MIME_XLS
    } else if lower.ends_with(".xlsx") {
        MIME_XLSX
    } else if lower.ends_with(".txt") {
        MIME_PLAIN
    } else {
        "application/octet-stream"
    }
}

/// Rejects oversize or unsupported uploads.
///
/// Spreadsheet types are part of the accepted upload surface but have no
/// parser behind them; they are rejected here with an explicit message rather
/// than failing later with a parse error.
pub fn validate_upload(filename: &str, mime_type: &str, size_bytes: u64) -> Result<()> {
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(Error::validation("file is too large. Maximum size is 5MB."));
    }
    match mime_type {
        MIME_CSV | MIME_PLAIN => Ok(()),
        MIME_XLS | MIME_XLSX => Err(Error::validation(
            "spreadsheet files are not supported, use CSV.",
        )),
        _ => {
            // Some clients send text files with a generic MIME type; fall back
            // to the extension the way the upload endpoint does.
            let lower = filename.to_ascii_lowercase();
            if lower.ends_with(".txt") || lower.ends_with(".csv") {
                Ok(())
            } else {
                Err(Error::validation(
                    "invalid file type. Please upload a CSV or TXT file.",
                ))
            }
        }
    }
}
