use crate::error::{ParseError, ParseResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default upload size limit (10 MiB). The whole workbook is kept in memory.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Spreadsheet formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Xlsx,
    Xls,
    Csv,
}

impl FileFormat {
    /// Format from a file name's extension (case-insensitive)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            "csv" => Some(FileFormat::Csv),
            _ => None,
        }
    }

    /// Format from the leading bytes. CSV has no signature and is never sniffed.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(ZIP_MAGIC) {
            Some(FileFormat::Xlsx)
        } else if bytes.starts_with(OLE2_MAGIC) {
            Some(FileFormat::Xls)
        } else {
            None
        }
    }

    /// Conventional file extension
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
            FileFormat::Csv => "csv",
        }
    }
}

/// A user-supplied file: raw bytes plus the name it was uploaded under.
#[derive(Debug, Clone)]
pub struct Upload {
    name: String,
    bytes: Vec<u8>,
}

impl Upload {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Upload {
            name: name.into(),
            bytes,
        }
    }

    /// Read an upload from disk, named after the file's name.
    ///
    /// The size is checked against `max_bytes` before anything is read.
    pub fn from_path<P: AsRef<Path>>(path: P, max_bytes: usize) -> ParseResult<Self> {
        let path = path.as_ref();
        check_size(std::fs::metadata(path)?.len(), max_bytes)?;
        let bytes = std::fs::read(path)?;
        Ok(Upload::new(file_name(path), bytes))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File name without its extension
    #[must_use]
    pub fn stem(&self) -> Option<&str> {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
    }

    /// Check size and type, returning the detected format.
    ///
    /// The extension decides when present; otherwise the content signature.
    pub fn validate(&self, max_bytes: usize) -> ParseResult<FileFormat> {
        check_size(self.bytes.len() as u64, max_bytes)?;
        if self.bytes.is_empty() {
            return Err(ParseError::Empty {
                name: self.name.clone(),
            });
        }

        FileFormat::from_name(&self.name)
            .or_else(|| FileFormat::sniff(&self.bytes))
            .ok_or_else(|| ParseError::UnsupportedFormat {
                name: self.name.clone(),
            })
    }
}

/// Reject sizes over `max_bytes` with [`ParseError::TooLarge`]
pub fn check_size(size: u64, max_bytes: usize) -> ParseResult<()> {
    if size > max_bytes as u64 {
        return Err(ParseError::TooLarge {
            size: usize::try_from(size).unwrap_or(usize::MAX),
            limit: max_bytes,
        });
    }
    Ok(())
}

/// Final path component as a string, for naming uploads read from disk
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}
