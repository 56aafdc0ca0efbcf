//! Text encodings used by the instrument exports.
//!
//! The offline and online sheets are usually UTF-8 or Latin-1, the kLa
//! exports are UTF-16LE with a byte order mark.

use crate::error::{CultureError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Encodings understood by the loaders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8", alias = "utf8", alias = "UTF-8")]
    Utf8,
    #[serde(
        rename = "utf-16-le",
        alias = "utf-16le",
        alias = "utf16le",
        alias = "UTF-16LE"
    )]
    Utf16Le,
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
}

impl TextEncoding {
    /// Decode raw file bytes, stripping a leading byte order mark
    pub fn decode(&self, bytes: &[u8], path: &Path) -> Result<String> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
                String::from_utf8(bytes.to_vec()).map_err(|e| self.decode_error(path, e))
            }
            TextEncoding::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(self.decode_error(path, "odd number of bytes"));
                }
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
                let decoded = char::decode_utf16(units)
                    .collect::<std::result::Result<String, _>>()
                    .map_err(|e| self.decode_error(path, e))?;
                Ok(decoded
                    .strip_prefix('\u{FEFF}')
                    .map(str::to_string)
                    .unwrap_or(decoded))
            }
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    /// Read and decode a whole file
    pub fn read_to_string(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(CultureError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path)?;
        self.decode(&bytes, path)
    }

    fn decode_error(&self, path: &Path, reason: impl fmt::Display) -> CultureError {
        CultureError::Decode {
            path: path.to_path_buf(),
            encoding: self.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16-le",
            TextEncoding::Latin1 => "latin-1",
        };
        f.write_str(label)
    }
}

/// Encode text as UTF-16LE with a byte order mark, the way the kLa software writes it
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}
