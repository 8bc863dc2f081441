use crate::error::PipelineError;
use anyhow::{Context, Result};
use encoding_rs::{SHIFT_JIS, UTF_8};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// One entry in the decoder's try-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict UTF-8, leading byte-order mark removed if present.
    Utf8Sig,
    /// Strict Shift_JIS. encoding_rs maps this label to Windows-31J (CP932).
    ShiftJis,
    /// UTF-8 with U+FFFD replacement. Never fails.
    Utf8Lossy,
}

/// Order matters: a wrong-but-successful decode silently corrupts text.
pub const DEFAULT_CANDIDATES: &[TextEncoding] = &[
    TextEncoding::Utf8Sig,
    TextEncoding::ShiftJis,
    TextEncoding::Utf8Lossy,
];

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::ShiftJis => "cp932",
            TextEncoding::Utf8Lossy => "utf-8 (lossy)",
        }
    }

    fn try_decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(body)
            }
            TextEncoding::ShiftJis => {
                SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::Utf8Lossy => Some(UTF_8.decode_with_bom_removal(bytes).0),
        }
    }
}

/// Decodes with the first candidate that succeeds, returning it alongside the text.
pub fn decode_with(
    bytes: &[u8],
    candidates: &[TextEncoding],
) -> std::result::Result<(String, TextEncoding), String> {
    for candidate in candidates {
        if let Some(text) = candidate.try_decode(bytes) {
            return Ok((text.into_owned(), *candidate));
        }
    }
    Err(candidates
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", "))
}

/// Reads `path` and decodes it with [`DEFAULT_CANDIDATES`].
pub fn decode_file(path: &Path) -> Result<String> {
    decode_file_with(path, DEFAULT_CANDIDATES)
}

pub fn decode_file_with(path: &Path, candidates: &[TextEncoding]) -> Result<String> {
    let raw = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    match decode_with(&raw, candidates) {
        Ok((text, encoding)) => {
            tracing::debug!(path = %path.display(), encoding = encoding.name(), "Decoded file");
            Ok(text)
        }
        Err(tried) => Err(PipelineError::Decode {
            path: path.to_path_buf(),
            tried,
        }
        .into()),
    }
}
