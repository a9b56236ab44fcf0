// ============================================================
// TEXT DECODER
// ============================================================
// Turn uploaded bytes into text with BOM and Latin-1 handling

use encoding_rs::{Encoding, WINDOWS_1252};

use crate::domain::csv::EncodingPolicy;
use crate::domain::error::{AppError, Result};

/// Decoded file content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,

    /// Name of the encoding that produced `text`
    pub encoding: &'static str,

    /// Whether the Windows-1252 fallback was used
    pub used_fallback: bool,
}

/// Decode raw CSV bytes according to `policy`
pub fn decode_text(bytes: &[u8], policy: EncodingPolicy) -> Result<DecodedText> {
    if bytes.is_empty() {
        return Err(AppError::MalformedInput("file is empty".to_string()));
    }

    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        if !had_errors {
            return reject_binary(DecodedText {
                text: text.into_owned(),
                encoding: encoding.name(),
                used_fallback: false,
            });
        }
        if encoding != encoding_rs::UTF_8 {
            return Err(AppError::MalformedInput(format!(
                "file is not valid {}",
                encoding.name()
            )));
        }
    }

    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(text) => reject_binary(DecodedText {
            text: text.to_string(),
            encoding: encoding_rs::UTF_8.name(),
            used_fallback: false,
        }),
        Err(err) => match policy {
            EncodingPolicy::Utf8Only => Err(AppError::MalformedInput(format!(
                "file is not valid UTF-8: {}",
                err
            ))),
            EncodingPolicy::Utf8WithLatin1Fallback => {
                tracing::warn!(
                    "CSV is not valid UTF-8 ({}), decoding as {}",
                    err,
                    WINDOWS_1252.name()
                );
                let (text, _) = WINDOWS_1252.decode_without_bom_handling(body);
                reject_binary(DecodedText {
                    text: text.into_owned(),
                    encoding: WINDOWS_1252.name(),
                    used_fallback: true,
                })
            }
        },
    }
}

fn reject_binary(decoded: DecodedText) -> Result<DecodedText> {
    if decoded.text.contains('\0') {
        return Err(AppError::MalformedInput(
            "file contains NUL bytes and does not look like text".to_string(),
        ));
    }
    Ok(decoded)
}
