//! PNG signature check

use crate::error::FormatError;

/// The fixed 8-byte prefix of every PNG stream
pub const PNG_SIGNATURE: [u8; 8] = *b"\x89PNG\r\n\x1a\n";

/// Check that `buf` starts with [`PNG_SIGNATURE`]
///
/// Fails with `BadSignature` at offset 0 for short buffers, otherwise at the
/// first mismatching byte.
pub fn validate_signature(buf: &[u8]) -> Result<(), FormatError> {
    if buf.len() < PNG_SIGNATURE.len() {
        return Err(FormatError::BadSignature { offset: 0 });
    }
    match PNG_SIGNATURE.iter().zip(buf).position(|(a, b)| a != b) {
        Some(pos) => Err(FormatError::BadSignature { offset: pos as u64 }),
        None => Ok(()),
    }
}

/// Detect if this is a PNG stream from its first bytes
pub fn detect(header: &[u8]) -> bool {
    validate_signature(header).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_signature() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&[0, 0, 0, 0]);
        assert!(validate_signature(&data).is_ok());
        assert!(detect(&PNG_SIGNATURE));
    }

    #[test]
    fn test_short_buffer() {
        assert_eq!(
            validate_signature(&PNG_SIGNATURE[..7]),
            Err(FormatError::BadSignature { offset: 0 })
        );
        assert!(validate_signature(&[]).is_err());
    }

    #[test]
    fn test_mismatch_reports_position() {
        let mut data = PNG_SIGNATURE;
        data[5] = b'X';
        assert_eq!(
            validate_signature(&data),
            Err(FormatError::BadSignature { offset: 5 })
        );

        // JPEG magic
        assert!(!detect(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0]));
    }
}
