use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};

use crate::domain::ports::ImageError;

/// Where the image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// `http://` or `https://` URL to download.
    Remote(&'a str),
    /// Base-64 text, with any data-URI prefix already stripped.
    Inline(&'a str),
}

impl<'a> ImageSource<'a> {
    pub fn parse(input: &'a str) -> Result<Self, ImageError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ImageError::Empty);
        }
        if input.starts_with("http://") || input.starts_with("https://") {
            return Ok(Self::Remote(input));
        }
        // "data:image/png;base64,AAAA" -> "AAAA"
        let payload = input.split_once(',').map_or(input, |(_, data)| data);
        Ok(Self::Inline(payload.trim()))
    }
}

/// Standard alphabet; trailing `=` padding is optional.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode an inline payload with the standard base-64 alphabet.
///
/// Line breaks and other ASCII whitespace inside the payload are ignored, as
/// is missing padding.
pub fn decode_inline(payload: &str) -> Result<Vec<u8>, ImageError> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(ImageError::Empty);
    }
    LENIENT
        .decode(compact.as_bytes())
        .map_err(|e| ImageError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_remote() {
        assert_eq!(
            ImageSource::parse("https://img.example/cat.png"),
            Ok(ImageSource::Remote("https://img.example/cat.png"))
        );
        assert_eq!(
            ImageSource::parse(" http://x/y "),
            Ok(ImageSource::Remote("http://x/y"))
        );
    }

    #[test]
    fn data_uri_prefix_is_stripped() {
        assert_eq!(
            ImageSource::parse("data:image/png;base64,aGVsbG8="),
            Ok(ImageSource::Inline("aGVsbG8="))
        );
        assert_eq!(
            ImageSource::parse("aGVsbG8="),
            Ok(ImageSource::Inline("aGVsbG8="))
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(ImageSource::parse("   "), Err(ImageError::Empty));
        assert_eq!(decode_inline(""), Err(ImageError::Empty));
    }

    #[test]
    fn decode_reports_original_bytes() {
        assert_eq!(decode_inline("aGVsbG8=").unwrap(), b"hello");
        assert!(matches!(
            decode_inline("not base64!"),
            Err(ImageError::InvalidPayload(_))
        ));
    }

    #[test]
    fn decode_accepts_unpadded_and_wrapped_payloads() {
        assert_eq!(decode_inline("aGVsbG8").unwrap(), b"hello");
        assert_eq!(decode_inline("aGVs\nbG8=").unwrap(), b"hello");
        assert_eq!(decode_inline("aGVs\r\n bG8").unwrap(), b"hello");
        assert_eq!(decode_inline(" \n\t"), Err(ImageError::Empty));

        let ImageSource::Inline(payload) =
            ImageSource::parse("data:image/png;base64,aGVsbG8").unwrap()
        else {
            panic!("data URI should be inline");
        };
        assert_eq!(decode_inline(payload).unwrap(), b"hello");
    }
}
