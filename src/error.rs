use crate::codec::CodecVariant;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

/// Outcome of a header probe as reported across the C boundary.
///
/// The four values are mutually exclusive and only identify the stage that
/// failed. `HeaderParseOrStructureInvalid` covers both a header that could not
/// be parsed and a header that declares no components; use [`ProbeError`] to
/// tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum StatusCode {
    Success = 0,
    UnsupportedOrUnavailableCodec = 1,
    DecoderSetupFailed = 2,
    HeaderParseOrStructureInvalid = 3,
}

impl StatusCode {
    pub fn is_success(self) -> bool {
        self == StatusCode::Success
    }
}

impl<T> From<&Result<T, ProbeError>> for StatusCode {
    fn from(result: &Result<T, ProbeError>) -> Self {
        match result {
            Ok(_) => StatusCode::Success,
            Err(e) => e.status(),
        }
    }
}

/// Structural problems found while reading a JP2 container or a codestream
/// main header.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    #[error("Unexpected end of stream")]
    UnexpectedEndOfStream,
    #[error("Seek position {0} is out of range")]
    SeekOutOfRange(u64),
    #[error("Start of codestream marker not found")]
    StartOfCodestreamNotFound,
    #[error("Expected a marker, found byte {0:#04x}")]
    MarkerStartByteNotFound(u8),
    #[error("Marker {0:#06x} is not valid in the main header")]
    UnexpectedMarker(u16),
    #[error("Image and tile size marker must follow the start of codestream")]
    ImageAndTileSizeNotFirst,
    #[error("Duplicate image and tile size marker")]
    DuplicateImageAndTileSize,
    #[error("Invalid length {length} for marker segment {marker:#06x}")]
    InvalidMarkerSegmentSize { marker: u16, length: u16 },
    #[error("Invalid image and tile size segment: {0}")]
    InvalidImageAndTileSize(&'static str),
    #[error("Invalid coding style segment: {0}")]
    InvalidCodingStyle(&'static str),
    #[error("Invalid quantization segment: {0}")]
    InvalidQuantization(&'static str),
    #[error("Component index {index} out of range for {count} components")]
    InvalidComponentIndex { index: u16, count: u16 },
    #[error("Required coding style default marker not found in main header")]
    CodingStyleDefaultNotFound,
    #[error("Required quantization default marker not found in main header")]
    QuantizationDefaultNotFound,
    #[error("Main header ended before the first tile-part")]
    StartOfTileNotFound,
    #[error("Reduce factor {reduce} is not lower than the {resolutions} available resolutions")]
    ReduceFactorTooHigh { reduce: u32, resolutions: u32 },
    #[error("JP2 signature box not found")]
    Jp2SignatureNotFound,
    #[error("File type box must be the second box")]
    FileTypeBoxNotFound,
    #[error("JP2 header box required before the codestream")]
    Jp2HeaderBoxNotFound,
    #[error("Image header box must be the first box in the JP2 header")]
    ImageHeaderBoxNotFound,
    #[error("Invalid image header box")]
    InvalidImageHeaderBox,
    #[error("Invalid length {length} for box {box_type:?}")]
    InvalidBoxLength { box_type: [u8; 4], length: u64 },
    #[error("Contiguous codestream box not found")]
    CodestreamBoxNotFound,
}

/// Failure of one stage of the header probe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Memory stream could not be created: {0}")]
    StreamInit(&'static str),
    #[error("Unknown codec format {0}")]
    UnknownCodec(i32),
    #[error("No decompressor available for {0:?}")]
    CodecUnavailable(CodecVariant),
    #[error("Setting up the decoder failed: {0}")]
    DecoderSetup(&'static str),
    #[error("Reading the header failed: {0}")]
    HeaderParse(#[from] HeaderError),
    #[error("Header declares no components")]
    NoComponents,
}

impl ProbeError {
    /// Maps the error onto the coarse status domain.
    pub fn status(&self) -> StatusCode {
        match self {
            ProbeError::UnknownCodec(_) | ProbeError::CodecUnavailable(_) => {
                StatusCode::UnsupportedOrUnavailableCodec
            }
            ProbeError::DecoderSetup(_) => StatusCode::DecoderSetupFailed,
            // An empty buffer surfaces as an unreadable header.
            ProbeError::StreamInit(_) | ProbeError::HeaderParse(_) | ProbeError::NoComponents => {
                StatusCode::HeaderParseOrStructureInvalid
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_values() {
        assert_eq!(i32::from(StatusCode::Success), 0);
        assert_eq!(i32::from(StatusCode::UnsupportedOrUnavailableCodec), 1);
        assert_eq!(i32::from(StatusCode::DecoderSetupFailed), 2);
        assert_eq!(i32::from(StatusCode::HeaderParseOrStructureInvalid), 3);
        assert_eq!(StatusCode::try_from(2).ok(), Some(StatusCode::DecoderSetupFailed));
        assert!(StatusCode::try_from(4).is_err());
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            ProbeError::UnknownCodec(42).status(),
            StatusCode::UnsupportedOrUnavailableCodec
        );
        assert_eq!(
            ProbeError::CodecUnavailable(CodecVariant::Jpx).status(),
            StatusCode::UnsupportedOrUnavailableCodec
        );
        assert_eq!(
            ProbeError::DecoderSetup("bad").status(),
            StatusCode::DecoderSetupFailed
        );
        assert_eq!(
            ProbeError::from(HeaderError::UnexpectedEndOfStream).status(),
            StatusCode::HeaderParseOrStructureInvalid
        );
        assert_eq!(
            ProbeError::NoComponents.status(),
            StatusCode::HeaderParseOrStructureInvalid
        );
        assert_eq!(
            ProbeError::StreamInit("empty").status(),
            StatusCode::HeaderParseOrStructureInvalid
        );
    }

    #[test]
    fn test_status_from_result() {
        let ok: Result<(), ProbeError> = Ok(());
        assert_eq!(StatusCode::from(&ok), StatusCode::Success);
        let err: Result<(), ProbeError> = Err(ProbeError::NoComponents);
        assert_eq!(
            StatusCode::from(&err),
            StatusCode::HeaderParseOrStructureInvalid
        );
    }
}
