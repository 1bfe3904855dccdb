//! Codec variants and the backend seam the header probe runs against.

use crate::ImageInfo;
use crate::coding_parameters::DecoderConfig;
use crate::constants::JP2_SIGNATURE_BOX;
use crate::error::ProbeError;
use crate::jpeg2000::decoder::J2kDecompressor;
use crate::jpeg2000::image::ImageHeader;
use crate::memory_stream::{MemoryStream, StreamDirection};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Container or bitstream grammar a decompressor is created for.
///
/// The discriminants are the OpenJPEG codec format values, so raw tags coming
/// from C callers convert with `CodecVariant::try_from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum CodecVariant {
    /// JPEG 2000 codestream.
    J2k = 0,
    /// JPT-stream (JPEG 2000, JPIP)
    Jpt = 1,
    /// JP2 file format.
    Jp2 = 2,
    /// JPP-stream (JPEG 2000, JPIP)
    Jpp = 3,
    /// JPX file format (JPEG 2000 Part-2)
    Jpx = 4,
}

impl CodecVariant {
    /// Guesses the variant from the first bytes of `input`.
    pub fn sniff(input: &[u8]) -> Option<CodecVariant> {
        if input.starts_with(&[0xFF, 0x4F, 0xFF, 0x51]) {
            Some(CodecVariant::J2k)
        } else if input.starts_with(&JP2_SIGNATURE_BOX) {
            Some(CodecVariant::Jp2)
        } else {
            None
        }
    }
}

/// Parsed header handed back by a backend.
pub trait ImageDescriptor {
    fn component_count(&self) -> u32;
    fn summary(&self) -> ImageInfo;
}

/// The operations the header probe needs from a codec implementation.
///
/// Every handle type releases its resources when dropped, so a backend only
/// has to acquire; the probe decides when each handle goes away.
pub trait CodecBackend {
    type Stream<'a>;
    type Codec;
    type Image: ImageDescriptor;

    fn create_stream<'a>(
        &self,
        input: &'a [u8],
        direction: StreamDirection,
    ) -> Result<Self::Stream<'a>, ProbeError>;

    fn create_decompress(&self, variant: CodecVariant) -> Result<Self::Codec, ProbeError>;

    fn setup_decoder(&self, codec: &mut Self::Codec, config: &DecoderConfig) -> Result<(), ProbeError>;

    fn read_header(
        &self,
        codec: &mut Self::Codec,
        stream: &mut Self::Stream<'_>,
    ) -> Result<Self::Image, ProbeError>;
}

/// The pure Rust JPEG 2000 header reader of this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl CodecBackend for NativeBackend {
    type Stream<'a> = MemoryStream<'a>;
    type Codec = J2kDecompressor;
    type Image = ImageHeader;

    fn create_stream<'a>(
        &self,
        input: &'a [u8],
        direction: StreamDirection,
    ) -> Result<MemoryStream<'a>, ProbeError> {
        MemoryStream::new(input, direction)
    }

    fn create_decompress(&self, variant: CodecVariant) -> Result<J2kDecompressor, ProbeError> {
        J2kDecompressor::new(variant)
    }

    fn setup_decoder(&self, codec: &mut J2kDecompressor, config: &DecoderConfig) -> Result<(), ProbeError> {
        codec.setup(config)
    }

    fn read_header(
        &self,
        codec: &mut J2kDecompressor,
        stream: &mut MemoryStream<'_>,
    ) -> Result<ImageHeader, ProbeError> {
        Ok(codec.read_header(stream)?)
    }
}

impl ImageDescriptor for ImageHeader {
    fn component_count(&self) -> u32 {
        ImageHeader::component_count(self)
    }

    fn summary(&self) -> ImageInfo {
        ImageInfo {
            x_origin: self.x_origin,
            y_origin: self.y_origin,
            width: self.width(),
            height: self.height(),
            reduced_width: self.reduced_width(),
            reduced_height: self.reduced_height(),
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            tiles_across: self.tiles_across(),
            tiles_down: self.tiles_down(),
            components: self.components.clone(),
            decomposition_levels: self.cod.as_ref().map(|cod| cod.decomposition_levels),
            quality_layers: self.decoded_layers,
            color_space: self.color_space,
            has_icc_profile: self.icc_profile.is_some(),
            is_htj2k: self.is_htj2k(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_tags() {
        assert_eq!(CodecVariant::try_from(0).ok(), Some(CodecVariant::J2k));
        assert_eq!(CodecVariant::try_from(2).ok(), Some(CodecVariant::Jp2));
        assert_eq!(i32::from(CodecVariant::Jpx), 4);
        assert!(CodecVariant::try_from(-1).is_err());
        assert!(CodecVariant::try_from(5).is_err());
    }

    #[test]
    fn test_sniff() {
        assert_eq!(
            CodecVariant::sniff(&[0xFF, 0x4F, 0xFF, 0x51, 0x00]),
            Some(CodecVariant::J2k)
        );
        assert_eq!(
            CodecVariant::sniff(b"\x00\x00\x00\x0CjP  \r\n\x87\n\x00\x00"),
            Some(CodecVariant::Jp2)
        );
        assert_eq!(CodecVariant::sniff(&[0xFF, 0xD8, 0xFF]), None);
        assert_eq!(CodecVariant::sniff(&[]), None);
    }
}
