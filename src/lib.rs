//! In-memory JPEG 2000 header probe.
//!
//! Opens a raw codestream or a JP2 file held in a byte buffer, creates a
//! decompressor for the requested codec variant, applies the default decoder
//! configuration and reads the image header. The probe succeeds when the
//! header is well formed and declares at least one component. Pixel data is
//! never decoded.
//!
//! ```
//! use j2k_probe::{CodecVariant, StatusCode, decode_header, probe_header};
//!
//! assert_eq!(decode_header(&[], CodecVariant::J2k.into()), StatusCode::HeaderParseOrStructureInvalid);
//! assert!(probe_header(b"not a jpeg 2000 file", CodecVariant::Jp2).is_err());
//! ```

pub mod codec;
pub mod coding_parameters;
pub mod constants;
pub mod error;
pub mod ffi;
pub mod jpeg2000;
pub mod jpeg_marker_code;
pub mod memory_stream;
pub mod probe;

pub use codec::{CodecBackend, CodecVariant, ImageDescriptor, NativeBackend};
pub use coding_parameters::DecoderConfig;
pub use error::{HeaderError, ProbeError, StatusCode};
pub use jpeg2000::image::{ColorSpace, ComponentInfo};
pub use memory_stream::{MemoryStream, StreamDirection};
pub use probe::{ProbeStage, decode_header, probe_header, probe_with};

/// Summary of a validated image header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageInfo {
    pub x_origin: u32,
    pub y_origin: u32,
    pub width: u32,
    pub height: u32,
    /// Size after discarding the configured number of resolution levels.
    pub reduced_width: u32,
    pub reduced_height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tiles_across: u32,
    pub tiles_down: u32,
    pub components: Vec<ComponentInfo>,
    pub decomposition_levels: Option<u8>,
    pub quality_layers: u32,
    pub color_space: ColorSpace,
    pub has_icc_profile: bool,
    pub is_htj2k: bool,
}

impl ImageInfo {
    pub fn component_count(&self) -> u32 {
        self.components.len() as u32
    }

    /// Largest component precision in bits.
    pub fn bits_per_sample(&self) -> u8 {
        self.components.iter().map(|c| c.depth).max().unwrap_or(0)
    }
}
