pub const MARKER_START_BYTE: u8 = 0xFF;

// Markers below this value are reserved as delimiters and never start a segment.
pub const MINIMUM_SEGMENT_MARKER: u16 = 0xFF30;

// The size in bytes of the segment length field.
pub const SEGMENT_LENGTH_SIZE: usize = 2;

// ISO/IEC 15444-1, A.5.1: Lsiz = 38 + 3 * Csiz.
pub const SIZ_FIXED_LENGTH: u16 = 38;
pub const MAXIMUM_COMPONENT_COUNT: u16 = 16384;
pub const MAXIMUM_COMPONENT_PRECISION: u8 = 38;

// Components are addressed with one byte below this count, two bytes otherwise.
pub const TWO_BYTE_COMPONENT_INDEX_THRESHOLD: u16 = 257;

pub const COD_FIXED_LENGTH: u16 = 12;
pub const MAXIMUM_DECOMPOSITION_LEVELS: u8 = 32;
pub const MAXIMUM_CODEBLOCK_EXPONENT_SUM: u8 = 8;
pub const MAXIMUM_PROGRESSION_ORDER: u8 = 4;

// A codestream carries at most 33 resolution levels (32 decompositions + 1).
pub const MAXIMUM_RESOLUTION_LEVELS: u32 = 33;

// Pcap bit signalling Part 15 (HTJ2K) block coding.
pub const CAP_HTJ2K_BIT: u32 = 1 << 14;

// ISO/IEC 15444-1, I.5.1: the JP2 signature box is always exactly these 12 bytes.
pub const JP2_SIGNATURE_BOX: [u8; 12] = *b"\x00\x00\x00\x0CjP  \r\n\x87\n";

pub const BOX_TYPE_FILE_TYPE: [u8; 4] = *b"ftyp";
pub const BOX_TYPE_JP2_HEADER: [u8; 4] = *b"jp2h";
pub const BOX_TYPE_IMAGE_HEADER: [u8; 4] = *b"ihdr";
pub const BOX_TYPE_COLOUR_SPECIFICATION: [u8; 4] = *b"colr";
pub const BOX_TYPE_CODESTREAM: [u8; 4] = *b"jp2c";

pub const BOX_HEADER_SIZE: u64 = 8;
pub const BOX_EXTENDED_HEADER_SIZE: u64 = 16;
pub const IMAGE_HEADER_BOX_PAYLOAD: u64 = 14;

// The only compression type defined for the ihdr box.
pub const JP2_COMPRESSION_TYPE_WAVELET: u8 = 7;

pub const COLR_METHOD_ENUMERATED: u8 = 1;
pub const COLR_METHOD_RESTRICTED_ICC: u8 = 2;
