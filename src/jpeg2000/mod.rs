//! JPEG 2000 header reading (Part 1, ISO/IEC 15444-1)
//!
//! - `jp2`: JP2 container boxes (Annex I) in front of the codestream.
//! - `parser`: Main header of the codestream (Annex A), up to the first tile-part.
//! - `image`: The parsed header.
//! - `decoder`: Decompressor state bound to a codec variant.

pub mod decoder;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod image;
pub mod jp2;
pub mod parser;
