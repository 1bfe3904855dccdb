//! JPEG 2000 Codestream Parser.
//!
//! Reads the main header (SOC up to the first SOT) of a codestream and turns
//! its marker segments into an [`ImageHeader`]. Tile-part data is never read.

use super::image::{Capabilities, CodingStyle, ComponentInfo, ImageHeader, Quantization, RegionOfInterest};
use crate::constants::{
    COD_FIXED_LENGTH, MARKER_START_BYTE, MAXIMUM_CODEBLOCK_EXPONENT_SUM, MAXIMUM_COMPONENT_COUNT,
    MAXIMUM_COMPONENT_PRECISION, MAXIMUM_DECOMPOSITION_LEVELS, MAXIMUM_PROGRESSION_ORDER,
    MINIMUM_SEGMENT_MARKER, SEGMENT_LENGTH_SIZE, SIZ_FIXED_LENGTH,
    TWO_BYTE_COMPONENT_INDEX_THRESHOLD,
};
use crate::error::HeaderError;
use crate::jpeg_marker_code::J2kMarkerCode;
use crate::memory_stream::MemoryStream;

/// A parser that transforms raw J2K marker segments into structured metadata.
pub struct J2kParser<'a, 'b> {
    stream: &'b mut MemoryStream<'a>,
    reduce_factor: u32,
    pub image: ImageHeader,
}

impl<'a, 'b> J2kParser<'a, 'b> {
    pub fn new(stream: &'b mut MemoryStream<'a>, reduce_factor: u32) -> Self {
        Self {
            stream,
            reduce_factor,
            image: ImageHeader::default(),
        }
    }

    /// Parses the main header and returns the image description.
    ///
    /// On success the stream is positioned right after the first SOT marker.
    pub fn read_header(mut self) -> Result<ImageHeader, HeaderError> {
        self.parse_main_header()?;
        Ok(self.image)
    }

    pub fn parse_main_header(&mut self) -> Result<(), HeaderError> {
        let soc = self.stream.read_u16()?;
        if soc != J2kMarkerCode::StartOfCodestream.code() {
            return Err(HeaderError::StartOfCodestreamNotFound);
        }

        if self.read_marker()? != J2kMarkerCode::ImageAndTileSize.code() {
            return Err(HeaderError::ImageAndTileSizeNotFirst);
        }
        self.parse_siz()?;

        loop {
            if self.stream.remaining() == 0 {
                return Err(HeaderError::StartOfTileNotFound);
            }
            let code = self.read_marker()?;
            let Ok(marker) = J2kMarkerCode::try_from((code & 0xFF) as u8) else {
                if code < MINIMUM_SEGMENT_MARKER {
                    return Err(HeaderError::UnexpectedMarker(code));
                }
                log::warn!("skipping unknown marker {:#06x} in main header", code);
                self.skip_segment(code)?;
                continue;
            };

            match marker {
                J2kMarkerCode::StartOfTile => break,
                J2kMarkerCode::ImageAndTileSize => {
                    return Err(HeaderError::DuplicateImageAndTileSize);
                }
                J2kMarkerCode::CodingStyleDefault => self.parse_cod()?,
                J2kMarkerCode::CodingStyleComponent => self.parse_coc()?,
                J2kMarkerCode::QuantizationDefault => self.parse_qcd()?,
                J2kMarkerCode::QuantizationComponent => self.parse_qcc()?,
                J2kMarkerCode::RegionOfInterest => self.parse_rgn()?,
                J2kMarkerCode::Capability => self.parse_cap()?,
                J2kMarkerCode::Comment => self.parse_com()?,
                J2kMarkerCode::StartOfCodestream
                | J2kMarkerCode::StartOfData
                | J2kMarkerCode::EndOfCodestream => {
                    return Err(HeaderError::UnexpectedMarker(code));
                }
                J2kMarkerCode::TilePartLengths
                | J2kMarkerCode::PacketLengthMain
                | J2kMarkerCode::CorrespondingProfile
                | J2kMarkerCode::ProgressionOrderChange
                | J2kMarkerCode::PackedPacketHeadersMain
                | J2kMarkerCode::ComponentRegistration => self.skip_segment(code)?,
            }
        }

        if self.image.cod.is_none() {
            return Err(HeaderError::CodingStyleDefaultNotFound);
        }
        if self.image.qcd.is_none() {
            return Err(HeaderError::QuantizationDefaultNotFound);
        }
        Ok(())
    }

    fn read_marker(&mut self) -> Result<u16, HeaderError> {
        let b1 = self.stream.read_u8()?;
        if b1 != MARKER_START_BYTE {
            return Err(HeaderError::MarkerStartByteNotFound(b1));
        }
        let b2 = self.stream.read_u8()?;
        Ok(((b1 as u16) << 8) | b2 as u16)
    }

    /// Reads the Lxxx field and returns the stream position the segment ends at.
    fn read_segment_length(&mut self, marker: u16, minimum: u16) -> Result<u64, HeaderError> {
        let length = self.stream.read_u16()?;
        if length < minimum || (length as usize) < SEGMENT_LENGTH_SIZE {
            return Err(HeaderError::InvalidMarkerSegmentSize { marker, length });
        }
        let payload = (length as usize - SEGMENT_LENGTH_SIZE) as u64;
        if payload > self.stream.remaining() {
            return Err(HeaderError::UnexpectedEndOfStream);
        }
        Ok(self.stream.position() + payload)
    }

    /// Moves to the end of a segment, failing if its fields overran the length.
    fn finish_segment(&mut self, marker: u16, end: u64) -> Result<(), HeaderError> {
        let position = self.stream.position();
        if position > end {
            return Err(HeaderError::InvalidMarkerSegmentSize {
                marker,
                length: (end + SEGMENT_LENGTH_SIZE as u64 - position) as u16,
            });
        }
        self.stream.seek(end)
    }

    fn skip_segment(&mut self, marker: u16) -> Result<(), HeaderError> {
        let end = self.read_segment_length(marker, SEGMENT_LENGTH_SIZE as u16)?;
        self.stream.seek(end)
    }

    fn read_component_index(&mut self) -> Result<u16, HeaderError> {
        let count = self.image.component_count() as u16;
        let index = if count < TWO_BYTE_COMPONENT_INDEX_THRESHOLD {
            self.stream.read_u8()? as u16
        } else {
            self.stream.read_u16()?
        };
        if index >= count {
            return Err(HeaderError::InvalidComponentIndex { index, count });
        }
        Ok(index)
    }

    fn check_reduce_factor(&self, resolutions: u32) -> Result<(), HeaderError> {
        if self.reduce_factor >= resolutions {
            return Err(HeaderError::ReduceFactorTooHigh {
                reduce: self.reduce_factor,
                resolutions,
            });
        }
        Ok(())
    }

    pub fn parse_siz(&mut self) -> Result<(), HeaderError> {
        let marker = J2kMarkerCode::ImageAndTileSize.code();
        let len = self.stream.read_u16()?;
        if len < SIZ_FIXED_LENGTH {
            return Err(HeaderError::InvalidMarkerSegmentSize {
                marker,
                length: len,
            });
        }
        let image = &mut self.image;
        image.profile = self.stream.read_u16()?;
        image.x_extent = self.stream.read_u32()?;
        image.y_extent = self.stream.read_u32()?;
        image.x_origin = self.stream.read_u32()?;
        image.y_origin = self.stream.read_u32()?;

        image.tile_width = self.stream.read_u32()?;
        image.tile_height = self.stream.read_u32()?;
        image.tile_x_origin = self.stream.read_u32()?;
        image.tile_y_origin = self.stream.read_u32()?;

        let comps = self.stream.read_u16()?;
        if len as u32 != SIZ_FIXED_LENGTH as u32 + 3 * comps as u32 {
            return Err(HeaderError::InvalidMarkerSegmentSize {
                marker,
                length: len,
            });
        }
        if comps > MAXIMUM_COMPONENT_COUNT {
            return Err(HeaderError::InvalidImageAndTileSize("too many components"));
        }
        if image.x_extent <= image.x_origin || image.y_extent <= image.y_origin {
            return Err(HeaderError::InvalidImageAndTileSize("empty image area"));
        }
        if image.tile_width == 0 || image.tile_height == 0 {
            return Err(HeaderError::InvalidImageAndTileSize("zero tile size"));
        }
        if image.tile_x_origin > image.x_origin || image.tile_y_origin > image.y_origin {
            return Err(HeaderError::InvalidImageAndTileSize(
                "tile grid starts after the image area",
            ));
        }
        if image.tile_x_origin as u64 + image.tile_width as u64 <= image.x_origin as u64
            || image.tile_y_origin as u64 + image.tile_height as u64 <= image.y_origin as u64
        {
            return Err(HeaderError::InvalidImageAndTileSize(
                "first tile does not overlap the image area",
            ));
        }

        for _ in 0..comps {
            let depth_byte = self.stream.read_u8()?;
            let depth = (depth_byte & 0x7F) + 1;
            let is_signed = (depth_byte & 0x80) != 0;
            let dx = self.stream.read_u8()?;
            let dy = self.stream.read_u8()?;
            if depth > MAXIMUM_COMPONENT_PRECISION {
                return Err(HeaderError::InvalidImageAndTileSize("component precision"));
            }
            if dx == 0 || dy == 0 {
                return Err(HeaderError::InvalidImageAndTileSize("zero subsampling factor"));
            }
            self.image.components.push(ComponentInfo {
                depth,
                is_signed,
                dx,
                dy,
            });
        }

        log::debug!(
            "SIZ: {}x{} at ({}, {}), tiles {}x{}, {} components",
            self.image.width(),
            self.image.height(),
            self.image.x_origin,
            self.image.y_origin,
            self.image.tile_width,
            self.image.tile_height,
            comps
        );
        Ok(())
    }

    pub fn parse_cod(&mut self) -> Result<(), HeaderError> {
        let marker = J2kMarkerCode::CodingStyleDefault.code();
        let end = self.read_segment_length(marker, COD_FIXED_LENGTH)?;
        let len = (end - self.stream.position()) as u16 + SEGMENT_LENGTH_SIZE as u16;

        let scod = self.stream.read_u8()?; // coding style flags
        let sprog = self.stream.read_u8()?; // progression order
        let nlayers = self.stream.read_u16()?; // number of layers
        let mct = self.stream.read_u8()?; // multi-component transform flag
        let decomposition_levels = self.stream.read_u8()?;
        let codeblock_width_exp = self.stream.read_u8()?; // log2 - 2
        let codeblock_height_exp = self.stream.read_u8()?;
        let codeblock_style = self.stream.read_u8()?;
        let transformation = self.stream.read_u8()?;

        // Lcod = 12, plus one byte per resolution level when precincts are user defined.
        let precinct_bytes = if (scod & 0x01) != 0 {
            decomposition_levels as u16 + 1
        } else {
            0
        };
        if len != COD_FIXED_LENGTH + precinct_bytes {
            return Err(HeaderError::InvalidMarkerSegmentSize {
                marker,
                length: len,
            });
        }
        if sprog > MAXIMUM_PROGRESSION_ORDER {
            return Err(HeaderError::InvalidCodingStyle("unknown progression order"));
        }
        if nlayers == 0 {
            return Err(HeaderError::InvalidCodingStyle("zero quality layers"));
        }
        if decomposition_levels > MAXIMUM_DECOMPOSITION_LEVELS {
            return Err(HeaderError::InvalidCodingStyle("too many decomposition levels"));
        }
        if codeblock_width_exp as u16 + codeblock_height_exp as u16
            > MAXIMUM_CODEBLOCK_EXPONENT_SUM as u16
        {
            return Err(HeaderError::InvalidCodingStyle("code-block too large"));
        }
        if transformation > 1 {
            return Err(HeaderError::InvalidCodingStyle("unknown wavelet transformation"));
        }
        let precinct_sizes = self.stream.read_bytes(precinct_bytes as u64)?.to_vec();
        self.finish_segment(marker, end)?;

        let cod = CodingStyle {
            coding_style: scod,
            progression_order: sprog,
            number_of_layers: nlayers,
            mct,
            decomposition_levels,
            codeblock_width_exp,
            codeblock_height_exp,
            codeblock_style,
            transformation,
            precinct_sizes,
        };
        self.check_reduce_factor(cod.resolution_levels())?;
        self.image.cod = Some(cod);
        Ok(())
    }

    pub fn parse_coc(&mut self) -> Result<(), HeaderError> {
        let marker = J2kMarkerCode::CodingStyleComponent.code();
        let end = self.read_segment_length(marker, 9)?;
        let _index = self.read_component_index()?;
        let _scoc = self.stream.read_u8()?;
        let decomposition_levels = self.stream.read_u8()?;
        if decomposition_levels > MAXIMUM_DECOMPOSITION_LEVELS {
            return Err(HeaderError::InvalidCodingStyle("too many decomposition levels"));
        }
        self.check_reduce_factor(decomposition_levels as u32 + 1)?;
        self.finish_segment(marker, end)
    }

    pub fn parse_qcd(&mut self) -> Result<(), HeaderError> {
        let marker = J2kMarkerCode::QuantizationDefault.code();
        let end = self.read_segment_length(marker, 4)?;
        let sqcd = self.stream.read_u8()?; // quantization style flags

        let mut bytes_left = end - self.stream.position();
        let mut step_sizes = Vec::new();
        match sqcd & 0x1F {
            // No quantization: one 8-bit exponent per sub-band.
            0x00 => {
                while bytes_left >= 1 {
                    // Align 8-bit steps (Exp << 3) to 16-bit format (Exp << 11)
                    step_sizes.push((self.stream.read_u8()? as u16) << 8);
                    bytes_left -= 1;
                }
            }
            // Scalar derived: a single value for the LL band.
            0x01 => {
                if bytes_left != 2 {
                    return Err(HeaderError::InvalidQuantization("derived style needs one step size"));
                }
                step_sizes.push(self.stream.read_u16()?);
            }
            // Scalar expounded: one 16-bit value per sub-band.
            0x02 => {
                if bytes_left % 2 != 0 {
                    return Err(HeaderError::InvalidQuantization("odd step size length"));
                }
                while bytes_left >= 2 {
                    step_sizes.push(self.stream.read_u16()?);
                    bytes_left -= 2;
                }
            }
            _ => return Err(HeaderError::InvalidQuantization("unknown quantization style")),
        }
        self.finish_segment(marker, end)?;

        self.image.qcd = Some(Quantization {
            quant_style: sqcd,
            step_sizes,
        });
        Ok(())
    }

    pub fn parse_qcc(&mut self) -> Result<(), HeaderError> {
        let marker = J2kMarkerCode::QuantizationComponent.code();
        let end = self.read_segment_length(marker, 5)?;
        let _index = self.read_component_index()?;
        self.finish_segment(marker, end)
    }

    pub fn parse_cap(&mut self) -> Result<(), HeaderError> {
        let marker = J2kMarkerCode::Capability.code();
        // Must have at least Pcap (4 bytes)
        let end = self.read_segment_length(marker, 6)?;
        let pcap = self.stream.read_u32()?;

        let mut ccap = Vec::new();
        while end - self.stream.position() >= 2 {
            ccap.push(self.stream.read_u16()?);
        }
        self.finish_segment(marker, end)?;

        self.image.cap = Some(Capabilities { pcap, ccap });
        Ok(())
    }

    pub fn parse_rgn(&mut self) -> Result<(), HeaderError> {
        let marker = J2kMarkerCode::RegionOfInterest.code();
        let end = self.read_segment_length(marker, 5)?;
        let component_index = self.read_component_index()?;
        let roi_style = self.stream.read_u8()?;
        let shift_value = self.stream.read_u8()?;
        self.finish_segment(marker, end)?;

        self.image.regions.push(RegionOfInterest {
            component_index,
            roi_style,
            shift_value,
        });
        Ok(())
    }

    pub fn parse_com(&mut self) -> Result<(), HeaderError> {
        let marker = J2kMarkerCode::Comment.code();
        let end = self.read_segment_length(marker, 4)?;
        let registration = self.stream.read_u16()?;
        let text = self.stream.read_bytes(end - self.stream.position())?;
        if registration == 1 {
            self.image.comments.push(text.iter().map(|&b| b as char).collect());
        } else {
            log::debug!("ignoring binary comment of {} bytes", text.len());
        }
        Ok(())
    }
}
