//! JP2 Box structure implementation (ISO/IEC 15444-1 Annex I).

use super::image::{ColorSpace, ImageHeader, Jp2ImageHeader};
use super::parser::J2kParser;
use crate::constants::{
    BOX_EXTENDED_HEADER_SIZE, BOX_HEADER_SIZE, BOX_TYPE_CODESTREAM, BOX_TYPE_COLOUR_SPECIFICATION,
    BOX_TYPE_FILE_TYPE, BOX_TYPE_IMAGE_HEADER, BOX_TYPE_JP2_HEADER, COLR_METHOD_ENUMERATED,
    COLR_METHOD_RESTRICTED_ICC, IMAGE_HEADER_BOX_PAYLOAD, JP2_COMPRESSION_TYPE_WAVELET,
    JP2_SIGNATURE_BOX,
};
use crate::error::HeaderError;
use crate::memory_stream::MemoryStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jp2Box {
    pub length: u64,
    pub box_type: [u8; 4],
    pub data_start: u64,
    pub data_end: u64,
}

impl Jp2Box {
    pub fn data_len(&self) -> u64 {
        self.data_end - self.data_start
    }
}

/// Colour information gathered from the jp2h superbox.
#[derive(Debug, Default)]
struct Jp2Header {
    image_header: Jp2ImageHeader,
    color_space: ColorSpace,
    icc_profile: Option<Vec<u8>>,
    has_colour_box: bool,
}

pub struct Jp2Reader<'a, 'b> {
    stream: &'b mut MemoryStream<'a>,
    reduce_factor: u32,
}

impl<'a, 'b> Jp2Reader<'a, 'b> {
    pub fn new(stream: &'b mut MemoryStream<'a>, reduce_factor: u32) -> Self {
        Self {
            stream,
            reduce_factor,
        }
    }

    /// Reads the boxes up to the contiguous codestream and the codestream's
    /// main header.
    pub fn read_header(mut self) -> Result<ImageHeader, HeaderError> {
        self.read_signature()?;

        let end = self.stream.len();
        match self.read_box(end)? {
            Some(b) if b.box_type == BOX_TYPE_FILE_TYPE => self.read_file_type(&b)?,
            _ => return Err(HeaderError::FileTypeBoxNotFound),
        }

        let mut jp2_header: Option<Jp2Header> = None;
        while let Some(b) = self.read_box(end)? {
            match b.box_type {
                BOX_TYPE_JP2_HEADER if jp2_header.is_none() => {
                    jp2_header = Some(self.read_jp2_header(&b)?);
                }
                BOX_TYPE_CODESTREAM => {
                    let header = jp2_header.ok_or(HeaderError::Jp2HeaderBoxNotFound)?;
                    return self.read_codestream(&b, header);
                }
                _ => {
                    log::trace!("skipping {} box", String::from_utf8_lossy(&b.box_type));
                    self.stream.seek(b.data_end)?;
                }
            }
        }
        Err(HeaderError::CodestreamBoxNotFound)
    }

    fn read_signature(&mut self) -> Result<(), HeaderError> {
        let signature = self
            .stream
            .read_bytes(JP2_SIGNATURE_BOX.len() as u64)
            .map_err(|_| HeaderError::Jp2SignatureNotFound)?;
        if signature != JP2_SIGNATURE_BOX {
            return Err(HeaderError::Jp2SignatureNotFound);
        }
        Ok(())
    }

    /// Reads the next box header, or `None` when `limit` has been reached.
    /// The stream is left at the start of the box contents.
    pub fn read_box(&mut self, limit: u64) -> Result<Option<Jp2Box>, HeaderError> {
        let start = self.stream.position();
        if start >= limit {
            return Ok(None);
        }

        let mut length = self.stream.read_u32()? as u64;
        let box_type: [u8; 4] = self
            .stream
            .read_bytes(4)?
            .try_into()
            .map_err(|_| HeaderError::UnexpectedEndOfStream)?;

        let mut header_size = BOX_HEADER_SIZE;
        if length == 1 {
            length = self.stream.read_u64()?;
            header_size = BOX_EXTENDED_HEADER_SIZE;
        } else if length == 0 {
            length = limit - start;
        }

        if length < header_size || length > limit - start {
            return Err(HeaderError::InvalidBoxLength { box_type, length });
        }

        Ok(Some(Jp2Box {
            length,
            box_type,
            data_start: start + header_size,
            data_end: start + length,
        }))
    }

    fn read_file_type(&mut self, b: &Jp2Box) -> Result<(), HeaderError> {
        let len = b.data_len();
        if len < 8 || (len - 8) % 4 != 0 {
            return Err(HeaderError::InvalidBoxLength {
                box_type: b.box_type,
                length: b.length,
            });
        }
        let brand = self.stream.read_bytes(4)?;
        let _minor_version = self.stream.read_u32()?;
        let compatible = self.stream.read_bytes(len - 8)?;
        if !compatible.chunks(4).any(|c| c == b"jp2 ") {
            log::warn!(
                "file type {} does not list jp2 compatibility",
                String::from_utf8_lossy(brand)
            );
        }
        Ok(())
    }

    fn read_jp2_header(&mut self, superbox: &Jp2Box) -> Result<Jp2Header, HeaderError> {
        let mut header = Jp2Header::default();

        match self.read_box(superbox.data_end)? {
            Some(b) if b.box_type == BOX_TYPE_IMAGE_HEADER => {
                header.image_header = self.read_image_header(&b)?;
            }
            _ => return Err(HeaderError::ImageHeaderBoxNotFound),
        }

        while let Some(b) = self.read_box(superbox.data_end)? {
            // Readers use the first colr box and ignore the others.
            if b.box_type == BOX_TYPE_COLOUR_SPECIFICATION && !header.has_colour_box {
                self.read_colour_specification(&b, &mut header)?;
            }
            self.stream.seek(b.data_end)?;
        }
        Ok(header)
    }

    fn read_image_header(&mut self, b: &Jp2Box) -> Result<Jp2ImageHeader, HeaderError> {
        if b.data_len() != IMAGE_HEADER_BOX_PAYLOAD {
            return Err(HeaderError::InvalidImageHeaderBox);
        }
        let height = self.stream.read_u32()?;
        let width = self.stream.read_u32()?;
        let component_count = self.stream.read_u16()?;
        let bits_per_component = self.stream.read_u8()?;
        let compression_type = self.stream.read_u8()?;
        let colourspace_unknown = self.stream.read_u8()? != 0;
        let intellectual_property = self.stream.read_u8()? != 0;

        if width == 0 || height == 0 || component_count == 0 {
            return Err(HeaderError::InvalidImageHeaderBox);
        }
        if compression_type != JP2_COMPRESSION_TYPE_WAVELET {
            return Err(HeaderError::InvalidImageHeaderBox);
        }
        Ok(Jp2ImageHeader {
            height,
            width,
            component_count,
            bits_per_component,
            colourspace_unknown,
            intellectual_property,
        })
    }

    fn read_colour_specification(
        &mut self,
        b: &Jp2Box,
        header: &mut Jp2Header,
    ) -> Result<(), HeaderError> {
        let data = self.stream.read_bytes(b.data_len())?;
        if data.len() < 3 {
            return Err(HeaderError::InvalidBoxLength {
                box_type: b.box_type,
                length: b.length,
            });
        }
        match data[0] {
            COLR_METHOD_ENUMERATED => {
                if data.len() < 7 {
                    return Err(HeaderError::InvalidBoxLength {
                        box_type: b.box_type,
                        length: b.length,
                    });
                }
                let enumcs = u32::from_be_bytes([data[3], data[4], data[5], data[6]]);
                header.color_space = ColorSpace::from_enumerated(enumcs);
            }
            COLR_METHOD_RESTRICTED_ICC => {
                header.icc_profile = Some(data[3..].to_vec());
            }
            method => {
                log::warn!("ignoring colour specification method {}", method);
                return Ok(());
            }
        }
        header.has_colour_box = true;
        Ok(())
    }

    fn read_codestream(self, b: &Jp2Box, header: Jp2Header) -> Result<ImageHeader, HeaderError> {
        let mut codestream = self.stream.sub_stream(b.data_len())?;
        let mut image = J2kParser::new(&mut codestream, self.reduce_factor).read_header()?;

        let ihdr = header.image_header;
        if ihdr.component_count as u32 != image.component_count()
            || ihdr.width != image.width()
            || ihdr.height != image.height()
        {
            log::warn!(
                "ihdr declares {}x{} with {} components, codestream has {}x{} with {}",
                ihdr.width,
                ihdr.height,
                ihdr.component_count,
                image.width(),
                image.height(),
                image.component_count()
            );
        }
        image.color_space = header.color_space;
        image.icc_profile = header.icc_profile;
        image.jp2 = Some(ihdr);
        Ok(image)
    }
}
