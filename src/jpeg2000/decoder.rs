//! JPEG 2000 header decompressor.
//!
//! `J2kDecompressor` is the decoder state bound to one codec variant. It is
//! configured once with a [`DecoderConfig`] and then reads the header of a
//! memory stream, dispatching to the JP2 box reader or directly to the
//! codestream parser.

use super::image::{ColorSpace, ImageHeader};
use super::jp2::Jp2Reader;
use super::parser::J2kParser;
use crate::codec::CodecVariant;
use crate::coding_parameters::DecoderConfig;
use crate::error::{HeaderError, ProbeError};
use crate::memory_stream::MemoryStream;

/// Grammar a decompressor expects its input to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Codestream,
    Jp2,
}

#[derive(Debug)]
pub struct J2kDecompressor {
    variant: CodecVariant,
    grammar: Grammar,
    config: DecoderConfig,
}

impl J2kDecompressor {
    /// Creates a decompressor for `variant`.
    ///
    /// Only raw codestreams and JP2 files have a decompressor. JPIP streams
    /// and JPX files are rejected.
    pub fn new(variant: CodecVariant) -> Result<Self, ProbeError> {
        let grammar = match variant {
            CodecVariant::J2k => Grammar::Codestream,
            CodecVariant::Jp2 => Grammar::Jp2,
            CodecVariant::Jpt | CodecVariant::Jpp | CodecVariant::Jpx => {
                return Err(ProbeError::CodecUnavailable(variant));
            }
        };
        Ok(Self {
            variant,
            grammar,
            config: DecoderConfig::default(),
        })
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn setup(&mut self, config: &DecoderConfig) -> Result<(), ProbeError> {
        config.validate()?;
        self.config = *config;
        Ok(())
    }

    pub fn read_header(&mut self, stream: &mut MemoryStream<'_>) -> Result<ImageHeader, HeaderError> {
        let reduce = self.config.reduce_factor;
        let mut image = match self.grammar {
            Grammar::Codestream => J2kParser::new(stream, reduce).read_header(),
            Grammar::Jp2 => Jp2Reader::new(stream, reduce).read_header(),
        }
        .inspect_err(|e| log::error!("{:?} header: {}", self.variant, e))?;

        if image.color_space == ColorSpace::Unspecified && image.icc_profile.is_none() {
            if let Some(color_space) = self.config.default_color_space {
                image.color_space = color_space;
            }
        }

        let layers = image.cod.as_ref().map_or(0, |cod| cod.number_of_layers as u32);
        image.reduce_factor = reduce;
        image.decoded_layers = match self.config.max_quality_layers {
            0 => layers,
            max => max.min(layers),
        };

        log::info!(
            "{:?} header: {}x{}, {} components, color space {:?}",
            self.variant,
            image.width(),
            image.height(),
            image.component_count(),
            image.color_space
        );
        Ok(image)
    }
}
