use crate::constants::MAXIMUM_RESOLUTION_LEVELS;
use crate::error::ProbeError;
use crate::jpeg2000::image::ColorSpace;

/// Decoding parameters applied to a decompressor before its header is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderConfig {
    /// Number of highest resolution levels to discard. The image is
    /// effectively divided by 2 to the power of this value.
    pub reduce_factor: u32,
    /// Maximum number of quality layers to decode, 0 for all of them.
    pub max_quality_layers: u32,
    /// Colour space assumed when the container leaves it unspecified.
    pub default_color_space: Option<ColorSpace>,
}

impl DecoderConfig {
    pub fn with_reduce_factor(mut self, reduce_factor: u32) -> Self {
        self.reduce_factor = reduce_factor;
        self
    }

    pub fn with_max_quality_layers(mut self, max_quality_layers: u32) -> Self {
        self.max_quality_layers = max_quality_layers;
        self
    }

    pub fn with_default_color_space(mut self, color_space: ColorSpace) -> Self {
        self.default_color_space = Some(color_space);
        self
    }

    pub fn validate(&self) -> Result<(), ProbeError> {
        if self.reduce_factor >= MAXIMUM_RESOLUTION_LEVELS {
            return Err(ProbeError::DecoderSetup(
                "reduce factor exceeds the maximum number of resolution levels",
            ));
        }
        if let Some(ColorSpace::Unknown(_) | ColorSpace::Unspecified) = self.default_color_space {
            return Err(ProbeError::DecoderSetup(
                "default colour space must be a concrete colour space",
            ));
        }
        Ok(())
    }
}
