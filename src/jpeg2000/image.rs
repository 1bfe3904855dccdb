use crate::constants::CAP_HTJ2K_BIT;

/// Main-header metadata of a JPEG 2000 image.
///
/// Produced by reading the header of a codestream (and, for JP2 files, the
/// boxes in front of it). Nothing here refers to pixel data.
#[derive(Debug, Clone, Default)]
pub struct ImageHeader {
    /// Rsiz: capabilities / profile of the codestream.
    pub profile: u16,
    /// Horizontal offset of the image area on the reference grid.
    pub x_origin: u32,
    /// Vertical offset of the image area on the reference grid.
    pub y_origin: u32,
    /// Width of the reference grid (Xsiz).
    pub x_extent: u32,
    /// Height of the reference grid (Ysiz).
    pub y_extent: u32,
    /// Width of an individual tile. If it covers the image, there is only one tile.
    pub tile_width: u32,
    /// Height of an individual tile.
    pub tile_height: u32,
    /// Horizontal offset of the first tile on the reference grid.
    pub tile_x_origin: u32,
    /// Vertical offset of the first tile on the reference grid.
    pub tile_y_origin: u32,
    /// Component information (depth, signedness, subsampling) from SIZ.
    pub components: Vec<ComponentInfo>,
    /// Coding Style Default (COD) parameters.
    pub cod: Option<CodingStyle>,
    /// Quantization Default (QCD) parameters.
    pub qcd: Option<Quantization>,
    /// Capability (CAP) marker information.
    pub cap: Option<Capabilities>,
    /// Regions of interest, one per RGN segment.
    pub regions: Vec<RegionOfInterest>,
    /// Latin-1 comments from COM segments.
    pub comments: Vec<String>,
    /// Colour space declared by the container.
    pub color_space: ColorSpace,
    /// ICC profile carried by a JP2 colr box.
    pub icc_profile: Option<Vec<u8>>,
    /// JP2 ihdr box, absent for raw codestreams.
    pub jp2: Option<Jp2ImageHeader>,
    /// Resolution levels the decoder is configured to discard.
    pub reduce_factor: u32,
    /// Number of quality layers the decoder will decode.
    pub decoded_layers: u32,
}

/// Metadata for a single component from the SIZ marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentInfo {
    /// bit depth (1..=38)
    pub depth: u8,
    /// true if signed, false if unsigned
    pub is_signed: bool,
    /// Horizontal subsampling factor
    pub dx: u8,
    /// Vertical subsampling factor
    pub dy: u8,
}

/// Coding Style Default (COD) marker information
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodingStyle {
    pub coding_style: u8,
    pub progression_order: u8,
    pub number_of_layers: u16,
    pub mct: u8,
    pub decomposition_levels: u8,
    pub codeblock_width_exp: u8,
    pub codeblock_height_exp: u8,
    pub codeblock_style: u8,
    pub transformation: u8,
    /// Precinct sizes if defined (Scod bit 0 set).
    /// One byte per resolution level (PPx + PPy<<4).
    pub precinct_sizes: Vec<u8>,
}

impl CodingStyle {
    pub fn resolution_levels(&self) -> u32 {
        self.decomposition_levels as u32 + 1
    }
}

/// Quantization Default (QCD) marker information
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quantization {
    pub quant_style: u8,
    pub step_sizes: Vec<u16>,
}

impl Quantization {
    pub fn guard_bits(&self) -> u8 {
        self.quant_style >> 5
    }
}

/// Capability (CAP) marker information (Part 15)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub pcap: u32,
    pub ccap: Vec<u16>,
}

/// Region of interest signalled by an RGN segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionOfInterest {
    pub component_index: u16,
    pub roi_style: u8,
    pub shift_value: u8,
}

/// Contents of the JP2 image header (ihdr) box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Jp2ImageHeader {
    pub height: u32,
    pub width: u32,
    pub component_count: u16,
    pub bits_per_component: u8,
    pub colourspace_unknown: bool,
    pub intellectual_property: bool,
}

/// Image colour space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Declared with a value this crate does not know.
    Unknown(u32),
    /// Not declared (raw codestreams, or ICC profiles).
    #[default]
    Unspecified,
    Srgb,
    Gray,
    Sycc,
    Eycc,
    Cmyk,
}

impl ColorSpace {
    /// Maps an enumerated colour space (EnumCS) of a colr box.
    pub fn from_enumerated(value: u32) -> Self {
        match value {
            12 => ColorSpace::Cmyk,
            16 => ColorSpace::Srgb,
            17 => ColorSpace::Gray,
            18 => ColorSpace::Sycc,
            24 => ColorSpace::Eycc,
            _ => ColorSpace::Unknown(value),
        }
    }
}

/// Divide by 2 to the power of b and round upwards.
#[inline]
fn ceil_div_pow2(a: u32, b: u32) -> u32 {
    ((a as u64 + (1u64 << b) - 1) >> b) as u32
}

impl ImageHeader {
    pub fn component_count(&self) -> u32 {
        self.components.len() as u32
    }

    pub fn width(&self) -> u32 {
        self.x_extent - self.x_origin
    }

    pub fn height(&self) -> u32 {
        self.y_extent - self.y_origin
    }

    pub fn tiles_across(&self) -> u32 {
        (self.x_extent - self.tile_x_origin).div_ceil(self.tile_width)
    }

    pub fn tiles_down(&self) -> u32 {
        (self.y_extent - self.tile_y_origin).div_ceil(self.tile_height)
    }

    /// Width of the decoded image once `reduce_factor` levels are discarded.
    pub fn reduced_width(&self) -> u32 {
        ceil_div_pow2(self.width(), self.reduce_factor)
    }

    pub fn reduced_height(&self) -> u32 {
        ceil_div_pow2(self.height(), self.reduce_factor)
    }

    /// True when the CAP marker announces HTJ2K block coding.
    pub fn is_htj2k(&self) -> bool {
        self.cap
            .as_ref()
            .is_some_and(|cap| cap.pcap & CAP_HTJ2K_BIT != 0)
    }
}
