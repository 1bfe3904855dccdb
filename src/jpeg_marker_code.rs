use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Marker codes of a JPEG 2000 codestream (ISO/IEC 15444-1, Annex A).
///
/// The value is the second byte of the marker; the first is always 0xFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum J2kMarkerCode {
    /// SOC: Start of codestream.
    StartOfCodestream = 0x4F,
    /// CAP: Extended capabilities (Part 15).
    Capability = 0x50,
    /// SIZ: Image and tile size.
    ImageAndTileSize = 0x51,
    /// COD: Coding style default.
    CodingStyleDefault = 0x52,
    /// COC: Coding style component.
    CodingStyleComponent = 0x53,
    /// TLM: Tile-part lengths.
    TilePartLengths = 0x55,
    /// PLM: Packet length, main header.
    PacketLengthMain = 0x57,
    /// CPF: Corresponding profile (Part 15).
    CorrespondingProfile = 0x59,
    /// QCD: Quantization default.
    QuantizationDefault = 0x5C,
    /// QCC: Quantization component.
    QuantizationComponent = 0x5D,
    /// RGN: Region of interest.
    RegionOfInterest = 0x5E,
    /// POC: Progression order change.
    ProgressionOrderChange = 0x5F,
    /// PPM: Packed packet headers, main header.
    PackedPacketHeadersMain = 0x60,
    /// CRG: Component registration.
    ComponentRegistration = 0x63,
    /// COM: Comment.
    Comment = 0x64,
    /// SOT: Start of tile-part.
    StartOfTile = 0x90,
    /// SOD: Start of data.
    StartOfData = 0x93,
    /// EOC: End of codestream.
    EndOfCodestream = 0xD9,
}

impl J2kMarkerCode {
    pub fn code(self) -> u16 {
        0xFF00 | u8::from(self) as u16
    }
}
