//! Hand-built codestreams and JP2 files for unit tests.

pub const SOT: [u8; 2] = [0xFF, 0x90];

pub struct CodestreamBuilder {
    components: u16,
    x_extent: u32,
    y_extent: u32,
    tile_width: u32,
    tile_height: u32,
    layers: u16,
    codeblock: (u8, u8),
    with_cod: bool,
    with_qcd: bool,
    with_sot: bool,
    before_siz: Vec<u8>,
    extra: Vec<u8>,
}

fn segment_bytes(marker: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = marker.to_be_bytes().to_vec();
    out.extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

fn comment_payload(text: &str) -> Vec<u8> {
    let mut payload = vec![0x00, 0x01];
    payload.extend_from_slice(text.as_bytes());
    payload
}

impl CodestreamBuilder {
    /// 256x256 single-tile image, 8-bit unsigned components, 3 decomposition levels.
    pub fn new(components: u16) -> Self {
        Self {
            components,
            x_extent: 256,
            y_extent: 256,
            tile_width: 256,
            tile_height: 256,
            layers: 1,
            codeblock: (4, 4),
            with_cod: true,
            with_qcd: true,
            with_sot: true,
            before_siz: Vec::new(),
            extra: Vec::new(),
        }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.x_extent = width;
        self.y_extent = height;
        self
    }

    pub fn tile_size(mut self, width: u32, height: u32) -> Self {
        self.tile_width = width;
        self.tile_height = height;
        self
    }

    pub fn layers(mut self, layers: u16) -> Self {
        self.layers = layers;
        self
    }

    pub fn codeblock(mut self, width_exp: u8, height_exp: u8) -> Self {
        self.codeblock = (width_exp, height_exp);
        self
    }

    pub fn without_cod(mut self) -> Self {
        self.with_cod = false;
        self
    }

    pub fn without_qcd(mut self) -> Self {
        self.with_qcd = false;
        self
    }

    pub fn without_sot(mut self) -> Self {
        self.with_sot = false;
        self
    }

    pub fn comment_before_siz(mut self, text: &str) -> Self {
        self.before_siz
            .extend(segment_bytes(0xFF64, &comment_payload(text)));
        self
    }

    pub fn comment(self, text: &str) -> Self {
        let payload = comment_payload(text);
        self.segment(0xFF64, &payload)
    }

    /// Appends a marker segment after QCD.
    pub fn segment(mut self, marker: u16, payload: &[u8]) -> Self {
        self.extra.extend(segment_bytes(marker, payload));
        self
    }

    /// Appends raw bytes after QCD.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.extra.extend_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0xFF, 0x4F];
        out.extend_from_slice(&self.before_siz);

        let mut siz = vec![0x00, 0x00];
        for value in [
            self.x_extent,
            self.y_extent,
            0,
            0,
            self.tile_width,
            self.tile_height,
            0,
            0,
        ] {
            siz.extend_from_slice(&value.to_be_bytes());
        }
        siz.extend_from_slice(&self.components.to_be_bytes());
        for _ in 0..self.components {
            siz.extend_from_slice(&[0x07, 0x01, 0x01]);
        }
        out.extend(segment_bytes(0xFF51, &siz));

        if self.with_cod {
            let mut cod = vec![0x00, 0x02];
            cod.extend_from_slice(&self.layers.to_be_bytes());
            cod.extend_from_slice(&[0x00, 0x03, self.codeblock.0, self.codeblock.1, 0x00, 0x01]);
            out.extend(segment_bytes(0xFF52, &cod));
        }
        if self.with_qcd {
            // Reversible: guard bits 2, one exponent per sub-band (3 * 3 + 1).
            let mut qcd = vec![0x40];
            qcd.extend_from_slice(&[0x48; 10]);
            out.extend(segment_bytes(0xFF5C, &qcd));
        }
        out.extend_from_slice(&self.extra);

        if self.with_sot {
            out.extend_from_slice(&SOT);
            out.extend_from_slice(&[0x00, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x14, 0x00, 0x01]);
            out.extend_from_slice(&[0xFF, 0x93]);
            out.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x00]);
            out.extend_from_slice(&[0xFF, 0xD9]);
        }
        out
    }
}

pub fn jp2_box(box_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(box_type);
    out.extend_from_slice(payload);
    out
}

pub fn signature_box() -> Vec<u8> {
    b"\x00\x00\x00\x0CjP  \r\n\x87\n".to_vec()
}

pub fn ftyp_box() -> Vec<u8> {
    jp2_box(b"ftyp", b"jp2 \x00\x00\x00\x00jp2 ")
}

pub fn ihdr_box(width: u32, height: u32, components: u16) -> Vec<u8> {
    let mut payload = height.to_be_bytes().to_vec();
    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&components.to_be_bytes());
    payload.extend_from_slice(&[0x07, 0x07, 0x00, 0x00]);
    jp2_box(b"ihdr", &payload)
}

pub fn colr_enumerated(enumcs: u32) -> Vec<u8> {
    let mut payload = vec![0x01, 0x00, 0x00];
    payload.extend_from_slice(&enumcs.to_be_bytes());
    jp2_box(b"colr", &payload)
}

pub fn colr_icc(profile: &[u8]) -> Vec<u8> {
    let mut payload = vec![0x02, 0x00, 0x00];
    payload.extend_from_slice(profile);
    jp2_box(b"colr", &payload)
}

/// Signature, ftyp, jp2h(ihdr, colr) and jp2c around `codestream`.
pub fn jp2_file(codestream: &[u8], components: u16, colr: Vec<u8>) -> Vec<u8> {
    let mut jp2h = ihdr_box(256, 256, components);
    jp2h.extend(colr);
    let mut out = signature_box();
    out.extend(ftyp_box());
    out.extend(jp2_box(b"jp2h", &jp2h));
    out.extend(jp2_box(b"jp2c", codestream));
    out
}
