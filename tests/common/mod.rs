//! Byte-level builders for codestreams and JP2 files.
#![allow(dead_code)]

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn segment(out: &mut Vec<u8>, marker: u16, payload: &[u8]) {
    out.extend_from_slice(&marker.to_be_bytes());
    out.extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
    out.extend_from_slice(payload);
}

/// Single-tile codestream with `components` 8-bit unsigned components.
pub fn codestream(width: u32, height: u32, components: u16) -> Vec<u8> {
    codestream_with(width, height, components, &[])
}

/// Same as [`codestream`], with `extra` marker segments after the comment.
pub fn codestream_with(width: u32, height: u32, components: u16, extra: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, 0x4F];

    let mut siz = vec![0x00, 0x00];
    for value in [width, height, 0, 0, width, height, 0, 0] {
        siz.extend_from_slice(&value.to_be_bytes());
    }
    siz.extend_from_slice(&components.to_be_bytes());
    for _ in 0..components {
        siz.extend_from_slice(&[0x07, 0x01, 0x01]);
    }
    segment(&mut out, 0xFF51, &siz);

    // LRCP, one layer, 5 levels, 64x64 code-blocks, 5/3 wavelet.
    segment(&mut out, 0xFF52, &[0x00, 0x00, 0x00, 0x01, 0x00, 0x05, 0x04, 0x04, 0x00, 0x01]);
    let mut qcd = vec![0x40];
    qcd.extend_from_slice(&[0x48; 16]);
    segment(&mut out, 0xFF5C, &qcd);
    segment(&mut out, 0xFF64, b"\x00\x01j2k-probe");
    out.extend_from_slice(extra);

    out.extend_from_slice(&[0xFF, 0x90, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x12, 0x00, 0x01]);
    out.extend_from_slice(&[0xFF, 0x93, 0x80, 0x00, 0x00, 0x00]);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

fn jp2_box(out: &mut Vec<u8>, box_type: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(&((payload.len() + 8) as u32).to_be_bytes());
    out.extend_from_slice(box_type);
    out.extend_from_slice(payload);
}

/// JP2 file wrapping `codestream`, declaring the enumerated colour space `enumcs`.
pub fn jp2(codestream: &[u8], width: u32, height: u32, components: u16, enumcs: u32) -> Vec<u8> {
    let mut colr = vec![0x01, 0x00, 0x00];
    colr.extend_from_slice(&enumcs.to_be_bytes());
    jp2_with_colr(codestream, width, height, components, &colr)
}

/// JP2 file whose colr box carries a restricted ICC `profile`.
pub fn jp2_icc(codestream: &[u8], width: u32, height: u32, components: u16, profile: &[u8]) -> Vec<u8> {
    let mut colr = vec![0x02, 0x00, 0x00];
    colr.extend_from_slice(profile);
    jp2_with_colr(codestream, width, height, components, &colr)
}

fn jp2_with_colr(codestream: &[u8], width: u32, height: u32, components: u16, colr: &[u8]) -> Vec<u8> {
    let mut out = b"\x00\x00\x00\x0CjP  \r\n\x87\n".to_vec();
    jp2_box(&mut out, b"ftyp", b"jp2 \x00\x00\x00\x00jp2 ");

    let mut ihdr = height.to_be_bytes().to_vec();
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&components.to_be_bytes());
    ihdr.extend_from_slice(&[0x07, 0x07, 0x00, 0x00]);

    let mut jp2h = Vec::new();
    jp2_box(&mut jp2h, b"ihdr", &ihdr);
    jp2_box(&mut jp2h, b"colr", colr);
    jp2_box(&mut out, b"jp2h", &jp2h);
    jp2_box(&mut out, b"jp2c", codestream);
    out
}
