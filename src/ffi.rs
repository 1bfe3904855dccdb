//! C Foreign Function Interface for j2k-probe.
//!
//! Return values are the [`StatusCode`] values: 0 on success, 1 when no
//! decompressor exists for the codec format, 2 when the decoder rejects its
//! configuration and 3 when the header cannot be read or has no components.

use crate::codec::NativeBackend;
use crate::coding_parameters::DecoderConfig;
use crate::error::StatusCode;
use crate::probe::probe_with;
use std::os::raw::{c_int, c_uchar};

/// Image information structure.
#[repr(C)]
#[derive(Debug, Default)]
pub struct J2kHeaderInfo {
    pub width: u32,
    pub height: u32,
    pub components: u32,
    pub bits_per_sample: u32,
    pub tiles_across: u32,
    pub tiles_down: u32,
}

/// Borrows the caller's buffer; a null pointer or zero length is an empty input.
unsafe fn input<'a>(data: *const c_uchar, len: usize) -> &'a [u8] {
    if data.is_null() || len == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(data, len) }
    }
}

/// Opens `len` bytes at `data` as codec format `codec` and validates the header.
///
/// # Safety
/// `data` must be null or point to `len` readable bytes for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn j2k_decode_header(data: *const c_uchar, len: usize, codec: c_int) -> c_int {
    let input = unsafe { input(data, len) };
    crate::probe::decode_header(input, codec).into()
}

/// Same as [`j2k_decode_header`], filling `info` on success.
///
/// # Safety
/// `data` must be null or point to `len` readable bytes. `info` must be null
/// or point to a writable `J2kHeaderInfo`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn j2k_probe_header(
    data: *const c_uchar,
    len: usize,
    codec: c_int,
    info: *mut J2kHeaderInfo,
) -> c_int {
    let input = unsafe { input(data, len) };
    let result = probe_with(&NativeBackend, input, codec, &DecoderConfig::default());
    let status = StatusCode::from(&result);
    if let (Ok(summary), false) = (result, info.is_null()) {
        unsafe {
            (*info).width = summary.width;
            (*info).height = summary.height;
            (*info).components = summary.component_count();
            (*info).bits_per_sample = summary.bits_per_sample() as u32;
            (*info).tiles_across = summary.tiles_across;
            (*info).tiles_down = summary.tiles_down;
        }
    }
    status.into()
}
