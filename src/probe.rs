//! The header probe: stream, codec, configuration and header, in that order.
//!
//! Each stage binds its handle to a local, so an early return drops what has
//! been acquired so far in reverse acquisition order: descriptor, codec,
//! stream.

use crate::ImageInfo;
use crate::codec::{CodecBackend, CodecVariant, ImageDescriptor, NativeBackend};
use crate::coding_parameters::DecoderConfig;
use crate::error::{ProbeError, StatusCode};
use crate::memory_stream::StreamDirection;

/// Stage reached by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStage {
    Start,
    StreamReady,
    CodecReady,
    Configured,
    HeaderValidated,
    Failed(StatusCode),
}

struct StageTracker {
    stage: ProbeStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: ProbeStage::Start,
        }
    }

    fn advance(&mut self, next: ProbeStage) {
        log::trace!("probe stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn fail(&mut self, error: ProbeError) -> ProbeError {
        log::debug!("header probe failed after {:?}: {}", self.stage, error);
        self.stage = ProbeStage::Failed(error.status());
        error
    }
}

/// Runs the probe against `backend` with the given decoder configuration.
///
/// `variant` is the raw codec tag; tags that name no [`CodecVariant`] fail
/// the codec stage like any other unavailable codec.
pub fn probe_with<B: CodecBackend>(
    backend: &B,
    input: &[u8],
    variant: i32,
    config: &DecoderConfig,
) -> Result<ImageInfo, ProbeError> {
    let mut tracker = StageTracker::new();

    let mut stream = backend
        .create_stream(input, StreamDirection::Input)
        .map_err(|e| tracker.fail(e))?;
    tracker.advance(ProbeStage::StreamReady);

    let mut codec = CodecVariant::try_from(variant)
        .map_err(|_| ProbeError::UnknownCodec(variant))
        .and_then(|variant| backend.create_decompress(variant))
        .map_err(|e| tracker.fail(e))?;
    tracker.advance(ProbeStage::CodecReady);

    backend
        .setup_decoder(&mut codec, config)
        .map_err(|e| tracker.fail(e))?;
    tracker.advance(ProbeStage::Configured);

    let image = backend
        .read_header(&mut codec, &mut stream)
        .map_err(|e| tracker.fail(e))?;
    if image.component_count() == 0 {
        return Err(tracker.fail(ProbeError::NoComponents));
    }
    tracker.advance(ProbeStage::HeaderValidated);

    Ok(image.summary())
}

/// Opens `input` as `variant` with the default configuration and validates
/// its header, returning a summary of the image on success.
pub fn probe_header(input: &[u8], variant: CodecVariant) -> Result<ImageInfo, ProbeError> {
    probe_with(
        &NativeBackend,
        input,
        variant.into(),
        &DecoderConfig::default(),
    )
}

/// Checks that `input` can be opened as the codec format `variant` and that
/// its header declares at least one component.
///
/// `i32::from` of the result is 0 on success, 1 when no decompressor exists
/// for `variant`, 2 when the decoder rejects its configuration and 3 when the
/// header is unreadable or empty.
pub fn decode_header(input: &[u8], variant: i32) -> StatusCode {
    let result = probe_with(&NativeBackend, input, variant, &DecoderConfig::default());
    StatusCode::from(&result)
}
