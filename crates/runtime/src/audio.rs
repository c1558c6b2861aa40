//! Sound cue sink that writes cues to the log.

use battle_core::{AudioSink, SoundCue};
use tracing::debug;

/// Logs every cue at debug level under the `runtime::audio` target.
///
/// Headless runs use this in place of a mixer so cue ordering can still be
/// inspected with `RUST_LOG=runtime::audio=debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAudio;

impl AudioSink for TracingAudio {
    fn play(&self, cue: SoundCue) {
        debug!(target: "runtime::audio", %cue, "play");
    }
}
