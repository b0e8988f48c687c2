//! Spoken narration
//!
//! A step's text is synthesized to audio by a hosted service and played
//! back locally. Synthesis and playback together form one cancellable
//! session owned by the step that is currently displayed; the playback
//! state machine stops the session before the cursor ever moves on.

pub mod playback;
pub mod synth;

pub use playback::{SessionOptions, SpeechControl, SpeechOutcome, SpeechSession};
pub use synth::SpeechClient;
