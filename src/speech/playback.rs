//! Cancellable speech sessions
//!
//! One session covers the whole life of an utterance: the synthesis request
//! and the local playback of its audio. `stop()` is cooperative and
//! idempotent: it aborts the in-flight request (the await is raced against
//! a wakeup), halts playback, and counts as a normal outcome rather than an
//! error. The audio buffer is owned by the session task and dropped with it,
//! so the binary resource is released exactly once no matter when the stop
//! lands.

use crate::Result;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, Notify};
use tracing::{debug, warn};
use uuid::Uuid;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Playback ran to its natural end
    Finished,

    /// `stop()` was invoked; silent, normal completion
    Cancelled,
}

/// Runtime options for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Play the synthesized audio; disabled in text-only mode and in tests
    pub play_audio: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { play_audio: true }
    }
}

/// Stop-only handle to a session. Cloneable so an owner of the session
/// future can hand cancellation over to the playback state machine.
#[derive(Clone)]
pub struct SpeechControl {
    id: Uuid,
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl SpeechControl {
    /// Request cancellation. Idempotent; only the first call acts.
    pub fn stop(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            debug!("speech session {} stopped", self.id);
            self.notify.notify_one();
        }
    }

    /// Whether `stop()` has been requested.
    pub fn is_stopped(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Session identifier, for logging.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// A running synthesize-then-play session.
pub struct SpeechSession {
    control: SpeechControl,
    done_rx: oneshot::Receiver<Result<SpeechOutcome>>,
}

impl SpeechSession {
    /// Start a session around a synthesis future.
    ///
    /// The future is typically `SpeechClient::synthesize`; taking it as a
    /// parameter keeps the session logic independent of the transport.
    pub fn start<F>(synthesis: F, options: SessionOptions) -> Self
    where
        F: Future<Output = Result<Vec<u8>>> + Send + 'static,
    {
        let control = SpeechControl {
            id: Uuid::new_v4(),
            cancelled: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        };
        let (done_tx, done_rx) = oneshot::channel();

        let task_control = control.clone();
        tokio::spawn(async move {
            let outcome = run_session(synthesis, &task_control, &options).await;
            if let Err(e) = &outcome {
                warn!("speech session {} failed: {}", task_control.id, e);
            }
            let _ = done_tx.send(outcome);
        });

        Self { control, done_rx }
    }

    /// A stop-only handle for transferring cancellation ownership.
    pub fn control(&self) -> SpeechControl {
        self.control.clone()
    }

    /// Request cancellation. Idempotent.
    pub fn stop(&self) {
        self.control.stop();
    }

    /// Wait for the session to end.
    ///
    /// Resolves `Cancelled` when stopped (never an error), `Finished` on
    /// natural completion, and errs only when the synthesis service or the
    /// audio device genuinely failed.
    pub async fn done(self) -> Result<SpeechOutcome> {
        match self.done_rx.await {
            Ok(outcome) => outcome,
            // The task can only vanish without reporting at runtime
            // shutdown; treat it as a cancellation
            Err(_) => Ok(SpeechOutcome::Cancelled),
        }
    }
}

async fn run_session<F>(
    synthesis: F,
    control: &SpeechControl,
    options: &SessionOptions,
) -> Result<SpeechOutcome>
where
    F: Future<Output = Result<Vec<u8>>> + Send + 'static,
{
    if control.is_stopped() {
        return Ok(SpeechOutcome::Cancelled);
    }

    let audio = tokio::select! {
        _ = control.notify.notified() => {
            debug!("speech session {} cancelled during synthesis", control.id);
            return Ok(SpeechOutcome::Cancelled);
        }
        result = synthesis => {
            if control.is_stopped() {
                // Stop landed while the response was in flight; whatever
                // came back is dropped without reaching the audio device
                return Ok(SpeechOutcome::Cancelled);
            }
            result?
        }
    };

    if !options.play_audio {
        return Ok(SpeechOutcome::Finished);
    }

    play_clip(audio, control).await
}

/// Decode and play one audio clip on a blocking thread, polling the
/// cancellation flag while it runs.
#[cfg(feature = "audio-out")]
async fn play_clip(audio: Vec<u8>, control: &SpeechControl) -> Result<SpeechOutcome> {
    use crate::WayfinderError;

    let cancelled = Arc::clone(&control.cancelled);
    let outcome = tokio::task::spawn_blocking(move || -> Result<SpeechOutcome> {
        let (_stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| WayfinderError::PlaybackError(format!("No output device: {}", e)))?;
        let sink = rodio::Sink::try_new(&handle)
            .map_err(|e| WayfinderError::PlaybackError(format!("Failed to open sink: {}", e)))?;
        let source = rodio::Decoder::new(std::io::Cursor::new(audio))
            .map_err(|e| WayfinderError::SynthesisError(format!("Unplayable audio: {}", e)))?;
        sink.append(source);

        loop {
            if cancelled.load(Ordering::SeqCst) {
                sink.stop();
                return Ok(SpeechOutcome::Cancelled);
            }
            if sink.empty() {
                return Ok(SpeechOutcome::Finished);
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
    })
    .await
    .map_err(|e| crate::WayfinderError::PlaybackError(format!("Playback thread died: {}", e)))?;

    outcome
}

#[cfg(not(feature = "audio-out"))]
async fn play_clip(_audio: Vec<u8>, _control: &SpeechControl) -> Result<SpeechOutcome> {
    Ok(SpeechOutcome::Finished)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WayfinderError;
    use std::time::Duration;

    fn silent() -> SessionOptions {
        SessionOptions { play_audio: false }
    }

    #[tokio::test]
    async fn test_finishes_when_synthesis_succeeds() {
        let session = SpeechSession::start(async { Ok(vec![0u8; 16]) }, silent());
        assert_eq!(session.done().await.unwrap(), SpeechOutcome::Finished);
    }

    #[tokio::test]
    async fn test_stop_before_synthesis_resolves() {
        // A synthesis call that never completes; stopping must still
        // resolve `done` as a cancellation, and no audio is ever produced
        let session = SpeechSession::start(futures::future::pending(), silent());
        session.stop();
        let outcome = tokio::time::timeout(Duration::from_secs(1), session.done())
            .await
            .expect("done must resolve after stop");
        assert_eq!(outcome.unwrap(), SpeechOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let session = SpeechSession::start(futures::future::pending(), silent());
        let control = session.control();
        session.stop();
        session.stop();
        control.stop();
        assert!(control.is_stopped());
        assert_eq!(session.done().await.unwrap(), SpeechOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_control_stops_owned_session() {
        let session = SpeechSession::start(futures::future::pending(), silent());
        let control = session.control();
        let waiter = tokio::spawn(session.done());
        tokio::time::sleep(Duration::from_millis(10)).await;
        control.stop();
        let outcome = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome.unwrap(), SpeechOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_an_error() {
        let session = SpeechSession::start(
            async { Err(WayfinderError::SynthesisError("502".into())) },
            silent(),
        );
        let err = session.done().await.unwrap_err();
        assert!(matches!(err, WayfinderError::SynthesisError(_)));
    }

    #[tokio::test]
    async fn test_stop_after_completion_is_harmless() {
        let session = SpeechSession::start(async { Ok(Vec::new()) }, silent());
        let control = session.control();
        assert_eq!(session.done().await.unwrap(), SpeechOutcome::Finished);
        control.stop();
        assert!(control.is_stopped());
    }
}
