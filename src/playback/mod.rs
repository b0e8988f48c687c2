//! Step playback
//!
//! Owns the cursor over the canonical steps and everything derived from it:
//! the deferred interstitial commit and the speech session tied to the
//! displayed step. All transitions stop the previous step's speech before
//! the cursor changes, so two steps' narration can never overlap.

pub mod interstitial;

pub use interstitial::{Interstitial, InterstitialDeck, DISMISS_COUNTDOWN_SECS};

use crate::route::RouteStep;
use crate::speech::SpeechControl;
use tracing::debug;

/// An interstitial is due on every second step reached.
pub const INTERSTITIAL_CADENCE: usize = 2;

/// Coarse state of the playback machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// No route loaded
    Idle,

    /// Cursor on a step
    Active,

    /// Cursor one past the last step
    Completed,
}

/// Outcome of a transition request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Cursor moved to the given position
    Moved(usize),

    /// Commit deferred; the interstitial must be dismissed first
    Deferred(Interstitial),

    /// Cursor moved past the last step
    Completed,

    /// Nothing happened (no steps, at a boundary, or a commit is pending)
    Ignored,
}

/// A transition waiting on interstitial dismissal.
#[derive(Debug, Clone, Copy)]
struct PendingAdvance {
    target: usize,
    card: Interstitial,
}

/// Cursor-owning playback controller.
pub struct StepPlayback {
    steps: Vec<RouteStep>,
    cursor: usize,
    pending: Option<PendingAdvance>,
    deck: InterstitialDeck,
    speech: Option<SpeechControl>,
}

impl StepPlayback {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            cursor: 0,
            pending: None,
            deck: InterstitialDeck::new(),
            speech: None,
        }
    }

    /// Load a route, replacing whatever was playing.
    pub fn load(&mut self, steps: Vec<RouteStep>) {
        self.reset();
        self.steps = steps;
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.steps.is_empty() {
            PlaybackPhase::Idle
        } else if self.cursor >= self.steps.len() {
            PlaybackPhase::Completed
        } else {
            PlaybackPhase::Active
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    /// The displayed step, absent when idle or completed.
    pub fn current_step(&self) -> Option<&RouteStep> {
        self.steps.get(self.cursor)
    }

    /// The interstitial currently blocking a commit, if any.
    pub fn pending_interstitial(&self) -> Option<&Interstitial> {
        self.pending.as_ref().map(|p| &p.card)
    }

    /// Advance toward the next step.
    ///
    /// Reaching an interstitial position (every second step) defers the
    /// commit until `dismiss_interstitial`; at most one commit is ever
    /// pending. From the last step the cursor moves straight past the end,
    /// with no interstitial and no wrap.
    pub fn next(&mut self) -> Advance {
        if self.pending.is_some() || self.phase() != PlaybackPhase::Active {
            return Advance::Ignored;
        }

        let target = self.cursor + 1;
        if target < self.steps.len() && is_interstitial_position(target) {
            let card = self.deck.draw();
            self.pending = Some(PendingAdvance { target, card });
            debug!("advance to {} deferred behind interstitial", target);
            return Advance::Deferred(card);
        }

        self.commit(target)
    }

    /// Commit a transition deferred behind an interstitial.
    pub fn dismiss_interstitial(&mut self) -> Advance {
        match self.pending.take() {
            Some(p) => self.commit(p.target),
            None => Advance::Ignored,
        }
    }

    /// Step back. Never shows an interstitial; no-op on the first step.
    pub fn prev(&mut self) -> Advance {
        if self.pending.is_some() || self.cursor == 0 || self.steps.is_empty() {
            return Advance::Ignored;
        }
        self.commit(self.cursor - 1)
    }

    /// Return to idle, dropping the route and all derived state.
    pub fn reset(&mut self) {
        self.stop_speech();
        self.steps.clear();
        self.cursor = 0;
        self.pending = None;
        self.deck.reset();
    }

    /// Hand the machine the speech session for the displayed step.
    ///
    /// Any previous session is stopped first; the machine owns at most one.
    pub fn attach_speech(&mut self, control: SpeechControl) {
        self.stop_speech();
        self.speech = Some(control);
    }

    /// Whether a speech session is attached and not yet stopped.
    pub fn has_active_speech(&self) -> bool {
        self.speech.as_ref().map_or(false, |s| !s.is_stopped())
    }

    /// Move the cursor. The previous step's speech is stopped before the
    /// new position becomes current; this ordering is what keeps adjacent
    /// steps' narration from overlapping.
    fn commit(&mut self, target: usize) -> Advance {
        self.stop_speech();
        self.cursor = target;
        if self.cursor >= self.steps.len() {
            debug!("playback completed");
            Advance::Completed
        } else {
            debug!("cursor moved to {}", self.cursor);
            Advance::Moved(self.cursor)
        }
    }

    fn stop_speech(&mut self) {
        if let Some(speech) = self.speech.take() {
            speech.stop();
        }
    }
}

impl Default for StepPlayback {
    fn default() -> Self {
        Self::new()
    }
}

/// Every second step reached is an interstitial position.
fn is_interstitial_position(position: usize) -> bool {
    position > 0 && position % INTERSTITIAL_CADENCE == 1
}
