//! Request sequencing: debounce, ticket issuance, and staleness.
//!
//! A burst of parameter edits must collapse into exactly one reprocess
//! request carrying the final values, and a response may only replace
//! the preview when no newer request has been issued since. Both are
//! handled with monotonic counters rather than timer handles: each edit
//! bumps a debounce generation, and each network round trip gets a
//! sequence-numbered [`RequestTicket`]. Timers and fetches that lose
//! the race simply fizzle when their counter no longer matches.
//!
//! The sequencer is pure state -- the caller owns the actual timer
//! (sleep the quiet period, then call [`RequestSequencer::fire`]) and
//! the actual network call.

use std::time::Duration;

/// Quiet period a burst of edits must survive before a reprocess fires.
pub const DEBOUNCE_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// What kind of round trip a ticket represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Initial upload of raw image bytes.
    Upload,
    /// Parameter-only reprocess of an already-uploaded source.
    Reprocess,
}

/// One in-flight network round trip.
///
/// Only the ticket matching the most recently issued sequence number
/// may update the preview; all other responses are discarded silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    /// Monotonically increasing issue number.
    pub seq: u64,
    /// Upload or reprocess.
    pub kind: RequestKind,
}

/// Handle for one armed debounce window.
///
/// Returned by [`RequestSequencer::note_edit`]; redeem it with
/// [`RequestSequencer::fire`] after sleeping [`DEBOUNCE_QUIET_PERIOD`].
/// A later edit invalidates all earlier tokens, so an expired timer
/// whose token is stale produces nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceToken {
    generation: u64,
}

/// Outcome of presenting a completed response to the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// This ticket is the newest issued request; its result may be applied.
    Accepted,
    /// A newer request was issued after this one; discard the result.
    Stale,
}

/// Owns the debounce/staleness counters for the preview session.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    /// Bumped on every edit; a timer only fires if its token still matches.
    debounce_generation: u64,
    /// Whether a debounce window is currently armed.
    debounce_armed: bool,
    /// Sequence number of the most recently issued ticket.
    last_issued: u64,
    /// Highest sequence number whose response was accepted.
    last_accepted: u64,
    /// Highest sequence number that has completed, successfully or not.
    last_settled: u64,
}

impl RequestSequencer {
    /// Create a sequencer with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parameter edit and (re)arm the debounce window.
    ///
    /// Returns `None` when `has_source` is false: edits made before any
    /// upload has succeeded must not schedule network calls. Otherwise
    /// returns a fresh token that supersedes every earlier one, which
    /// is how a rapid burst collapses -- each edit's token invalidates
    /// the previous edit's pending timer.
    pub fn note_edit(&mut self, has_source: bool) -> Option<DebounceToken> {
        if !has_source {
            return None;
        }
        self.debounce_generation += 1;
        self.debounce_armed = true;
        Some(DebounceToken {
            generation: self.debounce_generation,
        })
    }

    /// Redeem a debounce token after the quiet period elapsed.
    ///
    /// Issues a reprocess ticket only if no edit (and no upload) arrived
    /// after the token was handed out; a stale token returns `None`.
    pub fn fire(&mut self, token: DebounceToken) -> Option<RequestTicket> {
        if !self.debounce_armed || token.generation != self.debounce_generation {
            return None;
        }
        self.debounce_armed = false;
        Some(self.issue(RequestKind::Reprocess))
    }

    /// Issue an upload ticket for a new file selection.
    ///
    /// Cancels any pending debounce window: the parameters travel with
    /// the upload itself, and a reprocess against the old source would
    /// be meaningless.
    pub fn begin_upload(&mut self) -> RequestTicket {
        self.cancel_pending();
        self.issue(RequestKind::Upload)
    }

    /// Invalidate any armed debounce window without issuing anything.
    pub fn cancel_pending(&mut self) {
        self.debounce_generation += 1;
        self.debounce_armed = false;
    }

    /// Settle a successful response for `ticket`.
    ///
    /// Accepts only the most recently issued request. A ticket
    /// superseded by a newer issuance is [`Settled::Stale`] even if
    /// that newer request has not completed yet -- a slow early
    /// response must never overwrite (or briefly flash over) the
    /// result the user most recently asked for.
    pub fn settle_success(&mut self, ticket: RequestTicket) -> Settled {
        self.last_settled = self.last_settled.max(ticket.seq);
        if ticket.seq == self.last_issued {
            self.last_accepted = ticket.seq;
            Settled::Accepted
        } else {
            Settled::Stale
        }
    }

    /// Settle a failed response for `ticket`.
    ///
    /// Never advances the acceptance high-water mark: the previous
    /// preview stays authoritative. Only busy-state tracking moves.
    pub fn settle_failure(&mut self, ticket: RequestTicket) {
        self.last_settled = self.last_settled.max(ticket.seq);
    }

    /// Whether `ticket` is the most recently issued request.
    #[must_use]
    pub const fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.seq == self.last_issued
    }

    /// Whether the newest issued request has not yet completed.
    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.last_settled < self.last_issued
    }

    /// Highest accepted sequence number, for diagnostics and tests.
    #[must_use]
    pub const fn last_accepted(&self) -> u64 {
        self.last_accepted
    }

    fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        self.last_issued += 1;
        RequestTicket {
            seq: self.last_issued,
            kind,
        }
    }
}
