//! Play/pause state for the single preview track.
//!
//! Pausing is synchronous and cannot fail; starting playback is an
//! asynchronous request that may be rejected (autoplay policy, decode
//! error). At most one start request is outstanding at a time. A toggle
//! arriving while a request is in flight only records the latest desired
//! state, which is reconciled when the request resolves, so the mirrored
//! `playing` flag always ends up equal to the resource's real state.

/// Side effect the caller must apply to the audio resource.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlaybackCommand {
    /// Begin an asynchronous start request; report the outcome via
    /// [`PlaybackToggle::play_resolved`].
    RequestPlay,
    /// Pause the resource (synchronous, never fails).
    Pause,
}

#[derive(Default)]
pub struct PlaybackToggle {
    playing: bool,
    requesting: bool,
    desired: bool,
}

impl PlaybackToggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror of the resource's actual playing state.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// A start request is in flight.
    pub fn is_requesting(&self) -> bool {
        self.requesting
    }

    /// Flip the desired state. Returns the command to apply now, or
    /// `None` while a start request is outstanding (the flip is folded
    /// into the request's resolution instead).
    pub fn toggle(&mut self) -> Option<PlaybackCommand> {
        self.desired = !self.desired;
        if self.requesting {
            return None;
        }
        if self.desired {
            self.requesting = true;
            Some(PlaybackCommand::RequestPlay)
        } else {
            self.playing = false;
            Some(PlaybackCommand::Pause)
        }
    }

    /// Outcome of the outstanding start request. On success the resource
    /// is now playing; if the user toggled away in the meantime the
    /// returned `Pause` brings it back in line. On failure the resource
    /// never started, so the state is forced to Stopped.
    pub fn play_resolved(&mut self, ok: bool) -> Option<PlaybackCommand> {
        self.requesting = false;
        if !ok {
            self.playing = false;
            self.desired = false;
            return None;
        }
        self.playing = true;
        if !self.desired {
            self.playing = false;
            return Some(PlaybackCommand::Pause);
        }
        None
    }

    /// The stream reached its natural end; the resource is stopped.
    pub fn stream_ended(&mut self) {
        self.playing = false;
        self.desired = false;
    }

    /// The resource reported a load or runtime error; force Stopped.
    /// An outstanding start request will still resolve (as a rejection)
    /// and is handled by `play_resolved`.
    pub fn stream_error(&mut self) {
        self.playing = false;
        self.desired = false;
    }
}
