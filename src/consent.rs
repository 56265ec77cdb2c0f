use crate::model::{ConsentState, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentChange {
    Granted,
    Denied,
    Unchanged,
}

/// Consent and widget visibility. `Denied` is absorbing; a dismissed widget
/// stays dismissed until an explicit reopen.
#[derive(Debug, Clone, Default)]
pub struct ConsentGate {
    consent: ConsentState,
    visibility: Visibility,
    playing_at_dismissal: bool,
}

impl ConsentGate {
    pub fn new(consent: ConsentState, user_dismissed: bool) -> Self {
        Self {
            consent,
            visibility: Visibility {
                shown: consent == ConsentState::Granted,
                user_dismissed,
            },
            playing_at_dismissal: false,
        }
    }

    pub fn consent(&self) -> ConsentState {
        self.consent
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn may_play(&self) -> bool {
        self.consent == ConsentState::Granted
    }

    pub fn prompt_visible(&self) -> bool {
        self.consent == ConsentState::Unset
    }

    pub fn widget_visible(&self) -> bool {
        self.may_play() && self.visibility.shown && !self.visibility.user_dismissed
    }

    pub fn reopen_visible(&self) -> bool {
        self.may_play() && self.visibility.user_dismissed
    }

    pub fn answer(&mut self, accepted: bool) -> ConsentChange {
        if self.consent != ConsentState::Unset {
            return ConsentChange::Unchanged;
        }

        if accepted {
            self.consent = ConsentState::Granted;
            self.visibility.shown = true;
            self.visibility.user_dismissed = false;
            ConsentChange::Granted
        } else {
            self.consent = ConsentState::Denied;
            self.visibility.shown = false;
            ConsentChange::Denied
        }
    }

    /// Returns false when the widget was not visible to begin with.
    pub fn dismiss(&mut self, was_playing: bool) -> bool {
        if !self.widget_visible() {
            return false;
        }
        self.visibility.user_dismissed = true;
        self.playing_at_dismissal = was_playing;
        true
    }

    /// Returns `Some(resume)` on a real transition, where `resume` tells whether
    /// playback was running when the widget was dismissed.
    pub fn reopen(&mut self) -> Option<bool> {
        if !self.reopen_visible() {
            return None;
        }
        self.visibility.user_dismissed = false;
        self.visibility.shown = true;
        Some(std::mem::take(&mut self.playing_at_dismissal))
    }
}
