//! Shared helpers for bootstrapper integration tests.

use pcloud_bootstrapper::{ConsentOutcome, Locale, UserInterface, WindowHandle};

/// User interface that answers the dialog from a script and records
/// everything it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingUi {
    /// Index into the offered locales to confirm with; `None` dismisses.
    pub pick: Option<usize>,
    pub dialogs: Vec<(Vec<Locale>, Locale)>,
    pub notices: Vec<String>,
    pub errors: Vec<String>,
}

impl RecordingUi {
    pub fn confirming(pick: usize) -> Self {
        Self {
            pick: Some(pick),
            ..Default::default()
        }
    }

    pub fn dismissing() -> Self {
        Self::default()
    }
}

impl UserInterface for RecordingUi {
    fn choose_language(&mut self, supported: &[Locale], default: Locale) -> ConsentOutcome {
        self.dialogs.push((supported.to_vec(), default));
        match self.pick.and_then(|index| supported.get(index)) {
            Some(locale) => ConsentOutcome::Confirmed(*locale),
            None => ConsentOutcome::Dismissed,
        }
    }

    fn show_notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn window_handle(&self) -> WindowHandle {
        WindowHandle(0x1F00)
    }
}
