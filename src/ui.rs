//! User-facing surfaces the orchestrator drives.

use crate::engine::WindowHandle;
use crate::Locale;
use tracing::{info, warn};

/// Result of the language-choice / consent dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentOutcome {
    /// The user accepted, with the locale selected when they did.
    Confirmed(Locale),
    /// The dialog was closed or cancelled.
    Dismissed,
}

impl ConsentOutcome {
    pub fn locale(&self) -> Option<Locale> {
        match self {
            Self::Confirmed(locale) => Some(*locale),
            Self::Dismissed => None,
        }
    }
}

/// Modal dialogs and messages shown during a run.
///
/// Every method blocks until the user closes the surface.
pub trait UserInterface {
    /// Offer `supported` with `default` preselected and ask to continue.
    fn choose_language(&mut self, supported: &[Locale], default: Locale) -> ConsentOutcome;

    /// Informational message, e.g. that the product is already installed.
    fn show_notice(&mut self, message: &str);

    /// Error reported by the installer engine.
    fn show_error(&mut self, message: &str);

    /// Window engine UI should be parented to during apply.
    fn window_handle(&self) -> WindowHandle {
        WindowHandle::default()
    }
}

/// Non-interactive front end for quiet installs.
///
/// Answers the consent dialog without a user, and writes notices and errors
/// to the log instead of showing them.
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::{ConsentOutcome, HeadlessUi, Locale, UserInterface};
///
/// let mut ui = HeadlessUi::accepting(Some(Locale::ZhCn));
/// let outcome = ui.choose_language(&[Locale::EnUs, Locale::ZhCn], Locale::EnUs);
/// assert_eq!(outcome, ConsentOutcome::Confirmed(Locale::ZhCn));
/// ```
#[derive(Debug, Clone)]
pub struct HeadlessUi {
    accept: bool,
    preferred: Option<Locale>,
}

impl HeadlessUi {
    /// Confirm with `preferred` if it is supported, else the default locale.
    pub fn accepting(preferred: Option<Locale>) -> Self {
        Self {
            accept: true,
            preferred,
        }
    }

    /// Dismiss the consent dialog.
    pub fn declining() -> Self {
        Self {
            accept: false,
            preferred: None,
        }
    }
}

impl UserInterface for HeadlessUi {
    fn choose_language(&mut self, supported: &[Locale], default: Locale) -> ConsentOutcome {
        if !self.accept {
            info!("consent declined in quiet mode");
            return ConsentOutcome::Dismissed;
        }
        let locale = self
            .preferred
            .filter(|preferred| supported.contains(preferred))
            .unwrap_or(default);
        info!(locale = %locale, "consent given in quiet mode");
        ConsentOutcome::Confirmed(locale)
    }

    fn show_notice(&mut self, message: &str) {
        info!("{}", message);
    }

    fn show_error(&mut self, message: &str) {
        warn!("Error: {}", message);
    }
}
