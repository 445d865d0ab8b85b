use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::service::{ServiceError, VendorId};
use crate::vim::InputBuffer;

/// Record categories the backend removes on deboard, listed on the
/// confirmation screen.
pub const DELETION_SCOPE: [&str; 7] = [
    "Bookings, transactions & payment mappings",
    "Slots, available games & console associations",
    "Cafe passes & user passes",
    "Amenities, opening days & timing",
    "Documents, address & contact info",
    "Vendor PIN & business registration",
    "Dynamic vendor-specific tables",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    Input,
    Confirm { vendor: VendorId },
    Loading { vendor: VendorId },
    Success { vendor: VendorId, completed_at: DateTime<Local> },
    Error { vendor: VendorId, message: String },
}

impl WizardState {
    pub fn name(&self) -> &'static str {
        match self {
            WizardState::Input => "input",
            WizardState::Confirm { .. } => "confirm",
            WizardState::Loading { .. } => "loading",
            WizardState::Success { .. } => "success",
            WizardState::Error { .. } => "error",
        }
    }

    /// Vendor the wizard is committed to, once past `Input`
    pub fn vendor(&self) -> Option<VendorId> {
        match self {
            WizardState::Input => None,
            WizardState::Confirm { vendor }
            | WizardState::Loading { vendor }
            | WizardState::Success { vendor, .. }
            | WizardState::Error { vendor, .. } => Some(*vendor),
        }
    }
}

/// Outcome of the optional heads-up sent before deboarding
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NotifyStatus {
    #[default]
    Idle,
    Sending { vendor: VendorId },
    Sent { vendor: VendorId },
    Failed { vendor: VendorId, message: String },
}

/// Vendor deboard state machine.
///
/// `Input -> Confirm -> Loading -> Success | Error`, with `reset` leading
/// back to `Input`. Every transition method is a no-op (returning `false` or
/// `None`) when called from a state it does not start from, so a repeated
/// key press or a late network completion can never skip the confirmation
/// step or overwrite a newer outcome.
#[derive(Debug, Clone)]
pub struct DeboardWizard {
    state: WizardState,
    vendor_input: InputBuffer,
    notify: NotifyStatus,
}

impl Default for DeboardWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl DeboardWizard {
    pub fn new() -> Self {
        Self {
            state: WizardState::Input,
            vendor_input: InputBuffer::new(),
            notify: NotifyStatus::Idle,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn notify_status(&self) -> &NotifyStatus {
        &self.notify
    }

    pub fn vendor_input(&self) -> &InputBuffer {
        &self.vendor_input
    }

    /// The typed vendor id, if it is valid
    pub fn vendor_id(&self) -> Option<VendorId> {
        VendorId::parse(self.vendor_input.content())
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            WizardState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn notify_error(&self) -> Option<&str> {
        match &self.notify {
            NotifyStatus::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn was_notified(&self, vendor: VendorId) -> bool {
        self.notify == NotifyStatus::Sent { vendor }
    }

    /// A remote call is outstanding
    pub fn is_busy(&self) -> bool {
        matches!(self.state, WizardState::Loading { .. })
            || matches!(self.notify, NotifyStatus::Sending { .. })
    }

    /// Apply an edit to the vendor id field. Only possible in `Input`; any
    /// change to the text drops the notification status back to `Idle`.
    pub fn edit_vendor<R>(&mut self, edit: impl FnOnce(&mut InputBuffer) -> R) -> Option<R> {
        if self.state != WizardState::Input {
            return None;
        }

        let before = self.vendor_input.content().to_string();
        let result = edit(&mut self.vendor_input);
        if self.vendor_input.content() != before {
            if self.notify != NotifyStatus::Idle {
                debug!("Vendor id edited, clearing notification status");
            }
            self.notify = NotifyStatus::Idle;
        }
        Some(result)
    }

    pub fn set_vendor_text(&mut self, text: &str) -> bool {
        self.edit_vendor(|buf| buf.set(text)).is_some()
    }

    pub fn can_notify(&self) -> bool {
        self.state == WizardState::Input
            && self.vendor_id().is_some()
            && matches!(self.notify, NotifyStatus::Idle | NotifyStatus::Failed { .. })
    }

    pub fn can_proceed(&self) -> bool {
        self.state == WizardState::Input && self.vendor_id().is_some()
    }

    /// Mark a notification as in flight and return the vendor to notify.
    pub fn begin_notify(&mut self) -> Option<VendorId> {
        if !self.can_notify() {
            return None;
        }
        let vendor = self.vendor_id()?;
        info!("Sending deboard notification to vendor {}", vendor);
        self.notify = NotifyStatus::Sending { vendor };
        Some(vendor)
    }

    /// Record the outcome of a notification. Completions for a vendor other
    /// than the one currently being notified are discarded.
    pub fn finish_notify(&mut self, vendor: VendorId, result: Result<(), ServiceError>) -> bool {
        if self.notify != (NotifyStatus::Sending { vendor }) {
            debug!("Discarding stale notify completion for vendor {}", vendor);
            return false;
        }

        self.notify = match result {
            Ok(()) => NotifyStatus::Sent { vendor },
            Err(e) => {
                warn!("Notification to vendor {} failed: {}", vendor, e);
                NotifyStatus::Failed {
                    vendor,
                    message: e.to_string(),
                }
            }
        };
        true
    }

    /// `Input -> Confirm`; no network traffic.
    pub fn proceed(&mut self) -> bool {
        if !self.can_proceed() {
            return false;
        }
        let Some(vendor) = self.vendor_id() else {
            return false;
        };
        self.state = WizardState::Confirm { vendor };
        true
    }

    /// `Confirm -> Loading`; returns the vendor to delete.
    pub fn begin_deboard(&mut self) -> Option<VendorId> {
        let vendor = match &self.state {
            WizardState::Confirm { vendor } => *vendor,
            _ => return None,
        };
        info!("Deboard confirmed for vendor {}", vendor);
        self.state = WizardState::Loading { vendor };
        Some(vendor)
    }

    /// `Loading -> Success | Error`
    pub fn finish_deboard(&mut self, vendor: VendorId, result: Result<(), ServiceError>) -> bool {
        if self.state != (WizardState::Loading { vendor }) {
            debug!("Discarding deboard completion for vendor {} in state {}", vendor, self.state.name());
            return false;
        }

        self.state = match result {
            Ok(()) => WizardState::Success {
                vendor,
                completed_at: Local::now(),
            },
            Err(e) => WizardState::Error {
                vendor,
                message: e.to_string(),
            },
        };
        true
    }

    /// Back to an empty `Input`. Refused while the deboard call is in flight.
    pub fn reset(&mut self) -> bool {
        if matches!(self.state, WizardState::Loading { .. }) {
            return false;
        }
        self.state = WizardState::Input;
        self.vendor_input.clear();
        self.notify = NotifyStatus::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(message: &str) -> ServiceError {
        ServiceError::Rejected {
            status: 500,
            message: message.to_string(),
        }
    }

    fn wizard_with(text: &str) -> DeboardWizard {
        let mut wizard = DeboardWizard::new();
        wizard.set_vendor_text(text);
        wizard
    }

    #[test]
    fn invalid_ids_keep_notify_and_proceed_inert() {
        for text in ["", "   ", "abc", "12a", "-1", "3.5"] {
            let mut wizard = wizard_with(text);
            assert!(!wizard.can_notify(), "notify enabled for {text:?}");
            assert!(wizard.begin_notify().is_none());
            assert!(!wizard.proceed());
            assert_eq!(*wizard.state(), WizardState::Input);
            assert_eq!(*wizard.notify_status(), NotifyStatus::Idle);
        }
    }

    #[test]
    fn deboard_requires_confirm() {
        let mut wizard = wizard_with("42");
        assert!(wizard.begin_deboard().is_none());
        assert_eq!(*wizard.state(), WizardState::Input);

        assert!(wizard.proceed());
        assert!(!wizard.proceed());
        assert_eq!(wizard.begin_deboard(), Some(VendorId::from(42)));
        assert!(wizard.begin_deboard().is_none());
    }

    #[test]
    fn successful_notify_is_sticky_until_edit() {
        let mut wizard = wizard_with("42");
        let vendor = wizard.begin_notify().unwrap();
        assert!(wizard.is_busy());
        assert!(wizard.begin_notify().is_none());

        assert!(wizard.finish_notify(vendor, Ok(())));
        assert_eq!(*wizard.notify_status(), NotifyStatus::Sent { vendor });
        assert!(!wizard.can_notify());

        wizard.edit_vendor(|buf| buf.insert('3'));
        assert_eq!(*wizard.notify_status(), NotifyStatus::Idle);
        assert!(wizard.can_notify());
    }

    #[test]
    fn edit_that_changes_nothing_keeps_status() {
        let mut wizard = wizard_with("42");
        let vendor = wizard.begin_notify().unwrap();
        wizard.finish_notify(vendor, Ok(()));

        wizard.edit_vendor(|buf| buf.move_start());
        assert!(wizard.was_notified(vendor));
    }

    #[test]
    fn failed_notify_is_retryable() {
        let mut wizard = wizard_with("5");
        let vendor = wizard.begin_notify().unwrap();
        wizard.finish_notify(vendor, Err(rejected("mail server down")));

        assert_eq!(wizard.notify_error(), Some("mail server down"));
        assert_eq!(wizard.begin_notify(), Some(vendor));
        assert_eq!(wizard.notify_error(), None);
    }

    #[test]
    fn stale_notify_completion_is_dropped() {
        let mut wizard = wizard_with("42");
        let old = wizard.begin_notify().unwrap();

        wizard.set_vendor_text("43");
        let new = wizard.begin_notify().unwrap();

        assert!(!wizard.finish_notify(old, Ok(())));
        assert_eq!(*wizard.notify_status(), NotifyStatus::Sending { vendor: new });
        assert!(wizard.finish_notify(new, Ok(())));
        assert!(wizard.was_notified(new));
    }

    #[test]
    fn notify_does_not_gate_deboard() {
        let mut wizard = wizard_with("8");
        assert!(wizard.proceed());
        assert!(wizard.begin_deboard().is_some());
    }

    #[test]
    fn vendor_cannot_be_edited_after_input() {
        let mut wizard = wizard_with("9");
        wizard.proceed();
        assert!(!wizard.set_vendor_text("10"));
        assert_eq!(wizard.state().vendor(), Some(VendorId::from(9)));
    }

    #[test]
    fn failed_deboard_reports_server_text() {
        let mut wizard = wizard_with("7");
        wizard.proceed();
        let vendor = wizard.begin_deboard().unwrap();

        assert!(wizard.finish_deboard(vendor, Err(rejected("vendor has active bookings"))));
        assert_eq!(wizard.error_message(), Some("vendor has active bookings"));
        assert_eq!(wizard.state().name(), "error");
    }

    #[test]
    fn deboard_completion_outside_loading_is_ignored() {
        let mut wizard = wizard_with("7");
        assert!(!wizard.finish_deboard(VendorId::from(7), Ok(())));

        wizard.proceed();
        let vendor = wizard.begin_deboard().unwrap();
        wizard.finish_deboard(vendor, Ok(()));
        assert!(!wizard.finish_deboard(vendor, Err(rejected("late"))));
        assert!(matches!(wizard.state(), WizardState::Success { .. }));
    }

    #[test]
    fn reset_clears_everything_from_terminal_states() {
        let mut confirm = wizard_with("1");
        let vendor = confirm.begin_notify().unwrap();
        confirm.finish_notify(vendor, Err(rejected("x")));
        confirm.proceed();

        let mut success = wizard_with("2");
        success.proceed();
        let v = success.begin_deboard().unwrap();
        success.finish_deboard(v, Ok(()));

        let mut error = wizard_with("3");
        error.proceed();
        let v = error.begin_deboard().unwrap();
        error.finish_deboard(v, Err(rejected("boom")));

        for mut wizard in [confirm, success, error] {
            assert!(wizard.reset());
            assert_eq!(*wizard.state(), WizardState::Input);
            assert!(wizard.vendor_input().is_empty());
            assert_eq!(*wizard.notify_status(), NotifyStatus::Idle);
            assert_eq!(wizard.error_message(), None);
            assert_eq!(wizard.notify_error(), None);
        }
    }

    #[test]
    fn reset_refused_while_loading() {
        let mut wizard = wizard_with("11");
        wizard.proceed();
        let vendor = wizard.begin_deboard().unwrap();

        assert!(!wizard.reset());
        assert_eq!(*wizard.state(), WizardState::Loading { vendor });
    }

    #[test]
    fn happy_path_for_vendor_42() {
        let mut wizard = wizard_with("42");
        let vendor = wizard.begin_notify().unwrap();
        wizard.finish_notify(vendor, Ok(()));
        assert!(wizard.was_notified(vendor));

        assert!(wizard.proceed());
        assert_eq!(*wizard.state(), WizardState::Confirm { vendor });

        let vendor = wizard.begin_deboard().unwrap();
        assert!(wizard.finish_deboard(vendor, Ok(())));
        assert!(matches!(wizard.state(), WizardState::Success { vendor, .. } if vendor.get() == 42));
    }
}
