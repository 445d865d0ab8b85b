pub mod ui;
mod widgets;
mod wizard;

pub use widgets::StatusBarState;
pub use wizard::{DeboardWizard, NotifyStatus, WizardState, DELETION_SCOPE};

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::service::{ServiceError, VendorId, VendorService};
use crate::ui::Theme;
use crate::vim::{parse_command, Command, InputBuffer, ModeAction, VimMode};

/// Remote calls requested by a key press, performed by the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeboardAction {
    Notify(VendorId),
    Deboard(VendorId),
}

/// Completion reports sent back from background tasks
#[derive(Debug)]
pub enum ExecutionMessage {
    NotifyFinished {
        vendor: VendorId,
        result: Result<(), ServiceError>,
    },
    DeboardFinished {
        vendor: VendorId,
        result: Result<(), ServiceError>,
    },
}

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// Run `action` against `service` on a background task; the outcome arrives
/// on `tx`.
pub fn spawn_action(
    action: DeboardAction,
    service: Arc<dyn VendorService>,
    tx: mpsc::UnboundedSender<ExecutionMessage>,
) {
    tokio::spawn(async move {
        let message = match action {
            DeboardAction::Notify(vendor) => ExecutionMessage::NotifyFinished {
                vendor,
                result: service.notify_vendor(vendor).await,
            },
            DeboardAction::Deboard(vendor) => ExecutionMessage::DeboardFinished {
                vendor,
                result: service.deboard_vendor(vendor).await,
            },
        };
        if tx.send(message).is_err() {
            debug!("Event loop gone, dropping completion for {:?}", action);
        }
    });
}

/// Terminal front end of the deboard wizard
pub struct DeboardApp {
    pub wizard: DeboardWizard,
    pub theme: Theme,
    pub title: String,
    /// Where requests go, shown in the header
    pub target: String,
    pub dryrun: bool,

    pub vim_mode: VimMode,
    pub command_buffer: InputBuffer,

    pub message: Option<Message>,
    pub show_help: bool,
    pub should_exit: bool,
    pub status_bar: StatusBarState,

    spinner_frame: usize,
}

impl DeboardApp {
    pub fn new(title: impl Into<String>, target: impl Into<String>, dryrun: bool) -> Self {
        let mut app = Self {
            wizard: DeboardWizard::new(),
            theme: Theme::default(),
            title: title.into(),
            target: target.into(),
            dryrun,
            vim_mode: VimMode::Insert,
            command_buffer: InputBuffer::new(),
            message: None,
            show_help: false,
            should_exit: false,
            status_bar: StatusBarState::default(),
            spinner_frame: 0,
        };
        app.update_status_bar();
        app
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<DeboardAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return None;
        }

        // Clear message on any key
        if self.message.is_some() {
            self.message = None;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                self.show_help = false;
            }
            self.update_status_bar();
            return None;
        }

        // No input accepted while the deletion is running
        if matches!(self.wizard.state(), WizardState::Loading { .. }) {
            return None;
        }

        let result = if self.vim_mode == VimMode::Command {
            self.handle_command_mode(key)
        } else {
            match self.wizard.state() {
                WizardState::Input => match self.vim_mode {
                    VimMode::Insert => self.handle_insert_mode(key),
                    _ => self.handle_input_normal(key),
                },
                WizardState::Confirm { .. } => self.handle_confirm_key(key),
                WizardState::Success { .. } | WizardState::Error { .. } => self.handle_finished_key(key),
                WizardState::Loading { .. } => None,
            }
        };

        self.update_status_bar();
        result
    }

    /// Bracketed paste into the vendor id field
    pub fn handle_paste(&mut self, text: &str) {
        if self.wizard.edit_vendor(|buf| buf.insert_str(text)).is_some() {
            self.update_status_bar();
        }
    }

    fn handle_input_normal(&mut self, key: KeyEvent) -> Option<DeboardAction> {
        match key.code {
            KeyCode::Char(':') => self.enter_command_mode(),
            KeyCode::Char('i') => {
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
            }
            KeyCode::Char('a') => {
                self.wizard.edit_vendor(|buf| buf.move_right());
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
            }
            KeyCode::Char('A') => {
                self.wizard.edit_vendor(|buf| buf.move_end());
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.wizard.edit_vendor(|buf| buf.move_left());
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.wizard.edit_vendor(|buf| buf.move_right());
            }
            KeyCode::Char('0') | KeyCode::Home => {
                self.wizard.edit_vendor(|buf| buf.move_start());
            }
            KeyCode::Char('$') | KeyCode::End => {
                self.wizard.edit_vendor(|buf| buf.move_end());
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                self.wizard.edit_vendor(|buf| buf.delete_forward());
            }
            KeyCode::Char('D') => {
                self.wizard.edit_vendor(|buf| buf.clear());
            }
            KeyCode::Char('n') => return self.notify(),
            KeyCode::Char('p') | KeyCode::Enter => {
                self.proceed();
            }
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Char('q') => self.should_exit = true,
            _ => {}
        }
        None
    }

    fn handle_insert_mode(&mut self, key: KeyEvent) -> Option<DeboardAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
            }
            KeyCode::Enter => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                self.proceed();
            }
            KeyCode::Backspace => {
                self.wizard.edit_vendor(|buf| buf.delete_back());
            }
            KeyCode::Delete => {
                self.wizard.edit_vendor(|buf| buf.delete_forward());
            }
            KeyCode::Left => {
                self.wizard.edit_vendor(|buf| buf.move_left());
            }
            KeyCode::Right => {
                self.wizard.edit_vendor(|buf| buf.move_right());
            }
            KeyCode::Home => {
                self.wizard.edit_vendor(|buf| buf.move_start());
            }
            KeyCode::End => {
                self.wizard.edit_vendor(|buf| buf.move_end());
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    match c {
                        'u' => {
                            self.wizard.edit_vendor(|buf| buf.clear());
                        }
                        'a' => {
                            self.wizard.edit_vendor(|buf| buf.move_start());
                        }
                        'e' => {
                            self.wizard.edit_vendor(|buf| buf.move_end());
                        }
                        _ => {}
                    }
                } else {
                    self.wizard.edit_vendor(|buf| buf.insert(c));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<DeboardAction> {
        match key.code {
            // Enter is deliberately not accepted here
            KeyCode::Char('y') | KeyCode::Char('Y') => return self.confirm_deboard(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('c') | KeyCode::Esc => {
                self.reset();
            }
            KeyCode::Char(':') => self.enter_command_mode(),
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            _ => {}
        }
        None
    }

    fn handle_finished_key(&mut self, key: KeyEvent) -> Option<DeboardAction> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => {
                self.reset();
            }
            KeyCode::Char(':') => self.enter_command_mode(),
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Char('q') => self.should_exit = true,
            _ => {}
        }
        None
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<DeboardAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                let cmd = self.command_buffer.content().to_string();
                self.vim_mode = self.vim_mode.transition(ModeAction::Execute);
                self.command_buffer.clear();
                return self.execute_command(&cmd);
            }
            KeyCode::Backspace => {
                if self.command_buffer.is_empty() {
                    self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                } else {
                    self.command_buffer.delete_back();
                }
            }
            KeyCode::Char(c) => self.command_buffer.insert(c),
            _ => {}
        }
        None
    }

    fn enter_command_mode(&mut self) {
        self.vim_mode = self.vim_mode.transition(ModeAction::EnterCommand);
        self.command_buffer.clear();
    }

    fn execute_command(&mut self, cmd: &str) -> Option<DeboardAction> {
        let command = match parse_command(cmd) {
            Ok(command) => command,
            Err(e) => {
                self.set_error(e.to_string());
                return None;
            }
        };
        debug!("Executing command {:?}", command);

        match command {
            Command::Notify => return self.notify(),
            Command::Proceed => {
                if !self.proceed() && self.wizard.state() != &WizardState::Input {
                    self.set_error("Nothing to proceed from; reset first".to_string());
                }
            }
            Command::Deboard => {
                if matches!(self.wizard.state(), WizardState::Confirm { .. }) {
                    return self.confirm_deboard();
                }
                self.set_error(":deboard is only available on the confirmation screen".to_string());
            }
            Command::Reset => {
                self.reset();
            }
            Command::Help => self.show_help = true,
            Command::Quit => self.should_exit = true,
        }
        None
    }

    fn notify(&mut self) -> Option<DeboardAction> {
        self.wizard.begin_notify().map(DeboardAction::Notify)
    }

    fn proceed(&mut self) -> bool {
        let proceeded = self.wizard.proceed();
        if proceeded {
            self.vim_mode = VimMode::Normal;
        }
        proceeded
    }

    fn confirm_deboard(&mut self) -> Option<DeboardAction> {
        self.wizard.begin_deboard().map(DeboardAction::Deboard)
    }

    fn reset(&mut self) {
        if self.wizard.reset() {
            self.vim_mode = VimMode::Insert;
        }
    }

    /// Handle an execution message from a background task
    pub fn handle_execution_message(&mut self, msg: ExecutionMessage) {
        match msg {
            ExecutionMessage::NotifyFinished { vendor, result } => {
                let ok = result.is_ok();
                if self.wizard.finish_notify(vendor, result) && ok {
                    info!("Vendor {} notified", vendor);
                }
            }
            ExecutionMessage::DeboardFinished { vendor, result } => {
                self.wizard.finish_deboard(vendor, result);
            }
        }
        self.update_status_bar();
    }

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message { text, is_error: true });
    }

    pub fn set_info(&mut self, text: String) {
        self.message = Some(Message { text, is_error: false });
    }

    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 4;
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
        SPINNER[self.spinner_frame]
    }

    /// Update status bar based on current application state
    pub fn update_status_bar(&mut self) {
        if self.vim_mode == VimMode::Command {
            self.status_bar = StatusBarState::command_mode();
            return;
        }

        self.status_bar = match self.wizard.state() {
            WizardState::Input if self.vim_mode == VimMode::Insert => StatusBarState::input_insert(),
            WizardState::Input => StatusBarState::input_normal(self.wizard.can_proceed()),
            WizardState::Confirm { .. } => StatusBarState::confirm(),
            WizardState::Loading { .. } => StatusBarState::loading(),
            WizardState::Success { .. } => StatusBarState::success(),
            WizardState::Error { .. } => StatusBarState::error(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut DeboardApp, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn app() -> DeboardApp {
        DeboardApp::new("Vendor Deboard", "dryrun", true)
    }

    #[test]
    fn starts_in_insert_mode_on_input() {
        let app = app();
        assert_eq!(app.vim_mode, VimMode::Insert);
        assert_eq!(*app.wizard.state(), WizardState::Input);
        assert_eq!(app.status_bar, StatusBarState::input_insert());
    }

    #[test]
    fn enter_with_non_numeric_id_stays_on_input() {
        let mut app = app();
        type_text(&mut app, "abc");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);

        assert_eq!(*app.wizard.state(), WizardState::Input);
        assert_eq!(app.handle_key(key(KeyCode::Char('n'))), None);
        assert_eq!(*app.wizard.notify_status(), NotifyStatus::Idle);
    }

    #[test]
    fn notify_then_deboard_flow() {
        let mut app = app();
        type_text(&mut app, "42");
        app.handle_key(key(KeyCode::Esc));

        let vendor = VendorId::from(42);
        assert_eq!(app.handle_key(key(KeyCode::Char('n'))), Some(DeboardAction::Notify(vendor)));
        // second press while sending does nothing
        assert_eq!(app.handle_key(key(KeyCode::Char('n'))), None);

        app.handle_execution_message(ExecutionMessage::NotifyFinished { vendor, result: Ok(()) });
        assert!(app.wizard.was_notified(vendor));

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(*app.wizard.state(), WizardState::Confirm { vendor });

        // Enter must not confirm a deletion
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(app.handle_key(key(KeyCode::Char('y'))), Some(DeboardAction::Deboard(vendor)));
        assert_eq!(app.status_bar, StatusBarState::loading());

        // input ignored while loading
        assert_eq!(app.handle_key(key(KeyCode::Char('y'))), None);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), None);
        assert_eq!(*app.wizard.state(), WizardState::Loading { vendor });

        app.handle_execution_message(ExecutionMessage::DeboardFinished { vendor, result: Ok(()) });
        assert!(matches!(app.wizard.state(), WizardState::Success { .. }));

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(*app.wizard.state(), WizardState::Input);
        assert!(app.wizard.vendor_input().is_empty());
        assert_eq!(app.vim_mode, VimMode::Insert);
    }

    #[test]
    fn typing_after_notify_resets_status() {
        let mut app = app();
        type_text(&mut app, "42");
        app.handle_key(key(KeyCode::Esc));
        let Some(DeboardAction::Notify(vendor)) = app.handle_key(key(KeyCode::Char('n'))) else {
            panic!("notify not dispatched");
        };
        app.handle_execution_message(ExecutionMessage::NotifyFinished { vendor, result: Ok(()) });

        app.handle_key(key(KeyCode::Char('A')));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(*app.wizard.notify_status(), NotifyStatus::Idle);
    }

    #[test]
    fn cancel_on_confirm_clears_everything() {
        let mut app = app();
        type_text(&mut app, "9");
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('n')));

        assert_eq!(*app.wizard.state(), WizardState::Input);
        assert!(app.wizard.vendor_input().is_empty());
    }

    #[test]
    fn failed_deboard_shows_server_error_and_retry_resets() {
        let mut app = app();
        type_text(&mut app, "7");
        app.handle_key(key(KeyCode::Enter));
        let vendor = VendorId::from(7);
        app.handle_key(key(KeyCode::Char('y')));

        app.handle_execution_message(ExecutionMessage::DeboardFinished {
            vendor,
            result: Err(ServiceError::Rejected {
                status: 500,
                message: "vendor has active bookings".to_string(),
            }),
        });
        assert_eq!(app.wizard.error_message(), Some("vendor has active bookings"));
        assert_eq!(app.status_bar, StatusBarState::error());

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(*app.wizard.state(), WizardState::Input);
    }

    #[test]
    fn deboard_command_outside_confirm_is_refused() {
        let mut app = app();
        type_text(&mut app, "5");
        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Char(':')));
        type_text(&mut app, "deboard");

        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(*app.wizard.state(), WizardState::Input);
        assert!(app.message.as_ref().is_some_and(|m| m.is_error));
    }

    #[test]
    fn commands_drive_the_wizard() {
        let mut app = app();
        type_text(&mut app, "12");
        app.handle_key(key(KeyCode::Esc));

        app.handle_key(key(KeyCode::Char(':')));
        type_text(&mut app, "proceed");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.wizard.state().name(), "confirm");

        app.handle_key(key(KeyCode::Char(':')));
        type_text(&mut app, "deboard");
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Some(DeboardAction::Deboard(VendorId::from(12)))
        );
    }

    #[test]
    fn unknown_command_sets_error_message() {
        let mut app = app();
        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Char(':')));
        type_text(&mut app, "wq");
        app.handle_key(key(KeyCode::Enter));

        let message = app.message.as_ref().unwrap();
        assert_eq!(message.text, "Unknown command: wq");
        assert_eq!(app.vim_mode, VimMode::Normal);
    }

    #[test]
    fn ctrl_c_quits_even_while_loading() {
        let mut app = app();
        type_text(&mut app, "3");
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('y')));

        app.handle_key(ctrl('c'));
        assert!(app.should_exit);
    }

    #[test]
    fn paste_fills_vendor_field() {
        let mut app = app();
        app.handle_paste("1234\n");
        assert_eq!(app.wizard.vendor_input().content(), "1234");
        assert_eq!(app.wizard.vendor_id(), Some(VendorId::from(1234)));
    }

    #[tokio::test]
    async fn spawned_action_reports_completion() {
        use crate::service::DryrunService;
        use std::time::Duration;

        let service: Arc<dyn VendorService> = Arc::new(DryrunService::with_latency(Duration::ZERO));
        let (tx, mut rx) = mpsc::unbounded_channel();

        spawn_action(DeboardAction::Deboard(VendorId::from(42)), service, tx);

        match rx.recv().await {
            Some(ExecutionMessage::DeboardFinished { vendor, result }) => {
                assert_eq!(vendor, VendorId::from(42));
                assert!(result.is_ok());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
