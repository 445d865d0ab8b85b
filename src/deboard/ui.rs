use chrono::Local;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::wizard::{NotifyStatus, WizardState, DELETION_SCOPE};
use super::DeboardApp;
use crate::ui::Layout;
use crate::vim::VimMode;

const CARD_WIDTH: u16 = 68;
/// Row of the vendor id field inside the card, counted from the inner top
const FIELD_ROW: u16 = 4;
const FIELD_INDENT: u16 = 4;
const FIELD_WIDTH: usize = 24;

/// Main draw function for the deboard wizard
pub fn draw(frame: &mut Frame, app: &DeboardApp) {
    let layout = Layout::new(frame.area());
    frame.render_widget(Clear, layout.full);

    draw_header(frame, layout.header, app);
    draw_card(frame, layout.content, app);
    draw_message(frame, layout.message, app);
    draw_status_bar(frame, layout.status, app);

    if app.show_help {
        draw_help(frame, layout.content, app);
    }
}

/// Title on the left, API target and clock on the right
fn draw_header(frame: &mut Frame, area: Rect, app: &DeboardApp) {
    let title = format!(" {} (v{}) ", app.title, env!("CARGO_PKG_VERSION"));
    frame.render_widget(
        Paragraph::new(title).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    let mut spans = Vec::new();
    if app.dryrun {
        spans.push(Span::styled("[DRYRUN] ", app.theme.error_style().add_modifier(Modifier::BOLD)));
    }
    spans.push(Span::styled(format!("{}  ", app.target), app.theme.muted_style()));
    spans.push(Span::styled(
        Local::now().format("%H:%M").to_string(),
        app.theme.primary_style().add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw(" "));

    frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Right), area);
}

fn draw_card(frame: &mut Frame, area: Rect, app: &DeboardApp) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Vendor Deboard",
            app.theme.style().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Permanently removes all records associated with a vendor.",
            app.theme.muted_style(),
        )),
        Line::from(""),
    ];

    match app.wizard.state() {
        WizardState::Input => lines.extend(input_lines(app)),
        WizardState::Confirm { vendor } => lines.extend(confirm_lines(app, vendor.get())),
        WizardState::Loading { vendor } => lines.extend(loading_lines(app, vendor.get())),
        WizardState::Success { vendor, completed_at } => {
            lines.extend(success_lines(app, vendor.get(), &completed_at.format("%H:%M:%S").to_string()))
        }
        WizardState::Error { message, .. } => lines.extend(error_lines(app, message)),
    }

    let height = lines.len() as u16 + 2;
    let card = Layout::centered_box(area, CARD_WIDTH, height);

    let border_style = match app.wizard.state() {
        WizardState::Confirm { .. } | WizardState::Error { .. } => app.theme.error_style(),
        WizardState::Success { .. } => app.theme.success_style(),
        _ => app.theme.border_style(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", app.wizard.state().name()));

    let inner = block.inner(card);
    frame.render_widget(Clear, card);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        card,
    );

    // Terminal cursor inside the vendor id field while typing
    if app.wizard.state() == &WizardState::Input
        && app.vim_mode == VimMode::Insert
        && inner.height > FIELD_ROW
    {
        let offset = (app.wizard.vendor_input().cursor() as u16).min(FIELD_WIDTH as u16);
        frame.set_cursor_position(Position::new(inner.x + FIELD_INDENT + offset, inner.y + FIELD_ROW));
    }
}

fn input_lines(app: &DeboardApp) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let wizard = &app.wizard;
    let input = wizard.vendor_input();

    let field = if input.is_empty() {
        Span::styled(
            format!("{:<width$}", "Enter numeric Vendor ID", width = FIELD_WIDTH),
            theme.muted_style().add_modifier(Modifier::UNDERLINED),
        )
    } else {
        let style = if wizard.vendor_id().is_some() {
            theme.style()
        } else {
            theme.error_style()
        };
        Span::styled(
            format!("{:<width$}", input.content(), width = FIELD_WIDTH),
            style.add_modifier(Modifier::UNDERLINED),
        )
    };

    let mut lines = vec![
        Line::from(Span::styled("Vendor ID", theme.secondary_style())),
        Line::from(vec![Span::raw("  > "), field]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Notify Vendor ", theme.secondary_style()),
            Span::styled("(recommended before deboarding)", theme.muted_style()),
        ]),
    ];

    let notify_button = match wizard.notify_status() {
        NotifyStatus::Sending { .. } => Span::styled(
            format!(" {} Sending Notification... ", app.spinner_char()),
            theme.muted_style(),
        ),
        NotifyStatus::Sent { .. } => Span::styled(" ✓ Notification Sent ", theme.success_style()),
        NotifyStatus::Failed { .. } => Span::styled(" [n] ↺ Retry Notification ", theme.button_style(theme.error)),
        NotifyStatus::Idle if wizard.can_notify() => {
            Span::styled(" [n] Notify Vendor ", theme.button_style(theme.secondary))
        }
        NotifyStatus::Idle => Span::styled(" [n] Notify Vendor ", theme.disabled_style()),
    };
    lines.push(Line::from(vec![Span::raw("  "), notify_button]));

    match wizard.notify_status() {
        NotifyStatus::Sent { vendor } => lines.push(Line::from(Span::styled(
            format!("  Vendor #{vendor} has been notified about the upcoming deboard."),
            theme.success_style(),
        ))),
        NotifyStatus::Failed { message, .. } => lines.push(Line::from(Span::styled(
            format!("  ✕ {message}"),
            theme.error_style(),
        ))),
        NotifyStatus::Idle if !input.is_empty() => lines.push(Line::from(Span::styled(
            "  You can deboard without notifying, but it is not recommended.",
            theme.muted_style(),
        ))),
        _ => lines.push(Line::from("")),
    }

    lines.push(Line::from(""));
    let proceed_style = if wizard.can_proceed() {
        theme.button_style(theme.error)
    } else {
        theme.disabled_style()
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(" [Enter] Proceed to Deboard ", proceed_style),
    ]));

    lines
}

fn confirm_lines(app: &DeboardApp, vendor: u64) -> Vec<Line<'static>> {
    let theme = &app.theme;

    let mut lines = vec![
        Line::from(Span::styled(
            "⚠ This action is irreversible",
            theme.error_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("The following will be ", theme.style()),
            Span::styled("permanently deleted", theme.style().add_modifier(Modifier::BOLD)),
            Span::styled(" for ", theme.style()),
            Span::styled(format!("Vendor #{vendor}"), theme.error_style().add_modifier(Modifier::BOLD)),
            Span::styled(":", theme.style()),
        ]),
    ];

    for item in DELETION_SCOPE {
        lines.push(Line::from(vec![
            Span::styled("  ✕ ", theme.error_style()),
            Span::styled(item, theme.muted_style()),
        ]));
    }
    lines.push(Line::from(""));

    if app.wizard.was_notified(vendor.into()) {
        lines.push(Line::from(Span::styled(
            format!("✓ Vendor #{vendor} was notified before this action."),
            theme.success_style(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "⚠ Vendor was not notified. Consider notifying before proceeding.",
            theme.warning_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" [n] Cancel ", theme.button_style(theme.border)),
        Span::raw("   "),
        Span::styled(" [y] Confirm Deboard ", theme.button_style(theme.error)),
    ]));
    lines
}

fn loading_lines(app: &DeboardApp, vendor: u64) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Deboarding Vendor #{vendor}...", app.spinner_char()),
            app.theme.style(),
        )),
        Line::from(Span::styled(
            "Removing all associated records. Please wait.",
            app.theme.muted_style(),
        )),
        Line::from(""),
    ]
}

fn success_lines(app: &DeboardApp, vendor: u64, completed_at: &str) -> Vec<Line<'static>> {
    let theme = &app.theme;
    vec![
        Line::from(Span::styled(
            "✓ Deboarded Successfully",
            theme.success_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Vendor ", theme.style()),
            Span::styled(format!("#{vendor}"), theme.style().add_modifier(Modifier::BOLD)),
            Span::styled(" and all associated records have been removed.", theme.style()),
        ]),
        Line::from(Span::styled(format!("Completed at {completed_at}"), theme.muted_style())),
        Line::from(""),
        Line::from(Span::styled(" [Enter] Deboard Another Vendor ", theme.button_style(theme.border))),
    ]
}

fn error_lines(app: &DeboardApp, message: &str) -> Vec<Line<'static>> {
    let theme = &app.theme;
    vec![
        Line::from(Span::styled(
            "✕ Deboarding Failed",
            theme.error_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.style())),
        Line::from(""),
        Line::from(Span::styled(" [Enter] Try Again ", theme.button_style(theme.border))),
    ]
}

fn draw_message(frame: &mut Frame, area: Rect, app: &DeboardApp) {
    let Some(msg) = &app.message else {
        return;
    };

    let (title, border_style, text_style) = if msg.is_error {
        (" Error ", app.theme.error_style(), app.theme.error_style())
    } else {
        (" Info ", app.theme.secondary_style(), app.theme.style())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(border_style.add_modifier(Modifier::BOLD));

    let content = Line::from(vec![
        Span::styled(msg.text.as_str(), text_style),
        Span::styled(" (press any key to dismiss)", app.theme.muted_style()),
    ]);

    frame.render_widget(Paragraph::new(content).block(block).wrap(Wrap { trim: true }), area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &DeboardApp) {
    frame.render_widget(Clear, area);

    let mode_name = app.vim_mode.display_name();
    let mode_span = Span::styled(format!(" {mode_name} "), app.theme.mode_style(app.vim_mode));

    let after_mode = if app.vim_mode == VimMode::Command {
        Span::styled(format!(":{}", app.command_buffer.content()), app.theme.style())
    } else {
        Span::styled(app.status_bar.left_hint.clone(), app.theme.muted_style())
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![mode_span, Span::raw(" "), after_mode])),
        Rect::new(area.x, area.y, area.width * 2 / 3, 1),
    );

    let right_text = if app.wizard.is_busy() {
        format!("{} {} ", app.spinner_char(), app.status_bar.right_hint)
    } else {
        format!("{} ", app.status_bar.right_hint)
    };
    frame.render_widget(
        Paragraph::new(right_text)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        Rect::new(area.x + area.width / 3, area.y, area.width - area.width / 3, 1),
    );
}

fn draw_help(frame: &mut Frame, area: Rect, app: &DeboardApp) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Vendor ID", bold)),
        Line::from("  i / a      Edit the vendor id"),
        Line::from("  Esc        Stop editing"),
        Line::from("  n          Notify vendor"),
        Line::from("  Enter / p  Proceed to confirmation"),
        Line::from(""),
        Line::from(Span::styled("Confirmation", bold)),
        Line::from("  y          Deboard (irreversible)"),
        Line::from("  n / Esc    Cancel"),
        Line::from(""),
        Line::from(Span::styled("Commands", bold)),
        Line::from("  :notify :proceed :deboard"),
        Line::from("  :reset :help :q"),
        Line::from(""),
        Line::from(Span::styled("Ctrl+C quits at any time", app.theme.muted_style())),
        Line::from(Span::styled("Press Esc to close", app.theme.muted_style())),
    ];

    let height = help_text.len() as u16 + 2;
    let width = 44u16.min(area.width.saturating_sub(4));
    let help_area = Layout::centered_box(area, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Help ")
        .title_style(app.theme.primary_style());

    frame.render_widget(Clear, help_area);
    frame.render_widget(Paragraph::new(help_text).block(block), help_area);
}
