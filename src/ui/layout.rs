use ratatui::layout::{Constraint, Flex, Layout as RatatuiLayout, Rect};

/// Screen regions shared by every wizard state
pub struct Layout {
    pub full: Rect,
    pub header: Rect,
    pub content: Rect,
    pub message: Rect,
    pub status: Rect,
}

impl Layout {
    pub fn new(area: Rect) -> Self {
        // The message panel is reserved even when empty so the card stays put
        let [header, content, message, status] = RatatuiLayout::vertical([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        Self {
            full: area,
            header,
            content,
            message,
            status,
        }
    }

    /// Centered rect of at most `width` x `height`, clipped to `area`
    pub fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
        let [column] = RatatuiLayout::horizontal([Constraint::Length(width.min(area.width))])
            .flex(Flex::Center)
            .areas(area);
        let [cell] = RatatuiLayout::vertical([Constraint::Length(height.min(area.height))])
            .flex(Flex::Center)
            .areas(column);
        cell
    }
}
