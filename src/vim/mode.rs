#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VimMode {
    #[default]
    Normal,
    Insert,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeAction {
    EnterInsert,
    EnterCommand,
    Escape,
    Execute,
}

impl VimMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            VimMode::Normal => "NORMAL",
            VimMode::Insert => "INSERT",
            VimMode::Command => "COMMAND",
        }
    }

    /// Insert mode may only be entered from normal mode; every other
    /// unmatched pair leaves the mode unchanged.
    pub fn transition(self, action: ModeAction) -> VimMode {
        match (self, action) {
            (VimMode::Normal, ModeAction::EnterInsert) => VimMode::Insert,
            (VimMode::Normal, ModeAction::EnterCommand) => VimMode::Command,
            (VimMode::Insert | VimMode::Command, ModeAction::Escape) => VimMode::Normal,
            (VimMode::Command, ModeAction::Execute) => VimMode::Normal,
            (mode, _) => mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_not_reachable_from_command() {
        assert_eq!(VimMode::Command.transition(ModeAction::EnterInsert), VimMode::Command);
        assert_eq!(VimMode::Normal.transition(ModeAction::EnterInsert), VimMode::Insert);
    }

    #[test]
    fn escape_always_returns_to_normal() {
        for mode in [VimMode::Normal, VimMode::Insert, VimMode::Command] {
            assert_eq!(mode.transition(ModeAction::Escape), VimMode::Normal);
        }
    }
}
