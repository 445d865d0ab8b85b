/// Dynamic status bar state, rebuilt after every key press and tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarState {
    /// Left side hint text (e.g., "i: edit id  n: notify")
    pub left_hint: String,
    /// Right side hint text (e.g., "Enter: proceed  ?: help")
    pub right_hint: String,
}

impl StatusBarState {
    /// Vendor id entry, normal mode
    pub fn input_normal(can_proceed: bool) -> Self {
        Self {
            left_hint: "i: edit id  n: notify".to_string(),
            right_hint: if can_proceed {
                "Enter: proceed  ?: help  q: quit".to_string()
            } else {
                "?: help  q: quit".to_string()
            },
        }
    }

    /// Vendor id entry, insert mode
    pub fn input_insert() -> Self {
        Self {
            left_hint: "Type the numeric vendor id".to_string(),
            right_hint: "Esc: normal  Enter: proceed".to_string(),
        }
    }

    pub fn confirm() -> Self {
        Self {
            left_hint: "This cannot be undone".to_string(),
            right_hint: "y: deboard  n/Esc: cancel".to_string(),
        }
    }

    pub fn loading() -> Self {
        Self {
            left_hint: "Please wait...".to_string(),
            right_hint: String::new(),
        }
    }

    pub fn success() -> Self {
        Self {
            left_hint: "Vendor removed".to_string(),
            right_hint: "Enter: deboard another  q: quit".to_string(),
        }
    }

    pub fn error() -> Self {
        Self {
            left_hint: "Deboard failed".to_string(),
            right_hint: "Enter: try again  q: quit".to_string(),
        }
    }

    pub fn command_mode() -> Self {
        Self {
            left_hint: String::new(),
            right_hint: "Enter: run  Esc: cancel".to_string(),
        }
    }
}
