//! User commands offered by the viewer's menu.

use std::fmt;

/// A menu command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Choose a file and load it.
    Open,
    /// Choose a file and write the tree to it.
    Save,
    /// Load the open file again.
    Reload,
    /// Leave the viewer.
    Quit,
}

impl Action {
    /// Every action, in menu order.
    pub const ALL: [Action; 4] = [Action::Open, Action::Save, Action::Reload, Action::Quit];

    /// Menu text, with `&` marking the mnemonic.
    pub fn text(self) -> &'static str {
        match self {
            Action::Open => "&Open",
            Action::Save => "&Save",
            Action::Reload => "&Reload",
            Action::Quit => "&Quit",
        }
    }

    /// Menu text without the mnemonic marker.
    pub fn display_text(self) -> String {
        self.text().replace('&', "")
    }

    /// Keyboard shortcut.
    pub fn shortcut(self) -> &'static str {
        match self {
            Action::Open => "Ctrl+O",
            Action::Save => "Ctrl+S",
            Action::Reload => "F5",
            Action::Quit => "Ctrl+Q",
        }
    }

    /// Finds the action bound to a shortcut, ignoring case.
    pub fn from_shortcut(shortcut: &str) -> Option<Action> {
        Self::ALL
            .into_iter()
            .find(|action| action.shortcut().eq_ignore_ascii_case(shortcut.trim()))
    }

    /// One-line description for help output.
    pub fn tooltip(self) -> &'static str {
        match self {
            Action::Open => "Open a YAML document",
            Action::Save => "Save the tree as YAML",
            Action::Reload => "Reload the open document from disk",
            Action::Quit => "Exit the viewer",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_text(), self.shortcut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_is_bound_to_f5() {
        assert_eq!(Action::Reload.shortcut(), "F5");
        assert_eq!(Action::from_shortcut("f5"), Some(Action::Reload));
        assert_eq!(Action::from_shortcut("F6"), None);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Action::Open.display_text(), "Open");
        assert_eq!(Action::Save.to_string(), "Save (Ctrl+S)");
    }
}
