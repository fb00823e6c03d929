//! Keyboard shortcut registry and documentation.

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Spin the focused wheel.
    Spin,
    /// Close the overlay.
    Close,
    /// Show or hide the overlay.
    ToggleOverlay,
    /// Save the edited name list.
    SaveNames,
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub action: Action,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        alt: bool,
        shift: bool,
        action: Action,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            alt,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Alt+Shift+W").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Whether a key press triggers this shortcut.
    ///
    /// Required modifiers must be held; Ctrl also accepts Cmd (meta).
    /// Extra modifiers are tolerated.
    fn matches(&self, key: &str, mods: Modifiers) -> bool {
        if !self.key.eq_ignore_ascii_case(key) {
            return false;
        }
        (!self.ctrl || mods.ctrl || mods.meta) && (!self.alt || mods.alt) && (!self.shift || mods.shift)
    }
}

/// Map a DOM `KeyboardEvent.key` or `KeyboardEvent.code` value onto the
/// key names used by the registry.
///
/// `" "` and `"Spacebar"` become `"Space"`, `"Esc"` becomes `"Escape"`,
/// `"NumpadEnter"` becomes `"Enter"`, and the layout codes `"KeyW"` and
/// `"Digit5"` lose their prefix.
pub fn normalize_key(key: &str) -> &str {
    match key {
        " " | "Spacebar" => "Space",
        "Esc" => "Escape",
        "NumpadEnter" => "Enter",
        _ => {
            for prefix in ["Key", "Digit"] {
                if let Some(rest) = key.strip_prefix(prefix) {
                    if rest.len() == 1 && rest.bytes().all(|b| b.is_ascii_alphanumeric()) {
                        return rest;
                    }
                }
            }
            key
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("W", false, true, true, Action::ToggleOverlay, "Show or hide the wheel"),
            Shortcut::new("S", true, false, false, Action::SaveNames, "Save names"),
            Shortcut::new("Space", false, false, false, Action::Spin, "Spin the wheel"),
            Shortcut::new("Enter", false, false, false, Action::Spin, "Spin the wheel"),
            Shortcut::new("Escape", false, false, false, Action::Close, "Close the wheel"),
        ]
    }

    /// Find the action bound to a key press.
    ///
    /// `key` may be a registry name (`"w"`, `"Space"`) or a raw DOM value
    /// (see [`normalize_key`]). Browser hosts should pass
    /// `KeyboardEvent.code`: with Alt held, macOS reports a composed
    /// character in `key` (Alt+Shift+W gives `"„"`), but `code` stays `"KeyW"`.
    pub fn action_for(key: &str, mods: Modifiers) -> Option<Action> {
        let key = normalize_key(key);
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, mods))
            .map(|s| s.action)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
