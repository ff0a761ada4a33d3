//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use thiserror::Error;

/// Invalid entry in the `[keybindings]` table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyBindingError {
    /// Action name not in the keymap.
    #[error("unknown action '{0}' in [keybindings]")]
    UnknownAction(String),

    /// Key spec that does not parse.
    #[error("cannot parse key '{key}' for action '{action}'")]
    BadKey {
        /// Action the key was bound to.
        action: String,
        /// The unparseable key spec.
        key: String,
    },
}

/// Maps keyboard events to domain actions.
///
/// Provides default vim-style bindings with option to override via configuration.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

/// Drop SHIFT from character keys; the case already lives in the char.
fn normalize(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    let modifiers = match code {
        KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
        _ => modifiers,
    };
    KeyEvent::new(code, modifiers)
}

/// Parse a key spec such as `"j"`, `"G"`, `"enter"`, `"ctrl+d"`, `"shift+tab"`.
pub fn parse_key_spec(spec: &str) -> Option<KeyEvent> {
    let mut modifiers = KeyModifiers::NONE;
    let mut parts: Vec<&str> = spec.split('+').collect();
    // A bare "+" splits into two empty parts.
    let key = if spec.ends_with("++") || spec == "+" {
        parts.truncate(parts.len().saturating_sub(2));
        "+"
    } else {
        parts.pop()?
    };
    for part in parts {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            _ => return None,
        }
    }
    let mut chars = key.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(ch), None) => KeyCode::Char(ch),
        _ => match key.to_ascii_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "space" => KeyCode::Char(' '),
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "delete" | "del" => KeyCode::Delete,
            _ => return None,
        },
    };
    Some(normalize(code, modifiers))
}

/// Display form of a key, e.g. `r`, `Enter`, `Ctrl+f`.
pub fn key_label(key: KeyEvent) -> String {
    let mut label = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        label.push_str("Ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        label.push_str("Alt+");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        label.push_str("Shift+");
    }
    match key.code {
        KeyCode::Char(' ') => label.push_str("Space"),
        KeyCode::Char(ch) => label.push(ch),
        KeyCode::Up => label.push('↑'),
        KeyCode::Down => label.push('↓'),
        KeyCode::Left => label.push('←'),
        KeyCode::Right => label.push('→'),
        KeyCode::Enter => label.push_str("Enter"),
        KeyCode::Esc => label.push_str("Esc"),
        KeyCode::Backspace => label.push_str("Backspace"),
        KeyCode::Delete => label.push_str("Del"),
        KeyCode::Tab => label.push_str("Tab"),
        KeyCode::BackTab => label.push_str("Shift+Tab"),
        KeyCode::Home => label.push_str("Home"),
        KeyCode::End => label.push_str("End"),
        KeyCode::PageUp => label.push_str("PgUp"),
        KeyCode::PageDown => label.push_str("PgDn"),
        KeyCode::F(n) => label.push_str(&format!("F{n}")),
        other => label.push_str(&format!("{other:?}")),
    }
    label
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&normalize(key.code, key.modifiers))
            .copied()
    }

    /// Bind `key` to `action`, replacing whatever it was bound to.
    pub fn bind(&mut self, key: KeyEvent, action: KeyAction) {
        self.bindings.insert(normalize(key.code, key.modifiers), action);
    }

    /// Keys currently bound to `action`.
    pub fn keys_for(&self, action: KeyAction) -> Vec<KeyEvent> {
        self.bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Labels of the keys bound to `action`, sorted and joined with `/`.
    /// `None` when the action has no key.
    pub fn hint_for(&self, action: KeyAction) -> Option<String> {
        let mut labels: Vec<String> = self.keys_for(action).into_iter().map(key_label).collect();
        if labels.is_empty() {
            return None;
        }
        labels.sort();
        Some(labels.join("/"))
    }

    /// Defaults with the actions named in `overrides` rebound.
    ///
    /// Each listed action loses its default keys and gets exactly the listed
    /// ones.
    pub fn with_overrides(
        overrides: &HashMap<String, Vec<String>>,
    ) -> Result<Self, KeyBindingError> {
        let mut bindings = Self::default();
        for (name, keys) in overrides {
            let action = KeyAction::from_name(name)
                .ok_or_else(|| KeyBindingError::UnknownAction(name.clone()))?;
            bindings.bindings.retain(|_, a| *a != action);
            for key in keys {
                let event = parse_key_spec(key).ok_or_else(|| KeyBindingError::BadKey {
                    action: name.clone(),
                    key: key.clone(),
                })?;
                bindings.bind(event, action);
            }
        }
        Ok(bindings)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };
        let mut bind = |code: KeyCode, modifiers: KeyModifiers, action: KeyAction| {
            bindings.bind(KeyEvent::new(code, modifiers), action);
        };
        let none = KeyModifiers::NONE;

        // Application controls
        bind(KeyCode::Char('q'), none, KeyAction::Quit);
        bind(KeyCode::Char('?'), none, KeyAction::ToggleHelp);

        // Rows
        bind(KeyCode::Char('j'), none, KeyAction::NextRow);
        bind(KeyCode::Down, none, KeyAction::NextRow);
        bind(KeyCode::Char('k'), none, KeyAction::PrevRow);
        bind(KeyCode::Up, none, KeyAction::PrevRow);
        bind(KeyCode::Enter, none, KeyAction::Open);
        bind(KeyCode::Esc, none, KeyAction::Back);
        bind(KeyCode::Backspace, none, KeyAction::Back);

        // Pages
        bind(KeyCode::Char('n'), none, KeyAction::NextPage);
        bind(KeyCode::Right, none, KeyAction::NextPage);
        bind(KeyCode::Char('p'), none, KeyAction::PrevPage);
        bind(KeyCode::Left, none, KeyAction::PrevPage);
        bind(KeyCode::Char('g'), none, KeyAction::FirstPage);
        bind(KeyCode::Home, none, KeyAction::FirstPage);
        bind(KeyCode::Char('G'), none, KeyAction::LastPage);
        bind(KeyCode::End, none, KeyAction::LastPage);

        // Filters
        bind(KeyCode::Char('/'), none, KeyAction::FocusSearch);
        bind(KeyCode::Char('f'), KeyModifiers::CONTROL, KeyAction::FocusSearch);
        bind(KeyCode::Char('t'), none, KeyAction::FocusTags);
        bind(KeyCode::Char('x'), none, KeyAction::ClearFilters);

        // Fetch control
        bind(KeyCode::Char('r'), none, KeyAction::Retry);
        bind(KeyCode::Char('R'), none, KeyAction::Refresh);

        // Forms and mutations
        bind(KeyCode::Char('a'), none, KeyAction::Ask);
        bind(KeyCode::Char('e'), none, KeyAction::EditTitle);
        bind(KeyCode::Char('T'), none, KeyAction::EditTags);
        bind(KeyCode::Char('E'), none, KeyAction::EditAnswer);
        bind(KeyCode::Char('w'), none, KeyAction::WriteAnswer);
        bind(KeyCode::Char('d'), none, KeyAction::DeleteAnswer);

        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_lists_default_retry_key() {
        assert_eq!(KeyBindings::default().hint_for(KeyAction::Retry).as_deref(), Some("r"));
    }

    #[test]
    fn hint_follows_overrides() {
        let overrides = HashMap::from([(
            "retry".to_string(),
            vec!["ctrl+r".to_string(), "F".to_string()],
        )]);
        let bindings = KeyBindings::with_overrides(&overrides).unwrap();
        assert_eq!(bindings.hint_for(KeyAction::Retry).as_deref(), Some("Ctrl+r/F"));
    }

    #[test]
    fn key_label_names_special_keys() {
        assert_eq!(key_label(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)), "Enter");
        assert_eq!(key_label(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)), "Space");
        assert_eq!(key_label(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)), "→");
    }

    #[test]
    fn default_bindings_map_lowercase_n_to_next_page() {
        let bindings = KeyBindings::default();
        let key_event = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(bindings.get(key_event), Some(KeyAction::NextPage));
    }

    #[test]
    fn uppercase_with_shift_reported_matches_binding() {
        let bindings = KeyBindings::default();
        let key_event = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(
            bindings.get(key_event),
            Some(KeyAction::LastPage),
            "Terminals report 'G' with SHIFT; lookup must still match"
        );
    }

    #[test]
    fn parse_key_spec_handles_modifiers_and_names() {
        assert_eq!(
            parse_key_spec("ctrl+d"),
            Some(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            parse_key_spec("enter"),
            Some(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
        );
        assert_eq!(
            parse_key_spec("+"),
            Some(KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE))
        );
        assert_eq!(parse_key_spec("hyper+x"), None);
        assert_eq!(parse_key_spec("f13"), None);
    }

    #[test]
    fn overrides_replace_default_keys_of_listed_actions() {
        let overrides = HashMap::from([("next_page".to_string(), vec!["l".to_string()])]);
        let bindings = KeyBindings::with_overrides(&overrides).unwrap();
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE)),
            Some(KeyAction::NextPage)
        );
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE)),
            None
        );
        // Unlisted actions keep their defaults.
        assert_eq!(
            bindings.get(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE)),
            Some(KeyAction::PrevPage)
        );
    }

    #[test]
    fn overrides_reject_unknown_action_and_bad_key() {
        let unknown = HashMap::from([("scroll".to_string(), vec!["j".to_string()])]);
        assert_eq!(
            KeyBindings::with_overrides(&unknown).unwrap_err(),
            KeyBindingError::UnknownAction("scroll".to_string())
        );
        let bad = HashMap::from([("quit".to_string(), vec!["meta+q".to_string()])]);
        assert!(matches!(
            KeyBindings::with_overrides(&bad),
            Err(KeyBindingError::BadKey { .. })
        ));
    }
}
