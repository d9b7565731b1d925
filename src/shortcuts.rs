//! Keyboard shortcuts.
//!
//! The key map is resolved here rather than in the UI shell so every
//! front-end binds the same keys to the same store mutators.

use crate::store::StudioStore;

/// A key press as the shell reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    /// The produced key, e.g. `z`, `=`, `Delete`.
    pub key: String,
    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub modifier: bool,
    pub shift: bool,
    /// An editable field has focus.
    pub input_focused: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_modifier(mut self) -> Self {
        self.modifier = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn in_input(mut self) -> Self {
        self.input_focused = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    CopyCss,
    OpenExport,
    RemoveActiveLayer,
    ZoomIn,
    ZoomOut,
    ResetViewport,
}

impl ShortcutAction {
    /// Maps a key press to an action, if any.
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        let key = event.key.as_str();
        if event.modifier {
            return match (key.to_ascii_lowercase().as_str(), event.shift) {
                ("z", false) => Some(Self::Undo),
                ("z", true) => Some(Self::Redo),
                ("c", true) => Some(Self::CopyCss),
                ("e", _) => Some(Self::OpenExport),
                _ => None,
            };
        }
        if event.input_focused {
            return None;
        }
        match key {
            "Delete" | "Backspace" => Some(Self::RemoveActiveLayer),
            "=" | "+" => Some(Self::ZoomIn),
            "-" => Some(Self::ZoomOut),
            "0" => Some(Self::ResetViewport),
            _ => None,
        }
    }
}

/// What handling a shortcut produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutOutcome {
    /// No shortcut matched; the shell should let the key through.
    Ignored,
    /// The store was updated (or the action was a no-op in this state).
    Handled(ShortcutAction),
    /// CSS of the current output tab, for the clipboard.
    Copy(String),
}

/// Resolves `event` and applies it to `store`.
pub fn handle_shortcut(store: &mut StudioStore, event: &KeyEvent) -> ShortcutOutcome {
    let Some(action) = ShortcutAction::from_event(event) else {
        return ShortcutOutcome::Ignored;
    };
    match action {
        ShortcutAction::Undo => {
            store.undo();
        }
        ShortcutAction::Redo => {
            store.redo();
        }
        ShortcutAction::CopyCss => {
            let tab = store.state().ui.css_output_tab;
            return ShortcutOutcome::Copy(store.css(tab));
        }
        ShortcutAction::OpenExport => store.open_export_dialog(),
        ShortcutAction::RemoveActiveLayer => {
            if let Some(id) = store.document().active_mask_layer_id.clone() {
                store.remove_mask_layer(&id);
            }
        }
        ShortcutAction::ZoomIn => store.zoom_in(),
        ShortcutAction::ZoomOut => store.zoom_out(),
        ShortcutAction::ResetViewport => store.reset_viewport(),
    }
    ShortcutOutcome::Handled(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CssOutputTab, FilterKind};

    #[test]
    fn key_map() {
        let undo = KeyEvent::new("z").with_modifier();
        assert_eq!(ShortcutAction::from_event(&undo), Some(ShortcutAction::Undo));
        let redo = KeyEvent::new("Z").with_modifier().with_shift();
        assert_eq!(ShortcutAction::from_event(&redo), Some(ShortcutAction::Redo));
        let copy = KeyEvent::new("c").with_modifier().with_shift();
        assert_eq!(ShortcutAction::from_event(&copy), Some(ShortcutAction::CopyCss));
        assert_eq!(
            ShortcutAction::from_event(&KeyEvent::new("c").with_modifier()),
            None
        );
        assert_eq!(
            ShortcutAction::from_event(&KeyEvent::new("+")),
            Some(ShortcutAction::ZoomIn)
        );
    }

    #[test]
    fn plain_keys_are_ignored_in_inputs() {
        assert_eq!(
            ShortcutAction::from_event(&KeyEvent::new("Backspace").in_input()),
            None
        );
        assert_eq!(
            ShortcutAction::from_event(&KeyEvent::new("-").in_input()),
            None
        );
        // Modifier shortcuts still fire.
        assert_eq!(
            ShortcutAction::from_event(&KeyEvent::new("z").with_modifier().in_input()),
            Some(ShortcutAction::Undo)
        );
    }

    #[test]
    fn undo_and_redo_through_keys() {
        let mut store = StudioStore::new();
        store.set_filter(FilterKind::Blur, 4.0);
        handle_shortcut(&mut store, &KeyEvent::new("z").with_modifier());
        assert_eq!(store.document().filters.blur, 0.0);
        handle_shortcut(&mut store, &KeyEvent::new("z").with_modifier().with_shift());
        assert_eq!(store.document().filters.blur, 4.0);
    }

    #[test]
    fn delete_removes_active_layer() {
        let mut store = StudioStore::new();
        let id = store.add_mask_layer();
        store.set_active_mask_layer(Some(id));
        let outcome = handle_shortcut(&mut store, &KeyEvent::new("Delete"));
        assert_eq!(outcome, ShortcutOutcome::Handled(ShortcutAction::RemoveActiveLayer));
        assert!(store.document().mask_layers.is_empty());
    }

    #[test]
    fn copy_returns_css_for_current_tab() {
        let mut store = StudioStore::new();
        store.set_css_output_tab(CssOutputTab::Filter);
        let outcome = handle_shortcut(&mut store, &KeyEvent::new("c").with_modifier().with_shift());
        assert_eq!(outcome, ShortcutOutcome::Copy("/* No filters applied */".into()));
    }

    #[test]
    fn zoom_keys() {
        let mut store = StudioStore::new();
        handle_shortcut(&mut store, &KeyEvent::new("="));
        assert!((store.state().viewport.zoom - 1.1).abs() < 1e-9);
        handle_shortcut(&mut store, &KeyEvent::new("0"));
        assert_eq!(store.state().viewport.zoom, 1.0);
        assert_eq!(
            handle_shortcut(&mut store, &KeyEvent::new("q")),
            ShortcutOutcome::Ignored
        );
        handle_shortcut(&mut store, &KeyEvent::new("e").with_modifier());
        assert!(store.state().ui.export_dialog_open);
    }
}
