//! Keyboard dispatch for the enlarged view.
//!
//! Keys only act while a picture is open; the host forwards key events and
//! suppresses the default scrolling behavior whenever one was consumed.

/// Keys the viewer recognizes. Names follow the DOM `KeyboardEvent.key`
/// values the hosting page receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowDown,
    PageDown,
    ArrowLeft,
    ArrowUp,
    PageUp,
    Home,
    End,
    Escape,
}

impl Key {
    /// Maps a DOM key name to a recognized key, `None` for everything else.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowDown" => Some(Key::ArrowDown),
            "PageDown" => Some(Key::PageDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowUp" => Some(Key::ArrowUp),
            "PageUp" => Some(Key::PageUp),
            "Home" => Some(Key::Home),
            "End" => Some(Key::End),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Viewer transition a key triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Next,
    Previous,
    First,
    Last,
    Close,
}

impl Key {
    pub fn action(self) -> KeyAction {
        match self {
            Key::ArrowRight | Key::ArrowDown | Key::PageDown => KeyAction::Next,
            Key::ArrowLeft | Key::ArrowUp | Key::PageUp => KeyAction::Previous,
            Key::Home => KeyAction::First,
            Key::End => KeyAction::Last,
            Key::Escape => KeyAction::Close,
        }
    }
}
