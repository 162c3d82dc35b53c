//! Backend-neutral input vocabulary shared by the camera controller and the
//! terminal front end.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Escape,
    Enter,
    Char(char),
    Other,
}

/// Modifier keys held during an input event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        control: false,
        alt: false,
    };
}

/// One input event in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Button {
        button: MouseButton,
        pressed: bool,
        x: f64,
        y: f64,
    },
    Move {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    Scroll {
        yoffset: f64,
    },
    Key {
        key: Key,
        pressed: bool,
        modifiers: Modifiers,
    },
}

impl From<crossterm::event::MouseButton> for MouseButton {
    fn from(button: crossterm::event::MouseButton) -> Self {
        match button {
            crossterm::event::MouseButton::Left => MouseButton::Left,
            crossterm::event::MouseButton::Middle => MouseButton::Middle,
            crossterm::event::MouseButton::Right => MouseButton::Right,
        }
    }
}

impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode;
        match code {
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc => Key::Escape,
            KeyCode::Enter => Key::Enter,
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(mods: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers;
        Modifiers {
            shift: mods.contains(KeyModifiers::SHIFT),
            control: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
        }
    }
}
