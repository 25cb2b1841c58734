use std::collections::{HashMap, HashSet};

use log::debug;
use winit::{
    event::ElementState,
    keyboard::{KeyCode, PhysicalKey},
};

use crate::error::{Error, Result};

const MODIFIERS: [KeyCode; 8] = [
    KeyCode::ShiftLeft,
    KeyCode::ShiftRight,
    KeyCode::ControlLeft,
    KeyCode::ControlRight,
    KeyCode::AltLeft,
    KeyCode::AltRight,
    KeyCode::SuperLeft,
    KeyCode::SuperRight,
];

/// Physical keys currently held, fed from window events.
#[derive(Debug, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        if let PhysicalKey::Code(code) = key {
            match state {
                ElementState::Pressed => self.press(code),
                ElementState::Released => self.release(code),
            }
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Focus loss swallows key-up events.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn any_modifier_held(&self) -> bool {
        MODIFIERS.iter().any(|key| self.is_held(*key))
    }
}

/// Resolves a key name to the physical keys it covers. Names follow a US
/// layout and are case-insensitive; `shift`, `control`, `alt` and `meta`
/// match either side.
pub fn parse_key_name(name: &str) -> Result<Vec<KeyCode>> {
    let lower = name.to_ascii_lowercase();
    let keys = match lower.as_str() {
        "shift" => vec![KeyCode::ShiftLeft, KeyCode::ShiftRight],
        "lshift" => vec![KeyCode::ShiftLeft],
        "rshift" => vec![KeyCode::ShiftRight],
        "control" => vec![KeyCode::ControlLeft, KeyCode::ControlRight],
        "lcontrol" => vec![KeyCode::ControlLeft],
        "rcontrol" => vec![KeyCode::ControlRight],
        "alt" => vec![KeyCode::AltLeft, KeyCode::AltRight],
        "lalt" => vec![KeyCode::AltLeft],
        "ralt" => vec![KeyCode::AltRight],
        "meta" => vec![KeyCode::SuperLeft, KeyCode::SuperRight],
        "lmeta" => vec![KeyCode::SuperLeft],
        "rmeta" => vec![KeyCode::SuperRight],
        "space" => vec![KeyCode::Space],
        "enter" => vec![KeyCode::Enter],
        "tab" => vec![KeyCode::Tab],
        "escape" => vec![KeyCode::Escape],
        "backspace" => vec![KeyCode::Backspace],
        "delete" => vec![KeyCode::Delete],
        "insert" => vec![KeyCode::Insert],
        "home" => vec![KeyCode::Home],
        "end" => vec![KeyCode::End],
        "page_up" => vec![KeyCode::PageUp],
        "page_down" => vec![KeyCode::PageDown],
        "arrow_up" => vec![KeyCode::ArrowUp],
        "arrow_down" => vec![KeyCode::ArrowDown],
        "arrow_left" => vec![KeyCode::ArrowLeft],
        "arrow_right" => vec![KeyCode::ArrowRight],
        other => vec![single_key(other).ok_or_else(|| Error::UnknownKey(name.to_string()))?],
    };
    Ok(keys)
}

fn single_key(name: &str) -> Option<KeyCode> {
    const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA,
        KeyCode::KeyB,
        KeyCode::KeyC,
        KeyCode::KeyD,
        KeyCode::KeyE,
        KeyCode::KeyF,
        KeyCode::KeyG,
        KeyCode::KeyH,
        KeyCode::KeyI,
        KeyCode::KeyJ,
        KeyCode::KeyK,
        KeyCode::KeyL,
        KeyCode::KeyM,
        KeyCode::KeyN,
        KeyCode::KeyO,
        KeyCode::KeyP,
        KeyCode::KeyQ,
        KeyCode::KeyR,
        KeyCode::KeyS,
        KeyCode::KeyT,
        KeyCode::KeyU,
        KeyCode::KeyV,
        KeyCode::KeyW,
        KeyCode::KeyX,
        KeyCode::KeyY,
        KeyCode::KeyZ,
    ];
    const DIGITS: [KeyCode; 10] = [
        KeyCode::Digit0,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    const FUNCTION: [KeyCode; 12] = [
        KeyCode::F1,
        KeyCode::F2,
        KeyCode::F3,
        KeyCode::F4,
        KeyCode::F5,
        KeyCode::F6,
        KeyCode::F7,
        KeyCode::F8,
        KeyCode::F9,
        KeyCode::F10,
        KeyCode::F11,
        KeyCode::F12,
    ];

    let bytes = name.as_bytes();
    match bytes {
        [c @ b'a'..=b'z'] => Some(LETTERS[(c - b'a') as usize]),
        [c @ b'0'..=b'9'] => Some(DIGITS[(c - b'0') as usize]),
        [b'f', digits @ ..] => match digits {
            [d @ b'1'..=b'9'] => Some(FUNCTION[(d - b'1') as usize]),
            [b'1', d @ b'0'..=b'2'] => Some(FUNCTION[(d - b'0') as usize + 9]),
            _ => None,
        },
        _ => None,
    }
}

#[derive(Debug)]
struct Watch {
    keys: Vec<KeyCode>,
    with_modifiers: bool,
}

impl Watch {
    fn is_active(&self, keyboard: &KeyboardState) -> bool {
        let held = self.keys.iter().any(|key| keyboard.is_held(*key));
        if !held || self.with_modifiers {
            return held;
        }
        let is_modifier = self.keys.iter().all(|key| MODIFIERS.contains(key));
        is_modifier || !keyboard.any_modifier_held()
    }
}

/// Named actions driven by key watches.
#[derive(Debug, Default)]
pub struct InputState {
    watches: HashMap<String, Vec<Watch>>,
    forced: HashSet<String>,
}

impl InputState {
    /// Action is set while `key` is held with no modifier down.
    pub fn watch(&mut self, action: &str, key: &str) -> Result<()> {
        self.add_watch(action, key, false)
    }

    /// Action is set while `key` is held, whatever modifiers are down.
    pub fn watch_with_modifiers(&mut self, action: &str, key: &str) -> Result<()> {
        self.add_watch(action, key, true)
    }

    fn add_watch(&mut self, action: &str, key: &str, with_modifiers: bool) -> Result<()> {
        let keys = parse_key_name(key)?;
        debug!("watching {action} on {key}");
        self.watches
            .entry(action.to_string())
            .or_default()
            .push(Watch {
                keys,
                with_modifiers,
            });
        Ok(())
    }

    pub fn force(&mut self, action: &str, value: bool) {
        if value {
            self.forced.insert(action.to_string());
        } else {
            self.forced.remove(action);
        }
    }

    pub fn is_set(&self, action: &str, keyboard: &KeyboardState) -> bool {
        self.forced.contains(action)
            || self
                .watches
                .get(action)
                .is_some_and(|watches| watches.iter().any(|watch| watch.is_active(keyboard)))
    }

    pub fn is_watched(&self, action: &str) -> bool {
        self.watches.contains_key(action)
    }

    pub fn release(&mut self) {
        self.watches.clear();
        self.forced.clear();
    }
}
