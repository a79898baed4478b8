use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::io;
use std::time::Duration;

pub const KEY_COUNT: usize = 16;

/// 1 2 3 C     1 2 3 4
/// 4 5 6 D  -> Q W E R
/// 7 8 9 E     A S D F
/// A 0 B F     Z X C V
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); KEY_COUNT] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// what the input collaborator saw this tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    pub pressed: [bool; KEY_COUNT],
    /// a key that went from pressed to released since the last scan
    pub released: Option<u8>,
}

impl KeySnapshot {
    pub fn pressing(keys: &[u8]) -> Self {
        let mut s = KeySnapshot::default();
        for k in keys {
            s.pressed[(*k & 0xf) as usize] = true;
        }
        s
    }

    pub fn releasing(key: u8) -> Self {
        KeySnapshot {
            pressed: [false; KEY_COUNT],
            released: Some(key & 0xf),
        }
    }
}

/// the interpreter's view of the hex keypad. at most one key wait is
/// outstanding, recorded as the register the released key will land in
#[derive(Clone, Debug, Default)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
    waiting: Option<u8>,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    pub fn refresh(&mut self, pressed: &[bool; KEY_COUNT]) {
        self.keys = *pressed;
    }

    /// key values above 0xf select key `value & 0xf`
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xf) as usize]
    }

    /// start waiting for a key; it'll be stored into register `x`
    pub fn wait(&mut self, x: u8) {
        self.waiting = Some(x);
    }

    /// the register a pending key wait will write to
    pub fn waiting(&self) -> Option<u8> {
        self.waiting
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting.is_some()
    }

    /// end the wait, handing back the target register
    pub fn resolve(&mut self) -> Option<u8> {
        self.waiting.take()
    }
}

impl fmt::Display for Keypad {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, k) in self.keys.iter().enumerate() {
            write!(f, "{:x}:{} ", i, if *k { 'Y' } else { 'N' })?;
        }
        match self.waiting {
            Some(x) => write!(f, "wait:V{:x}", x),
            None => write!(f, "wait:N"),
        }
    }
}

/// reads keypresses
pub trait Input {
    /// current pressed state of every key, plus any key just released
    fn scan(&mut self) -> Result<KeySnapshot, io::Error>;

    /// the user has asked to stop
    fn quit_requested(&self) -> bool {
        false
    }
}

/// terminals report presses but not releases, so a pressed key is treated
/// as held for this many scans after its last press event
const KEY_HOLD_SCANS: u16 = 100;

/// simple implementation of Input, using STDIN
pub struct StdinInput {
    held: [u16; KEY_COUNT],
    keymap: HashMap<char, u8>,
    quit: bool,
}

impl StdinInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            held: [0; KEY_COUNT],
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            quit: false,
        })
    }

    fn read_stdin(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(mapped_key) => self.held[*mapped_key as usize] = KEY_HOLD_SCANS,
                        None => log::warn!("can't map {:?} to a CHIP-8 key", key),
                    },
                    KeyCode::Esc => self.quit = true,
                    _ => log::warn!("unknown key event received"),
                },
                _ => log::debug!("ignoring non-key terminal event"),
            }
        }
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("couldn't restore terminal: {}", e);
        }
    }
}

impl Input for StdinInput {
    fn scan(&mut self) -> Result<KeySnapshot, io::Error> {
        let mut snapshot = KeySnapshot::default();
        for (k, hold) in self.held.iter_mut().enumerate() {
            if *hold > 0 {
                *hold -= 1;
                if *hold == 0 && snapshot.released.is_none() {
                    snapshot.released = Some(k as u8);
                }
            }
        }
        self.read_stdin()?;
        for (k, hold) in self.held.iter().enumerate() {
            snapshot.pressed[k] = *hold > 0;
        }
        Ok(snapshot)
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing; plays back a script of
/// snapshots, then reports nothing pressed
#[derive(Default)]
pub struct DummyInput {
    script: VecDeque<KeySnapshot>,
}

impl DummyInput {
    pub fn new(script: &[KeySnapshot]) -> Self {
        DummyInput {
            script: script.iter().copied().collect(),
        }
    }
}

impl Input for DummyInput {
    fn scan(&mut self) -> Result<KeySnapshot, io::Error> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}
