//! VT/xterm escape sequence parser
//!
//! A streaming state machine driven one byte at a time. Each byte either
//! accumulates into the current sequence or emits semantic [`Action`]s.
//! State is a flat tag plus small buffers, so stack depth stays constant
//! no matter how long or malformed the input is.
//!
//! Error policy: a byte that does not fit the current state's grammar
//! silently ends the sequence (nothing is emitted for the malformed part)
//! and parsing resumes. No input can make the parser fail.

use log::{debug, trace};

use umi_core::{Attrs, Color, CursorShape, LineErase, Mode, NamedColor, ScreenErase};

use crate::action::{c0, Action};
use crate::params::Params;

/// Upper bound on buffered OSC payload bytes
const MAX_OSC_LEN: usize = 4096;
/// Upper bound on raw CSI parameter bytes
const MAX_PARAM_BYTES: usize = 128;
/// Upper bound on collected intermediate bytes
const MAX_INTERMEDIATES: usize = 2;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Normal text and C0 controls
    Ground,
    /// After ESC
    Escape,
    /// After ESC plus an intermediate byte (charset designations etc.)
    EscapeIntermediate,
    /// After ESC [
    CsiEntry,
    /// Collecting CSI parameters/intermediates
    CsiParam,
    /// Malformed CSI, consumed to its final byte
    CsiIgnore,
    /// After ESC ], collecting the string payload
    OscString,
    /// DCS/SOS/PM/APC, consumed to the string terminator
    StringIgnore,
}

/// The escape sequence parser
#[derive(Debug)]
pub struct Parser {
    state: State,
    /// Raw CSI parameter bytes
    params_bytes: Vec<u8>,
    /// CSI/ESC intermediate bytes (0x20-0x2F)
    intermediates: Vec<u8>,
    /// CSI private marker (`?`, `>`, `<`, `=`)
    private_marker: Option<u8>,
    /// OSC payload buffer
    osc_buffer: Vec<u8>,
    /// Saw ESC inside the OSC string, awaiting `\`
    osc_esc: bool,
    /// Saw ESC inside an ignored string, awaiting `\`
    string_esc: bool,
    /// UTF-8 codepoint being assembled
    utf8_codepoint: u32,
    /// UTF-8 continuation bytes still expected
    utf8_remaining: u8,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            state: State::Ground,
            params_bytes: Vec::with_capacity(32),
            intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            private_marker: None,
            osc_buffer: Vec::with_capacity(64),
            osc_esc: false,
            string_esc: false,
            utf8_codepoint: 0,
            utf8_remaining: 0,
        }
    }

    /// Drop any partial sequence and return to ground
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.utf8_codepoint = 0;
        self.utf8_remaining = 0;
        self.clear();
    }

    /// Parse a chunk of bytes
    pub fn parse(&mut self, bytes: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        for &byte in bytes {
            self.advance(byte, &mut actions);
        }
        actions
    }

    /// Parse a single byte. Feeding a buffer byte by byte yields the same
    /// actions as [`parse`](Self::parse) on the whole buffer.
    pub fn parse_byte(&mut self, byte: u8) -> Vec<Action> {
        let mut actions = Vec::new();
        self.advance(byte, &mut actions);
        actions
    }

    fn advance(&mut self, byte: u8, actions: &mut Vec<Action>) {
        match self.state {
            State::Ground => self.ground(byte, actions),
            State::Escape => self.escape(byte, actions),
            State::EscapeIntermediate => self.escape_intermediate(byte, actions),
            State::CsiEntry => self.csi_entry(byte, actions),
            State::CsiParam => self.csi_param(byte, actions),
            State::CsiIgnore => self.csi_ignore(byte, actions),
            State::OscString => self.osc_string(byte, actions),
            State::StringIgnore => self.string_ignore(byte, actions),
        }
    }

    fn clear(&mut self) {
        self.params_bytes.clear();
        self.intermediates.clear();
        self.private_marker = None;
        self.osc_buffer.clear();
        self.osc_esc = false;
        self.string_esc = false;
    }

    /// Handle bytes common to every in-sequence state: CAN/SUB abort,
    /// ESC restarts, other C0 controls execute immediately, DEL is
    /// ignored. Returns true when the byte was consumed.
    fn handle_sequence_control(&mut self, byte: u8, actions: &mut Vec<Action>) -> bool {
        match byte {
            c0::CAN | c0::SUB => {
                self.state = State::Ground;
                true
            }
            c0::ESC => {
                self.clear();
                self.state = State::Escape;
                true
            }
            0x00..=0x1F => {
                push_control(byte, actions);
                true
            }
            c0::DEL => true,
            _ => false,
        }
    }

    // --- ground ---------------------------------------------------------

    fn ground(&mut self, byte: u8, actions: &mut Vec<Action>) {
        if self.utf8_remaining > 0 {
            if byte & 0xC0 == 0x80 {
                self.utf8_codepoint = (self.utf8_codepoint << 6) | (byte & 0x3F) as u32;
                self.utf8_remaining -= 1;
                if self.utf8_remaining == 0 {
                    match char::from_u32(self.utf8_codepoint) {
                        Some(c) => actions.push(Action::Print(c)),
                        None => actions.push(Action::Print('\u{FFFD}')),
                    }
                }
                return;
            }
            // truncated sequence: flush a replacement, reprocess this byte
            actions.push(Action::Print('\u{FFFD}'));
            self.utf8_remaining = 0;
        }

        match byte {
            c0::ESC => {
                self.clear();
                self.state = State::Escape;
            }
            0x00..=0x1F => push_control(byte, actions),
            c0::DEL => {}
            0x20..=0x7E => actions.push(Action::Print(byte as char)),
            0xC2..=0xDF => {
                self.utf8_codepoint = (byte & 0x1F) as u32;
                self.utf8_remaining = 1;
            }
            0xE0..=0xEF => {
                self.utf8_codepoint = (byte & 0x0F) as u32;
                self.utf8_remaining = 2;
            }
            0xF0..=0xF4 => {
                self.utf8_codepoint = (byte & 0x07) as u32;
                self.utf8_remaining = 3;
            }
            // stray continuation bytes and invalid leads
            _ => actions.push(Action::Print('\u{FFFD}')),
        }
    }

    // --- escape ---------------------------------------------------------

    fn escape(&mut self, byte: u8, actions: &mut Vec<Action>) {
        if self.handle_sequence_control(byte, actions) {
            return;
        }
        match byte {
            b'[' => self.state = State::CsiEntry,
            b']' => self.state = State::OscString,
            b'P' | b'X' | b'^' | b'_' => self.state = State::StringIgnore,
            b'7' => {
                actions.push(Action::CursorSave);
                self.state = State::Ground;
            }
            b'8' => {
                actions.push(Action::CursorRestore);
                self.state = State::Ground;
            }
            b'D' => {
                actions.push(Action::LineFeed);
                self.state = State::Ground;
            }
            b'E' => {
                actions.push(Action::CarriageReturn);
                actions.push(Action::LineFeed);
                self.state = State::Ground;
            }
            b'M' => {
                actions.push(Action::ReverseIndex);
                self.state = State::Ground;
            }
            b'c' => {
                actions.push(Action::Reset);
                self.state = State::Ground;
            }
            b'\\' => self.state = State::Ground,
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = State::EscapeIntermediate;
            }
            _ => {
                debug!("discarding ESC {:?}", byte as char);
                self.state = State::Ground;
            }
        }
    }

    /// Charset designations (`ESC ( B` and friends) and other
    /// intermediate forms: consumed without actions
    fn escape_intermediate(&mut self, byte: u8, actions: &mut Vec<Action>) {
        if self.handle_sequence_control(byte, actions) {
            return;
        }
        match byte {
            0x20..=0x2F => {
                if self.intermediates.len() < MAX_INTERMEDIATES {
                    self.intermediates.push(byte);
                }
            }
            0x30..=0x7E => {
                trace!(
                    "discarding ESC {:?} {:?}",
                    self.intermediates,
                    byte as char
                );
                self.state = State::Ground;
            }
            _ => self.state = State::Ground,
        }
    }

    // --- csi ------------------------------------------------------------

    fn csi_entry(&mut self, byte: u8, actions: &mut Vec<Action>) {
        if self.handle_sequence_control(byte, actions) {
            return;
        }
        match byte {
            b'?' | b'>' | b'<' | b'=' => {
                self.private_marker = Some(byte);
                self.state = State::CsiParam;
            }
            0x30..=0x3B => {
                self.params_bytes.push(byte);
                self.state = State::CsiParam;
            }
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = State::CsiParam;
            }
            0x40..=0x7E => {
                self.dispatch_csi(byte, actions);
                self.state = State::Ground;
            }
            _ => self.state = State::CsiIgnore,
        }
    }

    fn csi_param(&mut self, byte: u8, actions: &mut Vec<Action>) {
        if self.handle_sequence_control(byte, actions) {
            return;
        }
        match byte {
            0x30..=0x3B => {
                if !self.intermediates.is_empty() {
                    // parameters after an intermediate are out of grammar
                    self.state = State::CsiIgnore;
                } else if self.params_bytes.len() < MAX_PARAM_BYTES {
                    self.params_bytes.push(byte);
                }
            }
            0x3C..=0x3F => self.state = State::CsiIgnore,
            0x20..=0x2F => {
                if self.intermediates.len() < MAX_INTERMEDIATES {
                    self.intermediates.push(byte);
                }
            }
            0x40..=0x7E => {
                self.dispatch_csi(byte, actions);
                self.state = State::Ground;
            }
            _ => self.state = State::Ground,
        }
    }

    fn csi_ignore(&mut self, byte: u8, actions: &mut Vec<Action>) {
        if self.handle_sequence_control(byte, actions) {
            return;
        }
        if let 0x40..=0x7E = byte {
            self.state = State::Ground;
        }
    }

    fn dispatch_csi(&mut self, final_byte: u8, actions: &mut Vec<Action>) {
        let params = Params::parse(&self.params_bytes);

        match self.private_marker {
            Some(b'?') => {
                match final_byte {
                    b'h' => self.private_mode(&params, true, actions),
                    b'l' => self.private_mode(&params, false, actions),
                    _ => debug!(
                        "discarding CSI ? {:?} {:?}",
                        params, final_byte as char
                    ),
                }
                return;
            }
            Some(marker) => {
                debug!(
                    "discarding CSI {:?} {:?} {:?}",
                    marker as char, params, final_byte as char
                );
                return;
            }
            None => {}
        }

        if !self.intermediates.is_empty() {
            match (self.intermediates[0], final_byte) {
                // DECSCUSR
                (b' ', b'q') => {
                    let shape = match params.get_or(0, 0) {
                        0 | 1 | 2 => CursorShape::Block,
                        3 | 4 => CursorShape::Underline,
                        5 | 6 => CursorShape::Bar,
                        other => {
                            debug!("ignoring cursor shape {other}");
                            return;
                        }
                    };
                    actions.push(Action::SetCursorShape(shape));
                }
                _ => debug!(
                    "discarding CSI {:?} {:?}",
                    self.intermediates, final_byte as char
                ),
            }
            return;
        }

        let n = params.get_nonzero_or(0, 1) as usize;
        match final_byte {
            b'A' => actions.push(Action::CursorUp(n)),
            b'B' => actions.push(Action::CursorDown(n)),
            b'C' => actions.push(Action::CursorForward(n)),
            b'D' => actions.push(Action::CursorBack(n)),
            b'E' => {
                actions.push(Action::CursorDown(n));
                actions.push(Action::CarriageReturn);
            }
            b'F' => {
                actions.push(Action::CursorUp(n));
                actions.push(Action::CarriageReturn);
            }
            b'G' | b'`' => actions.push(Action::CursorToColumn(n - 1)),
            b'd' => actions.push(Action::CursorToRow(n - 1)),
            b'H' | b'f' => {
                let row = params.get_nonzero_or(0, 1) as usize - 1;
                let col = params.get_nonzero_or(1, 1) as usize - 1;
                actions.push(Action::CursorTo { row, col });
            }
            b'J' => {
                let mode = match params.get_or(0, 0) {
                    0 => ScreenErase::ToEnd,
                    1 => ScreenErase::ToStart,
                    2 => ScreenErase::All,
                    3 => ScreenErase::AllAndScrollback,
                    other => {
                        debug!("ignoring erase-screen mode {other}");
                        return;
                    }
                };
                actions.push(Action::EraseScreen(mode));
            }
            b'K' => {
                let mode = match params.get_or(0, 0) {
                    0 => LineErase::ToEnd,
                    1 => LineErase::ToStart,
                    2 => LineErase::All,
                    other => {
                        debug!("ignoring erase-line mode {other}");
                        return;
                    }
                };
                actions.push(Action::EraseLine(mode));
            }
            b'L' => actions.push(Action::InsertLines(n)),
            b'M' => actions.push(Action::DeleteLines(n)),
            b'@' => actions.push(Action::InsertChars(n)),
            b'P' => actions.push(Action::DeleteChars(n)),
            b'X' => actions.push(Action::EraseChars(n)),
            b'S' => actions.push(Action::ScrollUp(n)),
            b'T' => actions.push(Action::ScrollDown(n)),
            b'r' => {
                if params.is_empty() {
                    actions.push(Action::ResetScrollRegion);
                } else {
                    let top = params.get_nonzero_or(0, 1) as usize - 1;
                    // missing or zero bottom extends to the last row
                    let bottom = match params.get_nonzero_or(1, 0) {
                        0 => usize::MAX,
                        b => b as usize - 1,
                    };
                    actions.push(Action::SetScrollRegion { top, bottom });
                }
            }
            b's' => actions.push(Action::CursorSave),
            b'u' => actions.push(Action::CursorRestore),
            b'h' => self.ansi_mode(&params, true, actions),
            b'l' => self.ansi_mode(&params, false, actions),
            b'm' => sgr(&params, actions),
            _ => debug!("discarding CSI {:?} {:?}", params, final_byte as char),
        }
    }

    fn private_mode(&self, params: &Params, enable: bool, actions: &mut Vec<Action>) {
        for param in params.iter() {
            let mode = match param {
                1 => Mode::AppCursor,
                7 => Mode::AutoWrap,
                25 => Mode::ShowCursor,
                66 => Mode::AppKeypad,
                2004 => Mode::BracketedPaste,
                other => {
                    debug!("ignoring private mode {other} ({enable})");
                    continue;
                }
            };
            actions.push(if enable {
                Action::SetMode(mode)
            } else {
                Action::UnsetMode(mode)
            });
        }
    }

    fn ansi_mode(&self, params: &Params, enable: bool, actions: &mut Vec<Action>) {
        for param in params.iter() {
            match param {
                4 => actions.push(if enable {
                    Action::SetMode(Mode::Insert)
                } else {
                    Action::UnsetMode(Mode::Insert)
                }),
                other => debug!("ignoring mode {other} ({enable})"),
            }
        }
    }

    // --- osc ------------------------------------------------------------

    fn osc_string(&mut self, byte: u8, actions: &mut Vec<Action>) {
        if self.osc_esc {
            self.osc_esc = false;
            if byte == b'\\' {
                self.dispatch_osc(actions);
                self.state = State::Ground;
            } else {
                // ESC aborted the string; reprocess as a fresh escape
                self.clear();
                self.state = State::Escape;
                self.escape(byte, actions);
            }
            return;
        }
        match byte {
            c0::BEL | 0x9C => {
                self.dispatch_osc(actions);
                self.state = State::Ground;
            }
            c0::CAN | c0::SUB => self.state = State::Ground,
            c0::ESC => self.osc_esc = true,
            _ => {
                if self.osc_buffer.len() < MAX_OSC_LEN {
                    self.osc_buffer.push(byte);
                }
            }
        }
    }

    fn dispatch_osc(&mut self, actions: &mut Vec<Action>) {
        let buffer = std::mem::take(&mut self.osc_buffer);
        let mut parts = buffer.splitn(2, |&b| b == b';');
        let command = parts.next().unwrap_or(&[]);
        let payload = parts.next().unwrap_or(&[]);

        if command.is_empty() || !command.iter().all(u8::is_ascii_digit) {
            debug!("discarding OSC with non-numeric command");
            return;
        }
        let mut number: u16 = 0;
        for &byte in command {
            number = number
                .saturating_mul(10)
                .saturating_add((byte - b'0') as u16);
        }

        match number {
            // window title (0 also sets the icon name, which we fold in)
            0 | 1 | 2 => {
                let title = String::from_utf8_lossy(payload).into_owned();
                actions.push(Action::SetTitle(title));
            }
            // hyperlink: 8;params;url with optional id= in params
            8 => {
                let mut parts = payload.splitn(2, |&b| b == b';');
                let link_params = parts.next().unwrap_or(&[]);
                let url = parts.next().unwrap_or(&[]);
                let url = if url.is_empty() {
                    None
                } else {
                    Some(String::from_utf8_lossy(url).into_owned())
                };
                let id = String::from_utf8_lossy(link_params)
                    .split(':')
                    .find_map(|kv| kv.strip_prefix("id=").map(str::to_owned));
                actions.push(Action::SetHyperlink { url, id });
            }
            other => debug!("discarding OSC {other}"),
        }
    }

    // --- ignored strings (DCS, SOS, PM, APC) ------------------------------

    fn string_ignore(&mut self, byte: u8, actions: &mut Vec<Action>) {
        if self.string_esc {
            self.string_esc = false;
            if byte == b'\\' {
                self.state = State::Ground;
            } else {
                self.clear();
                self.state = State::Escape;
                self.escape(byte, actions);
            }
            return;
        }
        match byte {
            0x9C | c0::CAN | c0::SUB => self.state = State::Ground,
            c0::ESC => self.string_esc = true,
            _ => {}
        }
    }
}

/// Map a C0 byte to its dedicated action, falling back to `Execute`
fn push_control(byte: u8, actions: &mut Vec<Action>) {
    let action = match byte {
        c0::BEL => Action::Bell,
        c0::BS => Action::Backspace,
        c0::HT => Action::Tab,
        c0::LF | c0::VT | c0::FF => Action::LineFeed,
        c0::CR => Action::CarriageReturn,
        _ => Action::Execute(byte),
    };
    actions.push(action);
}

/// SGR (Select Graphic Rendition) sub-grammar
fn sgr(params: &Params, actions: &mut Vec<Action>) {
    if params.is_empty() {
        actions.push(Action::ResetAttributes);
        return;
    }

    let mut i = 0;
    while i < params.len() {
        let param = params.get_or(i, 0);
        match param {
            0 => actions.push(Action::ResetAttributes),
            1 => actions.push(Action::SetAttribute(Attrs::BOLD)),
            2 => actions.push(Action::SetAttribute(Attrs::DIM)),
            3 => actions.push(Action::SetAttribute(Attrs::ITALIC)),
            4 => actions.push(Action::SetAttribute(Attrs::UNDERLINE)),
            5 => actions.push(Action::SetAttribute(Attrs::SLOW_BLINK)),
            6 => actions.push(Action::SetAttribute(Attrs::RAPID_BLINK)),
            7 => actions.push(Action::SetAttribute(Attrs::REVERSE)),
            8 => actions.push(Action::SetAttribute(Attrs::HIDDEN)),
            9 => actions.push(Action::SetAttribute(Attrs::STRIKETHROUGH)),
            21 => actions.push(Action::SetAttribute(Attrs::DOUBLE_UNDERLINE)),
            22 => actions.push(Action::ResetAttribute(Attrs::BOLD | Attrs::DIM)),
            23 => actions.push(Action::ResetAttribute(Attrs::ITALIC)),
            24 => actions.push(Action::ResetAttribute(
                Attrs::UNDERLINE | Attrs::DOUBLE_UNDERLINE,
            )),
            25 => actions.push(Action::ResetAttribute(
                Attrs::SLOW_BLINK | Attrs::RAPID_BLINK,
            )),
            27 => actions.push(Action::ResetAttribute(Attrs::REVERSE)),
            28 => actions.push(Action::ResetAttribute(Attrs::HIDDEN)),
            29 => actions.push(Action::ResetAttribute(Attrs::STRIKETHROUGH)),
            30..=37 => {
                if let Some(name) = NamedColor::from_sgr_normal(param - 30) {
                    actions.push(Action::SetForeground(Color::Named(name)));
                }
            }
            38 => match extended_color(params, &mut i) {
                Some(color) => actions.push(Action::SetForeground(color)),
                // the rest of the list belongs to the malformed form
                None => break,
            },
            39 => actions.push(Action::ResetForeground),
            40..=47 => {
                if let Some(name) = NamedColor::from_sgr_normal(param - 40) {
                    actions.push(Action::SetBackground(Color::Named(name)));
                }
            }
            48 => match extended_color(params, &mut i) {
                Some(color) => actions.push(Action::SetBackground(color)),
                None => break,
            },
            49 => actions.push(Action::ResetBackground),
            90..=97 => {
                if let Some(name) = NamedColor::from_sgr_bright(param - 90) {
                    actions.push(Action::SetForeground(Color::Named(name)));
                }
            }
            100..=107 => {
                if let Some(name) = NamedColor::from_sgr_bright(param - 100) {
                    actions.push(Action::SetBackground(Color::Named(name)));
                }
            }
            other => trace!("ignoring SGR {other}"),
        }
        i += 1;
    }
}

/// 256-color and truecolor forms: `38;5;N` / `38;2;R;G;B` and background
/// equivalents, consuming following parameters from the same list.
/// Returns `None` for malformed forms; the caller drops the rest of the
/// list, which has no independent meaning.
fn extended_color(params: &Params, i: &mut usize) -> Option<Color> {
    match params.get(*i + 1)? {
        5 => {
            let index = params.get(*i + 2)?;
            *i += 2;
            Some(Color::Indexed(index.min(255) as u8))
        }
        2 => {
            let r = params.get(*i + 2)?;
            let g = params.get(*i + 3)?;
            let b = params.get(*i + 4)?;
            *i += 4;
            Some(Color::rgb(
                r.min(255) as u8,
                g.min(255) as u8,
                b.min(255) as u8,
            ))
        }
        _ => None,
    }
}
