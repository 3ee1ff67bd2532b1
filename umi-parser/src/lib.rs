//! Umi terminal parser
//!
//! A streaming VT/xterm escape sequence parser. It converts a byte stream
//! into semantic [`Action`]s; the cumulative output is a pure function of
//! the cumulative input, independent of how the bytes are chunked.
//!
//! Supported input:
//! - C0 control characters (BEL, BS, HT, LF, VT, FF, CR, ESC)
//! - ESC sequences (DECSC/DECRC, IND, NEL, RI, RIS)
//! - CSI sequences (cursor movement, erase, SGR, modes, scroll region,
//!   insert/delete, DECSCUSR)
//! - OSC sequences (window title, hyperlinks)
//! - UTF-8 text, including sequences split across chunks
//!
//! Everything else (DCS, SOS, PM, APC, unknown CSI/OSC forms) is consumed
//! to its terminator and discarded. Malformed input never raises an error;
//! the offending sequence is dropped and parsing resumes at the next byte.

pub mod action;
pub mod params;
pub mod parser;

pub use action::Action;
pub use params::Params;
pub use parser::Parser;
