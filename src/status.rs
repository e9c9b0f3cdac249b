//! Status Module
//!
//! Compact success-or-failure value returned by storage operations.
//!
//! Success owns nothing. A failure owns a single buffer that packs the
//! payload length, the failure kind and the message(s):
//!
//! ```text
//! ┌──────────────┬──────────┬──────────────────────────────────────┐
//! │ Len (4, LE)  │ Code (1) │ msg  [": " msg2]   (Len bytes)        │
//! └──────────────┴──────────┴──────────────────────────────────────┘
//! ```
//!
//! The buffer is always exactly `Len + 5` bytes.

use std::borrow::Cow;
use std::fmt;
use std::io;

use crate::error::{KvError, Result};
use crate::slice::Slice;

/// Length field (4) + code byte (1)
const HEADER_SIZE: usize = 5;

/// Joins the primary and secondary message
const SEPARATOR: &[u8] = b": ";

/// Failure classification carried in the tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Code {
    Ok = 0x00,
    NotFound = 0x01,
    Corruption = 0x02,
    NotSupported = 0x03,
    InvalidArgument = 0x04,
    IoError = 0x05,
}

impl Code {
    /// Name used when rendering a status
    pub fn name(&self) -> &'static str {
        match self {
            Code::Ok => "OK",
            Code::NotFound => "NotFound",
            Code::Corruption => "Corruption",
            Code::NotSupported => "NotSupported",
            Code::InvalidArgument => "InvalidArgument",
            Code::IoError => "IOError",
        }
    }
}

impl TryFrom<u8> for Code {
    type Error = u8;

    fn try_from(tag: u8) -> std::result::Result<Self, u8> {
        match tag {
            0x00 => Ok(Code::Ok),
            0x01 => Ok(Code::NotFound),
            0x02 => Ok(Code::Corruption),
            0x03 => Ok(Code::NotSupported),
            0x04 => Ok(Code::InvalidArgument),
            0x05 => Ok(Code::IoError),
            other => Err(other),
        }
    }
}

/// Result of an operation: OK, or a classified failure with a message
#[derive(PartialEq, Eq, Default)]
pub struct Status {
    /// `None` for OK, otherwise the packed buffer described above
    state: Option<Box<[u8]>>,
}

impl Status {
    // =========================================================================
    // Constructors
    // =========================================================================

    pub const fn ok() -> Self {
        Self { state: None }
    }

    pub fn not_found<'a>(msg: impl Into<Slice<'a>>) -> Self {
        Self::new(Code::NotFound, msg.into(), Slice::empty())
    }

    pub fn not_found_with<'a, 'b>(msg: impl Into<Slice<'a>>, msg2: impl Into<Slice<'b>>) -> Self {
        Self::new(Code::NotFound, msg.into(), msg2.into())
    }

    pub fn corruption<'a>(msg: impl Into<Slice<'a>>) -> Self {
        Self::new(Code::Corruption, msg.into(), Slice::empty())
    }

    pub fn corruption_with<'a, 'b>(msg: impl Into<Slice<'a>>, msg2: impl Into<Slice<'b>>) -> Self {
        Self::new(Code::Corruption, msg.into(), msg2.into())
    }

    pub fn not_supported<'a>(msg: impl Into<Slice<'a>>) -> Self {
        Self::new(Code::NotSupported, msg.into(), Slice::empty())
    }

    pub fn not_supported_with<'a, 'b>(
        msg: impl Into<Slice<'a>>,
        msg2: impl Into<Slice<'b>>,
    ) -> Self {
        Self::new(Code::NotSupported, msg.into(), msg2.into())
    }

    pub fn invalid_argument<'a>(msg: impl Into<Slice<'a>>) -> Self {
        Self::new(Code::InvalidArgument, msg.into(), Slice::empty())
    }

    pub fn invalid_argument_with<'a, 'b>(
        msg: impl Into<Slice<'a>>,
        msg2: impl Into<Slice<'b>>,
    ) -> Self {
        Self::new(Code::InvalidArgument, msg.into(), msg2.into())
    }

    pub fn io_error<'a>(msg: impl Into<Slice<'a>>) -> Self {
        Self::new(Code::IoError, msg.into(), Slice::empty())
    }

    pub fn io_error_with<'a, 'b>(msg: impl Into<Slice<'a>>, msg2: impl Into<Slice<'b>>) -> Self {
        Self::new(Code::IoError, msg.into(), msg2.into())
    }

    /// Pack `code` and the messages into one buffer.
    ///
    /// An empty `msg2` is treated as absent and adds no separator.
    fn new(code: Code, msg: Slice<'_>, msg2: Slice<'_>) -> Self {
        debug_assert_ne!(code, Code::Ok);

        let len1 = msg.size();
        let len2 = msg2.size();
        let size = len1 + if len2 > 0 { SEPARATOR.len() + len2 } else { 0 };
        let encoded_len = match u32::try_from(size) {
            Ok(len) => len,
            Err(_) => panic!("status message of {} bytes exceeds the length field", size),
        };

        let mut state = Vec::with_capacity(HEADER_SIZE + size);
        state.extend_from_slice(&encoded_len.to_le_bytes());
        state.push(code as u8);
        state.extend_from_slice(msg.data());
        if len2 > 0 {
            state.extend_from_slice(SEPARATOR);
            state.extend_from_slice(msg2.data());
        }
        debug_assert_eq!(state.len(), HEADER_SIZE + size);

        Self {
            state: Some(state.into_boxed_slice()),
        }
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    pub fn is_ok(&self) -> bool {
        self.state.is_none()
    }

    pub fn is_not_found(&self) -> bool {
        self.tag() == Code::NotFound as u8
    }

    pub fn is_corruption(&self) -> bool {
        self.tag() == Code::Corruption as u8
    }

    pub fn is_not_supported(&self) -> bool {
        self.tag() == Code::NotSupported as u8
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.tag() == Code::InvalidArgument as u8
    }

    pub fn is_io_error(&self) -> bool {
        self.tag() == Code::IoError as u8
    }

    /// Decoded failure kind. `Err` carries a tag byte no `Code` matches.
    pub fn code(&self) -> std::result::Result<Code, u8> {
        Code::try_from(self.tag())
    }

    fn tag(&self) -> u8 {
        match &self.state {
            None => Code::Ok as u8,
            Some(state) => state[4],
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Exact rendering as bytes: `OK`, `<Kind>: <msg>` or `<Kind>: <msg>: <msg2>`.
    ///
    /// Unlike `to_string()`, message bytes are reproduced verbatim even when
    /// they are not valid UTF-8.
    pub fn render_bytes(&self) -> Vec<u8> {
        let Some(state) = &self.state else {
            return b"OK".to_vec();
        };

        let kind = kind_name(state[4]);
        let payload = payload(state);
        let mut out = Vec::with_capacity(kind.len() + SEPARATOR.len() + payload.len());
        out.extend_from_slice(kind.as_bytes());
        out.extend_from_slice(SEPARATOR);
        out.extend_from_slice(payload);
        out
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    /// Move the status out, leaving OK behind. Never allocates.
    pub fn take(&mut self) -> Status {
        Status {
            state: self.state.take(),
        }
    }

    /// `Ok(())` for OK, otherwise the status wrapped in [`KvError::Status`]
    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(KvError::Status(self))
        }
    }
}

/// The `Len` payload bytes that follow the header
fn payload(state: &[u8]) -> &[u8] {
    let len = u32::from_le_bytes([state[0], state[1], state[2], state[3]]) as usize;
    &state[HEADER_SIZE..HEADER_SIZE + len]
}

fn kind_name(tag: u8) -> Cow<'static, str> {
    match Code::try_from(tag) {
        Ok(code) => Cow::Borrowed(code.name()),
        Err(unknown) => Cow::Owned(format!("Unknown code {}", unknown)),
    }
}

impl Clone for Status {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        match (&mut self.state, &source.state) {
            // Same encoded size: overwrite in place instead of reallocating.
            (Some(dst), Some(src)) if dst.len() == src.len() => dst.copy_from_slice(src),
            _ => self.state = source.state.clone(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            None => f.write_str("OK"),
            Some(state) => write!(
                f,
                "{}: {}",
                kind_name(state[4]),
                String::from_utf8_lossy(payload(state))
            ),
        }
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Status").field(&self.to_string()).finish()
    }
}

impl std::error::Error for Status {}

impl From<io::Error> for Status {
    fn from(err: io::Error) -> Self {
        let msg = err.to_string();
        Status::io_error(msg.as_str())
    }
}
