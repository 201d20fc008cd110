//! Engine status codes and their diagnostic messages

use std::fmt;

use thiserror::Error;

/// Status returned by the engine's parse entry points
///
/// The discriminants are the engine's wire values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    Ok = 0,
    /// Content is not valid UTF-8
    NotUtf8 = 1,
    /// Only produced by export paths; never by loading
    FileWriteFailed = 2,
    /// File name does not end in `.svg` or `.svgz`
    InvalidFileSuffix = 3,
    /// Gzip stream could not be inflated
    MalformedGzip = 4,
    /// Document has no usable width/height
    InvalidSize = 5,
    /// XML or SVG structure could not be parsed
    ParsingFailed = 6,
}

/// A raw status code outside the engine's contract
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("unknown engine status code {0}")]
pub struct UnknownStatus(pub i32);

impl Status {
    pub const ALL: [Status; 7] = [
        Status::Ok,
        Status::NotUtf8,
        Status::FileWriteFailed,
        Status::InvalidFileSuffix,
        Status::MalformedGzip,
        Status::InvalidSize,
        Status::ParsingFailed,
    ];

    /// The raw wire value
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    /// Convert a raw code, treating unknown values as a broken contract
    ///
    /// # Panics
    ///
    /// Panics if `code` is not one of the engine's status values. That can
    /// only happen when the engine and this crate disagree about the ABI.
    pub fn from_raw(code: i32) -> Self {
        match Self::try_from(code) {
            Ok(status) => status,
            Err(err) => panic!("engine contract violation: {err}"),
        }
    }

    /// Diagnostic sentence for this status (empty for `Ok`)
    pub fn message(self) -> &'static str {
        error_to_string(self)
    }
}

impl TryFrom<i32> for Status {
    type Error = UnknownStatus;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Status::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or(UnknownStatus(code))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Map a status to its fixed diagnostic message
pub fn error_to_string(status: Status) -> &'static str {
    match status {
        Status::Ok => "",
        Status::NotUtf8 => "The SVG content has not an UTF-8 encoding.",
        Status::FileWriteFailed => "Failed to write to the file.",
        Status::InvalidFileSuffix => "Invalid file suffix.",
        Status::MalformedGzip => "Not a GZip compressed data.",
        Status::InvalidSize => "SVG doesn't have a valid size.",
        Status::ParsingFailed => "Failed to parse an SVG data.",
    }
}

/// Map a raw status code to its diagnostic message
///
/// # Panics
///
/// Panics on a code outside the engine's contract, see [`Status::from_raw`].
pub fn translate_code(code: i32) -> &'static str {
    error_to_string(Status::from_raw(code))
}
