//! Error types for parsing and rendering.
//!
//! Every failure in this crate is reported per call as a [`FormatError`]. None of them are
//! retried internally: a pattern or input that failed once will fail again.

use std::{error, fmt};

/// The piece of text that could not be represented as ASCII.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
	/// The format pattern configured on the formatter.
	Pattern,
	/// The text supplied to [`parse`](crate::TimeFormatter::parse).
	Input,
	/// The bytes produced by the native formatter (only possible under a non-C locale).
	Output
}

impl fmt::Display for Operand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Operand::Pattern => write!(f, "pattern"),
			Operand::Input => write!(f, "input"),
			Operand::Output => write!(f, "output"),
		}
	}
}

/// The error type for converting between timestamps and text.
///
/// # Examples
///
/// ```
/// # use strtime::{FormatError, Operand, TimeFormatter, TimeMode, Timestamp};
/// let f = TimeFormatter::with_pattern("%Y年", TimeMode::Universal);
/// let t = Timestamp::from_secs(0);
/// assert_eq!(f.render(t), Err(FormatError::EncodingError(Operand::Pattern, 2)));
/// assert_eq!(f.render(t).unwrap_err().to_string(), "Non-ASCII character in pattern at byte 2");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatError {
	/// A character outside of ASCII (or a NUL byte) was found. The offending operand and the byte
	/// offset of the first such character are provided in the payload.
	EncodingError(Operand, usize),
	/// The native parser did not match the input against the pattern.
	ParseError,
	/// The native formatter produced no output, either because the expansion does not fit in the
	/// render buffer or because the timestamp cannot be represented on this host. The timestamp
	/// (in seconds) is provided in the payload.
	RenderError(i64)
}

impl fmt::Display for FormatError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FormatError::EncodingError(o, i) => write!(f, "Non-ASCII character in {} at byte {}", o, i),
			FormatError::ParseError => write!(f, "Input does not match pattern"),
			FormatError::RenderError(t) => write!(f, "Unable to render timestamp {}", t),
		}
	}
}

impl error::Error for FormatError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_test() {
		assert_eq!(
			FormatError::EncodingError(Operand::Input, 7).to_string(),
			"Non-ASCII character in input at byte 7"
		);
		assert_eq!(FormatError::ParseError.to_string(), "Input does not match pattern");
		assert_eq!(FormatError::RenderError(-5).to_string(), "Unable to render timestamp -5");
	}
}
