//! Support for command line argument parsing.
//!
//! See [crate] documentation for details on command line arguments and examples.

use std::error::Error;
use std::ffi::OsString;
use std::fmt::{Display, Debug};
use strtime::{TimeMode, Timestamp, DEFAULT_PATTERN};

/// What to do with the configured formatter.
#[derive(Debug, PartialEq)]
pub enum Action {
	/// Render the given timestamp, or the current time if none was supplied.
	Render(Option<Timestamp>),
	/// Parse the given text and print the Unix timestamp.
	Parse(String)
}

/// The error type for parsing command line arguments.
#[cfg_attr(test, derive(PartialEq))]
pub enum ArgumentsError {
	/// The option was unrecognized. The option is returned as the payload of this variant.
	UnrecognizedOption(String),
	/// Error converting an argument to UTF-8. The argument index and original [`OsString`] that
	/// could not be converted are returned as the payload of this variant.
	InvalidUTF8(usize, OsString),
	/// The parameter for an option was not supplied. The option is returned as the payload for this
	/// variant.
	MissingParameter(String),
	/// The provided mode was not `local` or `utc`. The supplied argument is returned as the payload
	/// of this variant.
	InvalidMode(String),
	/// The timestamp to render was not an integer number of seconds. The supplied argument is
	/// returned as the payload of this variant.
	InvalidTimestamp(String),
	/// More than one of a timestamp to render and text to parse was supplied. The extra argument is
	/// returned as the payload of this variant.
	ConflictingInput(String),
	/// Help option (-h) was included, so print help details and exit.
	Help
}

impl Display for ArgumentsError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ArgumentsError::UnrecognizedOption(s) => write!(f, "Unrecognized option: {}", s),
			ArgumentsError::InvalidUTF8(i, v) => write!(f, "Invalid UTF-8 in argument {}: {:?}", i, v),
			ArgumentsError::MissingParameter(s) => write!(f, "Missing parameter for option {}", s),
			ArgumentsError::InvalidMode(s) => write!(f, "Invalid mode: {}", s),
			ArgumentsError::InvalidTimestamp(s) => write!(f, "Invalid timestamp: {}", s),
			ArgumentsError::ConflictingInput(s) => write!(f, "Only one timestamp or --parse input allowed, found: {}", s),
			ArgumentsError::Help => write!(f, "Help requested")
		}
	}
}

impl Debug for ArgumentsError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		Display::fmt(self, f)
	}
}

impl Error for ArgumentsError {}

/// Convert an argument to [`&str`].
///
/// The function takes the argument index `i`, optional argument name `a`, and the argument `s`.
///
/// # Errors
///
/// Returns [`ArgumentsError::InvalidUTF8`] if the argument could not be converted to UTF-8 or
/// [`ArgumentsError::MissingParameter`] if the argument is `None`.
fn arg_to_str<'a, 'b>(i: usize, a: Option<&'a str>, s: Option<&'b OsString>)
	-> Result<&'b str, ArgumentsError>
{
	match s {
		Some(v) => v.to_str().ok_or_else(|| ArgumentsError::InvalidUTF8(i, v.clone())),
		None => Err(ArgumentsError::MissingParameter(a.map(String::from).unwrap_or_default()))
	}
}

/// Parsed command line arguments.
#[derive(Debug, PartialEq)]
pub struct Arguments {
	/// The format pattern.
	pub pattern: String,
	/// Whether to use local time or UTC.
	pub mode: TimeMode,
	/// What to do.
	pub action: Action
}

impl Arguments {
	/// Parse command line arguments.
	///
	/// The input can be any type that implements [`Iterator`] that yields [`OsString`], though
	/// typically this would be [`std::env::args_os`]. This function assumes that the application
	/// name is **not** supplied as the first item yielded by `args`.
	///
	/// Negative timestamps are accepted as positional arguments, so only the known options are
	/// treated as options.
	///
	/// # Errors
	///
	/// This function can return any of the variants in [`ArgumentsError`]. See that documentation
	/// for more details.
	pub fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Arguments, ArgumentsError>
	{
		let mut pattern: Option<String> = None;
		let mut mode = TimeMode::Local;
		let mut action: Option<Action> = None;
		let mut i = 0;
		while let Some(arg) = args.next() {
			match arg_to_str(i, None, Some(&arg))? {
				f @ ("-f" | "--format") => {
					pattern = Some(String::from(arg_to_str(i+1, Some(f), args.next().as_ref())?));
					// Increment because we called args.next()
					i += 1;
				},
				m @ ("-m" | "--mode") => {
					mode = arg_to_str(i+1, Some(m), args.next().as_ref())
						.and_then(|v| v.parse().map_err(ArgumentsError::InvalidMode))?;
					// Increment because we called args.next()
					i += 1;
				},
				"-u" | "--utc" => mode = TimeMode::Universal,
				p @ ("-p" | "--parse") => {
					let text = String::from(arg_to_str(i+1, Some(p), args.next().as_ref())?);
					if action.is_some() {
						return Err(ArgumentsError::ConflictingInput(text));
					}
					action = Some(Action::Parse(text));
					// Increment because we called args.next()
					i += 1;
				},
				"-h" | "--help" => return Err(ArgumentsError::Help),
				v => {
					let sec = v.parse::<i64>().map_err(|_| {
						if v.starts_with('-') {
							ArgumentsError::UnrecognizedOption(v.to_string())
						} else {
							ArgumentsError::InvalidTimestamp(v.to_string())
						}
					})?;
					if action.is_some() {
						return Err(ArgumentsError::ConflictingInput(v.to_string()));
					}
					action = Some(Action::Render(Some(Timestamp::from_secs(sec))));
				}
			}
			i += 1;
		}

		Ok(Arguments {
			pattern: pattern.unwrap_or_else(|| String::from(DEFAULT_PATTERN)),
			mode,
			action: action.unwrap_or(Action::Render(None))
		})
	}
}
