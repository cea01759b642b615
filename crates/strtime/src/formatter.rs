//! Convert between [`Timestamp`]s and text using the platform's `strftime`/`strptime`.
//!
//! # Examples
//!
//! ```
//! # use strtime::{TimeFormatter, TimeMode, Timestamp};
//! let f = TimeFormatter::with_pattern("%Y-%m-%dT%H:%M:%S%z", TimeMode::Universal);
//! let t = f.parse("2024-01-15T14:30:25+0000").unwrap();
//! assert_eq!(t, Timestamp::from_secs(1705329025));
//! assert_eq!(f.render(t).unwrap(), "2024-01-15T14:30:25+0000");
//! ```

use core::fmt;
use core::str::FromStr;
use crate::cache::{encode, PatternCache};
use crate::error::{FormatError, Operand};
use crate::native::BrokenDownTime;
use crate::timestamp::Timestamp;

/// Pattern used by [`TimeFormatter::new`]: ISO 8601 with a numeric UTC offset.
pub const DEFAULT_PATTERN: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Size of the buffer `strftime` renders into, including the terminating NUL.
///
/// Expansions that do not fit fail with [`FormatError::RenderError`]; they are never truncated and
/// the buffer never grows.
pub const RENDER_CAPACITY: usize = 80;

/// Which rules apply when breaking a timestamp down into calendar fields (and back).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeMode {
	/// The process's configured local timezone, including daylight savings rules.
	#[default]
	Local,
	/// UTC, with no timezone database lookups.
	Universal
}

impl FromStr for TimeMode {
	type Err = String;

	/// Parse a string into a [`TimeMode`].
	///
	/// The parsing is case insensitive and accepts `local`, `utc` and `universal`.
	///
	/// # Examples
	///
	/// ```
	/// # use strtime::TimeMode;
	/// assert_eq!("UTC".parse(), Ok(TimeMode::Universal));
	/// assert_eq!("local".parse(), Ok(TimeMode::Local));
	/// assert!("gmt+1".parse::<TimeMode>().is_err());
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"local" => Ok(TimeMode::Local),
			"utc" | "universal" => Ok(TimeMode::Universal),
			_ => Err(s.to_string())
		}
	}
}

impl fmt::Display for TimeMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TimeMode::Local => write!(f, "local"),
			TimeMode::Universal => write!(f, "utc"),
		}
	}
}

/// Bidirectional conversion between [`Timestamp`]s and text under a configurable pattern and
/// [`TimeMode`].
///
/// The pattern uses the host's native directive set (`%Y`, `%m`, `%d`, `%H`, `%M`, `%S`, `%z`,
/// `%Z`, ...) and must be ASCII. It is not validated when set: an unusable pattern shows up as an
/// error from the next [`parse`](TimeFormatter::parse) or [`render`](TimeFormatter::render).
///
/// The native encoding of the pattern is cached per instance and only rederived when the pattern
/// changes. Conversions take `&self`, so one formatter can be shared between threads.
///
/// Cloning copies the pattern and mode into an independent formatter that starts with an empty
/// cache.
///
/// # Examples
///
/// ```
/// # use strtime::{TimeFormatter, TimeMode, Timestamp};
/// let mut f = TimeFormatter::new();
/// f.set_mode(TimeMode::Universal);
/// assert_eq!(f.render(Timestamp::from_secs(0)).unwrap(), "1970-01-01T00:00:00+0000");
///
/// f.set_pattern("%d/%m/%Y");
/// assert_eq!(f.render(Timestamp::from_secs(0)).unwrap(), "01/01/1970");
/// ```
#[derive(Debug)]
pub struct TimeFormatter {
	pattern: String,
	mode: TimeMode,
	cache: PatternCache
}

impl Default for TimeFormatter {
	fn default() -> Self {
		TimeFormatter::new()
	}
}

impl Clone for TimeFormatter {
	fn clone(&self) -> Self {
		TimeFormatter::with_pattern(self.pattern.clone(), self.mode)
	}
}

impl TimeFormatter {
	/// Create a formatter using [`DEFAULT_PATTERN`] in local time.
	pub fn new() -> TimeFormatter {
		TimeFormatter::with_pattern(DEFAULT_PATTERN, TimeMode::Local)
	}

	/// Create a formatter with the given pattern and mode.
	pub fn with_pattern(pattern: impl Into<String>, mode: TimeMode) -> TimeFormatter {
		TimeFormatter {
			pattern: pattern.into(),
			mode,
			cache: PatternCache::new()
		}
	}

	/// The current pattern.
	#[inline(always)]
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// The current mode.
	#[inline(always)]
	pub fn mode(&self) -> TimeMode {
		self.mode
	}

	/// Replace the pattern. Takes effect on the next conversion.
	pub fn set_pattern(&mut self, pattern: impl Into<String>) {
		self.pattern = pattern.into();
	}

	/// Replace the mode. Takes effect on the next conversion.
	pub fn set_mode(&mut self, mode: TimeMode) {
		self.mode = mode;
	}

	/// Parse `text` into a timestamp using the native `strptime`.
	///
	/// The parsed fields are interpreted as UTC in [`TimeMode::Universal`], or under the local
	/// timezone's rules (daylight savings decided by the zone) in [`TimeMode::Local`]. A numeric
	/// offset parsed by `%z` does not shift the result, just as it does not for the native
	/// conversions. Unparsed trailing text is accepted whenever `strptime` accepts it, even when
	/// nothing at all was consumed. The one exception is an empty pattern, which rejects any
	/// non-empty input.
	///
	/// The returned timestamp always has `nsec == 0`.
	///
	/// # Errors
	///
	/// - [`FormatError::EncodingError`] if `text` or the pattern is not ASCII.
	/// - [`FormatError::ParseError`] if `strptime` does not match `text`.
	///
	/// # Examples
	///
	/// ```
	/// # use strtime::{FormatError, TimeFormatter, TimeMode, Timestamp};
	/// let f = TimeFormatter::with_pattern("%Y-%m-%d", TimeMode::Universal);
	/// assert_eq!(f.parse("2024-02-29"), Ok(Timestamp::from_secs(1709164800)));
	/// assert_eq!(f.parse("29/02/2024"), Err(FormatError::ParseError));
	/// ```
	pub fn parse(&self, text: &str) -> Result<Timestamp, FormatError> {
		let input = encode(text, Operand::Input).inspect_err(|e| debug!("parse of {:?}: {}", text, e))?;
		let pattern = self.cache.get(&self.pattern).inspect_err(|e| debug!("parse of {:?}: {}", text, e))?;

		let (tm, consumed) = match BrokenDownTime::parse(&input, pattern.as_c_str()) {
			// An empty pattern matches nothing, so it only accepts empty input
			Some((_, 0)) if pattern.is_empty() && !text.is_empty() => None,
			r => r
		}.ok_or_else(|| {
			debug!("parse of {:?}: no match for {:?}", text, self.pattern);
			FormatError::ParseError
		})?;
		if consumed < text.len() {
			trace!("parse of {:?}: ignoring trailing {:?}", text, &text[consumed..]);
		}

		let sec = match self.mode {
			TimeMode::Universal => tm.to_utc(),
			TimeMode::Local => tm.to_local()
		};
		Ok(Timestamp::from_secs(sec))
	}

	/// Render `time` as text using the native `strftime`.
	///
	/// Only whole seconds are rendered; `time.nsec` is ignored. The result is byte-identical to
	/// `strftime` with the same pattern on the broken-down time from `gmtime_r`
	/// ([`TimeMode::Universal`]) or `localtime_r` ([`TimeMode::Local`]).
	///
	/// An empty pattern renders an empty string for every timestamp, even one that cannot be
	/// broken down.
	///
	/// # Errors
	///
	/// - [`FormatError::EncodingError`] if the pattern is not ASCII, or the rendered text is not
	///   (which can only happen under a non-C process locale).
	/// - [`FormatError::RenderError`] if `time` cannot be broken down on this host, or if the
	///   expansion plus its terminating NUL exceeds [`RENDER_CAPACITY`] bytes.
	///
	/// # Examples
	///
	/// ```
	/// # use strtime::{FormatError, TimeFormatter, TimeMode, Timestamp};
	/// let f = TimeFormatter::with_pattern("%a %d %b %Y %H:%M:%S %Z", TimeMode::Universal);
	/// assert_eq!(f.render(Timestamp::from_secs(1718617807)).unwrap(), "Mon 17 Jun 2024 09:50:07 GMT");
	/// assert_eq!(f.render(Timestamp::from_secs(i64::MAX)), Err(FormatError::RenderError(i64::MAX)));
	/// ```
	pub fn render(&self, time: Timestamp) -> Result<String, FormatError> {
		let pattern = self.cache.get(&self.pattern).inspect_err(|e| debug!("render of {}: {}", time.sec, e))?;
		if pattern.is_empty() {
			return Ok(String::new());
		}
		let tm = match self.mode {
			TimeMode::Universal => BrokenDownTime::from_utc(time.sec),
			TimeMode::Local => BrokenDownTime::from_local(time.sec)
		}.ok_or_else(|| {
			debug!("render of {}: cannot break down in {} time", time.sec, self.mode);
			FormatError::RenderError(time.sec)
		})?;

		let mut buf = [0u8; RENDER_CAPACITY];
		let len = tm.format(pattern.as_c_str(), &mut buf);
		if len == 0 {
			debug!("render of {}: {:?} expands to nothing or more than {} bytes", time.sec, self.pattern, RENDER_CAPACITY - 1);
			return Err(FormatError::RenderError(time.sec));
		}

		let bytes = &buf[..len];
		match bytes.iter().position(|b| !b.is_ascii()) {
			Some(i) => {
				warn!("render of {}: non-ASCII output from {:?}, is the process locale not C?", time.sec, self.pattern);
				Err(FormatError::EncodingError(Operand::Output, i))
			},
			None => Ok(bytes.iter().map(|&b| b as char).collect())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::thread;

	const ISO: &str = "%Y-%m-%dT%H:%M:%S%z";

	fn utc(pattern: impl Into<String>) -> TimeFormatter {
		let _ = env_logger::try_init();
		TimeFormatter::with_pattern(pattern, TimeMode::Universal)
	}

	#[test]
	fn defaults_test() {
		let f = TimeFormatter::new();
		assert_eq!(f.pattern(), "%Y-%m-%dT%H:%M:%S%z");
		assert_eq!(f.mode(), TimeMode::Local);
		assert_eq!(TimeFormatter::default().pattern(), DEFAULT_PATTERN);
	}

	#[test]
	fn time_mode_test() {
		assert_eq!(TimeMode::from_str("local"), Ok(TimeMode::Local));
		assert_eq!(TimeMode::from_str("LOCAL"), Ok(TimeMode::Local));
		assert_eq!(TimeMode::from_str("utc"), Ok(TimeMode::Universal));
		assert_eq!(TimeMode::from_str("Universal"), Ok(TimeMode::Universal));
		assert_eq!(TimeMode::from_str("zulu"), Err(String::from("zulu")));
		assert_eq!(TimeMode::Universal.to_string(), "utc");
		assert_eq!(TimeMode::default(), TimeMode::Local);
	}

	#[test]
	fn round_trip_test() {
		let f = utc(ISO);
		let t = f.parse("2024-01-15T14:30:25+0000").unwrap();
		assert_eq!(t, Timestamp::from_secs(1705329025));
		assert_eq!(f.render(t).unwrap(), "2024-01-15T14:30:25+0000");

		for sec in [0, -1, 951782400, 1709164800, -2208988800, 4102444799] {
			let t = Timestamp::from_secs(sec);
			assert_eq!(f.parse(&f.render(t).unwrap()), Ok(t), "sec: {}", sec);
		}
	}

	#[test]
	fn sub_second_test() {
		let f = utc("%H:%M:%S");
		assert_eq!(f.render(Timestamp { sec: 59, nsec: 999_999_999 }).unwrap(), "00:00:59");
		assert_eq!(f.render(Timestamp::new(0, -1)).unwrap(), "23:59:59");
	}

	#[test]
	fn render_cache_test() {
		let f = utc("%Y");
		let t = Timestamp::from_secs(1705329025);
		assert_eq!(f.render(t).unwrap(), "2024");
		let a = f.cache.peek().unwrap();
		assert_eq!(f.render(t).unwrap(), "2024");
		assert!(Arc::ptr_eq(&a, &f.cache.peek().unwrap()));
	}

	#[test]
	fn pattern_change_test() {
		let mut f = utc("%Y");
		let t = Timestamp::from_secs(1705329025);
		assert_eq!(f.render(t).unwrap(), "2024");
		f.set_pattern("%m");
		assert_eq!(f.render(t).unwrap(), "01");
		f.set_pattern("%d");
		assert_eq!(f.parse("15").unwrap(), Timestamp::from_secs(-2208988800 + 14 * 86400));
		f.set_pattern("%Y");
		assert_eq!(f.render(t).unwrap(), "2024");
	}

	#[test]
	fn clone_test() {
		let mut f = utc("%Y");
		f.render(Timestamp::UNIX_EPOCH).unwrap();
		let g = f.clone();
		assert_eq!(g.pattern(), "%Y");
		assert_eq!(g.mode(), TimeMode::Universal);
		assert!(g.cache.peek().is_none());

		f.set_pattern("%m");
		f.set_mode(TimeMode::Local);
		assert_eq!(g.pattern(), "%Y");
		assert_eq!(g.mode(), TimeMode::Universal);
		assert_eq!(g.render(Timestamp::UNIX_EPOCH).unwrap(), "1970");
	}

	#[test]
	fn encoding_test() {
		let f = utc("%Y年");
		assert_eq!(f.render(Timestamp::UNIX_EPOCH), Err(FormatError::EncodingError(Operand::Pattern, 2)));
		assert_eq!(f.parse("2024年"), Err(FormatError::EncodingError(Operand::Input, 4)));

		let f = utc("%Y");
		assert_eq!(f.parse("２０２４"), Err(FormatError::EncodingError(Operand::Input, 0)));
		assert_eq!(f.parse("20\u{0}24"), Err(FormatError::EncodingError(Operand::Input, 2)));
		assert_eq!(f.render(Timestamp::UNIX_EPOCH).unwrap(), "1970");
	}

	#[test]
	fn invalid_day_test() {
		// glibc accepts any day in [1, 31] regardless of month, and timegm rolls it over
		let f = utc("%Y-%m-%d");
		assert_eq!(f.parse("2024-02-30"), Ok(Timestamp::from_secs(1709251200)));
		assert_eq!(f.parse("2024-02-32"), Err(FormatError::ParseError));
		assert_eq!(f.parse("2024-13-01"), Err(FormatError::ParseError));
	}

	#[test]
	fn lenient_parse_test() {
		let f = utc("%Y-%m-%d");
		assert_eq!(f.parse("2024-01-15T14:30:25"), Ok(Timestamp::from_secs(1705276800)));
		assert_eq!(f.parse("2024-01"), Err(FormatError::ParseError));
		assert_eq!(f.parse(""), Err(FormatError::ParseError));
	}

	#[test]
	fn offset_ignored_test() {
		let f = utc(ISO);
		assert_eq!(f.parse("2024-01-15T14:30:25+0100"), Ok(Timestamp::from_secs(1705329025)));
		assert_eq!(f.parse("2024-01-15T14:30:25-0930"), Ok(Timestamp::from_secs(1705329025)));
	}

	#[test]
	fn empty_pattern_test() {
		let f = utc("");
		assert_eq!(f.render(Timestamp::UNIX_EPOCH).unwrap(), "");
		assert_eq!(f.render(Timestamp::from_secs(1705329025)).unwrap(), "");
		assert_eq!(f.parse("2024"), Err(FormatError::ParseError));
		assert_eq!(f.parse(" "), Err(FormatError::ParseError));

		// Nothing to break down, so no timestamp is out of range
		assert_eq!(f.render(Timestamp::from_secs(i64::MAX)).unwrap(), "");
		assert_eq!(f.render(Timestamp::from_secs(i64::MIN)).unwrap(), "");
		let mut f = f;
		f.set_mode(TimeMode::Local);
		assert_eq!(f.render(Timestamp::from_secs(i64::MAX)).unwrap(), "");
	}

	#[test]
	fn zero_width_match_test() {
		// Whitespace directives match zero characters, leaving every field zeroed: Dec 31, 1899
		for pattern in [" ", "%n", "%t"] {
			let f = utc(pattern);
			assert_eq!(f.parse("abc"), Ok(Timestamp::from_secs(-2209075200)), "pattern: {:?}", pattern);
		}
		assert_eq!(utc(" %Y-%m-%d").parse("2024-01-15"), Ok(Timestamp::from_secs(1705276800)));
	}

	#[test]
	fn capacity_test() {
		let t = Timestamp::from_secs(1705329025);
		let f = utc("x".repeat(RENDER_CAPACITY - 1));
		assert_eq!(f.render(t).unwrap(), "x".repeat(RENDER_CAPACITY - 1));
		let f = utc("x".repeat(RENDER_CAPACITY));
		assert_eq!(f.render(t), Err(FormatError::RenderError(1705329025)));

		// 19 characters per repetition, so four fit and five do not
		let f = utc("%Y-%m-%dT%H:%M:%S".repeat(4));
		assert_eq!(f.render(t).unwrap().len(), 76);
		let f = utc("%Y-%m-%dT%H:%M:%S".repeat(5));
		assert_eq!(f.render(t), Err(FormatError::RenderError(1705329025)));
	}

	#[test]
	fn unrepresentable_test() {
		let f = utc(ISO);
		assert_eq!(f.render(Timestamp::from_secs(i64::MAX)), Err(FormatError::RenderError(i64::MAX)));
		assert_eq!(f.render(Timestamp::from_secs(i64::MIN)), Err(FormatError::RenderError(i64::MIN)));
	}

	#[test]
	fn shared_test() {
		let f = Arc::new(utc("%Y-%m-%d %H:%M:%S"));
		let handles: Vec<_> = (0..8).map(|i| {
			let f = Arc::clone(&f);
			thread::spawn(move || {
				for j in 0..200 {
					let t = Timestamp::from_secs(1705329025 + i * 86400 + j);
					let s = f.render(t).unwrap();
					assert_eq!(f.parse(&s), Ok(t));
				}
			})
		}).collect();
		for h in handles {
			h.join().unwrap();
		}
	}
}
