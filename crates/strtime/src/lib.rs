//! Format and parse timestamps with the platform's own `strftime` and `strptime`.
//!
//! This crate does not implement a date format syntax of its own. A [`TimeFormatter`] holds a
//! pattern of native directives (`%Y`, `%m`, `%d`, `%H`, `%M`, `%S`, `%z`, ...) and a
//! [`TimeMode`], and hands both to the C library, so output is byte-identical to what `strftime`
//! produces on the host and parsing is exactly as lenient as the host's `strptime`.
//!
//! The C routines only understand single byte strings, so patterns and input must be ASCII.
//! Anything else is reported as [`FormatError::EncodingError`] rather than mangled.
//!
//! If the `now` feature is enabled (the default), [`Timestamp::now`] reads the current time. If
//! the `logging` feature is enabled, cache activity and conversion failures are reported through
//! the [`log`](https://docs.rs/log) crate.
//!
//! # Examples
//!
//! Round trip in UTC.
//! ```
//! # use strtime::{TimeFormatter, TimeMode, Timestamp};
//! let f = TimeFormatter::with_pattern("%Y-%m-%dT%H:%M:%S%z", TimeMode::Universal);
//! let t = f.parse("2024-01-15T14:30:25+0000").unwrap();
//! assert_eq!(t, Timestamp::from_secs(1705329025));
//! assert_eq!(f.render(t).unwrap(), "2024-01-15T14:30:25+0000");
//! ```
//!
//! Failures are values, use [`Result::ok`] where only presence matters.
//! ```
//! # use strtime::{TimeFormatter, TimeMode};
//! let f = TimeFormatter::with_pattern("%H:%M", TimeMode::Universal);
//! assert!(f.parse("noon").ok().is_none());
//! ```

#![cfg(unix)]
// only enables the `doc_cfg` feature when
// the `docsrs` configuration attribute is defined
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
mod logging;

mod cache;
mod native;
pub mod error;
pub mod formatter;
pub mod timestamp;

pub use error::*;
pub use formatter::*;
pub use timestamp::*;
