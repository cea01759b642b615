//! Safe wrappers around the C library's broken-down time routines.
//!
//! Everything here is a direct call into libc (`strptime`, `strftime`, `timegm`, `mktime`,
//! `gmtime_r` and `localtime_r`), so behavior is exactly that of the host platform, including its
//! leniency. Nothing in this module validates or normalizes on its own.

use core::mem::{self, MaybeUninit};
use std::ffi::CStr;
use libc::{c_char, time_t, tm};

/// Calendar time as understood by the C library, i.e. a `struct tm`.
///
/// Never leaves the crate: it only lives for the duration of a single parse or render.
#[derive(Clone, Copy)]
pub(crate) struct BrokenDownTime(tm);

impl BrokenDownTime {
	/// Parse `text` according to `pattern` using `strptime`.
	///
	/// Returns the parsed time together with the number of bytes of `text` consumed, or `None` if
	/// `strptime` reports no match. Fields not mentioned in `pattern` are left zeroed.
	pub(crate) fn parse(text: &CStr, pattern: &CStr) -> Option<(BrokenDownTime, usize)> {
		// Safety: `tm` is plain data, all-zero is a valid value (including a null `tm_zone`)
		let mut t: tm = unsafe { mem::zeroed() };
		let start = text.as_ptr();
		// Safety:
		// - both strings are NUL-terminated and outlive the call
		// - strptime only writes to t, and returns either null or a pointer into text
		let end = unsafe { libc::strptime(start, pattern.as_ptr(), &mut t) };
		if end.is_null() {
			return None;
		}
		// Safety: end points into the same allocation as start, at or after it
		let consumed = unsafe { end.offset_from(start) } as usize;
		Some((BrokenDownTime(t), consumed))
	}

	/// Break down `sec` as UTC using `gmtime_r`.
	///
	/// Returns `None` if `sec` does not fit in `time_t` or the year overflows `tm`.
	pub(crate) fn from_utc(sec: i64) -> Option<BrokenDownTime> {
		let time = time_t::try_from(sec).ok()?;
		let mut t = MaybeUninit::<tm>::uninit();
		// Safety:
		// - gmtime_r does not read t, only writes
		// - if gmtime_r returns non-null, t is successfully initialized
		unsafe {
			if libc::gmtime_r(&time, t.as_mut_ptr()).is_null() {
				None
			} else {
				Some(BrokenDownTime(t.assume_init()))
			}
		}
	}

	/// Break down `sec` in the process's local timezone using `localtime_r`.
	///
	/// Returns `None` if `sec` does not fit in `time_t` or the year overflows `tm`.
	pub(crate) fn from_local(sec: i64) -> Option<BrokenDownTime> {
		let time = time_t::try_from(sec).ok()?;
		let mut t = MaybeUninit::<tm>::uninit();
		// Safety:
		// - localtime_r does not read t, only writes
		// - if localtime_r returns non-null, t is successfully initialized
		unsafe {
			if libc::localtime_r(&time, t.as_mut_ptr()).is_null() {
				None
			} else {
				Some(BrokenDownTime(t.assume_init()))
			}
		}
	}

	/// Interpret the fields as UTC using `timegm`. Out of range fields are normalized.
	#[allow(clippy::useless_conversion)]
	pub(crate) fn to_utc(mut self) -> i64 {
		// Safety: self.0 is a valid, exclusively borrowed tm
		i64::from(unsafe { libc::timegm(&mut self.0) })
	}

	/// Interpret the fields as local time using `mktime`.
	///
	/// Daylight savings is left for the zone rules to decide rather than taken from the parsed
	/// fields.
	#[allow(clippy::useless_conversion)]
	pub(crate) fn to_local(mut self) -> i64 {
		self.0.tm_isdst = -1;
		// Safety: self.0 is a valid, exclusively borrowed tm
		i64::from(unsafe { libc::mktime(&mut self.0) })
	}

	/// Expand `pattern` into `buf` using `strftime`.
	///
	/// Returns the number of bytes written, excluding the terminating NUL. Zero means either an
	/// empty expansion or that the expansion (plus NUL) did not fit in `buf`.
	pub(crate) fn format(&self, pattern: &CStr, buf: &mut [u8]) -> usize {
		// Safety:
		// - buf is valid for writes of buf.len() bytes, strftime never writes more than that
		// - pattern is NUL-terminated, self.0 is a fully initialized tm
		unsafe { libc::strftime(buf.as_mut_ptr() as *mut c_char, buf.len(), pattern.as_ptr(), &self.0) }
	}
}
