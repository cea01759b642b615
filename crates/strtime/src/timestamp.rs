//! Absolute points in time, independent of timezone.
//!
//! [`Timestamp`] is the value consumed by [`render`](crate::TimeFormatter::render) and produced
//! by [`parse`](crate::TimeFormatter::parse). Format directives are whole-second, so the
//! sub-second part is carried along but never rendered.

#[cfg(feature = "now")]
use core::mem::MaybeUninit;
#[cfg(feature = "now")]
use libc::{clock_gettime, CLOCK_REALTIME};
use libc::timespec;

/// Nanoseconds per second.
const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Unix time with nanosecond granularity.
///
/// Ordering compares seconds first, then nanoseconds.
///
/// # Examples
///
/// ```
/// # use strtime::Timestamp;
/// // Jan 15, 2024. 14:30:25.5 UTC.
/// let t = Timestamp::new(1705329024, 1_500_000_000);
/// assert_eq!(t, Timestamp { sec: 1705329025, nsec: 500_000_000 });
/// assert!(t > Timestamp::from_secs(1705329025));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
	/// Seconds since the Unix epoch
	pub sec: i64,
	/// Nanoseconds since the beginning of `sec`, ranging [0-999999999]
	pub nsec: u32
}

impl Timestamp {
	/// 00:00:00 UTC on January 1, 1970.
	pub const UNIX_EPOCH: Timestamp = Timestamp { sec: 0, nsec: 0 };

	/// Create a timestamp from whole seconds since the Unix epoch.
	#[inline(always)]
	pub const fn from_secs(sec: i64) -> Timestamp {
		Timestamp { sec, nsec: 0 }
	}

	/// Create a timestamp from seconds and nanoseconds, rolling over seconds as needed so that
	/// `nsec` stays in the range of [0-999999999]. Negative nanoseconds borrow from `sec`.
	///
	/// # Examples
	///
	/// ```
	/// # use strtime::Timestamp;
	/// assert_eq!(Timestamp::new(10, -1), Timestamp { sec: 9, nsec: 999_999_999 });
	/// assert_eq!(Timestamp::new(-1, 2_000_000_001), Timestamp { sec: 1, nsec: 1 });
	/// ```
	pub const fn new(sec: i64, nsec: i64) -> Timestamp {
		Timestamp {
			sec: sec.saturating_add(nsec.div_euclid(NANOS_PER_SECOND)),
			nsec: nsec.rem_euclid(NANOS_PER_SECOND) as u32
		}
	}

	/// Get the current time.
	///
	/// This function will return `None` if `libc::clock_gettime` fails.
	///
	/// # Examples
	///
	/// ```
	/// # use strtime::Timestamp;
	/// let t = Timestamp::now().expect("Failed to get current time");
	/// assert!(t > Timestamp::UNIX_EPOCH);
	/// ```
	#[cfg_attr(docsrs, doc(cfg(feature = "now")))]
	#[cfg(feature = "now")]
	pub fn now() -> Option<Timestamp> {
		let mut time = MaybeUninit::<timespec>::uninit();
		// Safety:
		// - clock_gettime does not read time, only writes
		// - if clock_gettime returns zero, time is successfully initialized
		unsafe {
			match clock_gettime(CLOCK_REALTIME, time.as_mut_ptr()) {
				0 => Some(time.assume_init().into()),
				_ => None
			}
		}
	}
}

impl From<i64> for Timestamp {
	/// Whole seconds since the Unix epoch.
	fn from(sec: i64) -> Self {
		Timestamp::from_secs(sec)
	}
}

impl From<timespec> for Timestamp {
	/// Convert from `libc::timespec`, normalizing out of range nanoseconds.
	#[allow(clippy::useless_conversion)]
	fn from(value: timespec) -> Self {
		Timestamp::new(value.tv_sec.into(), value.tv_nsec.into())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_test() {
		assert_eq!(Timestamp::new(5, 0), Timestamp::from_secs(5));
		assert_eq!(Timestamp::new(5, 999_999_999), Timestamp { sec: 5, nsec: 999_999_999 });
		assert_eq!(Timestamp::new(5, 1_000_000_000), Timestamp { sec: 6, nsec: 0 });
		assert_eq!(Timestamp::new(0, -1_000_000_001), Timestamp { sec: -2, nsec: 999_999_999 });

		// Make sure extreme inputs cannot panic
		Timestamp::new(i64::MAX, i64::MAX);
		Timestamp::new(i64::MIN, i64::MIN);
	}

	#[test]
	fn ordering_test() {
		let a = Timestamp { sec: -1, nsec: 999_999_999 };
		let b = Timestamp::UNIX_EPOCH;
		let c = Timestamp { sec: 0, nsec: 1 };
		assert!(a < b);
		assert!(b < c);
		assert_eq!(Timestamp::from(42_i64), Timestamp::from_secs(42));
	}

	#[test]
	fn timespec_test() {
		let ts = timespec { tv_sec: 1705329025, tv_nsec: 250 };
		assert_eq!(Timestamp::from(ts), Timestamp { sec: 1705329025, nsec: 250 });
	}
}
