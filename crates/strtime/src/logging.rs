// Not every level is used.
#![allow(unused_macros)]

// Without the `logging` feature the arguments are still type checked (and count as used), but
// never evaluated.
macro_rules! log {
	($level:ident, $($tt:tt)*) => {{
		#[cfg(feature = "logging")]
		log::$level!($($tt)*);
		#[cfg(not(feature = "logging"))]
		let _ = || { let _ = format_args!($($tt)*); };
	}}
}

macro_rules! warn {
	($($tt:tt)*) => { log!(warn, $($tt)*) }
}

macro_rules! debug {
	($($tt:tt)*) => { log!(debug, $($tt)*) }
}

macro_rules! trace {
	($($tt:tt)*) => { log!(trace, $($tt)*) }
}
