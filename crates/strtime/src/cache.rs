//! Lazily derived native encoding of a format pattern.
//!
//! The C routines want a NUL-terminated, single byte per character string. Encoding the pattern
//! is cheap but not free, and a formatter is usually reused for many timestamps with the same
//! pattern, so the encoding is kept alongside a fingerprint of the pattern it came from and is
//! only redone when the fingerprint changes.
//!
//! The cached value is immutable and reference counted. Replacing it swaps in a new [`Arc`]; a
//! conversion still holding the old one keeps it alive until it is done.

use std::ffi::{CStr, CString};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};
use crate::error::{FormatError, Operand};

/// Hash of a pattern, used to detect that the cached encoding is stale.
pub(crate) fn fingerprint(pattern: &str) -> u64 {
	let mut hasher = DefaultHasher::new();
	pattern.hash(&mut hasher);
	hasher.finish()
}

/// Convert `text` to a NUL-terminated byte string, one byte per character.
///
/// # Errors
///
/// Returns [`FormatError::EncodingError`] with `operand` and the byte offset of the first
/// character that is not ASCII or is NUL (which the C routines would treat as end of string).
pub(crate) fn encode(text: &str, operand: Operand) -> Result<Box<CStr>, FormatError> {
	if let Some(i) = text.bytes().position(|b| !b.is_ascii() || b == 0) {
		return Err(FormatError::EncodingError(operand, i));
	}
	CString::new(text)
		.map(CString::into_boxed_c_str)
		.map_err(|e| FormatError::EncodingError(operand, e.nul_position()))
}

/// A pattern encoded for the C routines, tagged with the fingerprint of its source.
#[derive(Debug)]
pub(crate) struct EncodedPattern {
	fingerprint: u64,
	bytes: Box<CStr>
}

impl EncodedPattern {
	/// Encode `pattern`, tagging it with its precomputed `fingerprint`.
	fn new(pattern: &str, fingerprint: u64) -> Result<EncodedPattern, FormatError> {
		Ok(EncodedPattern {
			fingerprint,
			bytes: encode(pattern, Operand::Pattern)?
		})
	}

	/// Whether this encoding was derived from `pattern`.
	///
	/// The fingerprint is checked first; on a match the bytes are compared too, so a hash collision
	/// can never hand out another pattern's encoding.
	fn is_current(&self, fingerprint: u64, pattern: &str) -> bool {
		self.fingerprint == fingerprint && self.bytes.to_bytes() == pattern.as_bytes()
	}

	/// The NUL-terminated pattern.
	#[inline(always)]
	pub(crate) fn as_c_str(&self) -> &CStr {
		&self.bytes
	}

	/// Whether the pattern has no characters at all.
	#[inline(always)]
	pub(crate) fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}
}

/// Instance-owned cache holding at most one [`EncodedPattern`].
#[derive(Debug)]
pub(crate) struct PatternCache {
	slot: Mutex<Option<Arc<EncodedPattern>>>
}

impl PatternCache {
	/// Create an empty cache.
	pub(crate) fn new() -> PatternCache {
		PatternCache { slot: Mutex::new(None) }
	}

	/// Get the encoding of `pattern`, deriving and storing it if the cached one is absent or stale.
	///
	/// The lock is only held to look up or swap the cached value. A poisoned lock is recovered
	/// since the value behind it is never partially written.
	///
	/// # Errors
	///
	/// Returns [`FormatError::EncodingError`] if `pattern` cannot be encoded. The cache is left as
	/// it was.
	pub(crate) fn get(&self, pattern: &str) -> Result<Arc<EncodedPattern>, FormatError> {
		let fingerprint = fingerprint(pattern);
		let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
		if let Some(encoded) = slot.as_ref() {
			if encoded.is_current(fingerprint, pattern) {
				return Ok(Arc::clone(encoded));
			}
		}

		trace!("encoding pattern {:?} (fingerprint {:#018x})", pattern, fingerprint);
		let encoded = Arc::new(EncodedPattern::new(pattern, fingerprint)?);
		*slot = Some(Arc::clone(&encoded));
		Ok(encoded)
	}

	/// The currently cached encoding, if any.
	#[cfg(test)]
	pub(crate) fn peek(&self) -> Option<Arc<EncodedPattern>> {
		self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
	}
}
