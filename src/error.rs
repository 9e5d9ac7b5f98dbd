use thiserror::Error;

/// Errors reported by fallible cache construction.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// The cache was configured to hold no entries.
	#[error("capacity must be greater than zero")]
	ZeroCapacity,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display() {
		assert_eq!(Error::ZeroCapacity.to_string(), "capacity must be greater than zero");
	}
}
