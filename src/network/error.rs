//! Errors of the network core.

/// Result alias used by every fallible network-core API.
pub type BackdropResult<T> = Result<T, BackdropError>;

/// Errors raised while building a backdrop scene or acquiring its surface.
///
/// The per-frame path never produces these; only construction and mounting do.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BackdropError {
	/// Invalid generator, connection or motion parameters.
	#[error("validation error: {0}")]
	Validation(String),

	/// A preset name that is not in the preset table.
	#[error("unknown preset: {0}")]
	UnknownPreset(String),

	/// The host could not provide or size a drawing surface.
	#[error("surface error: {0}")]
	Surface(String),
}

impl BackdropError {
	/// Build a [`BackdropError::Validation`] value.
	pub fn validation(msg: impl Into<String>) -> Self {
		Self::Validation(msg.into())
	}

	/// Build a [`BackdropError::Surface`] value.
	pub fn surface(msg: impl Into<String>) -> Self {
		Self::Surface(msg.into())
	}
}

/// Fails with a validation error unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> BackdropResult<()> {
	if value.is_finite() && value > 0.0 {
		Ok(())
	} else {
		Err(BackdropError::validation(format!(
			"{name} must be finite and positive, got {value}"
		)))
	}
}

/// Fails with a validation error unless `value` is finite.
pub(crate) fn ensure_finite(name: &str, value: f64) -> BackdropResult<()> {
	if value.is_finite() {
		Ok(())
	} else {
		Err(BackdropError::validation(format!(
			"{name} must be finite, got {value}"
		)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_prefixes_are_stable() {
		assert!(BackdropError::validation("x").to_string().starts_with("validation error:"));
		assert!(BackdropError::surface("x").to_string().starts_with("surface error:"));
		assert_eq!(
			BackdropError::UnknownPreset("nope".into()).to_string(),
			"unknown preset: nope"
		);
	}

	#[test]
	fn positive_check_rejects_nan_and_zero() {
		assert!(ensure_positive("radius", 1.0).is_ok());
		assert!(ensure_positive("radius", 0.0).is_err());
		assert!(ensure_positive("radius", -3.0).is_err());
		assert!(ensure_positive("radius", f64::NAN).is_err());
		assert!(ensure_positive("radius", f64::INFINITY).is_err());
		assert!(ensure_finite("amp", -2.0).is_ok());
		assert!(ensure_finite("amp", f64::NEG_INFINITY).is_err());
	}
}
