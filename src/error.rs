//! Error taxonomy shared by every layer of the crate

pub type OverlayResult<T> = Result<T, OverlayError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// Malformed geometry or parameters (non-finite values, negative radii, bad rings)
    #[error("validation error: {0}")]
    Validation(String),

    /// Conversion to or from a coordinate representation the library does not know
    #[error("unsupported conversion: {0}")]
    UnsupportedConversion(String),

    /// The request has no single well-defined answer (e.g. a direction at the origin)
    #[error("ambiguous operation: {0}")]
    AmbiguousOperation(String),

    /// Asset load or texture extraction failed in an external collaborator
    #[error("resource error: {0}")]
    Resource(String),
}

impl OverlayError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unsupported_conversion(msg: impl Into<String>) -> Self {
        Self::UnsupportedConversion(msg.into())
    }

    pub fn ambiguous(msg: impl Into<String>) -> Self {
        Self::AmbiguousOperation(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }
}

/// Reject NaN and infinities with a message naming the offending value
pub(crate) fn ensure_finite(name: &str, value: f64) -> OverlayResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OverlayError::validation(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

/// Require a finite, strictly positive value
pub(crate) fn ensure_positive(name: &str, value: f64) -> OverlayResult<f64> {
    let value = ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(OverlayError::validation(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

/// Require an opacity within `[0, 1]`
pub(crate) fn ensure_unit_alpha(name: &str, value: f32) -> OverlayResult<f32> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(OverlayError::validation(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
