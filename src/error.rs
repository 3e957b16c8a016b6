//! # Error Handling
//!
//! Error types for the contour renderer. Every failure in this crate is fatal to the run:
//! there is no retry, no fallback and no partial output. The types here exist so that the
//! failure can be reported precisely before the process exits.
//!
//! ## Error Taxonomy
//!
//! - **Config**: Invalid arguments or inconsistent settings, rejected before any worker starts
//! - **Resource**: An allocation could not be satisfied
//! - **Thread**: A worker could not be spawned or joined, or panicked
//! - **Image / Asset**: Reading or writing images and contour tiles
//! - **Scale**: Tile fitting through `contour_scale::cpu`
//! - **State**: An internal ordering invariant was violated
//! - **Aborted**: A worker was released from a rendezvous because another worker failed
//!
//! ## Usage
//!
//! ```rust
//! use marching_contours::error::ContourError;
//!
//! let error = ContourError::config("workers", "0", "must be at least 1");
//! assert_eq!(error.category(), "config");
//! assert!(error.to_string().contains("workers"));
//! ```

use std::collections::TryReserveError;
use std::{error::Error as StdError, fmt};

use contour_scale::cpu::ScaleError;

/// Base error type for the contour renderer
#[derive(Debug)]
pub enum ContourError {
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
    },
    /// Allocation failures
    Resource {
        resource: String,
        bytes: Option<usize>,
        reason: String,
    },
    /// Worker thread lifecycle failures
    Thread {
        operation: String,
        worker: Option<usize>,
        reason: String,
    },
    /// Image decoding/encoding errors
    Image {
        operation: String,
        path: String,
        source: image::ImageError,
    },
    /// Contour tile asset errors
    Asset {
        index: usize,
        path: Option<String>,
        reason: String,
    },
    /// Tile fitting errors
    Scale {
        operation: String,
        source: ScaleError,
    },
    /// Broken phase ordering
    State {
        phase: String,
        reason: String,
    },
    /// Released from a rendezvous after another worker failed
    Aborted { worker: usize },
}

impl ContourError {
    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a resource error from a failed `try_reserve*` call
    pub fn alloc(resource: impl Into<String>, bytes: usize, source: TryReserveError) -> Self {
        Self::Resource {
            resource: resource.into(),
            bytes: Some(bytes),
            reason: source.to_string(),
        }
    }

    /// Create a thread lifecycle error
    pub fn thread(
        operation: impl Into<String>,
        worker: Option<usize>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Thread {
            operation: operation.into(),
            worker,
            reason: reason.into(),
        }
    }

    /// Create an image codec error
    pub fn image(
        operation: impl Into<String>,
        path: impl Into<String>,
        source: image::ImageError,
    ) -> Self {
        Self::Image {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a contour tile asset error
    pub fn asset(index: usize, path: Option<String>, reason: impl Into<String>) -> Self {
        Self::Asset {
            index,
            path,
            reason: reason.into(),
        }
    }

    /// Create a tile fitting error
    pub fn scale(operation: impl Into<String>, source: ScaleError) -> Self {
        Self::Scale {
            operation: operation.into(),
            source,
        }
    }

    /// Create a state error
    pub fn state(phase: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::State {
            phase: phase.into(),
            reason: reason.into(),
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Resource { .. } => "resource",
            Self::Thread { .. } => "thread",
            Self::Image { .. } => "image",
            Self::Asset { .. } => "asset",
            Self::Scale { .. } => "scale",
            Self::State { .. } => "state",
            Self::Aborted { .. } => "aborted",
        }
    }

    /// Whether this error is a consequence of another worker's failure rather than a cause.
    pub fn is_secondary(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }

    /// Whether the failure happened before any work was done (usage or configuration).
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

impl fmt::Display for ContourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContourError::Config {
                field,
                value,
                reason,
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
            ContourError::Resource {
                resource,
                bytes,
                reason,
            } => {
                if let Some(bytes) = bytes {
                    write!(
                        f,
                        "Unable to allocate memory for {} ({} bytes): {}",
                        resource, bytes, reason
                    )
                } else {
                    write!(f, "Unable to allocate memory for {}: {}", resource, reason)
                }
            }
            ContourError::Thread {
                operation,
                worker,
                reason,
            } => {
                if let Some(worker) = worker {
                    write!(f, "Worker {} failed during {}: {}", worker, operation, reason)
                } else {
                    write!(f, "Thread error during {}: {}", operation, reason)
                }
            }
            ContourError::Image {
                operation,
                path,
                source,
            } => {
                write!(f, "Image error during {} on '{}': {}", operation, path, source)
            }
            ContourError::Asset {
                index,
                path,
                reason,
            } => {
                if let Some(path) = path {
                    write!(f, "Contour tile {} ('{}'): {}", index, path, reason)
                } else {
                    write!(f, "Contour tile {}: {}", index, reason)
                }
            }
            ContourError::Scale { operation, source } => {
                write!(f, "Scaling failed during {}: {}", operation, source)
            }
            ContourError::State { phase, reason } => {
                write!(f, "Pipeline ordering violated in {} phase: {}", phase, reason)
            }
            ContourError::Aborted { worker } => {
                write!(f, "Worker {} stopped because another worker failed", worker)
            }
        }
    }
}

impl StdError for ContourError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Image { source, .. } => Some(source),
            Self::Scale { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias using our custom error type
pub type ContourResult<T> = Result<T, ContourError>;

/// Error conversion implementations
impl From<ScaleError> for ContourError {
    fn from(error: ScaleError) -> Self {
        Self::scale("resize", error)
    }
}

/// Reserve room for `len` elements of `T` in a fresh vector, reporting failure as a
/// [`ContourError::Resource`] naming `resource`.
pub fn try_alloc<T>(resource: &str, len: usize) -> ContourResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| ContourError::alloc(resource, len.saturating_mul(size_of::<T>()), e))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = ContourError::config("workers", "0", "must be at least 1");
        assert_eq!(error.category(), "config");
        assert!(error.is_usage());
        assert!(!error.is_secondary());
    }

    #[test]
    fn test_error_display() {
        let error = ContourError::thread("spawn", Some(3), "resource temporarily unavailable");
        assert_eq!(
            error.to_string(),
            "Worker 3 failed during spawn: resource temporarily unavailable"
        );

        let error = ContourError::asset(7, Some("contours/7.ppm".into()), "missing");
        assert_eq!(error.to_string(), "Contour tile 7 ('contours/7.ppm'): missing");
    }

    #[test]
    fn test_aborted_is_secondary() {
        let error = ContourError::Aborted { worker: 2 };
        assert!(error.is_secondary());
        assert_eq!(error.category(), "aborted");
    }

    #[test]
    fn test_try_alloc_reports_resource() {
        let buf: Vec<u32> = try_alloc("grid row", 16).unwrap();
        assert!(buf.capacity() >= 16);

        let err = try_alloc::<u64>("huge", usize::MAX).unwrap_err();
        assert_eq!(err.category(), "resource");
    }
}
