// File: crates/chart-core/src/error.rs
// Summary: Error taxonomy for the chart engine.
// Notes:
// - Lifecycle misuse (double destroy, update after destroy, stale handles) is never an
//   error; those calls are no-ops. Mount against a non-drawing surface is the only
//   error a lifecycle call returns.

use thiserror::Error;

use crate::surface::SurfaceId;

#[derive(Error, Debug)]
pub enum ChartError {
    /// The surface has no drawing context, e.g. the canvas element is still wrapped in
    /// template markup. This is a programming error in the page, not a retryable condition.
    #[error("surface '{surface}' has no drawing context: {reason}")]
    InvalidSurface { surface: SurfaceId, reason: String },

    /// The free-form options object could not be read.
    #[error("invalid chart options: {0}")]
    Options(#[from] serde_json::Error),
}

pub type ChartResult<T> = Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_surface_message_names_the_surface() {
        let err = ChartError::InvalidSurface {
            surface: SurfaceId::from("positives"),
            reason: "canvas is wrapped in <template> markup".into(),
        };
        assert_eq!(
            err.to_string(),
            "surface 'positives' has no drawing context: canvas is wrapped in <template> markup"
        );
    }

    #[test]
    fn json_errors_convert_into_option_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ChartError = json_err.into();
        assert!(matches!(err, ChartError::Options(_)));
    }
}
