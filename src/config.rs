use std::path::PathBuf;

/// Weights for combining a recognition pass into a single scalar score.
///
/// Confidence is weighted far more heavily than bulk text: a rotated image
/// can still produce long but garbled output.
pub const CONFIDENCE_WEIGHT: f32 = 2.0;
pub const LENGTH_WEIGHT: f32 = 0.5;

/// Tunables for the coarse-to-fine angle search.
///
/// The defaults reproduce one observed variant of the heuristic; the fields
/// exist because deployments disagree on the exact values (drift threshold
/// 15 vs 20 degrees, fine half-width 7 vs 10, stabilization on or off).
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Score at or above which the cardinal stage wins outright and the
    /// tilt stages are skipped. Upright text is the common case.
    pub early_exit_threshold: f32,
    /// Minimum separation (degrees) between the coarse-tilt best and the
    /// cardinal best before the fine stage is considered worth running.
    pub drift_threshold: f32,
    /// Half-width (degrees) of the integer-degree fine-search window.
    pub fine_half_width: u32,
    /// When set, round the final angle to the nearest multiple of this many
    /// degrees, trading sub-degree precision for robustness against
    /// per-angle scoring noise.
    pub stabilize_step: Option<u32>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            early_exit_threshold: 2.5,
            drift_threshold: 20.0,
            fine_half_width: 10,
            stabilize_step: None,
        }
    }
}

/// Detector-wide configuration.
#[derive(Debug, Clone, Default)]
pub struct DetectorConfig {
    pub search: SearchOptions,
    /// Directory for rotated-candidate artifacts; the system temp dir when
    /// unset. Candidates are never deleted by this crate.
    pub work_dir: Option<PathBuf>,
}

/// Supplemental cleanup applied before detection (resize, grayscale,
/// global threshold).
#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    pub resize_factor: f32,
    /// Binary threshold in 0.0-1.0, applied after grayscale conversion.
    pub threshold: f32,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            resize_factor: 2.0,
            threshold: 0.5,
        }
    }
}
