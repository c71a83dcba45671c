//! End-to-end detection scenarios over a scripted recognition engine, plus
//! the standalone rotate-and-repair operation on real files.

use image::{Rgba, RgbaImage};
use std::cell::Cell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use textorient::{
    DetectorConfig, EngineProvider, OrientError, OrientationDetector, Recognition,
    RecognitionEngine, SearchOptions, SegmentationMode,
};

struct ScriptedEngine {
    responses: VecDeque<Recognition>,
    calls: Rc<Cell<usize>>,
}

impl RecognitionEngine for ScriptedEngine {
    fn recognize(
        &mut self,
        _image_path: &Path,
        _mode: SegmentationMode,
    ) -> Result<Recognition, OrientError> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .pop_front()
            .ok_or_else(|| OrientError::EngineFailure("script exhausted".to_string()))
    }
}

struct ScriptedProvider {
    script: Vec<Recognition>,
    calls: Rc<Cell<usize>>,
}

impl ScriptedProvider {
    fn new(script: &[(&str, f32)]) -> Self {
        Self {
            script: script
                .iter()
                .map(|(text, confidence)| Recognition {
                    text: text.to_string(),
                    mean_confidence: *confidence,
                })
                .collect(),
            calls: Rc::new(Cell::new(0)),
        }
    }
}

impl EngineProvider for ScriptedProvider {
    type Engine = ScriptedEngine;

    fn acquire(&self) -> Result<Self::Engine, OrientError> {
        Ok(ScriptedEngine {
            responses: self.script.clone().into(),
            calls: Rc::clone(&self.calls),
        })
    }
}

/// Light page with a dark text-like stripe, saved under `dir`.
fn synthetic_page(dir: &Path) -> PathBuf {
    let mut img = RgbaImage::from_pixel(60, 40, Rgba([230, 230, 230, 255]));
    for x in 10..50 {
        for y in 18..22 {
            img.put_pixel(x, y, Rgba([20, 20, 20, 255]));
        }
    }
    let path = dir.join("page.png");
    img.save(&path).unwrap();
    path
}

fn config_with(search: SearchOptions, work_dir: &Path) -> DetectorConfig {
    DetectorConfig {
        search,
        work_dir: Some(work_dir.to_path_buf()),
    }
}

#[test]
fn upright_page_resolves_in_the_cardinal_stage() {
    let dir = tempfile::tempdir().unwrap();
    let page = synthetic_page(dir.path());

    let provider = ScriptedProvider::new(&[
        ("The quick brown fox", 0.92),
        ("", 0.1),
        ("", 0.1),
        ("", 0.1),
    ]);
    let calls = Rc::clone(&provider.calls);
    let detector =
        OrientationDetector::new(provider, config_with(SearchOptions::default(), dir.path()));

    let report = detector.detect_report(&page).unwrap();

    assert_eq!(report.angle, 0.0);
    assert!(report.early_exit);
    assert_eq!(report.candidates_scored, 4);
    assert_eq!(calls.get(), 4);
    assert!((0.0..360.0).contains(&report.angle));
}

#[test]
fn tilted_page_is_refined_and_stabilized() {
    let dir = tempfile::tempdir().unwrap();
    let page = synthetic_page(dir.path());

    // Cardinal and coarse stages stay weak; the coarse best at 45 pulls the
    // fine window to 35..=55, where 47 peaks. Stabilization at 15 degrees
    // rounds the result to 45.
    let mut script = vec![("", 0.1); 31];
    script[5] = ("qk", 0.4); // coarse candidate 45
    script[10 + 12] = ("quick", 0.85); // fine candidate 47
    let provider = ScriptedProvider::new(&script);
    let calls = Rc::clone(&provider.calls);

    let detector = OrientationDetector::new(
        provider,
        config_with(
            SearchOptions {
                stabilize_step: Some(15),
                ..SearchOptions::default()
            },
            dir.path(),
        ),
    );

    let report = detector.detect_report(&page).unwrap();

    assert_eq!(report.angle, 45.0);
    assert!(!report.early_exit);
    assert_eq!(report.candidates_scored, 31);
    assert_eq!(calls.get(), 31);
    assert_eq!(report.best_text, "quick");
}

#[test]
fn unstabilized_tilt_detection_returns_the_exact_peak() {
    let dir = tempfile::tempdir().unwrap();
    let page = synthetic_page(dir.path());

    let mut script = vec![("", 0.1); 31];
    script[5] = ("qk", 0.4);
    script[10 + 12] = ("quick", 0.85);
    let provider = ScriptedProvider::new(&script);
    let detector =
        OrientationDetector::new(provider, config_with(SearchOptions::default(), dir.path()));

    let angle = detector.detect_best_orientation(&page).unwrap();

    assert_eq!(angle, 47.0);
    assert!((0.0..360.0).contains(&angle));
}

#[test]
fn missing_source_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedProvider::new(&[]);
    let calls = Rc::clone(&provider.calls);
    let detector =
        OrientationDetector::new(provider, config_with(SearchOptions::default(), dir.path()));

    let err = detector
        .detect_best_orientation(&dir.path().join("missing.png"))
        .unwrap_err();

    assert!(matches!(err, OrientError::NotFound(_)));
    assert_eq!(calls.get(), 0);
}

#[test]
fn rotate_image_by_quarter_turn_swaps_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let page = synthetic_page(dir.path());

    let rotated_path = textorient::rotate_image(&page, 90.0, dir.path()).unwrap();
    let rotated = image::open(&rotated_path).unwrap().to_rgba8();

    assert_eq!(rotated.dimensions(), (40, 60));
}

#[test]
fn rotate_image_by_zero_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let page = synthetic_page(dir.path());

    let rotated_path = textorient::rotate_image(&page, 0.0, dir.path()).unwrap();

    let original = image::open(&page).unwrap().to_rgba8();
    let rotated = image::open(&rotated_path).unwrap().to_rgba8();
    assert_eq!(rotated, original);
}

#[test]
fn rotate_image_repairs_the_exposed_corners() {
    let dir = tempfile::tempdir().unwrap();
    let page = synthetic_page(dir.path());

    let rotated_path = textorient::rotate_image(&page, 45.0, dir.path()).unwrap();
    let rotated = image::open(&rotated_path).unwrap().to_rgba8();

    // Canvas grew, and the corners were filled with the dominant page gray
    // at full opacity instead of staying transparent.
    assert!(rotated.width() > 60);
    assert!(rotated.height() > 40);
    assert_eq!(rotated.get_pixel(0, 0).0, [230, 230, 230, 255]);
    let (w, h) = rotated.dimensions();
    assert_eq!(rotated.get_pixel(w - 1, h - 1).0, [230, 230, 230, 255]);

    // No fully-transparent pixel survives inpainting.
    assert!(rotated.pixels().all(|p| p.0[3] != 0));
}
