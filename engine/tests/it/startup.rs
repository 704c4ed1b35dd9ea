use std::path::Path;

use darkship_core::Error as CoreError;
use engine::{App, Error, Settings, SkipReason};
use serde_json::Value;

fn settings(annotations: &Path, trajectory_output: Option<&Path>) -> Settings {
    let mut yaml = format!(
        r#"
log_level: debug
environment: test
detector:
  annotations: '{}'
simulation:
  scan_delay: 0s
  seed: 7
  dark_ship_slot: 1
"#,
        annotations.display()
    );
    if let Some(path) = trajectory_output {
        yaml.push_str(&format!("trajectory_output: '{}'\n", path.display()));
    }

    Settings::from_yaml(&yaml).unwrap()
}

const ANNOTATIONS: &str = r#"{
    "a.jpg": [
        { "x1": 0.0, "y1": 0.0, "x2": 50.0, "y2": 40.0 },
        { "x1": 60.0, "y1": 0.0, "x2": 110.0, "y2": 40.0 }
    ],
    "b.jpg": [
        { "x1": 2.0, "y1": 1.0, "x2": 52.0, "y2": 41.0 },
        { "x1": 63.0, "y1": 2.0, "x2": 113.0, "y2": 42.0 }
    ]
}"#;

#[tokio::test]
async fn test_missing_detector_model_aborts_before_any_frame() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir.path().join("missing.json"), None);

    let err = App::build(&settings, vec![dir.path().join("a.jpg")])
        .await
        .err()
        .unwrap();

    assert!(matches!(
        err,
        Error::Core {
            source: CoreError::ModelUnavailable { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_malformed_detector_model_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let annotations = dir.path().join("annotations.json");
    std::fs::write(&annotations, "not json").unwrap();

    let err = App::build(&settings(&annotations, None), vec![])
        .await
        .err()
        .unwrap();

    assert!(matches!(
        err,
        Error::Core {
            source: CoreError::ModelUnavailable { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_run_over_image_files_writes_the_trajectory_plot() {
    let dir = tempfile::tempdir().unwrap();
    let annotations = dir.path().join("annotations.json");
    let output = dir.path().join("trajectories.json");
    std::fs::write(&annotations, ANNOTATIONS).unwrap();
    std::fs::write(dir.path().join("a.jpg"), [0xff, 0xd8, 0xff]).unwrap();
    std::fs::write(dir.path().join("b.jpg"), [0xff, 0xd8, 0xff]).unwrap();

    let frames = vec![
        dir.path().join("a.jpg"),
        dir.path().join("missing.jpg"),
        dir.path().join("b.jpg"),
    ];

    let app = App::build(&settings(&annotations, Some(&output)), frames)
        .await
        .unwrap();
    let report = app.run().await.unwrap();

    assert_eq!(report.frames_processed, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].frame_index, 1);
    assert!(matches!(
        report.skipped[0].reason,
        SkipReason::Unreadable(_)
    ));

    let scan = report.dark_ship_batch().unwrap();
    assert_eq!(scan.frame_index, 2);
    assert!(!scan.rows[1].has_telemetry());

    let plot: Value = serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!(plot["paths"].as_array().unwrap().len(), 2);
    assert_eq!(plot["signal_lost"]["id"], "Vessel_1");
}

#[tokio::test]
async fn test_empty_image_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let annotations = dir.path().join("annotations.json");
    std::fs::write(&annotations, ANNOTATIONS).unwrap();
    std::fs::write(dir.path().join("a.jpg"), b"").unwrap();
    std::fs::write(dir.path().join("b.jpg"), [0xff, 0xd8, 0xff]).unwrap();

    let frames = vec![dir.path().join("a.jpg"), dir.path().join("b.jpg")];

    let report = App::build(&settings(&annotations, None), frames)
        .await
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.frames_processed, 1);
    assert!(matches!(
        &report.skipped[0].reason,
        SkipReason::Unreadable(reason) if reason.contains("a.jpg")
    ));
}
