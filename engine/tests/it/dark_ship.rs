use darkship_core::{
    AisStatus, BatchKind, MemoryFrameSource, Notification, ScriptedDetector, VesselId, VesselSlot,
};
use engine::DarkShipOutcome;

use crate::helper::{inactive_rows, test};

#[tokio::test]
async fn test_designated_vessel_goes_dark_on_the_final_frame() {
    test(|mut helper| async move {
        helper.dark_ship_at(2);

        let report = helper
            .run(
                MemoryFrameSource::new(3),
                ScriptedDetector::default().boxes(0..3, 5),
            )
            .await;

        let scan = report.dark_ship_batch().unwrap();
        assert_eq!(scan.frame_index, 2);
        assert_eq!(inactive_rows(scan), 1);

        for row in &scan.rows {
            if row.id.as_str() == "Vessel_2" {
                assert_eq!(row.status, AisStatus::Inactive);
                assert!(!row.has_telemetry());
                assert_eq!(row.speed, None);
                assert_eq!(row.timestamp, None);
            } else {
                assert_eq!(row.status, AisStatus::Active);
                assert!(row.has_telemetry());
            }
        }

        let DarkShipOutcome::Detected(event) = &report.dark_ship else {
            panic!("expected a dark ship, got {:?}", report.dark_ship);
        };
        assert_eq!(event.slot, VesselSlot::new(2));
        assert_eq!(event.frame_index, 2);
    })
    .await;
}

#[tokio::test]
async fn test_exactly_one_vessel_goes_dark_for_any_seed() {
    for seed in 0..20 {
        test(|mut helper| async move {
            helper.seed = seed;

            let report = helper
                .run(
                    MemoryFrameSource::new(2),
                    ScriptedDetector::default().boxes(0..2, 5),
                )
                .await;

            let scan = report.dark_ship_batch().unwrap();
            assert_eq!(inactive_rows(scan), 1);
            assert!(report.tracking_batches().all(|b| inactive_rows(b) == 0));
            assert_eq!(
                report
                    .batches
                    .iter()
                    .filter(|b| b.kind == BatchKind::DarkShipScan)
                    .count(),
                1
            );
        })
        .await;
    }
}

#[tokio::test]
async fn test_final_frame_is_shown_before_and_after_the_scan() {
    test(|mut helper| async move {
        helper.dark_ship_at(1);

        let report = helper
            .run(
                MemoryFrameSource::new(2),
                ScriptedDetector::default().boxes(0..2, 4),
            )
            .await;

        let before = report.tracking_batches().last().unwrap();
        let after = report.dark_ship_batch().unwrap();
        assert_eq!(before.frame_index, after.frame_index);
        assert_eq!(before.rows.len(), after.rows.len());

        let dark = VesselId::new("Vessel_1");
        for (b, a) in before.rows.iter().zip(&after.rows) {
            assert_eq!(b.id, a.id);
            assert_eq!(b.mmsi, a.mmsi);
            if a.id == dark {
                assert!(b.has_telemetry());
                assert!(!a.has_telemetry());
            } else {
                assert_eq!(b, a);
            }
        }

        let dark_annotation = after
            .annotations
            .iter()
            .find(|a| a.label.starts_with("Vessel_1 "))
            .unwrap();
        assert_eq!(dark_annotation.status, AisStatus::Inactive);
    })
    .await;
}

#[tokio::test]
async fn test_dark_ship_notification_follows_the_final_scan() {
    test(|mut helper| async move {
        helper.dark_ship_at(0);

        let report = helper
            .run(
                MemoryFrameSource::new(2),
                ScriptedDetector::default().boxes(0..2, 3),
            )
            .await;

        let mmsi = report.registry.get(&VesselId::new("Vessel_0")).unwrap();
        let notifications = helper.display.notifications().await;

        assert_eq!(
            notifications[notifications.len() - 2..],
            [
                Notification::ScanInProgress { frame_index: 1 },
                Notification::DarkShipDetected {
                    frame_index: 1,
                    id: VesselId::new("Vessel_0"),
                    mmsi,
                },
            ]
        );
    })
    .await;
}

#[tokio::test]
async fn test_empty_final_frame_reports_no_anomaly() {
    test(|helper| async move {
        let report = helper
            .run(
                MemoryFrameSource::new(3),
                ScriptedDetector::default().boxes(0..2, 5),
            )
            .await;

        assert_eq!(report.dark_ship, DarkShipOutcome::NoAnomaly);
        assert!(report.dark_ship_batch().is_none());
        assert!(report.batches.iter().all(|b| inactive_rows(b) == 0));

        let notifications = helper.display.notifications().await;
        assert_eq!(
            notifications.last(),
            Some(&Notification::NoAnomaly { frame_index: 2 })
        );
    })
    .await;
}

#[tokio::test]
async fn test_unreadable_final_frame_reports_no_anomaly() {
    test(|helper| async move {
        let report = helper
            .run(
                MemoryFrameSource::new(2).unreadable(1),
                ScriptedDetector::default().boxes(0..2, 5),
            )
            .await;

        assert_eq!(report.dark_ship, DarkShipOutcome::NoAnomaly);
        assert!(report.dark_ship_batch().is_none());
        assert_eq!(
            helper.display.notifications().await.last(),
            Some(&Notification::NoAnomaly { frame_index: 1 })
        );
    })
    .await;
}

#[tokio::test]
async fn test_designated_vessel_missing_from_final_frame_reports_no_anomaly() {
    test(|mut helper| async move {
        helper.dark_ship_at(4);

        let report = helper
            .run(
                MemoryFrameSource::new(2),
                ScriptedDetector::default().boxes([0], 5).boxes([1], 3),
            )
            .await;

        assert_eq!(report.dark_ship, DarkShipOutcome::NoAnomaly);
        assert!(report.dark_ship_batch().is_none());
    })
    .await;
}

#[tokio::test]
async fn test_dark_ship_is_marked_on_the_trajectory_plot() {
    test(|mut helper| async move {
        helper.dark_ship_at(3);

        helper
            .run(
                MemoryFrameSource::new(3),
                ScriptedDetector::default().boxes(0..3, 5),
            )
            .await;

        let plot = helper.trajectories.plot().await;
        assert_eq!(plot.paths.len(), 5);
        assert!(plot.paths.iter().all(|p| p.points.len() == 3));

        let marker = plot.signal_lost.as_ref().unwrap();
        let path = plot.path(&VesselId::new("Vessel_3")).unwrap();
        assert_eq!(marker.id, VesselId::new("Vessel_3"));
        assert_eq!(Some(&marker.position), path.points.last());
    })
    .await;
}
