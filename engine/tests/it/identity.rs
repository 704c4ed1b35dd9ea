use darkship_core::{
    BoundingBox, MemoryFrameSource, Mmsi, Position, PublishedBatch, ScriptedDetector, VesselId,
};

use crate::helper::{LaneIdentityResolver, test};

fn mmsis(batch: &PublishedBatch) -> Vec<(VesselId, Mmsi)> {
    batch.rows.iter().map(|r| (r.id.clone(), r.mmsi)).collect()
}

#[tokio::test]
async fn test_fewer_detections_keep_existing_mmsis() {
    test(|helper| async move {
        let report = helper
            .run(
                MemoryFrameSource::new(2),
                ScriptedDetector::default().boxes([0], 5).boxes([1], 3),
            )
            .await;

        let tracking: Vec<_> = report.tracking_batches().collect();
        let first = mmsis(tracking[0]);
        let second = mmsis(tracking[1]);

        assert_eq!(second.len(), 3);
        assert_eq!(second, first[..3]);
    })
    .await;
}

#[tokio::test]
async fn test_reappearing_vessel_gets_its_original_mmsi() {
    test(|helper| async move {
        let report = helper
            .run(
                MemoryFrameSource::new(3),
                ScriptedDetector::default()
                    .boxes([0], 5)
                    .boxes([1], 3)
                    .boxes([2], 5),
            )
            .await;

        let tracking: Vec<_> = report.tracking_batches().collect();
        assert_eq!(mmsis(tracking[0]), mmsis(tracking[2]));
        assert_eq!(report.registry.len(), 5);
    })
    .await;
}

#[tokio::test]
async fn test_every_vessel_gets_a_distinct_nine_digit_mmsi() {
    test(|helper| async move {
        let report = helper
            .run(
                MemoryFrameSource::new(1),
                ScriptedDetector::default().boxes([0], 5),
            )
            .await;

        let batch = report.tracking_batches().next().unwrap();
        let mut seen: Vec<_> = batch.rows.iter().map(|r| r.mmsi).collect();

        for mmsi in &seen {
            assert_eq!(mmsi.to_string().len(), 9);
            assert!(Mmsi::new(mmsi.into_inner()).is_ok());
        }

        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 5);
    })
    .await;
}

#[tokio::test]
async fn test_registry_matches_published_rows() {
    test(|helper| async move {
        let report = helper
            .run(
                MemoryFrameSource::new(2),
                ScriptedDetector::default().boxes(0..2, 4),
            )
            .await;

        for batch in &report.batches {
            for row in &batch.rows {
                assert_eq!(report.registry.get(&row.id), Some(row.mmsi));
            }
        }
    })
    .await;
}

fn reordered_detector() -> ScriptedDetector {
    ScriptedDetector::default()
        .boxes([0, 2], 5)
        .detections(1, (0..5).rev().map(BoundingBox::test_default).collect())
}

#[tokio::test]
async fn test_custom_resolver_keeps_each_vessel_on_its_own_track() {
    test(|helper| async move {
        let report = helper
            .sequencer(MemoryFrameSource::new(3), reordered_detector())
            .with_identity_resolver(Box::new(LaneIdentityResolver))
            .run()
            .await
            .unwrap();

        let tracking: Vec<_> = report.tracking_batches().collect();
        assert_eq!(tracking[1].rows[0].id.as_str(), "Vessel_4");

        let plot = helper.trajectories.plot().await;
        for lane in 0..5 {
            let id = VesselId::new(format!("Vessel_{lane}"));
            let rows: Vec<_> = tracking.iter().map(|b| b.row(&id).unwrap()).collect();

            assert!(rows.iter().all(|r| r.mmsi == rows[0].mmsi));
            for pair in rows.windows(2) {
                let lat_step = pair[1].latitude.unwrap() - pair[0].latitude.unwrap();
                let lon_step = pair[1].longitude.unwrap() - pair[0].longitude.unwrap();
                assert!(lat_step > 0.0 && lat_step <= 0.0005 + 1e-9);
                assert!(lon_step > 0.0 && lon_step <= 0.0005 + 1e-9);
            }

            let published: Vec<_> = rows
                .iter()
                .map(|r| Position::new(r.latitude.unwrap(), r.longitude.unwrap()))
                .collect();
            assert_eq!(plot.path(&id).unwrap().points, published);
        }
    })
    .await;
}

#[tokio::test]
async fn test_detection_order_does_not_change_vessel_positions() {
    test(|helper| async move {
        let in_order = helper
            .run(
                MemoryFrameSource::new(3),
                ScriptedDetector::default().boxes(0..3, 5),
            )
            .await;
        let reordered = helper
            .sequencer(MemoryFrameSource::new(3), reordered_detector())
            .with_identity_resolver(Box::new(LaneIdentityResolver))
            .run()
            .await
            .unwrap();

        for (a, b) in in_order.tracking_batches().zip(reordered.tracking_batches()) {
            for row in &a.rows {
                let other = b.row(&row.id).unwrap();
                assert_eq!(row.mmsi, other.mmsi);
                assert_eq!(row.latitude, other.latitude);
                assert_eq!(row.longitude, other.longitude);
            }
        }
    })
    .await;
}
