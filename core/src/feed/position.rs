use crate::feed::record::{AircraftRecord, Snapshot, TrailType};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unified position regardless of whether the feed sent a short trail or flat fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPosition {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub speed: Option<f64>,
}

/// Computes the best available position for one record.
///
/// With a short trail, the stride-4 streams are walked in order and each
/// point overwrites the previous one, so the result is the newest point.
/// Unusable values leave their field empty instead of failing.
pub fn normalize(record: &AircraftRecord) -> NormalizedPosition {
    match record.trail.as_deref() {
        Some(trail) => from_trail(trail, record.trail_kind()),
        None => from_flat_fields(record),
    }
}

/// Attaches a normalized position to every record of the snapshot.
pub fn normalize_snapshot(snapshot: &mut Snapshot) {
    for record in snapshot.aircraft.iter_mut() {
        record.position = Some(normalize(record));
    }
}

fn from_trail(trail: &[Value], kind: Option<TrailType>) -> NormalizedPosition {
    let mut position = NormalizedPosition::default();

    for point in trail.chunks_exact(4) {
        position.latitude = point[0].as_f64();
        position.longitude = point[1].as_f64();
        position.timestamp = point[2].as_f64().and_then(|ms| from_epoch_millis(ms as i64));
        match kind {
            Some(TrailType::Altitude) => position.altitude = point[3].as_f64(),
            Some(TrailType::Speed) => position.speed = point[3].as_f64(),
            None => {}
        }
    }

    position
}

fn from_flat_fields(record: &AircraftRecord) -> NormalizedPosition {
    NormalizedPosition {
        latitude: record.lat,
        longitude: record.lon,
        altitude: record.alt,
        timestamp: record.pos_time.and_then(|ms| from_epoch_millis(ms as i64)),
        speed: None,
    }
}

fn from_epoch_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn trail_record(trail: Vec<Value>, code: Option<&str>) -> AircraftRecord {
        AircraftRecord {
            trail: Some(trail),
            trail_type: code.map(str::to_string),
            ..AircraftRecord::new("ABC123")
        }
    }

    #[test]
    fn trail_yields_last_point() {
        let record = trail_record(
            vec![
                json!(10.0),
                json!(20.0),
                json!(1_000),
                json!(5_000.0),
                json!(11.0),
                json!(21.0),
                json!(2_000),
                json!(6_000.0),
            ],
            Some("a"),
        );
        let position = normalize(&record);
        assert_eq!(position.latitude, Some(11.0));
        assert_eq!(position.longitude, Some(21.0));
        assert_eq!(position.altitude, Some(6_000.0));
        assert_eq!(position.speed, None);
        assert_eq!(position.timestamp.map(|t| t.timestamp_millis()), Some(2_000));
    }

    #[test]
    fn speed_trail_routes_fourth_stream_to_speed() {
        let record = trail_record(
            vec![
                json!(1.0),
                json!(2.0),
                json!(0),
                json!(310.0),
            ],
            Some("s"),
        );
        let position = normalize(&record);
        assert_eq!(position.speed, Some(310.0));
        assert_eq!(position.altitude, None);
    }

    #[test]
    fn unknown_trail_type_leaves_altitude_and_speed_empty() {
        let record = trail_record(
            vec![
                json!(1.0),
                json!(2.0),
                json!(0),
                json!(310.0),
            ],
            None,
        );
        let position = normalize(&record);
        assert_eq!(position.latitude, Some(1.0));
        assert_eq!(position.altitude, None);
        assert_eq!(position.speed, None);
    }

    #[test]
    fn partial_trailing_point_is_ignored() {
        let record = trail_record(
            vec![
                json!(1.0),
                json!(2.0),
                json!(0),
                json!(100.0),
                json!(9.0),
                json!(9.0),
            ],
            Some("a"),
        );
        let position = normalize(&record);
        assert_eq!(position.latitude, Some(1.0));
        assert_eq!(position.altitude, Some(100.0));
    }

    #[test]
    fn short_or_garbled_trail_stays_empty() {
        let empty = normalize(&trail_record(vec![json!(1.0)], Some("a")));
        assert_eq!(empty, NormalizedPosition::default());

        let garbled = normalize(&trail_record(
            vec![
                json!("x"),
                json!(2.0),
                json!(null),
                json!(100.0),
            ],
            Some("a"),
        ));
        assert_eq!(garbled.latitude, None);
        assert_eq!(garbled.longitude, Some(2.0));
        assert_eq!(garbled.timestamp, None);
    }

    #[test]
    fn flat_fields_are_used_without_trail() {
        let record = AircraftRecord {
            lat: Some(37.5),
            lon: Some(-122.1),
            alt: Some(3_500.0),
            pos_time: Some(1_500_000_000_000.0),
            ..AircraftRecord::new("ABC123")
        };
        let position = normalize(&record);
        assert_eq!(position.latitude, Some(37.5));
        assert_eq!(position.altitude, Some(3_500.0));
        assert_eq!(
            position.timestamp.map(|t| t.timestamp()),
            Some(1_500_000_000)
        );
    }

    #[test]
    fn snapshot_records_receive_positions() {
        let mut snapshot =
            Snapshot::new(vec![AircraftRecord::new("A"), AircraftRecord::new("B")]);
        normalize_snapshot(&mut snapshot);
        assert!(snapshot.aircraft.iter().all(|r| r.position.is_some()));
    }
}
