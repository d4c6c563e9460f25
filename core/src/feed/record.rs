use crate::feed::position::NormalizedPosition;
use crate::prelude::{FeedError, RecordError};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Meaning of the fourth element of each short-trail point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailType {
    Altitude,
    Speed,
}

impl TrailType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "a" => Some(TrailType::Altitude),
            "s" => Some(TrailType::Speed),
            _ => None,
        }
    }
}

/// One aircraft as reported by the VRS aircraft list.
///
/// Every field is decoded leniently: a value of the wrong type reads as
/// absent instead of rejecting the whole record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AircraftRecord {
    #[serde(rename = "Icao", default, deserialize_with = "lenient")]
    pub icao: Option<String>,
    #[serde(rename = "Mil", default, deserialize_with = "lenient_flag")]
    pub military: bool,
    #[serde(rename = "Interested", default, deserialize_with = "lenient_flag")]
    pub interested: bool,
    #[serde(rename = "Op", default, deserialize_with = "lenient")]
    pub operator: Option<String>,
    #[serde(rename = "Mdl", default, deserialize_with = "lenient")]
    pub model: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "lenient")]
    pub type_code: Option<String>,
    /// Short trail, flattened `lat, lon, epoch-millis, altitude-or-speed` quadruples.
    #[serde(
        rename = "Cos",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub trail: Option<Vec<Value>>,
    #[serde(rename = "TT", default, deserialize_with = "lenient")]
    pub trail_type: Option<String>,
    #[serde(rename = "Lat", default, deserialize_with = "lenient")]
    pub lat: Option<f64>,
    #[serde(rename = "Long", default, deserialize_with = "lenient")]
    pub lon: Option<f64>,
    #[serde(rename = "Alt", default, deserialize_with = "lenient")]
    pub alt: Option<f64>,
    /// Epoch millis; some feeds send it as a float.
    #[serde(rename = "PosTime", default, deserialize_with = "lenient")]
    pub pos_time: Option<f64>,
    /// Filled in by the position normalizer for the current cycle only.
    #[serde(skip)]
    pub position: Option<NormalizedPosition>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(lenient::<D, bool>(deserializer)?.unwrap_or(false))
}

impl AircraftRecord {
    pub fn new(icao: &str) -> Self {
        Self {
            icao: Some(icao.to_string()),
            ..Default::default()
        }
    }

    pub fn identifier(&self) -> Result<&str, RecordError> {
        self.icao.as_deref().ok_or(RecordError::MissingIdentifier)
    }

    pub fn trail_kind(&self) -> Option<TrailType> {
        self.trail_type.as_deref().and_then(TrailType::from_code)
    }
}

/// The aircraft list returned by one feed query.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub aircraft: Vec<AircraftRecord>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(rename = "acList", default)]
    ac_list: Vec<Value>,
}

impl Snapshot {
    pub fn new(aircraft: Vec<AircraftRecord>) -> Self {
        Self { aircraft }
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    /// Decodes a VRS response body. Elements that do not decode are dropped
    /// individually; only an unreadable envelope fails.
    pub fn from_json(body: &str) -> Result<Self, FeedError> {
        let raw: RawSnapshot =
            serde_json::from_str(body).map_err(|e| FeedError::Decode(e.to_string()))?;

        let aircraft = raw
            .ac_list
            .into_iter()
            .filter_map(|value| match decode_record(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    debug!("skipping record: {}", err);
                    None
                }
            })
            .collect();

        Ok(Self { aircraft })
    }
}

fn decode_record(value: Value) -> Result<AircraftRecord, RecordError> {
    serde_json::from_value(value).map_err(|e| RecordError::Unparseable(e.to_string()))
}
