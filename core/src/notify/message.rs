use crate::feed::{AircraftRecord, NormalizedPosition};
use crate::tracking::QualifyingSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;

/// Thumbnail image paths by ICAO code.
pub type Thumbnails = BTreeMap<String, PathBuf>;

/// Rendered alert handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Renders one block per qualifying aircraft, in ICAO order.
pub fn render(subject: &str, qualifying: &QualifyingSet, thumbnails: &Thumbnails) -> Notification {
    let mut body = String::new();
    for (icao, record) in qualifying {
        render_aircraft(&mut body, icao, record, thumbnails.get(icao));
    }

    Notification {
        subject: subject.to_string(),
        body,
    }
}

fn render_aircraft(
    out: &mut String,
    icao: &str,
    record: &AircraftRecord,
    thumbnail: Option<&PathBuf>,
) {
    let mut heading = vec![icao];
    heading.extend(
        [&record.operator, &record.model, &record.type_code]
            .into_iter()
            .filter_map(|field| field.as_deref()),
    );
    let _ = writeln!(out, "{}", heading.join(", "));

    if let Some(position) = record.position.as_ref() {
        if let Some(line) = position_line(position) {
            let _ = writeln!(out, "  {}", line);
        }
    }
    if let Some(path) = thumbnail {
        let _ = writeln!(out, "  thumbnail {}", path.display());
    }
    out.push('\n');
}

fn position_line(position: &NormalizedPosition) -> Option<String> {
    let (lat, lon) = (position.latitude?, position.longitude?);
    let mut line = format!("position {:.5}, {:.5}", lat, lon);
    if let Some(altitude) = position.altitude {
        let _ = write!(line, " alt {:.0}", altitude);
    }
    if let Some(speed) = position.speed {
        let _ = write!(line, " spd {:.0}", speed);
    }
    if let Some(timestamp) = position.timestamp {
        let _ = write!(line, " at {}", timestamp.format("%Y-%m-%d %H:%M:%SZ"));
    }
    Some(line)
}
