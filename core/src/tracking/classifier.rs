use crate::feed::{AircraftRecord, Snapshot};
use crate::prelude::{FilterConfig, RuleFlag};
use crate::tracking::lists::RowList;
use crate::tracking::registry::AircraftRegistry;
use log::debug;
use std::collections::BTreeMap;
use std::time::Instant;

/// Aircraft selected for notification in one cycle, keyed by ICAO code.
pub type QualifyingSet = BTreeMap<String, AircraftRecord>;

/// Applies the flag, watchlist and blacklist rules to a snapshot.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: FilterConfig,
    watchlist: RowList,
    blacklist: RowList,
}

impl Classifier {
    pub fn new(config: FilterConfig, watchlist: RowList, blacklist: RowList) -> Self {
        Self {
            config,
            watchlist,
            blacklist,
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Runs one classification pass and expires stale registry entries afterwards.
    pub fn classify(
        &self,
        snapshot: &Snapshot,
        registry: &mut AircraftRegistry,
        now: Instant,
    ) -> QualifyingSet {
        let mut qualifying = QualifyingSet::new();

        for record in &snapshot.aircraft {
            let Ok(icao) = record.identifier() else {
                debug!("ignoring record without identifier");
                continue;
            };

            registry.touch(icao, now);
            if registry.is_suppressed(icao) {
                continue;
            }

            if self.qualifies(icao, record) {
                qualifying.insert(icao.to_string(), record.clone());
            }
        }

        registry.expire(now);
        qualifying
    }

    /// `(not blacklisted AND military AND Mil enabled) OR (interesting AND
    /// Interested enabled) OR watchlisted`.
    pub fn qualifies(&self, icao: &str, record: &AircraftRecord) -> bool {
        let military = self.blacklist.any_row_lacks(Some(icao))
            && self.blacklist.any_row_lacks(record.type_code.as_deref())
            && record.military
            && self.config.is_enabled(RuleFlag::Mil);
        let interesting = record.interested && self.config.is_enabled(RuleFlag::Interested);

        military || interesting || self.watchlist.contains(icao)
    }
}
