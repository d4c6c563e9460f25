use log::debug;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Sighting state of one aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    pub first_seen: Instant,
    pub notified: bool,
}

/// Time-windowed record of recently seen aircraft.
///
/// Entries are created on first sighting and evicted once their age reaches
/// the timeout window, whether or not they were notified. `notified` only
/// ever goes from false to true; eviction is the only reset.
#[derive(Debug)]
pub struct AircraftRegistry {
    entries: HashMap<String, RegistryEntry>,
    timeout_window: Duration,
}

impl AircraftRegistry {
    pub fn new(timeout_window: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            timeout_window,
        }
    }

    /// Returns the entry for `icao`, creating it with `first_seen = now` if absent.
    pub fn touch(&mut self, icao: &str, now: Instant) -> RegistryEntry {
        *self
            .entries
            .entry(icao.to_string())
            .or_insert_with(|| RegistryEntry {
                first_seen: now,
                notified: false,
            })
    }

    pub fn is_suppressed(&self, icao: &str) -> bool {
        self.entries.get(icao).is_some_and(|entry| entry.notified)
    }

    /// Flags the given aircraft as notified. Unknown identifiers are ignored.
    pub fn mark_notified<'a, I>(&mut self, icaos: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for icao in icaos {
            if let Some(entry) = self.entries.get_mut(icao) {
                entry.notified = true;
            }
        }
    }

    /// Evicts every entry whose age is at least the timeout window and
    /// returns how many were dropped.
    pub fn expire(&mut self, now: Instant) -> usize {
        let window = self.timeout_window;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.first_seen) < window);

        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!("registry evicted {} aircraft", evicted);
        }
        evicted
    }

    pub fn get(&self, icao: &str) -> Option<&RegistryEntry> {
        self.entries.get(icao)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
