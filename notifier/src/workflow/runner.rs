use crate::enrich::ThumbnailCache;
use crate::sink::{build_sink, subject_for};
use crate::source::{FeedSource, RetryPolicy, VrsSource};
use crate::workflow::config::NotifierConfig;
use crate::workflow::lists::load_optional;
use anyhow::Context;
use icaocore::feed::{normalize_snapshot, Snapshot};
use icaocore::notify::{NotificationCoordinator, NotificationSink, NotifyOutcome, Thumbnails};
use icaocore::prelude::{FilterConfig, SendError};
use icaocore::telemetry::{CycleLog, CycleMetrics, MetricsSnapshot};
use icaocore::timing::Cadence;
use icaocore::tracking::{AircraftRegistry, Classifier, RowList};
use log::{debug, info, warn};
use std::future::Future;
use std::time::Instant;

pub struct CycleReport {
    pub aircraft_seen: usize,
    pub qualifying: Vec<String>,
    pub outcome: Result<NotifyOutcome, SendError>,
    pub status: String,
}

/// Owns the registry and drives one fetch → classify → notify cycle at a time.
pub struct Runner {
    source: Box<dyn FeedSource>,
    retry: RetryPolicy,
    classifier: Classifier,
    registry: AircraftRegistry,
    coordinator: NotificationCoordinator,
    thumbnails: Option<ThumbnailCache>,
    metrics: CycleMetrics,
    log: CycleLog,
}

impl Runner {
    pub fn new(
        source: Box<dyn FeedSource>,
        retry: RetryPolicy,
        classifier: Classifier,
        coordinator: NotificationCoordinator,
        thumbnails: Option<ThumbnailCache>,
    ) -> Self {
        let registry = AircraftRegistry::new(classifier.config().timeout_window);
        Self {
            source,
            retry,
            classifier,
            registry,
            coordinator,
            thumbnails,
            metrics: CycleMetrics::new(),
            log: CycleLog::new(),
        }
    }

    pub fn from_config(config: &NotifierConfig, dry_run: bool) -> anyhow::Result<Self> {
        let source = VrsSource::new(&config.feed).context("creating feed client")?;
        let retry = RetryPolicy::new(config.feed.retries, config.feed.retry_delay());

        let watchlist = load_optional(config.watchlist.as_deref()).context("loading watchlist")?;
        let blacklist = load_optional(config.blacklist.as_deref()).context("loading blacklist")?;
        let classifier = classifier_for(config.to_filter_config()?, watchlist, blacklist);

        let sink: Box<dyn NotificationSink> =
            build_sink(&config.sink, dry_run).context("creating notification sink")?;
        let coordinator = NotificationCoordinator::new(sink, subject_for(&config.sink));

        let thumbnails = config
            .thumbnails
            .as_ref()
            .map(ThumbnailCache::new)
            .transpose()?;

        Ok(Self::new(Box::new(source), retry, classifier, coordinator, thumbnails))
    }

    pub async fn run_cycle(&mut self) -> CycleReport {
        self.run_cycle_at(Instant::now()).await
    }

    /// A failed fetch degrades to an empty snapshot for this cycle only.
    pub async fn run_cycle_at(&mut self, now: Instant) -> CycleReport {
        let mut snapshot = match self.retry.fetch(self.source.as_ref()).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("fetch failed, skipping cycle: {}", err);
                self.metrics.record_fetch_failure();
                Snapshot::default()
            }
        };
        normalize_snapshot(&mut snapshot);

        let qualifying = self.classifier.classify(&snapshot, &mut self.registry, now);
        let thumbnails = match (&self.thumbnails, qualifying.is_empty()) {
            (Some(cache), false) => cache.paths_for(qualifying.keys()).await,
            _ => Thumbnails::new(),
        };

        let outcome = self
            .coordinator
            .notify(&qualifying, &thumbnails, &mut self.registry)
            .await;

        self.metrics.record_cycle(snapshot.aircraft.len());
        match &outcome {
            Ok(NotifyOutcome::Sent(count)) => self.metrics.record_notification(*count),
            Ok(NotifyOutcome::NothingToNotify) => {}
            Err(_) => self.metrics.record_send_failure(),
        }
        debug!(
            "registry holds {} aircraft, metrics {:?}",
            self.registry.len(),
            self.metrics.snapshot()
        );

        let status = self.log.record(&outcome);
        CycleReport {
            aircraft_seen: snapshot.aircraft.len(),
            qualifying: qualifying.into_keys().collect(),
            outcome,
            status,
        }
    }

    /// Runs cycles on `cadence` until `shutdown` resolves, or once when `once`
    /// is set. Shutdown is observed both mid-cycle and while sleeping.
    pub async fn poll_until<F>(
        &mut self,
        cadence: Cadence,
        once: bool,
        shutdown: F,
    ) -> anyhow::Result<()>
    where
        F: Future<Output = std::io::Result<()>>,
    {
        tokio::pin!(shutdown);

        loop {
            let started = Instant::now();
            let report = tokio::select! {
                report = self.run_cycle() => report,
                result = &mut shutdown => {
                    result.context("awaiting shutdown signal")?;
                    break;
                }
            };
            println!("{}", report.status);
            debug!(
                "cycle saw {} aircraft, qualifying {:?}, outcome {:?}",
                report.aircraft_seen, report.qualifying, report.outcome
            );
            if once {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(cadence.delay_after(started)) => {}
                result = &mut shutdown => {
                    result.context("awaiting shutdown signal")?;
                    break;
                }
            }
        }

        info!("shutting down after {} cycles", self.metrics().cycles);
        Ok(())
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    #[cfg(test)]
    pub fn registry(&self) -> &AircraftRegistry {
        &self.registry
    }
}

fn classifier_for(filter: FilterConfig, watchlist: RowList, blacklist: RowList) -> Classifier {
    debug!(
        "classifier flags {:?}, {} watchlist rows, {} blacklist rows",
        filter.enabled_flags,
        watchlist.len(),
        blacklist.len()
    );
    Classifier::new(filter, watchlist, blacklist)
}
