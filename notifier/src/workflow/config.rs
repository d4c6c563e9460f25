use anyhow::{bail, Context};
use icaocore::prelude::{FilterConfig, RuleFlag};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotifierConfig {
    pub feed: FeedConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    /// Enabled rule flags, any of `Mil` and `Interested`.
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub watchlist: Option<PathBuf>,
    #[serde(default)]
    pub blacklist: Option<PathBuf>,
    pub sink: SinkConfig,
    #[serde(default)]
    pub thumbnails: Option<ThumbnailConfig>,
}

/// VRS aircraft list endpoint and geofence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_refresh")]
    pub refresh_secs: u64,
    /// Suppression window for already seen aircraft.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkConfig {
    Email(EmailConfig),
    Sms(SmsConfig),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmailConfig {
    pub server: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub from: String,
    pub to: String,
    /// Login name, defaults to the sender address.
    #[serde(default)]
    pub username: Option<String>,
    pub password: String,
    #[serde(default = "default_send_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_subject")]
    pub subject: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
    #[serde(default = "default_twilio_api")]
    pub api_base: String,
    #[serde(default = "default_send_timeout")]
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    pub cache_dir: PathBuf,
    /// Image URL with `{icao}` as placeholder.
    pub url_template: String,
    #[serde(default = "default_send_timeout")]
    pub timeout_secs: u64,
}

fn default_fetch_timeout() -> u64 {
    10
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    5
}
fn default_refresh() -> u64 {
    30
}
fn default_timeout() -> u64 {
    7200
}
fn default_smtp_port() -> u16 {
    465
}
fn default_send_timeout() -> u64 {
    5
}
fn default_subject() -> String {
    "Flight Notification".to_string()
}
fn default_twilio_api() -> String {
    "https://api.twilio.com".to_string()
}

impl NotifierConfig {
    /// Reads and validates a YAML config. Relative list and cache paths are
    /// resolved against the directory of the config file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading notifier config {}", path_ref.display()))?;
        let mut config: NotifierConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing notifier config {}", path_ref.display()))?;

        if let Some(base) = path_ref.parent() {
            config.resolve_paths(base);
        }
        config
            .validate()
            .with_context(|| format!("validating notifier config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timing.refresh_secs == 0 {
            bail!("timing.refresh_secs must be positive");
        }
        self.rule_flags()?;
        Ok(())
    }

    pub fn rule_flags(&self) -> anyhow::Result<Vec<RuleFlag>> {
        self.flags
            .iter()
            .map(|flag| flag.parse::<RuleFlag>().map_err(anyhow::Error::from))
            .collect()
    }

    pub fn to_filter_config(&self) -> anyhow::Result<FilterConfig> {
        Ok(FilterConfig::new(self.rule_flags()?, self.timing.timeout()))
    }

    /// Applies command line geofence overrides.
    pub fn override_geofence(
        &mut self,
        latitude: Option<f64>,
        longitude: Option<f64>,
        radius_km: Option<f64>,
    ) {
        if let Some(latitude) = latitude {
            self.feed.latitude = latitude;
        }
        if let Some(longitude) = longitude {
            self.feed.longitude = longitude;
        }
        if let Some(radius_km) = radius_km {
            self.feed.radius_km = radius_km;
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.watchlist, &mut self.blacklist].into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        if let Some(thumbnails) = self.thumbnails.as_mut() {
            if thumbnails.cache_dir.is_relative() {
                thumbnails.cache_dir = base.join(&thumbnails.cache_dir);
            }
        }
    }
}

impl TimingConfig {
    pub fn refresh(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const MINIMAL: &str = "\
feed:
  url: http://localhost/VirtualRadar/AircraftList.json
  latitude: 37.6
  longitude: -122.4
  radius_km: 50
flags: [Mil, Interested]
watchlist: watchlist.csv
sink:
  email:
    server: smtp.example.com
    from: alerts@example.com
    to: me@example.com
    password: secret
";

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("notifier.yaml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn config_load_applies_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = NotifierConfig::load(write_config(&dir, MINIMAL)).unwrap();

        assert_eq!(cfg.timing.refresh(), Duration::from_secs(30));
        assert_eq!(cfg.timing.timeout(), Duration::from_secs(7200));
        assert_eq!(cfg.feed.retries, 3);
        assert_eq!(cfg.rule_flags().unwrap(), vec![RuleFlag::Mil, RuleFlag::Interested]);
        assert_eq!(cfg.watchlist, Some(dir.path().join("watchlist.csv")));
        assert!(cfg.blacklist.is_none());
        match cfg.sink {
            SinkConfig::Email(email) => {
                assert_eq!(email.port, 465);
                assert_eq!(email.subject, "Flight Notification");
            }
            SinkConfig::Sms(_) => panic!("expected email sink"),
        }
    }

    #[test]
    fn config_load_reads_sms_sink() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"feed: {url: 'http://x', latitude: 1, longitude: 2, radius_km: 3}\n\
              timing: {refresh_secs: 240}\n\
              sink:\n  sms: {account_sid: AC1, auth_token: t, from: '+1555', to: '+1666'}\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = NotifierConfig::load(&path).unwrap();
        assert_eq!(cfg.timing.refresh_secs, 240);
        assert!(cfg.flags.is_empty());
        assert!(matches!(
            cfg.sink,
            SinkConfig::Sms(ref sms) if sms.api_base == "https://api.twilio.com"
        ));
    }

    #[test]
    fn config_rejects_unknown_flags_and_zero_period() {
        let dir = TempDir::new().unwrap();
        let bad_flag = MINIMAL.replace("[Mil, Interested]", "[Mil, Civil]");
        assert!(NotifierConfig::load(write_config(&dir, &bad_flag)).is_err());

        let zero = format!("{}timing:\n  refresh_secs: 0\n", MINIMAL);
        assert!(NotifierConfig::load(write_config(&dir, &zero)).is_err());
    }

    #[test]
    fn geofence_overrides_only_given_values() {
        let dir = TempDir::new().unwrap();
        let mut cfg = NotifierConfig::load(write_config(&dir, MINIMAL)).unwrap();
        cfg.override_geofence(Some(40.0), None, Some(10.0));
        assert_eq!(cfg.feed.latitude, 40.0);
        assert_eq!(cfg.feed.longitude, -122.4);
        assert_eq!(cfg.feed.radius_km, 10.0);
    }
}
