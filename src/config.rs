use std::path::PathBuf;
use std::time::Duration;

use crate::fixtures::FixtureSource;

pub const FIXTURES_ENV: &str = "UNI_CATALOG_FIXTURES";

pub const DEFAULT_READ_LATENCY_MS: u64 = 300;

pub const DEFAULT_WRITE_LATENCY_MS: u64 = 500;

/// Share of new reviews marked verified by the default policy.
pub const DEFAULT_VERIFICATION_PROBABILITY: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub fixtures: FixtureSource,
    pub read_latency: Duration,
    pub write_latency: Duration,
    pub verification_probability: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixtures: FixtureSource::Embedded,
            read_latency: Duration::from_millis(DEFAULT_READ_LATENCY_MS),
            write_latency: Duration::from_millis(DEFAULT_WRITE_LATENCY_MS),
            verification_probability: DEFAULT_VERIFICATION_PROBABILITY,
        }
    }
}

impl Config {
    pub fn from_env(
        fixtures: Option<PathBuf>,
        read_latency_ms: u64,
        write_latency_ms: u64,
    ) -> Self {
        Self::resolve(
            fixtures,
            std::env::var(FIXTURES_ENV).ok(),
            read_latency_ms,
            write_latency_ms,
        )
    }

    /// The command-line directory wins over the environment.
    pub fn resolve(
        fixtures: Option<PathBuf>,
        env_fixtures: Option<String>,
        read_latency_ms: u64,
        write_latency_ms: u64,
    ) -> Self {
        let fixtures = fixtures
            .or_else(|| env_fixtures.filter(|value| !value.is_empty()).map(PathBuf::from))
            .map_or(FixtureSource::Embedded, FixtureSource::Directory);

        Self {
            fixtures,
            read_latency: Duration::from_millis(read_latency_ms),
            write_latency: Duration::from_millis(write_latency_ms),
            ..Self::default()
        }
    }
}
