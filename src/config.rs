//! Construction options and their bound validation.

use std::time::Duration;

use crate::error::{CacheError, CacheResult};

/// Number of failed attempts after which an entry becomes evictable
/// regardless of `isCompletedSuccessfully`. Hard-coded to 3 in the source
/// this crate is modeled on; named here to avoid a magic number at call
/// sites.
pub const MAX_ATTEMPTS: u32 = 3;

const MIN_MAX_TTL_SECS: u64 = 60;
const MAX_MAX_TTL_SECS: u64 = 86_400;
const MIN_TIME_TICK_SECS: u64 = 1;
const MAX_TIME_TICK_SECS: u64 = 120;
const MIN_MAX_SIZE: usize = 3;
const MAX_MAX_SIZE: usize = 1000;

/// Validated, immutable construction options for a `WorkCache`.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub(crate) max_ttl: Duration,
    pub(crate) time_tick: Duration,
    pub(crate) max_size: usize,
    /// `0` or `1` means sync mode; `>= 2` enables the async executor.
    pub(crate) async_threads: usize,
}

impl CacheConfig {
    /// Starts a fluent builder with the documented defaults: `maxTtl =
    /// 3600s`, `timeTick = 5s`, `maxSize = 15`, sync mode.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    pub fn max_ttl(&self) -> Duration {
        self.max_ttl
    }

    pub fn time_tick(&self) -> Duration {
        self.time_tick
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn async_threads(&self) -> usize {
        self.async_threads
    }

    pub fn is_async(&self) -> bool {
        self.async_threads >= 2
    }
}

/// Fluent builder validating option bounds at `build()`.
#[derive(Debug, Clone)]
pub struct CacheConfigBuilder {
    max_ttl_secs: u64,
    time_tick_secs: u64,
    max_size: usize,
    async_threads: usize,
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self { max_ttl_secs: 3600, time_tick_secs: 5, max_size: 15, async_threads: 0 }
    }
}

impl CacheConfigBuilder {
    /// Valid range: 60..=86400 seconds.
    pub fn with_max_ttl(mut self, seconds: u64) -> Self {
        self.max_ttl_secs = seconds;
        self
    }

    /// Valid range: 1..=120 seconds.
    pub fn with_time_tick(mut self, seconds: u64) -> Self {
        self.time_tick_secs = seconds;
        self
    }

    /// Valid range: 3..=1000.
    pub fn with_max_size(mut self, n: usize) -> Self {
        self.max_size = n;
        self
    }

    /// `n >= 2` enables async processing with `n` worker slots; `n < 2`
    /// leaves the cache in sync mode.
    pub fn with_enable_async_processing(mut self, n: usize) -> Self {
        self.async_threads = n;
        self
    }

    pub fn build(self) -> CacheResult<CacheConfig> {
        if !(MIN_MAX_TTL_SECS..=MAX_MAX_TTL_SECS).contains(&self.max_ttl_secs) {
            return Err(CacheError::BadConfig(format!(
                "max_ttl must be between {MIN_MAX_TTL_SECS} and {MAX_MAX_TTL_SECS} seconds, got {}",
                self.max_ttl_secs
            )));
        }
        if !(MIN_TIME_TICK_SECS..=MAX_TIME_TICK_SECS).contains(&self.time_tick_secs) {
            return Err(CacheError::BadConfig(format!(
                "time_tick must be between {MIN_TIME_TICK_SECS} and {MAX_TIME_TICK_SECS} seconds, got {}",
                self.time_tick_secs
            )));
        }
        if !(MIN_MAX_SIZE..=MAX_MAX_SIZE).contains(&self.max_size) {
            return Err(CacheError::BadConfig(format!(
                "max_size must be between {MIN_MAX_SIZE} and {MAX_MAX_SIZE}, got {}",
                self.max_size
            )));
        }
        if self.async_threads >= 2 {
            if self.max_size < self.async_threads {
                return Err(CacheError::BadConfig(format!(
                    "max_size ({}) must be at least async_threads ({})",
                    self.max_size, self.async_threads
                )));
            }
            if self.max_size / self.async_threads < 2 {
                return Err(CacheError::BadConfig(format!(
                    "max_size / async_threads must be at least 2, got {} / {}",
                    self.max_size, self.async_threads
                )));
            }
        }

        Ok(CacheConfig {
            max_ttl: Duration::from_secs(self.max_ttl_secs),
            time_tick: Duration::from_secs(self.time_tick_secs),
            max_size: self.max_size,
            async_threads: self.async_threads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates `CacheConfig::builder` behavior for the defaults scenario.
    ///
    /// Assertions:
    /// - Confirms `config.max_ttl()` equals `Duration::from_secs(3600)`.
    /// - Confirms `config.time_tick()` equals `Duration::from_secs(5)`.
    /// - Confirms `config.max_size()` equals `15`.
    /// - Ensures `!config.is_async()` evaluates to true.
    #[test]
    fn test_defaults() {
        let config = CacheConfig::builder().build().unwrap();
        assert_eq!(config.max_ttl(), Duration::from_secs(3600));
        assert_eq!(config.time_tick(), Duration::from_secs(5));
        assert_eq!(config.max_size(), 15);
        assert!(!config.is_async());
    }

    /// Validates `CacheConfigBuilder::with_max_ttl` behavior for the
    /// rejects max ttl below minimum scenario.
    ///
    /// Assertions:
    /// - Ensures `CacheConfig::builder().with_max_ttl(59).build().is_err()`
    ///   evaluates to true.
    #[test]
    fn test_rejects_max_ttl_below_minimum() {
        assert!(CacheConfig::builder().with_max_ttl(59).build().is_err());
    }

    /// Validates `CacheConfigBuilder::with_max_ttl` behavior for the
    /// rejects max ttl above maximum scenario.
    ///
    /// Assertions:
    /// - Ensures `build().is_err()` evaluates to true.
    #[test]
    fn test_rejects_max_ttl_above_maximum() {
        assert!(CacheConfig::builder().with_max_ttl(86_401).build().is_err());
    }

    /// Validates `CacheConfigBuilder::with_max_size` behavior for the
    /// rejects max size out of range scenario.
    ///
    /// Assertions:
    /// - Ensures `build().is_err()` evaluates to true.
    /// - Ensures `build().is_err()` evaluates to true.
    #[test]
    fn test_rejects_max_size_out_of_range() {
        assert!(CacheConfig::builder().with_max_size(2).build().is_err());
        assert!(CacheConfig::builder().with_max_size(1001).build().is_err());
    }

    /// Validates `CacheConfigBuilder::with_time_tick` behavior for the
    /// rejects time tick out of range scenario.
    ///
    /// Assertions:
    /// - Ensures `build().is_err()` evaluates to true.
    /// - Ensures `build().is_err()` evaluates to true.
    #[test]
    fn test_rejects_time_tick_out_of_range() {
        assert!(CacheConfig::builder().with_time_tick(0).build().is_err());
        assert!(CacheConfig::builder().with_time_tick(121).build().is_err());
    }

    /// Validates `CacheConfigBuilder::with_enable_async_processing`
    /// behavior for the rejects async max size relation scenario.
    ///
    /// Assertions:
    /// - Ensures `build().is_err()` evaluates to true.
    #[test]
    fn test_rejects_async_max_size_relation() {
        let result = CacheConfig::builder()
            .with_max_size(10)
            .with_enable_async_processing(6)
            .build();
        assert!(result.is_err());
    }

    /// Validates `CacheConfigBuilder::with_enable_async_processing`
    /// behavior for the accepts valid async configuration scenario.
    ///
    /// Assertions:
    /// - Ensures `config.is_async()` evaluates to true.
    /// - Confirms `config.async_threads()` equals `4`.
    #[test]
    fn test_accepts_valid_async_configuration() {
        let config = CacheConfig::builder()
            .with_max_size(10)
            .with_enable_async_processing(4)
            .build()
            .unwrap();
        assert!(config.is_async());
        assert_eq!(config.async_threads(), 4);
    }

    /// Validates `CacheConfigBuilder::with_enable_async_processing`
    /// behavior for the single async thread stays sync scenario.
    ///
    /// Assertions:
    /// - Ensures `!config.is_async()` evaluates to true.
    #[test]
    fn test_single_async_thread_stays_sync() {
        let config =
            CacheConfig::builder().with_enable_async_processing(1).build().unwrap();
        assert!(!config.is_async());
    }
}
