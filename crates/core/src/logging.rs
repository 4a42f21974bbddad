//! Centralized logging configuration for the rasterizer.
//!
//! Per-category levels are held in a global [`LogConfig`] so that a frame
//! driver can turn on, say, buffer diagnostics without drowning in raster
//! messages. Accepted messages are forwarded to the [`log`] facade with the
//! category name as the target, so whichever backend the binary installs
//! (`env_logger` in the CLI) decides where they end up.
//!
//! # Architecture
//!
//! - **LogConfig**: Thread-safe global configuration using atomic operations
//! - **LogLevel**: Hierarchical log levels (Off < Error < Warn < Info < Debug < Trace)
//! - **LogCategory**: Raster, Buffer, Ffi, Frame
//! - **log()**: Lazily formatted, rate-limited entry point
//!
//! Nothing in this module is ever called from inside the per-pixel loop.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::logging::{log, LogCategory, LogLevel};
//!
//! log(LogCategory::Raster, LogLevel::Debug, || {
//!     format!("discarded triangle with area {}", 0)
//! });
//! ```

use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

const CATEGORY_COUNT: usize = 4;
const DEFAULT_RATE_LIMIT: usize = 60;

/// Log level for controlling verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    fn from_u8(val: u8) -> Self {
        match val {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Off,
        }
    }

    /// Matching level of the `log` facade, `None` for `Off`
    pub fn to_log_level(self) -> Option<log::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(log::Level::Error),
            LogLevel::Warn => Some(log::Level::Warn),
            LogLevel::Info => Some(log::Level::Info),
            LogLevel::Debug => Some(log::Level::Debug),
            LogLevel::Trace => Some(log::Level::Trace),
        }
    }

    /// Matching filter of the `log` facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        self.to_log_level()
            .map_or(log::LevelFilter::Off, |level| level.to_level_filter())
    }
}

/// Returned when a level name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLogLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    /// Case-insensitive; numeric levels 0-5 are accepted as well
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "0" => Ok(LogLevel::Off),
            "error" | "err" | "1" => Ok(LogLevel::Error),
            "warn" | "warning" | "2" => Ok(LogLevel::Warn),
            "info" | "3" => Ok(LogLevel::Info),
            "debug" | "4" => Ok(LogLevel::Debug),
            "trace" | "5" => Ok(LogLevel::Trace),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

/// Log category for the rasterizer's components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Triangle setup, validation and discards
    Raster,
    /// Strided view creation and validation
    Buffer,
    /// Raw C-ABI entry points
    Ffi,
    /// Frame driver (begin/end of frame, resize, statistics)
    Frame,
}

impl LogCategory {
    pub const ALL: [LogCategory; CATEGORY_COUNT] = [
        LogCategory::Raster,
        LogCategory::Buffer,
        LogCategory::Ffi,
        LogCategory::Frame,
    ];

    fn index(self) -> usize {
        match self {
            LogCategory::Raster => 0,
            LogCategory::Buffer => 1,
            LogCategory::Ffi => 2,
            LogCategory::Frame => 3,
        }
    }

    /// Target string handed to the `log` facade
    pub fn target(self) -> &'static str {
        match self {
            LogCategory::Raster => "raster_core::raster",
            LogCategory::Buffer => "raster_core::buffer",
            LogCategory::Ffi => "raster_core::ffi",
            LogCategory::Frame => "raster_core::frame",
        }
    }
}

#[derive(Default)]
struct CategoryWindow {
    timestamps: VecDeque<Instant>,
    dropped: usize,
    last_drop_report: Option<Instant>,
}

/// Sliding-window rate limiter, one window per category
struct RateLimiter {
    max_per_second: AtomicUsize,
    window: Duration,
    state: Mutex<[CategoryWindow; CATEGORY_COUNT]>,
}

impl RateLimiter {
    fn new(max_per_second: usize) -> Self {
        Self {
            max_per_second: AtomicUsize::new(max_per_second),
            window: Duration::from_secs(1),
            state: Mutex::new(Default::default()),
        }
    }

    /// Returns (allowed, dropped) where `dropped` is the number of messages
    /// swallowed since the last report, when a report is due
    fn should_allow(&self, category: LogCategory) -> (bool, Option<usize>) {
        let now = Instant::now();
        let max = self.max_per_second.load(Ordering::Relaxed);
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let slot = &mut state[category.index()];

        while let Some(&front) = slot.timestamps.front() {
            if now.duration_since(front) > self.window {
                slot.timestamps.pop_front();
            } else {
                break;
            }
        }

        if slot.timestamps.len() < max {
            slot.timestamps.push_back(now);
            if slot.dropped > 0 {
                let dropped = std::mem::take(&mut slot.dropped);
                slot.last_drop_report = Some(now);
                return (true, Some(dropped));
            }
            return (true, None);
        }

        slot.dropped += 1;
        let report_due = slot
            .last_drop_report
            .map_or(true, |last| now.duration_since(last) >= self.window);
        if report_due {
            let dropped = std::mem::take(&mut slot.dropped);
            slot.last_drop_report = Some(now);
            (false, Some(dropped))
        } else {
            (false, None)
        }
    }
}

/// Global logging configuration
pub struct LogConfig {
    global_level: AtomicU8,
    category_levels: [AtomicU8; CATEGORY_COUNT],
    rate_limiter: RateLimiter,
}

impl LogConfig {
    /// All categories off, 60 messages per second per category
    fn new() -> Self {
        Self {
            global_level: AtomicU8::new(LogLevel::Off as u8),
            category_levels: Default::default(),
            rate_limiter: RateLimiter::new(DEFAULT_RATE_LIMIT),
        }
    }

    /// Get the global singleton instance
    pub fn global() -> &'static Self {
        static INSTANCE: OnceLock<LogConfig> = OnceLock::new();
        INSTANCE.get_or_init(LogConfig::new)
    }

    pub fn set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Relaxed))
    }

    /// Override the level of one category (`Off` falls back to the global level)
    pub fn set_level(&self, category: LogCategory, level: LogLevel) {
        self.category_levels[category.index()].store(level as u8, Ordering::Relaxed);
    }

    pub fn level(&self, category: LogCategory) -> LogLevel {
        LogLevel::from_u8(self.category_levels[category.index()].load(Ordering::Relaxed))
    }

    /// A category-specific level wins; `Off` defers to the global level
    pub fn should_log(&self, category: LogCategory, level: LogLevel) -> bool {
        if level == LogLevel::Off {
            return false;
        }
        match self.level(category) {
            LogLevel::Off => level <= self.global_level(),
            category_level => level <= category_level,
        }
    }

    /// Reset all logging to Off
    pub fn reset(&self) {
        self.set_global_level(LogLevel::Off);
        for category in LogCategory::ALL {
            self.set_level(category, LogLevel::Off);
        }
    }

    /// Maximum messages per second per category
    pub fn set_rate_limit(&self, max_per_second: usize) {
        self.rate_limiter
            .max_per_second
            .store(max_per_second, Ordering::Relaxed);
    }

    pub fn rate_limit(&self) -> usize {
        self.rate_limiter.max_per_second.load(Ordering::Relaxed)
    }
}

/// Log a lazily formatted message for `category` at `level`
///
/// The closure only runs when the category is enabled at that level and the
/// category's rate limit has room. Dropped messages are summarised with a
/// warning once per second.
pub fn log<F>(category: LogCategory, level: LogLevel, message_fn: F)
where
    F: FnOnce() -> String,
{
    let config = LogConfig::global();
    if !config.should_log(category, level) {
        return;
    }
    let Some(facade_level) = level.to_log_level() else {
        return;
    };

    let (allowed, dropped) = config.rate_limiter.should_allow(category);
    if let Some(count) = dropped.filter(|&n| n > 0) {
        log::warn!(
            target: category.target(),
            "rate limit exceeded, {count} message(s) dropped in the last second"
        );
    }
    if allowed {
        log::log!(target: category.target(), facade_level, "{}", message_fn());
    }
}
