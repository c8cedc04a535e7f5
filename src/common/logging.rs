//! Logging infrastructure for the page compression layer

use log::Level;
use std::fmt::Write as _;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the logging system
///
/// Embedding applications that already install a `log` backend should skip this.
pub fn init() {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();

        builder
            .format(|buf, record| {
                use std::io::Write;

                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
                let level_str = match record.level() {
                    Level::Error => "\x1b[31mERROR\x1b[0m",
                    Level::Warn => "\x1b[33mWARN\x1b[0m",
                    Level::Info => "\x1b[32mINFO\x1b[0m",
                    Level::Debug => "\x1b[36mDEBUG\x1b[0m",
                    Level::Trace => "\x1b[37mTRACE\x1b[0m",
                };

                writeln!(
                    buf,
                    "{} [{}] {}: {}",
                    timestamp,
                    level_str,
                    record.target(),
                    record.args()
                )
            })
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!(target: "pagecomp", "page compression logging initialized");
    });
}

/// Initialize logging with a specific level
pub fn init_with_level(level: log::LevelFilter) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder
            .format(|buf, record| {
                use std::io::Write;

                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
                writeln!(
                    buf,
                    "{} [{}] {}: {}",
                    timestamp,
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .filter_level(level)
            .init();

        log::info!(
            target: "pagecomp",
            "page compression logging initialized with level: {level:?}"
        );
    });
}

/// Log an error message under the `pagecomp` target
#[macro_export]
macro_rules! pagecomp_error {
    ($($arg:tt)*) => {
        log::error!(target: "pagecomp", $($arg)*)
    };
}

/// Log a warning message under the `pagecomp` target
#[macro_export]
macro_rules! pagecomp_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "pagecomp", $($arg)*)
    };
}

/// Log an info message under the `pagecomp` target
#[macro_export]
macro_rules! pagecomp_info {
    ($($arg:tt)*) => {
        log::info!(target: "pagecomp", $($arg)*)
    };
}

/// Log a debug message under the `pagecomp` target
#[macro_export]
macro_rules! pagecomp_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "pagecomp", $($arg)*)
    };
}

/// Log a trace message under the `pagecomp` target
#[macro_export]
macro_rules! pagecomp_trace {
    ($($arg:tt)*) => {
        log::trace!(target: "pagecomp", $($arg)*)
    };
}

/// Render the first `limit` bytes of a page as hex rows of 32 bytes
///
/// Used when a compressed page fails to decode so the log carries the frame
/// header that was read.
pub fn page_prefix_dump(page: &[u8], limit: usize) -> String {
    let shown = &page[..limit.min(page.len())];
    let mut out = String::with_capacity(shown.len() * 3);
    for (row, chunk) in shown.chunks(32).enumerate() {
        let _ = write!(out, "{:04x}:", row * 32);
        for byte in chunk {
            let _ = write!(out, " {byte:02x}");
        }
        out.push('\n');
    }
    out
}

/// Codec calls slower than this are reported when their timer drops
const SLOW_CODEC_CALL: std::time::Duration = std::time::Duration::from_millis(50);

/// Measures one codec call and reports it when it was unusually slow
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
    space_id: Option<u32>,
}

impl Timer {
    /// Start timing `operation` on a page of `space_id`
    pub fn start(operation: &'static str, space_id: Option<u32>) -> Self {
        pagecomp_trace!("{} started for space {:?}", operation, space_id);
        Self {
            start: std::time::Instant::now(),
            operation,
            space_id,
        }
    }

    /// Time spent so far
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the elapsed time
    pub fn stop(self) -> std::time::Duration {
        let elapsed = self.start.elapsed();
        pagecomp_trace!("{} finished in {:?}", self.operation, elapsed);
        elapsed
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if elapsed > SLOW_CODEC_CALL {
            pagecomp_debug!(
                "slow {} for space {:?} took {:?}",
                self.operation,
                self.space_id,
                elapsed
            );
        }
    }
}
