//! Logging contract used by the injector.
//!
//! The engine logs through an optional [`LogSink`] installed per context with
//! [`Injector::set_logger`](crate::Injector::set_logger). With no sink
//! installed, logging is disabled entirely: the message-producing closures at
//! the call sites are never invoked.

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Instant;

/// Sink for leveled wiring log messages.
///
/// `context` is the context name, `location` the engine call site, `message`
/// the already-rendered text. The error entry point optionally carries the
/// underlying failure for detail capture.
///
/// # Examples
///
/// ```rust
/// use wireup::{Injector, LogSink};
/// use std::sync::Arc;
///
/// struct StderrSink;
///
/// impl LogSink for StderrSink {
///     fn info(&self, context: &str, location: &'static str, message: &str) {
///         eprintln!("INFO [{}] {} ({})", context, message, location);
///     }
///
///     fn error(
///         &self,
///         context: &str,
///         location: &'static str,
///         message: &str,
///         error: Option<&(dyn std::error::Error + 'static)>,
///     ) {
///         eprintln!("ERROR [{}] {} ({})", context, message, location);
///         if let Some(e) = error {
///             eprintln!("  caused by: {}", e);
///         }
///     }
/// }
///
/// let injector = Injector::context("logged");
/// injector.set_logger(Some(Arc::new(StderrSink)));
/// injector.remove();
/// ```
pub trait LogSink: Send + Sync {
    /// Informational message.
    fn info(&self, context: &str, location: &'static str, message: &str);

    /// Error message, optionally with the underlying failure.
    fn error(
        &self,
        context: &str,
        location: &'static str,
        message: &str,
        error: Option<&(dyn std::error::Error + 'static)>,
    );
}

/// Log sink writing plain text lines to any [`Write`] target.
///
/// Write failures are swallowed: logging must never abort a wiring pass.
pub struct WriterSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wraps a writer as a log sink.
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    fn print(&self, level: &str, context: &str, location: &'static str, message: &str) {
        let thread = std::thread::current();
        let mut out = self.out.lock().unwrap();
        let _ = writeln!(
            out,
            "{} injector '{}': {} - thread: {} ({})",
            level,
            context,
            message,
            thread.name().unwrap_or("unnamed"),
            location
        );
        let _ = out.flush();
    }
}

impl WriterSink<io::Stdout> {
    /// Convenience sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn info(&self, context: &str, location: &'static str, message: &str) {
        self.print("INFO", context, location, message);
    }

    fn error(
        &self,
        context: &str,
        location: &'static str,
        message: &str,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        self.print("ERROR", context, location, message);
        if let Some(e) = error {
            let mut out = self.out.lock().unwrap();
            let _ = writeln!(out, "  caused by: {}", e);
            let _ = out.flush();
        }
    }
}

// Engine call-site location, "file:line".
macro_rules! loc {
    () => {
        concat!(file!(), ":", line!())
    };
}
pub(crate) use loc;

/// Millisecond stopwatch for construction and lifecycle timings.
pub(crate) struct StopWatch {
    start: Instant,
}

impl StopWatch {
    pub(crate) fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub(crate) fn millis(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}
