//! Developer ("level 6") log lines with a thread-local capture sink.
//!
//! Lines go to the `leadsift::dev6` target at TRACE and, when a sink is enabled on
//! the current thread, into that sink so tests can assert on them without touching
//! the global logger.

use std::cell::RefCell;
use std::time::Instant;

thread_local! {
    static TL_SINK: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// Disables the current thread's sink on drop.
pub struct DevSinkGuard;

impl Drop for DevSinkGuard {
    fn drop(&mut self) {
        TL_SINK.with(|s| *s.borrow_mut() = None);
    }
}

#[must_use]
pub fn enable_thread_sink() -> DevSinkGuard {
    TL_SINK.with(|s| *s.borrow_mut() = Some(Vec::new()));
    DevSinkGuard
}

pub fn write_str(msg: &str) {
    TL_SINK.with(|s| {
        if let Some(buf) = s.borrow_mut().as_mut() {
            buf.push(msg.to_owned());
        }
    });
}

/// Takes everything captured so far on this thread.
#[must_use]
pub fn drain() -> Vec<String> {
    TL_SINK.with(|s| s.borrow_mut().as_mut().map(std::mem::take).unwrap_or_default())
}

#[must_use]
pub fn snapshot() -> Vec<String> {
    TL_SINK.with(|s| s.borrow().as_ref().cloned().unwrap_or_default())
}

/// Emits a developer line to `leadsift::dev6` and the thread-local sink.
#[macro_export]
macro_rules! dev6 {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        $crate::utils::devlog::write_str(&__s);
        log::log!(target: $crate::logger::DEV6_TARGET, log::Level::Trace, "{}", __s);
    }};
}

/// Measures one named phase and reports it as `bench <name> ms=<elapsed>`.
pub struct BenchTimer {
    name: &'static str,
    start: Instant,
}

impl BenchTimer {
    #[must_use]
    pub fn start(name: &'static str) -> Self {
        Self { name, start: Instant::now() }
    }

    /// Emits the line with extra `key=value` fields appended.
    pub fn finish(self, fields: &str) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        if fields.is_empty() {
            crate::dev6!("bench {} ms={:.3}", self.name, ms);
        } else {
            crate::dev6!("bench {} ms={:.3} {}", self.name, ms, fields);
        }
    }
}
