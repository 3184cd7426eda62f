//! Kernel-`printk`-style debug logging.
//!
//! Adapted from `gvthread_core::kprint`: the teacher ships no `log`/`tracing`
//! dependency anywhere in its workspace, instead tagging stderr lines with
//! the calling worker's id and gating on an env-var level. We keep that
//! design and drop the GVThread-id half of the context tag, since this pool
//! has no green-thread concept — only workers.
//!
//! Controlled by `SCALEPOOL_LOG_LEVEL` (off/error/warn/info/debug/trace or
//! 0-5) and `SCALEPOOL_DEBUG` (alias for `debug`).

use crate::env::{env_get_bool, env_get};
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    fn prefix(self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Trace => "[TRACE]",
        }
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);
static INITIALIZED: AtomicBool = AtomicBool::new(false);

fn init() {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }
    if env_get_bool("SCALEPOOL_DEBUG", false) {
        LOG_LEVEL.store(LogLevel::Debug as u8, Ordering::Relaxed);
    }
    let level: String = env_get("SCALEPOOL_LOG_LEVEL", String::new());
    let level = match level.to_lowercase().as_str() {
        "off" | "0" => Some(LogLevel::Off),
        "error" | "1" => Some(LogLevel::Error),
        "warn" | "2" => Some(LogLevel::Warn),
        "info" | "3" => Some(LogLevel::Info),
        "debug" | "4" => Some(LogLevel::Debug),
        "trace" | "5" => Some(LogLevel::Trace),
        _ => None,
    };
    if let Some(level) = level {
        LOG_LEVEL.store(level as u8, Ordering::Relaxed);
    }
}

#[inline]
fn log_level() -> LogLevel {
    if !INITIALIZED.load(Ordering::Relaxed) {
        init();
    }
    match LOG_LEVEL.load(Ordering::Relaxed) {
        0 => LogLevel::Off,
        1 => LogLevel::Error,
        2 => LogLevel::Warn,
        3 => LogLevel::Info,
        4 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

#[inline]
fn level_enabled(level: LogLevel) -> bool {
    (level as u8) <= (log_level() as u8)
}

thread_local! {
    static WORKER_ID: std::cell::Cell<Option<u32>> = const { std::cell::Cell::new(None) };
}

/// Set the current worker id for this OS thread (called by the worker loop).
pub fn set_worker_id(id: u32) {
    WORKER_ID.with(|w| w.set(Some(id)));
}

fn format_context() -> String {
    match WORKER_ID.with(|w| w.get()) {
        Some(id) => format!("[w{id}]"),
        None => "[w--]".to_string(),
    }
}

#[doc(hidden)]
pub fn _splog_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = write!(handle, "{} {} ", level.prefix(), format_context());
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
}

/// Error-level log tagged with the calling worker's id.
#[macro_export]
macro_rules! sperror {
    ($($arg:tt)*) => {{
        $crate::log::_splog_impl($crate::log::LogLevel::Error, format_args!($($arg)*));
    }};
}

/// Warn-level log tagged with the calling worker's id.
#[macro_export]
macro_rules! spwarn {
    ($($arg:tt)*) => {{
        $crate::log::_splog_impl($crate::log::LogLevel::Warn, format_args!($($arg)*));
    }};
}

/// Info-level log tagged with the calling worker's id.
#[macro_export]
macro_rules! spinfo {
    ($($arg:tt)*) => {{
        $crate::log::_splog_impl($crate::log::LogLevel::Info, format_args!($($arg)*));
    }};
}

/// Debug-level log tagged with the calling worker's id.
#[macro_export]
macro_rules! spdebug {
    ($($arg:tt)*) => {{
        $crate::log::_splog_impl($crate::log::LogLevel::Debug, format_args!($($arg)*));
    }};
}
