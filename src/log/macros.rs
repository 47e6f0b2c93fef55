//! 모듈 로그 매크로
//!
//! log_error!, log_warn!, log_info!, log_debug!, log_trace!
//! 첫 인자는 `LogSink` 구현체.

#[macro_export]
macro_rules! log_error {
    ($sink:expr, $($arg:tt)*) => {
        $crate::log::log(&$sink, $crate::log::LogLevel::Error, core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($sink:expr, $($arg:tt)*) => {
        $crate::log::log(&$sink, $crate::log::LogLevel::Warn, core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($sink:expr, $($arg:tt)*) => {
        $crate::log::log(&$sink, $crate::log::LogLevel::Info, core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($sink:expr, $($arg:tt)*) => {
        $crate::log::log(&$sink, $crate::log::LogLevel::Debug, core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_trace {
    ($sink:expr, $($arg:tt)*) => {
        $crate::log::log(&$sink, $crate::log::LogLevel::Trace, core::format_args!($($arg)*))
    };
}
