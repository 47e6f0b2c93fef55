//! 모듈 로깅
//!
//! - 로그 레벨: ERROR, WARN, INFO, DEBUG, TRACE (커널 `kernel_log`과 동일한 값)
//! - 주입 가능한 로그 싱크 (`LogSink`)
//! - 스택 버퍼 포매팅 (할당 없음)

mod macros;

use core::fmt;

/// 포매팅된 메시지 최대 길이
pub const MAX_MESSAGE_LEN: usize = 512;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => " WARN",
            LogLevel::Info => " INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            4 => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 로그 싱크
///
/// 컨트롤러는 전역 함수 대신 이 트레이트를 통해 로그를 남긴다.
/// 커널 빌드에서는 `KernelLog`, 테스트에서는 기록용 싱크를 주입한다.
pub trait LogSink {
    /// 레코드 하나 출력
    fn emit(&self, level: LogLevel, msg: &str);
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn emit(&self, level: LogLevel, msg: &str) {
        (**self).emit(level, msg)
    }
}

/// 커널 로그 싱크
///
/// 커널이 export하는 `kernel_log` 심볼로 레코드를 넘긴다.
#[cfg(target_os = "none")]
#[derive(Debug, Clone, Copy, Default)]
pub struct KernelLog;

#[cfg(target_os = "none")]
unsafe extern "C" {
    /// 커널 로그 함수 (PLT를 통해 호출됨)
    fn kernel_log(level: u8, msg: *const u8, msg_len: usize);
}

#[cfg(target_os = "none")]
impl LogSink for KernelLog {
    fn emit(&self, level: LogLevel, msg: &str) {
        unsafe { kernel_log(level as u8, msg.as_ptr(), msg.len()) }
    }
}

/// 로그 메시지 출력
pub fn log<S: LogSink + ?Sized>(sink: &S, level: LogLevel, args: fmt::Arguments) {
    // 리터럴 메시지는 포매팅 없이 그대로
    if let Some(msg) = args.as_str() {
        sink.emit(level, msg);
        return;
    }

    let mut msg_buf = [0u8; MAX_MESSAGE_LEN];
    let msg_len = format_to_buf(&mut msg_buf, args);
    // BufWriter는 문자 경계에서만 자르므로 항상 유효한 UTF-8
    if let Ok(msg) = core::str::from_utf8(&msg_buf[..msg_len]) {
        sink.emit(level, msg);
    }
}

// fmt::Arguments를 바이트 버퍼에 포매팅
fn format_to_buf(buf: &mut [u8], args: fmt::Arguments) -> usize {
    let mut writer = BufWriter::new(buf);
    let _ = fmt::write(&mut writer, args);
    writer.pos
}

// 스택 버퍼에 쓰는 fmt::Write 구현 (넘치면 잘라냄)
struct BufWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BufWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let remaining = self.buf.len() - self.pos;
        let mut copy_len = s.len().min(remaining);
        while !s.is_char_boundary(copy_len) {
            copy_len -= 1;
        }
        self.buf[self.pos..self.pos + copy_len].copy_from_slice(&s.as_bytes()[..copy_len]);
        self.pos += copy_len;
        Ok(())
    }
}
