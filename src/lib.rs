//! Hello 커널 모듈
//!
//! 로드 시 "Hello world !", 언로드 시 "Cleaning up module."을
//! 커널 로그로 남기는 최소 로더블 모듈.
//! - 모듈 디스크립터 (.modinfo)
//! - 라이프사이클 컨트롤러 (init/exit)
//! - 주입 가능한 로그 싱크

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

pub mod descriptor;
pub mod error;
pub mod lifecycle;
pub mod log;

mod entry;

#[cfg(any(test, feature = "host"))]
pub mod elf;
#[cfg(any(test, feature = "host"))]
pub mod host;
#[cfg(any(test, feature = "host"))]
pub mod modinfo;

pub use descriptor::{ModuleDescriptor, DESCRIPTOR};
pub use error::ModuleError;
pub use lifecycle::{HelloModule, Lifecycle, ModuleState};
pub use log::{LogLevel, LogSink};
