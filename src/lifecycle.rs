//! 모듈 라이프사이클 컨트롤러
//!
//! 호스트가 로드 시 한 번 `initialize`, 언로드 시 한 번 `terminate`를 호출한다.
//! 컨트롤러는 가변 상태를 갖지 않는다. 상태(`ModuleState`)는 호스트가 소유한다.

use crate::descriptor::{ModuleDescriptor, DESCRIPTOR};
use crate::error::ModuleError;
use crate::log::LogSink;
use crate::log_info;

/// 로드 시 메시지
pub const INIT_MESSAGE: &str = "Hello world !";
/// 언로드 시 메시지
pub const EXIT_MESSAGE: &str = "Cleaning up module.";

/// 모듈 상태 (호스트 관점)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleState {
    /// 로드되지 않음
    #[default]
    Unloaded,
    /// init 성공, 활성 상태
    Loaded,
}

/// 두 상태 라이프사이클 인터페이스
///
/// - `initialize`: Unloaded → Loaded. `Err`이면 호스트는 모듈을 로드되지 않은
///   것으로 취급하고 `terminate`를 호출하지 않는다.
/// - `terminate`: Loaded → Unloaded. 실패할 수 없다.
///
/// 두 함수 모두 동기적으로 끝까지 실행되며 블로킹하지 않는다.
pub trait Lifecycle {
    fn initialize(&self) -> Result<(), ModuleError>;
    fn terminate(&self);
}

/// Hello 모듈
pub struct HelloModule<S> {
    sink: S,
}

impl<S: LogSink> HelloModule<S> {
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    /// 모듈 메타데이터 (라이프사이클 함수 호출 없이 조회 가능)
    pub const fn descriptor(&self) -> &'static ModuleDescriptor<'static> {
        &DESCRIPTOR
    }
}

impl<S: LogSink> Lifecycle for HelloModule<S> {
    fn initialize(&self) -> Result<(), ModuleError> {
        log_info!(self.sink, "Hello world !");
        Ok(())
    }

    // 계약 밖의 호출(init 없는 exit, 중복 exit)도 상태가 없으므로 레코드만 남긴다
    fn terminate(&self) {
        log_info!(self.sink, "Cleaning up module.");
    }
}
