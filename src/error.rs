//! 모듈 에러
//!
//! 호스트와의 계약에서 실패는 init의 0이 아닌 상태 코드 하나뿐이다.
//! exit 경로에는 에러가 없다.

/// 모듈 에러
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    /// 초기화 함수 실패 (호스트에 전달되는 상태 코드)
    #[error("module initialization failed with status {0}")]
    InitFailed(i32),
}

impl ModuleError {
    /// 호스트에 반환할 상태 코드 (항상 0이 아님)
    pub fn status(&self) -> i32 {
        match *self {
            // 0은 성공과 구분되지 않으므로 일반 실패 코드로 바꾼다
            ModuleError::InitFailed(0) => -1,
            ModuleError::InitFailed(code) => code,
        }
    }

    /// 호스트 측: init 반환값을 Result로 변환
    pub fn from_status(status: i32) -> Result<(), ModuleError> {
        if status == 0 {
            Ok(())
        } else {
            Err(ModuleError::InitFailed(status))
        }
    }
}

/// init 결과를 C-ABI 상태 코드로 변환
pub fn status_of(result: Result<(), ModuleError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.status(),
    }
}
