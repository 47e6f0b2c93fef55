//! 레퍼런스 호스트 (호스트 측)
//!
//! 커널 모듈 로더의 라이프사이클 계약을 재현한다.
//! - Unloaded 상태에서만 init 호출
//! - init 실패 시 Unloaded 유지, exit는 절대 호출하지 않음
//! - Loaded 상태에서만 exit 호출
//! - init 실패 보고는 호스트 책임

use crate::descriptor::ModuleDescriptor;
use crate::error::ModuleError;
use crate::lifecycle::{HelloModule, Lifecycle, ModuleState};
use crate::log::LogSink;
use crate::{log_debug, log_error};

/// 호스트 에러
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// 이미 로드됨
    #[error("module is already loaded")]
    AlreadyLoaded,
    /// 로드되지 않음
    #[error("module is not loaded")]
    NotLoaded,
    /// 초기화 함수 실패
    #[error(transparent)]
    Init(#[from] ModuleError),
}

/// 모듈 하나를 관리하는 호스트
///
/// `log`는 호스트 자신의 진단 채널로, 모듈의 로그 싱크와 별개다.
pub struct ModuleHost<M, L> {
    module: M,
    descriptor: ModuleDescriptor<'static>,
    state: ModuleState,
    log: L,
}

impl<M: Lifecycle, L: LogSink> ModuleHost<M, L> {
    pub fn new(module: M, descriptor: ModuleDescriptor<'static>, log: L) -> Self {
        Self {
            module,
            descriptor,
            state: ModuleState::Unloaded,
            log,
        }
    }

    /// 현재 상태
    pub fn state(&self) -> ModuleState {
        self.state
    }

    /// 메타데이터 조회 (init/exit 호출 없음)
    pub fn descriptor(&self) -> &ModuleDescriptor<'static> {
        &self.descriptor
    }

    /// 모듈 로드: init 호출, 성공 시에만 Loaded
    pub fn load(&mut self) -> Result<(), HostError> {
        if self.state == ModuleState::Loaded {
            return Err(HostError::AlreadyLoaded);
        }

        if let Err(e) = self.module.initialize() {
            log_error!(self.log, "[module] '{}' init failed: {}", self.descriptor.name, e);
            return Err(e.into());
        }

        self.state = ModuleState::Loaded;
        log_debug!(self.log, "[module] '{}' loaded", self.descriptor.name);
        Ok(())
    }

    /// 모듈 언로드: exit 호출 후 Unloaded
    pub fn unload(&mut self) -> Result<(), HostError> {
        if self.state != ModuleState::Loaded {
            return Err(HostError::NotLoaded);
        }

        self.module.terminate();
        self.state = ModuleState::Unloaded;
        log_debug!(self.log, "[module] '{}' unloaded", self.descriptor.name);
        Ok(())
    }

    /// 관리 중인 모듈 반환
    pub fn into_inner(self) -> M {
        self.module
    }
}

impl<S: LogSink, L: LogSink> ModuleHost<HelloModule<S>, L> {
    /// Hello 모듈용 호스트 (모듈 자신의 디스크립터 사용)
    pub fn hello(module: HelloModule<S>, log: L) -> Self {
        let descriptor = *module.descriptor();
        Self::new(module, descriptor, log)
    }
}
