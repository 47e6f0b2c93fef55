//! C-ABI 엔트리 포인트
//!
//! 커널 모듈 로더는 심볼 테이블에서 `module_init` / `module_exit`를 찾아 호출한다.
//! 메타데이터 getter는 `.modinfo` 엔트리의 값 부분을 가리킨다.

use crate::descriptor::{
    self, MODINFO_AUTHOR, MODINFO_DESCRIPTION, MODINFO_LICENSE, MODINFO_NAME, MODINFO_VERSION,
};
use crate::error::status_of;
use crate::lifecycle::Lifecycle;

/// init 결과를 호스트 상태 코드로
///
/// init 실패 보고는 호스트 몫이므로 상태 코드만 돌려준다.
#[cfg_attr(not(any(test, target_os = "none")), allow(dead_code))]
pub(crate) fn init_status<M: Lifecycle + ?Sized>(module: &M) -> i32 {
    status_of(module.initialize())
}

/// `Lifecycle` 구현 static에 대한 `module_init` / `module_exit` 선언
#[cfg_attr(not(any(test, target_os = "none")), allow(unused_macros))]
macro_rules! module_entry_points {
    ($module:path) => {
        /// 모듈 초기화 함수
        #[unsafe(no_mangle)]
        pub extern "C" fn module_init() -> i32 {
            $crate::entry::init_status(&$module)
        }

        /// 모듈 정리 함수
        #[unsafe(no_mangle)]
        pub extern "C" fn module_exit() {
            $crate::lifecycle::Lifecycle::terminate(&$module)
        }
    };
}

#[cfg(target_os = "none")]
mod kernel {
    use core::panic::PanicInfo;

    use crate::descriptor::DESCRIPTOR;
    use crate::lifecycle::HelloModule;
    use crate::log::KernelLog;
    use crate::log_error;

    static MODULE: HelloModule<KernelLog> = HelloModule::new(KernelLog);

    module_entry_points!(MODULE);

    /// Panic 핸들러
    #[panic_handler]
    fn panic(_info: &PanicInfo) -> ! {
        log_error!(KernelLog, "[{}] PANIC!", DESCRIPTOR.name);
        loop {
            core::hint::spin_loop();
        }
    }
}

/// 모듈 이름 반환
#[unsafe(no_mangle)]
pub extern "C" fn module_name() -> *const u8 {
    descriptor::value_ptr(&MODINFO_NAME)
}

/// 모듈 버전 반환
#[unsafe(no_mangle)]
pub extern "C" fn module_version() -> *const u8 {
    descriptor::value_ptr(&MODINFO_VERSION)
}

#[unsafe(no_mangle)]
pub extern "C" fn module_license() -> *const u8 {
    descriptor::value_ptr(&MODINFO_LICENSE)
}

#[unsafe(no_mangle)]
pub extern "C" fn module_author() -> *const u8 {
    descriptor::value_ptr(&MODINFO_AUTHOR)
}

#[unsafe(no_mangle)]
pub extern "C" fn module_description() -> *const u8 {
    descriptor::value_ptr(&MODINFO_DESCRIPTION)
}
