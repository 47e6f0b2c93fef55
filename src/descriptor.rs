//! 모듈 디스크립터
//!
//! 호스트의 모듈 관리 서브시스템이 읽는 정적 메타데이터.
//! 빌드 시점에 한 번 정의되고 이후 변경되지 않는다.
//! 각 필드는 `key=value\0` 엔트리로 `.modinfo` 섹션에 배치된다.

use static_assertions::const_assert;

/// 모듈 메타데이터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleDescriptor<'a> {
    /// 모듈 이름
    pub name: &'a str,
    /// 라이선스 (호스트가 인식하는 값이어야 함)
    pub license: &'a str,
    /// 작성자
    pub author: &'a str,
    /// 설명
    pub description: &'a str,
    /// 버전
    pub version: &'a str,
}

/// 이 모듈의 디스크립터
pub const DESCRIPTOR: ModuleDescriptor<'static> = ModuleDescriptor {
    name: "hello",
    license: "GPL",
    author: "kyazdani",
    description: "My First Linux Module",
    version: "0.1",
};

/// 호스트가 GPL 호환으로 취급하는 라이선스 태그
pub const GPL_COMPATIBLE_LICENSES: [&str; 6] = [
    "GPL",
    "GPL v2",
    "GPL and additional rights",
    "Dual BSD/GPL",
    "Dual MIT/GPL",
    "Dual MPL/GPL",
];

impl ModuleDescriptor<'_> {
    /// 모든 필드가 비어 있지 않고 NUL을 포함하지 않는지 확인
    pub const fn is_well_formed(&self) -> bool {
        let fields = [
            self.name,
            self.license,
            self.author,
            self.description,
            self.version,
        ];
        let mut i = 0;
        while i < fields.len() {
            let bytes = fields[i].as_bytes();
            if bytes.is_empty() {
                return false;
            }
            let mut j = 0;
            while j < bytes.len() {
                if bytes[j] == 0 {
                    return false;
                }
                j += 1;
            }
            i += 1;
        }
        true
    }

    /// 라이선스가 GPL 호환인지 확인
    pub const fn is_gpl_compatible(&self) -> bool {
        is_gpl_compatible(self.license)
    }
}

/// 라이선스 문자열이 GPL 호환 목록에 있는지 확인
pub const fn is_gpl_compatible(license: &str) -> bool {
    let mut i = 0;
    while i < GPL_COMPATIBLE_LICENSES.len() {
        if bytes_eq(license.as_bytes(), GPL_COMPATIBLE_LICENSES[i].as_bytes()) {
            return true;
        }
        i += 1;
    }
    false
}

const fn bytes_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const_assert!(DESCRIPTOR.is_well_formed());
const_assert!(DESCRIPTOR.is_gpl_compatible());

// ============================================================================
// .modinfo 엔트리 인코딩
// ============================================================================

/// `key=value\0` 엔트리 길이
pub const fn entry_len(key: &str, value: &str) -> usize {
    key.len() + 1 + value.len() + 1
}

/// `key=value\0` 엔트리를 고정 크기 배열로 인코딩
///
/// `N`은 반드시 `entry_len(key, value)`와 같아야 한다 (컴파일 타임 검사).
pub const fn encode_entry<const N: usize>(key: &str, value: &str) -> [u8; N] {
    assert!(N == entry_len(key, value), "modinfo entry length mismatch");

    let mut out = [0u8; N];
    let key = key.as_bytes();
    let value = value.as_bytes();

    let mut pos = 0;
    let mut i = 0;
    while i < key.len() {
        out[pos] = key[i];
        pos += 1;
        i += 1;
    }
    out[pos] = b'=';
    pos += 1;
    i = 0;
    while i < value.len() {
        out[pos] = value[i];
        pos += 1;
        i += 1;
    }
    // 마지막 바이트는 이미 0 (NUL 종료)
    out
}

/// `.modinfo` 엔트리 하나를 정적 배열로 선언
///
/// 베어메탈 타겟에서는 `.modinfo` 섹션에 배치되어 호스트 로더가
/// 라이프사이클 함수를 호출하지 않고도 읽을 수 있다.
macro_rules! modinfo {
    ($ident:ident, $key:literal, $value:expr) => {
        #[used]
        #[cfg_attr(target_os = "none", unsafe(link_section = ".modinfo"))]
        pub static $ident: [u8; entry_len($key, $value)] =
            encode_entry::<{ entry_len($key, $value) }>($key, $value);
    };
}

modinfo!(MODINFO_NAME, "name", DESCRIPTOR.name);
modinfo!(MODINFO_LICENSE, "license", DESCRIPTOR.license);
modinfo!(MODINFO_AUTHOR, "author", DESCRIPTOR.author);
modinfo!(MODINFO_DESCRIPTION, "description", DESCRIPTOR.description);
modinfo!(MODINFO_VERSION, "version", DESCRIPTOR.version);

/// `.modinfo` 엔트리에서 값 부분(NUL 종료) 포인터를 얻는다
///
/// C-ABI 메타데이터 getter가 사용한다.
pub fn value_ptr(entry: &'static [u8]) -> *const u8 {
    let start = entry
        .iter()
        .position(|&b| b == b'=')
        .map(|p| p + 1)
        .unwrap_or(entry.len() - 1);
    entry[start..].as_ptr()
}
