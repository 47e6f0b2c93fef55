//! .modinfo 검사기 (호스트 측)
//!
//! 모듈 오브젝트의 `.modinfo` 섹션에서 디스크립터를 읽는다.
//! 라이프사이클 함수는 호출하지 않는다.

use crate::descriptor::ModuleDescriptor;
use crate::elf::{Elf64, Elf64Error};

/// 디스크립터가 들어 있는 섹션 이름
pub const MODINFO_SECTION: &str = ".modinfo";

/// 검사 에러
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InspectError {
    #[error("invalid module object: {0}")]
    Elf(#[from] Elf64Error),
    #[error("module object has no .modinfo section")]
    MissingSection,
    #[error("modinfo is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("module object does not define `{0}`")]
    MissingEntryPoint(&'static str),
}

/// `.modinfo` 블롭의 `key=value` 엔트리 순회
///
/// NUL 패딩 구간과 `=`가 없는 엔트리는 건너뛴다.
pub fn entries(blob: &[u8]) -> impl Iterator<Item = (&str, &str)> {
    blob.split(|&b| b == 0)
        .filter(|raw| !raw.is_empty())
        .filter_map(|raw| core::str::from_utf8(raw).ok())
        .filter_map(|entry| entry.split_once('='))
}

/// 블롭에서 디스크립터 재구성
///
/// `name`은 선택 (없으면 빈 문자열). 같은 키가 여러 번 나오면 마지막 값을 쓴다.
pub fn descriptor_from(blob: &[u8]) -> Result<ModuleDescriptor<'_>, InspectError> {
    let mut name = None;
    let mut license = None;
    let mut author = None;
    let mut description = None;
    let mut version = None;

    for (key, value) in entries(blob) {
        match key {
            "name" => name = Some(value),
            "license" => license = Some(value),
            "author" => author = Some(value),
            "description" => description = Some(value),
            "version" => version = Some(value),
            _ => {}
        }
    }

    Ok(ModuleDescriptor {
        name: name.unwrap_or(""),
        license: license.ok_or(InspectError::MissingField("license"))?,
        author: author.ok_or(InspectError::MissingField("author"))?,
        description: description.ok_or(InspectError::MissingField("description"))?,
        version: version.ok_or(InspectError::MissingField("version"))?,
    })
}

/// 검사 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleImage<'a> {
    /// .modinfo에서 읽은 디스크립터
    pub descriptor: ModuleDescriptor<'a>,
    /// `module_exit` 정의 여부 (`module_init`은 항상 정의됨)
    pub has_exit: bool,
}

impl ModuleImage<'_> {
    /// exit가 없으면 호스트는 언로드를 허용하지 않는다
    pub fn is_unloadable(&self) -> bool {
        self.has_exit
    }
}

/// 모듈 오브젝트 검사
pub fn inspect(object: &[u8]) -> Result<ModuleImage<'_>, InspectError> {
    let elf = Elf64::parse(object)?;

    let section = elf
        .find_section(MODINFO_SECTION)
        .ok_or(InspectError::MissingSection)?;
    let descriptor = descriptor_from(elf.section_data(&section))?;

    let defined = |name: &str| elf.find_symbol(name).is_some_and(|sym| sym.is_defined());
    if !defined("module_init") {
        return Err(InspectError::MissingEntryPoint("module_init"));
    }

    Ok(ModuleImage {
        descriptor,
        has_exit: defined("module_exit"),
    })
}
