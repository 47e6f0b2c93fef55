//! ELF64 리더 (호스트 측)
//!
//! 모듈 오브젝트(.ko)에서 섹션과 심볼을 읽기 위한 읽기 전용 파서.
//! 모든 필드는 리틀 엔디안 바이트에서 범위 검사 후 읽는다.
//! 참조: https://refspecs.linuxfoundation.org/elf/gabi4+/ch4.eheader.html

/// ELF 매직 넘버
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

const ELFCLASS64: u8 = 2;
const ELFDATA2LSB: u8 = 1;

/// ELF64 헤더 크기
pub const EHDR_SIZE: usize = 64;
/// 섹션 헤더 엔트리 크기
pub const SHDR_SIZE: usize = 64;
/// 심볼 엔트리 크기
pub const SYM_SIZE: usize = 24;

/// 섹션 타입
pub mod section_type {
    pub const SHT_SYMTAB: u32 = 2; // 심볼 테이블
    pub const SHT_NOBITS: u32 = 8; // BSS (파일에 없음)
}

/// 특수 섹션 인덱스
pub mod section_index {
    pub const SHN_UNDEF: u16 = 0; // 미정의
}

/// ELF64 섹션 헤더 (필요한 필드만)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elf64SectionHeader {
    pub sh_name: u32,
    pub sh_type: u32,
    pub sh_offset: u64,
    pub sh_size: u64,
    pub sh_link: u32,
}

/// ELF64 심볼 테이블 엔트리
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elf64Symbol {
    pub st_name: u32,
    pub st_shndx: u16,
}

impl Elf64Symbol {
    /// 정의된 심볼인지
    pub fn is_defined(&self) -> bool {
        self.st_shndx != section_index::SHN_UNDEF
    }
}

/// ELF64 파서 에러
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Elf64Error {
    #[error("object too small for an ELF header")]
    TooSmall,
    #[error("bad ELF magic")]
    InvalidMagic,
    #[error("not a 64-bit ELF object")]
    Not64Bit,
    #[error("unsupported ELF byte order")]
    UnsupportedEndian,
    #[error("section header table out of bounds")]
    InvalidSectionHeader,
}

/// 파싱된 ELF64 파일
pub struct Elf64<'a> {
    data: &'a [u8],
    shoff: usize,
    shnum: usize,
    shentsize: usize,
    shstrtab: &'a [u8],
}

impl<'a> Elf64<'a> {
    /// ELF64 파일 파싱
    pub fn parse(data: &'a [u8]) -> Result<Self, Elf64Error> {
        if data.len() < EHDR_SIZE {
            return Err(Elf64Error::TooSmall);
        }
        if data[0..4] != ELF_MAGIC {
            return Err(Elf64Error::InvalidMagic);
        }
        if data[4] != ELFCLASS64 {
            return Err(Elf64Error::Not64Bit);
        }
        if data[5] != ELFDATA2LSB {
            return Err(Elf64Error::UnsupportedEndian);
        }

        let shoff = read_u64(data, 0x28).ok_or(Elf64Error::TooSmall)? as usize;
        let shentsize = read_u16(data, 0x3a).ok_or(Elf64Error::TooSmall)? as usize;
        let shnum = read_u16(data, 0x3c).ok_or(Elf64Error::TooSmall)? as usize;
        let shstrndx = read_u16(data, 0x3e).ok_or(Elf64Error::TooSmall)? as usize;

        if shnum != 0 && shentsize < SHDR_SIZE {
            return Err(Elf64Error::InvalidSectionHeader);
        }
        let table_end = shnum
            .checked_mul(shentsize)
            .and_then(|len| len.checked_add(shoff))
            .ok_or(Elf64Error::InvalidSectionHeader)?;
        if table_end > data.len() {
            return Err(Elf64Error::InvalidSectionHeader);
        }

        let mut elf = Self {
            data,
            shoff,
            shnum,
            shentsize,
            shstrtab: &[],
        };

        // 섹션 이름 문자열 테이블
        if let Some(sh) = elf.section(shstrndx) {
            elf.shstrtab = elf.section_data(&sh);
        }

        Ok(elf)
    }

    /// 인덱스로 섹션 헤더 조회
    pub fn section(&self, index: usize) -> Option<Elf64SectionHeader> {
        if index >= self.shnum {
            return None;
        }
        let base = self.shoff + index * self.shentsize;
        let d = self.data;
        Some(Elf64SectionHeader {
            sh_name: read_u32(d, base)?,
            sh_type: read_u32(d, base + 4)?,
            sh_offset: read_u64(d, base + 24)?,
            sh_size: read_u64(d, base + 32)?,
            sh_link: read_u32(d, base + 40)?,
        })
    }

    /// 섹션 헤더 목록
    pub fn sections(&self) -> impl Iterator<Item = Elf64SectionHeader> + '_ {
        (0..self.shnum).filter_map(|i| self.section(i))
    }

    /// 섹션 이름 조회
    pub fn section_name(&self, sh: &Elf64SectionHeader) -> &'a str {
        string_at(self.shstrtab, sh.sh_name)
    }

    /// 이름으로 섹션 찾기
    pub fn find_section(&self, name: &str) -> Option<Elf64SectionHeader> {
        self.sections().find(|sh| self.section_name(sh) == name)
    }

    /// 섹션 데이터 반환 (범위를 벗어나면 빈 슬라이스)
    pub fn section_data(&self, sh: &Elf64SectionHeader) -> &'a [u8] {
        if sh.sh_type == section_type::SHT_NOBITS {
            return &[];
        }
        let start = sh.sh_offset as usize;
        match start.checked_add(sh.sh_size as usize) {
            Some(end) if end <= self.data.len() => &self.data[start..end],
            _ => &[],
        }
    }

    /// 심볼 테이블 순회
    pub fn symbols(&self) -> impl Iterator<Item = (&'a str, Elf64Symbol)> + '_ {
        let symtab = self
            .sections()
            .find(|sh| sh.sh_type == section_type::SHT_SYMTAB);
        let (data, strtab) = match symtab {
            Some(sh) => {
                // 심볼 테이블의 sh_link가 문자열 테이블을 가리킴
                let strtab = self
                    .section(sh.sh_link as usize)
                    .map(|s| self.section_data(&s))
                    .unwrap_or(&[]);
                (self.section_data(&sh), strtab)
            }
            None => (&[][..], &[][..]),
        };

        data.chunks_exact(SYM_SIZE).filter_map(move |raw| {
            let sym = Elf64Symbol {
                st_name: read_u32(raw, 0)?,
                st_shndx: read_u16(raw, 6)?,
            };
            Some((string_at(strtab, sym.st_name), sym))
        })
    }

    /// 이름으로 심볼 찾기
    pub fn find_symbol(&self, name: &str) -> Option<Elf64Symbol> {
        self.symbols().find(|(n, _)| *n == name).map(|(_, sym)| sym)
    }
}

/// 문자열 테이블에서 NUL 종료 문자열 조회
fn string_at(strtab: &[u8], offset: u32) -> &str {
    let start = offset as usize;
    if start >= strtab.len() {
        return "";
    }

    let end = strtab[start..]
        .iter()
        .position(|&b| b == 0)
        .map(|p| start + p)
        .unwrap_or(strtab.len());

    core::str::from_utf8(&strtab[start..end]).unwrap_or("")
}

fn read_u16(data: &[u8], off: usize) -> Option<u16> {
    let bytes = data.get(off..off.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], off: usize) -> Option<u32> {
    let bytes = data.get(off..off.checked_add(4)?)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

fn read_u64(data: &[u8], off: usize) -> Option<u64> {
    let bytes = data.get(off..off.checked_add(8)?)?;
    Some(u64::from_le_bytes(bytes.try_into().ok()?))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::vec::Vec;

    const ET_REL: u16 = 1;
    const EM_AARCH64: u16 = 183;
    const SHT_NULL: u32 = 0;
    const SHT_PROGBITS: u32 = 1;
    const SHT_STRTAB: u32 = 3;

    /// 테스트용 최소 relocatable 오브젝트 빌더
    ///
    /// 섹션: NULL, .text, .modinfo, .symtab, .strtab, .shstrtab
    pub(crate) fn build_object(modinfo: Option<&[u8]>, symbols: &[(&str, bool)]) -> Vec<u8> {
        let text = [0u8; 16];

        let mut shstrtab = Vec::from(&b"\0"[..]);
        let name_off = |s: &str, tab: &mut Vec<u8>| {
            let off = tab.len() as u32;
            tab.extend_from_slice(s.as_bytes());
            tab.push(0);
            off
        };
        let n_text = name_off(".text", &mut shstrtab);
        let n_modinfo = name_off(if modinfo.is_some() { ".modinfo" } else { ".data" }, &mut shstrtab);
        let n_symtab = name_off(".symtab", &mut shstrtab);
        let n_strtab = name_off(".strtab", &mut shstrtab);
        let n_shstrtab = name_off(".shstrtab", &mut shstrtab);

        let mut strtab = Vec::from(&b"\0"[..]);
        let mut symtab = Vec::from([0u8; SYM_SIZE]);
        for &(name, defined) in symbols {
            let off = name_off(name, &mut strtab);
            symtab.extend_from_slice(&off.to_le_bytes());
            symtab.push(0x12); // GLOBAL FUNC
            symtab.push(0);
            let shndx: u16 = if defined { 1 } else { 0 };
            symtab.extend_from_slice(&shndx.to_le_bytes());
            symtab.extend_from_slice(&0u64.to_le_bytes());
            symtab.extend_from_slice(&0u64.to_le_bytes());
        }

        let modinfo = modinfo.unwrap_or(&[]);
        let mut out = Vec::from([0u8; EHDR_SIZE]);
        let place = |bytes: &[u8], out: &mut Vec<u8>| {
            let off = out.len() as u64;
            out.extend_from_slice(bytes);
            (off, bytes.len() as u64)
        };
        let text_at = place(&text[..], &mut out);
        let modinfo_at = place(modinfo, &mut out);
        let symtab_at = place(symtab.as_slice(), &mut out);
        let strtab_at = place(strtab.as_slice(), &mut out);
        let shstrtab_at = place(shstrtab.as_slice(), &mut out);

        while out.len() % 8 != 0 {
            out.push(0);
        }
        let shoff = out.len() as u64;

        let shdr = |name: u32, ty: u32, at: (u64, u64), link: u32, out: &mut Vec<u8>| {
            let mut h = [0u8; SHDR_SIZE];
            h[0..4].copy_from_slice(&name.to_le_bytes());
            h[4..8].copy_from_slice(&ty.to_le_bytes());
            h[24..32].copy_from_slice(&at.0.to_le_bytes());
            h[32..40].copy_from_slice(&at.1.to_le_bytes());
            h[40..44].copy_from_slice(&link.to_le_bytes());
            out.extend_from_slice(&h);
        };
        shdr(0, SHT_NULL, (0, 0), 0, &mut out);
        shdr(n_text, SHT_PROGBITS, text_at, 0, &mut out);
        shdr(n_modinfo, SHT_PROGBITS, modinfo_at, 0, &mut out);
        shdr(n_symtab, section_type::SHT_SYMTAB, symtab_at, 4, &mut out);
        shdr(n_strtab, SHT_STRTAB, strtab_at, 0, &mut out);
        shdr(n_shstrtab, SHT_STRTAB, shstrtab_at, 0, &mut out);

        out[0..4].copy_from_slice(&ELF_MAGIC);
        out[4] = ELFCLASS64;
        out[5] = ELFDATA2LSB;
        out[6] = 1;
        out[0x10..0x12].copy_from_slice(&ET_REL.to_le_bytes());
        out[0x12..0x14].copy_from_slice(&EM_AARCH64.to_le_bytes());
        out[0x28..0x30].copy_from_slice(&shoff.to_le_bytes());
        out[0x34..0x36].copy_from_slice(&(EHDR_SIZE as u16).to_le_bytes());
        out[0x3a..0x3c].copy_from_slice(&(SHDR_SIZE as u16).to_le_bytes());
        out[0x3c..0x3e].copy_from_slice(&6u16.to_le_bytes());
        out[0x3e..0x40].copy_from_slice(&5u16.to_le_bytes());
        out
    }

    #[test]
    fn test_parse_sections() {
        let obj = build_object(Some(&b"version=0.1\0"[..]), &[("module_init", true)]);
        let elf = Elf64::parse(&obj).unwrap();

        assert_eq!(elf.sections().count(), 6);
    }

    #[test]
    fn test_type_and_machine_not_checked() {
        // 검사기는 섹션만 본다: 실행 파일이나 다른 아키텍처도 그대로 읽힌다
        let mut obj = build_object(Some(&b"version=0.1\0"[..]), &[("module_init", true)]);
        obj[0x10..0x12].copy_from_slice(&2u16.to_le_bytes());
        obj[0x12..0x14].copy_from_slice(&62u16.to_le_bytes());

        let elf = Elf64::parse(&obj).unwrap();
        let sh = elf.find_section(".modinfo").unwrap();
        assert_eq!(elf.section_data(&sh), b"version=0.1\0");
        assert!(elf.find_symbol("module_init").unwrap().is_defined());
    }

    #[test]
    fn test_find_section() {
        let obj = build_object(Some(&b"license=GPL\0"[..]), &[]);
        let elf = Elf64::parse(&obj).unwrap();

        let sh = elf.find_section(".modinfo").unwrap();
        assert_eq!(elf.section_data(&sh), b"license=GPL\0");
        assert!(elf.find_section(".bss").is_none());
    }

    #[test]
    fn test_find_symbol() {
        let obj = build_object(None, &[("module_init", true), ("kernel_log", false)]);
        let elf = Elf64::parse(&obj).unwrap();

        assert!(elf.find_symbol("module_init").unwrap().is_defined());
        assert!(!elf.find_symbol("kernel_log").unwrap().is_defined());
        assert!(elf.find_symbol("module_exit").is_none());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(Elf64::parse(&[0u8; 8]).err(), Some(Elf64Error::TooSmall));

        let mut obj = build_object(None, &[]);
        obj[0] = 0;
        assert_eq!(Elf64::parse(&obj).err(), Some(Elf64Error::InvalidMagic));

        let mut obj = build_object(None, &[]);
        obj[4] = 1;
        assert_eq!(Elf64::parse(&obj).err(), Some(Elf64Error::Not64Bit));

        let mut obj = build_object(None, &[]);
        obj[5] = 2;
        assert_eq!(Elf64::parse(&obj).err(), Some(Elf64Error::UnsupportedEndian));
    }

    #[test]
    fn test_truncated_section_table() {
        let obj = build_object(None, &[]);
        let truncated = &obj[..obj.len() - 10];
        assert_eq!(
            Elf64::parse(truncated).err(),
            Some(Elf64Error::InvalidSectionHeader)
        );
    }
}
