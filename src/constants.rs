//! Windows API and binary constants.

#![allow(non_upper_case_globals)]

pub type DWORD = u32;
pub type WORD = u16;
pub type LANGID = WORD;


// https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-lcid/a9eac961-e77d-41a6-90a5-ce1a8b0cdb9c
pub const LANGUAGE_ID_EN_US: LANGID = 1033; // 0x0409, en-US


// https://docs.microsoft.com/en-us/windows/win32/debug/pe-format

pub const PE_DOS_MAGIC: WORD = 0x5a4d; // MZ
pub const PE_PTR_OFFSET: DWORD = 0x03c;
pub const PE_NT_SIGNATURE: DWORD = 0x00004550; // PE00
pub const PE_SECTION_HEADER_SIZE: DWORD = 40;

pub const RESOURCE_SECTION_NAME: &str = ".rsrc";


// https://learn.microsoft.com/en-us/windows/win32/debug/pe-format#the-rsrc-section

/// High bit of a directory entry name field: the low 31 bits are a string offset instead of an id.
pub const RESOURCE_NAME_IS_STRING: DWORD = 0x80000000;
/// High bit of a directory entry data field: the low 31 bits are a subdirectory offset instead of a data entry offset.
pub const RESOURCE_DATA_IS_DIRECTORY: DWORD = 0x80000000;
pub const RESOURCE_DIRECTORY_TABLE_SIZE: DWORD = 16;
pub const RESOURCE_DIRECTORY_ENTRY_SIZE: DWORD = 8;

/// Default maximum nesting of resource directories. Valid images nest 3 levels deep.
pub const RESOURCE_MAX_DEPTH: usize = 32;
/// Default maximum number of directory entries visited while decoding a resource section.
pub const RESOURCE_MAX_ENTRIES: usize = 1 << 20;
/// Default maximum total length of all resource paths built while decoding a resource section.
pub const RESOURCE_MAX_NAME_BYTES: usize = 1 << 26;


// https://docs.microsoft.com/en-us/windows/win32/menurc/resource-types

pub const RT_CURSOR: WORD = 0x01;
pub const RT_BITMAP: WORD = 0x02;
pub const RT_ICON: WORD = 0x03;
pub const RT_MENU: WORD = 0x04;
pub const RT_DIALOG: WORD = 0x05;
pub const RT_STRING: WORD = 0x06;
pub const RT_FONTDIR: WORD = 0x07;
pub const RT_FONT: WORD = 0x08;
pub const RT_ACCELERATOR: WORD = 0x09;
pub const RT_RCDATA: WORD = 0x0A;
pub const RT_MESSAGETABLE: WORD = 0x0B;
pub const RT_GROUP_CURSOR: WORD = 0x0C;
pub const RT_GROUP_ICON: WORD = 0x0E;
pub const RT_VERSION: WORD = 0x10;
pub const RT_DLGINCLUDE: WORD = 0x11;
pub const RT_PLUGPLAY: WORD = 0x13;
pub const RT_VXD: WORD = 0x14;
pub const RT_ANICURSOR: WORD = 0x15;
pub const RT_ANIICON: WORD = 0x16;
pub const RT_HTML: WORD = 0x17;
pub const RT_MANIFEST: WORD = 0x18;


// https://docs.microsoft.com/en-us/windows/win32/debug/pe-format#section-flags

pub const IMAGE_SCN_CNT_INITIALIZED_DATA: DWORD = 0x00000040;
pub const IMAGE_SCN_MEM_READ: DWORD = 0x40000000;
