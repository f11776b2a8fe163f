//! Decoding of the resource directory in the resource section.
//! The resource section contains the resource directory tree and the resource data.
//! See <https://learn.microsoft.com/en-us/windows/win32/debug/pe-format#the-rsrc-section> for more information.
//!
//! The tree is flattened into a list of [`Resource`]s named by the path leading to them,
//! in the order the entries are stored in the section.

use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;

use debug_ignore::DebugIgnore;

use crate::{constants::*, errors::*, types::*, util::*};


/// Resource decoded from the resource directory.
///
/// The data is borrowed from the resource section it was decoded from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Resource<'a> {
    pub(crate) name:     String,
    pub(crate) data:     DebugIgnore<&'a [u8]>,
    pub(crate) codepage: u32,
}
impl<'a> Resource<'a> {
    /// Returns the path of the resource in the resource directory, e.g. `3/1/1033`.
    /// For well-formed images the segments are the resource type, name and language.
    pub fn name(&self) -> &str { &self.name }

    /// Returns the raw resource data.
    pub fn data(&self) -> &'a [u8] { *self.data }

    /// Returns the codepage of the data as stored in the resource data entry.
    pub fn codepage(&self) -> u32 { self.codepage }

    /// Returns the segments of the resource name.
    pub fn segments(&self) -> impl Iterator<Item = &str> { self.name.split('/') }
}

/// Returns the first resource with exactly the given name.
pub fn find_resource<'r, 'a>(
    resources: &'r [Resource<'a>], name: &str,
) -> Option<&'r Resource<'a>> {
    resources.iter().find(|resource| resource.name == name)
}

/// Decode the resource directory in a resource section with the default limits.
/// See [`ResourceDecoder::decode`].
pub fn decode(
    section: &[u8], virtual_address: u32,
) -> Result<Vec<Resource<'_>>, ResourceError> {
    ResourceDecoder::default().decode(section, virtual_address)
}

/// Resource directory decoder.
///
/// Holds the limits guarding against cyclic or excessively large directory trees.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ResourceDecoder {
    max_depth:      usize,
    max_entries:    usize,
    max_name_bytes: usize,
}
impl Default for ResourceDecoder {
    fn default() -> Self {
        Self {
            max_depth:      RESOURCE_MAX_DEPTH,
            max_entries:    RESOURCE_MAX_ENTRIES,
            max_name_bytes: RESOURCE_MAX_NAME_BYTES,
        }
    }
}

/// Work done so far in a single decode, checked against the decoder limits.
#[derive(Debug, Default)]
struct DecodeBudget {
    entries:    usize,
    name_bytes: usize,
}
impl ResourceDecoder {
    pub fn new() -> Self { Self::default() }

    /// Set the maximum directory nesting. The root directory is at depth 0.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the maximum number of directory entries visited in a single decode.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the maximum total length in bytes of all resource paths built in a single decode.
    /// This includes the paths of directories, not only those of the returned resources.
    pub fn with_max_name_bytes(mut self, max_name_bytes: usize) -> Self {
        self.max_name_bytes = max_name_bytes;
        self
    }

    pub fn max_depth(&self) -> usize { self.max_depth }

    pub fn max_entries(&self) -> usize { self.max_entries }

    pub fn max_name_bytes(&self) -> usize { self.max_name_bytes }

    /// Decode the resource directory at the start of a resource section.
    /// The virtual address is used to resolve the resource data offsets and has to correspond to the virtual address in the section table header of the source image.
    ///
    /// # Returns
    /// Returns the resources in directory order, or an error if
    /// - a directory, entry, name or data entry lies past the end of the section,
    /// - resource data lies outside the section,
    /// - the tree is nested deeper than the maximum depth, has more entries than the maximum,
    ///   or builds more path bytes than the maximum.
    pub fn decode<'a>(
        &self, section: &'a [u8], virtual_address: u32,
    ) -> Result<Vec<Resource<'a>>, ResourceError> {
        let mut budget = DecodeBudget::default();
        self.decode_table(section, virtual_address, 0, "", 0, &mut budget)
    }

    fn decode_table<'a>(
        &self, section: &'a [u8], virtual_address: u32, table_offset: usize, prefix: &str,
        level: usize, budget: &mut DecodeBudget,
    ) -> Result<Vec<Resource<'a>>, ResourceError> {
        if level > self.max_depth {
            return Err(ResourceError::MalformedTree(format!(
                "resource directory at {:#x} nested deeper than {} levels",
                table_offset, self.max_depth
            )));
        }
        let table = read_at::<ResourceDirectoryTable>(section, table_offset)?;

        let mut resources = Vec::new();

        let mut entry_offset = table_offset + RESOURCE_DIRECTORY_TABLE_SIZE as usize;
        for _ in 0..table.number_of_entries() {
            budget.entries += 1;
            if budget.entries > self.max_entries {
                return Err(ResourceError::MalformedTree(format!(
                    "resource directory has more than {} entries",
                    self.max_entries
                )));
            }

            let entry = read_at::<ResourceDirectoryEntry>(section, entry_offset)?;
            let name = ResourceEntryName::parse(section, entry.name_offset_or_integer_id)?;
            let segment = name.to_string();
            budget.name_bytes += prefix.len() + segment.len();
            if budget.name_bytes > self.max_name_bytes {
                return Err(ResourceError::MalformedTree(format!(
                    "resource names exceed {} bytes",
                    self.max_name_bytes
                )));
            }
            let path = format!("{}{}", prefix, segment);

            let target = entry.data_entry_or_subdirectory_offset;
            if target & RESOURCE_DATA_IS_DIRECTORY != 0 {
                resources.extend(self.decode_table(
                    section,
                    virtual_address,
                    (target ^ RESOURCE_DATA_IS_DIRECTORY) as usize,
                    &format!("{}/", path),
                    level + 1,
                    budget,
                )?);
            } else {
                // only the address and size are required, the codepage is read if present
                let target = target as usize;
                let data_rva = read_at::<u32>(section, target)?;
                let size = read_at::<u32>(section, target + 4)?;
                let codepage = read_at::<u32>(section, target + 8).unwrap_or(0);
                resources.push(Resource {
                    name: path,
                    data: resource_data(section, virtual_address, data_rva, size)?.into(),
                    codepage,
                });
            }

            entry_offset += RESOURCE_DIRECTORY_ENTRY_SIZE as usize;
        }
        Ok(resources)
    }
}

/// Resolve the data described by a data entry. The data address is virtual and relative to the section.
fn resource_data(
    section: &[u8], virtual_address: u32, data_rva: u32, size: u32,
) -> Result<&[u8], ResourceError> {
    let address = data_rva as i64 - virtual_address as i64;
    if address < 0 || address as u64 + size as u64 > section.len() as u64 {
        return Err(ResourceError::OutOfBounds(address, size, section.len()));
    }
    let address = address as usize;
    Ok(&section[address..address + size as usize])
}

/// Resource directory entry name.
/// This can either be a raw id or a name.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ResourceEntryName {
    // raw id
    ID(u32),
    // decoded string
    Name(String),
}
impl ResourceEntryName {
    fn parse(section: &[u8], id: u32) -> Result<Self, ReadError> {
        if id & RESOURCE_NAME_IS_STRING != 0 {
            let address = (id ^ RESOURCE_NAME_IS_STRING) as usize;
            let length = read_at::<u16>(section, address)? as usize;
            // size is in 16 bit characters so it needs to be doubled
            let data = slice_at(section, address + 2, length * 2)?;
            Ok(Self::Name(read_u16_string(data)))
        } else {
            Ok(Self::ID(id))
        }
    }
}
/// Formats the name as path segment.
/// Names have `%`, `/`, `\` and `:` escaped as `%25`, `%2F`, `%5C` and `%3A`,
/// so they never split the path or name a drive or alternate data stream.
impl fmt::Display for ResourceEntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ID(id) => write!(f, "{}", id),
            Self::Name(name) => {
                for c in name.chars() {
                    match c {
                        '%' => f.write_str("%25")?,
                        '/' => f.write_str("%2F")?,
                        '\\' => f.write_str("%5C")?,
                        ':' => f.write_str("%3A")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                Ok(())
            }
        }
    }
}
