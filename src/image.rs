//! Portable executable image representation.
//!
//! Only the headers needed to find sections are parsed: the DOS header, the PE signature, the COFF header and the section table.
//! See <https://learn.microsoft.com/en-us/windows/win32/debug/pe-format> for more information.

use alloc::{
    borrow::Cow,
    format,
    string::{String, ToString},
    vec::Vec,
};

use ahash::RandomState;
use indexmap::IndexMap;
use log::{debug, warn};

use crate::{constants::*, errors::*, resource::*, types::*, util::*};

/// Portable executable image representation.
///
/// This struct is the main entry point for reading the resources of a portable executable image.
#[derive(Debug, Clone)]
pub struct Image<'a> {
    pub(crate) image: Cow<'a, [u8]>,

    pub(crate) coff_header:   CoffHeader,
    pub(crate) section_table: IndexMap<String, SectionHeader, RandomState>,
}

impl PartialEq for Image<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.coff_header == other.coff_header && self.section_table == other.section_table
    }
}
impl Eq for Image<'_> {}

impl<'a> Image<'a> {
    /// Parse a portable executable image from a byte slice.
    ///
    /// # Returns
    /// Returns the `Image`, or an error if the byte slice is not a valid portable executable image or its section table is truncated.
    pub fn parse<R: Into<Cow<'a, [u8]>>>(image: R) -> Result<Self, ImageReadError> {
        let image = image.into();

        let pe_dos_magic = read_at::<u16>(&image, 0)?;
        debug!("pe_dos_magic: {:#x?}", pe_dos_magic);
        if pe_dos_magic != PE_DOS_MAGIC {
            return Err(ImageReadError::InvalidHeader("no dos magic".into()));
        }

        let pe_signature_offset = read_at::<u32>(&image, PE_PTR_OFFSET as usize)? as usize;
        debug!("pe_signature_offset: {:#x?}", pe_signature_offset);

        let pe_signature = read_at::<u32>(&image, pe_signature_offset)?;
        debug!("pe_signature: {:#x?}", pe_signature);
        if pe_signature != PE_NT_SIGNATURE {
            return Err(ImageReadError::InvalidHeader("no pe signature".into()));
        }

        let coff_header_offset = pe_signature_offset + 4;
        let coff_header = read_at::<CoffHeader>(&image, coff_header_offset)?;
        debug!("{:#x?}: {:#x?}", coff_header_offset, coff_header);

        // the optional header is not needed to find sections, skip it by its declared size
        let section_table_offset =
            coff_header_offset + 20 + coff_header.size_of_optional_header as usize;
        let mut section_table = IndexMap::with_hasher(RandomState::new());
        for index in 0..coff_header.number_of_sections as usize {
            let offset = section_table_offset + index * PE_SECTION_HEADER_SIZE as usize;
            let section_header = read_at::<SectionHeader>(&image, offset)?;
            let name = section_header.name().unwrap_or("?".to_string());
            debug!("{:#x?}: {}: {:#x?}", offset, name, section_header);
            if section_table.contains_key(&name) {
                warn!("duplicate section {} at {:#x?}, keeping the first one", name, offset);
                continue;
            }
            section_table.insert(name, section_header);
        }

        Ok(Self {
            image,
            coff_header,
            section_table,
        })
    }

    #[cfg(feature = "std")]
    /// Parse a portable executable image from a file.
    ///
    /// # Returns
    /// Returns the `Image`, or an error if the file could not be read or is not a valid portable executable image.
    pub fn parse_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ImageReadError> {
        let data = std::fs::read(path)?;
        Self::parse(data)
    }

    #[cfg(feature = "std")]
    /// Parse a portable executable image from a reader.
    ///
    /// # Returns
    /// Returns the `Image`, or an error if the reader could not be read or is not a valid portable executable image.
    pub fn parse_reader<R: std::io::Read>(reader: &mut R) -> Result<Self, ImageReadError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::parse(data)
    }

    /// Returns the raw image data.
    pub fn data(&self) -> &[u8] { &self.image }

    /// Returns the parsed coff header.
    pub fn coff_header(&self) -> &CoffHeader { &self.coff_header }

    /// Returns the names of all sections in section table order.
    pub fn section_names(&self) -> Vec<&str> {
        self.section_table.keys().map(|name| name.as_str()).collect()
    }

    /// Returns the section header of the first section with the given name.
    pub fn section(&self, name: &str) -> Option<&SectionHeader> { self.section_table.get(name) }

    /// Returns the raw data of a section as stored in the image.
    ///
    /// # Returns
    /// Returns an error if the section data lies outside the image.
    pub fn section_data(&self, section: &SectionHeader) -> Result<&[u8], ImageReadError> {
        let start = section.pointer_to_raw_data as usize;
        let size = section.size_of_raw_data as usize;
        slice_at(&self.image, start, size).map_err(|_| {
            ImageReadError::InvalidSection(format!(
                "{} points outside image: {:#x} + {:#x} > {:#x}",
                section.name().unwrap_or("?".to_string()),
                start,
                size,
                self.image.len()
            ))
        })
    }

    /// Returns the raw data and the virtual address of the resource section.
    ///
    /// # Returns
    /// Returns an error if the image has no resource section or its data lies outside the image.
    pub fn resource_section(&self) -> Result<(&[u8], u32), ImageReadError> {
        let section = self
            .section(RESOURCE_SECTION_NAME)
            .ok_or_else(|| ImageReadError::MissingSection(RESOURCE_SECTION_NAME.into()))?;
        let data = self.section_data(section)?;
        let virtual_address = section.virtual_address;
        debug!(
            "found resource section: {:#x?} bytes at virtual address {:#x?}",
            data.len(),
            virtual_address
        );
        Ok((data, virtual_address))
    }

    /// Decode all resources in the resource section with the default limits.
    ///
    /// # Returns
    /// Returns the resources in directory order, or an error if the resource section is missing or its directory is malformed.
    pub fn resources(&self) -> Result<Vec<Resource<'_>>, ImageReadError> {
        self.resources_with(&ResourceDecoder::default())
    }

    /// Decode all resources in the resource section with the given decoder.
    pub fn resources_with(
        &self, decoder: &ResourceDecoder,
    ) -> Result<Vec<Resource<'_>>, ImageReadError> {
        let (data, virtual_address) = self.resource_section()?;
        let resources = decoder.decode(data, virtual_address)?;
        debug!("decoded {} resources", resources.len());
        Ok(resources)
    }
}
