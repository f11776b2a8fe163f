//! **P**ortable **e**xecutable **r**esource **ex**tractor.
//!
//! Supports:
//! * Decoding the resource directory tree of a `.rsrc` section into a flat list of named resources
//! * Locating the resource section in a portable executable image
//! * Writing single resources to files or streams, and mirroring all resources into a directory
//!
//! See [`Image`] for the main entry point for reading resources from a portable executable image,
//! and [`decode`] for decoding raw resource section bytes directly.
//!
//! Resources are named by the path of the resource directory tree leading to them,
//! `<type>/<name-or-id>/<language>`, for example `3/1/1033` or `10/SOMERESOURCE/1033`.
//!
//! # Examples
//!
//! ### Listing resources
//! ```
//! use perex::Image;
//!
//! let image = Image::parse_file(BINARY_PATH)?;
//!
//! for resource in image.resources()? {
//!     println!("{}", resource.name());
//! }
//! ```
//!
//! ### Extracting a resource
//! ```
//! use perex::{find_resource, write_resource_file, Image};
//!
//! let image = Image::parse_file(BINARY_PATH)?;
//! let resources = image.resources()?;
//!
//! if let Some(manifest) = find_resource(&resources, "24/1/1033") {
//!     write_resource_file(manifest, "app.manifest")?;
//! }
//! ```
//!
//! ### Decoding a raw resource section
//! ```
//! use perex::decode;
//!
//! // raw bytes of the `.rsrc` section and its virtual address
//! let resources = decode(&section, virtual_address)?;
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg_hide))]
#![cfg_attr(docsrs, doc(cfg_hide(doc)))]

extern crate alloc;

pub(crate) mod errors;
#[cfg(feature = "std")]
pub(crate) mod extract;
pub(crate) mod image;
pub(crate) mod resource;
pub(crate) mod util;

pub mod constants;
pub mod types;

#[cfg(feature = "std")]
pub use crate::extract::*;
pub use crate::{errors::*, image::*, resource::*};
