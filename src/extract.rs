//! Writing resource data to files, writers and directory trees.

use std::{
    fs,
    io::Write,
    path::{Component, Path, PathBuf},
};

use log::{debug, info};

use crate::{errors::*, resource::*};

/// Write the data of a resource to a writer.
pub fn write_resource<W: Write>(
    resource: &Resource<'_>, writer: &mut W,
) -> Result<(), ExtractError> {
    writer.write_all(resource.data())?;
    writer.flush()?;
    Ok(())
}

/// Write the data of a resource to a file, creating missing parent directories.
pub fn write_resource_file<P: AsRef<Path>>(
    resource: &Resource<'_>, path: P,
) -> Result<(), ExtractError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, resource.data())?;
    debug!("wrote {} ({} bytes) to {}", resource.name(), resource.data().len(), path.display());
    Ok(())
}

/// Returns the path a resource is extracted to below the given directory.
///
/// # Returns
/// Returns an error if a segment of the resource name is not a single plain file name,
/// e.g. if it is empty, `.`, `..`, absolute or has a drive prefix.
pub fn resource_path<P: AsRef<Path>>(
    directory: P, resource: &Resource<'_>,
) -> Result<PathBuf, ExtractError> {
    let mut path = directory.as_ref().to_path_buf();
    for segment in resource.segments() {
        if !is_file_name(segment) {
            return Err(ExtractError::UnsafePath(resource.name().to_string()));
        }
        path.push(segment);
    }
    Ok(path)
}

fn is_file_name(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
        && !segment.contains(':')
}

/// Write all resources into a directory, mirroring their names as paths.
/// All paths are validated before the first file is written.
///
/// # Returns
/// Returns the number of files written.
pub fn extract_resources<P: AsRef<Path>>(
    resources: &[Resource<'_>], directory: P,
) -> Result<usize, ExtractError> {
    let directory = directory.as_ref();
    let paths = resources
        .iter()
        .map(|resource| resource_path(directory, resource))
        .collect::<Result<Vec<_>, _>>()?;
    for (resource, path) in resources.iter().zip(&paths) {
        write_resource_file(resource, path)?;
    }
    info!("extracted {} resources to {}", paths.len(), directory.display());
    Ok(paths.len())
}

/// Write the first resource with the given name to a writer.
///
/// # Returns
/// Returns an error if no resource has the given name.
pub fn extract_resource<W: Write>(
    resources: &[Resource<'_>], name: &str, writer: &mut W,
) -> Result<(), ExtractError> {
    let resource =
        find_resource(resources, name).ok_or_else(|| ExtractError::NotFound(name.to_string()))?;
    write_resource(resource, writer)
}

/// Write the first resource with the given name to a file.
///
/// # Returns
/// Returns an error if no resource has the given name.
pub fn extract_resource_file<P: AsRef<Path>>(
    resources: &[Resource<'_>], name: &str, path: P,
) -> Result<(), ExtractError> {
    let resource =
        find_resource(resources, name).ok_or_else(|| ExtractError::NotFound(name.to_string()))?;
    write_resource_file(resource, path)
}
