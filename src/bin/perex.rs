//! Command line interface for listing and extracting resources of portable executables.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use perex::{
    constants::RESOURCE_MAX_DEPTH, extract_resource, extract_resource_file, extract_resources,
    ExtractError, Image, Resource, ResourceDecoder,
};

#[derive(Parser, Debug)]
#[command(name = "perex", version, about = "PE file resource extractor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Maximum nesting of resource directories before the image is rejected
    #[arg(long, global = true, default_value_t = RESOURCE_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List resources in a PE file
    #[command(name = "list-resources")]
    List {
        /// Input PE file path
        file: PathBuf,
        /// Also print size and codepage of each resource
        #[arg(short, long)]
        long: bool,
    },
    /// Extract a single resource from a PE file by name, e.g. 10/SOMERESOURCE/1033.
    /// Writes to STDOUT if no output file is given.
    #[command(name = "extract-resource")]
    Extract {
        /// Input PE file path
        file: PathBuf,
        /// Resource name as printed by list-resources
        name: String,
        /// Output file path
        output: Option<PathBuf>,
    },
    /// Extract all resources from a PE file into a directory.
    /// The directory structure of the resources is preserved in the output directory.
    #[command(name = "extract-resources")]
    ExtractAll {
        /// Input PE file path
        file: PathBuf,
        /// Output directory
        directory: PathBuf,
    },
}

fn init_logger(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}

fn read_image(file: &Path) -> Result<Image<'static>> {
    Image::parse_file(file).with_context(|| format!("failed to read {}", file.display()))
}

fn read_resources<'a>(
    image: &'a Image<'_>, file: &Path, max_depth: usize,
) -> Result<Vec<Resource<'a>>> {
    let decoder = ResourceDecoder::new().with_max_depth(max_depth);
    image
        .resources_with(&decoder)
        .with_context(|| format!("failed to read resources of {}", file.display()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::List { file, long } => {
            let image = read_image(&file)?;
            let resources = read_resources(&image, &file, cli.max_depth)?;
            let stdout = io::stdout();
            let mut stdout = stdout.lock();
            for resource in &resources {
                if long {
                    writeln!(
                        stdout,
                        "{}\t{}\t{}",
                        resource.name(),
                        resource.data().len(),
                        resource.codepage()
                    )?;
                } else {
                    writeln!(stdout, "{}", resource.name())?;
                }
            }
        }
        Command::Extract { file, name, output } => {
            let image = read_image(&file)?;
            let resources = read_resources(&image, &file, cli.max_depth)?;
            let result = match output {
                Some(output) => extract_resource_file(&resources, &name, output),
                None => extract_resource(&resources, &name, &mut io::stdout().lock()),
            };
            match result {
                Err(ExtractError::NotFound(name)) => {
                    anyhow::bail!("resource '{}' not found in {}", name, file.display())
                }
                result => result?,
            }
        }
        Command::ExtractAll { file, directory } => {
            let image = read_image(&file)?;
            let resources = read_resources(&image, &file, cli.max_depth)?;
            extract_resources(&resources, &directory).with_context(|| {
                format!("failed to extract resources to {}", directory.display())
            })?;
        }
    }
    Ok(())
}

/// Print the error of a failed command and return the process exit status.
fn report(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => {
            log::debug!("{:?}", error);
            eprintln!("Error: {:#}", error);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(&cli);
    log::trace!("{:?}", cli);

    process::exit(report(run(cli)));
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use perex::{constants::*, types::*};
    use zerocopy::IntoBytes;

    use super::*;

    const VIRTUAL_ADDRESS: u32 = 0x2000;

    fn put(data: &mut Vec<u8>, offset: usize, bytes: &[u8]) {
        if data.len() < offset + bytes.len() {
            data.resize(offset + bytes.len(), 0);
        }
        data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn directory_entry(name: u32, data: u32) -> ResourceDirectoryEntry {
        ResourceDirectoryEntry {
            name_offset_or_integer_id:         name,
            data_entry_or_subdirectory_offset: data,
        }
    }

    /// Image with a single `.rsrc` section holding the icon `3/1/1033`.
    fn write_image(path: &Path) {
        let table = ResourceDirectoryTable {
            number_of_id_entries: 1,
            ..Default::default()
        };
        let mut section = Vec::new();
        put(&mut section, 0, table.as_bytes());
        put(
            &mut section,
            16,
            directory_entry(RT_ICON as u32, 24 | RESOURCE_DATA_IS_DIRECTORY).as_bytes(),
        );
        put(&mut section, 24, table.as_bytes());
        put(&mut section, 40, directory_entry(1, 48 | RESOURCE_DATA_IS_DIRECTORY).as_bytes());
        put(&mut section, 48, table.as_bytes());
        put(&mut section, 64, directory_entry(LANGUAGE_ID_EN_US as u32, 72).as_bytes());
        put(
            &mut section,
            72,
            ResourceDataEntry {
                data_rva: VIRTUAL_ADDRESS + 88,
                size:     4,
                codepage: 0,
                reserved: 0,
            }
            .as_bytes(),
        );
        put(&mut section, 88, b"icon");

        let mut image = Vec::new();
        put(&mut image, 0, PE_DOS_MAGIC.as_bytes());
        put(&mut image, PE_PTR_OFFSET as usize, 0x40u32.as_bytes());
        put(&mut image, 0x40, PE_NT_SIGNATURE.as_bytes());
        let coff_header = CoffHeader {
            machine: 0x14c,
            number_of_sections: 1,
            ..Default::default()
        };
        put(&mut image, 0x44, coff_header.as_bytes());
        let section_header = SectionHeader {
            name: u64::from_le_bytes(*b".rsrc\0\0\0"),
            virtual_size: section.len() as u32,
            virtual_address: VIRTUAL_ADDRESS,
            size_of_raw_data: section.len() as u32,
            pointer_to_raw_data: 0x100,
            characteristics: IMAGE_SCN_CNT_INITIALIZED_DATA | IMAGE_SCN_MEM_READ,
            ..Default::default()
        };
        put(&mut image, 0x58, section_header.as_bytes());
        put(&mut image, 0x100, &section);

        fs::write(path, image).unwrap();
    }

    fn run_args(args: &[&str]) -> Result<()> { run(Cli::try_parse_from(args).unwrap()) }

    #[test]
    fn extract_resource_to_file() {
        let directory = tempfile::tempdir().unwrap();
        let file = directory.path().join("app.exe");
        write_image(&file);
        let output = directory.path().join("icon.bin");

        let result = run_args(&[
            "perex",
            "extract-resource",
            file.to_str().unwrap(),
            "3/1/1033",
            output.to_str().unwrap(),
        ]);
        assert_eq!(report(result), 0);
        assert_eq!(fs::read(&output).unwrap(), b"icon");
    }

    #[test]
    fn extract_missing_resource() {
        let directory = tempfile::tempdir().unwrap();
        let file = directory.path().join("app.exe");
        write_image(&file);
        let output = directory.path().join("missing.bin");

        let result = run_args(&[
            "perex",
            "extract-resource",
            file.to_str().unwrap(),
            "3/1/0",
            output.to_str().unwrap(),
        ]);
        let message = format!("{:#}", result.as_ref().unwrap_err());
        assert_eq!(message, format!("resource '3/1/0' not found in {}", file.display()));
        assert_eq!(report(result), 1, "missing resource exits with status 1");
        assert!(!output.exists());
    }

    #[test]
    fn extract_all_resources_to_directory() {
        let directory = tempfile::tempdir().unwrap();
        let file = directory.path().join("app.exe");
        write_image(&file);
        let output = directory.path().join("out");

        let result = run_args(&[
            "perex",
            "extract-resources",
            file.to_str().unwrap(),
            output.to_str().unwrap(),
        ]);
        assert_eq!(report(result), 0);
        assert_eq!(fs::read(output.join("3").join("1").join("1033")).unwrap(), b"icon");
    }

    #[test]
    fn read_missing_image() {
        let directory = tempfile::tempdir().unwrap();
        let file = directory.path().join("missing.exe");

        let result = run_args(&["perex", "list-resources", file.to_str().unwrap()]);
        let message = format!("{:#}", result.as_ref().unwrap_err());
        assert!(message.starts_with(&format!("failed to read {}", file.display())), "{}", message);
        assert_eq!(report(result), 1);
    }

    #[test]
    fn limit_resource_depth() {
        let directory = tempfile::tempdir().unwrap();
        let file = directory.path().join("app.exe");
        write_image(&file);

        let result =
            run_args(&["perex", "--max-depth", "1", "list-resources", file.to_str().unwrap()]);
        let message = format!("{:#}", result.as_ref().unwrap_err());
        assert!(message.starts_with("failed to read resources of"), "{}", message);
        assert_eq!(report(result), 1);
    }
}
