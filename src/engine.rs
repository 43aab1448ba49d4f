use crate::error::ForgeError;
use crate::options::{BinaryDetection, ForgeOptions};
use crate::types::FileRecord;
use ignore::WalkBuilder;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;
struct Walker {
    inner: ignore::Walk,
}
impl Walker {
    fn new(options: &ForgeOptions) -> Result<Self, ForgeError> {
        let mut builder = WalkBuilder::new(&options.root);
        builder
            .git_ignore(options.respect_gitignore)
            .hidden(!options.include_hidden)
            .max_depth(options.max_depth)
            .follow_links(options.follow_links)
            .sort_by_file_name(|a, b| a.cmp(b))
            .ignore(false);
        if let Some(matcher) = options.ignore_matcher()? {
            let root = options.root.clone();
            builder.filter_entry(move |entry| {
                let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
                !matcher.is_match(relative)
            });
        }
        Ok(Self {
            inner: builder.build(),
        })
    }
    fn into_iter(self) -> impl Iterator<Item = Result<PathBuf, ForgeError>> {
        self.inner.filter_map(|result| match result {
            Ok(entry) if entry.file_type().is_some_and(|t| t.is_file()) => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(e) => Some(Err(ForgeError::Walk(e.to_string()))),
        })
    }
    fn collect_files(self) -> Result<Vec<PathBuf>, ForgeError> {
        self.into_iter().collect()
    }
}

/// Reads `path` as text. `Ok(None)` means the bytes were detected as binary.
fn read_text(
    path: &Path,
    binary_detection: BinaryDetection,
    size_limit: Option<u64>,
) -> Result<Option<String>, ForgeError> {
    if let Some(limit) = size_limit {
        let metadata = fs::metadata(path).map_err(|e| ForgeError::io(path, e))?;
        if metadata.len() > limit {
            return Err(ForgeError::InputTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit,
            });
        }
    }
    let file = File::open(path).map_err(|e| ForgeError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut first_chunk = Vec::with_capacity(4096);
    reader
        .by_ref()
        .take(4096)
        .read_to_end(&mut first_chunk)
        .map_err(|e| ForgeError::io(path, e))?;
    let is_binary = match binary_detection {
        BinaryDetection::Simple => first_chunk.contains(&0),
        BinaryDetection::Accurate => content_inspector::inspect(&first_chunk).is_binary(),
        BinaryDetection::None => false,
    };
    if is_binary {
        #[cfg(feature = "logging")]
        tracing::debug!("Binary file detected: {}", path.display());
        return Ok(None);
    }
    let mut rest = Vec::new();
    reader
        .read_to_end(&mut rest)
        .map_err(|e| ForgeError::io(path, e))?;
    first_chunk.extend_from_slice(&rest);
    Ok(Some(String::from_utf8_lossy(&first_chunk).into_owned()))
}

/// Loads a generated blob from disk.
///
/// # Errors
///
/// Fails on I/O errors, when the file exceeds `options.file_size_limit`, or
/// when it looks binary under `options.binary_detection`.
pub fn load_blob(path: impl AsRef<Path>, options: &ForgeOptions) -> Result<String, ForgeError> {
    let path = path.as_ref();
    #[cfg(feature = "logging")]
    tracing::debug!("Loading blob from {}", path.display());
    read_text(path, options.binary_detection, options.file_size_limit)?
        .ok_or_else(|| ForgeError::BinaryInput(path.to_path_buf()))
}

/// Reads a generated blob from a stream such as stdin, applying the same size
/// limit and binary detection as [`load_blob`]. `source` only names the stream
/// in errors.
///
/// At most `file_size_limit + 1` bytes are read; a larger stream fails with
/// [`ForgeError::InputTooLarge`] whose `size` is the number of bytes read.
pub fn read_blob(
    reader: impl Read,
    source: impl AsRef<Path>,
    options: &ForgeOptions,
) -> Result<String, ForgeError> {
    let source = source.as_ref();
    let mut bytes = Vec::new();
    match options.file_size_limit {
        Some(limit) => {
            reader
                .take(limit.saturating_add(1))
                .read_to_end(&mut bytes)
                .map_err(|e| ForgeError::io(source, e))?;
            if bytes.len() as u64 > limit {
                return Err(ForgeError::InputTooLarge {
                    path: source.to_path_buf(),
                    size: bytes.len() as u64,
                    limit,
                });
            }
        }
        None => {
            let mut reader = reader;
            reader
                .read_to_end(&mut bytes)
                .map_err(|e| ForgeError::io(source, e))?;
        }
    }
    let head = &bytes[..bytes.len().min(4096)];
    let is_binary = match options.binary_detection {
        BinaryDetection::Simple => head.contains(&0),
        BinaryDetection::Accurate => content_inspector::inspect(head).is_binary(),
        BinaryDetection::None => false,
    };
    if is_binary {
        return Err(ForgeError::BinaryInput(source.to_path_buf()));
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Walks `options.root` and turns every text file into a record whose path is
/// relative to the root and `/`-separated. Binary files are skipped; files over
/// the size limit fail the whole pack.
///
/// # Errors
///
/// Fails on walk or I/O errors, invalid ignore patterns, or oversized files.
pub fn pack_directory(options: &ForgeOptions) -> Result<Vec<FileRecord>, ForgeError> {
    #[cfg(feature = "logging")]
    tracing::debug!("Packing directory {}", options.root.display());
    let walker = Walker::new(options)?;
    let paths = walker.collect_files()?;
    #[cfg(not(feature = "parallel"))]
    let records = read_records(paths, options)?;
    #[cfg(feature = "parallel")]
    let records = read_records_parallel(paths, options)?;
    Ok(records.into_iter().flatten().collect())
}

fn to_record(path: &Path, options: &ForgeOptions) -> Result<Option<FileRecord>, ForgeError> {
    let Some(content) = read_text(path, options.binary_detection, options.file_size_limit)? else {
        return Ok(None);
    };
    let relative = path.strip_prefix(&options.root).unwrap_or(path);
    let record_path = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Ok(Some(FileRecord::new(record_path, content)))
}

#[cfg(not(feature = "parallel"))]
fn read_records(
    paths: Vec<PathBuf>,
    options: &ForgeOptions,
) -> Result<Vec<Option<FileRecord>>, ForgeError> {
    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        records.push(to_record(&path, options)?);
    }
    Ok(records)
}

#[cfg(feature = "parallel")]
fn read_records_parallel(
    paths: Vec<PathBuf>,
    options: &ForgeOptions,
) -> Result<Vec<Option<FileRecord>>, ForgeError> {
    paths
        .par_iter()
        .map(|path| to_record(path, options))
        .collect()
}
