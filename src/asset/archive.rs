use std::io::{Cursor, Read};

use crate::error::LoadError;

/// One file inside a model archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    name: String,
    bytes: Vec<u8>,
}

impl ArchiveEntry {
    /// Entry path inside the archive.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the entry name ends with `.{ext}` (ASCII case-insensitive).
    #[must_use]
    pub fn has_extension(&self, ext: &str) -> bool {
        name_has_extension(&self.name, ext)
    }

    /// Decode the entry as UTF-8 text.
    ///
    /// # Errors
    ///
    /// [`LoadError::AssetLoad`] if the bytes are not valid UTF-8.
    pub fn read_as_text(&self) -> Result<String, LoadError> {
        String::from_utf8(self.bytes.clone()).map_err(|e| {
            LoadError::AssetLoad(format!("{} is not UTF-8 text: {e}", self.name))
        })
    }
}

/// Largest decompressed size accepted for a single entry.
pub const MAX_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

fn name_has_extension(name: &str, ext: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, e)| e.eq_ignore_ascii_case(ext))
}

/// Decompress the first file entry for each of `extensions`, in archive
/// order.
///
/// Entries with other extensions are never decompressed; further entries
/// with an extension already taken are skipped with a warning. Each entry
/// is capped at [`MAX_ENTRY_BYTES`].
///
/// # Errors
///
/// [`LoadError::ArchiveFormat`] if the bytes are not a readable zip or a
/// wanted entry is corrupt or too large.
pub fn open_archive(bytes: &[u8], extensions: &[&str]) -> Result<Vec<ArchiveEntry>, LoadError> {
    read_entries(bytes, extensions, MAX_ENTRY_BYTES)
}

fn read_entries(
    bytes: &[u8],
    extensions: &[&str],
    limit: u64,
) -> Result<Vec<ArchiveEntry>, LoadError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| LoadError::ArchiveFormat(e.to_string()))?;

    let mut taken = vec![false; extensions.len()];
    let mut entries = Vec::with_capacity(extensions.len());
    for i in 0..archive.len() {
        let file = archive
            .by_index(i)
            .map_err(|e| LoadError::ArchiveFormat(e.to_string()))?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_owned();
        let Some(slot) = extensions
            .iter()
            .position(|ext| name_has_extension(&name, ext))
        else {
            log::debug!("skipping archive entry {name}");
            continue;
        };
        if taken[slot] {
            log::warn!("ignoring extra .{} entry {name}", extensions[slot]);
            continue;
        }
        taken[slot] = true;

        let mut data = Vec::new();
        let _ = file
            .take(limit + 1)
            .read_to_end(&mut data)
            .map_err(|e| LoadError::ArchiveFormat(format!("{name}: {e}")))?;
        if data.len() as u64 > limit {
            return Err(LoadError::ArchiveFormat(format!(
                "{name} exceeds {limit} bytes"
            )));
        }
        entries.push(ArchiveEntry { name, bytes: data });
    }
    Ok(entries)
}
