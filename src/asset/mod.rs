//! Model bundle ingestion: zip archive access plus the geometry and
//! material text readers.
//!
//! A bundle holds one geometry entry (`.obj`) and at most one material
//! entry (`.mtl`), identified by file suffix.

mod archive;
mod mtl;
mod obj;

pub use archive::{open_archive, ArchiveEntry, MAX_ENTRY_BYTES};
pub use mtl::{parse_mtl, Material, MaterialLibrary};
pub use obj::parse_obj;

use crate::error::LoadError;

/// Text entries pulled out of a model archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Name of the geometry entry inside the archive.
    pub geometry_name: String,
    /// Geometry text (annotations are embedded as comments).
    pub geometry_text: String,
    /// Material text, when the archive carries one.
    pub material_text: Option<String>,
}

impl Bundle {
    /// Open archive bytes and pick out the geometry and material entries.
    ///
    /// The first `.obj` entry in archive order is used; any further ones
    /// are ignored with a warning. Likewise for `.mtl`. Other entries are
    /// not decompressed.
    ///
    /// # Errors
    ///
    /// [`LoadError::ArchiveFormat`] if the archive is unreadable or holds
    /// no `.obj` entry, [`LoadError::AssetLoad`] if an entry is not text.
    pub fn from_archive(bytes: &[u8]) -> Result<Self, LoadError> {
        let entries = open_archive(bytes, &["obj", "mtl"])?;

        let Some(obj) = entries.iter().find(|e| e.has_extension("obj")) else {
            return Err(LoadError::ArchiveFormat(
                "no geometry (.obj) entry in archive".to_owned(),
            ));
        };
        let mtl = entries.iter().find(|e| e.has_extension("mtl"));

        log::debug!(
            "bundle: geometry {} material {}",
            obj.name(),
            mtl.map_or("<none>", ArchiveEntry::name)
        );
        Ok(Self {
            geometry_name: obj.name().to_owned(),
            geometry_text: obj.read_as_text()?,
            material_text: mtl.map(ArchiveEntry::read_as_text).transpose()?,
        })
    }

    /// Parse the material entry, or an empty library when there is none.
    ///
    /// # Errors
    ///
    /// [`LoadError::AssetLoad`] if the material text is malformed.
    pub fn materials(&self) -> Result<MaterialLibrary, LoadError> {
        self.material_text
            .as_deref()
            .map_or_else(|| Ok(MaterialLibrary::default()), parse_mtl)
    }
}
