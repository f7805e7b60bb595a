//! Bundle bytes to a display-ready model, one typed stage at a time.

use super::remote::remote_error_detail;
use crate::annotation::{parse_atom_annotations, AtomRecord};
use crate::asset::{parse_obj, Bundle};
use crate::binding::{bind_atoms, BindingTables};
use crate::error::LoadError;
use crate::geometry::ModelTransform;
use crate::options::SceneOptions;
use crate::scene::{LoadedModel, ModelHierarchy, ModelId};

/// A model that went through every load stage and can be shown as is.
#[derive(Debug, Clone)]
pub struct PreparedModel {
    /// Bound, smoothed and placed model.
    pub model: LoadedModel,
    /// Binding tables produced for it.
    pub tables: BindingTables,
    /// Atom records parsed from its geometry text.
    pub atoms: Vec<AtomRecord>,
}

/// Run the load stages over downloaded bytes.
///
/// Stages, in order: empty check, JSON error sniffing, archive opening,
/// annotation parsing, geometry and material building, binding, normal
/// smoothing and fit placement. The first failing stage ends the load.
pub fn prepare_bundle(
    bytes: &[u8],
    model_id: ModelId,
    source: &str,
    options: &SceneOptions,
) -> Result<PreparedModel, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyResponse);
    }
    if let Some(detail) = remote_error_detail(bytes) {
        return Err(LoadError::Remote(detail));
    }

    let bundle = Bundle::from_archive(bytes)?;
    let atoms = parse_atom_annotations(&bundle.geometry_text);
    log::debug!(
        "{source}: {} atom annotations in {}",
        atoms.len(),
        bundle.geometry_name
    );

    let root = parse_obj(&bundle.geometry_text)?;
    let materials = bundle.materials()?;
    let mut hierarchy = ModelHierarchy::new(root, materials);
    for fragment in hierarchy.fragments() {
        if let Some(name) = fragment.material() {
            if hierarchy.materials().get(name).is_none() {
                log::debug!("{source}: material {name} is not defined");
            }
        }
    }

    let tables = bind_atoms(&mut hierarchy, model_id, &atoms);
    hierarchy.smooth_all(options.normal_precision);
    let transform = ModelTransform::fitted(hierarchy.bounds(), options);
    log::debug!(
        "{source}: centred on {:?}, scale {:.3}",
        transform.center,
        transform.scale
    );

    Ok(PreparedModel {
        model: LoadedModel {
            id: model_id,
            source: source.to_owned(),
            hierarchy,
            transform,
        },
        tables,
        atoms,
    })
}
