use super::caster::{MeshRayCaster, RayCaster};
use super::ray::Ray;
use crate::annotation::AtomRecord;
use crate::scene::{SceneContext, SceneMode};

/// Result of resolving one pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    /// An atom fragment was hit and is now selected and highlighted.
    Atom(AtomRecord),
    /// The nearest hit carries no atom (a bond or helper shape).
    NonAtom,
    /// Nothing was hit. Selection is untouched.
    NoHit,
    /// Picking is off in the current mode; no ray was cast.
    Inactive,
}

/// Maps a world-space pointer ray to an atom via the live binding tables.
#[derive(Debug, Clone, Default)]
pub struct SelectionResolver<C = MeshRayCaster> {
    caster: C,
}

impl<C: RayCaster> SelectionResolver<C> {
    /// Resolver backed by `caster`.
    #[must_use]
    pub fn new(caster: C) -> Self {
        Self { caster }
    }

    /// Resolve `ray` against the molecule group.
    ///
    /// Only active in [`SceneMode::Molecule`]. An atom hit selects the atom
    /// and moves the highlight (`highlight` emissive) onto its fragment; a
    /// non-atom hit clears both selection and highlight.
    pub fn resolve(
        &self,
        mode: SceneMode,
        context: &mut SceneContext,
        ray: Ray,
        highlight: [f32; 3],
    ) -> PickOutcome {
        if mode != SceneMode::Molecule {
            return PickOutcome::Inactive;
        }
        let Some(model) = context.molecule().model() else {
            return PickOutcome::NoHit;
        };
        let Some(hit) = self
            .caster
            .cast(ray, &model.hierarchy, model.transform.matrix())
        else {
            return PickOutcome::NoHit;
        };

        match context.tables().annotation(hit.fragment) {
            Some(annotation) => {
                let atom = AtomRecord {
                    index: annotation.index,
                    element: annotation.element.clone(),
                    position: annotation.position,
                };
                log::debug!(
                    "picked atom {} ({}) at distance {:.3}",
                    atom.index,
                    atom.element,
                    hit.distance
                );
                context.set_selection(Some(atom.clone()));
                context.highlight(Some(hit.fragment), highlight);
                PickOutcome::Atom(atom)
            }
            None => {
                log::debug!("picked non-atom fragment {:?}", hit.fragment);
                context.set_selection(None);
                context.highlight(None, highlight);
                PickOutcome::NonAtom
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::annotation::parse_atom_annotations;
    use crate::asset::{parse_obj, MaterialLibrary};
    use crate::binding::bind_atoms;
    use crate::geometry::ModelTransform;
    use crate::scene::{LoadedModel, ModeController, ModelHierarchy, ModelId};

    // atom_C_0 square around x = -2, bond_0 square around x = +2, both at z = 0
    const OBJ: &str = "o molecule
v -3 -1 0
v -1 -1 0
v -1 1 0
v -3 1 0
v 1 -1 0
v 3 -1 0
v 3 1 0
v 1 1 0
g atom_C_0
f 1 2 3 4
g bond_0
f 5 6 7 8
";

    fn controller() -> ModeController {
        let atoms = parse_atom_annotations("# ATOM_0: C -2.000 0.000 0.000\n");
        let mut hierarchy = ModelHierarchy::new(parse_obj(OBJ).unwrap(), MaterialLibrary::default());
        let tables = bind_atoms(&mut hierarchy, ModelId(1), &atoms);
        let model = LoadedModel {
            id: ModelId(1),
            source: "CH4".to_owned(),
            hierarchy,
            transform: ModelTransform::default(),
        };
        let mut c = ModeController::new();
        c.install_molecule(model, tables, atoms);
        c
    }

    fn down_at(x: f32) -> Ray {
        Ray::new(Vec3::new(x, 0.0, 5.0), Vec3::NEG_Z)
    }

    const GLOW: [f32; 3] = [0.27; 3];

    #[test]
    fn atom_hit_selects_and_highlights() {
        let mut c = controller();
        let resolver = SelectionResolver::<MeshRayCaster>::default();
        let mode = c.mode();
        let outcome = resolver.resolve(mode, c.context_mut(), down_at(-2.0), GLOW);
        let PickOutcome::Atom(atom) = outcome else {
            unreachable!("expected atom hit, got {outcome:?}");
        };
        assert_eq!(atom.element, "C");
        assert_eq!(atom.index, 0);
        assert_eq!(atom.position, Vec3::new(-2.0, 0.0, 0.0));

        let ctx = c.context();
        assert_eq!(ctx.selection(), Some(&atom));
        let id = ctx.highlighted().unwrap();
        let frag = ctx.molecule().model().unwrap().hierarchy.fragment(id).unwrap();
        assert_eq!(frag.name(), "atom_C_0");
        assert_eq!(frag.emissive(), GLOW);
    }

    #[test]
    fn bond_hit_clears_selection_and_highlight() {
        let mut c = controller();
        let resolver = SelectionResolver::<MeshRayCaster>::default();
        let _ = resolver.resolve(SceneMode::Molecule, c.context_mut(), down_at(-2.0), GLOW);
        let highlighted = c.context().highlighted().unwrap();

        let outcome = resolver.resolve(SceneMode::Molecule, c.context_mut(), down_at(2.0), GLOW);
        assert_eq!(outcome, PickOutcome::NonAtom);
        let ctx = c.context();
        assert!(ctx.selection().is_none());
        assert!(ctx.highlighted().is_none());
        let model = &ctx.molecule().model().unwrap().hierarchy;
        assert_eq!(model.fragment(highlighted).unwrap().emissive(), [0.0; 3]);
    }

    #[test]
    fn miss_leaves_selection() {
        let mut c = controller();
        let resolver = SelectionResolver::<MeshRayCaster>::default();
        let _ = resolver.resolve(SceneMode::Molecule, c.context_mut(), down_at(-2.0), GLOW);
        let outcome = resolver.resolve(SceneMode::Molecule, c.context_mut(), down_at(10.0), GLOW);
        assert_eq!(outcome, PickOutcome::NoHit);
        assert_eq!(c.context().selection().unwrap().index, 0);
        assert!(c.context().highlighted().is_some());
    }

    #[test]
    fn inert_in_detail_mode() {
        let mut c = controller();
        let resolver = SelectionResolver::<MeshRayCaster>::default();
        let outcome = resolver.resolve(SceneMode::AtomDetail, c.context_mut(), down_at(-2.0), GLOW);
        assert_eq!(outcome, PickOutcome::Inactive);
        assert!(c.context().selection().is_none());
    }

    #[test]
    fn empty_scene_is_no_hit() {
        let mut c = ModeController::new();
        let resolver = SelectionResolver::new(MeshRayCaster);
        let outcome = resolver.resolve(SceneMode::Molecule, c.context_mut(), down_at(0.0), GLOW);
        assert_eq!(outcome, PickOutcome::NoHit);
    }
}
