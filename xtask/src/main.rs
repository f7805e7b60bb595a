//! Asset tasks: pack an atom-detail bundle, inspect any bundle.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use atomlens::annotation::parse_atom_annotations;
use atomlens::binding::bind_atoms;
use atomlens::loader::prepare_bundle;
use atomlens::options::SceneOptions;
use atomlens::scene::ModelId;
use clap::{Parser, Subcommand};
use zip::write::SimpleFileOptions;

#[derive(Parser)]
#[command(name = "xtask", about = "atomlens asset tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Zip a geometry file (and optional material file) into a bundle.
    Pack {
        /// Geometry (.obj) file.
        obj: PathBuf,
        /// Material (.mtl) file.
        #[arg(long)]
        mtl: Option<PathBuf>,
        /// Output archive.
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the annotations, fragments and bindings of a bundle.
    Inspect {
        /// Bundle archive.
        bundle: PathBuf,
    },
}

fn entry_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .with_context(|| format!("{} has no usable file name", path.display()))
}

fn pack(obj: &Path, mtl: Option<&Path>, out: &Path) -> Result<()> {
    let geometry = std::fs::read_to_string(obj)
        .with_context(|| format!("reading {}", obj.display()))?;
    if parse_atom_annotations(&geometry).is_empty() {
        eprintln!("warning: {} has no ATOM_ annotations", obj.display());
    }

    let mut files = vec![(entry_name(obj)?, geometry)];
    if let Some(mtl) = mtl {
        let text = std::fs::read_to_string(mtl)
            .with_context(|| format!("reading {}", mtl.display()))?;
        files.push((entry_name(mtl)?, text));
    }

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, text) in &files {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(text.as_bytes())?;
    }
    let bytes = zip.finish()?.into_inner();

    // the bundle must survive the same pipeline the viewer runs
    let prepared = prepare_bundle(&bytes, ModelId(0), &entry_name(obj)?, &SceneOptions::default())
        .context("packed bundle does not load")?;
    std::fs::write(out, &bytes).with_context(|| format!("writing {}", out.display()))?;
    println!(
        "wrote {} ({} bytes, {} fragments, {} atoms bound)",
        out.display(),
        bytes.len(),
        prepared.model.hierarchy.fragment_count(),
        prepared.tables.len()
    );
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    if bytes.is_empty() {
        bail!("{} is empty", path.display());
    }
    let bundle = atomlens::asset::Bundle::from_archive(&bytes)?;
    println!("geometry: {}", bundle.geometry_name);
    println!(
        "material: {}",
        if bundle.material_text.is_some() { "yes" } else { "no" }
    );

    let atoms = parse_atom_annotations(&bundle.geometry_text);
    println!("annotations: {}", atoms.len());
    for atom in &atoms {
        println!(
            "  ATOM_{}: {} {:.3} {:.3} {:.3}",
            atom.index, atom.element, atom.position.x, atom.position.y, atom.position.z
        );
    }

    let mut hierarchy = atomlens::scene::ModelHierarchy::new(
        atomlens::asset::parse_obj(&bundle.geometry_text)?,
        bundle.materials()?,
    );
    let tables = bind_atoms(&mut hierarchy, ModelId(0), &atoms);
    println!("fragments: {}", hierarchy.fragment_count());
    hierarchy.root().visit_fragments(&mut |parent, fragment| {
        let binding = fragment
            .annotation()
            .map_or_else(String::new, |a| format!(" -> atom {} ({})", a.index, a.element));
        println!(
            "  {}/{} [{} triangles, material {}]{binding}",
            parent,
            fragment.name(),
            fragment.geometry().triangle_count(),
            fragment.material().unwrap_or("-"),
        );
    });
    println!("bound: {} of {} atoms", tables.len(), atoms.len());
    Ok(())
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Pack { obj, mtl, out } => pack(&obj, mtl.as_deref(), &out),
        Command::Inspect { bundle } => inspect(&bundle),
    }
}
