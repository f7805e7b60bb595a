//! Headless atomlens driver.
//!
//! Loads a molecule from the model service, logs its atoms, picks at the
//! viewport centre and optionally round-trips through an element's detail
//! view.

use std::path::Path;
use std::time::Duration;

use atomlens::engine::{StatusMessage, ViewerEngine};
use atomlens::loader::{HttpModelSource, LoadKind};
use atomlens::options::Options;
use atomlens::picking::PickOutcome;

const FRAME: Duration = Duration::from_millis(16);

struct Args {
    formula: String,
    element: Option<String>,
    options: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut options = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--options" {
            options = Some(args.next().ok_or("--options needs a path")?);
        } else {
            positional.push(arg);
        }
    }
    let mut positional = positional.into_iter();
    let formula = positional
        .next()
        .ok_or("Usage: atomlens <FORMULA> [ELEMENT] [--options <toml>]")?;
    Ok(Args {
        formula,
        element: positional.next(),
        options,
    })
}

fn wait_for(engine: &mut ViewerEngine, kind: LoadKind) -> Result<(), String> {
    while engine.is_loading(kind) {
        std::thread::sleep(FRAME);
        engine.tick(FRAME.as_secs_f32());
    }
    match engine.status() {
        StatusMessage::Error(e) => Err(e.clone()),
        StatusMessage::Info(msg) => {
            log::info!("{msg}");
            Ok(())
        }
        _ => Ok(()),
    }
}

fn log_scene(engine: &ViewerEngine) {
    for atom in engine.atom_list() {
        log::info!(
            "  atom {:>3} {:<2} ({:.3}, {:.3}, {:.3})",
            atom.index,
            atom.element,
            atom.position.x,
            atom.position.y,
            atom.position.z
        );
    }
    let summary: Vec<String> = engine
        .element_counts()
        .iter()
        .map(|(el, n)| format!("{el}{n}"))
        .collect();
    log::info!("composition: {}", summary.join(" "));
}

fn run(args: Args) -> Result<(), String> {
    let options = match &args.options {
        Some(path) => Options::load(Path::new(path)).map_err(|e| e.to_string())?,
        None => Options::default(),
    };
    let source = HttpModelSource::new(options.network.clone());
    let mut engine = ViewerEngine::new(Box::new(source), options).map_err(|e| e.to_string())?;

    engine
        .submit_formula(&args.formula)
        .map_err(|e| e.to_string())?;
    wait_for(&mut engine, LoadKind::Molecule)?;
    log_scene(&engine);

    let (w, h) = engine.viewport();
    match engine.pick_at(w as f32 / 2.0, h as f32 / 2.0) {
        PickOutcome::Atom(atom) => log::info!("centre pick: {} {}", atom.element, atom.index),
        other => log::info!("centre pick: {other:?}"),
    }

    let Some(element) = args.element else {
        return Ok(());
    };
    let atom = engine
        .atom_list()
        .into_iter()
        .find(|a| a.element == element)
        .ok_or_else(|| format!("{} has no {element} atom", args.formula))?;
    let _ = engine.select_atom(atom.index);
    engine.show_atom_detail().map_err(|e| e.to_string())?;
    wait_for(&mut engine, LoadKind::AtomDetail)?;
    log_scene(&engine);

    if engine.back_to_molecule() {
        log::info!("back to {}: {} atoms", args.formula, engine.atom_list().len());
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
