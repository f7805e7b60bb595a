// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Core of an interactive 3D chemical structure viewer.
//!
//! Atomlens consumes model bundles (a zip holding OBJ geometry with embedded
//! `# ATOM_<i>: <el> <x> <y> <z>` annotations, plus an optional MTL file),
//! binds the annotations to geometry fragments by name, smooths normals
//! across coincident vertices, and keeps a molecule view and a single-atom
//! detail view in sync with selection and picking.
//!
//! # Key entry points
//!
//! - [`engine::ViewerEngine`] - frame task plus user actions
//! - [`scene::ModeController`] - molecule / atom-detail state machine
//! - [`loader::prepare_bundle`] - the staged bundle pipeline
//! - [`options::Options`] - runtime configuration (service, scene, camera)
//!
//! # Architecture
//!
//! Loads run on a background [`loader::LoadProcessor`] thread that fetches
//! bytes from a [`loader::ModelSource`] and runs every pipeline stage
//! (archive, annotations, geometry, binding, smoothing, fit) before
//! publishing the result through a lock-free triple buffer. The frame task
//! installs a finished model in one step, so nothing partially bound or
//! unsmoothed is ever visible or pickable.

pub mod annotation;
pub mod asset;
pub mod binding;
pub mod camera;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod options;
pub mod picking;
pub mod scene;
