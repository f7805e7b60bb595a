//! Fixed perspective camera and pointer ray unprojection.

mod core;

pub use self::core::{screen_to_ndc, Camera};
