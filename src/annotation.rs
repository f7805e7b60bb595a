//! Atom annotations embedded as comment lines in geometry text.
//!
//! A molecule bundle carries one comment per atom ahead of the geometry:
//!
//! ```text
//! # ATOM_2: O 1.500 0.800 0.800
//! ```
//!
//! Lines that do not have exactly this shape are not annotations and are
//! skipped silently; decorative comments (`# ATOM_INFO: ...`,
//! `# ATOM_DATA: O 2`) live alongside them.

use glam::Vec3;

/// One atom described by the bundle's metadata comments.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Atom index, unique within a well-formed bundle.
    pub index: u32,
    /// Element symbol as written (`"O"`, `"Cl"`).
    pub element: String,
    /// Atom center in model space.
    pub position: Vec3,
}

/// Extract every atom annotation from `text`, in line order.
///
/// Duplicate indices are kept; consumers that look records up by index use
/// the first occurrence (see [`first_by_index`]).
#[must_use]
pub fn parse_atom_annotations(text: &str) -> Vec<AtomRecord> {
    text.lines().filter_map(parse_annotation_line).collect()
}

/// Parse a single `# ATOM_<index>: <element> <x> <y> <z>` line.
#[must_use]
pub fn parse_annotation_line(line: &str) -> Option<AtomRecord> {
    let body = line.trim().strip_prefix('#')?.trim_start();
    let rest = body.strip_prefix("ATOM_")?;
    let (index, fields) = rest.split_once(':')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = index.parse::<u32>().ok()?;

    let mut tokens = fields.split_whitespace();
    let element = tokens.next()?;
    if !element.chars().all(char::is_alphanumeric) {
        return None;
    }
    let x = parse_decimal(tokens.next()?)?;
    let y = parse_decimal(tokens.next()?)?;
    let z = parse_decimal(tokens.next()?)?;
    if tokens.next().is_some() {
        return None;
    }

    Some(AtomRecord {
        index,
        element: element.to_owned(),
        position: Vec3::new(x, y, z),
    })
}

/// First record in `records` carrying `index`.
#[must_use]
pub fn first_by_index(records: &[AtomRecord], index: u32) -> Option<&AtomRecord> {
    records.iter().find(|r| r.index == index)
}

/// Optionally signed decimal with optional fraction. Rejects exponents,
/// `inf` and `NaN`, which `f32::from_str` would otherwise accept.
fn parse_decimal(token: &str) -> Option<f32> {
    let digits = token
        .strip_prefix('-')
        .or_else(|| token.strip_prefix('+'))
        .unwrap_or(token);
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !all_digits(whole) || !all_digits(frac) {
        return None;
    }
    token.parse().ok()
}
