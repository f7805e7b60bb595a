use crate::error::LoadError;

/// Surface appearance parsed from a material definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name referenced by `usemtl`.
    pub name: String,
    /// Ambient color (`Ka`).
    pub ambient: [f32; 3],
    /// Diffuse color (`Kd`).
    pub diffuse: [f32; 3],
    /// Specular color (`Ks`).
    pub specular: [f32; 3],
    /// Specular exponent (`Ns`).
    pub shininess: f32,
    /// Opacity (`d`, or `1 - Tr`).
    pub opacity: f32,
    /// Illumination model (`illum`).
    pub illumination: u32,
}

impl Material {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ambient: [0.0; 3],
            diffuse: [0.8; 3],
            specular: [0.0; 3],
            shininess: 0.0,
            opacity: 1.0,
            illumination: 2,
        }
    }
}

/// Materials of one bundle, in definition order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    /// Look up a material by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Number of materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Iterate materials in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }
}

/// Parse material definition text.
///
/// Keywords are matched case-insensitively; unknown statements and
/// statements before the first `newmtl` are ignored.
///
/// # Errors
///
/// [`LoadError::AssetLoad`] naming the first malformed line.
pub fn parse_mtl(text: &str) -> Result<MaterialLibrary, LoadError> {
    let mut materials: Vec<Material> = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let keyword = keyword.to_ascii_lowercase();
        let rest = rest.trim();

        if keyword == "newmtl" {
            materials.push(Material::named(rest));
            continue;
        }
        let Some(current) = materials.last_mut() else {
            continue;
        };
        let err = |what: &str| {
            LoadError::AssetLoad(format!("material line {}: invalid {what}: {line}", line_no + 1))
        };
        match keyword.as_str() {
            "ka" => current.ambient = parse_color(rest).ok_or_else(|| err("Ka"))?,
            "kd" => current.diffuse = parse_color(rest).ok_or_else(|| err("Kd"))?,
            "ks" => current.specular = parse_color(rest).ok_or_else(|| err("Ks"))?,
            "ns" => current.shininess = rest.parse().map_err(|_| err("Ns"))?,
            "d" => current.opacity = rest.parse().map_err(|_| err("d"))?,
            "tr" => {
                let tr: f32 = rest.parse().map_err(|_| err("Tr"))?;
                current.opacity = 1.0 - tr;
            }
            "illum" => current.illumination = rest.parse().map_err(|_| err("illum"))?,
            _ => {}
        }
    }

    Ok(MaterialLibrary { materials })
}

fn parse_color(rest: &str) -> Option<[f32; 3]> {
    let mut it = rest.split_whitespace().map(str::parse::<f32>);
    let r = it.next()?.ok()?;
    // a single value is shorthand for grey
    let Some(g) = it.next() else {
        return Some([r; 3]);
    };
    let g = g.ok()?;
    let b = it.next()?.ok()?;
    Some([r, g, b])
}
