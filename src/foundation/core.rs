use std::str::FromStr;

use crate::foundation::error::{VelomapError, VelomapResult};

/// Geographic window in decimal degrees, `west < east`, `south < north`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Western bound in degrees of longitude.
    pub west: f64,
    /// Eastern bound in degrees of longitude.
    pub east: f64,
    /// Southern bound in degrees of latitude.
    pub south: f64,
    /// Northern bound in degrees of latitude.
    pub north: f64,
}

impl Region {
    /// Build a validated region.
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> VelomapResult<Self> {
        if !(west < east) {
            return Err(VelomapError::config(format!(
                "region west ({west}) must be < east ({east})"
            )));
        }
        if !(south < north) {
            return Err(VelomapError::config(format!(
                "region south ({south}) must be < north ({north})"
            )));
        }
        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(VelomapError::config(format!(
                "region latitudes must lie in [-90, 90], got {south}/{north}"
            )));
        }
        Ok(Self {
            west,
            east,
            south,
            north,
        })
    }

    /// Render as a GMT `-R` argument, `-Rwest/east/south/north`.
    pub fn gmt_arg(&self) -> String {
        format!("-R{}/{}/{}/{}", self.west, self.east, self.south, self.north)
    }

    /// Width of the window in degrees of longitude.
    pub fn width_deg(&self) -> f64 {
        self.east - self.west
    }

    /// Height of the window in degrees of latitude.
    pub fn height_deg(&self) -> f64 {
        self.north - self.south
    }

    /// A point inset from the south-west corner by the given fractions of the
    /// window extent. Used to anchor scale glyphs inside the map.
    pub fn inset_point(&self, fx: f64, fy: f64) -> (f64, f64) {
        (
            self.west + self.width_deg() * fx,
            self.south + self.height_deg() * fy,
        )
    }
}

impl FromStr for Region {
    type Err = VelomapError;

    /// Parse `west/east/south/north`, the same shape GMT's `-R` takes.
    fn from_str(s: &str) -> VelomapResult<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 4 {
            return Err(VelomapError::config(format!(
                "region must be west/east/south/north, got '{s}'"
            )));
        }
        let mut vals = [0.0f64; 4];
        for (slot, part) in vals.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| VelomapError::config(format!("bad region bound '{part}' in '{s}'")))?;
        }
        Self::new(vals[0], vals[1], vals[2], vals[3])
    }
}

/// One named visual identity drawn from the palette.
///
/// GMT accepts color names on pens and fills, so the identity is the name
/// itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub &'static str);

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
