use crate::foundation::core::Color;
use crate::foundation::error::{VelomapError, VelomapResult};

/// Ordered, fixed-capacity list of colors available for per-dataset
/// assignment.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette from an explicit color list.
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// Number of datasets this palette can identify.
    pub fn capacity(&self) -> usize {
        self.colors.len()
    }

    /// Color at the given slot, if within capacity.
    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }
}

impl Default for Palette {
    /// Seven GMT color names, ordered for contrast on a gray coastline fill.
    fn default() -> Self {
        Self::new(vec![
            Color("blue"),
            Color("red"),
            Color("green4"),
            Color("magenta"),
            Color("darkorange"),
            Color("cyan4"),
            Color("purple"),
        ])
    }
}

/// Positional color assignment: the i-th dataset receives `palette[i]`.
///
/// Fails before any drawing when the class holds more datasets than the
/// palette can identify; equal counts succeed.
pub fn assign(dataset_count: usize, palette: &Palette) -> VelomapResult<Vec<Color>> {
    if dataset_count > palette.capacity() {
        return Err(VelomapError::PaletteExhausted {
            datasets: dataset_count,
            capacity: palette.capacity(),
        });
    }
    Ok((0..dataset_count)
        .map(|i| palette.get(i).unwrap_or(Color("black")))
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/palette.rs"]
mod tests;
