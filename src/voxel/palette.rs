//! Ordered color palettes with nearest-match lookup

use serde::{Deserialize, Serialize};
use super::cell::Color;

/// An ordered list of colors referenced by index from indexed layers
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    name: String,
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colors: Vec::new(),
        }
    }

    pub fn from_colors(name: impl Into<String>, colors: Vec<Color>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at index `i`; transparent for any index outside the palette
    pub fn color(&self, i: i32) -> Color {
        if i < 0 || i as usize >= self.colors.len() {
            return Color::TRANSPARENT;
        }
        self.colors[i as usize]
    }

    /// Store a color, growing the palette with transparent entries when
    /// `i` is past the end; negative indices are ignored
    pub fn set_color(&mut self, i: i32, c: Color) {
        if i < 0 {
            return;
        }
        let i = i as usize;
        if i >= self.colors.len() {
            self.colors.resize(i + 1, Color::TRANSPARENT);
        }
        self.colors[i] = c;
    }

    /// Index of the entry closest to `c` by squared RGBA distance, or -1
    /// for an empty palette
    pub fn best_match(&self, c: Color) -> i32 {
        let mut best = -1;
        let mut best_d = f32::MAX;
        for (i, entry) in self.colors.iter().enumerate() {
            let d = entry.diff(&c);
            if d < best_d {
                best_d = d;
                best = i as i32;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_is_transparent() {
        let pal = Palette::from_colors("p", vec![Color::opaque(1.0, 0.0, 0.0)]);
        assert_eq!(pal.color(-1), Color::TRANSPARENT);
        assert_eq!(pal.color(1), Color::TRANSPARENT);
        assert_eq!(pal.color(0), Color::opaque(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_set_color_grows() {
        let mut pal = Palette::new("p");
        pal.set_color(3, Color::opaque(0.0, 1.0, 0.0));
        assert_eq!(pal.len(), 4);
        assert_eq!(pal.color(0), Color::TRANSPARENT);
        assert_eq!(pal.color(3), Color::opaque(0.0, 1.0, 0.0));

        pal.set_color(-1, Color::opaque(1.0, 1.0, 1.0));
        assert_eq!(pal.len(), 4);
    }

    #[test]
    fn test_best_match() {
        let pal = Palette::from_colors(
            "p",
            vec![
                Color::TRANSPARENT,
                Color::opaque(1.0, 0.0, 0.0),
                Color::opaque(0.0, 0.0, 1.0),
            ],
        );
        assert_eq!(pal.best_match(Color::opaque(0.9, 0.1, 0.0)), 1);
        assert_eq!(pal.best_match(Color::opaque(0.1, 0.0, 0.8)), 2);
        assert_eq!(pal.best_match(Color::TRANSPARENT), 0);
        assert_eq!(Palette::new("empty").best_match(Color::TRANSPARENT), -1);
    }
}
