/// One of the five mana colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    /// `W`
    White,
    /// `U`
    Blue,
    /// `B`
    Black,
    /// `R`
    Red,
    /// `G`
    Green,
}

impl Color {
    /// All colors in WUBRG order.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// Parse a single mana symbol letter (case-insensitive).
    pub fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(Self::White),
            'U' => Some(Self::Blue),
            'B' => Some(Self::Black),
            'R' => Some(Self::Red),
            'G' => Some(Self::Green),
            _ => None,
        }
    }

    /// Uppercase mana symbol letter.
    pub fn symbol(self) -> char {
        match self {
            Self::White => 'W',
            Self::Blue => 'U',
            Self::Black => 'B',
            Self::Red => 'R',
            Self::Green => 'G',
        }
    }

    /// Display name used in frame catalog names.
    pub fn name(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Blue => "Blue",
            Self::Black => "Black",
            Self::Red => "Red",
            Self::Green => "Green",
        }
    }

    /// Catalog name of this color's full frame.
    pub fn frame_name(self) -> String {
        format!("{} Frame", self.name())
    }

    /// Catalog name of this color's legend crown.
    pub fn crown_name(self) -> String {
        format!("{} Legend Crown", self.name())
    }

    /// Fill color for the mana pip (straight RGB).
    pub(crate) fn pip_rgb(self) -> [u8; 3] {
        match self {
            Self::White => [248, 231, 185],
            Self::Blue => [179, 206, 234],
            Self::Black => [166, 159, 157],
            Self::Red => [235, 159, 130],
            Self::Green => [196, 211, 202],
        }
    }
}

/// Distinct colors referenced by a mana cost, in order of first appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorIdentity(Vec<Color>);

impl ColorIdentity {
    /// Derive from mana symbols; generic and unknown symbols are ignored.
    pub fn from_symbols<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let mut colors = Vec::new();
        for c in symbols.into_iter().filter_map(Color::from_symbol) {
            if !colors.contains(&c) {
                colors.push(c);
            }
        }
        Self(colors)
    }

    /// Colors in mana-cost order.
    pub fn colors(&self) -> &[Color] {
        &self.0
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for colorless cards.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Membership test, ignoring order.
    pub fn contains(&self, c: Color) -> bool {
        self.0.contains(&c)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/color.rs"]
mod tests;
