use std::fmt;

/// Straight RGB color, persisted as a `"#rrggbb"` string.
///
/// Panel translucency is a separate alpha channel in the document (0..=255),
/// so colors themselves carry no alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Strict parse of `#rgb` / `#rrggbb` (leading `#` optional, any case).
    /// Returns `None` for anything else, including the empty string.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        match hex.len() {
            3 => {
                let mut nibbles = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    nibbles[i] = c.to_digit(16)? as u8;
                }
                Some(Self::rgb(
                    nibbles[0] * 17,
                    nibbles[1] * 17,
                    nibbles[2] * 17,
                ))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Parse with a fallback instead of an error. Property forms and stored
    /// documents coerce malformed colors rather than rejecting them.
    pub fn parse_or(s: &str, fallback: Color) -> Self {
        Self::parse(s).unwrap_or(fallback)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Malformed stored colors degrade to white instead of failing the
        // whole document load.
        let s = String::deserialize(deserializer)?;
        Ok(Color::parse_or(&s, Color::WHITE))
    }
}
