//! Named colors and the RGB space they live in.
//!
//! A [`Color`] is either a learned basic color term (a token from the
//! training corpus promoted to a reference color, carrying the mean RGB of
//! every name it appeared in) or a query color built at request time.
//! Learned colors may also carry a bag of related words found by walking a
//! lexical hierarchy; see [`crate::hierarchy`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SwatchError;

/// A point in RGB space.
///
/// Channels are floats because learned centroids are averages. Nothing
/// clamps them, but every source in practice stays within `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    /// Euclidean distance between two points in RGB space.
    pub fn distance(&self, other: &Rgb) -> f64 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;

        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb::new(f64::from(r), f64::from(g), f64::from(b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R:{}, G:{}, B:{}", self.r, self.g, self.b)
    }
}

/// Parses either `r,g,b` (decimal, each `0..=255`) or `#rrggbb`.
impl FromStr for Rgb {
    type Err = SwatchError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| SwatchError::InvalidColor {
            input: input.to_string(),
            reason: reason.to_string(),
        };
        let trimmed = input.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid("expected six hex digits after '#'"));
            }
            let mut channels = [0u8; 3];
            for (i, channel) in channels.iter_mut().enumerate() {
                *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                    .map_err(|_| invalid("not a hex digit"))?;
            }
            return Ok(Rgb::from(channels));
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid("expected three comma separated channels"));
        }
        let mut channels = [0u8; 3];
        for (channel, part) in channels.iter_mut().zip(&parts) {
            *channel = part
                .parse::<u8>()
                .map_err(|_| invalid("channels must be integers in 0..=255"))?;
        }
        Ok(Rgb::from(channels))
    }
}

/// A named color and the words related to its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub name: String,
    pub rgb: Rgb,
    #[serde(default)]
    related_words: BTreeSet<String>,
}

impl Color {
    pub fn new(name: impl Into<String>, r: f64, g: f64, b: f64) -> Self {
        Color {
            name: name.into(),
            rgb: Rgb::new(r, g, b),
            related_words: BTreeSet::new(),
        }
    }

    /// A nameless color for a query coming from the user.
    pub fn query(rgb: Rgb) -> Self {
        Color {
            name: String::new(),
            rgb,
            related_words: BTreeSet::new(),
        }
    }

    /// Replace the related words of this color.
    pub fn set_related_words<I, W>(&mut self, words: I)
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        self.related_words = words.into_iter().map(Into::into).collect();
    }

    pub fn related_words(&self) -> &BTreeSet<String> {
        &self.related_words
    }

    /// Distance between this color and `other` in RGB space.
    pub fn distance(&self, other: &Color) -> f64 {
        self.rgb.distance(&other.rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.0}, {:.0}, {:.0})",
            self.name, self.rgb.r, self.rgb.g, self.rgb.b
        )
    }
}
