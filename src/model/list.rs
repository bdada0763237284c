//! List item types.

use serde::{Deserialize, Serialize};

/// Bullet used for unordered list items.
pub const DEFAULT_BULLET: char = '•';

/// Information about a list item, resolved by the tag handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Position within its list, starting at the list's start value (1 by default)
    pub ordinal: u32,

    /// Nesting level (0 = top level)
    pub depth: u32,

    /// Left indent in device-independent units
    pub indent: f32,

    /// List style (ordered or unordered)
    pub style: ListStyle,
}

impl ListItem {
    /// Create a bulleted list item.
    pub fn bullet(ordinal: u32, depth: u32, indent: f32) -> Self {
        Self {
            ordinal,
            depth,
            indent,
            style: ListStyle::Unordered {
                marker: DEFAULT_BULLET,
            },
        }
    }

    /// Create a numbered list item.
    pub fn numbered(ordinal: u32, depth: u32, indent: f32, number_style: NumberStyle) -> Self {
        Self {
            ordinal,
            depth,
            indent,
            style: ListStyle::Ordered { number_style },
        }
    }

    /// Check if this item belongs to an ordered list.
    pub fn is_ordered(&self) -> bool {
        matches!(self.style, ListStyle::Ordered { .. })
    }

    /// The marker a display layer draws in front of the item.
    pub fn glyph(&self) -> String {
        self.style.glyph(self.ordinal)
    }
}

/// List style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ListStyle {
    /// Ordered (numbered) list
    Ordered {
        /// Number style
        number_style: NumberStyle,
    },
    /// Unordered (bulleted) list
    Unordered {
        /// Bullet character
        marker: char,
    },
}

impl ListStyle {
    /// Produce the marker for the item with the given ordinal.
    pub fn glyph(&self, ordinal: u32) -> String {
        match self {
            ListStyle::Unordered { marker } => marker.to_string(),
            ListStyle::Ordered { number_style } => format!("{}.", number_style.format(ordinal)),
        }
    }
}

/// Number style for ordered lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberStyle {
    /// 1, 2, 3, ...
    #[default]
    Decimal,
    /// a, b, c, ...
    LowerAlpha,
    /// A, B, C, ...
    UpperAlpha,
    /// i, ii, iii, ...
    LowerRoman,
    /// I, II, III, ...
    UpperRoman,
}

impl NumberStyle {
    /// Map an `<ol type="...">` value to a number style.
    pub fn from_type_attr(value: &str) -> Option<Self> {
        match value.trim() {
            "1" => Some(NumberStyle::Decimal),
            "a" => Some(NumberStyle::LowerAlpha),
            "A" => Some(NumberStyle::UpperAlpha),
            "i" => Some(NumberStyle::LowerRoman),
            "I" => Some(NumberStyle::UpperRoman),
            _ => None,
        }
    }

    /// Format a number in this style.
    ///
    /// Values with no representation in the style (0 for letters, anything
    /// above 3999 for roman numerals) fall back to decimal.
    pub fn format(&self, n: u32) -> String {
        match self {
            NumberStyle::Decimal => n.to_string(),
            NumberStyle::LowerAlpha => alpha(n).unwrap_or_else(|| n.to_string()),
            NumberStyle::UpperAlpha => alpha(n)
                .map(|s| s.to_ascii_uppercase())
                .unwrap_or_else(|| n.to_string()),
            NumberStyle::LowerRoman => roman(n)
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_else(|| n.to_string()),
            NumberStyle::UpperRoman => roman(n).unwrap_or_else(|| n.to_string()),
        }
    }
}

// Bijective base-26: 1 -> a, 26 -> z, 27 -> aa.
fn alpha(mut n: u32) -> Option<String> {
    if n == 0 {
        return None;
    }
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).ok()
}

fn roman(mut n: u32) -> Option<String> {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    if n == 0 || n > 3999 {
        return None;
    }
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_item_glyph() {
        let bullet = ListItem::bullet(3, 0, 24.0);
        assert_eq!(bullet.glyph(), "•");
        assert!(!bullet.is_ordered());

        let numbered = ListItem::numbered(5, 1, 48.0, NumberStyle::Decimal);
        assert_eq!(numbered.glyph(), "5.");
        assert!(numbered.is_ordered());
    }

    #[test]
    fn test_number_styles() {
        assert_eq!(NumberStyle::LowerAlpha.format(1), "a");
        assert_eq!(NumberStyle::LowerAlpha.format(26), "z");
        assert_eq!(NumberStyle::LowerAlpha.format(28), "ab");
        assert_eq!(NumberStyle::UpperAlpha.format(3), "C");
        assert_eq!(NumberStyle::LowerRoman.format(4), "iv");
        assert_eq!(NumberStyle::UpperRoman.format(1994), "MCMXCIV");
    }

    #[test]
    fn test_number_style_fallback() {
        assert_eq!(NumberStyle::LowerAlpha.format(0), "0");
        assert_eq!(NumberStyle::UpperRoman.format(4000), "4000");
    }

    #[test]
    fn test_from_type_attr() {
        assert_eq!(NumberStyle::from_type_attr("a"), Some(NumberStyle::LowerAlpha));
        assert_eq!(NumberStyle::from_type_attr("I"), Some(NumberStyle::UpperRoman));
        assert_eq!(NumberStyle::from_type_attr("disc"), None);
    }
}
