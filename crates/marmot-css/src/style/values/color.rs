//! Color parsing and normalization per [CSS Color Level 4](https://www.w3.org/TR/css-color-4/).
//!
//! Every supported syntax (hex, `rgb()`, `rgba()`, named) normalizes to one
//! RGBA quad. Unknown colors yield `None`; the caller keeps the property's
//! initial value instead.

use serde::Serialize;

use super::significant;
use crate::parser::ComponentValue;
use crate::tokenizer::CssToken;

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
///
/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black, the initial `background-color`.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black, the initial `color`.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a color from its four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    ///
    /// "The syntax of a <hex-color> is a <hash-token> token whose value
    /// consists of 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            // [§ 4.2.1]
            // "The three-digit RGB notation (#RGB) is converted into six-digit
            // form (#RRGGBB) by replicating digits, not by adding zeros."
            3 | 4 => {
                let mut channels = [255u8; 4];
                for (i, slot) in channels.iter_mut().take(hex.len()).enumerate() {
                    *slot = u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok()?;
                }
                let [r, g, b, a] = channels;
                Some(Self { r, g, b, a })
            }
            6 | 8 => {
                let mut channels = [255u8; 4];
                for (i, slot) in channels.iter_mut().take(hex.len() / 2).enumerate() {
                    *slot = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
                }
                let [r, g, b, a] = channels;
                Some(Self { r, g, b, a })
            }
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// "CSS defines a large set of named colors..." The basic sixteen plus
    /// the extended names that show up in real stylesheets.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "transparent" => Some(Self::TRANSPARENT),
            // Basic color keywords
            "black" => Some(Self::opaque(0, 0, 0)),
            "silver" => Some(Self::opaque(192, 192, 192)),
            "gray" | "grey" => Some(Self::opaque(128, 128, 128)),
            "white" => Some(Self::opaque(255, 255, 255)),
            "maroon" => Some(Self::opaque(128, 0, 0)),
            "red" => Some(Self::opaque(255, 0, 0)),
            "purple" => Some(Self::opaque(128, 0, 128)),
            "fuchsia" | "magenta" => Some(Self::opaque(255, 0, 255)),
            "green" => Some(Self::opaque(0, 128, 0)),
            "lime" => Some(Self::opaque(0, 255, 0)),
            "olive" => Some(Self::opaque(128, 128, 0)),
            "yellow" => Some(Self::opaque(255, 255, 0)),
            "navy" => Some(Self::opaque(0, 0, 128)),
            "blue" => Some(Self::opaque(0, 0, 255)),
            "teal" => Some(Self::opaque(0, 128, 128)),
            "aqua" | "cyan" => Some(Self::opaque(0, 255, 255)),
            // Extended color keywords
            "orange" => Some(Self::opaque(255, 165, 0)),
            "aliceblue" => Some(Self::opaque(240, 248, 255)),
            "beige" => Some(Self::opaque(245, 245, 220)),
            "brown" => Some(Self::opaque(165, 42, 42)),
            "coral" => Some(Self::opaque(255, 127, 80)),
            "cornflowerblue" => Some(Self::opaque(100, 149, 237)),
            "crimson" => Some(Self::opaque(220, 20, 60)),
            "darkblue" => Some(Self::opaque(0, 0, 139)),
            "darkgray" | "darkgrey" => Some(Self::opaque(169, 169, 169)),
            "darkgreen" => Some(Self::opaque(0, 100, 0)),
            "darkorange" => Some(Self::opaque(255, 140, 0)),
            "darkred" => Some(Self::opaque(139, 0, 0)),
            "dimgray" | "dimgrey" => Some(Self::opaque(105, 105, 105)),
            "dodgerblue" => Some(Self::opaque(30, 144, 255)),
            "firebrick" => Some(Self::opaque(178, 34, 34)),
            "forestgreen" => Some(Self::opaque(34, 139, 34)),
            "gainsboro" => Some(Self::opaque(220, 220, 220)),
            "gold" => Some(Self::opaque(255, 215, 0)),
            "goldenrod" => Some(Self::opaque(218, 165, 32)),
            "hotpink" => Some(Self::opaque(255, 105, 180)),
            "indigo" => Some(Self::opaque(75, 0, 130)),
            "ivory" => Some(Self::opaque(255, 255, 240)),
            "khaki" => Some(Self::opaque(240, 230, 140)),
            "lavender" => Some(Self::opaque(230, 230, 250)),
            "lightblue" => Some(Self::opaque(173, 216, 230)),
            "lightcoral" => Some(Self::opaque(240, 128, 128)),
            "lightgray" | "lightgrey" => Some(Self::opaque(211, 211, 211)),
            "lightgreen" => Some(Self::opaque(144, 238, 144)),
            "lightpink" => Some(Self::opaque(255, 182, 193)),
            "lightsalmon" => Some(Self::opaque(255, 160, 122)),
            "lightseagreen" => Some(Self::opaque(32, 178, 170)),
            "lightyellow" => Some(Self::opaque(255, 255, 224)),
            "limegreen" => Some(Self::opaque(50, 205, 50)),
            "midnightblue" => Some(Self::opaque(25, 25, 112)),
            "mintcream" => Some(Self::opaque(245, 255, 250)),
            "orangered" => Some(Self::opaque(255, 69, 0)),
            "orchid" => Some(Self::opaque(218, 112, 214)),
            "pink" => Some(Self::opaque(255, 192, 203)),
            "plum" => Some(Self::opaque(221, 160, 221)),
            "rebeccapurple" => Some(Self::opaque(102, 51, 153)),
            "royalblue" => Some(Self::opaque(65, 105, 225)),
            "salmon" => Some(Self::opaque(250, 128, 114)),
            "seagreen" => Some(Self::opaque(46, 139, 87)),
            "sienna" => Some(Self::opaque(160, 82, 45)),
            "skyblue" => Some(Self::opaque(135, 206, 235)),
            "slateblue" => Some(Self::opaque(106, 90, 205)),
            "slategray" | "slategrey" => Some(Self::opaque(112, 128, 144)),
            "snow" => Some(Self::opaque(255, 250, 250)),
            "springgreen" => Some(Self::opaque(0, 255, 127)),
            "steelblue" => Some(Self::opaque(70, 130, 180)),
            "tan" => Some(Self::opaque(210, 180, 140)),
            "tomato" => Some(Self::opaque(255, 99, 71)),
            "turquoise" => Some(Self::opaque(64, 224, 208)),
            "violet" => Some(Self::opaque(238, 130, 238)),
            "wheat" => Some(Self::opaque(245, 222, 179)),
            "whitesmoke" => Some(Self::opaque(245, 245, 245)),
            _ => None,
        }
    }

    /// Convert to hex string notation (#RRGGBB, or #RRGGBBAA if alpha != 255)
    ///
    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parse a declaration value as a color.
///
/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
///
/// Dispatches on the value shape: a hash token is hex notation, an ident is
/// a named color, an `rgb()`/`rgba()` function carries channel arguments.
#[must_use]
pub fn parse_color(values: &[ComponentValue]) -> Option<Rgba> {
    match significant(values).as_slice() {
        [ComponentValue::Token(CssToken::Hash { value, .. })] => Rgba::from_hex(value),
        [ComponentValue::Token(CssToken::Ident(name))] => Rgba::from_named(name),
        [ComponentValue::Function { name, value }]
            if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") =>
        {
            parse_rgb_function(value)
        }
        _ => None,
    }
}

/// [§ 4.1 The RGB functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
///
/// "rgb() = rgb( <percentage>{3} [ / <alpha-value> ]? ) |
///          rgb( <number>{3} [ / <alpha-value> ]? )"
///
/// Both the modern space-separated form and the legacy comma-separated form
/// are accepted; `rgba()` is an alias.
fn parse_rgb_function(args: &[ComponentValue]) -> Option<Rgba> {
    let parts = significant(args);
    let mut numbers = Vec::new();

    for part in parts {
        match part {
            // Separators in the legacy and modern syntaxes
            ComponentValue::Token(CssToken::Comma | CssToken::Delim('/')) => {}
            ComponentValue::Token(CssToken::Number(n)) => numbers.push(*n),
            // Percentage channels scale to the 0-255 range
            ComponentValue::Token(CssToken::Percentage(p)) => {
                if numbers.len() < 3 {
                    numbers.push(p / 100.0 * 255.0);
                } else {
                    // Percentage alpha scales to 0-1
                    numbers.push(p / 100.0);
                }
            }
            _ => return None,
        }
    }

    if numbers.len() < 3 || numbers.len() > 4 {
        return None;
    }

    let r = clamp_channel(numbers[0]);
    let g = clamp_channel(numbers[1]);
    let b = clamp_channel(numbers[2]);
    // "<alpha-value> = <number> | <percentage>" in the 0-1 range
    let a = numbers
        .get(3)
        .map_or(255, |alpha| clamp_channel(alpha * 255.0));

    Some(Rgba { r, g, b, a })
}

/// Round and clamp a channel value into the byte range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_channel(v: f64) -> u8 {
    let rounded = v.round();
    if rounded <= 0.0 {
        0
    } else if rounded >= 255.0 {
        255
    } else {
        rounded as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CssParser;
    use crate::tokenizer::CssTokenizer;

    fn parse(css: &str) -> Option<Rgba> {
        let mut tokenizer = CssTokenizer::new(&format!("color: {css}"));
        tokenizer.run();
        let mut parser = CssParser::new(tokenizer.into_tokens());
        let decl = parser.parse_declaration_list().remove(0);
        parse_color(&decl.value)
    }

    #[test]
    fn hex_notations() {
        assert_eq!(parse("#fff"), Some(Rgba::WHITE));
        assert_eq!(parse("#ff0000"), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(parse("#f00a"), Some(Rgba::new(255, 0, 0, 170)));
        assert_eq!(parse("#ff000080"), Some(Rgba::new(255, 0, 0, 128)));
        assert_eq!(parse("#ff00"), Some(Rgba::new(255, 255, 0, 0)));
    }

    #[test]
    fn named_colors() {
        assert_eq!(parse("red"), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(parse("rebeccapurple"), Some(Rgba::new(102, 51, 153, 255)));
        assert_eq!(parse("Teal"), Some(Rgba::new(0, 128, 128, 255)));
        assert_eq!(parse("transparent"), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn rgb_functions() {
        assert_eq!(parse("rgb(255, 0, 0)"), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(
            parse("rgba(0, 128, 0, 0.5)"),
            Some(Rgba::new(0, 128, 0, 128))
        );
        assert_eq!(parse("rgb(100% 0% 0%)"), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(
            parse("rgb(255 0 0 / 0.25)"),
            Some(Rgba::new(255, 0, 0, 64))
        );
    }

    #[test]
    fn channels_clamp_to_byte_range() {
        assert_eq!(parse("rgb(300, -20, 0)"), Some(Rgba::new(255, 0, 0, 255)));
    }

    #[test]
    fn invalid_colors_are_rejected() {
        assert_eq!(parse("not-a-color"), None);
        assert_eq!(parse("#12345"), None);
        assert_eq!(parse("rgb(1, 2)"), None);
        assert_eq!(parse("rgb(a, b, c)"), None);
    }

    #[test]
    fn hex_round_trip() {
        let color = Rgba::from_hex("#1a2b3c").unwrap();
        assert_eq!(color.to_hex_string(), "#1a2b3c");
        let with_alpha = Rgba::from_hex("#1a2b3c80").unwrap();
        assert_eq!(with_alpha.to_hex_string(), "#1a2b3c80");
    }
}
