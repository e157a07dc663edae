//! Background color resolution.
//!
//! A color token is either one of eight named colors or a 6-hex-digit code
//! like `f7ca94`. Named lookup wins and is exact-match, case-sensitive; hex
//! is only tried afterwards. Anything else is a configuration error that
//! aborts the run before any export happens.

use thiserror::Error;

use crate::raster::Rgba64;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid bgcolor: {0}")]
pub struct InvalidColor(pub String);

const NAMED_COLORS: [(&str, [u16; 3]); 8] = [
    ("black", [0, 0, 0]),
    ("blue", [0, 0, 65535]),
    ("red", [65535, 0, 0]),
    ("magenta", [65535, 0, 65535]),
    ("green", [0, 65535, 0]),
    ("cyan", [0, 65535, 65535]),
    ("yellow", [65535, 65535, 0]),
    ("white", [65535, 65535, 65535]),
];

/// Widen an 8-bit channel to 16 bits by replicating the byte.
pub(crate) fn widen(b: u8) -> u16 {
    let u = b as u16;
    u * 256 + u
}

/// Resolve a color token to a fully opaque color.
pub fn resolve_color(token: &str) -> Result<Rgba64, InvalidColor> {
    if let Some((_, [r, g, b])) = NAMED_COLORS.iter().find(|(name, _)| *name == token) {
        return Ok(Rgba64::opaque(*r, *g, *b));
    }

    if token.len() == 6 && token.bytes().all(|c| c.is_ascii_hexdigit()) {
        let byte = |range| u8::from_str_radix(&token[range], 16).ok();
        if let (Some(r), Some(g), Some(b)) = (byte(0..2), byte(2..4), byte(4..6)) {
            return Ok(Rgba64::opaque(widen(r), widen(g), widen(b)));
        }
    }

    Err(InvalidColor(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_palette_exact_values() {
        for (name, [r, g, b]) in NAMED_COLORS {
            let c = resolve_color(name).unwrap();
            assert_eq!((c.r, c.g, c.b, c.a), (r, g, b, u16::MAX), "{name}");
        }
    }

    #[test]
    fn hex_widens_each_byte() {
        let c = resolve_color("f7ca94").unwrap();
        assert_eq!(c.r, 0xf7 * 256 + 0xf7);
        assert_eq!(c.g, 0xca * 256 + 0xca);
        assert_eq!(c.b, 0x94 * 256 + 0x94);
        assert_eq!(c.a, u16::MAX);
    }

    #[test]
    fn hex_zero_and_full() {
        assert_eq!(resolve_color("000000").unwrap(), Rgba64::opaque(0, 0, 0));
        assert_eq!(
            resolve_color("ffffff").unwrap(),
            Rgba64::opaque(u16::MAX, u16::MAX, u16::MAX)
        );
    }

    #[test]
    fn invalid_tokens_rejected() {
        for token in ["notacolor", "zz", "ff", "ffff", "fffffff", "purple", ""] {
            assert_eq!(resolve_color(token), Err(InvalidColor(token.to_string())));
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!(resolve_color("White").is_err());
        assert!(resolve_color("RED").is_err());
    }

    #[test]
    fn named_lookup_wins_over_hex() {
        // "ffffff" is only reachable as hex; a palette name is never
        // re-interpreted as hex even if it were six hex digits long.
        let white = resolve_color("white").unwrap();
        let hex_white = resolve_color("ffffff").unwrap();
        assert_eq!(white, hex_white);
    }
}
