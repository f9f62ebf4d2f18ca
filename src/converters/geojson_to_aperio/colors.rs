//! Class name → Aperio `LineColor` lookup
//!
//! Aperio stores colors as a packed BGR integer (`0x00BBGGRR`):
//!   "Nec"     → 16776960  (0xFFFF00, cyan)
//!   "Vesl_EP" → 255       (0x0000FF, red)
//!
//! Names are matched exactly and case-sensitively.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Color used for any class name not in the table (black)
pub const DEFAULT_LINE_COLOR: u32 = 0;

static LINE_COLORS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("Vt", 0),
        ("VtVasc", 16711935),
        ("Nec", 16776960),
        ("PreNec", 65535),
        ("Thrmb", 128),
        ("Vesl_EP", 255),
        ("CNSi", 12632256),
        ("NA", 32896),
    ])
});

/// Look up a class name, returning None for names outside the table
pub fn known_line_color(name: &str) -> Option<u32> {
    LINE_COLORS.get(name).copied()
}

/// Resolve a class name to its line color, falling back to black
pub fn line_color_for(name: &str) -> u32 {
    known_line_color(name).unwrap_or(DEFAULT_LINE_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_entries() {
        assert_eq!(line_color_for("Vt"), 0);
        assert_eq!(line_color_for("VtVasc"), 16711935);
        assert_eq!(line_color_for("Nec"), 16776960);
        assert_eq!(line_color_for("PreNec"), 65535);
        assert_eq!(line_color_for("Thrmb"), 128);
        assert_eq!(line_color_for("Vesl_EP"), 255);
        assert_eq!(line_color_for("CNSi"), 12632256);
        assert_eq!(line_color_for("NA"), 32896);
    }

    #[test]
    fn test_unknown_name_defaults_to_black() {
        assert_eq!(line_color_for("Xyz"), DEFAULT_LINE_COLOR);
        assert_eq!(known_line_color("Xyz"), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(known_line_color("nec"), None);
        assert_eq!(known_line_color("NEC"), None);
        assert_eq!(known_line_color(" Nec"), None);
        // "Vt" is black by table, not by fallback
        assert_eq!(known_line_color("Vt"), Some(0));
    }
}
