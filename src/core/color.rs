//! CSS color function rendering: rgba composition and darken/lighten
//! modification via relative-color syntax.

use super::token::{ColorModify, ModifySpace};

/// Target CSS profile for composed colors.
///
/// `Modern` relies on relative-color syntax (`rgba(from <color> ...)`),
/// which keeps token-valued opacity working with any base color notation.
/// `Legacy` emits the historical two-argument `rgba(<color>, <opacity>)`
/// form for stylesheets that cannot assume relative-color support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CssProfile {
    #[default]
    Modern,
    Legacy,
}

/// Compose a base color and an opacity into one CSS color function.
/// Both operands are already rendered (inline values or `var()` calls).
pub fn compose_rgba(color: &str, opacity: &str, profile: CssProfile) -> String {
    match profile {
        CssProfile::Modern => format!("rgba(from {} r g b / {})", color, opacity),
        CssProfile::Legacy => format!("rgba({}, {})", color, opacity),
    }
}

/// Render a darken/lighten directive over an already-rendered base color.
///
/// The lightness channel is scaled by the directive's multiplier in the
/// requested color space.
pub fn apply_modify(base: &str, modify: &ColorModify) -> String {
    let multiplier = modify.multiplier();
    match modify.space {
        ModifySpace::Hsl => format!("hsl(from {} h s calc(l * {}))", base, multiplier),
        ModifySpace::Lch => format!("lch(from {} calc(l * {}) c h)", base, multiplier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token::{ColorModify, ModifyKind};

    #[test]
    fn test_compose_rgba_modern() {
        assert_eq!(
            compose_rgba("var(--palette-gray-900)", "var(--opacity-x040)", CssProfile::Modern),
            "rgba(from var(--palette-gray-900) r g b / var(--opacity-x040))"
        );
    }

    #[test]
    fn test_compose_rgba_legacy() {
        assert_eq!(
            compose_rgba("#19B394", "var(--opacity-x010)", CssProfile::Legacy),
            "rgba(#19B394, var(--opacity-x010))"
        );
    }

    #[test]
    fn test_darken_hsl() {
        let modify = ColorModify {
            kind: ModifyKind::Darken,
            amount: 0.2,
            space: ModifySpace::Hsl,
        };
        assert_eq!(
            apply_modify("#336699", &modify),
            "hsl(from #336699 h s calc(l * 0.8))"
        );
    }

    #[test]
    fn test_lighten_lch() {
        let modify = ColorModify {
            kind: ModifyKind::Lighten,
            amount: 0.25,
            space: ModifySpace::Lch,
        };
        assert_eq!(
            apply_modify("var(--base)", &modify),
            "lch(from var(--base) calc(l * 1.25) c h)"
        );
    }
}
