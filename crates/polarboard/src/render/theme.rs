use crate::config::ThemeConfig;
use palette::{Srgb, Srgba};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("color {name} = {value:?} is not a hex color: {reason}")]
    InvalidColor {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("highlight_alpha {0} must be within 0..=1")]
    BadAlpha(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub light: Srgba<f64>,
    pub dark: Srgba<f64>,
    pub selected: Srgba<f64>,
    pub neighbor: Srgba<f64>,
    pub hub: Srgba<f64>,
    pub stroke: Srgba<f64>,
    pub background: Option<Srgba<f64>>,
}

impl TryFrom<&ThemeConfig> for ThemeColors {
    type Error = ThemeError;

    fn try_from(theme: &ThemeConfig) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&theme.highlight_alpha) {
            return Err(ThemeError::BadAlpha(theme.highlight_alpha));
        }
        let background = match theme.background.trim() {
            s if s.eq_ignore_ascii_case("none") || s.is_empty() => None,
            s => Some(parse_color("background", s, 1.0)?),
        };

        Ok(Self {
            light: parse_color("light", &theme.light, 1.0)?,
            dark: parse_color("dark", &theme.dark, 1.0)?,
            selected: parse_color("selected", &theme.selected, theme.highlight_alpha)?,
            neighbor: parse_color("neighbor", &theme.neighbor, theme.highlight_alpha)?,
            hub: parse_color("hub", &theme.hub, 1.0)?,
            stroke: parse_color("stroke", &theme.stroke, 1.0)?,
            background,
        })
    }
}

fn parse_color(name: &'static str, value: &str, alpha: f64) -> Result<Srgba<f64>, ThemeError> {
    let rgb = Srgb::<u8>::from_str(value.trim()).map_err(|e| ThemeError::InvalidColor {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    let rgb: Srgb<f64> = rgb.into_format();
    Ok(Srgba::new(rgb.red, rgb.green, rgb.blue, alpha))
}

/// `#rrggbb` form of `color`, ignoring alpha.
pub fn to_hex(color: &Srgba<f64>) -> String {
    let rgb: Srgb<u8> = color.color.into_format();
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_parses() {
        let colors = ThemeColors::try_from(&ThemeConfig::default()).unwrap();
        assert_eq!(to_hex(&colors.dark), "#7a5230");
        assert_eq!(colors.selected.alpha, 0.9);
        assert_eq!(colors.light.alpha, 1.0);
        assert!(colors.background.is_some());
    }

    #[test]
    fn test_background_none_is_transparent() {
        let theme = ThemeConfig {
            background: "None".into(),
            ..ThemeConfig::default()
        };
        assert_eq!(ThemeColors::try_from(&theme).unwrap().background, None);
    }

    #[test]
    fn test_bad_values() {
        let theme = ThemeConfig {
            hub: "#12345".into(),
            ..ThemeConfig::default()
        };
        let err = ThemeColors::try_from(&theme).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidColor { name: "hub", .. }));

        let theme = ThemeConfig {
            highlight_alpha: 1.5,
            ..ThemeConfig::default()
        };
        assert!(matches!(
            ThemeColors::try_from(&theme),
            Err(ThemeError::BadAlpha(_))
        ));
    }
}
