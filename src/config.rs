use crate::error::MeasureError;

/// Font size in device-independent units used when the caller omits one.
const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Font slant requested for measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Line-break strategy for paragraph layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBreakStrategy {
    /// Greedy first-fit breaking.
    Simple,
    /// Greedy breaking. Without hyphenation support this produces the same
    /// breaks as [`TextBreakStrategy::Simple`].
    HighQuality,
    /// Greedy breaking followed by a width-narrowing pass that evens out
    /// line lengths.
    #[default]
    Balanced,
}

/// Loose measurement request with every field optional.
///
/// This is the boundary shape: callers fill in what they know and
/// [`MeasureConfig::resolve`] turns it into a fixed-shape configuration,
/// rejecting anything missing or malformed. The raw specs are never handed
/// to the measurement logic itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasureSpecs {
    pub text: Option<String>,
    /// Maximum layout width in device-independent units. `f32::INFINITY`
    /// lays the text out as a single unconstrained line.
    pub width: Option<f32>,
    pub font_family: Option<String>,
    /// Font size in device-independent units.
    pub font_size: Option<f32>,
    /// CSS-style weight, 1..=1000.
    pub font_weight: Option<u16>,
    pub font_style: Option<FontStyle>,
    /// Extra advance per character, device-independent units.
    pub letter_spacing: Option<f32>,
    /// Whether line heights include the font's extra leading. There is no
    /// implicit default; size measurement fails without it.
    pub include_font_padding: Option<bool>,
    /// Report the narrowest width actually used by glyphs instead of the
    /// configured working width. Defaults to `true`.
    pub use_precise_width: Option<bool>,
    /// Compute per-character width arrays for every line. Defaults to `true`.
    pub use_chars_width: Option<bool>,
    pub text_break_strategy: Option<TextBreakStrategy>,
}

/// Fully resolved measurement configuration.
///
/// All dimensional fields are physical pixels, scaled from the caller's
/// device-independent units by `density`. Outputs are divided by the same
/// factor on the way back out, so the round trip is exact up to float
/// rounding.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasureConfig {
    pub text: String,
    /// Maximum layout width in physical pixels. `None` only in the
    /// per-character mode, which lays text out unconstrained.
    pub max_width: Option<f32>,
    pub font_family: Option<String>,
    pub font_size: f32,
    pub font_weight: u16,
    pub font_style: FontStyle,
    pub letter_spacing: f32,
    pub include_font_padding: bool,
    pub use_precise_width: bool,
    pub use_chars_width: bool,
    pub break_strategy: TextBreakStrategy,
    /// Density the dimensional fields were scaled with.
    pub density: f32,
}

impl MeasureConfig {
    /// Resolves specs for a full size measurement. A maximum width and an
    /// explicit `include_font_padding` are required.
    pub fn resolve(specs: &MeasureSpecs, density: f32) -> Result<Self, MeasureError> {
        Self::resolve_inner(specs, density, true)
    }

    /// Resolves specs for the per-character operation, which needs no
    /// maximum width.
    pub fn resolve_for_chars(specs: &MeasureSpecs, density: f32) -> Result<Self, MeasureError> {
        Self::resolve_inner(specs, density, false)
    }

    fn resolve_inner(
        specs: &MeasureSpecs,
        density: f32,
        for_size: bool,
    ) -> Result<Self, MeasureError> {
        let text = specs.text.clone().ok_or(MeasureError::MissingText)?;

        if density.is_nan() || density.is_infinite() {
            return Err(MeasureError::InvalidType("density"));
        }
        if density <= 0.0 {
            return Err(MeasureError::InvalidSizes("density"));
        }

        let max_width = match specs.width {
            Some(w) if w.is_nan() => return Err(MeasureError::InvalidType("width")),
            Some(w) if w < 0.0 => return Err(MeasureError::InvalidSizes("width")),
            Some(w) => Some(w * density),
            None if for_size => return Err(MeasureError::MissingWidth),
            None => None,
        };

        let font_size = finite_size(specs.font_size.unwrap_or(DEFAULT_FONT_SIZE), "fontSize")?;
        let letter_spacing = finite_size(specs.letter_spacing.unwrap_or(0.0), "letterSpacing")?;

        let font_weight = specs.font_weight.unwrap_or(400);
        if !(1..=1000).contains(&font_weight) {
            return Err(MeasureError::InvalidSizes("fontWeight"));
        }

        let include_font_padding = match specs.include_font_padding {
            Some(value) => value,
            None if for_size => return Err(MeasureError::MissingParameter("includeFontPadding")),
            None => false,
        };

        Ok(Self {
            text,
            max_width,
            font_family: specs.font_family.clone(),
            font_size: font_size * density,
            font_weight,
            font_style: specs.font_style.unwrap_or_default(),
            letter_spacing: letter_spacing * density,
            include_font_padding,
            use_precise_width: specs.use_precise_width.unwrap_or(true),
            use_chars_width: specs.use_chars_width.unwrap_or(true),
            break_strategy: specs.text_break_strategy.unwrap_or_default(),
            density,
        })
    }
}

fn finite_size(value: f32, field: &'static str) -> Result<f32, MeasureError> {
    if !value.is_finite() {
        return Err(MeasureError::InvalidType(field));
    }
    if value < 0.0 {
        return Err(MeasureError::InvalidSizes(field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_specs() -> MeasureSpecs {
        MeasureSpecs {
            text: Some("hello".into()),
            width: Some(100.0),
            include_font_padding: Some(false),
            ..Default::default()
        }
    }

    #[test]
    fn missing_text_is_rejected() {
        let err = MeasureConfig::resolve(&MeasureSpecs::default(), 1.0).unwrap_err();
        assert_eq!(err, MeasureError::MissingText);
    }

    #[test]
    fn missing_width_is_rejected_for_size_measurement_only() {
        let specs = MeasureSpecs {
            text: Some("hello".into()),
            include_font_padding: Some(true),
            ..Default::default()
        };
        assert_eq!(
            MeasureConfig::resolve(&specs, 1.0).unwrap_err(),
            MeasureError::MissingWidth
        );

        let config = MeasureConfig::resolve_for_chars(&specs, 1.0).unwrap();
        assert_eq!(config.max_width, None);
    }

    #[test]
    fn font_padding_must_be_explicit() {
        let mut specs = minimal_specs();
        specs.include_font_padding = None;
        assert_eq!(
            MeasureConfig::resolve(&specs, 1.0).unwrap_err(),
            MeasureError::MissingParameter("includeFontPadding")
        );
    }

    #[test]
    fn defaults_are_applied() {
        let config = MeasureConfig::resolve(&minimal_specs(), 2.0).unwrap();
        assert!(config.use_precise_width);
        assert!(config.use_chars_width);
        assert_eq!(config.break_strategy, TextBreakStrategy::Balanced);
        assert_eq!(config.font_weight, 400);
        assert_eq!(config.font_style, FontStyle::Normal);
        assert_eq!(config.font_size, 28.0); // 14 dp at density 2
        assert_eq!(config.letter_spacing, 0.0);
    }

    #[test]
    fn dimensions_are_scaled_by_density() {
        let mut specs = minimal_specs();
        specs.font_size = Some(10.0);
        specs.letter_spacing = Some(1.5);
        let config = MeasureConfig::resolve(&specs, 2.0).unwrap();
        assert_eq!(config.max_width, Some(200.0));
        assert_eq!(config.font_size, 20.0);
        assert_eq!(config.letter_spacing, 3.0);
        assert_eq!(config.density, 2.0);
    }

    #[test]
    fn infinite_width_means_unconstrained() {
        let mut specs = minimal_specs();
        specs.width = Some(f32::INFINITY);
        let config = MeasureConfig::resolve(&specs, 2.0).unwrap();
        assert_eq!(config.max_width, Some(f32::INFINITY));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let mut specs = minimal_specs();
        specs.width = Some(-1.0);
        assert_eq!(
            MeasureConfig::resolve(&specs, 1.0).unwrap_err(),
            MeasureError::InvalidSizes("width")
        );

        let mut specs = minimal_specs();
        specs.width = Some(f32::NAN);
        assert_eq!(
            MeasureConfig::resolve(&specs, 1.0).unwrap_err(),
            MeasureError::InvalidType("width")
        );

        let mut specs = minimal_specs();
        specs.font_size = Some(-3.0);
        assert_eq!(
            MeasureConfig::resolve(&specs, 1.0).unwrap_err(),
            MeasureError::InvalidSizes("fontSize")
        );

        let mut specs = minimal_specs();
        specs.letter_spacing = Some(f32::INFINITY);
        assert_eq!(
            MeasureConfig::resolve(&specs, 1.0).unwrap_err(),
            MeasureError::InvalidType("letterSpacing")
        );

        let mut specs = minimal_specs();
        specs.font_weight = Some(0);
        assert_eq!(
            MeasureConfig::resolve(&specs, 1.0).unwrap_err(),
            MeasureError::InvalidSizes("fontWeight")
        );

        assert_eq!(
            MeasureConfig::resolve(&minimal_specs(), 0.0).unwrap_err(),
            MeasureError::InvalidSizes("density")
        );
        assert_eq!(
            MeasureConfig::resolve(&minimal_specs(), f32::NAN).unwrap_err(),
            MeasureError::InvalidType("density")
        );
    }
}
