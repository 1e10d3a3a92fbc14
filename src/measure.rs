//! Layout-engine adapter: turns resolved configuration into measurements.

use crate::config::MeasureConfig;
use crate::error::MeasureError;
use crate::text::data::StyledText;
use crate::text::engine::{self, GlyphMetrics, Paragraph};

/// Measured geometry for one laid-out line, device-independent units.
#[derive(Clone, Debug, PartialEq)]
pub struct LineInfo {
    pub line: usize,
    /// First character of the line (char index into the measured text).
    pub start: usize,
    /// One past the last character, including any trailing whitespace.
    pub end: usize,
    pub width: f32,
    pub char_widths: Vec<f32>,
}

/// Output of a measurement call, device-independent units.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasureResult {
    pub width: f32,
    pub height: f32,
    pub last_line_width: f32,
    pub line_count: usize,
    pub line_info: Option<Vec<LineInfo>>,
}

/// Height reported for empty text.
///
/// An empty string still occupies one line of vertical space in any real UI;
/// the constant matches what the original platform consistently reports
/// without running a layout: 14 divided by the density, plus one when font
/// padding is included.
pub fn minimal_line_height(density: f32, include_font_padding: bool) -> f32 {
    let height = 14.0 / density;
    if include_font_padding { height + 1.0 } else { height }
}

/// Layout selected for the measured text.
enum LaidOut {
    SingleLineFast(Paragraph),
    Wrapped(Paragraph),
}

impl LaidOut {
    fn paragraph(&self) -> &Paragraph {
        match self {
            LaidOut::SingleLineFast(paragraph) | LaidOut::Wrapped(paragraph) => paragraph,
        }
    }
}

pub(crate) fn empty_result(config: &MeasureConfig) -> MeasureResult {
    MeasureResult {
        width: 0.0,
        height: minimal_line_height(config.density, config.include_font_padding),
        last_line_width: 0.0,
        line_count: 0,
        line_info: None,
    }
}

/// Measures styled text against the resolved configuration.
///
/// This is the adapter entry point; the facade resolves fonts and builds the
/// styled text before calling in. Results are all-or-nothing: a failure in
/// the layout pass yields an error, never a partial result.
pub fn measure_styled<M: GlyphMetrics>(
    styled: &StyledText<M>,
    config: &MeasureConfig,
) -> Result<MeasureResult, MeasureError> {
    if styled.is_empty() {
        return Ok(empty_result(config));
    }
    let max_width = config.max_width.ok_or(MeasureError::MissingWidth)?;
    let laid = select_layout(styled, max_width, config);
    Ok(extract(&laid, config, max_width))
}

/// Decision function: single-line fast path when the text is one simple run
/// that fits, full paragraph breaking otherwise.
fn select_layout<M: GlyphMetrics>(
    styled: &StyledText<M>,
    max_width: f32,
    config: &MeasureConfig,
) -> LaidOut {
    if let Some(run) = engine::simple_run_metrics(styled)
        && run.width <= max_width
    {
        // a simple run that fits cannot wrap, so the break engine has
        // nothing to decide
        let line = engine::build_line(styled);
        return LaidOut::SingleLineFast(Paragraph::from_line(line, config.include_font_padding));
    }

    let desired = engine::desired_width(styled);
    // the break engine reserves the full working width even when the text
    // does not need it; narrowing keeps reported slot widths tight
    let hint = if desired <= max_width {
        desired.ceil()
    } else {
        max_width
    };
    LaidOut::Wrapped(engine::build_paragraph(
        styled,
        hint,
        config.break_strategy,
        config.include_font_padding,
    ))
}

fn extract(laid: &LaidOut, config: &MeasureConfig, max_width_px: f32) -> MeasureResult {
    let paragraph = laid.paragraph();
    let density = config.density;
    let lines = &paragraph.lines;

    let width_px = if config.use_precise_width {
        lines.iter().map(|line| line.used_width).fold(0.0f32, f32::max)
    } else {
        paragraph.slot_width
    };
    let last_line_width = lines.last().map(|line| line.used_width).unwrap_or(0.0) / density;

    let max_width = max_width_px / density;
    let mut width = width_px / density;
    if width > max_width {
        if config.use_precise_width {
            // the precise path should never exceed the configured maximum;
            // if this fires, the used-width extraction overflowed upstream
            log::warn!("precise width {width} exceeds configured max {max_width}; clamping");
        }
        width = max_width;
    }

    let line_info = config.use_chars_width.then(|| {
        lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let line_width = line.used_width / density;
                let mut char_widths = Vec::with_capacity(line.end - line.start);
                let mut current = 0.0f32;
                for j in line.start..line.end {
                    if current < line_width {
                        let w = paragraph.selection_bounds(index, j, j + 1).width() / density;
                        char_widths.push(if w <= width { w } else { 0.0 });
                        current += w;
                    } else {
                        // past the used extent nothing more is drawn
                        char_widths.push(0.0);
                    }
                }
                LineInfo {
                    line: index,
                    start: line.start,
                    end: line.end,
                    width: line_width,
                    char_widths,
                }
            })
            .collect()
    });

    MeasureResult {
        width,
        height: paragraph.height / density,
        last_line_width,
        line_count: lines.len(),
        line_info,
    }
}

/// Per-character advance widths for the whole string laid out as one
/// unconstrained line, device-independent units.
pub fn char_advances<M: GlyphMetrics>(styled: &StyledText<M>, density: f32) -> Vec<f32> {
    if styled.is_empty() {
        return Vec::new();
    }
    let line = engine::build_line(styled);
    (0..styled.len())
        .map(|index| line.advance_of(index) / density)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextBreakStrategy;
    use crate::text::data::StyledText;
    use crate::text::engine::test_support::{FixedGlyphs, styled};

    fn config(text: &str, width_dp: f32, density: f32) -> MeasureConfig {
        MeasureConfig {
            text: text.into(),
            max_width: Some(width_dp * density),
            font_family: None,
            font_size: 14.0 * density,
            font_weight: 400,
            font_style: Default::default(),
            letter_spacing: 0.0,
            include_font_padding: false,
            use_precise_width: true,
            use_chars_width: true,
            break_strategy: TextBreakStrategy::Simple,
            density,
        }
    }

    #[test]
    fn empty_text_reports_the_minimal_line() {
        let config = config("", 1000.0, 2.0);
        let result = measure_styled(&styled(""), &config).unwrap();
        assert_eq!(result.width, 0.0);
        assert_eq!(result.last_line_width, 0.0);
        assert_eq!(result.line_count, 0);
        assert_eq!(result.height, minimal_line_height(2.0, false));
        assert_eq!(result.height, 7.0);
        assert!(result.line_info.is_none());

        let mut padded = config.clone();
        padded.include_font_padding = true;
        let result = measure_styled(&styled(""), &padded).unwrap();
        assert_eq!(result.height, 8.0);
    }

    #[test]
    fn hello_single_line_scenario() {
        let config = config("Hello", 1000.0, 2.0);
        let result = measure_styled(&styled("Hello"), &config).unwrap();

        assert_eq!(result.line_count, 1);
        assert_eq!(result.width, 24.5); // 49 px used at density 2
        assert_eq!(result.last_line_width, result.width);
        assert_eq!(result.height, 5.0); // ascent 8, descent -2, density 2

        let info = result.line_info.unwrap();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].start, 0);
        assert_eq!(info[0].end, 5);
        assert_eq!(info[0].char_widths.len(), 5);
        assert!(info[0].char_widths.iter().all(|w| *w >= 0.0));
        let sum: f32 = info[0].char_widths.iter().sum();
        assert!(sum <= result.width + 1e-4);
    }

    #[test]
    fn measurement_is_idempotent() {
        let config = config("hello world here", 60.0, 2.0);
        let first = measure_styled(&styled("hello world here"), &config).unwrap();
        let second = measure_styled(&styled("hello world here"), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fast_path_agrees_with_full_layout() {
        let text = styled("Hello");
        let fast = measure_styled(&text, &config("Hello", 1000.0, 2.0)).unwrap();

        let paragraph =
            crate::text::engine::build_paragraph(&text, 2000.0, TextBreakStrategy::Simple, false);
        assert_eq!(paragraph.line_count(), 1);
        assert!((paragraph.lines[0].used_width / 2.0 - fast.width).abs() < 1e-4);
        assert!((paragraph.height / 2.0 - fast.height).abs() < 1e-4);
    }

    #[test]
    fn imprecise_width_reports_the_slot() {
        let mut config = config("Hello", 1000.0, 2.0);
        config.use_precise_width = false;
        let result = measure_styled(&styled("Hello"), &config).unwrap();
        // the single-line slot is the natural advance, 50 px
        assert_eq!(result.width, 25.0);
        // the last line is still measured tight
        assert_eq!(result.last_line_width, 24.5);
    }

    #[test]
    fn width_is_clamped_to_the_configured_maximum() {
        let config = config("Hello", 4.0, 2.0);
        let result = measure_styled(&styled("Hello"), &config).unwrap();
        assert_eq!(result.width, 4.0);
        assert_eq!(result.line_count, 5); // one glyph per line at 8 px
    }

    #[test]
    fn line_count_is_monotone_in_width() {
        let text = styled("aa bb cc dd");
        let mut previous = usize::MAX;
        for width_dp in [7.5, 15.0, 27.5, 50.0, 500.0] {
            let result = measure_styled(&text, &config("aa bb cc dd", width_dp, 2.0)).unwrap();
            assert!(result.line_count <= previous, "count grew at {width_dp} dp");
            previous = result.line_count;
        }
        assert_eq!(previous, 1);
    }

    #[test]
    fn char_widths_never_overflow_their_line() {
        let text = "hello world here";
        let result = measure_styled(&styled(text), &config(text, 60.0, 1.0)).unwrap();
        assert!(result.line_count > 1);

        for info in result.line_info.unwrap() {
            let sum: f32 = info.char_widths.iter().filter(|w| **w > 0.0).sum();
            assert!(
                sum <= info.width + 1e-4,
                "line {} sums to {sum} over width {}",
                info.line,
                info.width
            );
        }
    }

    #[test]
    fn trailing_whitespace_chars_report_zero_width() {
        let text = "hi   ";
        let result = measure_styled(&styled(text), &config(text, 1000.0, 1.0)).unwrap();
        let info = result.line_info.unwrap();
        let widths = &info[0].char_widths;
        assert_eq!(widths.len(), 5);
        assert!(widths[3] == 0.0 && widths[4] == 0.0);
    }

    #[test]
    fn density_round_trip_is_exact() {
        // doubling the density doubles every physical metric, including the
        // glyph advances a real face produces at the scaled pixel size; the
        // logical outputs must come back identical
        let text = "aa bb cc dd";
        let coarse = StyledText::uniform(text, FixedGlyphs { advance: 10.0 }, 0.0);
        let fine = StyledText::uniform(text, FixedGlyphs { advance: 20.0 }, 0.0);

        let low = measure_styled(&coarse, &config(text, 100.0, 2.0)).unwrap();
        let high = measure_styled(&fine, &config(text, 100.0, 4.0)).unwrap();
        assert_eq!(low, high);
    }

    #[test]
    fn single_character_reports_its_own_width() {
        let result = measure_styled(&styled("H"), &config("H", 1000.0, 1.0)).unwrap();
        let info = result.line_info.unwrap();
        assert_eq!(info[0].char_widths, vec![9.0]);
        assert_eq!(result.width, 9.0);
    }

    #[test]
    fn char_advances_cover_the_whole_string() {
        let advances = char_advances(&styled("Hello"), 2.0);
        assert_eq!(advances, vec![5.0; 5]);
        assert!(char_advances(&styled(""), 2.0).is_empty());
    }
}
