use std::sync::Arc;

use euclid::default::{Box2D, Point2D};

use crate::config::TextBreakStrategy;
use crate::text::data::{StyledSpan, StyledText};

/// Iterations of the width-narrowing search used by the balanced strategy.
const BALANCE_STEPS: u32 = 12;

/// Vertical metrics shared by every glyph of a styled span, physical pixels.
///
/// Follows the `fontdue` convention: `ascent` is positive, `descent` is
/// negative, `line_gap` is the extra leading the face requests between lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
}

impl LineMetrics {
    const ZERO: Self = Self {
        ascent: 0.0,
        descent: 0.0,
        line_gap: 0.0,
    };

    /// Height of a line using these metrics.
    ///
    /// The face's line gap contributes only when font padding is requested;
    /// otherwise the line is the tight ascent-to-descent band.
    pub fn line_height(&self, include_font_padding: bool) -> f32 {
        let height = self.ascent - self.descent;
        if include_font_padding {
            height + self.line_gap
        } else {
            height
        }
    }

    fn merge(&mut self, other: &LineMetrics) {
        self.ascent = self.ascent.max(other.ascent);
        self.descent = self.descent.min(other.descent);
        self.line_gap = self.line_gap.max(other.line_gap);
    }
}

/// Per-glyph horizontal metrics backing the layout engine.
///
/// The engine is independent of any concrete font machinery; production code
/// wraps `fontdue` (see [`FontGlyphs`]) and tests substitute deterministic
/// metrics.
pub trait GlyphMetrics {
    /// Horizontal advance of `ch`, excluding letter spacing.
    fn advance(&self, ch: char) -> f32;
    /// Tight horizontal extent of `ch` measured from its origin.
    fn bound(&self, ch: char) -> f32;
    /// Kerning adjustment between two adjacent characters.
    fn kern(&self, left: char, right: char) -> f32;
    /// Vertical metrics of the underlying face at the configured size.
    fn line_metrics(&self) -> LineMetrics;
}

/// `fontdue`-backed glyph metrics at a fixed pixel size.
#[derive(Clone)]
pub struct FontGlyphs {
    font: Arc<fontdue::Font>,
    px_size: f32,
}

impl FontGlyphs {
    pub fn new(font: Arc<fontdue::Font>, px_size: f32) -> Self {
        Self { font, px_size }
    }
}

impl GlyphMetrics for FontGlyphs {
    fn advance(&self, ch: char) -> f32 {
        self.font.metrics(ch, self.px_size).advance_width
    }

    fn bound(&self, ch: char) -> f32 {
        let metrics = self.font.metrics(ch, self.px_size);
        metrics.xmin as f32 + metrics.width as f32
    }

    fn kern(&self, left: char, right: char) -> f32 {
        self.font
            .horizontal_kern(left, right, self.px_size)
            .unwrap_or(0.0)
    }

    fn line_metrics(&self) -> LineMetrics {
        match self.font.horizontal_line_metrics(self.px_size) {
            Some(metrics) => LineMetrics {
                ascent: metrics.ascent,
                descent: metrics.descent,
                line_gap: metrics.line_gap,
            },
            None => LineMetrics {
                ascent: self.px_size,
                descent: 0.0,
                line_gap: 0.0,
            },
        }
    }
}

/// Metrics for text that is a single uncomplicated run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimpleRun {
    /// Natural unconstrained advance width, untrimmed.
    pub width: f32,
    pub metrics: LineMetrics,
}

/// One laid-out row of text.
///
/// `start..end` are character indices into the measured text; together the
/// lines of a paragraph partition it, with each separator and newline
/// belonging to the line it terminates.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub start: usize,
    pub end: usize,
    /// Extent of the line trimmed of trailing whitespace.
    pub used_width: f32,
    /// Full advance including trailing whitespace.
    pub advance: f32,
    metrics: LineMetrics,
    /// Character boundaries relative to the line origin, `end - start + 1`
    /// entries.
    xs: Vec<f32>,
}

impl Line {
    /// Advance width of the character at absolute index `index`.
    pub fn advance_of(&self, index: usize) -> f32 {
        self.xs[index + 1 - self.start] - self.xs[index - self.start]
    }

    pub fn line_height(&self, include_font_padding: bool) -> f32 {
        self.metrics.line_height(include_font_padding)
    }
}

/// A laid-out paragraph: the engine's output for one measurement call.
#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    pub lines: Vec<Line>,
    /// Total height of all lines, physical pixels.
    pub height: f32,
    /// The working width the layout reserved, as opposed to the width the
    /// glyphs actually used.
    pub slot_width: f32,
    include_font_padding: bool,
}

impl Paragraph {
    fn new(lines: Vec<Line>, slot_width: f32, include_font_padding: bool) -> Self {
        let height = lines
            .iter()
            .map(|line| line.line_height(include_font_padding))
            .sum();
        Self {
            lines,
            height,
            slot_width,
            include_font_padding,
        }
    }

    /// Wraps a single pre-built line; the slot width is its natural advance.
    pub fn from_line(line: Line, include_font_padding: bool) -> Self {
        let slot_width = line.advance;
        Self::new(vec![line], slot_width, include_font_padding)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Selection geometry for a character range of one line.
    ///
    /// The box never extends past the line's used extent, so trailing
    /// whitespace selects as zero width and per-character contributions can
    /// be summed without overshooting the line.
    ///
    /// # Panics
    ///
    /// Panics if `line_index` or the character range lies outside the
    /// paragraph.
    pub fn selection_bounds(
        &self,
        line_index: usize,
        char_start: usize,
        char_end: usize,
    ) -> Box2D<f32> {
        let line = &self.lines[line_index];
        let top: f32 = self.lines[..line_index]
            .iter()
            .map(|l| l.line_height(self.include_font_padding))
            .sum();
        let x0 = line.xs[char_start - line.start];
        let x1 = line.xs[char_end - line.start].min(line.used_width).max(x0);
        Box2D::new(
            Point2D::new(x0, top),
            Point2D::new(x1, top + line.line_height(self.include_font_padding)),
        )
    }
}

/// Characters that disqualify the single-line fast path: anything that needs
/// bidi reordering, combining, or complex shaping beyond what a single
/// left-to-right run can express.
fn is_simple_char(ch: char) -> bool {
    if ch.is_control() {
        return false;
    }
    !matches!(
        u32::from(ch),
        0x0300..=0x036F          // combining diacritical marks
        | 0x0590..=0x08FF        // Hebrew, Arabic, Syriac, Thaana, ...
        | 0x200E..=0x200F        // directional marks
        | 0x202A..=0x202E        // directional embedding controls
        | 0xFB1D..=0xFDFF        // Hebrew and Arabic presentation forms
        | 0xFE70..=0xFEFF        // Arabic presentation forms B
    )
}

/// Probes whether the text is one simple run and returns its metrics.
///
/// A simple run has a single style span, no forced breaks, and no characters
/// that require the full layout pass. Such text cannot wrap on its own, so a
/// caller with enough room can lay it out as one line without running the
/// break engine.
pub fn simple_run_metrics<M: GlyphMetrics>(styled: &StyledText<M>) -> Option<SimpleRun> {
    let [span] = styled.spans() else {
        return None;
    };

    let mut width = 0.0f32;
    let mut prev: Option<char> = None;
    for &ch in styled.chars() {
        if !is_simple_char(ch) {
            return None;
        }
        let kern = prev.map(|p| span.glyphs.kern(p, ch)).unwrap_or(0.0);
        width += kern + span.glyphs.advance(ch) + span.letter_spacing;
        prev = Some(ch);
    }

    Some(SimpleRun {
        width,
        metrics: span.glyphs.line_metrics(),
    })
}

/// Lays the whole text out as one unconstrained line.
pub fn build_line<M: GlyphMetrics>(styled: &StyledText<M>) -> Line {
    let mut acc = LineAccum::new(0);
    for (_, ch, span_index) in styled.indexed_chars() {
        acc.push(ch, span_index, &styled.spans()[span_index]);
    }
    acc.finish(styled.len(), None)
}

/// Widest forced-break segment of the text, laid out unconstrained.
///
/// This is the width the text would naturally occupy; narrowing the working
/// width to it keeps layouts from reserving slack the glyphs never use.
pub fn desired_width<M: GlyphMetrics>(styled: &StyledText<M>) -> f32 {
    let mut widest = 0.0f32;
    let mut pen = 0.0f32;
    let mut prev: Option<(char, usize)> = None;

    for (_, ch, span_index) in styled.indexed_chars() {
        if ch == '\n' {
            widest = widest.max(pen);
            pen = 0.0;
            prev = None;
            continue;
        }
        if ch.is_control() {
            prev = Some((ch, span_index));
            continue;
        }
        let span = &styled.spans()[span_index];
        let kern = match prev {
            Some((p, ps)) if ps == span_index => span.glyphs.kern(p, ch),
            _ => 0.0,
        };
        pen += kern + span.glyphs.advance(ch) + span.letter_spacing;
        prev = Some((ch, span_index));
    }

    widest.max(pen)
}

/// Breaks the text into lines no wider than `max_width` and stacks them.
///
/// All strategies start from a greedy first-fit pass; the balanced strategy
/// then narrows the working width as far as it can without changing the line
/// count, which distributes slack across the ragged right edge.
pub fn build_paragraph<M: GlyphMetrics>(
    styled: &StyledText<M>,
    max_width: f32,
    strategy: TextBreakStrategy,
    include_font_padding: bool,
) -> Paragraph {
    let mut lines = break_greedy(styled, max_width);
    if strategy == TextBreakStrategy::Balanced && lines.len() > 1 && max_width.is_finite() {
        lines = balance(styled, lines, max_width);
    }
    Paragraph::new(lines, max_width, include_font_padding)
}

/// Accumulates one line's boundaries and metrics while characters stream in.
struct LineAccum {
    start: usize,
    xs: Vec<f32>,
    trimmed: f32,
    metrics: Option<LineMetrics>,
    prev: Option<(char, usize)>,
}

impl LineAccum {
    fn new(start: usize) -> Self {
        Self {
            start,
            xs: vec![0.0],
            trimmed: 0.0,
            metrics: None,
            prev: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.xs.len() == 1
    }

    fn pen(&self) -> f32 {
        self.xs[self.xs.len() - 1]
    }

    fn push<M: GlyphMetrics>(&mut self, ch: char, span_index: usize, span: &StyledSpan<M>) {
        let kern = match self.prev {
            Some((p, ps)) if ps == span_index && !ch.is_control() => span.glyphs.kern(p, ch),
            _ => 0.0,
        };
        // the boundary between the previous character and this one shifts by
        // the kerning of the pair
        let last = self.xs.len() - 1;
        self.xs[last] += kern;
        let origin = self.xs[last];

        let (advance, bound) = if ch.is_control() {
            (0.0, 0.0)
        } else {
            (
                span.glyphs.advance(ch) + span.letter_spacing,
                span.glyphs.bound(ch),
            )
        };
        if !ch.is_whitespace() {
            self.trimmed = self.trimmed.max(origin + bound);
        }
        self.xs.push(origin + advance);

        let span_metrics = span.glyphs.line_metrics();
        match &mut self.metrics {
            Some(metrics) => metrics.merge(&span_metrics),
            None => self.metrics = Some(span_metrics),
        }
        self.prev = Some((ch, span_index));
    }

    /// Converts the accumulator into a line ending at `end`.
    ///
    /// An empty line (text ending in a newline) carries no metrics of its
    /// own; `fallback` supplies the metrics of the preceding text so the
    /// empty row still reserves vertical space.
    fn finish(self, end: usize, fallback: Option<LineMetrics>) -> Line {
        let metrics = self.metrics.or(fallback).unwrap_or(LineMetrics::ZERO);
        let advance = self.xs[self.xs.len() - 1];
        Line {
            start: self.start,
            end,
            used_width: self.trimmed,
            advance,
            metrics,
            xs: self.xs,
        }
    }
}

/// Advance width of `chars[from..to]` appended after `context`.
///
/// Kerning applies between characters of the same span; the context carries
/// the would-be previous character so wrap decisions account for the
/// boundary pair.
fn advance_width<M: GlyphMetrics>(
    styled: &StyledText<M>,
    from: usize,
    to: usize,
    context: Option<(char, usize)>,
) -> f32 {
    let chars = styled.chars();
    let mut width = 0.0f32;
    let mut prev = context;
    for k in from..to {
        let ch = chars[k];
        let span_index = styled.span_index_of(k);
        if ch.is_control() {
            prev = Some((ch, span_index));
            continue;
        }
        let span = &styled.spans()[span_index];
        let kern = match prev {
            Some((p, ps)) if ps == span_index => span.glyphs.kern(p, ch),
            _ => 0.0,
        };
        width += kern + span.glyphs.advance(ch) + span.letter_spacing;
        prev = Some((ch, span_index));
    }
    width
}

/// Greedy first-fit line breaking.
///
/// Words wrap at separator boundaries; separators themselves never force a
/// wrap (trailing blanks may overflow the limit and are trimmed out of the
/// used width). A word that cannot fit on a line of its own is filled
/// character by character, always placing at least one character per line.
fn break_greedy<M: GlyphMetrics>(styled: &StyledText<M>, limit: f32) -> Vec<Line> {
    let chars = styled.chars();
    let mut lines = Vec::new();
    let mut acc = LineAccum::new(0);
    let mut last_metrics: Option<LineMetrics> = None;

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        let span_index = styled.span_index_of(i);
        let span = &styled.spans()[span_index];
        last_metrics = Some(span.glyphs.line_metrics());

        if ch == '\n' {
            acc.push(ch, span_index, span);
            lines.push(acc.finish(i + 1, None));
            acc = LineAccum::new(i + 1);
            i += 1;
            continue;
        }

        if ch.is_whitespace() {
            acc.push(ch, span_index, span);
            i += 1;
            continue;
        }

        let word_end = chars[i..]
            .iter()
            .position(|c| c.is_whitespace())
            .map(|offset| i + offset)
            .unwrap_or(chars.len());

        let appended = advance_width(styled, i, word_end, acc.prev);
        if !acc.is_empty() && acc.pen() + appended > limit {
            lines.push(acc.finish(i, None));
            acc = LineAccum::new(i);
        }

        if advance_width(styled, i, word_end, None) > limit {
            // the word alone overflows; fill character by character
            for k in i..word_end {
                let k_span_index = styled.span_index_of(k);
                let k_span = &styled.spans()[k_span_index];
                let step = advance_width(styled, k, k + 1, acc.prev);
                if !acc.is_empty() && acc.pen() + step > limit {
                    lines.push(acc.finish(k, None));
                    acc = LineAccum::new(k);
                }
                acc.push(chars[k], k_span_index, k_span);
            }
        } else {
            for k in i..word_end {
                let k_span_index = styled.span_index_of(k);
                acc.push(chars[k], k_span_index, &styled.spans()[k_span_index]);
            }
        }
        i = word_end;
    }

    lines.push(acc.finish(chars.len(), last_metrics));
    lines
}

/// Evens out ragged wrapping by searching for the narrowest working width
/// that still produces the greedy pass's line count.
fn balance<M: GlyphMetrics>(styled: &StyledText<M>, greedy: Vec<Line>, max_width: f32) -> Vec<Line> {
    let target = greedy.len();
    let mut lo = 0.0f32;
    let mut hi = max_width;
    for _ in 0..BALANCE_STEPS {
        let mid = (lo + hi) * 0.5;
        if break_greedy(styled, mid).len() <= target {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    let balanced = break_greedy(styled, hi);
    if balanced.len() == target {
        balanced
    } else {
        greedy
    }
}
