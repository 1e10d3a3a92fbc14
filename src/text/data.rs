use crate::error::MeasureError;
use crate::text::engine::GlyphMetrics;

/// Text plus the ordered style spans measurement runs over.
///
/// Spans are resolved up front (font handle, pixel size, letter spacing) so
/// the layout code never touches configuration or the font store. The value
/// is immutable once built and consumed by a single measurement call.
#[derive(Clone)]
pub struct StyledText<M> {
    text: String,
    chars: Vec<char>,
    spans: Vec<StyledSpan<M>>,
}

/// A `[start, end)` character range rendered with one resolved style.
#[derive(Clone)]
pub struct StyledSpan<M> {
    pub start: usize,
    pub end: usize,
    pub glyphs: M,
    /// Extra advance per character, physical pixels.
    pub letter_spacing: f32,
}

impl<M: GlyphMetrics> StyledText<M> {
    /// Builds styled text from explicit spans.
    ///
    /// Spans must be non-empty, ordered, and cover every character exactly
    /// once. Anything else is a malformed request and is rejected before
    /// layout starts.
    pub fn new(text: impl Into<String>, spans: Vec<StyledSpan<M>>) -> Result<Self, MeasureError> {
        let text = text.into();
        let chars: Vec<char> = text.chars().collect();

        let mut cursor = 0usize;
        for span in &spans {
            if span.start != cursor || span.end <= span.start || span.end > chars.len() {
                return Err(MeasureError::Unknown(format!(
                    "invalid style span {}..{} over {} characters",
                    span.start,
                    span.end,
                    chars.len()
                )));
            }
            cursor = span.end;
        }
        if cursor != chars.len() {
            return Err(MeasureError::Unknown(format!(
                "style spans cover {cursor} of {} characters",
                chars.len()
            )));
        }

        Ok(Self { text, chars, spans })
    }

    /// Styled text with one uniform style across the whole string.
    pub fn uniform(text: impl Into<String>, glyphs: M, letter_spacing: f32) -> Self {
        let text = text.into();
        let chars: Vec<char> = text.chars().collect();
        let spans = if chars.is_empty() {
            Vec::new()
        } else {
            vec![StyledSpan {
                start: 0,
                end: chars.len(),
                glyphs,
                letter_spacing,
            }]
        };
        Self { text, chars, spans }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn spans(&self) -> &[StyledSpan<M>] {
        &self.spans
    }

    /// Number of characters (not bytes).
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Index of the span covering `char_index`.
    pub fn span_index_of(&self, char_index: usize) -> usize {
        self.spans
            .iter()
            .position(|span| char_index < span.end)
            .unwrap_or_else(|| self.spans.len().saturating_sub(1))
    }

    /// Iterates `(char index, character, span index)` in source order.
    pub(crate) fn indexed_chars(&self) -> impl Iterator<Item = (usize, char, usize)> + '_ {
        self.spans.iter().enumerate().flat_map(move |(si, span)| {
            self.chars[span.start..span.end]
                .iter()
                .enumerate()
                .map(move |(offset, &ch)| (span.start + offset, ch, si))
        })
    }
}
