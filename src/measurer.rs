use std::path::PathBuf;

use parking_lot::Mutex;

use crate::config::{MeasureConfig, MeasureSpecs};
use crate::error::MeasureError;
use crate::font_store::FontStore;
use crate::measure::{self, MeasureResult};
use crate::text::data::StyledText;
use crate::text::engine::FontGlyphs;

/// High-level entry point for text measurement.
///
/// Coordinates the font store and the measurement pipeline behind a single
/// interface. The store sits behind a `Mutex` because `fontdue` instances
/// are parsed lazily on first use; the lock is scoped to font resolution
/// alone, so independent measurement calls run in parallel once their fonts
/// are loaded.
///
/// The field is public to allow direct access to the underlying store when
/// necessary.
pub struct TextMeasurer {
    /// The underlying font store.
    pub font_store: Mutex<FontStore>,
}

impl Default for TextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer {
    /// Creates a measurer with an empty font store.
    pub fn new() -> Self {
        Self {
            font_store: Mutex::new(FontStore::new()),
        }
    }
}

/// font store initialization
impl TextMeasurer {
    /// Loads the system fonts into the store.
    pub fn load_system_fonts(&self) {
        self.font_store.lock().load_system_fonts();
    }

    /// Loads a font from binary data.
    pub fn load_font_binary(&self, data: impl Into<Vec<u8>>) {
        self.font_store.lock().load_font_binary(data);
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_store.lock().load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&self, dir: PathBuf) {
        self.font_store.lock().load_fonts_dir(dir)
    }

    /// Checks if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.font_store.lock().is_empty()
    }

    /// Returns the number of available faces.
    pub fn len(&self) -> usize {
        self.font_store.lock().len()
    }

    /// Sets the family name for the "serif" generic family.
    pub fn set_serif_family(&self, family: impl Into<String>) {
        self.font_store.lock().set_serif_family(family);
    }

    /// Sets the family name for the "sans-serif" generic family.
    pub fn set_sans_serif_family(&self, family: impl Into<String>) {
        self.font_store.lock().set_sans_serif_family(family);
    }

    /// Sets the family name for the "monospace" generic family.
    pub fn set_monospace_family(&self, family: impl Into<String>) {
        self.font_store.lock().set_monospace_family(family);
    }
}

/// measurement
impl TextMeasurer {
    /// Measures text against the given specs.
    ///
    /// All dimensional inputs are device-independent units scaled by
    /// `density` into physical pixels; every output is scaled back by the
    /// same factor. Validation failures and layout failures are both
    /// reported through [`MeasureError`]; there are no partial results.
    pub fn measure(
        &self,
        specs: &MeasureSpecs,
        density: f32,
    ) -> Result<MeasureResult, MeasureError> {
        let config = MeasureConfig::resolve(specs, density)?;
        if config.text.is_empty() {
            // an empty string still occupies one line of vertical space; no
            // layout or font resolution is needed to report it
            return Ok(measure::empty_result(&config));
        }
        let styled = self.styled_text(&config)?;
        measure::measure_styled(&styled, &config)
    }

    /// Returns one advance width per character of the whole string, in
    /// source order and device-independent units.
    ///
    /// No maximum width is needed; the text is laid out as a single
    /// unconstrained line.
    pub fn measure_chars(
        &self,
        specs: &MeasureSpecs,
        density: f32,
    ) -> Result<Vec<f32>, MeasureError> {
        let config = MeasureConfig::resolve_for_chars(specs, density)?;
        if config.text.is_empty() {
            return Ok(Vec::new());
        }
        let styled = self.styled_text(&config)?;
        Ok(measure::char_advances(&styled, config.density))
    }

    /// Resolves the configured style to styled text ready for layout.
    ///
    /// The font store lock is held only while the font is resolved; layout
    /// itself runs on the returned `Arc` handle.
    fn styled_text(&self, config: &MeasureConfig) -> Result<StyledText<FontGlyphs>, MeasureError> {
        let found = {
            let mut store = self.font_store.lock();
            store.query_for_style(
                config.font_family.as_deref(),
                config.font_weight,
                config.font_style,
            )
        };
        let Some((_, font)) = found else {
            log::warn!(
                "no usable font for family {:?}; was the store populated?",
                config.font_family
            );
            return Err(MeasureError::Unknown("no usable font loaded".into()));
        };
        Ok(StyledText::uniform(
            config.text.as_str(),
            FontGlyphs::new(font, config.font_size),
            config.letter_spacing,
        ))
    }
}
