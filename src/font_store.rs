use std::{collections::HashMap, path::PathBuf, sync::Arc};

use crate::config::FontStyle;

/// Manages font discovery and loading using `fontdb` and `fontdue`.
///
/// A database of available faces (`fontdb`) is combined with a lazily filled
/// cache of parsed font instances (`fontdue`). Measurement queries resolve a
/// family/weight/style triple to a loaded font, falling back to the generic
/// sans-serif family and then to any loadable face, so measurement keeps
/// working when the requested family is absent.
pub struct FontStore {
    /// The face database populated by the load methods.
    font_db: fontdb::Database,
    /// Parsed fonts; not every face in the database is necessarily loaded.
    loaded: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
}

impl Default for FontStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStore {
    /// Creates an empty font store.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Loading fonts into the database.
impl FontStore {
    /// Loads a font from binary data.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_db.load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir)
    }

    /// Loads the system fonts.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Checks if the store has no faces.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Returns the number of available faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }

    /// Sets the family name for the "serif" generic family.
    pub fn set_serif_family(&mut self, family: impl Into<String>) {
        self.font_db.set_serif_family(family);
    }

    /// Sets the family name for the "sans-serif" generic family.
    pub fn set_sans_serif_family(&mut self, family: impl Into<String>) {
        self.font_db.set_sans_serif_family(family);
    }

    /// Sets the family name for the "monospace" generic family.
    pub fn set_monospace_family(&mut self, family: impl Into<String>) {
        self.font_db.set_monospace_family(family);
    }
}

/// Resolving fonts for measurement.
impl FontStore {
    /// Resolves a family/weight/style triple to a loaded font.
    ///
    /// Falls back to sans-serif when the family does not match, and to any
    /// loadable face after that. Returns `None` only when nothing in the
    /// store can be parsed.
    pub fn query_for_style(
        &mut self,
        family: Option<&str>,
        weight: u16,
        style: FontStyle,
    ) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        let style = match style {
            FontStyle::Normal => fontdb::Style::Normal,
            FontStyle::Italic => fontdb::Style::Italic,
            FontStyle::Oblique => fontdb::Style::Oblique,
        };
        let families: Vec<fontdb::Family<'_>> = match family {
            Some(name) => vec![fontdb::Family::Name(name), fontdb::Family::SansSerif],
            None => vec![fontdb::Family::SansSerif],
        };
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(weight),
            stretch: fontdb::Stretch::Normal,
            style,
        };
        if let Some(id) = self.font_db.query(&query)
            && let Some(font) = self.font(id)
        {
            return Some((id, font));
        }

        // the requested face is unavailable; measure with whatever loads
        let candidates: Vec<fontdb::ID> = self.font_db.faces().map(|face| face.id).collect();
        candidates
            .into_iter()
            .find_map(|id| self.font(id).map(|font| (id, font)))
    }

    /// Retrieves a loaded font by ID, parsing it on first use.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            scale: 40.0,
                            load_substitutions: true,
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => {
                        let loaded: &mut Arc<fontdue::Font> = entry.insert(Arc::new(font));
                        Some(Arc::clone(loaded))
                    }
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }
}
