/// Input data structures consumed by layout.
pub mod data;
/// The measurement layout engine.
pub mod engine;

pub use data::{StyledSpan, StyledText};
pub use engine::{FontGlyphs, GlyphMetrics, Line, LineMetrics, Paragraph, SimpleRun};
