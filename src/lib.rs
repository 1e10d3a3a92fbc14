//! # Monosashi
//!
//! Text-measurement primitives backed by a font-driven layout engine.
//!
//! ## Overview
//!
//! `Monosashi` computes line wrapping, width, height, and per-character
//! offsets for a piece of styled text, consistent with how the text would
//! actually be drawn. The entry point is [`TextMeasurer`], which coordinates
//! font loading and the measurement pipeline.
//!
//! Every call is an independent request/response pass: a loose
//! [`MeasureSpecs`] record is resolved into a typed configuration, the text
//! is laid out (a single-line fast path handles uncomplicated runs, a
//! paragraph breaker everything else), and the resulting geometry is
//! extracted into a [`MeasureResult`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use monosashi::{MeasureSpecs, TextMeasurer};
//!
//! let measurer = TextMeasurer::new();
//! measurer.load_system_fonts();
//!
//! let specs = MeasureSpecs {
//!     text: Some("hello world".into()),
//!     width: Some(200.0),
//!     include_font_padding: Some(false),
//!     ..Default::default()
//! };
//! let result = measurer.measure(&specs, 2.0).expect("measurement");
//! println!("{} lines, {} wide", result.line_count, result.width);
//! ```
//!
//! ## Features
//!
//! *   **Two-tier layout**: a fast path for simple single-line runs and a
//!     greedy/balanced break engine for everything else.
//! *   **Density aware**: inputs and outputs are device-independent units,
//!     converted through an explicit caller-supplied density.
//! *   **Font management**: easy loading of system fonts and custom font
//!     files, with family/weight/style queries.
//! *   **Thread safety**: independent measurement calls run in parallel;
//!     locking is scoped to lazy font loading.

pub mod config;
pub mod error;
pub mod font_store;
pub mod measure;
pub mod measurer;
pub mod text;

// common re-exports
pub use config::{FontStyle, MeasureConfig, MeasureSpecs, TextBreakStrategy};
pub use error::MeasureError;
pub use font_store::FontStore;
pub use measure::{LineInfo, MeasureResult, minimal_line_height};
pub use measurer::TextMeasurer;

// re-export dependencies
pub use fontdb;
pub use fontdue;
pub use parking_lot;
