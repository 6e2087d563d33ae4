//! Document rendering.
//!
//! Turns the rules text and a finished [`CardBatch`](cardforge_domain::CardBatch)
//! into two PDF files. Layout (where every line, band and image goes) is
//! computed first and kept separate from encoding, so pagination can be
//! checked without parsing PDF output.

mod cards;
mod metrics;
mod pdf;
mod rules;
mod text;

pub use cards::{
    fallback_gradient, grid_slot, layout_cards, render_cards, CardCell, CardsLayout, GridSlot,
    Rect,
};
pub use metrics::FontFace;
pub use rules::{layout_rules, parse_blocks, render_rules, Block, BlockKind, RulesLayout};

/// A4 in PDF points.
pub const A4_WIDTH: f32 = 595.2756;
pub const A4_HEIGHT: f32 = 841.8898;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF encoding error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Font, size and line height for one kind of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub leading: f32,
}

impl TextStyle {
    pub const fn new(face: FontFace, size: f32, leading: f32) -> Self {
        Self {
            face,
            size,
            leading,
        }
    }
}

/// Page geometry and typography shared by both documents.
///
/// Built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub page_width: f32,
    pub page_height: f32,

    // Rules document
    pub margin: f32,
    pub paragraph_spacing: f32,
    pub body_indent: f32,
    pub header_style: TextStyle,
    pub body_style: TextStyle,

    // Card grid
    pub grid_columns: usize,
    pub grid_rows: usize,
    pub title_style: TextStyle,
    pub type_style: TextStyle,
    pub description_style: TextStyle,
    pub title_band_alpha: f32,
    pub description_band_alpha: f32,
    pub border_width: f32,
    /// Embedded illustrations are shrunk so neither edge exceeds this
    pub max_image_edge: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: 50.0,
            paragraph_spacing: 10.0,
            body_indent: 20.0,
            header_style: TextStyle::new(FontFace::Bold, 16.0, 20.0),
            body_style: TextStyle::new(FontFace::Regular, 12.0, 14.0),
            grid_columns: 3,
            grid_rows: 3,
            title_style: TextStyle::new(FontFace::Bold, 14.0, 16.0),
            type_style: TextStyle::new(FontFace::Regular, 10.0, 12.0),
            description_style: TextStyle::new(FontFace::Regular, 10.0, 12.0),
            title_band_alpha: 0.8,
            description_band_alpha: 0.7,
            border_width: 1.0,
            max_image_edge: 512,
        }
    }
}

impl RenderConfig {
    pub fn cards_per_page(&self) -> usize {
        (self.grid_columns * self.grid_rows).max(1)
    }

    pub fn cell_width(&self) -> f32 {
        self.page_width / self.grid_columns.max(1) as f32
    }

    pub fn cell_height(&self) -> f32 {
        self.page_height / self.grid_rows.max(1) as f32
    }
}

/// One line of text positioned on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub style: TextStyle,
}

/// What a render call produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub pages: usize,
}
