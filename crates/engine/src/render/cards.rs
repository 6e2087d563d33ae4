//! Card sheet: a fixed grid of illustrated cards per page.

use std::path::Path;

use image::{Rgb, RgbImage};

use cardforge_domain::{CardBatch, CardRecord, Illustration};

use super::metrics::text_width;
use super::pdf::{PageCanvas, PdfWriter};
use super::text::{truncate_lines, wrap_text};
use super::{PlacedLine, RenderConfig, RenderError, RenderSummary};

/// Page, column and row a card lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot {
    pub page: usize,
    pub column: usize,
    pub row: usize,
}

/// Axis-aligned rectangle in PDF points, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Everything drawn for one card.
#[derive(Debug, Clone)]
pub struct CardCell {
    pub index: usize,
    pub slot: GridSlot,
    pub bounds: Rect,
    pub title_band: Rect,
    pub description_band: Rect,
    pub title: PlacedLine,
    pub card_type: PlacedLine,
    pub description: Vec<PlacedLine>,
    pub illustration: Option<Illustration>,
}

#[derive(Debug, Clone)]
pub struct CardsLayout {
    pub page_count: usize,
    pub cells: Vec<CardCell>,
}

/// Grid position of the card at `index` (0-based, batch order).
pub fn grid_slot(index: usize, config: &RenderConfig) -> GridSlot {
    let columns = config.grid_columns.max(1);
    let rows = config.grid_rows.max(1);
    GridSlot {
        page: index / config.cards_per_page(),
        column: index % columns,
        row: (index / columns) % rows,
    }
}

pub fn layout_cards(batch: &CardBatch, config: &RenderConfig) -> CardsLayout {
    let cells: Vec<CardCell> = batch
        .iter()
        .enumerate()
        .map(|(index, record)| layout_cell(index, record, config))
        .collect();

    let page_count = batch.len().div_ceil(config.cards_per_page()).max(1);
    CardsLayout { page_count, cells }
}

fn layout_cell(index: usize, record: &CardRecord, config: &RenderConfig) -> CardCell {
    let slot = grid_slot(index, config);
    let width = config.cell_width();
    let height = config.cell_height();
    let x = slot.column as f32 * width;
    let y = config.page_height - (slot.row as f32 + 1.0) * height;

    let title_band = Rect {
        x: x + 5.0,
        y: y + height - 45.0,
        width: width - 10.0,
        height: 40.0,
    };
    let description_band = Rect {
        x: x + 5.0,
        y: y + 5.0,
        width: width - 10.0,
        height: height - 55.0,
    };

    let title = PlacedLine {
        text: record.title.clone(),
        x: x + 10.0,
        baseline: y + height - 20.0,
        style: config.title_style,
    };
    let card_type = PlacedLine {
        text: record.card_type.clone(),
        x: x + 10.0,
        baseline: y + height - 35.0,
        style: config.type_style,
    };

    CardCell {
        index,
        slot,
        bounds: Rect {
            x,
            y,
            width,
            height,
        },
        title_band,
        description_band,
        title,
        card_type,
        description: layout_description(&record.description, x, y, width, height, config),
        illustration: record.illustration().cloned(),
    }
}

/// Centre the wrapped description in the lower part of the cell with the last
/// line sitting just above the bottom edge. Lines past the available height
/// are dropped.
fn layout_description(
    text: &str,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    config: &RenderConfig,
) -> Vec<PlacedLine> {
    let style = config.description_style;
    let wrap_width = width - 20.0;
    let max_lines = ((height - 60.0) / style.leading).floor().max(0.0) as usize;

    let lines = truncate_lines(
        wrap_text(text, style.face, style.size, wrap_width),
        max_lines,
        style.face,
        style.size,
        wrap_width,
    );

    let count = lines.len();
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let line_width = text_width(&line, style.face, style.size);
            PlacedLine {
                x: x + 10.0 + (wrap_width - line_width) / 2.0,
                baseline: y + 15.0 + (count - 1 - i) as f32 * style.leading,
                text: line,
                style,
            }
        })
        .collect()
}

/// Vertical gradient used when no illustration could be obtained: red and
/// green fade out towards the bottom while blue fades in. Green is held at
/// 200/255 of red.
pub fn fallback_gradient(size: u32) -> RgbImage {
    let mut image = RgbImage::new(size, size);
    let height = f64::from(size);

    for (_, y, pixel) in image.enumerate_pixels_mut() {
        let t = f64::from(y) / height;
        let r = (255.0 * (1.0 - t)) as u8;
        let g = (200.0 * (1.0 - t)) as u8;
        let b = (255.0 * t) as u8;
        *pixel = Rgb([r, g, b]);
    }

    image
}

/// Lay out the batch and write it to `path`.
pub fn render_cards(
    batch: &CardBatch,
    path: &Path,
    config: &RenderConfig,
) -> Result<RenderSummary, RenderError> {
    let layout = layout_cards(batch, config);
    let mut writer = PdfWriter::new(config.page_width, config.page_height);
    let title_state = writer.alpha_state(config.title_band_alpha);
    let description_state = writer.alpha_state(config.description_band_alpha);

    let mut fallback_image: Option<String> = None;

    let mut cells = layout.cells.iter().peekable();
    for page in 0..layout.page_count {
        let mut canvas = PageCanvas::new();

        while let Some(cell) = cells.next_if(|cell| cell.slot.page == page) {
            let bounds = cell.bounds;
            let image = match &cell.illustration {
                Some(Illustration::File(path)) => {
                    Some(writer.embed_image(path, config.max_image_edge)?)
                }
                Some(Illustration::Fallback) => Some(
                    fallback_image
                        .get_or_insert_with(|| {
                            writer.embed_rgb(
                                fallback_gradient(config.max_image_edge),
                                config.max_image_edge,
                            )
                        })
                        .clone(),
                ),
                None => None,
            };
            if let Some(image) = image {
                canvas.image(&image, bounds.x, bounds.y, bounds.width, bounds.height);
            }
            canvas.stroke_rect(
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height,
                config.border_width,
            );

            let band = cell.title_band;
            canvas.translucent_white_rect(&title_state, band.x, band.y, band.width, band.height);
            let band = cell.description_band;
            canvas.translucent_white_rect(
                &description_state,
                band.x,
                band.y,
                band.width,
                band.height,
            );

            for line in [&cell.title, &cell.card_type]
                .into_iter()
                .chain(cell.description.iter())
            {
                canvas.text(
                    line.style.face,
                    line.style.size,
                    line.x,
                    line.baseline,
                    &line.text,
                );
            }
        }

        writer.add_page(canvas)?;
    }

    let pages = writer.save(path)?;
    tracing::info!(
        cards = batch.len(),
        pages,
        path = %path.display(),
        "Card sheet written"
    );
    Ok(RenderSummary { pages })
}
