//! Single-column rules document.

use std::path::Path;

use super::pdf::{PageCanvas, PdfWriter};
use super::text::wrap_text;
use super::{PlacedLine, RenderConfig, RenderError, RenderSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    Body,
}

/// A paragraph of the rules text after markup has been interpreted.
///
/// Each segment starts on a new line; bullet items are their own segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub segments: Vec<String>,
}

/// Lines of the rules document, page by page.
#[derive(Debug, Clone, Default)]
pub struct RulesLayout {
    pub pages: Vec<Vec<PlacedLine>>,
}

impl RulesLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Split text into paragraphs on blank lines and classify each one.
///
/// A paragraph is a header when it carries `**` markers or has letters but no
/// lower-case ones. Markers are removed. Lines starting with `-` become bullet
/// segments; any other line continues the segment before it.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            blocks.extend(finish_paragraph(&paragraph));
            paragraph.clear();
        } else {
            paragraph.push(line);
        }
    }
    blocks.extend(finish_paragraph(&paragraph));

    blocks
}

fn finish_paragraph(lines: &[&str]) -> Option<Block> {
    if lines.is_empty() {
        return None;
    }

    let marked = lines.iter().any(|line| line.contains("**"));
    let kind = if marked || is_upper_case(lines) {
        BlockKind::Header
    } else {
        BlockKind::Body
    };

    let mut segments: Vec<String> = Vec::new();
    for line in lines {
        let line = line.replace("**", "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(item) = line.strip_prefix('-') {
            segments.push(format!("\u{2022} {}", item.trim_start()));
        } else if let Some(last) = segments.last_mut() {
            last.push(' ');
            last.push_str(line);
        } else {
            segments.push(line.to_string());
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(Block { kind, segments })
    }
}

/// At least one cased letter and none of them lowercase. Scripts without case
/// (CJK, Arabic) never make a block a header on their own.
fn is_upper_case(lines: &[&str]) -> bool {
    let mut cased = lines
        .iter()
        .flat_map(|line| line.chars())
        .filter(|c| c.is_uppercase() || c.is_lowercase())
        .peekable();
    cased.peek().is_some() && cased.all(char::is_uppercase)
}

/// Flow the blocks down the page, starting a new page whenever a block would
/// reach the bottom margin. A block taller than a whole page continues line by
/// line on the following pages.
pub fn layout_rules(text: &str, config: &RenderConfig) -> RulesLayout {
    let top = config.page_height - config.margin;
    let usable_width = config.page_width - 2.0 * config.margin;

    let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
    let mut cursor = top;

    for block in parse_blocks(text) {
        let (style, indent) = match block.kind {
            BlockKind::Header => (config.header_style, 0.0),
            BlockKind::Body => (config.body_style, config.body_indent),
        };
        let width = usable_width - indent;
        let lines: Vec<String> = block
            .segments
            .iter()
            .flat_map(|segment| wrap_text(segment, style.face, style.size, width))
            .collect();
        if lines.is_empty() {
            continue;
        }

        let height = lines.len() as f32 * style.leading;
        let page_has_content = pages.last().is_some_and(|page| !page.is_empty());
        if page_has_content && cursor - height <= config.margin {
            pages.push(Vec::new());
            cursor = top;
        }

        for line in lines {
            let page_has_content = pages.last().is_some_and(|page| !page.is_empty());
            if page_has_content && cursor - style.leading < config.margin {
                pages.push(Vec::new());
                cursor = top;
            }
            if let Some(page) = pages.last_mut() {
                page.push(PlacedLine {
                    text: line,
                    x: config.margin + indent,
                    baseline: cursor - style.size,
                    style,
                });
            }
            cursor -= style.leading;
        }

        cursor -= config.paragraph_spacing;
    }

    RulesLayout { pages }
}

/// Lay out the rules text and write it to `path`.
pub fn render_rules(
    text: &str,
    path: &Path,
    config: &RenderConfig,
) -> Result<RenderSummary, RenderError> {
    let layout = layout_rules(text, config);
    let mut writer = PdfWriter::new(config.page_width, config.page_height);

    for page in layout.pages {
        let mut canvas = PageCanvas::new();
        for line in &page {
            canvas.text(
                line.style.face,
                line.style.size,
                line.x,
                line.baseline,
                &line.text,
            );
        }
        writer.add_page(canvas)?;
    }

    let pages = writer.save(path)?;
    tracing::info!(pages, path = %path.display(), "Rules document written");
    Ok(RenderSummary { pages })
}
