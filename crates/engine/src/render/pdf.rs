//! Thin PDF writer over lopdf.
//!
//! Collects pages of content operations plus the shared resources they use
//! (two standard fonts, alpha states, embedded images) and writes one document.

use std::path::Path;

use image::{DynamicImage, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::metrics::{encode_win_ansi, FontFace};
use super::RenderError;

fn real(value: f32) -> Object {
    value.into()
}

/// Content operations for one page.
#[derive(Debug, Default)]
pub struct PageCanvas {
    operations: Vec<Operation>,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place one line of text with its baseline starting at `(x, y)`.
    pub fn text(&mut self, face: FontFace, size: f32, x: f32, y: f32, text: &str) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![face.resource_name().into(), real(size)]),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Fill a white rectangle through the named alpha state.
    pub fn translucent_white_rect(&mut self, state: &str, x: f32, y: f32, width: f32, height: f32) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("gs", vec![state.into()]),
            Operation::new("rg", vec![real(1.0), real(1.0), real(1.0)]),
            Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("w", vec![real(line_width)]),
            Operation::new("RG", vec![real(0.0), real(0.0), real(0.0)]),
            Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Draw a registered image scaled to fill the given box.
    pub fn image(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![real(width), real(0.0), real(0.0), real(height), real(x), real(y)],
            ),
            Operation::new("Do", vec![name.into()]),
            Operation::new("Q", vec![]),
        ]);
    }
}

pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    width: f32,
    height: f32,
    fonts: Dictionary,
    ext_states: Dictionary,
    x_objects: Dictionary,
}

impl PdfWriter {
    pub fn new(width: f32, height: f32) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for face in [FontFace::Regular, FontFace::Bold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource_name(), font_id);
        }

        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            width,
            height,
            fonts,
            ext_states: Dictionary::new(),
            x_objects: Dictionary::new(),
        }
    }

    /// Register a fill-alpha graphics state and return its resource name.
    pub fn alpha_state(&mut self, alpha: f32) -> String {
        let name = format!("GS{}", (alpha * 100.0).round() as u32);
        if !self.ext_states.has(name.as_bytes()) {
            let state_id = self.doc.add_object(dictionary! {
                "Type" => "ExtGState",
                "ca" => real(alpha),
            });
            self.ext_states.set(name.clone(), state_id);
        }
        name
    }

    /// Decode an image file and embed it as an RGB image, shrinking it so
    /// neither edge exceeds `max_edge`. Returns its resource name.
    pub fn embed_image(&mut self, path: &Path, max_edge: u32) -> Result<String, RenderError> {
        let bytes = std::fs::read(path)?;
        let decoded = image::load_from_memory(&bytes)?;
        Ok(self.embed_decoded(decoded, max_edge))
    }

    /// Embed an image that only exists in memory.
    pub fn embed_rgb(&mut self, image: RgbImage, max_edge: u32) -> String {
        self.embed_decoded(DynamicImage::ImageRgb8(image), max_edge)
    }

    fn embed_decoded(&mut self, mut decoded: DynamicImage, max_edge: u32) -> String {
        if decoded.width() > max_edge || decoded.height() > max_edge {
            decoded = decoded.thumbnail(max_edge, max_edge);
        }
        let rgb = decoded.to_rgb8();

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(rgb.width()),
                "Height" => i64::from(rgb.height()),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
            },
            rgb.into_raw(),
        );
        let image_id = self.doc.add_object(stream);

        let name = format!("Im{}", self.x_objects.len());
        self.x_objects.set(name.clone(), image_id);
        name
    }

    pub fn add_page(&mut self, canvas: PageCanvas) -> Result<(), RenderError> {
        let content = Content {
            operations: canvas.operations,
        };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Write the document. A document without pages gets one blank page.
    pub fn save(mut self, path: &Path) -> Result<usize, RenderError> {
        if self.page_ids.is_empty() {
            self.add_page(PageCanvas::new())?;
        }

        let resources_id = self.doc.add_object(dictionary! {
            "Font" => self.fonts,
            "ExtGState" => self.ext_states,
            "XObject" => self.x_objects,
        });

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let page_count = kids.len();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(self.width), real(self.height)],
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        self.doc.compress();
        self.doc.save(path)?;
        Ok(page_count)
    }
}
