//! PDF Document wrapper

use crate::font::StandardFont;
use crate::graphics::{generate_circle_operators, generate_line_operators, StrokeStyle};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{PdfError, Point, Rect, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Red color
    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// PDF Document wrapper providing overlay drawing on existing pages
///
/// Drawing calls are buffered per page and written to the content streams
/// when the document is saved, after the original page content.
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Current font
    current_font: StandardFont,
    /// Current font size
    current_font_size: f32,
    /// Current text color
    current_text_color: Color,
    /// Font dictionaries added to the document (font -> PDF object ID)
    font_objects: HashMap<StandardFont, ObjectId>,
    /// Page font resources (page number -> font -> resource name)
    page_font_resources: HashMap<usize, HashMap<StandardFont, String>>,
    /// Buffered content operators per page (page number -> operators)
    page_content_buffer: HashMap<usize, Vec<u8>>,
}

impl PdfDocument {
    /// Open a PDF document from a file path
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::open("template.pdf")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let inner = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_document(inner))
    }

    /// Open a PDF document from bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_document(inner))
    }

    fn from_document(inner: Document) -> Self {
        Self {
            inner,
            current_font: StandardFont::default(),
            current_font_size: 12.0,
            current_text_color: Color::default(),
            font_objects: HashMap::new(),
            page_font_resources: HashMap::new(),
            page_content_buffer: HashMap::new(),
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Set the current font and size for subsequent text insertions
    pub fn set_font(&mut self, font: StandardFont, size: f32) {
        self.current_font = font;
        self.current_font_size = size;
    }

    /// Set the text color
    ///
    /// # Example
    /// ```ignore
    /// doc.set_text_color(Color::red());
    /// doc.set_text_color(Color::from_rgb(255, 128, 0)); // Orange
    /// ```
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Insert left-aligned text with its baseline at a position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Baseline Y coordinate in points (from top)
    pub fn insert_text(&mut self, text: &str, page: usize, x: f64, y: f64) -> Result<()> {
        self.check_page(page)?;

        if text.is_empty() {
            return Ok(());
        }

        let font = self.current_font;
        let font_resource_name = self.get_or_create_font_ref(font, page)?;

        let (pdf_x, pdf_y) = self.to_pdf_space(page, x, y)?;

        let ctx = TextRenderContext {
            font_name: font_resource_name,
            font_size: self.current_font_size,
            color: self.current_text_color,
        };
        let operators = generate_text_operators(&font.encode_text_hex(text), pdf_x, pdf_y, &ctx);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Insert left-aligned text inside a box
    ///
    /// The first line starts at the box's left edge, one font size below its
    /// top edge. The text is neither measured nor wrapped, so anything wider
    /// than the box simply runs past its right edge.
    pub fn insert_text_box(&mut self, text: &str, page: usize, rect: &Rect) -> Result<()> {
        let baseline = rect.y0 + self.current_font_size as f64;
        self.insert_text(text, page, rect.x0, baseline)
    }

    /// Stroke a straight line between two points (top-left coordinates)
    pub fn draw_line(&mut self, page: usize, from: Point, to: Point, style: &StrokeStyle) -> Result<()> {
        self.check_page(page)?;

        let from = self.to_pdf_space(page, from.x, from.y)?;
        let to = self.to_pdf_space(page, to.x, to.y)?;
        let operators = generate_line_operators(from, to, style);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Fill a circle centered at a point (top-left coordinates)
    pub fn fill_circle(&mut self, page: usize, center: Point, radius: f64, color: Color) -> Result<()> {
        self.check_page(page)?;

        let center = self.to_pdf_space(page, center.x, center.y)?;
        let operators = generate_circle_operators(center, radius, color);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize()?;

        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Write buffered drawing into the page objects
    fn finalize(&mut self) -> Result<()> {
        // 1. Flush buffered content streams to pages
        self.flush_content_buffers()?;

        // 2. Add font dictionaries and page font resources
        self.finalize_page_font_resources()?;

        Ok(())
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    /// Get page width and height in points
    pub fn page_size(&self, page: usize) -> Result<(f64, f64)> {
        let [left, bottom, right, top] = self.page_box(page)?;
        Ok((right - left, top - bottom))
    }

    /// Page box as `[left, bottom, right, top]` in PDF user space
    fn page_box(&self, page: usize) -> Result<[f64; 4]> {
        let page_id = self.page_id(page)?;
        let media_box = self.get_inherited_media_box(page_id)?;
        let [x1, y1, x2, y2] = extract_media_box(&media_box)?;
        Ok([x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)])
    }

    /// Map a point measured from the top-left corner of the page box to PDF
    /// user space
    fn to_pdf_space(&self, page: usize, x: f64, y: f64) -> Result<(f64, f64)> {
        let [left, _, _, top] = self.page_box(page)?;
        Ok((left + x, top - y))
    }

    fn check_page(&self, page: usize) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }
        Ok(())
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        pages
            .get(&(page as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page, pages.len()))
    }

    /// Get or create a font reference for a specific page
    ///
    /// Returns the resource name (e.g., "F1", "F2") for use in content
    /// streams. Names already present in the page's own resources are skipped
    /// so the template's fonts are never shadowed.
    fn get_or_create_font_ref(&mut self, font: StandardFont, page: usize) -> Result<String> {
        if let Some(resource_name) = self
            .page_font_resources
            .get(&page)
            .and_then(|fonts| fonts.get(&font))
        {
            return Ok(resource_name.clone());
        }

        let taken = self.existing_font_names(page)?;
        let page_resources = self.page_font_resources.entry(page).or_default();

        let mut n = 1;
        let resource_name = loop {
            let candidate = format!("F{n}");
            let in_use = taken.contains(candidate.as_bytes())
                || page_resources.values().any(|name| *name == candidate);
            if !in_use {
                break candidate;
            }
            n += 1;
        };

        // Font will be added to page resources at save time
        page_resources.insert(font, resource_name.clone());

        Ok(resource_name)
    }

    /// Font resource names already defined for a page
    fn existing_font_names(&self, page: usize) -> Result<HashSet<Vec<u8>>> {
        let page_id = self.page_id(page)?;
        let resources = self.get_inherited_resources(page_id)?;

        let names = resources
            .get(b"Font")
            .ok()
            .and_then(|font| self.resolve_dict(font))
            .map(|dict| dict.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default();

        Ok(names)
    }

    /// Add font dictionaries and register them in each page's resources
    fn finalize_page_font_resources(&mut self) -> Result<()> {
        let page_resources: Vec<(usize, Vec<(StandardFont, String)>)> = self
            .page_font_resources
            .iter()
            .map(|(&page, fonts)| {
                let font_list = fonts
                    .iter()
                    .map(|(font, resource_name)| (*font, resource_name.clone()))
                    .collect();
                (page, font_list)
            })
            .collect();

        for (page, fonts) in page_resources {
            if fonts.is_empty() {
                continue;
            }

            let mut entries = Vec::with_capacity(fonts.len());
            for (font, resource_name) in fonts {
                let font_id = match self.font_objects.get(&font).copied() {
                    Some(id) => id,
                    None => {
                        let id = self.inner.add_object(font.to_pdf_object());
                        self.font_objects.insert(font, id);
                        id
                    }
                };
                entries.push((resource_name, font_id));
            }

            self.add_fonts_to_page_resources(page, &entries)?;
        }

        Ok(())
    }

    /// Add multiple fonts to a page's Resources dictionary in a single operation
    ///
    /// Inherited or referenced resources are copied onto the page itself so
    /// the template's own resources stay intact.
    fn add_fonts_to_page_resources(&mut self, page: usize, fonts: &[(String, ObjectId)]) -> Result<()> {
        let page_id = self.page_id(page)?;

        let mut resources_dict = self.get_inherited_resources(page_id)?;

        let mut font_dict = resources_dict
            .get(b"Font")
            .ok()
            .and_then(|font| self.resolve_dict(font))
            .unwrap_or_default();

        for (resource_name, font_id) in fonts {
            font_dict.set(resource_name.as_bytes(), Object::Reference(*font_id));
        }

        resources_dict.set("Font", Object::Dictionary(font_dict));

        let mut page_dict = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::SaveError("Page object is not a dictionary".to_string()))?
            .clone();
        page_dict.set("Resources", Object::Dictionary(resources_dict));

        self.inner.objects.insert(page_id, page_dict.into());

        Ok(())
    }

    /// Get the Resources dictionary, following parent inheritance if needed
    fn get_inherited_resources(&self, page_id: ObjectId) -> Result<Dictionary> {
        let mut current_id = page_id;

        // Follow parent chain up to 10 levels (safety limit)
        for _ in 0..10 {
            let dict = self
                .inner
                .get_object(current_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            if let Ok(resources) = dict.get(b"Resources") {
                return Ok(self.resolve_dict(resources).unwrap_or_default());
            }

            if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
                current_id = *parent_id;
                continue;
            }

            break;
        }

        Ok(Dictionary::new())
    }

    /// Resolve a direct or referenced dictionary into an owned copy
    fn resolve_dict(&self, object: &Object) -> Option<Dictionary> {
        match object {
            Object::Dictionary(dict) => Some(dict.clone()),
            Object::Reference(ref_id) => self
                .inner
                .get_object(*ref_id)
                .ok()
                .and_then(|referred| referred.as_dict().ok())
                .cloned(),
            _ => None,
        }
    }

    /// Get MediaBox, following parent inheritance chain if needed
    fn get_inherited_media_box(&self, page_id: ObjectId) -> Result<Vec<Object>> {
        let mut current_id = page_id;

        // Follow parent chain up to 10 levels (safety limit)
        for _ in 0..10 {
            let obj = self.inner.get_object(current_id)?;
            let dict = obj
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            // Check for MediaBox or CropBox in current dictionary
            if let Ok(media_box) = dict.get(b"MediaBox").or_else(|_| dict.get(b"CropBox")) {
                // Handle both direct array and reference
                let media_box_array = match media_box {
                    Object::Array(arr) => arr.clone(),
                    Object::Reference(ref_id) => {
                        let referred = self.inner.get_object(*ref_id)?;
                        referred
                            .as_array()
                            .map_err(|_| {
                                PdfError::ParseError(
                                    "MediaBox reference is not an array".to_string(),
                                )
                            })?
                            .clone()
                    }
                    _ => return Err(PdfError::ParseError("MediaBox is not an array".to_string())),
                };
                return Ok(media_box_array);
            }

            // Follow Parent reference
            if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
                current_id = *parent_id;
                continue;
            }

            // No parent, break
            break;
        }

        // Fallback: assume A4 page size
        Ok(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(595.28), // A4 width
            Object::Real(841.89), // A4 height
        ])
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Flush all buffered content to page streams
    fn flush_content_buffers(&mut self) -> Result<()> {
        // Take ownership of buffer to avoid borrow issues
        let buffers: Vec<(usize, Vec<u8>)> = self.page_content_buffer.drain().collect();

        for (page, content) in buffers {
            if !content.is_empty() {
                debug!(page, bytes = content.len(), "flushing overlay content");
                self.append_to_content_stream(page, &content)?;
            }
        }

        Ok(())
    }

    /// Append content to a page's content stream
    ///
    /// The page's existing streams are referenced unchanged (filters
    /// included) and bracketed in a saved graphics state:
    /// `Contents [q, original..., Q + overlay]`.
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let page_id = self.page_id(page)?;

        let mut page_dict = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?
            .clone();

        let mut existing = Vec::new();
        match page_dict.get(b"Contents") {
            Ok(Object::Reference(ref_id)) => match self.inner.get_object(*ref_id) {
                Ok(Object::Array(arr)) => existing.extend(arr.iter().cloned()),
                _ => existing.push(Object::Reference(*ref_id)),
            },
            Ok(Object::Array(arr)) => existing.extend(arr.iter().cloned()),
            Ok(Object::Stream(stream)) => existing.push(Object::Stream(stream.clone())),
            _ => {}
        }

        // Direct streams are not valid array entries; move them to objects
        let existing: Vec<Object> = existing
            .into_iter()
            .filter_map(|object| match object {
                Object::Reference(_) => Some(object),
                Object::Stream(stream) => Some(Object::Reference(self.inner.add_object(stream))),
                _ => None,
            })
            .collect();

        let contents = if existing.is_empty() {
            let stream_id = self
                .inner
                .add_object(Stream::new(Dictionary::new(), content.to_vec()));
            Object::Reference(stream_id)
        } else {
            let save_id = self
                .inner
                .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));

            let mut overlay = Vec::with_capacity(content.len() + 3);
            overlay.extend_from_slice(b"\nQ\n");
            overlay.extend_from_slice(content);
            let overlay_id = self
                .inner
                .add_object(Stream::new(Dictionary::new(), overlay));

            let mut refs = Vec::with_capacity(existing.len() + 2);
            refs.push(Object::Reference(save_id));
            refs.extend(existing);
            refs.push(Object::Reference(overlay_id));
            Object::Array(refs)
        };

        page_dict.set("Contents", contents);
        self.inner.objects.insert(page_id, page_dict.into());

        Ok(())
    }
}

/// Extract `[x1, y1, x2, y2]` from a MediaBox array
fn extract_media_box(media_box_array: &[Object]) -> Result<[f64; 4]> {
    if media_box_array.len() < 4 {
        return Err(PdfError::ParseError("Invalid MediaBox format".to_string()));
    }

    let mut values = [0.0; 4];
    for (i, value) in values.iter_mut().enumerate() {
        *value = object_to_f64(&media_box_array[i])
            .ok_or_else(|| PdfError::ParseError(format!("Invalid MediaBox entry {i}")))?;
    }

    Ok(values)
}

fn object_to_f64(object: &Object) -> Option<f64> {
    object
        .as_f32()
        .map(|v| v as f64)
        .ok()
        .or_else(|| object.as_i64().ok().map(|v| v as f64))
}
