//! Recommendation report: a title and three text sections, rendered as
//! plain text or as a single A4 PDF document.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::roles::RoleInfo;

pub const DESCRIPTION_HEADING: &str = "Role Description";
pub const SKILLS_HEADING: &str = "Key Skills";
pub const COMPANIES_HEADING: &str = "Potential Companies";

/// File name offered for the PDF download.
pub const PDF_FILE_NAME: &str = "career_prediction.pdf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleReport {
    pub role: String,
    pub info: RoleInfo,
}

impl RoleReport {
    pub fn new(role: impl Into<String>, info: RoleInfo) -> Self {
        Self {
            role: role.into(),
            info,
        }
    }

    pub fn title(&self) -> String {
        format!("Predicted Role: {}", self.role)
    }

    /// `(heading, body)` pairs in document order.
    pub fn sections(&self) -> [(&'static str, &str); 3] {
        [
            (DESCRIPTION_HEADING, self.info.description.as_str()),
            (SKILLS_HEADING, self.info.skills.as_str()),
            (COMPANIES_HEADING, self.info.potential_companies.as_str()),
        ]
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    #[cfg(feature = "pdf")]
    pub fn to_pdf(&self) -> crate::error::Result<Vec<u8>> {
        pdf::render(self)
    }
}

impl fmt::Display for RoleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        for (heading, body) in self.sections() {
            writeln!(f)?;
            writeln!(f, "{heading}:")?;
            writeln!(f, "{body}")?;
        }
        Ok(())
    }
}

/// Greedy word wrap at `width` characters. Words longer than a line are
/// split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.chars().count() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let split = word
                    .char_indices()
                    .nth(width)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                lines.push(word[..split].to_string());
                word = &word[split..];
            }
            if word.is_empty() {
                continue;
            }
            let needed = if line.is_empty() { 0 } else { 1 } + word.chars().count();
            if line.chars().count() + needed > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() || paragraph.trim().is_empty() {
            lines.push(line);
        }
    }
    lines
}

#[cfg(feature = "pdf")]
mod pdf {
    use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

    use super::{wrap_text, RoleReport};
    use crate::error::{CareerError, Result};

    const PAGE_WIDTH: f32 = 210.0;
    const PAGE_HEIGHT: f32 = 297.0;
    const MARGIN: f32 = 10.0;

    const TITLE_SIZE: f32 = 16.0;
    const BODY_SIZE: f32 = 12.0;
    const HEADING_HEIGHT: f32 = 10.0;
    const BODY_LINE_HEIGHT: f32 = 5.0;

    const PT_TO_MM: f32 = 0.3528;
    /// Mean Helvetica glyph advance as a fraction of the font size.
    const AVG_GLYPH_WIDTH: f32 = 0.5;

    fn text_width(text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * AVG_GLYPH_WIDTH * PT_TO_MM
    }

    fn chars_per_line(size: f32) -> usize {
        ((PAGE_WIDTH - 2.0 * MARGIN) / (size * AVG_GLYPH_WIDTH * PT_TO_MM)) as usize
    }

    fn render_err(e: impl std::fmt::Display) -> CareerError {
        CareerError::Render(e.to_string())
    }

    /// Top-down cursor that starts a new page when the bottom margin is hit.
    struct PageWriter {
        doc: PdfDocumentReference,
        layer: PdfLayerReference,
        y: f32,
        pages: usize,
    }

    impl PageWriter {
        fn new(title: &str) -> Self {
            let (doc, page, layer) =
                PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            let layer = doc.get_page(page).get_layer(layer);
            Self {
                doc,
                layer,
                y: PAGE_HEIGHT - MARGIN,
                pages: 1,
            }
        }

        fn advance(&mut self, height: f32) {
            if self.y - height < MARGIN {
                self.pages += 1;
                let (page, layer) = self.doc.add_page(
                    Mm(PAGE_WIDTH),
                    Mm(PAGE_HEIGHT),
                    format!("Layer {}", self.pages),
                );
                self.layer = self.doc.get_page(page).get_layer(layer);
                self.y = PAGE_HEIGHT - MARGIN;
            }
            self.y -= height;
        }

        fn line(&mut self, text: &str, size: f32, height: f32, x: f32, font: &IndirectFontRef) {
            self.advance(height);
            self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        }
    }

    pub(super) fn render(report: &RoleReport) -> Result<Vec<u8>> {
        let title = report.title();
        let mut writer = PageWriter::new(&title);
        let bold = writer
            .doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_err)?;
        let regular = writer
            .doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_err)?;

        let title_x = ((PAGE_WIDTH - text_width(&title, TITLE_SIZE)) / 2.0).max(MARGIN);
        writer.line(&title, TITLE_SIZE, HEADING_HEIGHT, title_x, &bold);
        writer.advance(HEADING_HEIGHT);

        let width = chars_per_line(BODY_SIZE);
        for (i, (heading, body)) in report.sections().into_iter().enumerate() {
            if i > 0 {
                writer.advance(BODY_LINE_HEIGHT);
            }
            writer.line(&format!("{heading}:"), BODY_SIZE, HEADING_HEIGHT, MARGIN, &bold);
            for line in wrap_text(body, width) {
                writer.line(&line, BODY_SIZE, BODY_LINE_HEIGHT, MARGIN, &regular);
            }
        }

        writer.doc.save_to_bytes().map_err(render_err)
    }
}
