//! Minimal PDF 1.4 writer for [`DiagnosticReport`].
//!
//! Only the two standard Helvetica faces are used, so no font program is embedded.
//! Text is encoded with WinAnsiEncoding; characters outside it are replaced by `?`.

use std::io::Write;

use super::document::{format_report_date, DiagnosticReport, Rgb};
use super::metrics::Face;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const FOOTER_Y: f32 = 28.0;
const CONTENT_BOTTOM: f32 = 60.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Maps a character to its WinAnsiEncoding byte.
fn win_ansi(ch: char) -> u8 {
    match ch {
        ' '..='~' => ch as u8,
        '\u{a0}'..='\u{ff}' => ch as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        'Œ' => 0x8c,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        'œ' => 0x9c,
        'Ÿ' => 0x9f,
        '\t' | '\n' | '\r' => b' ',
        _ => b'?',
    }
}

/// Encodes `text` as the body of a PDF literal string.
fn encode_literal(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let byte = win_ansi(ch);
        if matches!(byte, b'(' | b')' | b'\\') {
            bytes.push(b'\\');
        }
        bytes.push(byte);
    }
    bytes
}

fn text_width(text: &str, face: Face, size: f32) -> f32 {
    let encoded: Vec<u8> = text.chars().map(win_ansi).collect();
    face.text_width(&encoded, size)
}

/// Greedy word wrap measured with the face's glyph widths.
fn wrap(text: &str, face: Face, size: f32, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, face, size) > width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn color_operands(color: Rgb) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        f32::from(color.0) / 255.0,
        f32::from(color.1) / 255.0,
        f32::from(color.2) / 255.0
    )
}

/// Lays content out top to bottom, breaking pages as needed.
struct Layout {
    pages: Vec<Vec<u8>>,
    current: Vec<u8>,
    cursor: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn break_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height < CONTENT_BOTTOM && !self.current.is_empty() {
            self.break_page();
        }
    }

    fn text_at(&mut self, x: f32, y: f32, text: &str, face: Face, size: f32, color: Rgb) {
        let _ = write!(
            self.current,
            "BT /{} {size:.1} Tf {} rg {x:.2} {y:.2} Td (",
            face.resource(),
            color_operands(color)
        );
        self.current.extend_from_slice(&encode_literal(text));
        self.current.extend_from_slice(b") Tj ET\n");
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let _ = writeln!(
            self.current,
            "{} rg {x:.2} {y:.2} {width:.2} {height:.2} re f",
            color_operands(color)
        );
    }

    fn gap(&mut self, height: f32) {
        self.cursor -= height;
    }

    fn paragraph(&mut self, text: &str, face: Face, size: f32, color: Rgb) {
        self.indented_paragraph(0.0, text, face, size, color);
    }

    fn indented_paragraph(&mut self, indent: f32, text: &str, face: Face, size: f32, color: Rgb) {
        let leading = size * 1.35;
        for line in wrap(text, face, size, CONTENT_WIDTH - indent) {
            self.ensure_space(leading);
            self.cursor -= leading;
            self.text_at(MARGIN + indent, self.cursor, &line, face, size, color);
        }
    }

    fn heading(&mut self, text: &str, size: f32) {
        self.ensure_space(size * 3.0);
        self.gap(size * 0.6);
        self.paragraph(text, Face::Bold, size, Rgb::ACCENT);
        self.gap(size * 0.3);
    }

    fn label_value(&mut self, label: &str, value: &str) {
        let size = 10.0;
        let leading = size * 1.4;
        self.ensure_space(leading);
        self.cursor -= leading;
        self.text_at(MARGIN, self.cursor, label, Face::Bold, size, Rgb::MUTED);
        self.text_at(MARGIN + 140.0, self.cursor, value, Face::Regular, size, Rgb::TEXT);
    }

    fn score_bar(&mut self, label: &str, score: u8, color: Rgb) {
        let size = 9.0;
        let row = 16.0;
        let bar_x = MARGIN + 150.0;
        let bar_width = CONTENT_WIDTH - 150.0 - 40.0;
        let bar_height = 7.0;

        self.ensure_space(row);
        self.cursor -= row;
        self.text_at(MARGIN + 10.0, self.cursor, label, Face::Regular, size, Rgb::TEXT);
        self.rect(bar_x, self.cursor - 1.0, bar_width, bar_height, Rgb::TRACK);
        let filled = bar_width * f32::from(score.min(100)) / 100.0;
        if filled > 0.0 {
            self.rect(bar_x, self.cursor - 1.0, filled, bar_height, color);
        }
        let value = format!("{score}%");
        let value_x = PAGE_WIDTH - MARGIN - text_width(&value, Face::Bold, size);
        self.text_at(value_x, self.cursor, &value, Face::Bold, size, Rgb::TEXT);
    }

    fn finish(mut self) -> Vec<Vec<u8>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        self.pages
    }
}

fn lay_out(report: &DiagnosticReport) -> Vec<Vec<u8>> {
    let mut layout = Layout::new();

    layout.paragraph(report.title, Face::Bold, 24.0, Rgb::ACCENT);
    layout.paragraph(report.subtitle, Face::Regular, 13.0, Rgb::MUTED);
    layout.gap(8.0);

    layout.heading("Résumé Exécutif", 15.0);
    layout.paragraph(&report.executive_summary, Face::Regular, 10.5, Rgb::TEXT);

    layout.heading("Informations de l'entreprise", 15.0);
    let date = format_report_date(report.generated_on);
    for (label, value) in [
        ("Nom", report.company.name.as_str()),
        ("Email", report.company.email.as_str()),
        ("Taille", report.company.size.as_str()),
        ("Secteur", report.company.sector.as_str()),
        ("Date du diagnostic", date.as_str()),
    ] {
        layout.label_value(label, value);
    }

    layout.heading("Résultats par univers", 15.0);
    for section in &report.universes {
        layout.ensure_space(110.0);
        layout.gap(6.0);
        layout.cursor -= 14.0;
        let cursor = layout.cursor;
        layout.text_at(MARGIN, cursor, section.label, Face::Bold, 12.0, Rgb::TEXT);
        let score = format!("{}%", section.score);
        let score_x = PAGE_WIDTH - MARGIN - text_width(&score, Face::Bold, 12.0);
        layout.text_at(score_x, cursor, &score, Face::Bold, 12.0, section.tone.rgb());
        layout.paragraph(section.description, Face::Regular, 9.0, Rgb::MUTED);
        for bar in &section.profiles {
            layout.score_bar(bar.label, bar.score, bar.color);
        }
        layout.indented_paragraph(10.0, &section.explanation, Face::Regular, 9.0, Rgb::MUTED);
    }

    layout.heading("Analyse des écarts entre les profils", 15.0);
    if report.gaps.is_empty() {
        layout.paragraph(
            "Aucun écart significatif n'a été identifié entre les profils dans les différents univers.",
            Face::Regular,
            10.0,
            Rgb::MUTED,
        );
    }
    for gap in &report.gaps {
        layout.gap(4.0);
        layout.paragraph(&gap.title, Face::Bold, 11.0, Rgb::TEXT);
        layout.paragraph(&gap.description, Face::Regular, 10.0, Rgb::TEXT);
        for detail in [
            format!("• Profil le plus performant : {}", gap.highest),
            format!("• Profil nécessitant le plus d'attention : {}", gap.lowest),
            format!("• Écart : {}%", gap.magnitude),
        ] {
            layout.indented_paragraph(10.0, &detail, Face::Regular, 10.0, Rgb::TEXT);
        }
    }

    for (title, items, empty) in [
        (
            "Points forts",
            &report.strengths,
            "Aucun point fort significatif n'a été identifié dans ce diagnostic.",
        ),
        (
            "Points à améliorer",
            &report.weaknesses,
            "Aucun point faible significatif n'a été identifié dans ce diagnostic.",
        ),
    ] {
        layout.heading(title, 15.0);
        if items.is_empty() {
            layout.paragraph(empty, Face::Regular, 10.0, Rgb::MUTED);
        }
        for item in items {
            layout.gap(4.0);
            layout.paragraph(
                &format!("{} ({}%)", item.universe.label(), item.score),
                Face::Bold,
                11.0,
                Rgb::TEXT,
            );
            layout.paragraph(&item.description, Face::Regular, 10.0, Rgb::TEXT);
        }
    }

    if !report.recommendations.is_empty() {
        layout.heading("Recommandations", 15.0);
        for recommendation in &report.recommendations {
            layout.gap(4.0);
            layout.paragraph(
                &format!("{} - {}", recommendation.title, recommendation.universe.label()),
                Face::Bold,
                11.0,
                Rgb::TEXT,
            );
            layout.paragraph(&recommendation.text, Face::Regular, 10.0, Rgb::TEXT);
        }
    }

    layout.gap(12.0);
    layout.paragraph(&report.footer, Face::Regular, 8.0, Rgb::MUTED);

    layout.finish()
}

/// Serialises laid-out pages and tracks object offsets for the xref table.
struct PdfWriter {
    buffer: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
        Self {
            buffer,
            offsets: Vec::new(),
        }
    }

    /// Writes object `id`; ids must be emitted in order starting at 1.
    fn object(&mut self, id: usize, body: &[u8]) {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.buffer.len());
        let _ = writeln!(self.buffer, "{id} 0 obj");
        self.buffer.extend_from_slice(body);
        self.buffer.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, id: usize, content: &[u8]) {
        let mut body = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(b"\nendstream");
        self.object(id, &body);
    }

    fn finish(mut self, root: usize, info: usize) -> Vec<u8> {
        let xref = self.buffer.len();
        let size = self.offsets.len() + 1;
        let _ = write!(self.buffer, "xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            let _ = write!(self.buffer, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            self.buffer,
            "trailer\n<< /Size {size} /Root {root} 0 R /Info {info} 0 R >>\nstartxref\n{xref}\n%%EOF\n"
        );
        self.buffer
    }
}

fn literal(text: &str) -> Vec<u8> {
    let mut bytes = vec![b'('];
    bytes.extend_from_slice(&encode_literal(text));
    bytes.push(b')');
    bytes
}

/// Renders the report as an A4 PDF document.
pub fn render_pdf(report: &DiagnosticReport) -> Vec<u8> {
    let pages = lay_out(report);
    let page_count = pages.len();

    const CATALOG: usize = 1;
    const PAGES: usize = 2;
    const REGULAR: usize = 3;
    const BOLD: usize = 4;
    const INFO: usize = 5;
    let first_page = 6;
    let page_id = |index: usize| first_page + index * 2;

    let mut writer = PdfWriter::new();
    writer.object(
        CATALOG,
        format!("<< /Type /Catalog /Pages {PAGES} 0 R >>").as_bytes(),
    );

    let kids: Vec<String> = (0..page_count)
        .map(|index| format!("{} 0 R", page_id(index)))
        .collect();
    writer.object(
        PAGES,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {page_count} >>",
            kids.join(" ")
        )
        .as_bytes(),
    );
    writer.object(
        REGULAR,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    writer.object(
        BOLD,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );

    let mut info = b"<< /Title ".to_vec();
    info.extend_from_slice(&literal(&format!("{} - {}", report.title, report.company.name)));
    info.extend_from_slice(b" /Producer (digital-diagnostic) /CreationDate ");
    info.extend_from_slice(&literal(&format!(
        "D:{}000000Z",
        report.generated_on.format("%Y%m%d")
    )));
    info.extend_from_slice(b" >>");
    writer.object(INFO, &info);

    for (index, mut content) in pages.into_iter().enumerate() {
        let footer = format!("Page {} / {page_count}", index + 1);
        let _ = write!(
            content,
            "BT /{} 8.0 Tf {} rg {:.2} {FOOTER_Y:.2} Td (",
            Face::Regular.resource(),
            color_operands(Rgb::MUTED),
            PAGE_WIDTH - MARGIN - text_width(&footer, Face::Regular, 8.0),
        );
        content.extend_from_slice(&encode_literal(&footer));
        content.extend_from_slice(b") Tj ET\n");

        let id = page_id(index);
        writer.object(
            id,
            format!(
                "<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 {REGULAR} 0 R /F2 {BOLD} 0 R >> >> /Contents {} 0 R >>",
                id + 1
            )
            .as_bytes(),
        );
        writer.stream(id + 1, &content);
    }

    writer.finish(CATALOG, INFO)
}
