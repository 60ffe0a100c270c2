use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use super::encoding::{transcode, Unrepresentable};

/// Points per millimetre
const MM: f32 = 72.0 / 25.4;

/// Courier glyph advance as a fraction of the font size
const COURIER_ADVANCE: f32 = 0.6;

const FONT_NAME: Name<'static> = Name(b"F1");

/// Page geometry, all values in points
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    /// Distance from the page bottom at which a new page starts
    pub margin_bottom: f32,
    /// Horizontal padding inside each text row
    pub cell_padding: f32,
    pub font_size: f32,
    pub line_height: f32,
}

impl PdfLayout {
    /// A4 portrait with 10 mm side and top margins and 10 mm rows
    pub fn a4(font_size: f32) -> Self {
        Self {
            page_width: 210.0 * MM,
            page_height: 297.0 * MM,
            margin_left: 10.0 * MM,
            margin_right: 10.0 * MM,
            margin_top: 10.0 * MM,
            margin_bottom: 20.0 * MM,
            cell_padding: 1.0 * MM,
            font_size,
            line_height: 10.0 * MM,
        }
    }

    /// Characters that fit on one row
    pub fn columns(&self) -> usize {
        let usable =
            self.page_width - self.margin_left - self.margin_right - 2.0 * self.cell_padding;
        (usable / (COURIER_ADVANCE * self.font_size)).floor().max(1.0) as usize
    }

    /// Rows that fit on one page before breaking
    pub fn rows_per_page(&self) -> usize {
        let usable = self.page_height - self.margin_top - self.margin_bottom;
        (usable / self.line_height).floor().max(1.0) as usize
    }

    fn baseline(&self, row: usize) -> f32 {
        let top = self.margin_top + row as f32 * self.line_height;
        self.page_height - (top + 0.5 * self.line_height + 0.3 * self.font_size)
    }
}

/// Split one line into rows of at most `columns` bytes.
///
/// Breaks at the last space that fits and consumes it; words longer than a
/// row are split hard. An empty line is one empty row.
pub fn wrap_line(line: &[u8], columns: usize) -> Vec<&[u8]> {
    let columns = columns.max(1);
    let mut rows = Vec::new();
    let mut rest = line;

    while rest.len() > columns {
        match rest[..=columns].iter().rposition(|&b| b == b' ') {
            // Extra space carried over from the previous break
            Some(0) => rest = &rest[1..],
            Some(pos) => {
                rows.push(&rest[..pos]);
                rest = &rest[pos + 1..];
            }
            _ => {
                rows.push(&rest[..columns]);
                rest = &rest[columns..];
            }
        }
    }

    if !rest.is_empty() || rows.is_empty() {
        rows.push(rest);
    }
    rows
}

/// Lay out transcoded text as rows: split on line feeds, drop a trailing
/// carriage return, wrap each line.
pub fn layout_rows(bytes: &[u8], columns: usize) -> Vec<&[u8]> {
    bytes
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .flat_map(|line| wrap_line(line, columns))
        .collect()
}

/// Render `text` as a monospaced PDF document
pub fn render(text: &str, layout: &PdfLayout, policy: Unrepresentable) -> Vec<u8> {
    let bytes = transcode(text, policy);
    let rows = layout_rows(&bytes, layout.columns());

    let mut pdf = Pdf::new();
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let font_id = Ref::new(3);
    let mut next_id = 4;

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.type1_font(font_id)
        .base_font(Name(b"Courier"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let mut page_ids = Vec::new();
    for page_rows in rows.chunks(layout.rows_per_page()) {
        let page_id = Ref::new(next_id);
        let content_id = Ref::new(next_id + 1);
        next_id += 2;
        page_ids.push(page_id);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, layout.page_width, layout.page_height));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(FONT_NAME, font_id);
        page.finish();

        let mut content = Content::new();
        for (index, &row) in page_rows.iter().enumerate() {
            content.begin_text();
            content.set_font(FONT_NAME, layout.font_size);
            content.next_line(
                layout.margin_left + layout.cell_padding,
                layout.baseline(index),
            );
            content.show(Str(row));
            content.end_text();
        }
        pdf.stream(content_id, &content.finish());
    }

    let page_count = page_ids.len() as i32;
    pdf.pages(page_tree_id).kids(page_ids).count(page_count);

    pdf.finish()
}
