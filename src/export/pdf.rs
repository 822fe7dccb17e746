use crate::core::charts::{Chart, ChartKind};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};
use std::f32::consts::PI;
use std::io::{self, Write};

const FONT: Name = Name(b"F1");
const FONT_BOLD: Name = Name(b"F2");

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH: f32 = 0.5;

type Rgb = (f32, f32, f32);

const PALETTE: [Rgb; 8] = [
    (0.15, 0.39, 0.92),
    (0.06, 0.73, 0.51),
    (0.96, 0.62, 0.04),
    (0.86, 0.15, 0.15),
    (0.49, 0.23, 0.93),
    (0.42, 0.45, 0.50),
    (0.98, 0.45, 0.09),
    (0.13, 0.77, 0.37),
];

fn palette(i: usize) -> Rgb {
    PALETTE[i % PALETTE.len()]
}

/// Encode text for a WinAnsi (cp1252) font. Unmappable chars become '?'.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

/// Rough rendered width of `text` in points.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH
}

/// Cut `text` so that it fits in `width` points.
fn fit(text: &str, width: f32, size: f32) -> String {
    let max = (width / (size * AVG_GLYPH)).floor().max(1.0) as usize;
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(2);
    let mut s: String = text.chars().take(keep).collect();
    s.push_str("..");
    s
}

fn draw_text(content: &mut Content, font: Name, x: f32, y: f32, size: f32, text: &str) {
    content.begin_text();
    content.set_font(font, size);
    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
    content.show(Str(&win_ansi(text)));
    content.end_text();
}

fn fill_rect(content: &mut Content, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
    content.save_state();
    content.set_fill_rgb(color.0, color.1, color.2);
    content.rect(x, y, w, h);
    content.fill_nonzero();
    content.restore_state();
}

fn stroke_rect(content: &mut Content, x: f32, y: f32, w: f32, h: f32, grey: f32) {
    content.save_state();
    content.set_stroke_rgb(grey, grey, grey);
    content.rect(x, y, w, h);
    content.stroke();
    content.restore_state();
}

fn line(content: &mut Content, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb, width: f32) {
    content.save_state();
    content.set_stroke_rgb(color.0, color.1, color.2);
    content.set_line_width(width);
    content.move_to(x1, y1);
    content.line_to(x2, y2);
    content.stroke();
    content.restore_state();
}

/// Filled pie slice from `a0` to `a1` (radians, counter-clockwise),
/// approximated with cubic Béziers of at most 90 degrees each.
fn pie_slice(content: &mut Content, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, color: Rgb) {
    content.save_state();
    content.set_fill_rgb(color.0, color.1, color.2);
    content.move_to(cx, cy);
    content.line_to(cx + r * a0.cos(), cy + r * a0.sin());

    let segments = ((a1 - a0) / (PI / 2.0)).ceil().max(1.0) as usize;
    let step = (a1 - a0) / segments as f32;
    for s in 0..segments {
        let t1 = a0 + step * s as f32;
        let t2 = t1 + step;
        let k = 4.0 / 3.0 * ((t2 - t1) / 4.0).tan();
        content.cubic_to(
            cx + r * (t1.cos() - k * t1.sin()),
            cy + r * (t1.sin() + k * t1.cos()),
            cx + r * (t2.cos() + k * t2.sin()),
            cy + r * (t2.sin() - k * t2.cos()),
            cx + r * t2.cos(),
            cy + r * t2.sin(),
        );
    }

    content.close_path();
    content.fill_nonzero();
    content.restore_state();
}

/// Area reserved for one chart on the page.
#[derive(Debug, Clone, Copy)]
pub struct ChartBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    font_id: Ref,
    font_bold_id: Ref,
    next_id: i32,

    /// Page contents, finished only in `finish` so footers can carry the total.
    pages: Vec<Content>,

    pub page_w: f32,
    pub page_h: f32,
    pub margin: f32,
    row_h: f32,

    font_size: f32,
    header_font_size: f32,
    title_font_size: f32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    /// A4 portrait, Helvetica in WinAnsi encoding.
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let font_bold_id = Ref::new(4);

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(font_bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            font_id,
            font_bold_id,
            next_id: 5,
            pages: Vec::new(),

            page_w: 595.0,
            page_h: 842.0,
            margin: 40.0,
            row_h: 20.0,

            font_size: 7.0,
            header_font_size: 8.0,
            title_font_size: 18.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn new_page(&mut self) -> &mut Content {
        self.pages.push(Content::new());
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    // ---------------------------------------------------------------
    // Cover page
    // ---------------------------------------------------------------

    /// Title, generation line and optional subtitle. Returns the y below them.
    pub fn write_heading(&mut self, title: &str, generated: &str, subtitle: Option<&str>) -> f32 {
        let (m, top, size) = (self.margin, self.page_h - self.margin, self.title_font_size);
        let content = self.new_page();

        draw_text(content, FONT_BOLD, m, top - size, size, title);
        let mut y = top - size - 18.0;
        draw_text(content, FONT, m, y, 10.0, &format!("Generado el: {generated}"));

        if let Some(sub) = subtitle {
            y -= 14.0;
            draw_text(content, FONT, m, y, 9.0, sub);
        }

        y - 16.0
    }

    /// Row of KPI boxes (label, value) across the page width. Returns the y below.
    pub fn write_kpis(&mut self, top: f32, kpis: &[(String, String)]) -> f32 {
        if kpis.is_empty() {
            return top;
        }
        let (m, avail) = (self.margin, self.page_w - 2.0 * self.margin);
        let gap = 10.0;
        let w = (avail - gap * (kpis.len() as f32 - 1.0)) / kpis.len() as f32;
        let h = 46.0;
        let y = top - h;

        let Some(content) = self.pages.last_mut() else {
            return top;
        };

        for (i, (label, value)) in kpis.iter().enumerate() {
            let x = m + i as f32 * (w + gap);
            fill_rect(content, x, y, w, h, (0.94, 0.96, 0.99));
            stroke_rect(content, x, y, w, h, 0.75);
            draw_text(content, FONT, x + 8.0, y + h - 15.0, 8.0, &fit(label, w - 16.0, 8.0));
            draw_text(content, FONT_BOLD, x + 8.0, y + 10.0, 14.0, &fit(value, w - 16.0, 14.0));
        }

        y - 16.0
    }

    /// Lay out `charts` in a two-column grid starting at `top`.
    pub fn write_charts(&mut self, top: f32, charts: &[Chart]) {
        let (m, avail) = (self.margin, self.page_w - 2.0 * self.margin);
        let gap = 14.0;
        let w = (avail - gap) / 2.0;
        let rows = charts.len().div_ceil(2).max(1) as f32;
        let h = ((top - m - 20.0 - gap * (rows - 1.0)) / rows).min(260.0);

        let Some(content) = self.pages.last_mut() else {
            return;
        };

        for (i, chart) in charts.iter().enumerate() {
            let col = (i % 2) as f32;
            let row = (i / 2) as f32;
            let area = ChartBox {
                x: m + col * (w + gap),
                y: top - (row + 1.0) * h - row * gap,
                w,
                h,
            };
            draw_chart(content, area, chart);
        }
    }

    // ---------------------------------------------------------------
    // Table pages
    // ---------------------------------------------------------------

    /// Fit column widths to content, then scale them to the page width.
    fn compute_col_widths(&self, headers: &[&str], rows: &[Vec<String>]) -> Vec<f32> {
        let cap = 120.0;
        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| text_width(h, self.header_font_size) + 8.0)
            .collect();

        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = w.max((text_width(cell, self.font_size) + 8.0).min(cap));
                }
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.page_w - 2.0 * self.margin;
        if total > 0.0 {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }

        widths
    }

    fn draw_row(&self, content: &mut Content, y: f32, widths: &[f32], row: &[String], font: Name, size: f32) {
        let mut x = self.margin;
        for (text, w) in row.iter().zip(widths) {
            draw_text(content, font, x + 3.0, y + 6.5, size, &fit(text, w - 6.0, size));
            stroke_rect(content, x, y, *w, self.row_h, 0.65);
            x += w;
        }
    }

    /// Table split over pages of `rows_per_page` rows, each headed
    /// "Tabla de eventos (pág. N)".
    pub fn write_table(&mut self, headers: &[&str], rows: &[Vec<String>], rows_per_page: usize) {
        let widths = self.compute_col_widths(headers, rows);
        let header_row: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let table_w: f32 = widths.iter().sum();
        let per_page = rows_per_page.max(1);

        let chunks: Vec<&[Vec<String>]> = if rows.is_empty() {
            vec![&[]]
        } else {
            rows.chunks(per_page).collect()
        };

        for (n, chunk) in chunks.into_iter().enumerate() {
            let mut content = Content::new();

            let top = self.page_h - self.margin;
            draw_text(
                &mut content,
                FONT_BOLD,
                self.margin,
                top - 14.0,
                14.0,
                &format!("Tabla de eventos (pág. {})", n + 1),
            );

            let mut y = top - 30.0 - self.row_h;
            fill_rect(&mut content, self.margin, y, table_w, self.row_h, (0.85, 0.87, 0.90));
            self.draw_row(&mut content, y, &widths, &header_row, FONT_BOLD, self.header_font_size);

            for (i, row) in chunk.iter().enumerate() {
                y -= self.row_h;
                if i % 2 == 0 {
                    fill_rect(&mut content, self.margin, y, table_w, self.row_h, (0.96, 0.96, 0.96));
                }
                self.draw_row(&mut content, y, &widths, row, FONT, self.font_size);
            }

            self.pages.push(content);
        }
    }

    // ---------------------------------------------------------------
    // Output
    // ---------------------------------------------------------------

    fn build_pages_tree(&mut self, page_refs: Vec<Ref>) {
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(page_refs.len() as i32);
        pages.kids(page_refs);
    }

    /// Finish every page with its "Página X de Y" footer and serialize.
    pub fn finish(mut self) -> io::Result<Vec<u8>> {
        if self.pages.is_empty() {
            self.new_page();
        }

        let total = self.pages.len();
        let pages = std::mem::take(&mut self.pages);
        let mut page_refs = Vec::with_capacity(total);

        for (i, mut content) in pages.into_iter().enumerate() {
            let footer = format!("Página {} de {}", i + 1, total);
            let x = (self.page_w - text_width(&footer, 8.0)) / 2.0;
            draw_text(&mut content, FONT, x, self.margin / 2.0, 8.0, &footer);

            let page_id = self.fresh_ref();
            let content_id = self.fresh_ref();
            page_refs.push(page_id);

            {
                let mut page = self.pdf.page(page_id);
                page.parent(self.pages_id)
                    .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
                    .contents(content_id);

                let mut resources = page.resources();
                let mut fonts = resources.fonts();
                fonts.pair(FONT, self.font_id);
                fonts.pair(FONT_BOLD, self.font_bold_id);
            }

            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&content.finish())?;
            let compressed = encoder.finish()?;
            self.pdf
                .stream(content_id, &compressed)
                .filter(Filter::FlateDecode);
        }

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.build_pages_tree(page_refs);

        Ok(self.pdf.finish())
    }
}

// -------------------------------------------------------------------
// Charts
// -------------------------------------------------------------------

const AXIS: Rgb = (0.55, 0.55, 0.55);

fn draw_chart(content: &mut Content, area: ChartBox, chart: &Chart) {
    stroke_rect(content, area.x, area.y, area.w, area.h, 0.8);
    draw_text(
        content,
        FONT_BOLD,
        area.x + 8.0,
        area.y + area.h - 16.0,
        10.0,
        &fit(&chart.title, area.w - 16.0, 10.0),
    );

    let plot = ChartBox {
        x: area.x + 10.0,
        y: area.y + 10.0,
        w: area.w - 20.0,
        h: area.h - 36.0,
    };

    if chart.is_empty() {
        draw_text(content, FONT, plot.x, plot.y + plot.h / 2.0, 9.0, "Sin datos");
        return;
    }

    match chart.kind {
        ChartKind::Bar => draw_bars(content, plot, chart),
        ChartKind::Horizontal => draw_hbars(content, plot, chart),
        ChartKind::Line => draw_lines(content, plot, chart),
        ChartKind::Pie | ChartKind::Doughnut => draw_pie(content, plot, chart),
    }
}

const MAX_BARS: usize = 10;

fn draw_bars(content: &mut Content, plot: ChartBox, chart: &Chart) {
    let points: Vec<(&str, usize)> = chart.points().into_iter().take(MAX_BARS).collect();
    let max = points.iter().map(|p| p.1).max().unwrap_or(1).max(1) as f32;

    let label_h = 22.0;
    let base_y = plot.y + label_h;
    let bar_area_h = plot.h - label_h - 10.0;
    let slot = plot.w / points.len().max(1) as f32;
    let bar_w = slot * 0.65;

    line(content, plot.x, base_y, plot.x + plot.w, base_y, AXIS, 0.5);

    for (i, (label, value)) in points.iter().enumerate() {
        let x = plot.x + i as f32 * slot + (slot - bar_w) / 2.0;
        let h = bar_area_h * (*value as f32 / max);
        fill_rect(content, x, base_y, bar_w, h, palette(i));
        draw_text(content, FONT, x, base_y + h + 2.0, 6.0, &value.to_string());
        draw_text(content, FONT, plot.x + i as f32 * slot + 1.0, plot.y + 8.0, 5.5, &fit(label, slot - 2.0, 5.5));
    }
}

fn draw_hbars(content: &mut Content, plot: ChartBox, chart: &Chart) {
    let points = chart.points();
    let max = points.iter().map(|p| p.1).max().unwrap_or(1).max(1) as f32;

    let label_w = plot.w * 0.38;
    let value_w = 58.0;
    let bar_space = plot.w - label_w - value_w;
    let slot = (plot.h / points.len().max(1) as f32).min(30.0);
    let bar_h = slot * 0.6;

    for (i, (label, value)) in points.iter().enumerate() {
        let y = plot.y + plot.h - (i as f32 + 1.0) * slot + (slot - bar_h) / 2.0;
        let w = bar_space * (*value as f32 / max);
        draw_text(content, FONT, plot.x, y + bar_h / 3.0, 7.0, &fit(label, label_w - 4.0, 7.0));
        fill_rect(content, plot.x + label_w, y, w, bar_h, palette(i));

        let pct = if chart.total == 0 { 0.0 } else { *value as f32 * 100.0 / chart.total as f32 };
        draw_text(
            content,
            FONT,
            plot.x + label_w + w + 4.0,
            y + bar_h / 3.0,
            7.0,
            &format!("{value} ({pct:.1}%)"),
        );
    }
}

fn draw_lines(content: &mut Content, plot: ChartBox, chart: &Chart) {
    let legend_h = 14.0 * chart.series.len().div_ceil(4) as f32;
    let label_h = 12.0;
    let base_y = plot.y + legend_h + label_h;
    let h = plot.h - legend_h - label_h - 6.0;

    let max = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .max()
        .unwrap_or(1)
        .max(1) as f32;
    let n = chart.labels.len();
    let step = if n > 1 { plot.w / (n - 1) as f32 } else { 0.0 };
    let x_at = |i: usize| if n > 1 { plot.x + i as f32 * step } else { plot.x + plot.w / 2.0 };

    line(content, plot.x, base_y, plot.x + plot.w, base_y, AXIS, 0.5);
    line(content, plot.x, base_y, plot.x, base_y + h, AXIS, 0.5);
    draw_text(content, FONT, plot.x + 2.0, base_y + h - 6.0, 6.0, &(max as usize).to_string());

    // at most ~8 x labels
    let every = n.div_ceil(8).max(1);
    for (i, label) in chart.labels.iter().enumerate().step_by(every) {
        draw_text(content, FONT, x_at(i) - 8.0, base_y - 9.0, 5.5, label);
    }

    for (si, series) in chart.series.iter().enumerate() {
        let color = palette(si);
        let pts: Vec<(f32, f32)> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| (x_at(i), base_y + h * (*v as f32 / max)))
            .collect();

        content.save_state();
        content.set_stroke_rgb(color.0, color.1, color.2);
        content.set_line_width(1.2);
        if let Some((x0, y0)) = pts.first() {
            content.move_to(*x0, *y0);
            for (x, y) in pts.iter().skip(1) {
                content.line_to(*x, *y);
            }
            content.stroke();
        }
        content.restore_state();

        for (x, y) in &pts {
            fill_rect(content, x - 1.2, y - 1.2, 2.4, 2.4, color);
        }

        let lx = plot.x + (si % 4) as f32 * (plot.w / 4.0);
        let ly = plot.y + legend_h - 10.0 - (si / 4) as f32 * 14.0;
        fill_rect(content, lx, ly, 6.0, 6.0, color);
        draw_text(content, FONT, lx + 9.0, ly, 6.5, &fit(&series.label, plot.w / 4.0 - 12.0, 6.5));
    }
}

fn draw_pie(content: &mut Content, plot: ChartBox, chart: &Chart) {
    let points = chart.points();
    let total: usize = points.iter().map(|p| p.1).sum();
    if total == 0 {
        return;
    }

    let r = (plot.h / 2.0).min(plot.w * 0.25) - 4.0;
    let cx = plot.x + r + 4.0;
    let cy = plot.y + plot.h / 2.0;

    let mut angle = PI / 2.0;
    for (i, (_, value)) in points.iter().enumerate() {
        let sweep = 2.0 * PI * (*value as f32 / total as f32);
        if sweep > 0.0 {
            pie_slice(content, cx, cy, r, angle, angle + sweep, palette(i));
        }
        angle += sweep;
    }

    if chart.kind == ChartKind::Doughnut {
        pie_slice(content, cx, cy, r * 0.55, 0.0, 2.0 * PI, (1.0, 1.0, 1.0));
    }

    let lx = cx + r + 16.0;
    let legend_w = plot.x + plot.w - lx;
    for (i, (label, value)) in points.iter().enumerate() {
        let ly = cy + r - 4.0 - i as f32 * 13.0;
        if ly < plot.y {
            break;
        }
        let pct = *value as f32 * 100.0 / total as f32;
        fill_rect(content, lx, ly, 7.0, 7.0, palette(i));
        draw_text(
            content,
            FONT,
            lx + 11.0,
            ly,
            7.0,
            &fit(&format!("{label}: {value} ({pct:.1}%)"), legend_w - 12.0, 7.0),
        );
    }
}
