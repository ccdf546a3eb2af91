//! Document tree to Typst markup transpiler
//!
//! Blocks arrive in visual left-to-right order, so grids and tables are
//! laid out left to right whatever the document direction. Only the text
//! runs of an RTL document carry `dir: rtl`.

use medrasti_ast::{
    Alignment, Assets, Block, Border, CellWidth, Color, Direction, Document, Image, Row, Rule,
    Stack, Table, TableCell, TextBlock,
};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::hex;

/// Extra bottom margin reserved for the page footer
const FOOTER_HEIGHT: f32 = 48.0;

/// Transpiler for converting a document tree to Typst markup
pub struct Transpiler;

impl Transpiler {
    /// Transpile a document that references no images
    pub fn transpile(doc: &Document) -> String {
        Self::transpile_with_assets(doc, &Assets::new())
    }

    /// Transpile a document, embedding the image bytes found in `assets`
    ///
    /// Images without bytes are left out.
    pub fn transpile_with_assets(doc: &Document, assets: &Assets) -> String {
        let ctx = Context {
            direction: doc.direction,
            assets,
        };
        let mut output = String::new();

        let title = doc.metadata.title.as_deref().unwrap_or_default();
        let author = doc.metadata.author.as_deref().unwrap_or_default();
        output.push_str(&format!(
            "#set document(title: \"{}\", author: \"{}\", date: none)\n",
            escape_string(title),
            escape_string(author)
        ));

        let page = &doc.page;
        let bottom = if doc.footer.is_empty() {
            page.padding
        } else {
            page.padding + FOOTER_HEIGHT
        };
        output.push_str(&format!(
            "#set page(width: {}mm, height: {}mm, margin: (x: {}pt, top: {}pt, bottom: {}pt)",
            num(page.width_mm),
            num(page.height_mm),
            num(page.padding),
            num(page.padding),
            num(bottom)
        ));
        if !doc.footer.is_empty() {
            output.push_str(&format!(
                ", footer-descent: 0pt, footer: {}",
                ctx.content(&doc.footer)
            ));
        }
        output.push_str(")\n");

        output.push_str(&format!(
            "#set text(font: \"{}\", size: {}pt",
            escape_string(&doc.font.name),
            num(page.font_size)
        ));
        if let Some(lang) = &doc.metadata.lang {
            output.push_str(&format!(", lang: \"{}\"", escape_string(lang)));
        }
        output.push_str(", dir: ltr)\n");
        output.push_str("#set par(spacing: 0pt, leading: 0.4em)\n");
        output.push_str("#set block(spacing: 0pt)\n\n");

        for block in &doc.blocks {
            for item in ctx.items(block) {
                output.push('#');
                output.push_str(&item);
                output.push_str("\n\n");
            }
        }

        output
    }
}

struct Context<'a> {
    direction: Direction,
    assets: &'a Assets,
}

impl Context<'_> {
    /// A content block holding `blocks` one after another
    fn content(&self, blocks: &[Block]) -> String {
        let items: Vec<String> = blocks
            .iter()
            .flat_map(|block| self.items(block))
            .map(|item| format!("#{item}"))
            .collect();
        format!("[{}]", items.join("\n\n"))
    }

    /// Code expressions for one block, spacing included
    fn items(&self, block: &Block) -> Vec<String> {
        match block {
            Block::Text(text) => vec![self.text(text)],
            Block::Stack(stack) => self.stack(stack),
            Block::Row(row) => self.row(row),
            Block::Table(table) => vec![self.table(table)],
            Block::Image(image) => self.image(image).into_iter().collect(),
            Block::Rule(rule) => rule_items(rule),
            Block::Spacer(height) => vec![spacing(*height)],
        }
    }

    fn text(&self, text: &TextBlock) -> String {
        let style = &text.style;
        let mut args = format!(
            "size: {}pt, weight: {}, fill: {}",
            num(style.size),
            style.weight.numeric(),
            color(style.color)
        );
        if self.direction.is_rtl() {
            args.push_str(", dir: rtl");
        }
        let run = format!(
            "align({}, text({}, \"{}\"))",
            alignment(style.align),
            args,
            escape_string(&text.content)
        );
        match style.line_height {
            Some(line_height) if line_height > 1.0 => format!(
                "block(inset: (y: {}pt), {})",
                num((line_height - 1.0) * style.size / 2.0),
                run
            ),
            _ => run,
        }
    }

    fn stack(&self, stack: &Stack) -> Vec<String> {
        let mut args = vec!["width: 100%".to_string(), "breakable: true".to_string()];
        if let Some(fill) = stack.fill {
            args.push(format!("fill: {}", color(fill)));
        }
        if let Some(border) = stack.border {
            args.push(format!("stroke: {}", stroke(border)));
        }
        if stack.radius > 0.0 {
            args.push(format!("radius: {}pt", num(stack.radius)));
        }
        if stack.padding > 0.0 {
            args.push(format!("inset: {}pt", num(stack.padding)));
        }
        let mut items = vec![format!(
            "block({}, {})",
            args.join(", "),
            self.content(&stack.blocks)
        )];
        if stack.spacing_after > 0.0 {
            items.push(spacing(stack.spacing_after));
        }
        items
    }

    fn row(&self, row: &Row) -> Vec<String> {
        let columns: Vec<String> = row.cells.iter().map(|cell| width(cell.width)).collect();
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| self.content(&cell.blocks))
            .collect();

        let mut grid = format!(
            "grid(columns: ({},), column-gutter: {}pt, align: top, {})",
            columns.join(", "),
            num(row.gap),
            cells.join(", ")
        );
        if row.align != Alignment::Left {
            grid = format!("align({}, {})", alignment(row.align), grid);
        }
        if let Some(border) = row.top_border {
            grid = format!(
                "block(width: 100%, stroke: (top: {}), inset: (top: {}pt), {})",
                stroke(border),
                num(row.spacing_before.max(border.width)),
                grid
            );
        }

        let mut items = Vec::new();
        if row.spacing_before > 0.0 {
            items.push(spacing(row.spacing_before));
        }
        items.push(grid);
        items
    }

    fn table(&self, table: &Table) -> String {
        let columns = if table.columns.is_empty() {
            vec!["1fr".to_string(); table.column_count()]
        } else {
            table.columns.iter().map(|p| format!("{}%", num(*p))).collect()
        };

        let mut args = vec![format!("columns: ({},)", columns.join(", "))];
        match table.border {
            Some(border) => args.push(format!("stroke: {}", stroke(border))),
            None => args.push("stroke: none".to_string()),
        }
        args.push("inset: 4pt".to_string());

        if !table.header.is_empty() {
            let cells: Vec<String> = table
                .header
                .iter()
                .map(|cell| self.cell(cell, table.header_fill))
                .collect();
            args.push(format!("table.header({})", cells.join(", ")));
        }
        for row in &table.rows {
            for cell in &row.cells {
                args.push(self.cell(cell, row.fill));
            }
        }

        format!("table(\n  {}\n)", args.join(",\n  "))
    }

    fn cell(&self, cell: &TableCell, fill: Option<Color>) -> String {
        let body = self.text(&TextBlock::new(cell.text.as_str(), cell.style));
        match fill {
            Some(fill) => format!("table.cell(fill: {}, {})", color(fill), body),
            None => format!("table.cell({body})"),
        }
    }

    fn image(&self, image: &Image) -> Option<String> {
        let Some(bytes) = self.assets.get(&image.src) else {
            warn!(src = %image.src, "no bytes for image, leaving it out");
            return None;
        };
        Some(format!(
            "image(\"{}\", width: {}pt, height: {}pt, fit: \"contain\")",
            asset_path(bytes),
            num(image.width),
            num(image.height)
        ))
    }
}

/// Virtual files backing the images of `assets`, keyed by [`asset_path`]
pub(crate) fn asset_files(assets: &Assets) -> Vec<(String, Vec<u8>)> {
    assets
        .iter()
        .map(|(_, bytes)| (asset_path(bytes), bytes.to_vec()))
        .collect()
}

/// Path an image is compiled from, derived from its content
fn asset_path(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!(
        "/assets/{}.{}",
        hex::encode(&digest[..8]),
        image_extension(bytes)
    )
}

fn image_extension(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "jpg"
    } else if bytes.starts_with(b"GIF8") {
        "gif"
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(&b"WEBP"[..]) {
        "webp"
    } else if is_svg(bytes) {
        "svg"
    } else {
        "png"
    }
}

fn is_svg(bytes: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    head.trim_start().starts_with('<') && head.contains("<svg")
}

fn rule_items(rule: &Rule) -> Vec<String> {
    let mut items = vec![format!(
        "line(length: 100%, stroke: {})",
        stroke(rule.border)
    )];
    if rule.spacing_after > 0.0 {
        items.push(spacing(rule.spacing_after));
    }
    items
}

fn spacing(height: f32) -> String {
    format!("v({}pt)", num(height))
}

fn width(width: CellWidth) -> String {
    match width {
        CellWidth::Auto => "auto".to_string(),
        CellWidth::Flex => "1fr".to_string(),
        CellWidth::Percent(p) => format!("{}%", num(p)),
    }
}

fn alignment(align: Alignment) -> &'static str {
    match align {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
    }
}

fn color(color: Color) -> String {
    format!("rgb(\"{color}\")")
}

fn stroke(border: Border) -> String {
    format!("{}pt + {}", num(border.width), color(border.color))
}

/// Format a length without a trailing `.0`
fn num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

/// Escape text for a Typst string literal
pub(crate) fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' | '\t' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}
