//! DOCX serialization of a [`ReportDocument`]
//!
//! Cambria 11pt, A4 margins 2.5 cm (right 1.5 cm). Row-spanning cells are
//! written as vertical merges: the spanning cell opens the merge and every
//! covered grid position below it gets an empty continuation cell.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BreakType, Docx, PageMargin, Paragraph as DocxParagraph, Run, RunFonts,
    Shading, Style, StyleType, Table as DocxTable, TableCell, TableRow, VAlignType,
    VMergeType, WidthType,
};

use crate::core::error::{ReportError, Result};
use crate::report::blocks::{Align, Block, Cell, Paragraph, ReportDocument, Span, Table};

const FONT: &str = "Cambria";
const BODY_SIZE: usize = 22;
const HEADING_SIZE: usize = 30;
const TABLE_SIZE: usize = 18;
const HEADER_FILL: &str = "D9D9D9";

const MARGIN: i32 = 1417;
const MARGIN_RIGHT: i32 = 850;
/// A4 width minus margins, in twips
const TEXT_WIDTH: usize = 11906 - 1417 - 850;
/// Full width in fiftieths of a percent
const FULL_WIDTH_PCT: usize = 5000;

const BULLET: &str = "• ";

/// One grid position of a laid-out table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSlot<'a> {
    Cell(&'a Cell),
    /// Covered by a cell spanning down from an earlier row
    Continue,
}

/// Place each row's cells on the column grid, filling covered positions
pub fn layout(table: &Table) -> Vec<Vec<GridSlot<'_>>> {
    let mut pending = vec![0usize; table.columns];
    let mut rows = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        let mut cells = row.iter();
        let mut slots = Vec::new();
        let mut col = 0;

        while col < table.columns {
            if pending[col] > 0 {
                pending[col] -= 1;
                slots.push(GridSlot::Continue);
                col += 1;
                continue;
            }
            let Some(cell) = cells.next() else {
                break;
            };
            if cell.row_span > 1 {
                pending[col] = cell.row_span - 1;
            }
            slots.push(GridSlot::Cell(cell));
            col += cell.col_span;
        }

        rows.push(slots);
    }

    rows
}

fn run(span: &Span, default_size: usize) -> Run {
    let mut run = Run::new().size(span.size.unwrap_or(default_size));
    if span.bold {
        run = run.bold();
    }
    if span.italic {
        run = run.italic();
    }
    for (i, line) in span.text.split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        if !line.is_empty() {
            run = run.add_text(line);
        }
    }
    run
}

fn alignment(align: Align) -> AlignmentType {
    match align {
        Align::Left => AlignmentType::Left,
        Align::Center => AlignmentType::Center,
        Align::Justified => AlignmentType::Both,
    }
}

fn paragraph(p: &Paragraph) -> DocxParagraph {
    let mut out = DocxParagraph::new().align(alignment(p.align));
    if p.bullet {
        out = out.add_run(Run::new().size(BODY_SIZE).add_text(BULLET));
    }
    for span in &p.spans {
        out = out.add_run(run(span, BODY_SIZE));
    }
    out
}

fn table_cell(cell: &Cell) -> TableCell {
    let mut out = TableCell::new().vertical_align(VAlignType::Center);
    for line in &cell.lines {
        let mut text = Run::new().size(TABLE_SIZE).add_text(line);
        if cell.header {
            text = text.bold();
        }
        out = out.add_paragraph(DocxParagraph::new().align(AlignmentType::Center).add_run(text));
    }
    if cell.header {
        out = out.shading(Shading::new().fill(HEADER_FILL));
    }
    if cell.row_span > 1 {
        out = out.vertical_merge(VMergeType::Restart);
    }
    if cell.col_span > 1 {
        out = out.grid_span(cell.col_span);
    }
    out
}

fn full_width(rows: Vec<TableRow>, columns: usize) -> DocxTable {
    let columns = columns.max(1);
    DocxTable::new(rows)
        .set_grid(vec![TEXT_WIDTH / columns; columns])
        .width(FULL_WIDTH_PCT, WidthType::Pct)
}

fn table(t: &Table) -> DocxTable {
    let rows = layout(t)
        .into_iter()
        .map(|slots| {
            let cells = slots
                .into_iter()
                .map(|slot| match slot {
                    GridSlot::Cell(cell) => table_cell(cell),
                    GridSlot::Continue => TableCell::new()
                        .vertical_merge(VMergeType::Continue)
                        .add_paragraph(DocxParagraph::new()),
                })
                .collect();
            TableRow::new(cells)
        })
        .collect();
    full_width(rows, t.columns)
}

/// Single-cell table standing in for a bordered paragraph
fn framed(p: &Paragraph) -> DocxTable {
    let cell = TableCell::new()
        .vertical_align(VAlignType::Center)
        .add_paragraph(paragraph(p));
    full_width(vec![TableRow::new(vec![cell])], 1)
}

fn heading_style(id: &str, name: &str, size: usize) -> Style {
    Style::new(id, StyleType::Paragraph)
        .name(name)
        .size(size)
        .bold()
}

fn base_document() -> Docx {
    let fonts = RunFonts::new()
        .ascii(FONT)
        .hi_ansi(FONT)
        .east_asia(FONT)
        .cs(FONT);

    Docx::new()
        .default_fonts(fonts)
        .default_size(BODY_SIZE)
        .page_margin(
            PageMargin::new()
                .top(MARGIN)
                .bottom(MARGIN)
                .left(MARGIN)
                .right(MARGIN_RIGHT),
        )
        .add_style(heading_style("Heading2", "Heading 2", HEADING_SIZE))
        .add_style(heading_style("Heading3", "Heading 3", BODY_SIZE))
}

/// Serialize the document to DOCX bytes
pub fn to_docx(document: &ReportDocument) -> Result<Vec<u8>> {
    let mut docx = base_document();

    for block in &document.blocks {
        docx = match block {
            Block::Heading { level, text } => docx.add_paragraph(
                DocxParagraph::new()
                    .style(if *level <= 2 { "Heading2" } else { "Heading3" })
                    .add_run(Run::new().add_text(text)),
            ),
            Block::Paragraph(p) => docx.add_paragraph(paragraph(p)),
            Block::Framed(p) => docx.add_table(framed(p)),
            Block::Table(t) => docx.add_table(table(t)),
            Block::Blank => docx.add_paragraph(DocxParagraph::new()),
            Block::PageBreak => docx
                .add_paragraph(DocxParagraph::new().add_run(Run::new().add_break(BreakType::Page))),
        };
    }

    let mut out = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut out)
        .map_err(|e| ReportError::Serialization(e.to_string()))?;
    Ok(out.into_inner())
}
