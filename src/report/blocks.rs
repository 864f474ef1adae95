//! Document node model
//!
//! Sections are built as plain values (headings, paragraphs, tables) and
//! serialized to DOCX only at the end, so the content can be inspected and
//! compared without unpacking an archive.

/// A run of text with uniform formatting; `\n` in the text is a line break
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Font size in half-points; `None` uses the document default
    pub size: Option<usize>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            italic: true,
            ..Default::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Default::default()
        }
    }

    pub fn sized(mut self, half_points: usize) -> Self {
        self.size = Some(half_points);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Justified,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub spans: Vec<Span>,
    pub align: Align,
    pub bullet: bool,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Justified paragraph holding a single plain span
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span::plain(text)],
            align: Align::Justified,
            bullet: false,
        }
    }

    pub fn push(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    pub fn plain(self, text: impl Into<String>) -> Self {
        self.push(Span::plain(text))
    }

    pub fn italic(self, text: impl Into<String>) -> Self {
        self.push(Span::italic(text))
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn bullet(mut self) -> Self {
        self.bullet = true;
        self
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }
}

/// Table cell; `row_span`/`col_span` of 1 means no merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub lines: Vec<String>,
    pub header: bool,
    pub row_span: usize,
    pub col_span: usize,
}

impl Cell {
    /// Cell text; embedded newlines become line breaks
    pub fn text(text: impl AsRef<str>) -> Self {
        Self {
            lines: text.as_ref().split('\n').map(str::to_string).collect(),
            header: false,
            row_span: 1,
            col_span: 1,
        }
    }

    pub fn header(text: impl AsRef<str>) -> Self {
        Self {
            header: true,
            ..Self::text(text)
        }
    }

    pub fn spanning_rows(mut self, rows: usize) -> Self {
        self.row_span = rows.max(1);
        self
    }

    pub fn spanning_cols(mut self, cols: usize) -> Self {
        self.col_span = cols.max(1);
        self
    }

    pub fn joined_text(&self) -> String {
        self.lines.join(" ")
    }
}

/// Table on a fixed column grid
///
/// A row omits the grid positions covered by a cell spanning down from an
/// earlier row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: usize,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn header<S: AsRef<str>>(self, titles: &[S]) -> Self {
        self.row(titles.iter().map(Cell::header).collect())
    }

    pub fn row(mut self, cells: Vec<Cell>) -> Self {
        self.rows.push(cells);
        self
    }

    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    /// Cells spanning more than one row
    pub fn merged_cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten().filter(|c| c.row_span > 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(Paragraph),
    /// Paragraph drawn inside a bordered box
    Framed(Paragraph),
    Table(Table),
    /// Empty spacing paragraph
    Blank,
    PageBreak,
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Block::Paragraph(Paragraph::text(text))
    }
}

impl From<Paragraph> for Block {
    fn from(p: Paragraph) -> Self {
        Block::Paragraph(p)
    }
}

impl From<Table> for Block {
    fn from(t: Table) -> Self {
        Block::Table(t)
    }
}

/// A complete report, ready to be serialized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDocument {
    pub blocks: Vec<Block>,
}

impl ReportDocument {
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Headings and paragraphs, one per line; tables as tab-separated rows
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Heading { text, .. } => out.push_str(text),
                Block::Framed(p) => out.push_str(&p.plain_text()),
                Block::Paragraph(p) => {
                    if p.bullet {
                        out.push_str("- ");
                    }
                    out.push_str(&p.plain_text());
                }
                Block::Table(t) => {
                    for row in &t.rows {
                        let cells: Vec<String> = row.iter().map(Cell::joined_text).collect();
                        out.push_str(&cells.join("\t"));
                        out.push('\n');
                    }
                    continue;
                }
                Block::Blank | Block::PageBreak => {}
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_builder() {
        let p = Paragraph::new()
            .plain("il serbatoio ")
            .italic("S1")
            .plain(" è soggetto");
        assert_eq!(p.plain_text(), "il serbatoio S1 è soggetto");
        assert!(p.spans[1].italic);
        assert!(!p.is_empty());
        assert!(Paragraph::new().is_empty());
    }

    #[test]
    fn test_cell_lines_and_spans() {
        let cell = Cell::text("Acme\nModello: X").spanning_rows(3);
        assert_eq!(cell.lines, vec!["Acme", "Modello: X"]);
        assert_eq!(cell.row_span, 3);
        assert_eq!(Cell::text("x").spanning_rows(0).row_span, 1);
    }

    #[test]
    fn test_plain_text() {
        let doc = ReportDocument {
            blocks: vec![
                Block::heading(2, "Premessa"),
                Block::text("Testo"),
                Block::Blank,
                Table::new(2).header(&["A", "B"]).into(),
                Paragraph::text("voce").bullet().into(),
            ],
        };
        assert_eq!(doc.plain_text(), "Premessa\nTesto\nA\tB\n- voce\n");
        assert_eq!(doc.tables().count(), 1);
    }
}
