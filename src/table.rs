//! Generic table: client-side search and fixed-size pagination over any record
//! collection, rendered against a caller-supplied column list.

use ansi_term::{Colour, Style};
use num_format::Locale;

/// Rows per page.
pub const PAGE_SIZE: usize = 10;
/// Numbered page buttons shown at most.
pub const MAX_PAGE_BUTTONS: usize = 5;
/// Placeholder rows while a load is pending.
pub const LOADING_ROWS: usize = 5;

pub const NO_RESULTS: &str = "Nenhum resultado encontrado.";

/// A record field as seen by search and default cell rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl FieldValue<'_> {
    /// Search semantics: case-insensitive for text, base-10 string containment for numbers.
    pub fn matches(&self, query: &str) -> bool {
        match self {
            FieldValue::Text(s) => s.to_lowercase().contains(&query.to_lowercase()),
            FieldValue::Number(n) => n.to_string().contains(query),
            FieldValue::Missing => false,
        }
    }

    fn plain(&self) -> String {
        match self {
            FieldValue::Text(s) => s.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Missing => String::new(),
        }
    }
}

/// Named field access, so columns and search can address records by field name.
pub trait Fields {
    fn field(&self, name: &str) -> FieldValue<'_>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Plain,
    Strong,
    /// Red; deaths.
    Danger,
    /// Green; recoveries.
    Success,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Plain => Style::new(),
            Tone::Strong => Style::new().bold(),
            Tone::Danger => Colour::Red.bold(),
            Tone::Success => Colour::Green.bold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
        }
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

pub type CellFormatter<T> = fn(&T, &Locale) -> Cell;

/// One column: header label, the field it shows, and an optional custom formatter.
pub struct Column<T> {
    pub label: &'static str,
    pub field: &'static str,
    pub cell: Option<CellFormatter<T>>,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            field: self.field,
            cell: self.cell,
        }
    }
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("label", &self.label)
            .field("field", &self.field)
            .field("custom_cell", &self.cell.is_some())
            .finish()
    }
}

impl<T: Fields> Column<T> {
    pub fn new(label: &'static str, field: &'static str) -> Self {
        Self {
            label,
            field,
            cell: None,
        }
    }

    pub fn with_cell(label: &'static str, field: &'static str, cell: CellFormatter<T>) -> Self {
        Self {
            label,
            field,
            cell: Some(cell),
        }
    }

    pub fn render(&self, record: &T, locale: &Locale) -> Cell {
        match self.cell {
            Some(f) => f(record, locale),
            None => Cell::plain(record.field(self.field).plain()),
        }
    }
}

/// Up to [`MAX_PAGE_BUTTONS`] page numbers to show, keeping `current` roughly
/// centred and pinning page 1 and the last page once the window hits an edge.
pub fn page_buttons(current: usize, total: usize) -> Vec<usize> {
    let n = total.min(MAX_PAGE_BUTTONS);
    (0..n)
        .map(|i| {
            if total <= MAX_PAGE_BUTTONS {
                i + 1
            } else if current <= 3 {
                if i == 4 { total } else { i + 1 }
            } else if current >= total - 2 {
                if i == 0 { 1 } else { total - 4 + i }
            } else {
                match i {
                    0 => 1,
                    4 => total,
                    _ => current - 2 + i,
                }
            }
        })
        .collect()
}

pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current: usize,
    pub total: usize,
    pub buttons: Vec<usize>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    /// Fixed number of placeholder rows, independent of the data.
    Loading { rows: usize },
    /// One row spanning every column.
    Empty {
        message: &'static str,
        colspan: usize,
    },
    Rows(Vec<Vec<Cell>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRender {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub body: TableBody,
    /// Present only when there is more than one page.
    pub pagination: Option<Pagination>,
}

/// Table state: source rows, search query, current page.
///
/// Changing the rows or the query goes back to page 1.
#[derive(Debug, Clone)]
pub struct DataTable<T> {
    rows: Vec<T>,
    columns: Vec<Column<T>>,
    search_field: Option<&'static str>,
    title: String,
    query: String,
    page: usize,
}

impl<T: Fields> DataTable<T> {
    pub fn new(columns: Vec<Column<T>>, rows: Vec<T>) -> Self {
        Self {
            rows,
            columns,
            search_field: None,
            title: String::new(),
            query: String::new(),
            page: 1,
        }
    }

    pub fn with_search_field(mut self, field: &'static str) -> Self {
        self.search_field = Some(field);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.page = 1;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Rows that pass the search filter, in source order.
    pub fn filtered(&self) -> Vec<&T> {
        match self.search_field {
            Some(field) if !self.query.is_empty() => self
                .rows
                .iter()
                .filter(|r| r.field(field).matches(&self.query))
                .collect(),
            _ => self.rows.iter().collect(),
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len())
    }

    pub fn page_rows(&self) -> Vec<&T> {
        self.filtered()
            .into_iter()
            .skip((self.page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    /// Jump to `page`, clamped to the available range.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    pub fn pagination(&self) -> Option<Pagination> {
        let total = self.total_pages();
        if total <= 1 {
            return None;
        }
        Some(Pagination {
            current: self.page,
            total,
            buttons: page_buttons(self.page, total),
            prev_enabled: self.page > 1,
            next_enabled: self.page < total,
        })
    }

    pub fn render(&self, loading: bool, locale: &Locale) -> TableRender {
        let body = if loading {
            TableBody::Loading { rows: LOADING_ROWS }
        } else {
            let rows = self.page_rows();
            if rows.is_empty() {
                TableBody::Empty {
                    message: NO_RESULTS,
                    colspan: self.columns.len(),
                }
            } else {
                TableBody::Rows(
                    rows.into_iter()
                        .map(|r| self.columns.iter().map(|c| c.render(r, locale)).collect())
                        .collect(),
                )
            }
        };
        TableRender {
            title: self.title.clone(),
            headers: self.columns.iter().map(|c| c.label).collect(),
            body,
            pagination: self.pagination(),
        }
    }
}

impl TableRender {
    pub fn row_count(&self) -> usize {
        match &self.body {
            TableBody::Loading { rows } => *rows,
            TableBody::Empty { .. } => 1,
            TableBody::Rows(rows) => rows.len(),
        }
    }

    /// Aligned plain-text rendering for terminals; `color` adds ANSI tones.
    pub fn to_text(&self, color: bool) -> String {
        let ncols = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        if let TableBody::Rows(rows) = &self.body {
            for row in rows {
                for (w, cell) in widths.iter_mut().zip(row) {
                    *w = (*w).max(cell.text.chars().count());
                }
            }
        }

        let mut out = String::new();
        if !self.title.is_empty() {
            let title = if color {
                Style::new().bold().paint(self.title.as_str()).to_string()
            } else {
                self.title.clone()
            };
            out.push_str(&title);
            out.push('\n');
        }

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad(h, *w))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');
        let rule_len = widths.iter().sum::<usize>() + 2 * ncols.saturating_sub(1);
        out.push_str(&"-".repeat(rule_len));
        out.push('\n');

        match &self.body {
            TableBody::Loading { rows } => {
                let line: Vec<String> = widths.iter().map(|w| "░".repeat((*w).max(3))).collect();
                for _ in 0..*rows {
                    out.push_str(&line.join("  "));
                    out.push('\n');
                }
            }
            TableBody::Empty { message, .. } => {
                let n = message.chars().count();
                let left = rule_len.saturating_sub(n) / 2;
                out.push_str(&" ".repeat(left));
                out.push_str(message);
                out.push('\n');
            }
            TableBody::Rows(rows) => {
                for row in rows {
                    let cells: Vec<String> = row
                        .iter()
                        .zip(&widths)
                        .map(|(cell, w)| {
                            let padded = pad(&cell.text, *w);
                            if color && cell.tone != Tone::Plain {
                                cell.tone.style().paint(padded).to_string()
                            } else {
                                padded
                            }
                        })
                        .collect();
                    out.push_str(cells.join("  ").trim_end());
                    out.push('\n');
                }
            }
        }

        if let Some(p) = &self.pagination {
            out.push_str(&p.to_text());
            out.push('\n');
        }
        out
    }
}

impl Pagination {
    /// `‹ [1] 2 3 4 9 ›  página 1 de 9`
    pub fn to_text(&self) -> String {
        let buttons: Vec<String> = self
            .buttons
            .iter()
            .map(|b| {
                if *b == self.current {
                    format!("[{b}]")
                } else {
                    b.to_string()
                }
            })
            .collect();
        let prev = if self.prev_enabled { "‹" } else { " " };
        let next = if self.next_enabled { "›" } else { " " };
        format!(
            "{prev} {} {next}  página {} de {}",
            buttons.join(" "),
            self.current,
            self.total
        )
    }
}

fn pad(s: &str, width: usize) -> String {
    let n = s.chars().count();
    if n >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_near_start() {
        assert_eq!(page_buttons(1, 10), vec![1, 2, 3, 4, 10]);
        assert_eq!(page_buttons(3, 10), vec![1, 2, 3, 4, 10]);
    }

    #[test]
    fn buttons_near_end() {
        assert_eq!(page_buttons(10, 10), vec![1, 7, 8, 9, 10]);
        assert_eq!(page_buttons(8, 10), vec![1, 7, 8, 9, 10]);
    }

    #[test]
    fn buttons_in_the_middle() {
        assert_eq!(page_buttons(5, 10), vec![1, 4, 5, 6, 10]);
    }

    #[test]
    fn few_pages_show_all() {
        assert_eq!(page_buttons(2, 3), vec![1, 2, 3]);
        assert_eq!(page_buttons(1, 5), vec![1, 2, 3, 4, 5]);
        assert!(page_buttons(1, 0).is_empty());
    }

    #[test]
    fn number_search_uses_decimal_text() {
        assert!(FieldValue::Number(1999.0).matches("999"));
        assert!(!FieldValue::Number(1998.0).matches("999"));
        assert!(FieldValue::Text("Brazil").matches("bra"));
        assert!(!FieldValue::Missing.matches("x"));
    }

    #[test]
    fn pagination_text() {
        let p = Pagination {
            current: 2,
            total: 3,
            buttons: vec![1, 2, 3],
            prev_enabled: true,
            next_enabled: true,
        };
        assert_eq!(p.to_text(), "‹ 1 [2] 3 ›  página 2 de 3");
    }
}
