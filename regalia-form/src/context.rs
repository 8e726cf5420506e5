//! Render context of a builder session
//!
//! A builder renders every field in one of three modes. The mode decides the
//! markup shape of the field wrapper:
//!
//! | mode     | wrapper                                                  |
//! |----------|----------------------------------------------------------|
//! | `None`   | the builder's style (`dt`/`dd` or `div`/`label`)         |
//! | `Table`  | a `td` cell; the first row also records column headers   |
//! | `Bundle` | nothing, the raw input is returned and counted           |
//!
//! Entering a table or bundle returns a frame holding the state it replaced.
//! Handing that frame back on exit restores the enclosing mode, so a bundle
//! inside a table cell is wrapped as a cell again once it is done.

use regalia_common::Attributes;

/// Ambient rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    None,
    Table,
    Bundle,
}

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Align::Left),
            "center" => Some(Align::Center),
            "right" => Some(Align::Right),
            _ => None,
        }
    }
}

/// Column header collected while the first table row renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub title: String,
    pub align: Align,
    /// Extra `th` attributes; edge classes are added when the header is written
    pub attrs: Attributes,
}

impl ColumnHeader {
    pub fn new(title: impl Into<String>, align: Align) -> Self {
        Self {
            title: title.into(),
            align,
            attrs: Attributes::new(),
        }
    }
}

/// State replaced by [`RenderContext::enter_table`].
#[derive(Debug)]
#[must_use = "hand the frame back to exit_table"]
pub struct TableFrame {
    mode: RenderMode,
    row_number: usize,
    column_headers: Vec<ColumnHeader>,
}

/// State replaced by [`RenderContext::enter_bundle`].
#[derive(Debug)]
#[must_use = "hand the frame back to exit_bundle"]
pub struct BundleFrame {
    mode: RenderMode,
    bundle_item_count: usize,
}

/// Per-builder rendering state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    mode: RenderMode,
    row_number: usize,
    column_headers: Vec<ColumnHeader>,
    bundle_item_count: usize,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn row_number(&self) -> usize {
        self.row_number
    }

    pub fn column_headers(&self) -> &[ColumnHeader] {
        &self.column_headers
    }

    pub fn bundle_item_count(&self) -> usize {
        self.bundle_item_count
    }

    /// Switch to table mode with no rows and no headers.
    pub fn enter_table(&mut self) -> TableFrame {
        TableFrame {
            mode: std::mem::replace(&mut self.mode, RenderMode::Table),
            row_number: std::mem::take(&mut self.row_number),
            column_headers: std::mem::take(&mut self.column_headers),
        }
    }

    /// Leave table mode and return the headers collected on the first row.
    pub fn exit_table(&mut self, frame: TableFrame) -> Vec<ColumnHeader> {
        self.mode = frame.mode;
        self.row_number = frame.row_number;
        std::mem::replace(&mut self.column_headers, frame.column_headers)
    }

    /// Start the next table row and return its 1-based number.
    pub fn next_row(&mut self) -> usize {
        self.row_number += 1;
        self.row_number
    }

    /// Switch to bundle mode with a zeroed element counter.
    pub fn enter_bundle(&mut self) -> BundleFrame {
        BundleFrame {
            mode: std::mem::replace(&mut self.mode, RenderMode::Bundle),
            bundle_item_count: std::mem::take(&mut self.bundle_item_count),
        }
    }

    /// Restore the enclosing mode and return how many fields the bundle held.
    pub fn exit_bundle(&mut self, frame: BundleFrame) -> usize {
        self.mode = frame.mode;
        std::mem::replace(&mut self.bundle_item_count, frame.bundle_item_count)
    }

    pub fn count_bundle_item(&mut self) {
        self.bundle_item_count += 1;
    }

    /// Record a column header. Only the first row contributes headers;
    /// returns whether the header was kept.
    pub fn record_header(&mut self, header: ColumnHeader) -> bool {
        if self.mode == RenderMode::Table && self.row_number == 1 {
            self.column_headers.push(header);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_resets_and_restores() {
        let mut ctx = RenderContext::new();
        let frame = ctx.enter_table();
        assert_eq!(ctx.mode(), RenderMode::Table);
        assert_eq!(ctx.row_number(), 0);

        // no row started yet
        assert!(!ctx.record_header(ColumnHeader::new("Name", Align::Left)));
        assert_eq!(ctx.next_row(), 1);
        assert!(ctx.record_header(ColumnHeader::new("Name", Align::Left)));
        assert!(ctx.record_header(ColumnHeader::new("Total", Align::Right)));
        assert_eq!(ctx.next_row(), 2);
        assert!(!ctx.record_header(ColumnHeader::new("Name", Align::Left)));

        let headers = ctx.exit_table(frame);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[1].align, Align::Right);
        assert_eq!(ctx, RenderContext::new());
    }

    #[test]
    fn test_bundle_counts_and_restores_enclosing_mode() {
        let mut ctx = RenderContext::new();
        let table = ctx.enter_table();
        ctx.next_row();

        let bundle = ctx.enter_bundle();
        assert_eq!(ctx.mode(), RenderMode::Bundle);
        ctx.count_bundle_item();
        ctx.count_bundle_item();
        ctx.count_bundle_item();
        assert_eq!(ctx.exit_bundle(bundle), 3);

        assert_eq!(ctx.mode(), RenderMode::Table);
        assert_eq!(ctx.row_number(), 1);
        assert_eq!(ctx.bundle_item_count(), 0);
        let _ = ctx.exit_table(table);
        assert_eq!(ctx.mode(), RenderMode::None);
    }

    #[test]
    fn test_empty_bundle_counts_zero() {
        let mut ctx = RenderContext::new();
        let frame = ctx.enter_bundle();
        assert_eq!(ctx.exit_bundle(frame), 0);
    }

    #[test]
    fn test_nested_bundles_keep_outer_counter() {
        let mut ctx = RenderContext::new();
        let outer = ctx.enter_bundle();
        ctx.count_bundle_item();
        let inner = ctx.enter_bundle();
        ctx.count_bundle_item();
        ctx.count_bundle_item();
        assert_eq!(ctx.exit_bundle(inner), 2);
        assert_eq!(ctx.mode(), RenderMode::Bundle);
        assert_eq!(ctx.exit_bundle(outer), 1);
    }
}
