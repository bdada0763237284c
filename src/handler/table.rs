//! Table cell coordinates.

#[derive(Debug, Default)]
struct TableFrame {
    row: Option<u32>,
    next_col: u32,
}

/// Assigns `(row, col)` to cells in document order, row-major.
///
/// Nested tables get their own frame. Cells outside any table share an
/// implicit one.
#[derive(Debug, Default)]
pub(crate) struct TableTracker {
    frames: Vec<TableFrame>,
    orphan: TableFrame,
}

impl TableTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn open(&mut self) {
        self.frames.push(TableFrame::default());
    }

    pub(crate) fn close(&mut self) {
        self.frames.pop();
    }

    fn current(&mut self) -> &mut TableFrame {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.orphan,
        }
    }

    pub(crate) fn next_row(&mut self) {
        let frame = self.current();
        frame.row = Some(frame.row.map_or(0, |r| r + 1));
        frame.next_col = 0;
    }

    /// Coordinates for the next cell; a cell before any row lands in row 0.
    pub(crate) fn next_cell(&mut self) -> (u32, u32) {
        let frame = self.current();
        let row = *frame.row.get_or_insert(0);
        let col = frame.next_col;
        frame.next_col += 1;
        (row, col)
    }
}
