/// Caret position: a line index and a character offset within that line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Caret {
    pub line: usize,
    pub offset: usize,
}

impl Caret {
    pub const fn at(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// Direction for caret movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A selection between an anchor and the caret (`head`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Caret,
    pub head: Caret,
}

impl Selection {
    pub const fn is_collapsed(&self) -> bool {
        self.anchor.line == self.head.line && self.anchor.offset == self.head.offset
    }

    /// `(start, end)` in document order.
    pub fn ordered(&self) -> (Caret, Caret) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }

    /// Whether the character at `(line, offset)` lies inside the selection.
    pub fn contains(&self, line: usize, offset: usize) -> bool {
        let (start, end) = self.ordered();
        let pos = Caret::at(line, offset);
        start <= pos && pos < end
    }
}
