/// Classification of a [`PatchLine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    Unchanged,
    Added,
    Deleted,
    /// A delete+add pair at one line number collapsed into a single line with segments.
    Modified,
}

impl LineKind {
    pub fn is_change(self) -> bool {
        !matches!(self, LineKind::Unchanged)
    }
}

/// Classification of a [`DiffSegment`] inside a modified line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Unchanged,
    Added,
    Deleted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffSegment {
    pub content: String,
    pub kind: SegmentKind,
}

impl DiffSegment {
    pub fn new(kind: SegmentKind, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind,
        }
    }
}

/// One line of a processed diff.
///
/// `line_number` is the 1-based position in the new file. Deleted lines carry the position
/// they would occupy in the new file's line stream without advancing it, which is what lets a
/// later added line at the same number be recognised as a modification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchLine {
    pub line_number: u32,
    pub old_line_number: Option<u32>,
    pub content: String,
    pub kind: LineKind,
    /// Present only for [`LineKind::Modified`].
    pub segments: Option<Vec<DiffSegment>>,
    pub change_block: Option<usize>,
}

impl PatchLine {
    pub fn unchanged(line_number: u32, old_line_number: u32, content: impl Into<String>) -> Self {
        Self {
            line_number,
            old_line_number: Some(old_line_number),
            content: content.into(),
            kind: LineKind::Unchanged,
            segments: None,
            change_block: None,
        }
    }

    pub fn added(line_number: u32, content: impl Into<String>) -> Self {
        Self {
            line_number,
            old_line_number: None,
            content: content.into(),
            kind: LineKind::Added,
            segments: None,
            change_block: None,
        }
    }

    pub fn deleted(line_number: u32, old_line_number: u32, content: impl Into<String>) -> Self {
        Self {
            line_number,
            old_line_number: Some(old_line_number),
            content: content.into(),
            kind: LineKind::Deleted,
            segments: None,
            change_block: None,
        }
    }

    pub fn is_change(&self) -> bool {
        self.kind.is_change()
    }

    /// Text of the line on the old side. For modified lines this is rebuilt from segments.
    pub fn old_content(&self) -> Option<String> {
        match self.kind {
            LineKind::Added => None,
            LineKind::Modified => self.segments.as_deref().map(crate::segments::old_side),
            LineKind::Unchanged | LineKind::Deleted => Some(self.content.clone()),
        }
    }
}

/// Per-kind line counts of a processed sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub deleted: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl DiffStats {
    pub fn from_lines(lines: &[PatchLine]) -> Self {
        let mut out = Self::default();
        for line in lines {
            match line.kind {
                LineKind::Added => out.added += 1,
                LineKind::Deleted => out.deleted += 1,
                LineKind::Modified => out.modified += 1,
                LineKind::Unchanged => out.unchanged += 1,
            }
        }
        out
    }

    /// Number of lines that exist in the new file among the counted ones.
    pub fn new_line_count(&self) -> usize {
        self.added + self.modified + self.unchanged
    }
}
