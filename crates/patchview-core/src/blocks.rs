use crate::line::LineKind;
use crate::line::PatchLine;

/// A maximal run of changed lines with contiguous line numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeBlock {
    /// Index of the block's first line in the processed sequence.
    pub start: usize,
    pub len: usize,
    pub added: usize,
    pub deleted: usize,
    pub modified: usize,
}

impl ChangeBlock {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    fn count(&mut self, kind: LineKind) {
        match kind {
            LineKind::Added => self.added += 1,
            LineKind::Deleted => self.deleted += 1,
            LineKind::Modified => self.modified += 1,
            LineKind::Unchanged => {}
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeBlocks {
    blocks: Vec<ChangeBlock>,
}

impl ChangeBlocks {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChangeBlock> {
        self.blocks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeBlock> {
        self.blocks.iter()
    }

    /// Row to navigate to for block `index`, or `None` when out of range.
    pub fn first_line_of(&self, index: usize) -> Option<usize> {
        self.blocks.get(index).map(|b| b.start)
    }

    /// Block following `current`; the first block when nothing is current. Does not wrap.
    pub fn next_after(&self, current: Option<usize>) -> Option<usize> {
        let next = current.map_or(0, |c| c.saturating_add(1));
        (next < self.blocks.len()).then_some(next)
    }

    /// Block preceding `current`. Does not wrap.
    pub fn previous_before(&self, current: Option<usize>) -> Option<usize> {
        let current = current?;
        current
            .checked_sub(1)
            .filter(|&prev| prev < self.blocks.len())
    }

    /// First block starting at or below `row`.
    pub fn next_from_row(&self, row: usize) -> Option<usize> {
        self.blocks.iter().position(|b| b.start >= row)
    }

    /// Last block starting strictly above `row`.
    pub fn previous_from_row(&self, row: usize) -> Option<usize> {
        self.blocks.iter().rposition(|b| b.start < row)
    }

    /// Block containing `row`, if any.
    pub fn block_at_row(&self, row: usize) -> Option<usize> {
        let idx = self.blocks.partition_point(|b| b.end() <= row);
        self.blocks
            .get(idx)
            .filter(|b| b.start <= row)
            .map(|_| idx)
    }
}

/// Assigns `change_block` to every changed line and returns the block index.
///
/// A block starts at a changed line when it is the first changed line, follows an unchanged
/// line, or its line number is neither equal to nor one greater than the previous line's.
/// Unchanged lines get `None`.
pub fn index_change_blocks(lines: &mut [PatchLine]) -> ChangeBlocks {
    let mut blocks: Vec<ChangeBlock> = Vec::new();
    let mut prev: Option<(LineKind, u32)> = None;

    for (idx, line) in lines.iter_mut().enumerate() {
        if !line.is_change() {
            line.change_block = None;
            prev = Some((line.kind, line.line_number));
            continue;
        }

        let continues = match prev {
            Some((kind, number)) => {
                kind.is_change()
                    && (line.line_number == number || line.line_number == number.saturating_add(1))
            }
            None => false,
        };
        if !continues || blocks.is_empty() {
            blocks.push(ChangeBlock {
                start: idx,
                ..Default::default()
            });
        }

        let block_index = blocks.len() - 1;
        if let Some(block) = blocks.last_mut() {
            block.len += 1;
            block.count(line.kind);
        }
        line.change_block = Some(block_index);
        prev = Some((line.kind, line.line_number));
    }

    ChangeBlocks { blocks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<PatchLine> {
        vec![
            PatchLine::unchanged(1, 1, "a"),
            PatchLine::deleted(2, 2, "b"),
            PatchLine::added(2, "B"),
            PatchLine::added(3, "C"),
            PatchLine::unchanged(4, 3, "d"),
            PatchLine::added(5, "e"),
            // Jump in numbering between hunks starts a new block.
            PatchLine::added(40, "f"),
        ]
    }

    #[test]
    fn groups_contiguous_changes() {
        let mut lines = sample();
        let blocks = index_change_blocks(&mut lines);
        assert_eq!(blocks.len(), 3);

        let assigned: Vec<Option<usize>> = lines.iter().map(|l| l.change_block).collect();
        assert_eq!(
            assigned,
            vec![None, Some(0), Some(0), Some(0), None, Some(1), Some(2)]
        );

        let first = blocks.get(0).copied().expect("block 0");
        assert_eq!(first.start, 1);
        assert_eq!(first.len, 3);
        assert_eq!(first.deleted, 1);
        assert_eq!(first.added, 2);
    }

    #[test]
    fn navigation_resolves_to_first_line_and_does_not_wrap() {
        let mut lines = sample();
        let blocks = index_change_blocks(&mut lines);

        assert_eq!(blocks.next_after(None), Some(0));
        assert_eq!(blocks.next_after(Some(0)), Some(1));
        assert_eq!(blocks.next_after(Some(2)), None);
        assert_eq!(blocks.previous_before(Some(0)), None);
        assert_eq!(blocks.previous_before(Some(2)), Some(1));
        assert_eq!(blocks.previous_before(None), None);

        assert_eq!(blocks.first_line_of(1), Some(5));
        assert_eq!(blocks.first_line_of(3), None);
    }

    #[test]
    fn row_lookups() {
        let mut lines = sample();
        let blocks = index_change_blocks(&mut lines);
        assert_eq!(blocks.block_at_row(0), None);
        assert_eq!(blocks.block_at_row(2), Some(0));
        assert_eq!(blocks.block_at_row(4), None);
        assert_eq!(blocks.block_at_row(6), Some(2));
        assert_eq!(blocks.next_from_row(1), Some(0));
        assert_eq!(blocks.next_from_row(2), Some(1));
        assert_eq!(blocks.next_from_row(7), None);
        assert_eq!(blocks.previous_from_row(5), Some(0));
        assert_eq!(blocks.previous_from_row(1), None);
    }

    #[test]
    fn no_changes_no_blocks() {
        let mut lines = vec![PatchLine::unchanged(1, 1, "a")];
        assert!(index_change_blocks(&mut lines).is_empty());
        assert!(index_change_blocks(&mut []).is_empty());
    }
}
