use std::collections::HashMap;

use crate::line::LineKind;
use crate::line::PatchLine;

/// Merges patch lines into the full new-file content so every line `1..=N` is present.
///
/// Without `full_content` the patch-only sequence is returned unchanged. Patch lines numbered
/// outside `1..=N` (trailing deletions sit at `N + 1`, deletion-only hunks may use 0) are kept:
/// those below 1 lead, those above N trail, each group in patch order. A number that carries
/// only deletions still gets its file line, placed after the deletions.
pub fn reconstruct(patch: &[PatchLine], full_content: Option<&str>) -> Vec<PatchLine> {
    let Some(full) = full_content else {
        return patch.to_vec();
    };

    let file_lines: Vec<&str> = full.lines().collect();
    let total = file_lines.len() as u32;

    let mut by_number: HashMap<u32, Vec<&PatchLine>> = HashMap::with_capacity(patch.len());
    let mut leading: Vec<&PatchLine> = Vec::new();
    let mut trailing: Vec<&PatchLine> = Vec::new();
    for line in patch {
        if line.line_number == 0 {
            leading.push(line);
        } else if line.line_number > total {
            trailing.push(line);
        } else {
            by_number.entry(line.line_number).or_default().push(line);
        }
    }

    let mut out = Vec::with_capacity(file_lines.len() + patch.len());
    out.extend(leading.into_iter().cloned());
    for (idx, content) in file_lines.iter().enumerate() {
        let number = idx as u32 + 1;
        let lines = by_number.get(&number).map_or(&[][..], Vec::as_slice);
        out.extend(lines.iter().map(|l| (*l).clone()));
        // Deletions only mark where removed text sat; the file's own line still follows.
        if lines.iter().all(|l| l.kind == LineKind::Deleted) {
            out.push(PatchLine::unchanged(number, number, *content));
        }
    }
    out.extend(trailing.into_iter().cloned());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::parse_unified_diff;

    #[test]
    fn without_full_content_returns_patch_only() {
        let patch = vec![PatchLine::added(3, "x")];
        assert_eq!(reconstruct(&patch, None), patch);
    }

    #[test]
    fn fills_gaps_with_unchanged_lines() {
        let patch = vec![
            PatchLine::deleted(2, 2, "old"),
            PatchLine::added(2, "new"),
        ];
        let out = reconstruct(&patch, Some("a\nnew\nc\n"));
        let kinds: Vec<LineKind> = out.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Unchanged,
                LineKind::Deleted,
                LineKind::Added,
                LineKind::Unchanged
            ]
        );
        assert_eq!(out[0].content, "a");
        assert_eq!(out[0].old_line_number, Some(1));
        assert_eq!(out[3].line_number, 3);
        assert_eq!(out[3].content, "c");
    }

    #[test]
    fn keeps_trailing_deletions_past_end_of_file() {
        let patch = vec![
            PatchLine::unchanged(2, 2, "b"),
            PatchLine::deleted(3, 3, "gone"),
        ];
        let out = reconstruct(&patch, Some("a\nb"));
        assert_eq!(out.len(), 3);
        assert_eq!(out[2].kind, LineKind::Deleted);
        assert_eq!(out[2].content, "gone");
    }

    #[test]
    fn empty_file_keeps_deletion_only_hunk() {
        let patch = vec![PatchLine::deleted(0, 1, "only")];
        let out = reconstruct(&patch, Some(""));
        assert_eq!(out, patch);
    }

    #[test]
    fn deletion_only_numbers_keep_their_file_line() {
        // Context hunk ending in a deletion: the removed line sits before file line 2.
        let patch = vec![
            PatchLine::unchanged(1, 1, "a"),
            PatchLine::deleted(2, 2, "gone"),
        ];
        let out = reconstruct(&patch, Some("a\nc\n"));
        let rows: Vec<(LineKind, &str)> = out.iter().map(|l| (l.kind, l.content.as_str())).collect();
        assert_eq!(
            rows,
            vec![
                (LineKind::Unchanged, "a"),
                (LineKind::Deleted, "gone"),
                (LineKind::Unchanged, "c"),
            ]
        );
    }

    #[test]
    fn zero_context_deletion_keeps_neighbours() {
        let parsed = parse_unified_diff("@@ -3 +2,0 @@\n-c\n");
        let out = reconstruct(&parsed.lines, Some("a\nb\nd\n"));
        let rows: Vec<(u32, LineKind, &str)> = out
            .iter()
            .map(|l| (l.line_number, l.kind, l.content.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, LineKind::Unchanged, "a"),
                (2, LineKind::Unchanged, "b"),
                (3, LineKind::Deleted, "c"),
                (3, LineKind::Unchanged, "d"),
            ]
        );
    }
}
