use similar::Algorithm;
use similar::ChangeTag;
use similar::TextDiff;

use crate::line::DiffSegment;
use crate::line::SegmentKind;

/// Unit of comparison for intra-line segmentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SegmentGranularity {
    #[default]
    Chars,
    /// Words and whitespace runs, as split by `similar`.
    Words,
}

/// Computes a shortest edit script between `old` and `new` and returns it as coalesced segments.
///
/// Concatenating the unchanged + added segments yields `new`; unchanged + deleted yields `old`.
/// No two neighbouring segments share a kind.
pub fn segment_line(old: &str, new: &str, granularity: SegmentGranularity) -> Vec<DiffSegment> {
    let mut config = TextDiff::configure();
    config.algorithm(Algorithm::Myers);
    let diff = match granularity {
        SegmentGranularity::Chars => config.diff_chars(old, new),
        SegmentGranularity::Words => config.diff_words(old, new),
    };

    let mut out: Vec<DiffSegment> = Vec::new();
    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => SegmentKind::Unchanged,
            ChangeTag::Delete => SegmentKind::Deleted,
            ChangeTag::Insert => SegmentKind::Added,
        };
        push_coalesced(&mut out, kind, change.value());
    }
    out
}

fn push_coalesced(out: &mut Vec<DiffSegment>, kind: SegmentKind, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = out.last_mut()
        && last.kind == kind
    {
        last.content.push_str(text);
        return;
    }
    out.push(DiffSegment::new(kind, text));
}

/// Rebuilds the old text of a modified line.
pub fn old_side(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.kind != SegmentKind::Added)
        .map(|s| s.content.as_str())
        .collect()
}

/// Rebuilds the new text of a modified line.
pub fn new_side(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.kind != SegmentKind::Deleted)
        .map(|s| s.content.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(segments: &[DiffSegment]) -> Vec<SegmentKind> {
        segments.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn single_insertion_does_not_misalign_the_tail() {
        let segments = segment_line("let x = 1;", "let mut x = 1;", SegmentGranularity::Chars);
        assert_eq!(
            kinds(&segments),
            vec![
                SegmentKind::Unchanged,
                SegmentKind::Added,
                SegmentKind::Unchanged
            ]
        );
        assert_eq!(segments[1].content.chars().count(), 4);
        assert!(segments[2].content.ends_with("x = 1;"));
    }

    #[test]
    fn sides_rebuild_both_lines() {
        let old = "println!(\"Hello, world!\");";
        let new = "println!(\"Hello, patchview!\");";
        for granularity in [SegmentGranularity::Chars, SegmentGranularity::Words] {
            let segments = segment_line(old, new, granularity);
            assert_eq!(old_side(&segments), old);
            assert_eq!(new_side(&segments), new);
        }
    }

    #[test]
    fn neighbouring_segments_never_share_a_kind() {
        let segments = segment_line("abcdef", "azcyef", SegmentGranularity::Chars);
        for pair in segments.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[test]
    fn handles_multibyte_text() {
        let segments = segment_line("你好", "你们好", SegmentGranularity::Chars);
        assert_eq!(
            kinds(&segments),
            vec![
                SegmentKind::Unchanged,
                SegmentKind::Added,
                SegmentKind::Unchanged
            ]
        );
        assert_eq!(new_side(&segments), "你们好");
    }

    #[test]
    fn empty_old_side_is_one_added_segment() {
        let segments = segment_line("", "abc", SegmentGranularity::Chars);
        assert_eq!(segments, vec![DiffSegment::new(SegmentKind::Added, "abc")]);
    }
}
