use crate::line::LineKind;
use crate::line::PatchLine;
use crate::segments::SegmentGranularity;
use crate::segments::segment_line;

/// Collapses each deleted line immediately followed by an added line at the same line number
/// into one [`LineKind::Modified`] line carrying intra-line segments.
///
/// Pairs with identical content are left as two lines.
pub fn detect_modifications(
    lines: Vec<PatchLine>,
    granularity: SegmentGranularity,
) -> Vec<PatchLine> {
    let mut out: Vec<PatchLine> = Vec::with_capacity(lines.len());
    let mut iter = lines.into_iter().peekable();

    while let Some(line) = iter.next() {
        let pairs = line.kind == LineKind::Deleted
            && iter.peek().is_some_and(|next| {
                next.kind == LineKind::Added
                    && next.line_number == line.line_number
                    && next.content != line.content
            });
        if !pairs {
            out.push(line);
            continue;
        }
        let Some(added) = iter.next() else {
            out.push(line);
            break;
        };

        let segments = segment_line(&line.content, &added.content, granularity);
        out.push(PatchLine {
            line_number: added.line_number,
            old_line_number: line.old_line_number,
            content: added.content,
            kind: LineKind::Modified,
            segments: Some(segments),
            change_block: None,
        });
    }

    out
}
