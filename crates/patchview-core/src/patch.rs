use std::ops::Range;

use tracing::debug;

use crate::line::PatchLine;

/// Parsed `@@ -a[,b] +c[,d] @@` header. Omitted counts default to 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
}

/// One `diff --git` (or `---`/`+++`) section of a multi-file patch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSection {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    /// Range into [`ParsedPatch::lines`].
    pub lines: Range<usize>,
    pub language_hint: Option<String>,
}

impl FileSection {
    /// The path a reader would recognise the file by: the new path unless the file was deleted.
    pub fn display_path(&self) -> Option<&str> {
        match self.new_path.as_deref() {
            Some(DEV_NULL) | None => self.old_path.as_deref(),
            Some(p) => Some(p),
        }
    }

    fn matches(&self, path: &str) -> bool {
        self.new_path.as_deref() == Some(path) || self.old_path.as_deref() == Some(path)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedPatch {
    pub lines: Vec<PatchLine>,
    pub files: Vec<FileSection>,
}

impl ParsedPatch {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Patch lines of the first section whose old or new path equals `path`.
    pub fn file(&self, path: &str) -> Option<&[PatchLine]> {
        let section = self.files.iter().find(|f| f.matches(path))?;
        self.lines.get(section.lines.clone())
    }

    pub fn section(&self, path: &str) -> Option<&FileSection> {
        self.files.iter().find(|f| f.matches(path))
    }
}

const DEV_NULL: &str = "/dev/null";

const METADATA_PREFIXES: &[&str] = &[
    "index ",
    "new file mode ",
    "deleted file mode ",
    "old mode ",
    "new mode ",
    "similarity index ",
    "dissimilarity index ",
    "rename from ",
    "rename to ",
    "copy from ",
    "copy to ",
    "Binary files ",
];

#[derive(Clone, Copy, Debug)]
struct HunkCursor {
    old_line: u32,
    new_line: u32,
    old_remaining: u32,
    new_remaining: u32,
}

#[derive(Clone, Copy, Debug)]
enum State {
    Scanning,
    InHunk(HunkCursor),
}

/// Parses unified-diff text into patch lines covering the hunk regions.
///
/// Never fails: malformed hunk headers drop that hunk's body, and empty input yields an empty
/// patch.
pub fn parse_unified_diff(input: &str) -> ParsedPatch {
    let mut out = ParsedPatch::default();
    let mut state = State::Scanning;
    let mut section: Option<FileSection> = None;

    for (idx, raw) in input.lines().enumerate() {
        if let Some(rest) = raw.strip_prefix("diff --git ") {
            finish_section(&mut out, section.take());
            let (old_path, new_path) = parse_diff_git_paths(rest);
            section = Some(FileSection {
                old_path,
                new_path,
                lines: out.lines.len()..out.lines.len(),
                language_hint: None,
            });
            state = State::Scanning;
            continue;
        }

        if let Some(path) = raw.strip_prefix("--- ") {
            let is_body = matches!(state, State::InHunk(c) if c.old_remaining > 0);
            if !is_body {
                // Plain `diff -u` output concatenates files without `diff --git` lines.
                if section.as_ref().is_some_and(|s| !s.lines.is_empty()) {
                    finish_section(&mut out, section.take());
                }
                state = State::Scanning;
                let s = section.get_or_insert_with(|| empty_section(out.lines.len()));
                s.old_path = Some(parse_header_path(path));
                continue;
            }
        }

        if let Some(path) = raw.strip_prefix("+++ ") {
            let is_body = matches!(state, State::InHunk(c) if c.new_remaining > 0);
            if !is_body {
                let s = section.get_or_insert_with(|| empty_section(out.lines.len()));
                s.new_path = Some(parse_header_path(path));
                continue;
            }
        }

        if METADATA_PREFIXES.iter().any(|p| raw.starts_with(p)) {
            continue;
        }

        if raw.starts_with("@@") {
            state = match parse_hunk_header(raw) {
                // An empty new side (`+c,0`) names the line the hunk follows.
                Some(h) => State::InHunk(HunkCursor {
                    old_line: h.old_start,
                    new_line: if h.new_count == 0 {
                        h.new_start.saturating_add(1)
                    } else {
                        h.new_start
                    },
                    old_remaining: h.old_count,
                    new_remaining: h.new_count,
                }),
                None => {
                    debug!(line = idx + 1, header = raw, "skipping malformed hunk header");
                    State::Scanning
                }
            };
            continue;
        }

        let State::InHunk(cursor) = &mut state else {
            continue;
        };

        let line = match raw.as_bytes().first().copied() {
            None => continue,
            Some(b'\\') => continue,
            Some(b'+') => {
                let line = PatchLine::added(cursor.new_line, &raw[1..]);
                cursor.new_line = cursor.new_line.saturating_add(1);
                cursor.new_remaining = cursor.new_remaining.saturating_sub(1);
                line
            }
            Some(b'-') => {
                let line = PatchLine::deleted(cursor.new_line, cursor.old_line, &raw[1..]);
                cursor.old_line = cursor.old_line.saturating_add(1);
                cursor.old_remaining = cursor.old_remaining.saturating_sub(1);
                line
            }
            Some(b' ') => {
                let line = PatchLine::unchanged(cursor.new_line, cursor.old_line, &raw[1..]);
                cursor.old_line = cursor.old_line.saturating_add(1);
                cursor.new_line = cursor.new_line.saturating_add(1);
                cursor.old_remaining = cursor.old_remaining.saturating_sub(1);
                cursor.new_remaining = cursor.new_remaining.saturating_sub(1);
                line
            }
            Some(_) => {
                state = State::Scanning;
                continue;
            }
        };

        section
            .get_or_insert_with(|| empty_section(out.lines.len()))
            .lines
            .end += 1;
        out.lines.push(line);
    }

    finish_section(&mut out, section);
    out
}

/// Parses a hunk header of the form `@@ -a[,b] +c[,d] @@[ section heading]`.
pub fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let after = line.strip_prefix("@@")?.trim_start();
    let after = after.strip_prefix('-')?;
    let (old_part, rest) = after.split_once(' ')?;
    let rest = rest.trim_start().strip_prefix('+')?;
    let (new_part, rest) = rest.split_once(' ')?;
    if !rest.trim_start().starts_with("@@") {
        return None;
    }

    let (old_start, old_count) = parse_range(old_part)?;
    let (new_start, new_count) = parse_range(new_part)?;
    Some(HunkHeader {
        old_start,
        old_count,
        new_start,
        new_count,
    })
}

fn parse_range(part: &str) -> Option<(u32, u32)> {
    match part.split_once(',') {
        Some((start, count)) => Some((parse_u32(start)?, parse_u32(count)?)),
        None => Some((parse_u32(part)?, 1)),
    }
}

fn parse_u32(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn empty_section(at: usize) -> FileSection {
    FileSection {
        lines: at..at,
        ..Default::default()
    }
}

fn finish_section(out: &mut ParsedPatch, section: Option<FileSection>) {
    let Some(mut section) = section else {
        return;
    };
    section.language_hint = section.display_path().and_then(file_extension).map(str::to_string);
    out.files.push(section);
}

fn parse_diff_git_paths(rest: &str) -> (Option<String>, Option<String>) {
    let split = rest
        .rsplit_once(" b/")
        .map(|(a, b)| (a.to_string(), format!("b/{b}")))
        .or_else(|| rest.split_once(' ').map(|(a, b)| (a.to_string(), b.to_string())));
    match split {
        Some((a, b)) => (Some(strip_git_prefix(&a)), Some(strip_git_prefix(&b))),
        None => (None, None),
    }
}

fn parse_header_path(raw: &str) -> String {
    let path = raw.split_once('\t').map_or(raw, |(p, _)| p).trim();
    strip_git_prefix(path)
}

fn strip_git_prefix(path: &str) -> String {
    let path = path.trim();
    if path == DEV_NULL {
        return path.to_string();
    }
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
        .to_string()
}

fn file_extension(path: &str) -> Option<&str> {
    if path == DEV_NULL {
        return None;
    }
    let name = path.rsplit_once('/').map_or(path, |(_, name)| name);
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() { None } else { Some(ext) }
}
