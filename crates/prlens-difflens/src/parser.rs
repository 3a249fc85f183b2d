use std::collections::HashSet;
use std::fmt;

use prlens_core::{ChangeType, PrlensError};
use serde::Serialize;

/// A complete diff for a single file, containing zero or more hunks.
///
/// # Examples
///
/// ```
/// use prlens_difflens::parser::parse_unified_diff;
///
/// let diff = "diff --git a/hello.rs b/hello.rs\n\
///             --- a/hello.rs\n\
///             +++ b/hello.rs\n\
///             @@ -1,2 +1,3 @@\n\
///              fn main() {\n\
///             +    println!(\"hello\");\n\
///              }\n";
/// let files = parse_unified_diff(diff);
/// assert_eq!(files.len(), 1);
/// assert_eq!(files[0].hunks.len(), 1);
/// assert_eq!(files[0].additions(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    /// Path in the old version. Equals `new_path` for added files.
    pub old_path: String,
    /// Path in the new version. Equals `old_path` for deleted files.
    pub new_path: String,
    /// File-level change classification.
    pub change_type: ChangeType,
    /// Parsed hunks in diff order.
    pub hunks: Vec<Hunk>,
    /// Whether git reported the file as binary.
    pub is_binary: bool,
}

impl FileChange {
    /// The path that identifies this file in reports.
    pub fn path(&self) -> &str {
        &self.new_path
    }

    /// Final path segment.
    pub fn file_name(&self) -> &str {
        self.new_path.rsplit('/').next().unwrap_or(&self.new_path)
    }

    /// Number of added lines across all hunks.
    pub fn additions(&self) -> usize {
        self.count_lines(LineKind::Add)
    }

    /// Number of deleted lines across all hunks.
    pub fn deletions(&self) -> usize {
        self.count_lines(LineKind::Delete)
    }

    fn count_lines(&self, kind: LineKind) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.kind == kind)
            .count()
    }
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({} hunks)",
            self.new_path,
            self.change_type,
            self.hunks.len()
        )
    }
}

/// A contiguous block of changed lines with its before/after ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hunk {
    /// Starting line in the old version.
    pub old_start: u32,
    /// Number of lines in the old version.
    pub old_lines: u32,
    /// Starting line in the new version.
    pub new_start: u32,
    /// Number of lines in the new version.
    pub new_lines: u32,
    /// Text after the closing `@@`, usually the enclosing function.
    pub section: String,
    /// Body lines in order.
    pub lines: Vec<DiffLine>,
}

/// One body line of a hunk, without its marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

/// Kind of a hunk body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Context,
    Add,
    Delete,
}

impl LineKind {
    /// The unified diff marker character.
    pub fn marker(self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Add => '+',
            LineKind::Delete => '-',
        }
    }
}

/// Parse a unified diff string (as produced by `git diff`) into [`FileChange`] entries.
///
/// Parsing is best-effort: malformed hunk headers and stray lines are skipped,
/// never aborting the rest of the diff. Files without hunks (pure renames,
/// mode changes, binaries) are still returned. Two sections for the same path
/// are returned as two entries.
///
/// # Examples
///
/// ```
/// use prlens_difflens::parser::parse_unified_diff;
///
/// assert!(parse_unified_diff("").is_empty());
/// assert!(parse_unified_diff("not a diff at all").is_empty());
/// ```
pub fn parse_unified_diff(input: &str) -> Vec<FileChange> {
    let mut files: Vec<FileChange> = Vec::new();
    let mut current: Option<PendingFile> = None;
    let mut open: Option<OpenHunk> = None;

    for raw in input.split('\n') {
        // Headers are matched without the CR; hunk bodies keep it.
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.starts_with('\\') {
            // "\ No newline at end of file"
            continue;
        }

        if let Some(hunk) = open.as_mut() {
            if hunk.accept(raw) {
                if hunk.is_complete() {
                    close_hunk(&mut current, &mut open);
                }
                continue;
            }
            tracing::debug!(line, "hunk ended before its header line counts");
            close_hunk(&mut current, &mut open);
        }

        if let Some(rest) = line.strip_prefix("diff --git ") {
            finish_file(&mut files, current.take());
            let (old, new) = parse_git_header_paths(rest);
            current = Some(PendingFile::new(old, new));
            continue;
        }

        if let Some(path) = line.strip_prefix("--- ") {
            // Plain patches have no "diff --git" line; a second "---" starts a new file.
            let starts_new = current
                .as_ref()
                .map_or(true, |f| f.seen_old_header || !f.hunks.is_empty());
            if starts_new {
                finish_file(&mut files, current.take());
                current = Some(PendingFile::new(String::new(), String::new()));
            }
            if let Some(file) = current.as_mut() {
                file.seen_old_header = true;
                let path = parse_path(path);
                if path == DEV_NULL {
                    file.is_new = true;
                } else {
                    file.old_path = path;
                }
            }
            continue;
        }

        let Some(file) = current.as_mut() else {
            continue;
        };

        if let Some(path) = line.strip_prefix("+++ ") {
            let path = parse_path(path);
            if path == DEV_NULL {
                file.is_deleted = true;
            } else {
                file.new_path = path;
            }
            continue;
        }

        if line.starts_with("@@ ") {
            match parse_hunk_header(line) {
                Ok(header) => {
                    let hunk = OpenHunk::new(header);
                    if hunk.is_complete() {
                        file.hunks.push(hunk.hunk);
                    } else {
                        open = Some(hunk);
                    }
                }
                Err(e) => tracing::debug!(error = %e, "skipping malformed hunk"),
            }
            continue;
        }

        if line.starts_with("new file mode") {
            file.is_new = true;
        } else if line.starts_with("deleted file mode") {
            file.is_deleted = true;
        } else if let Some(path) = line.strip_prefix("rename from ") {
            file.is_rename = true;
            file.old_path = parse_path(path);
        } else if let Some(path) = line.strip_prefix("rename to ") {
            file.is_rename = true;
            file.new_path = parse_path(path);
        } else if (line.starts_with("Binary files ") && line.ends_with(" differ"))
            || line == "GIT binary patch"
        {
            file.is_binary = true;
        } else if !line.is_empty() {
            tracing::trace!(line, "ignoring diff metadata line");
        }
    }

    close_hunk(&mut current, &mut open);
    finish_file(&mut files, current.take());
    files
}

/// Unique changed paths in first-occurrence order.
///
/// # Examples
///
/// ```
/// use prlens_difflens::parser::{changed_files, parse_unified_diff};
///
/// let diff = "--- a/a.rs\n+++ b/a.rs\n@@ -1 +1 @@\n-x\n+y\n\
///             --- a/a.rs\n+++ b/a.rs\n@@ -9 +9 @@\n-x\n+y\n";
/// let files = parse_unified_diff(diff);
/// assert_eq!(files.len(), 2);
/// assert_eq!(changed_files(&files), vec!["a.rs".to_string()]);
/// ```
pub fn changed_files(files: &[FileChange]) -> Vec<String> {
    let mut seen = HashSet::new();
    files
        .iter()
        .filter(|f| seen.insert(f.path()))
        .map(|f| f.path().to_string())
        .collect()
}

const DEV_NULL: &str = "/dev/null";

struct PendingFile {
    old_path: String,
    new_path: String,
    hunks: Vec<Hunk>,
    seen_old_header: bool,
    is_new: bool,
    is_deleted: bool,
    is_rename: bool,
    is_binary: bool,
}

impl PendingFile {
    fn new(old_path: String, new_path: String) -> Self {
        Self {
            old_path,
            new_path,
            hunks: Vec::new(),
            seen_old_header: false,
            is_new: false,
            is_deleted: false,
            is_rename: false,
            is_binary: false,
        }
    }

    fn into_change(self) -> Option<FileChange> {
        let (mut old_path, mut new_path) = (self.old_path, self.new_path);
        if old_path.is_empty() {
            old_path.clone_from(&new_path);
        }
        if new_path.is_empty() {
            new_path.clone_from(&old_path);
        }
        if new_path.is_empty() {
            return None;
        }

        let change_type = if self.is_new {
            ChangeType::Add
        } else if self.is_deleted {
            ChangeType::Delete
        } else if self.is_rename || old_path != new_path {
            ChangeType::Rename
        } else {
            ChangeType::Modify
        };

        Some(FileChange {
            old_path,
            new_path,
            change_type,
            hunks: self.hunks,
            is_binary: self.is_binary,
        })
    }
}

struct OpenHunk {
    hunk: Hunk,
    old_remaining: u32,
    new_remaining: u32,
}

impl OpenHunk {
    fn new(header: HunkHeader) -> Self {
        Self {
            old_remaining: header.old_lines,
            new_remaining: header.new_lines,
            hunk: Hunk {
                old_start: header.old_start,
                old_lines: header.old_lines,
                new_start: header.new_start,
                new_lines: header.new_lines,
                section: header.section,
                lines: Vec::new(),
            },
        }
    }

    fn is_complete(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }

    /// Consume `raw` as a body line if the remaining counts allow it.
    fn accept(&mut self, raw: &str) -> bool {
        let (kind, text) = match raw.chars().next() {
            Some('+') if self.new_remaining > 0 => (LineKind::Add, &raw[1..]),
            Some('-') if self.old_remaining > 0 => (LineKind::Delete, &raw[1..]),
            Some(' ') if self.old_remaining > 0 && self.new_remaining > 0 => {
                (LineKind::Context, &raw[1..])
            }
            // Some tools strip the single space from blank context lines.
            None if self.old_remaining > 0 && self.new_remaining > 0 => (LineKind::Context, ""),
            Some('\r') if raw == "\r" && self.old_remaining > 0 && self.new_remaining > 0 => {
                (LineKind::Context, raw)
            }
            _ => return false,
        };

        match kind {
            LineKind::Add => self.new_remaining -= 1,
            LineKind::Delete => self.old_remaining -= 1,
            LineKind::Context => {
                self.old_remaining -= 1;
                self.new_remaining -= 1;
            }
        }
        self.hunk.lines.push(DiffLine {
            kind,
            text: text.to_string(),
        });
        true
    }
}

fn close_hunk(current: &mut Option<PendingFile>, open: &mut Option<OpenHunk>) {
    if let Some(h) = open.take() {
        if let Some(file) = current.as_mut() {
            file.hunks.push(h.hunk);
        }
    }
}

fn finish_file(files: &mut Vec<FileChange>, pending: Option<PendingFile>) {
    if let Some(change) = pending.and_then(PendingFile::into_change) {
        files.push(change);
    }
}

fn parse_path(raw: &str) -> String {
    // git appends a tab and timestamp in some modes
    let raw = raw.split('\t').next().unwrap_or(raw).trim_end();
    let normalized = raw.trim_matches('"');

    if normalized == DEV_NULL {
        return DEV_NULL.to_string();
    }

    normalized
        .strip_prefix("a/")
        .or_else(|| normalized.strip_prefix("b/"))
        .unwrap_or(normalized)
        .to_string()
}

fn parse_git_header_paths(rest: &str) -> (String, String) {
    if let Some(stripped) = rest.strip_prefix('"') {
        if let Some(end) = stripped.find('"') {
            let old = &stripped[..end];
            let new = stripped[end + 1..].trim_start();
            return (parse_path(old), parse_path(new));
        }
    }

    // "a/x b/x": when both sides are the same path the split is at the midpoint
    if rest.len() % 2 == 1 {
        let mid = rest.len() / 2;
        if rest.is_char_boundary(mid) && rest.as_bytes()[mid] == b' ' {
            let (old, new) = (&rest[..mid], &rest[mid + 1..]);
            if old.get(2..) == new.get(2..) {
                return (parse_path(old), parse_path(new));
            }
        }
    }

    match rest.rfind(" b/") {
        Some(idx) => (parse_path(&rest[..idx]), parse_path(&rest[idx + 1..])),
        None => (String::new(), String::new()),
    }
}

struct HunkHeader {
    old_start: u32,
    old_lines: u32,
    new_start: u32,
    new_lines: u32,
    section: String,
}

fn parse_hunk_header(line: &str) -> prlens_core::Result<HunkHeader> {
    let (inner, section) = line
        .strip_prefix("@@ ")
        .and_then(|s| {
            let end = s.find(" @@")?;
            Some((&s[..end], s[end + 3..].trim()))
        })
        .ok_or_else(|| PrlensError::Parse(format!("invalid hunk header: {line}")))?;

    let parts: Vec<&str> = inner.split(' ').collect();
    if parts.len() != 2 {
        return Err(PrlensError::Parse(format!("invalid hunk header: {line}")));
    }

    let old = parts[0]
        .strip_prefix('-')
        .ok_or_else(|| PrlensError::Parse(format!("invalid old range in hunk: {line}")))?;
    let new = parts[1]
        .strip_prefix('+')
        .ok_or_else(|| PrlensError::Parse(format!("invalid new range in hunk: {line}")))?;

    let (old_start, old_lines) = parse_range(old, line)?;
    let (new_start, new_lines) = parse_range(new, line)?;

    Ok(HunkHeader {
        old_start,
        old_lines,
        new_start,
        new_lines,
        section: section.to_string(),
    })
}

fn parse_range(range: &str, context: &str) -> Result<(u32, u32), PrlensError> {
    if let Some((start, count)) = range.split_once(',') {
        let s = start
            .parse()
            .map_err(|_| PrlensError::Parse(format!("invalid range number in: {context}")))?;
        let c = count
            .parse()
            .map_err(|_| PrlensError::Parse(format!("invalid range count in: {context}")))?;
        Ok((s, c))
    } else {
        let s = range
            .parse()
            .map_err(|_| PrlensError::Parse(format!("invalid range number in: {context}")))?;
        Ok((s, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(hunk: &Hunk, kind: LineKind) -> Vec<&str> {
        hunk.lines
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.text.as_str())
            .collect()
    }

    #[test]
    fn empty_diff_returns_empty_vec() {
        assert!(parse_unified_diff("").is_empty());
    }

    #[test]
    fn single_file_single_hunk() {
        let diff = "\
diff --git a/src/main.rs b/src/main.rs
index abc1234..def5678 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,3 +1,4 @@ fn main() {
 fn main() {
+    println!(\"hello\");
     let x = 1;
 }
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        let file = &files[0];
        assert_eq!(file.new_path, "src/main.rs");
        assert_eq!(file.change_type, ChangeType::Modify);
        assert_eq!(file.hunks.len(), 1);
        let hunk = &file.hunks[0];
        assert_eq!(
            (hunk.old_start, hunk.old_lines, hunk.new_start, hunk.new_lines),
            (1, 3, 1, 4)
        );
        assert_eq!(hunk.section, "fn main() {");
        assert_eq!(texts(hunk, LineKind::Add), vec!["    println!(\"hello\");"]);
        assert_eq!(hunk.lines.len(), 4);
    }

    #[test]
    fn single_file_multiple_hunks() {
        let diff = "\
diff --git a/lib.rs b/lib.rs
--- a/lib.rs
+++ b/lib.rs
@@ -1,2 +1,3 @@
 fn foo() {
+    bar();
 }
@@ -10,2 +11,3 @@
 fn baz() {
+    qux();
 }
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hunks.len(), 2);
        assert_eq!(files[0].hunks[0].old_start, 1);
        assert_eq!(files[0].hunks[1].old_start, 10);
    }

    #[test]
    fn multiple_files() {
        let diff = "\
diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -1 +1,2 @@
 line1
+line2
diff --git a/b.rs b/b.rs
--- a/b.rs
+++ b/b.rs
@@ -1 +1,2 @@
 line1
+line2
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].new_path, "a.rs");
        assert_eq!(files[1].new_path, "b.rs");
    }

    #[test]
    fn new_file() {
        let diff = "\
diff --git a/new.rs b/new.rs
new file mode 100644
--- /dev/null
+++ b/new.rs
@@ -0,0 +1,3 @@
+fn hello() {
+    println!(\"new\");
+}
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].change_type, ChangeType::Add);
        assert_eq!(files[0].old_path, "new.rs");
        assert_eq!(files[0].new_path, "new.rs");
        assert_eq!(files[0].additions(), 3);
    }

    #[test]
    fn deleted_file_keeps_its_path() {
        let diff = "\
diff --git a/old.rs b/old.rs
deleted file mode 100644
--- a/old.rs
+++ /dev/null
@@ -1,3 +0,0 @@
-fn goodbye() {
-    println!(\"old\");
-}
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].change_type, ChangeType::Delete);
        assert_eq!(files[0].new_path, "old.rs");
        assert_eq!(files[0].deletions(), 3);
    }

    #[test]
    fn renamed_file_without_hunks_is_kept() {
        let diff = "\
diff --git a/old_name.rs b/new_name.rs
similarity index 100%
rename from old_name.rs
rename to new_name.rs
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].change_type, ChangeType::Rename);
        assert_eq!(files[0].old_path, "old_name.rs");
        assert_eq!(files[0].new_path, "new_name.rs");
        assert!(files[0].hunks.is_empty());
    }

    #[test]
    fn binary_files_are_kept_without_hunks() {
        let diff = "\
diff --git a/image.png b/image.png
Binary files a/image.png and b/image.png differ
diff --git a/code.rs b/code.rs
--- a/code.rs
+++ b/code.rs
@@ -1 +1,2 @@
 line1
+line2
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 2);
        assert!(files[0].is_binary);
        assert!(files[0].hunks.is_empty());
        assert_eq!(files[1].new_path, "code.rs");
        assert!(!files[1].is_binary);
    }

    #[test]
    fn no_newline_at_eof_handled() {
        let diff = "\
diff --git a/f.rs b/f.rs
--- a/f.rs
+++ b/f.rs
@@ -1 +1 @@
-old
\\ No newline at end of file
+new
\\ No newline at end of file
";
        let files = parse_unified_diff(diff);
        let hunk = &files[0].hunks[0];
        assert_eq!(texts(hunk, LineKind::Delete), vec!["old"]);
        assert_eq!(texts(hunk, LineKind::Add), vec!["new"]);
        assert!(hunk.lines.iter().all(|l| !l.text.contains("No newline")));
    }

    #[test]
    fn header_lookalikes_inside_a_hunk_stay_content() {
        let diff = "\
diff --git a/notes.md b/notes.md
--- a/notes.md
+++ b/notes.md
@@ -1,2 +1,2 @@
--- a/separator
+++ b/separator
 tail
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        let hunk = &files[0].hunks[0];
        assert_eq!(texts(hunk, LineKind::Delete), vec!["-- a/separator"]);
        assert_eq!(texts(hunk, LineKind::Add), vec!["++ b/separator"]);
    }

    #[test]
    fn malformed_hunk_header_is_skipped_not_fatal() {
        let diff = "\
diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -x,1 +1,y @@
+ignored
diff --git a/b.rs b/b.rs
--- a/b.rs
+++ b/b.rs
@@ -1 +1 @@
-before
+after
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 2);
        assert!(files[0].hunks.is_empty());
        assert_eq!(files[1].hunks.len(), 1);
    }

    #[test]
    fn short_hunk_body_is_closed_at_next_header() {
        let diff = "\
diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -1,5 +1,5 @@
-one
+uno
diff --git a/b.rs b/b.rs
--- a/b.rs
+++ b/b.rs
@@ -1 +1 @@
-two
+dos
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].hunks[0].lines.len(), 2);
        assert_eq!(files[1].new_path, "b.rs");
    }

    #[test]
    fn duplicate_sections_are_not_merged() {
        let diff = "\
diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -1 +1 @@
-x
+y
diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -5 +5 @@
-p
+q
";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 2);
        assert_eq!(changed_files(&files), vec!["a.rs"]);
    }

    #[test]
    fn carriage_returns_are_preserved_in_content() {
        let diff = "--- a/w.txt\r\n+++ b/w.txt\r\n@@ -1 +1 @@\r\n-old\r\n+new\r\n";
        let files = parse_unified_diff(diff);
        assert_eq!(files[0].new_path, "w.txt");
        assert_eq!(texts(&files[0].hunks[0], LineKind::Add), vec!["new\r"]);
    }

    #[test]
    fn crlf_blank_context_line_keeps_its_carriage_return() {
        let diff = "--- a/w.txt\r\n+++ b/w.txt\r\n@@ -1,2 +1,2 @@\r\n\r\n-old\r\n+new\r\n";
        let hunk = &parse_unified_diff(diff)[0].hunks[0];
        assert_eq!(hunk.lines.len(), 3);
        assert_eq!(hunk.lines[0].kind, LineKind::Context);
        assert_eq!(hunk.lines[0].text, "\r");
        assert_eq!(texts(hunk, LineKind::Delete), vec!["old\r"]);
    }

    #[test]
    fn blank_context_line_without_space() {
        let diff = "\
--- a/f.py
+++ b/f.py
@@ -1,3 +1,3 @@
 a

-b
+c
";
        let files = parse_unified_diff(diff);
        let hunk = &files[0].hunks[0];
        assert_eq!(hunk.lines.len(), 4);
        assert_eq!(hunk.lines[1].kind, LineKind::Context);
        assert_eq!(hunk.lines[1].text, "");
    }

    #[test]
    fn parse_path_handles_quoted_paths() {
        assert_eq!(parse_path("\"a/src/my file.rs\""), "src/my file.rs");
        assert_eq!(parse_path("\"b/src/my file.rs\""), "src/my file.rs");
        assert_eq!(parse_path("b/file.rs\t2024-01-01"), "file.rs");
    }

    #[test]
    fn git_header_paths_with_spaces() {
        assert_eq!(
            parse_git_header_paths("a/my dir/x.rs b/my dir/x.rs"),
            ("my dir/x.rs".to_string(), "my dir/x.rs".to_string())
        );
        assert_eq!(
            parse_git_header_paths("a/old.rs b/new.rs"),
            ("old.rs".to_string(), "new.rs".to_string())
        );
        assert_eq!(
            parse_git_header_paths("\"a/a b.rs\" \"b/a b.rs\""),
            ("a b.rs".to_string(), "a b.rs".to_string())
        );
    }

    #[test]
    fn hunk_header_errors() {
        assert!(parse_hunk_header("@@ -1 +1 @@").is_ok());
        assert!(parse_hunk_header("@@ garbage").is_err());
        assert!(parse_hunk_header("@@ -1 @@").is_err());
        assert!(parse_hunk_header("@@ 1,2 +1,2 @@").is_err());
    }
}
