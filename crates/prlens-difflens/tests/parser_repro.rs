use prlens_core::{ChangeType, RiskTier, SanitizeConfig};
use prlens_difflens::parser::parse_unified_diff;
use prlens_difflens::risk::RiskClassifier;
use prlens_difflens::sanitize::{reconstruct, DiffSanitizer};
use prlens_difflens::truncate::TokenBudgetTruncator;

#[test]
fn parse_patch_without_git_header() {
    let diff = "\
--- /dev/null
+++ b/demo/bad_code.rs
@@ -0,0 +1,3 @@
+fn main() {
+    println!(\"hello\");
+}
";
    let files = parse_unified_diff(diff);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].new_path, "demo/bad_code.rs");
    assert_eq!(files[0].change_type, ChangeType::Add);
    assert_eq!(files[0].additions(), 3);
}

#[test]
fn crlf_diff_keeps_structure_and_content() {
    let lf = "--- a/x.rs\n+++ b/x.rs\n@@ -1 +1 @@\n-old\n+new\n";
    let crlf = lf.replace('\n', "\r\n");
    let plain = parse_unified_diff(lf);
    let windows = parse_unified_diff(&crlf);

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].new_path, plain[0].new_path);
    assert_eq!(windows[0].change_type, plain[0].change_type);
    let (a, b) = (&plain[0].hunks[0], &windows[0].hunks[0]);
    assert_eq!(
        (b.old_start, b.old_lines, b.new_start, b.new_lines),
        (a.old_start, a.old_lines, a.new_start, a.new_lines)
    );
    let texts: Vec<&str> = b.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["old\r", "new\r"]);
    assert!(reconstruct(&windows).contains("+new\r\n"));
}

#[test]
fn sanitize_then_truncate_pipeline() {
    let diff = "\
diff --git a/package-lock.json b/package-lock.json
--- a/package-lock.json
+++ b/package-lock.json
@@ -1 +1 @@
-{\"v\": 1}
+{\"v\": 2}
diff --git a/assets/logo.png b/assets/logo.png
Binary files a/assets/logo.png and b/assets/logo.png differ
diff --git a/src/auth/session.rs b/src/auth/session.rs
--- a/src/auth/session.rs
+++ b/src/auth/session.rs
@@ -1,2 +1,2 @@
 fn check() {
-    false
+    true
diff --git a/README.md b/README.md
--- a/README.md
+++ b/README.md
@@ -1 +1 @@
-# Old
+# New
";
    let files = parse_unified_diff(diff);
    assert_eq!(files.len(), 4);

    let sanitized = DiffSanitizer::new(SanitizeConfig::default()).sanitize(files);
    let kept: Vec<&str> = sanitized.kept.iter().map(|f| f.path()).collect();
    assert_eq!(kept, vec!["src/auth/session.rs", "README.md"]);
    assert_eq!(sanitized.excluded.len(), 2);

    let risk = RiskClassifier::default();
    let summary = risk.summarize(&risk.assess(&sanitized.kept));
    assert_eq!(summary.tier, RiskTier::High);

    let result = TokenBudgetTruncator::new(25).truncate(sanitized.kept, &risk);
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].path(), "src/auth/session.rs");
    assert!(result.is_truncated());

    let text = reconstruct(&result.files);
    assert!(text.starts_with("diff --git a/src/auth/session.rs b/src/auth/session.rs\n"));
    assert!(text.contains("+    true\n"));
    assert!(!text.contains("README"));
}
