use proptest::prelude::*;

use prlens_core::SanitizeConfig;
use prlens_difflens::parser::{changed_files, parse_unified_diff};
use prlens_difflens::risk::RiskClassifier;
use prlens_difflens::sanitize::{reconstruct, DiffSanitizer};
use prlens_difflens::truncate::{estimate_tokens, TokenBudgetTruncator};

const PATHS: &[&str] = &[
    "src/auth.rs",
    "src/lib.rs",
    "src/api/routes.rs",
    "README.md",
    "package-lock.json",
    "assets/logo.png",
    "tests/it.rs",
];

fn body_line() -> impl Strategy<Value = (char, String)> {
    (prop_oneof![Just(' '), Just('+'), Just('-')], "[a-z ]{0,24}")
}

fn file_diff() -> impl Strategy<Value = String> {
    (
        0..PATHS.len(),
        prop::collection::vec(prop::collection::vec(body_line(), 1..6), 1..3),
    )
        .prop_map(|(idx, hunks)| {
            let path = PATHS[idx];
            let mut diff = format!("--- a/{path}\n+++ b/{path}\n");
            let mut start = 1;
            for lines in hunks {
                let old = lines.iter().filter(|(m, _)| *m != '+').count();
                let new = lines.iter().filter(|(m, _)| *m != '-').count();
                diff.push_str(&format!("@@ -{start},{old} +{start},{new} @@\n"));
                for (marker, text) in lines {
                    diff.push(marker);
                    diff.push_str(&text);
                    diff.push('\n');
                }
                start += 100;
            }
            diff
        })
}

fn diff_text() -> impl Strategy<Value = String> {
    prop::collection::vec(file_diff(), 0..6).prop_map(|files| files.concat())
}

proptest! {
    /// Changed paths are unique and each belongs to a parsed file.
    #[test]
    fn changed_files_are_unique(diff in diff_text()) {
        let files = parse_unified_diff(&diff);
        let paths = changed_files(&files);
        let mut deduped = paths.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), paths.len());
        for p in &paths {
            prop_assert!(files.iter().any(|f| f.path() == p));
        }
    }

    /// Sanitizing an already sanitized diff changes nothing.
    #[test]
    fn sanitize_is_idempotent(diff in diff_text()) {
        let sanitizer = DiffSanitizer::new(SanitizeConfig::default());
        let once = sanitizer.sanitize(parse_unified_diff(&diff));
        let twice = sanitizer.sanitize(once.kept.clone());
        prop_assert!(twice.excluded.is_empty());
        prop_assert_eq!(twice.kept, once.kept);
    }

    /// Reconstructed text parses back to the same file model.
    #[test]
    fn reconstruct_round_trips(diff in diff_text()) {
        let files = parse_unified_diff(&diff);
        let reparsed = parse_unified_diff(&reconstruct(&files));
        prop_assert_eq!(reparsed, files);
    }

    /// CRLF input parses to the same structure with each body line ending in CR.
    #[test]
    fn crlf_content_keeps_carriage_returns(diff in diff_text()) {
        let plain = parse_unified_diff(&diff);
        let windows = parse_unified_diff(&diff.replace('\n', "\r\n"));
        prop_assert_eq!(windows.len(), plain.len());
        for (w, p) in windows.iter().zip(&plain) {
            prop_assert_eq!(&w.new_path, &p.new_path);
            prop_assert_eq!(w.hunks.len(), p.hunks.len());
            for (wh, ph) in w.hunks.iter().zip(&p.hunks) {
                prop_assert_eq!(wh.lines.len(), ph.lines.len());
                for (wl, pl) in wh.lines.iter().zip(&ph.lines) {
                    prop_assert_eq!(wl.kind, pl.kind);
                    prop_assert_eq!(wl.text.clone(), format!("{}\r", pl.text));
                }
            }
        }
        let reparsed = parse_unified_diff(&reconstruct(&windows));
        prop_assert_eq!(reparsed, windows);
    }

    /// Kept files never exceed the budget and every input file is accounted for.
    #[test]
    fn truncation_respects_budget(diff in diff_text(), budget in 0usize..200) {
        let files = parse_unified_diff(&diff);
        let n = files.len();
        let result = TokenBudgetTruncator::new(budget).truncate(files, &RiskClassifier::default());
        let used: usize = result.files.iter().map(estimate_tokens).sum();
        prop_assert!(used <= budget);
        prop_assert_eq!(used, result.total_tokens);
        prop_assert_eq!(result.files.len() + result.dropped.len(), n);
    }
}
