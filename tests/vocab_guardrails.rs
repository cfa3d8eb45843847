use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use aptgen_core::lang::conventions;
use aptgen_core::lang::element_kind;

/// Guardrail against reintroducing stringly-typed convention checks.
///
/// This is intentionally a **coarse** safety net. It looks for suspicious patterns like `== "CLASS"`,
/// `name.starts_with("get")` or `match kind { "method" => ... }` in Rust source files where callers are expected to go
/// through `aptgen_core` instead.
///
/// Notes:
/// - We allow occurrences in `crates/aptgen_core/src/**` (the vocabulary itself) and in tests/fixtures.
/// - This is not meant to be perfect; it’s meant to catch “oops I added a string match”.
#[test]
fn no_new_stringly_vocab_checks_in_rust_sources() {
    let root = repo_root();
    let spellings = vocabulary_spellings();
    let mut offenders: Vec<(PathBuf, usize, String)> = Vec::new();

    let targets = [root.join("src"), root.join("crates")];
    for dir in targets {
        if dir.exists() {
            scan_dir(&root, &dir, &spellings, &mut offenders);
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::new();
        msg.push_str("Found potential stringly-typed vocabulary checks. Prefer aptgen_core.\n\n");
        for (path, line_no, line) in offenders.into_iter().take(80) {
            msg.push_str(&format!(
                "- {}:{}: {}\n",
                path.strip_prefix(&root).unwrap_or(&path).display(),
                line_no,
                line.trim()
            ));
        }
        panic!("{msg}");
    }
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn vocabulary_spellings() -> Vec<&'static str> {
    // Element kinds (canonical and aliases) plus the naming conventions generation depends on.
    let mut set: BTreeSet<&'static str> = BTreeSet::new();

    for k in element_kind::ELEMENT_KINDS {
        set.insert(k.canonical);
        for &a in k.aliases {
            set.insert(a);
        }
    }

    set.insert(conventions::GETTER_PREFIX);
    set.insert(conventions::GENERATED_SUFFIX);
    set.insert(conventions::WILDCARD_ANNOTATION);
    set.insert(conventions::SOURCE_EXTENSION);

    set.into_iter().collect()
}

fn is_allowed_file(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
    if !rel.ends_with(".rs") {
        return true;
    }
    // The vocabulary crate defines the spellings; allow it.
    if rel.starts_with("crates/aptgen_core/src/") {
        return true;
    }
    // Tests can mention spellings directly.
    if rel.starts_with("tests/") {
        return true;
    }
    false
}

fn scan_dir(root: &Path, dir: &Path, spellings: &[&'static str], offenders: &mut Vec<(PathBuf, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(root, &path, spellings, offenders);
            continue;
        }
        if is_allowed_file(root, &path) {
            continue;
        }
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in contents.lines().enumerate() {
            if is_suspicious_line(line, spellings) {
                offenders.push((path.clone(), idx + 1, line.to_string()));
            }
        }
    }
}

fn is_suspicious_line(line: &str, spellings: &[&'static str]) -> bool {
    // Avoid false positives in comments/docstrings.
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") {
        return false;
    }

    // Patterns we consider "stringly vocab checks":
    // - `... == "Spelling"`
    // - `"Spelling" => ...`
    // - `.starts_with("Spelling")` / `.strip_prefix("Spelling")` / `.ends_with("Spelling")`
    for s in spellings {
        let patterns = [
            format!("== \"{s}\""),
            format!("\"{s}\" =>"),
            format!("starts_with(\"{s}\")"),
            format!("strip_prefix(\"{s}\")"),
            format!("ends_with(\"{s}\")"),
        ];
        if patterns.iter().any(|p| line.contains(p.as_str())) {
            return true;
        }
    }

    false
}

#[test]
fn suspicious_line_detection() {
    let spellings = vocabulary_spellings();
    assert!(is_suspicious_line(r#"if name.starts_with("get") {"#, &spellings));
    assert!(is_suspicious_line(r#"    "METHOD" => true,"#, &spellings));
    assert!(!is_suspicious_line(r#"// name.starts_with("get")"#, &spellings));
    assert!(!is_suspicious_line("if naming::is_getter_name(name) {", &spellings));
}
