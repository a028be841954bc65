//! Purpose: Derive safe file-name stems from widget and action names.
//! Exports: `normalize`.
//! Invariants: Output only contains `[a-z0-9_]`; the function is idempotent.
//! Invariants: Runs of whitespace or hyphens collapse to a single underscore.
//! Invariants: Word characters are ASCII only; non-ASCII letters and digits are dropped.

pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator_run = false;
    for ch in name.chars() {
        if ch.is_whitespace() || ch == '-' {
            if !in_separator_run {
                out.push('_');
                in_separator_run = true;
            }
            continue;
        }
        in_separator_run = false;
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch.to_ascii_lowercase());
        }
    }
    out
}
