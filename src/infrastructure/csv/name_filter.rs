// ============================================================
// NAME FILTER
// ============================================================
// Clean-up pass over activity names exported from the schedule tool

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^()]+?)\)").unwrap());
static PARENTHESIZED_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((BH\d+)\);").unwrap());
static TAG_SEMICOLON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(BH\d+);").unwrap());
static PARENTHESES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()]").unwrap());
static SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\\/]").unwrap());
static AVAILABLE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"disponível").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Normalize an activity name.
///
/// Steps, in order:
/// 1. `;` inside parentheses becomes a space
/// 2. `(BH129);` becomes `BH129`
/// 3. `BH128;` becomes `BH128 `
/// 4. parentheses are removed
/// 5. `/` and `\` are removed
/// 6. the word `disponível` is removed
/// 7. whitespace runs collapse and the result is trimmed
pub fn clean_name(name: &str) -> String {
    let text = PARENTHESIZED.replace_all(name, |caps: &Captures| {
        format!("({})", caps[1].replace(';', " "))
    });
    let text = PARENTHESIZED_TAG.replace_all(&text, "${1}");
    let text = TAG_SEMICOLON.replace_all(&text, "${1} ");
    let text = PARENTHESES.replace_all(&text, "");
    let text = SLASHES.replace_all(&text, "");
    let text = AVAILABLE_WORD.replace_all(&text, "");
    let text = WHITESPACE_RUN.replace_all(&text, " ");

    text.trim().to_string()
}
