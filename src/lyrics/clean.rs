//! Lyric text normalisation
//!
//! Raw text pulled out of the lyrics container carries section headers and
//! performance notes:
//! [Verse 1]
//! I been up all night (up all night)
//!
//! [Chorus]
//!
//! which become:
//! I been up all night

use once_cell::sync::Lazy;
use regex::Regex;

/// `[...]` or `(...)`, shortest match, never crossing a line break.
static ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\(\[].*?[\)\]]").expect("annotation pattern is valid")
});

static SPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" {2,}").expect("space pattern is valid"));

/// Strip annotations, drop lines left blank, remove stray carriage returns and
/// collapse runs of spaces. Surviving lines are joined with `\n`.
pub fn clean_lyrics(raw: &str) -> String {
    let stripped = ANNOTATION.replace_all(raw, "");
    let stripped = stripped.replace('\r', "");

    let mut out = String::with_capacity(stripped.len());
    for line in stripped.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
    }

    SPACE_RUN.replace_all(&out, " ").into_owned()
}
