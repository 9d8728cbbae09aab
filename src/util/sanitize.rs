use regex::Regex;
use std::sync::LazyLock;

// CSI sequences (ESC[ ... cmd); covers the common styling/movement codes.
static ANSI_CSI: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]").ok());

const MAX_DISPLAY_CHARS: usize = 200;

/// Strip escape sequences and control chars from text the API hands us,
/// fold line breaks into spaces and cap the length for a single menu row.
pub fn sanitize_for_terminal(s: &str) -> String {
    let no_ansi = match ANSI_CSI.as_ref() {
        Some(r) => r.replace_all(s, "").into_owned(),
        None => s.to_string(),
    };

    let collapsed = no_ansi.replace(['\n', '\r', '\t'], " ");
    let cleaned: String = collapsed
        .chars()
        .filter(|&ch| ch >= ' ' && ch != '\x7f')
        .collect();

    cleaned.trim().chars().take(MAX_DISPLAY_CHARS).collect()
}
