//! LaTeX-to-Unicode text normalization
//!
//! Feed text arrives with LaTeX escapes in author names and titles. Two
//! independent passes clean it up: accent substitution against a fixed
//! table, and style-command stripping that removes wrapping formatting
//! tokens while keeping the wrapped text. Both passes are idempotent, so
//! re-normalizing stored text changes nothing.

/// LaTeX escape sequences mapped to precomposed Unicode characters.
///
/// Both braced and bare spellings are listed; the longest sequence that
/// prefixes the input wins.
const ACCENTS: &[(&str, &str)] = &[
    (r"\'{a}", "á"),
    (r"\'{e}", "é"),
    (r"\'{i}", "í"),
    (r"\'{o}", "ó"),
    (r"\'{u}", "ú"),
    (r"\'{c}", "ć"),
    (r"\'{n}", "ń"),
    (r"\'{s}", "ś"),
    (r"\'{y}", "ý"),
    (r"\'{z}", "ź"),
    (r"\'a", "á"),
    (r"\'e", "é"),
    (r"\'i", "í"),
    (r"\'o", "ó"),
    (r"\'u", "ú"),
    (r"\'c", "ć"),
    (r"\'n", "ń"),
    (r"\'s", "ś"),
    (r"\'y", "ý"),
    (r"\'z", "ź"),
    (r"\'A", "Á"),
    (r"\'E", "É"),
    (r"\'O", "Ó"),
    (r"\`{a}", "à"),
    (r"\`{e}", "è"),
    (r"\`{i}", "ì"),
    (r"\`{o}", "ò"),
    (r"\`{u}", "ù"),
    (r"\`a", "à"),
    (r"\`e", "è"),
    (r"\`i", "ì"),
    (r"\`o", "ò"),
    (r"\`u", "ù"),
    (r#"\"{a}"#, "ä"),
    (r#"\"{e}"#, "ë"),
    (r#"\"{i}"#, "ï"),
    (r#"\"{o}"#, "ö"),
    (r#"\"{u}"#, "ü"),
    (r#"\"a"#, "ä"),
    (r#"\"e"#, "ë"),
    (r#"\"i"#, "ï"),
    (r#"\"o"#, "ö"),
    (r#"\"u"#, "ü"),
    (r#"\"O"#, "Ö"),
    (r#"\"U"#, "Ü"),
    (r"\^{a}", "â"),
    (r"\^{e}", "ê"),
    (r"\^{i}", "î"),
    (r"\^{o}", "ô"),
    (r"\^{u}", "û"),
    (r"\^a", "â"),
    (r"\^e", "ê"),
    (r"\^i", "î"),
    (r"\^o", "ô"),
    (r"\^u", "û"),
    (r"\~{a}", "ã"),
    (r"\~{n}", "ñ"),
    (r"\~{o}", "õ"),
    (r"\~a", "ã"),
    (r"\~n", "ñ"),
    (r"\~o", "õ"),
    (r"\c{c}", "ç"),
    (r"\c{C}", "Ç"),
    (r"\v{c}", "č"),
    (r"\v{s}", "š"),
    (r"\v{z}", "ž"),
    (r"\v{C}", "Č"),
    (r"\v{S}", "Š"),
    (r"\v{Z}", "Ž"),
    (r"\u{g}", "ğ"),
    (r"\H{o}", "ő"),
    (r"\H{u}", "ű"),
    (r"\k{a}", "ą"),
    (r"\k{e}", "ę"),
    (r"\aa", "å"),
    (r"\AA", "Å"),
    (r"\ae", "æ"),
    (r"\ss", "ß"),
    (r"\o", "ø"),
    (r"\O", "Ø"),
    (r"\l", "ł"),
    (r"\L", "Ł"),
];

/// Formatting commands whose wrapper is stripped while the wrapped text
/// is preserved
const STYLE_COMMANDS: &[&str] = &[
    "textbf", "textit", "texttt", "textsc", "textrm", "textsf", "emph", "underline", "mathbf",
    "mathrm", "mathit",
];

/// Run both normalization passes
pub fn normalize(text: &str) -> String {
    strip_style_commands(&replace_accents(text))
}

/// Substitute LaTeX accent escapes with precomposed Unicode characters.
///
/// Greedy left-to-right: at each backslash the longest table entry that
/// prefixes the remainder is replaced; an unrecognized escape is copied
/// through untouched. Output contains no table sequences, so a second
/// pass is a no-op.
pub fn replace_accents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let mut matched: Option<(usize, &str)> = None;
        for (seq, replacement) in ACCENTS {
            if rest.starts_with(seq) && matched.is_none_or(|(len, _)| seq.len() > len) {
                matched = Some((seq.len(), replacement));
            }
        }

        match matched {
            Some((len, replacement)) => {
                out.push_str(replacement);
                rest = &rest[len..];
            }
            None => {
                out.push('\\');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Strip style-command wrappers, keeping the enclosed text.
///
/// Each `}` is paired with the nearest preceding open command; plain
/// braces pass through untouched. Pathological nesting of plain groups
/// inside a style command can pair a brace early, which matches the
/// historical behavior of this cleanup.
pub fn strip_style_commands(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut open_commands = 0usize;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if rest.starts_with('\\')
            && let Some(token_len) = match_style_command(rest)
        {
            open_commands += 1;
            i += token_len;
            continue;
        }

        // Safe: i is always on a char boundary
        let ch = rest.chars().next().unwrap_or_default();
        if ch == '}' && open_commands > 0 {
            open_commands -= 1;
        } else {
            out.push(ch);
        }
        i += ch.len_utf8();
    }

    out
}

/// Length of a `\command{` token at the start of `rest`, if any
fn match_style_command(rest: &str) -> Option<usize> {
    for cmd in STYLE_COMMANDS {
        let token_len = 1 + cmd.len() + 1;
        if rest.len() >= token_len
            && rest[1..].starts_with(cmd)
            && rest.as_bytes()[1 + cmd.len()] == b'{'
        {
            return Some(token_len);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_substitution() {
        assert_eq!(replace_accents(r"R\'enyi"), "Rényi");
        assert_eq!(replace_accents(r#"Schr\"odinger"#), "Schrödinger");
        assert_eq!(replace_accents(r#"G\"{o}del"#), "Gödel");
        assert_eq!(replace_accents(r"Fran\c{c}ois"), "François");
        assert_eq!(replace_accents(r"\L{}ukasiewicz"), "Ł{}ukasiewicz");
    }

    #[test]
    fn test_unknown_escape_passes_through() {
        assert_eq!(replace_accents(r"\alpha decay"), r"\alpha decay");
    }

    #[test]
    fn test_accent_pass_is_idempotent() {
        let once = replace_accents(r#"M\"uller and R\'enyi"#);
        assert_eq!(replace_accents(&once), once);
    }

    #[test]
    fn test_style_stripping() {
        assert_eq!(strip_style_commands(r"\textbf{Bold} claims"), "Bold claims");
        assert_eq!(strip_style_commands(r"an \emph{important} word"), "an important word");
    }

    #[test]
    fn test_nested_style_commands() {
        assert_eq!(
            strip_style_commands(r"\textbf{\textit{both}}"),
            "both"
        );
    }

    #[test]
    fn test_plain_braces_preserved() {
        assert_eq!(strip_style_commands("set {a, b}"), "set {a, b}");
        assert_eq!(strip_style_commands("stray } brace"), "stray } brace");
    }

    #[test]
    fn test_style_pass_is_idempotent() {
        let once = strip_style_commands(r"\textbf{Bold} and {plain}");
        assert_eq!(strip_style_commands(&once), once);
    }

    #[test]
    fn test_normalize_combined() {
        assert_eq!(
            normalize(r"\textit{R\'enyi} entropies"),
            "Rényi entropies"
        );
    }
}
