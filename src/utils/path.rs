use unicode_normalization::UnicodeNormalization;

/// Reduce a client-supplied filename to a safe basename.
///
/// The name is NFKD-normalized first so accented letters keep their ASCII
/// base letter. Remaining non-ASCII characters are dropped, path separators
/// turn into whitespace, runs of whitespace collapse into a single `_`, and
/// anything outside
/// `[A-Za-z0-9_.-]` is removed. Leading and trailing `.`/`_` are stripped so
/// the result can never be `..` or a hidden file. May return an empty string.
pub fn secure_filename(raw: &str) -> String {
    let ascii: String = raw
        .nfkd()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// User names become a directory under the face store, so they must be a
/// single, non-special path component.
pub fn is_valid_user_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
}
