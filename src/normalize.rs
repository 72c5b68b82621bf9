//! Name normalization for fuzzy comparison.

/// Canonical comparison key for a display name.
///
/// Lower-cases the input and drops everything that is not an ASCII letter
/// or digit. Nothing is transliterated: `"T'au Empire"` becomes
/// `"tauempire"`, `"Émpire"` becomes `"mpire"`.
pub fn normalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
