//! Punctuation and control character stripping

/// Characters always replaced by a space
pub const STRIP_CHARS: [char; 17] = [
    '@', '#', '!', '$', ',', '.', ';', '(', ')', '[', ']', '{', '}', '"', '\'', '\r', '\n',
];

/// Replaces strip-set characters with single spaces.
///
/// Everything else, including tabs and repeated spaces, is left as is. The
/// output never contains a strip-set character, so normalizing twice is the
/// same as normalizing once.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    extra: Vec<char>,
}

impl TextNormalizer {
    /// Normalizer with the built-in strip set only
    pub fn new() -> Self {
        Self { extra: Vec::new() }
    }

    /// Normalizer that also strips every character of `extra`
    pub fn with_extra_chars(extra: &str) -> Self {
        let mut chars: Vec<char> = extra
            .chars()
            .filter(|c| !STRIP_CHARS.contains(c) && *c != ' ')
            .collect();
        chars.sort_unstable();
        chars.dedup();
        Self { extra: chars }
    }

    /// Whether `c` is replaced
    pub fn strips(&self, c: char) -> bool {
        STRIP_CHARS.contains(&c) || self.extra.binary_search(&c).is_ok()
    }

    /// Replace each stripped character with one space
    pub fn normalize(&self, raw: &str) -> String {
        raw.chars()
            .map(|c| if self.strips(c) { ' ' } else { c })
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
