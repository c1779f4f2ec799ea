use std::collections::HashSet;

/// Identifiers fetched when no roster is configured.
pub const DEFAULT_ROSTER: [&str; 8] = [
    "marcelobnbck",
    "xmacedo",
    "andeerlb",
    "karane",
    "lee22br",
    "vfurinii",
    "joaoguilhermedesa",
    "icarocaetano",
];

/// Ordered list of identifiers to process.
///
/// Identifiers compare case-insensitively: `Lee22br` and `lee22br` are the same
/// profile, so only the first spelling is kept. The kept spelling is what ends
/// up in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    identifiers: Vec<String>,
}

impl Roster {
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for identifier in identifiers {
            let identifier = identifier.as_ref().trim();
            if identifier.is_empty() {
                continue;
            }
            if seen.insert(Self::key(identifier)) {
                kept.push(identifier.to_string());
            } else {
                tracing::warn!(
                    "⚠️ Duplicate roster identifier '{}' (case-insensitive), skipping",
                    identifier
                );
            }
        }

        Self { identifiers: kept }
    }

    /// 內部比對用的正規化 key
    pub fn key(identifier: &str) -> String {
        identifier.trim().to_ascii_lowercase()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        let key = Self::key(identifier);
        self.identifiers.iter().any(|i| Self::key(i) == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.identifiers
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_ROSTER)
    }
}
