//! Button name -> numeric key code lookup.
//!
//! The dictionary itself sits behind [`KeyTable`] so a project can bring its
//! own layout; [`Resolver`] wraps any table with the fallback spellings the
//! script language accepts (`A` as well as `KEY_A`).

use std::collections::HashMap;

/// Source of key codes. `None` means the name is unknown; `Some(0)` is a
/// perfectly valid code.
pub trait KeyTable {
    fn code(&self, name: &str) -> Option<u8>;

    /// Every `(name, code)` pair, sorted by code then name.
    fn entries(&self) -> Vec<(String, u8)>;
}

/// The controller's built-in buttons.
///
/// Codes 0 and 15..=18 are taken by the report's frame counter and stick
/// axes, so they never resolve as buttons.
pub struct KeyDict;

impl KeyDict {
    pub const KEYS: &'static [(&'static str, u8)] = &[
        ("KEY_A", 1),
        ("KEY_B", 2),
        ("KEY_X", 3),
        ("KEY_Y", 4),
        ("KEY_L", 5),
        ("KEY_R", 6),
        ("KEY_ZL", 7),
        ("KEY_ZR", 8),
        ("KEY_PLUS", 9),
        ("KEY_MINUS", 10),
        ("KEY_DLEFT", 11),
        ("KEY_DUP", 12),
        ("KEY_DRIGHT", 13),
        ("KEY_DDOWN", 14),
        ("KEY_HOME", 19),
    ];
}

impl KeyTable for KeyDict {
    fn code(&self, name: &str) -> Option<u8> {
        Self::KEYS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, code)| *code)
    }

    fn entries(&self) -> Vec<(String, u8)> {
        Self::KEYS
            .iter()
            .map(|(name, code)| (name.to_string(), *code))
            .collect()
    }
}

impl KeyTable for HashMap<String, u8> {
    fn code(&self, name: &str) -> Option<u8> {
        self.get(name).copied()
    }

    fn entries(&self) -> Vec<(String, u8)> {
        let mut entries: Vec<_> = self.iter().map(|(n, c)| (n.clone(), *c)).collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

/// One way of turning a script token into a key-table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The token as written.
    Literal,
    /// The token with a fixed prefix, e.g. `A` -> `KEY_A`.
    Prefixed(String),
}

impl Lookup {
    fn apply<K: KeyTable + ?Sized>(&self, keys: &K, token: &str) -> Option<u8> {
        match self {
            Lookup::Literal => keys.code(token),
            Lookup::Prefixed(prefix) => keys.code(&format!("{prefix}{token}")),
        }
    }
}

/// Tries each [`Lookup`] in order, first hit wins.
pub struct Resolver<'k, K: KeyTable + ?Sized> {
    keys: &'k K,
    strategies: Vec<Lookup>,
}

impl<'k, K: KeyTable + ?Sized> Resolver<'k, K> {
    /// Literal name first, then `KEY_` + name.
    pub fn new(keys: &'k K) -> Self {
        Self::with_strategies(keys, vec![Lookup::Literal, Lookup::Prefixed("KEY_".into())])
    }

    pub fn with_strategies(keys: &'k K, strategies: Vec<Lookup>) -> Self {
        Self { keys, strategies }
    }

    pub fn resolve(&self, token: &str) -> Option<u8> {
        self.strategies
            .iter()
            .find_map(|lookup| lookup.apply(self.keys, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_default_table() {
        let resolver = Resolver::new(&KeyDict);
        let test_cases = vec![
            ("A", Some(1)),
            ("KEY_A", Some(1)),
            ("ZR", Some(8)),
            ("KEY_HOME", Some(19)),
            ("HOME", Some(19)),
            ("DDOWN", Some(14)),
            ("FRAME", None),
            ("LX", None),
            ("NOTAKEY", None),
            ("", None),
        ];

        for (token, expected) in test_cases {
            assert_eq!(resolver.resolve(token), expected, "token: {token:?}");
        }
    }

    #[test]
    fn test_code_zero_is_a_hit() {
        let mut keys = HashMap::new();
        keys.insert("KEY_CAPTURE".to_string(), 0u8);
        keys.insert("TURBO".to_string(), 20u8);

        let resolver = Resolver::new(&keys);
        assert_eq!(resolver.resolve("CAPTURE"), Some(0));
        assert_eq!(resolver.resolve("TURBO"), Some(20));
        assert_eq!(resolver.resolve("A"), None);
    }

    #[test]
    fn test_literal_wins_over_prefix() {
        let mut keys = HashMap::new();
        keys.insert("A".to_string(), 7u8);
        keys.insert("KEY_A".to_string(), 1u8);

        assert_eq!(Resolver::new(&keys).resolve("A"), Some(7));

        let prefixed_only = Resolver::with_strategies(&keys, vec![Lookup::Prefixed("KEY_".into())]);
        assert_eq!(prefixed_only.resolve("A"), Some(1));
    }

    #[test]
    fn test_entries_sorted_by_code() {
        let entries = KeyDict.entries();
        assert_eq!(entries.len(), KeyDict::KEYS.len());
        assert!(entries.windows(2).all(|w| w[0].1 < w[1].1));

        let mut keys = HashMap::new();
        keys.insert("B".to_string(), 2u8);
        keys.insert("A".to_string(), 2u8);
        keys.insert("Z".to_string(), 0u8);
        assert_eq!(
            keys.entries(),
            vec![("Z".into(), 0), ("A".into(), 2), ("B".into(), 2)]
        );
    }
}
