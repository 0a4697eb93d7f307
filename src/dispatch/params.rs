//! Per-request parameter bag.

use std::collections::HashMap;

const DEFAULT_PER_PAGE: usize = 25;

/// Case-insensitive string parameters for one request.
///
/// Later inserts override earlier ones, which is how the three sources
/// (query/body, path, auth token) are layered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    values: HashMap<String, String>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.values.insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Insert every pair in order, later pairs winning.
    pub fn merge<K, V, I>(&mut self, pairs: I)
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    /// Non-blank value for `key`.
    pub fn present(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Numeric identifier for `key`, if present and parseable.
    pub fn id(&self, key: &str) -> Option<u64> {
        self.present(key)?.trim().parse().ok()
    }

    /// Integer value for `key`.
    pub fn int(&self, key: &str) -> Option<i64> {
        self.present(key)?.trim().parse().ok()
    }

    /// 1-based page number.
    pub fn page(&self) -> usize {
        match self.int("page") {
            Some(page) if page > 0 => page as usize,
            _ => 1,
        }
    }

    pub fn per_page(&self) -> usize {
        match self.int("per_page") {
            Some(per_page) if per_page > 0 => per_page as usize,
            _ => DEFAULT_PER_PAGE,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.merge(iter);
        params
    }
}
