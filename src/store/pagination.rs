//! List pagination
//!
//! Clamping rules and key-ordered slicing. The backing map is unordered, so
//! keys are sorted before every slice to keep pages stable between calls.

use std::collections::{BTreeMap, HashMap};

/// A resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Entries per page, in `1..=max`
    pub limit: usize,

    /// 1-based page number
    pub page: usize,

    /// Index of the first entry of the page in key order
    pub offset: usize,
}

impl PageWindow {
    /// Resolve a raw request against a maximum page size
    ///
    /// - `limit <= 0` or `limit > max` → `max`
    /// - `page < 1` → `1`
    /// - `offset = (page - 1) * limit`, saturating
    pub fn clamp(limit: i64, page: i64, max: usize) -> Self {
        let limit = match usize::try_from(limit) {
            Ok(l) if l >= 1 && l <= max => l,
            _ => max,
        };
        let page = if page < 1 {
            1
        } else {
            usize::try_from(page).unwrap_or(usize::MAX)
        };
        let offset = (page - 1).saturating_mul(limit);

        Self {
            limit,
            page,
            offset,
        }
    }

    /// Cut this window out of `entries`, ordered by key
    ///
    /// A window past the end yields a short or empty page.
    pub fn slice<V: Clone>(&self, entries: &HashMap<String, V>) -> BTreeMap<String, V> {
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort_unstable();

        keys.into_iter()
            .skip(self.offset)
            .take(self.limit)
            .map(|key| (key.clone(), entries[key].clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(keys: &[&str]) -> HashMap<String, u32> {
        keys.iter()
            .enumerate()
            .map(|(i, k)| (k.to_string(), i as u32))
            .collect()
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(PageWindow::clamp(0, 1, 20).limit, 20);
        assert_eq!(PageWindow::clamp(-5, 1, 20).limit, 20);
        assert_eq!(PageWindow::clamp(21, 1, 20).limit, 20);
        assert_eq!(PageWindow::clamp(20, 1, 20).limit, 20);
        assert_eq!(PageWindow::clamp(1, 1, 20).limit, 1);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(PageWindow::clamp(5, 0, 20).page, 1);
        assert_eq!(PageWindow::clamp(5, -3, 20).page, 1);
        assert_eq!(PageWindow::clamp(5, 3, 20).page, 3);
        assert_eq!(PageWindow::clamp(5, 3, 20).offset, 10);
    }

    #[test]
    fn test_huge_page_saturates() {
        let window = PageWindow::clamp(20, i64::MAX, 20);
        assert!(window.offset >= usize::MAX / 2);
        assert!(window.slice(&entries(&["a"])).is_empty());
    }

    #[test]
    fn test_slice_is_key_ordered() {
        let data = entries(&["item3", "item1", "item2"]);

        let first = PageWindow::clamp(2, 1, 20).slice(&data);
        assert_eq!(first.keys().collect::<Vec<_>>(), ["item1", "item2"]);

        let second = PageWindow::clamp(2, 2, 20).slice(&data);
        assert_eq!(second.keys().collect::<Vec<_>>(), ["item3"]);

        let third = PageWindow::clamp(2, 3, 20).slice(&data);
        assert!(third.is_empty());
    }

    #[test]
    fn test_slice_lexicographic_not_numeric() {
        let data = entries(&["item10", "item2", "item1"]);
        let page = PageWindow::clamp(0, 1, 20).slice(&data);
        assert_eq!(page.keys().collect::<Vec<_>>(), ["item1", "item10", "item2"]);
    }
}
