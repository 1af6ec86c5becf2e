//! Round-robin API key rotation shared across concurrent requests.

use std::sync::{Mutex, PoisonError};

/// A fixed set of API keys handed out in rotation.
#[derive(Debug)]
pub struct KeyRing {
    keys: Vec<String>,
    cursor: Mutex<usize>,
}

impl KeyRing {
    /// Keep the non-blank keys, trimmed.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            keys,
            cursor: Mutex::new(0),
        }
    }

    /// Parse a comma-separated list, as found in `GEMINI_API_KEY`.
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The next key and its position, advancing the cursor.
    pub fn next_key(&self) -> Option<(usize, &str)> {
        if self.keys.is_empty() {
            return None;
        }
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        let index = *cursor % self.keys.len();
        *cursor = (index + 1) % self.keys.len();
        Some((index, self.keys[index].as_str()))
    }
}

/// First few characters of a key, for logs.
pub fn preview(key: &str) -> String {
    let head: String = key.chars().take(6).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn blank_keys_are_dropped() {
        let ring = KeyRing::from_list(" a1 , ,b2,");
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.next_key(), Some((0, "a1")));
    }

    #[test]
    fn rotation_wraps() {
        let ring = KeyRing::new(["k0", "k1", "k2"]);
        let order: Vec<usize> = (0..5).filter_map(|_| ring.next_key().map(|(i, _)| i)).collect();
        assert_eq!(order, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn empty_ring_has_no_key() {
        assert!(KeyRing::from_list("").next_key().is_none());
    }

    #[test]
    fn concurrent_callers_share_one_cursor() {
        let ring = Arc::new(KeyRing::new(["a", "b"]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ring = Arc::clone(&ring);
                std::thread::spawn(move || ring.next_key().map(|(i, _)| i))
            })
            .collect();
        let picks: Vec<usize> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(picks.iter().filter(|i| **i == 0).count(), 4);
        assert_eq!(picks.iter().filter(|i| **i == 1).count(), 4);
    }

    #[test]
    fn preview_hides_the_key() {
        assert_eq!(preview("AIzaSyExampleKey"), "AIzaSy...");
    }
}
