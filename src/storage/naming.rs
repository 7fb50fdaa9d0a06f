//! Stored-name generation and validation
//!
//! Every stored photo is named `<unix-millis>-<original-name>`. The millisecond
//! component comes from a monotonic clock so two names handed out by the same
//! process never share a timestamp, even when uploads land in the same millisecond.

use crate::types::{AppError, AppResult};
use std::sync::atomic::{AtomicI64, Ordering};

/// Builds a stored name from a timestamp and an already validated original name.
pub fn stored_name(millis: i64, original_name: &str) -> String {
    format!("{}-{}", millis, original_name)
}

/// Hands out strictly increasing millisecond timestamps.
#[derive(Debug, Default)]
pub struct NameGenerator {
    last_millis: AtomicI64,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a stored name for an upload accepted right now.
    ///
    /// Call once per upload. `original_name` is reduced to its final path
    /// component and rejected if nothing usable remains.
    pub fn generate(&self, original_name: &str) -> AppResult<String> {
        let original = sanitize_original_name(original_name)?;
        Ok(stored_name(self.next_millis(), &original))
    }

    fn next_millis(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut last = self.last_millis.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self.last_millis.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }
}

/// Strip directory components from a client supplied filename.
pub fn sanitize_original_name(original_name: &str) -> AppResult<String> {
    let base = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or("")
        .trim();

    if base.is_empty() || base == "." || base == ".." || base.chars().any(char::is_control) {
        return Err(AppError::InvalidName(original_name.to_string()));
    }

    Ok(base.to_string())
}

/// Check that `name` addresses a file directly under the store root.
pub fn validate_stored_name(name: &str) -> AppResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.chars().any(char::is_control);

    if invalid {
        return Err(AppError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_name_format() {
        assert_eq!(stored_name(1700000000123, "cat.png"), "1700000000123-cat.png");
    }

    #[test]
    fn test_generate_prefixes_current_millis() {
        let before = chrono::Utc::now().timestamp_millis();
        let name = NameGenerator::new().generate("cat.png").unwrap();
        let (millis, rest) = name.split_once('-').unwrap();

        assert_eq!(rest, "cat.png");
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert!(millis.parse::<i64>().unwrap() >= before);
    }

    #[test]
    fn test_generate_is_strictly_increasing() {
        let generator = NameGenerator::new();
        let stamps: Vec<i64> = (0..1000)
            .map(|_| {
                let name = generator.generate("same.png").unwrap();
                name.split_once('-').unwrap().0.parse().unwrap()
            })
            .collect();

        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_original_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_original_name("C:\\photos\\cat.png").unwrap(), "cat.png");
        assert_eq!(sanitize_original_name("holiday pic.jpg").unwrap(), "holiday pic.jpg");
    }

    #[test]
    fn test_sanitize_rejects_unusable_names() {
        for bad in ["", "   ", ".", "..", "dir/", "a/..", "bad\0name.png"] {
            assert!(
                matches!(sanitize_original_name(bad), Err(AppError::InvalidName(_))),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_validate_stored_name() {
        assert!(validate_stored_name("1700000000123-cat.png").is_ok());
        assert!(validate_stored_name("1700000000123-v1..2.png").is_ok());
        for bad in ["", ".", "..", "../secret", "a/b.png", "a\\b.png", "..\\x"] {
            assert!(validate_stored_name(bad).is_err(), "{:?} should be invalid", bad);
        }
    }
}
