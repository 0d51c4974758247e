//! Cache Key Module
//!
//! Deterministic SHA-256 cache keys for prompts and request parameters.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::CacheResult;

// == Key Generator ==
/// Builds hex-encoded SHA-256 cache keys with an optional prefix.
#[derive(Debug, Clone, Default)]
pub struct CacheKeyGenerator {
    prefix: String,
}

impl CacheKeyGenerator {
    /// Creates a generator; an empty prefix produces bare hashes.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    // == Generate Key ==
    /// Hashes `prompt` together with the JSON form of `params`.
    ///
    /// Object keys are sorted before hashing, so maps with the same contents
    /// produce the same key regardless of their iteration order.
    ///
    /// # Errors
    /// `KeyEncoding` when `params` cannot be represented as JSON.
    pub fn generate_key<P>(&self, prompt: &str, params: &P) -> CacheResult<String>
    where
        P: Serialize + ?Sized,
    {
        let canonical = serde_json::to_string(&serde_json::to_value(params)?)?;

        let mut hasher = Sha256::new();
        hasher.update(prompt.as_bytes());
        hasher.update(b"|");
        hasher.update(canonical.as_bytes());

        Ok(self.with_prefix(hex::encode(hasher.finalize())))
    }

    /// Hashes every part, each followed by a `|` separator.
    pub fn generate_key_simple(&self, parts: &[&str]) -> String {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.as_bytes());
            hasher.update(b"|");
        }
        self.with_prefix(hex::encode(hasher.finalize()))
    }

    fn with_prefix(&self, hash: String) -> String {
        if self.prefix.is_empty() {
            hash
        } else {
            format!("{}:{}", self.prefix, hash)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_key_is_hex_sha256() {
        let generator = CacheKeyGenerator::default();
        let key = generator.generate_key_simple(&[]);

        // SHA-256 of the empty input
        assert_eq!(
            key,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_simple_key_separates_parts() {
        let generator = CacheKeyGenerator::default();
        assert_ne!(
            generator.generate_key_simple(&["ab", "c"]),
            generator.generate_key_simple(&["a", "bc"])
        );
    }

    #[test]
    fn test_prefix() {
        let generator = CacheKeyGenerator::new("llm");
        let key = generator.generate_key_simple(&["prompt"]);

        let (prefix, hash) = key.split_once(':').unwrap();
        assert_eq!(prefix, "llm");
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_key_is_stable_across_map_order() {
        let generator = CacheKeyGenerator::new("llm");

        let mut a = HashMap::new();
        a.insert("temperature", json!(0.2));
        a.insert("model", json!("small"));
        a.insert("max_tokens", json!(256));

        let mut b = HashMap::new();
        b.insert("max_tokens", json!(256));
        b.insert("model", json!("small"));
        b.insert("temperature", json!(0.2));

        assert_eq!(
            generator.generate_key("hello", &a).unwrap(),
            generator.generate_key("hello", &b).unwrap()
        );
    }

    #[test]
    fn test_key_depends_on_prompt_and_params() {
        let generator = CacheKeyGenerator::default();
        let params = json!({ "model": "small" });

        let base = generator.generate_key("hello", &params).unwrap();
        assert_ne!(base, generator.generate_key("hello!", &params).unwrap());
        assert_ne!(
            base,
            generator
                .generate_key("hello", &json!({ "model": "large" }))
                .unwrap()
        );
    }

    #[test]
    fn test_unencodable_params() {
        let generator = CacheKeyGenerator::default();
        let mut params = HashMap::new();
        params.insert(vec![1u8], "byte keys are not JSON object keys");

        assert!(generator.generate_key("hello", &params).is_err());
    }
}
