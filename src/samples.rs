use include_dir::{include_dir, Dir};
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use thiserror::Error;

static SAMPLES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/samples");

const EMBEDDED_POOL: &str = "cyber.json";

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sample pool {0} is not embedded in the binary")]
    Missing(String),
    #[error("sample pool {0} is not valid utf-8")]
    Encoding(String),
    #[error("unable to deserialize sample pool: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("sample pool {0} has no texts")]
    Empty(String),
}

/// Fixed set of passages a session draws its sample text from
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SamplePool {
    pub name: String,
    pub texts: Vec<String>,
}

impl SamplePool {
    /// Load the pool compiled into the binary
    pub fn embedded() -> Result<Self, SampleError> {
        let file = SAMPLES_DIR
            .get_file(EMBEDDED_POOL)
            .ok_or_else(|| SampleError::Missing(EMBEDDED_POOL.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| SampleError::Encoding(EMBEDDED_POOL.to_string()))?;

        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self, SampleError> {
        let pool: SamplePool = serde_json::from_str(json)?;
        if pool.texts.is_empty() {
            return Err(SampleError::Empty(pool.name));
        }
        Ok(pool)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Pick one text uniformly at random.
    ///
    /// Pools are never empty once loaded, so this only falls back to an
    /// empty string for a hand-built empty pool.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.texts.choose(rng).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_embedded_pool_has_five_texts() {
        let pool = SamplePool::embedded().unwrap();

        assert_eq!(pool.name, "cyber");
        assert_eq!(pool.len(), 5);
        assert!(pool.texts.iter().all(|t| !t.trim().is_empty()));
    }

    #[test]
    fn test_choose_returns_member_of_pool() {
        let pool = SamplePool::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let text = pool.choose(&mut rng);
            assert!(pool.texts.contains(&text));
        }
    }

    #[test]
    fn test_choose_covers_whole_pool() {
        let pool = SamplePool::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let seen: HashSet<String> = (0..500).map(|_| pool.choose(&mut rng)).collect();

        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn test_choose_is_deterministic_for_seed() {
        let pool = SamplePool::embedded().unwrap();
        let mut a = StdRng::seed_from_u64(1234);
        let mut b = StdRng::seed_from_u64(1234);

        for _ in 0..10 {
            assert_eq!(pool.choose(&mut a), pool.choose(&mut b));
        }
    }

    #[test]
    fn test_from_json_rejects_empty_pool() {
        let result = SamplePool::from_json(r#"{"name": "nothing", "texts": []}"#);

        assert_matches!(result, Err(SampleError::Empty(name)) if name == "nothing");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert_matches!(SamplePool::from_json("not json"), Err(SampleError::Parse(_)));
    }

    #[test]
    fn test_choose_on_empty_pool_yields_empty_text() {
        let pool = SamplePool {
            name: "empty".into(),
            texts: vec![],
        };
        let mut rng = StdRng::seed_from_u64(0);

        assert!(pool.is_empty());
        assert_eq!(pool.choose(&mut rng), "");
    }
}
