/// Derived scores for one (sample, typed, elapsed) triple.
///
/// Always produced by [`Metrics::compute`]; nothing patches these fields
/// incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub wpm: u32,
    pub accuracy: u32,
    pub error_count: usize,
    pub correct_count: usize,
}

impl Metrics {
    pub fn compute(sample: &str, typed: &str, elapsed_secs: u32) -> Self {
        let typed_len = typed.chars().count();
        let error_count = count_errors(sample, typed);
        let correct_count = typed_len - error_count;

        Self {
            wpm: words_per_minute(word_count(typed), elapsed_secs),
            accuracy: accuracy(correct_count, typed_len),
            error_count,
            correct_count,
        }
    }
}

/// Characters of `typed` that differ from `sample` at the same position.
/// Anything typed past the end of the sample is a mismatch.
pub fn count_errors(sample: &str, typed: &str) -> usize {
    let mut expected = sample.chars();
    typed
        .chars()
        .filter(|&c| expected.next() != Some(c))
        .count()
}

pub fn word_count(typed: &str) -> usize {
    typed.split_whitespace().count()
}

pub fn accuracy(correct: usize, typed_len: usize) -> u32 {
    if typed_len == 0 {
        return 0;
    }
    let pct = (100.0 * correct as f64 / typed_len as f64).round();
    pct.clamp(0.0, 100.0) as u32
}

/// Raw whitespace tokens per elapsed minute, no 5-chars-per-word normalization.
pub fn words_per_minute(words: usize, elapsed_secs: u32) -> u32 {
    if elapsed_secs == 0 {
        return 0;
    }
    let minutes = elapsed_secs as f64 / 60.0;
    (words as f64 / minutes).floor() as u32
}
