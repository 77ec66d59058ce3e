/// Letter grade for a finished (or in-progress) test
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

/// (min wpm, min accuracy, grade), checked top-down
const THRESHOLDS: [(u32, u32, Grade); 4] = [
    (80, 95, Grade::S),
    (70, 90, Grade::A),
    (60, 85, Grade::B),
    (50, 80, Grade::C),
];

impl Grade {
    pub fn from_scores(wpm: u32, accuracy: u32) -> Self {
        THRESHOLDS
            .iter()
            .find(|&&(min_wpm, min_acc, _)| wpm >= min_wpm && accuracy >= min_acc)
            .map(|&(_, _, grade)| grade)
            .unwrap_or(Grade::D)
    }
}
