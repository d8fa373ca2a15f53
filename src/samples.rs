use rand::seq::SliceRandom;

/// Example sentences offered when the caller has no text of their own
pub const SAMPLE_TEXTS: &[&str] = &[
    "Hello, how are you today?",
    "Welcome to our professional translation service.",
    "Thank you for using our application.",
    "Good morning, have a wonderful day!",
    "The weather is beautiful today.",
    "Technology makes communication easier.",
    "Learning new languages opens doors.",
];

pub fn random_sample() -> &'static str {
    SAMPLE_TEXTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(SAMPLE_TEXTS[0])
}
