use std::fmt;

const POSITIVE_WORDS: [&str; 3] = ["strong", "high", "new"];
const NEGATIVE_WORDS: [&str; 3] = ["weak", "low", "down"];

/// Headline tag from fixed keyword matching. Not a statistical classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// Case-sensitive substring match. Positive keywords win over negative ones.
pub fn classify(text: &str) -> Sentiment {
    if POSITIVE_WORDS.iter().any(|w| text.contains(w)) {
        Sentiment::Positive
    } else if NEGATIVE_WORDS.iter().any(|w| text.contains(w)) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
