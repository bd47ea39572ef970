//! Input model: answers, font descriptors and page styles

mod style;

pub use style::{FontDescriptor, PageStyle, UnknownPageStyle};

use serde::{Deserialize, Serialize};

/// One question's answer text, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Declared question number (1-based, unique within one layout call)
    pub question_number: u32,
    pub content: String,
    /// Advisory only; layout never reads it
    #[serde(default)]
    pub word_count: usize,
}

impl Answer {
    /// Create an answer, counting whitespace-delimited words
    pub fn new(question_number: u32, content: impl Into<String>) -> Self {
        let content = content.into();
        let word_count = count_words(&content);
        Self {
            question_number,
            content,
            word_count,
        }
    }

    /// Lightweight fingerprint used in layout cache keys
    pub(crate) fn fingerprint(&self) -> (u32, usize) {
        (self.question_number, self.content.len())
    }
}

/// Count whitespace-delimited words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_counts_words() {
        let answer = Answer::new(1, "The quick  brown\nfox");
        assert_eq!(answer.question_number, 1);
        assert_eq!(answer.word_count, 4);
    }

    #[test]
    fn test_empty_answer() {
        let answer = Answer::new(3, "");
        assert_eq!(answer.word_count, 0);
        assert_eq!(answer.fingerprint(), (3, 0));
    }

    #[test]
    fn test_answer_from_json() {
        let answer: Answer =
            serde_json::from_str(r#"{"questionNumber": 2, "content": "hi there"}"#).unwrap();
        assert_eq!(answer.question_number, 2);
        assert_eq!(answer.content, "hi there");
        assert_eq!(answer.word_count, 0);
    }
}
