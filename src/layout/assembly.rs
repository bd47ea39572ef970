//! Joining per-answer lines into one annotated stream

use serde::Serialize;

/// A wrapped line tagged with the answer it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineWithMetadata {
    pub text: String,
    /// First line of its answer
    pub is_answer_start: bool,
    /// Last line of its answer
    pub is_answer_end: bool,
    pub answer_number: u32,
    /// Inserted between answers; blank lines inside an answer are not spacers
    pub is_spacer: bool,
}

impl LineWithMetadata {
    /// Blank spacer line following answer `answer_number`
    pub fn spacer(answer_number: u32) -> Self {
        Self {
            text: String::new(),
            is_answer_start: false,
            is_answer_end: false,
            answer_number,
            is_spacer: true,
        }
    }
}

/// Concatenate wrapped answers in input order, inserting `spacing` blank
/// lines between consecutive answers (never after the last one)
pub fn assemble_lines<I>(answers: I, spacing: usize) -> Vec<LineWithMetadata>
where
    I: IntoIterator<Item = (u32, Vec<String>)>,
{
    let mut assembled = Vec::new();
    let mut previous: Option<u32> = None;

    for (answer_number, lines) in answers {
        if let Some(prev) = previous {
            assembled.extend(std::iter::repeat_with(|| LineWithMetadata::spacer(prev)).take(spacing));
        }

        let last = lines.len().saturating_sub(1);
        assembled.extend(lines.into_iter().enumerate().map(|(idx, text)| LineWithMetadata {
            text,
            is_answer_start: idx == 0,
            is_answer_end: idx == last,
            answer_number,
            is_spacer: false,
        }));

        previous = Some(answer_number);
    }

    assembled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_single_line_answer_is_start_and_end() {
        let assembled = assemble_lines(vec![(1, lines(&["only"]))], 1);
        assert_eq!(assembled.len(), 1);
        assert!(assembled[0].is_answer_start);
        assert!(assembled[0].is_answer_end);
        assert_eq!(assembled[0].answer_number, 1);
    }

    #[test]
    fn test_spacing_between_answers_only() {
        let assembled = assemble_lines(
            vec![
                (1, lines(&["a1", "a2"])),
                (2, lines(&["b1"])),
                (5, lines(&["c1", "c2", "c3"])),
            ],
            2,
        );

        let texts: Vec<_> = assembled.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["a1", "a2", "", "", "b1", "", "", "c1", "c2", "c3"]);

        // Spacers carry the preceding answer's number
        assert_eq!(assembled[2].answer_number, 1);
        assert!(assembled[2].is_spacer);
        assert_eq!(assembled[5].answer_number, 2);

        assert!(assembled[0].is_answer_start && !assembled[0].is_answer_end);
        assert!(!assembled[1].is_answer_start && assembled[1].is_answer_end);
        assert!(assembled[7].is_answer_start);
        assert!(!assembled[8].is_answer_start && !assembled[8].is_answer_end);
        assert!(assembled[9].is_answer_end);
        assert_eq!(assembled[9].answer_number, 5);
    }

    #[test]
    fn test_blank_line_inside_answer_is_not_spacer() {
        let assembled = assemble_lines(vec![(1, lines(&["a", "", "b"])), (2, lines(&["c"]))], 1);

        let blank = &assembled[1];
        assert_eq!(blank.text, "");
        assert!(!blank.is_answer_start && !blank.is_answer_end);
        assert!(!blank.is_spacer);

        let spacers: Vec<_> = assembled.iter().map(|l| l.is_spacer).collect();
        assert_eq!(spacers, [false, false, false, true, false]);
    }

    #[test]
    fn test_zero_spacing() {
        let assembled = assemble_lines(vec![(1, lines(&["a"])), (2, lines(&["b"]))], 0);
        assert_eq!(assembled.len(), 2);
    }

    #[test]
    fn test_no_answers() {
        assert!(assemble_lines(Vec::new(), 3).is_empty());
    }
}
