//! The score application rule.
//!
//! An answer is correct iff the chosen index is a valid choice and equals the
//! question's correct index. Correct answers add the scene bonus, everything
//! else subtracts the scene penalty. Out-of-range indices are wrong answers,
//! not errors.

use heartline_content::domain::scene::{Question, RewardParams};
use heartline_score::ScoreTracker;
use serde::Serialize;

/// Result of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub chosen: usize,
    pub correct: bool,
    /// Signed score change: `+bonus` when correct, `-penalty` otherwise.
    pub delta: i32,
}

/// Feedback shown to the player after an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub text: Option<String>,
    pub delta: i32,
    /// Score after the change was applied.
    pub score: i32,
}

/// Grades `chosen` against `question`.
#[must_use]
pub fn grade_answer(question: &Question, rewards: &RewardParams, chosen: usize) -> AnswerOutcome {
    let correct = question.is_correct(chosen);
    let delta = if correct {
        to_delta(rewards.correct_bonus)
    } else {
        -to_delta(rewards.wrong_penalty)
    };
    AnswerOutcome {
        chosen,
        correct,
        delta,
    }
}

/// Applies a graded answer to the score: exactly one `add` or `subtract`.
pub fn apply_answer(score: &mut ScoreTracker, outcome: &AnswerOutcome) {
    if outcome.correct {
        score.add(outcome.delta);
    } else {
        score.subtract(-outcome.delta);
    }
}

fn to_delta(amount: u32) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartline_core::config::ScoreConfig;
    use heartline_score::ScoreEvent;

    fn question() -> Question {
        Question::new(
            "Pick one",
            vec!["A".to_owned(), "B".to_owned(), "C".to_owned()],
            1,
        )
    }

    fn rewards() -> RewardParams {
        RewardParams {
            correct_bonus: 10,
            wrong_penalty: 5,
        }
    }

    #[test]
    fn test_correct_index_adds_bonus() {
        // Arrange
        let mut score = ScoreTracker::new(ScoreConfig::default());
        let mut rx = score.subscribe();

        // Act
        let outcome = grade_answer(&question(), &rewards(), 1);
        apply_answer(&mut score, &outcome);

        // Assert
        assert!(outcome.correct);
        assert_eq!(outcome.delta, 10);
        assert_eq!(score.current(), 60);
        assert_eq!(rx.try_recv().unwrap(), ScoreEvent::Changed { old: 50, new: 60 });
    }

    #[test]
    fn test_wrong_index_subtracts_penalty() {
        let mut score = ScoreTracker::new(ScoreConfig::default());

        let outcome = grade_answer(&question(), &rewards(), 0);
        apply_answer(&mut score, &outcome);

        assert!(!outcome.correct);
        assert_eq!(outcome.delta, -5);
        assert_eq!(score.current(), 45);
    }

    #[test]
    fn test_out_of_range_index_is_wrong_not_an_error() {
        let mut score = ScoreTracker::new(ScoreConfig::default());

        let outcome = grade_answer(&question(), &rewards(), 5);
        apply_answer(&mut score, &outcome);

        assert!(!outcome.correct);
        assert_eq!(score.current(), 45);
    }

    #[test]
    fn test_malformed_correct_index_is_always_wrong() {
        let broken = Question::new("Broken", vec!["A".to_owned(), "B".to_owned()], 2);

        for chosen in 0..4 {
            assert!(!grade_answer(&broken, &rewards(), chosen).correct);
        }
    }

    #[test]
    fn test_zero_rewards_leave_score_untouched() {
        let mut score = ScoreTracker::new(ScoreConfig::default());
        let mut rx = score.subscribe();

        let outcome = grade_answer(&question(), &RewardParams::default(), 0);
        apply_answer(&mut score, &outcome);

        assert_eq!(score.current(), 50);
        assert!(rx.try_recv().is_err());
    }
}
