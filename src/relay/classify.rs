use regex::Regex;
use std::sync::OnceLock;

pub const INCORRECT_PHRASE: &str = "That's not the right answer";
pub const RATE_LIMIT_PHRASE: &str = "You gave an answer too recently";
pub const CORRECT_PHRASE: &str = "That's the right answer";
pub const ALREADY_COMPLETED_PHRASE: &str = "Did you already complete it?";
pub const DEFAULT_WAIT: &str = "30s";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Correct,
    Incorrect,
    AlreadyCompleted,
    RateLimited { wait: String },
    Unknown { raw: String },
}

impl SubmissionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Correct => "correct",
            SubmissionOutcome::Incorrect => "incorrect",
            SubmissionOutcome::AlreadyCompleted => "already-completed",
            SubmissionOutcome::RateLimited { .. } => "rate-limited",
            SubmissionOutcome::Unknown { .. } => "unknown",
        }
    }
}

fn wait_regex() -> &'static Regex {
    static WAIT_RE: OnceLock<Regex> = OnceLock::new();
    WAIT_RE.get_or_init(|| Regex::new(r"(?:\d+m\s*)?\d+s\b").expect("valid regex"))
}

/// First `<m>m <s>s` or `<s>s` in `text`, if any.
pub fn extract_wait(text: &str) -> Option<String> {
    wait_regex()
        .find(text)
        .map(|m| m.as_str().trim().to_string())
}

/// Map a submission response body to its outcome. Rules are checked in a
/// fixed order and the first hit wins: the rate-limit page can quote other
/// phrases, so it must be recognised before the success phrase.
pub fn classify(response: &str) -> SubmissionOutcome {
    if response.contains(INCORRECT_PHRASE) {
        return SubmissionOutcome::Incorrect;
    }
    if let Some(idx) = response.find(RATE_LIMIT_PHRASE) {
        let rest = &response[idx + RATE_LIMIT_PHRASE.len()..];
        let wait = extract_wait(rest).unwrap_or_else(|| DEFAULT_WAIT.to_string());
        return SubmissionOutcome::RateLimited { wait };
    }
    if response.contains(CORRECT_PHRASE) {
        return SubmissionOutcome::Correct;
    }
    if response.contains(ALREADY_COMPLETED_PHRASE) {
        return SubmissionOutcome::AlreadyCompleted;
    }
    SubmissionOutcome::Unknown {
        raw: response.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_known_phrase_maps_to_its_outcome() {
        assert_eq!(
            classify("<p>That's not the right answer; your answer is too low.</p>"),
            SubmissionOutcome::Incorrect
        );
        assert_eq!(
            classify("<p>That's the right answer! You are one gold star closer.</p>"),
            SubmissionOutcome::Correct
        );
        assert_eq!(
            classify("<p>You don't seem to be solving the right level.  Did you already complete it?</p>"),
            SubmissionOutcome::AlreadyCompleted
        );
        assert_eq!(
            classify("<p>You gave an answer too recently; you have to wait after submitting an answer before trying again.  You have 1m 30s left to wait.</p>"),
            SubmissionOutcome::RateLimited {
                wait: "1m 30s".into()
            }
        );
    }

    #[test]
    fn unrelated_text_is_unknown_verbatim() {
        let body = "<html>Maintenance</html>";
        assert_eq!(
            classify(body),
            SubmissionOutcome::Unknown { raw: body.into() }
        );
    }

    #[test]
    fn rate_limit_wins_over_right_answer() {
        let body = "You gave an answer too recently. That's the right answer format. You have 45s left to wait.";
        assert_eq!(
            classify(body),
            SubmissionOutcome::RateLimited { wait: "45s".into() }
        );
    }

    #[test]
    fn wait_without_space_keeps_minutes() {
        assert_eq!(extract_wait("You have 1m30s left to wait."), Some("1m30s".into()));
        assert_eq!(
            classify("You gave an answer too recently. You have 1m30s left to wait."),
            SubmissionOutcome::RateLimited {
                wait: "1m30s".into()
            }
        );
        assert_eq!(
            crate::relay::cooldown::parse_wait("1m30s"),
            chrono::Duration::seconds(90)
        );
    }

    #[test]
    fn rate_limit_without_duration_defaults() {
        assert_eq!(
            classify("You gave an answer too recently; please wait."),
            SubmissionOutcome::RateLimited { wait: "30s".into() }
        );
    }

    #[test]
    fn wait_before_the_phrase_is_ignored() {
        let body = "<style>a{transition:2s}</style> You gave an answer too recently. You have 5m 2s left to wait.";
        assert_eq!(
            classify(body),
            SubmissionOutcome::RateLimited {
                wait: "5m 2s".into()
            }
        );
    }
}
