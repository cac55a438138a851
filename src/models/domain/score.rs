use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoreSummary {
    pub correct: usize,
    pub total: usize,
    pub percentage: Option<u32>, // None when there is nothing to score
}

impl ScoreSummary {
    pub fn new(correct: usize, total: usize) -> Self {
        let correct = correct.min(total);
        ScoreSummary {
            correct,
            total,
            percentage: rounded_percentage(correct, total),
        }
    }
}

/// `round(100 * correct / total)` with halves rounded up.
fn rounded_percentage(correct: usize, total: usize) -> Option<u32> {
    if total == 0 {
        return None;
    }
    Some(((200 * correct + total) / (2 * total)) as u32)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Excellent,
    Great,
    Good,
    KeepPracticing,
}

impl Feedback {
    pub fn for_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Feedback::Excellent,
            70..=89 => Feedback::Great,
            50..=69 => Feedback::Good,
            _ => Feedback::KeepPracticing,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Feedback::Excellent => "Excellent! You're a programming master!",
            Feedback::Great => "Great job! You have a solid understanding of the concepts.",
            Feedback::Good => {
                "Good effort! You're on the right track, but there's room for improvement."
            }
            Feedback::KeepPracticing => "Keep practicing! Review the concepts and try again.",
        }
    }
}

/// Renders a duration as `"{minutes}m {seconds}s"`.
pub fn format_time_spent(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

pub fn seconds_per_question(elapsed_seconds: u64, total: usize) -> u64 {
    if total == 0 {
        return 0;
    }
    let total = total as u64;
    (2 * elapsed_seconds + total) / (2 * total)
}
