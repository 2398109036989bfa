//! Task-to-step inference.
//!
//! Maps free-text task descriptions to workflow steps so completed tasks
//! can auto-advance the state machine.

use regex::Regex;
use std::sync::LazyLock;

use super::steps::MAX_STEP;

/// Ordered keyword table scanned in declaration order: when several
/// keywords match the same text, the earlier-declared one wins.
const TASK_STEP_KEYWORDS: &[(&str, u8)] = &[
    ("problem", 0),
    ("discovery", 1),
    ("spec", 2),
    ("plan", 3),
    ("critique", 4),
    ("rules", 5),
    ("select", 6),
    ("context", 7),
    ("implement", 8),
    ("test", 9),
    ("verify", 9),
    ("green", 10),
    ("debug", 11),
    ("review", 12),
    ("human", 12),
    ("second", 13),
    ("commit", 14),
    ("loop", 15),
    ("merge", 15),
];

static STEP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"step\s*(\d+)").expect("valid step pattern"));

/// Infer a workflow step from a free-text task description.
///
/// Case-insensitive keyword scan first, then a structured `step <n>`
/// pattern. `None` means "unknown" and callers must not advance on it.
pub fn infer_step(description: &str) -> Option<u8> {
    let lower = description.to_lowercase();

    for (keyword, step) in TASK_STEP_KEYWORDS {
        if lower.contains(keyword) {
            return Some(*step);
        }
    }

    STEP_PATTERN
        .captures(&lower)
        .and_then(|caps| caps[1].parse::<u8>().ok())
        .filter(|step| *step <= MAX_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_matches_map_to_steps() {
        assert_eq!(infer_step("Write spec.md for login"), Some(2));
        assert_eq!(infer_step("Implement the parser"), Some(8));
        assert_eq!(infer_step("Human review of changes"), Some(12));
        assert_eq!(infer_step("MERGE the branch"), Some(15));
    }

    #[test]
    fn structured_step_pattern_is_a_fallback() {
        assert_eq!(infer_step("step 4"), Some(4));
        assert_eq!(infer_step("Step11"), Some(11));
    }

    #[test]
    fn keyword_beats_step_pattern() {
        // "debug" matches before the "step 11" pattern is even consulted.
        assert_eq!(infer_step("Step 11 debugging"), Some(11));
        // "test" (9) wins over the literal step number.
        assert_eq!(infer_step("step 3 testing"), Some(9));
    }

    #[test]
    fn declaration_order_breaks_keyword_ties() {
        // Both "spec" (2) and "plan" (3) match; "spec" is declared first.
        assert_eq!(infer_step("plan the spec"), Some(2));
        // "test" (9) is declared before "green" (10).
        assert_eq!(infer_step("green tests"), Some(9));
    }

    #[test]
    fn unknown_text_yields_no_step() {
        assert_eq!(infer_step("random unrelated text"), None);
        assert_eq!(infer_step(""), None);
    }

    #[test]
    fn out_of_range_step_numbers_are_unknown() {
        assert_eq!(infer_step("step 42"), None);
        assert_eq!(infer_step("step 999999"), None);
    }
}
