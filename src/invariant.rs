//! Consistency checks run after every scenario.
//!
//! The store is cumulative across scenarios and runs, so reads may contain
//! many messages this scenario did not post. Checks only look for what was
//! posted and never require an exact match.

use std::collections::HashMap;

use crate::error::InvariantViolation;
use crate::message::Message;

/// Check that the count grew by exactly `posted`.
///
/// # Errors
///
/// [`InvariantViolation::CountMismatch`] if `final_count` is not
/// `initial + posted`, including when that sum does not fit in an `i64`.
pub fn check_count_delta(
    initial: i64,
    final_count: i64,
    posted: usize,
) -> Result<(), InvariantViolation> {
    let expected = i64::try_from(posted)
        .ok()
        .and_then(|posted| initial.checked_add(posted));
    if expected == Some(final_count) {
        Ok(())
    } else {
        Err(InvariantViolation::CountMismatch {
            initial,
            posted,
            actual: final_count,
        })
    }
}

/// Check that every posted text occurs in `messages`.
///
/// A text posted `n` times in the scenario must occur at least `n` times.
/// Texts are reported in the order they were first posted.
///
/// # Errors
///
/// [`InvariantViolation::MissingText`] for the first text with too few
/// occurrences.
pub fn check_texts_present(
    posted: &[String],
    messages: &[Message],
) -> Result<(), InvariantViolation> {
    let mut wanted: Vec<(&str, usize)> = Vec::new();
    for text in posted {
        match wanted.iter_mut().find(|(t, _)| *t == text.as_str()) {
            Some((_, n)) => *n += 1,
            None => wanted.push((text.as_str(), 1)),
        }
    }

    let mut found: HashMap<&str, usize> = HashMap::with_capacity(wanted.len());
    for message in messages {
        if wanted.iter().any(|(t, _)| *t == message.text) {
            *found.entry(message.text.as_str()).or_insert(0) += 1;
        }
    }

    for (text, expected) in wanted {
        let seen = found.get(text).copied().unwrap_or(0);
        if seen < expected {
            return Err(InvariantViolation::MissingText {
                text: text.to_string(),
                expected,
                found: seen,
            });
        }
    }
    Ok(())
}
