//! Domain-specific signal extraction over free-text task logs.
//!
//! Each domain has one heuristic that pulls the single most diagnostically
//! useful excerpt out of a run's log, or nothing when the log is too short
//! and uninformative. Extractors are tolerant of missing markers: they
//! return `None`, never panic.

use crate::domain::models::{DomainProfile, SignalKind};

/// Logs shorter than this with no keyword hit yield no signal rather than
/// a low-value fragment.
pub const MIN_LOG_LEN: usize = 80;

/// Max lines captured from a stack-trace block.
const TRACEBACK_LINES: usize = 8;

/// Extract the most useful excerpt from a task log for the given domain.
pub fn extract_signal(task_log: &str, profile: &DomainProfile) -> Option<String> {
    match profile.signal {
        SignalKind::Engineering => engineering_signal(task_log),
        SignalKind::Crm => first_line_containing(
            task_log,
            &[
                "bounce",
                "delivery failure",
                "undeliverable",
                "converted",
                "closed-won",
                "closed won",
            ],
        ),
        SignalKind::Scheduling => first_line_containing(
            task_log,
            &["conflict", "double-book", "double book", "overlapping booking"],
        ),
        SignalKind::Finance => first_line_containing(
            task_log,
            &["mismatch", "discrepanc", "off by", "unreconciled", "amount delta"],
        ),
        SignalKind::Support => first_line_containing(task_log, &["escalat"]),
        SignalKind::Generic => generic_signal(task_log),
    }
}

/// Stack-trace block if present, else the first error/exception line.
fn engineering_signal(log: &str) -> Option<String> {
    if let Some(block) = traceback_block(log) {
        return Some(block);
    }
    first_line_containing(log, &["error", "exception"])
}

/// Best-effort extractor for unknown domains: an error line when present,
/// otherwise the opening line of a log long enough to carry substance.
fn generic_signal(log: &str) -> Option<String> {
    if let Some(line) = first_line_containing(log, &["error", "fail"]) {
        return Some(line);
    }
    if log.trim().len() < MIN_LOG_LEN {
        return None;
    }
    log.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(ToString::to_string)
}

/// Capture a "Traceback" marker line plus the lines that follow it, capped.
fn traceback_block(log: &str) -> Option<String> {
    let lines: Vec<&str> = log.lines().collect();
    let start = lines.iter().position(|line| line.contains("Traceback"))?;
    let end = (start + TRACEBACK_LINES).min(lines.len());
    Some(lines[start..end].join("\n"))
}

/// First line containing any keyword, case-insensitive, trimmed.
fn first_line_containing(log: &str, keywords: &[&str]) -> Option<String> {
    log.lines().find_map(|line| {
        let lower = line.to_lowercase();
        keywords
            .iter()
            .any(|kw| lower.contains(kw))
            .then(|| line.trim().to_string())
    })
}
