//! crates/newsroom_core/src/archive.rs
//!
//! Rules over a collection of persisted issues, shared by every issue store so
//! the id and timestamp guarantees hold no matter where issues are kept.

use crate::domain::{GeneratedContent, PublicationType};
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

pub fn new_issue_id() -> String {
    format!("issue-{}", Uuid::new_v4().simple())
}

/// Saves `content` into `issues` and returns the stored record.
///
/// A known id updates that record in place and keeps its original `published_at`.
/// A missing or unknown id creates a new record with a fresh id stamped at `now`.
pub fn save_into(
    issues: &mut Vec<GeneratedContent>,
    mut content: GeneratedContent,
    now: DateTime<Utc>,
) -> GeneratedContent {
    let existing = content
        .id
        .as_deref()
        .and_then(|id| issues.iter().position(|issue| issue.id.as_deref() == Some(id)));

    match existing {
        Some(index) => {
            content.published_at = issues[index].published_at.or(Some(now));
            issues[index] = content.clone();
        }
        None => {
            // Lenient on purpose: a stale id from an earlier session becomes a new issue.
            if let Some(stale) = content.id.as_deref() {
                warn!(id = stale, "Saving issue with unknown id as a new issue");
            }
            content.id = Some(new_issue_id());
            content.published_at = Some(now);
            issues.push(content.clone());
        }
    }
    content
}

/// The most recently published issue, optionally for one publication.
///
/// Undated issues lose to any dated one; ties go to the earliest in storage order.
pub fn latest(
    issues: &[GeneratedContent],
    publication: Option<PublicationType>,
) -> Option<GeneratedContent> {
    issues
        .iter()
        .filter(|issue| publication.map_or(true, |p| issue.publication_type == p))
        .fold(None::<&GeneratedContent>, |best, issue| match best {
            Some(best) if issue.published_at <= best.published_at => Some(best),
            _ => Some(issue),
        })
        .cloned()
}

/// Issues of one publication, newest first.
pub fn for_publication(
    issues: Vec<GeneratedContent>,
    publication: PublicationType,
) -> Vec<GeneratedContent> {
    let mut filtered: Vec<_> = issues
        .into_iter()
        .filter(|issue| issue.publication_type == publication)
        .collect();
    // `None` orders below every timestamp, which puts undated issues last.
    filtered.sort_by_key(|issue| std::cmp::Reverse(issue.published_at));
    filtered
}
