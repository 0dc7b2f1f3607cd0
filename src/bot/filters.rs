//! Predicates that exclude listed posts from processing. Each returns `true`
//! when the post should be skipped.

use crate::models::{SkipReason, Submission};
use crate::stores::StoreRegistry;

pub fn is_self(post: &Submission) -> bool {
    post.is_self
}

/// The link points at a host with no registered extractor, or does not parse.
pub fn is_unsupported(post: &Submission, registry: &StoreRegistry) -> bool {
    match post.host() {
        Some(host) => !registry.supports(&host),
        None => true,
    }
}

/// Created strictly before `cutoff` (seconds since the epoch).
pub fn is_old(post: &Submission, cutoff: i64) -> bool {
    post.created_timestamp() < cutoff
}

/// The bot already left a top-level comment on the post.
pub fn was_analyzed<S: AsRef<str>>(authors: &[S], username: &str) -> bool {
    authors.iter().map(AsRef::as_ref).any(|author| {
        author != "[deleted]" && author.eq_ignore_ascii_case(username)
    })
}

/// Runs the request-free filters in order and returns the first that matches.
pub fn precheck(post: &Submission, registry: &StoreRegistry, cutoff: i64) -> Option<SkipReason> {
    if is_self(post) {
        Some(SkipReason::SelfPost)
    } else if is_unsupported(post, registry) {
        Some(SkipReason::Unsupported)
    } else if is_old(post, cutoff) {
        Some(SkipReason::Old)
    } else {
        None
    }
}
