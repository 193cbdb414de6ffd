//! Filter matching.
//!
//! Decides whether an [`Event`] should advance past an
//! [`EventSubscriptionFilter`]. Evaluation order, short-circuiting on the
//! first `false`:
//!
//! 1. **Type check**: the event must carry an `eventType`, the filter must list
//!    at least one included type, and one listed type must equal the event
//!    type or `"all"`, ignoring case.
//! 2. **Subject check**: the event must carry a `subject`. With no subject
//!    bounds the check passes. Otherwise the subject passes if it starts with
//!    the begins-with bound OR ends with the ends-with bound. Unless the
//!    filter is case sensitive, both sides are upper-cased before comparing.
//!
//! A bound that is not configured never satisfies its half of the OR.

use std::borrow::Cow;

use shared_types::{Event, EventSubscriptionFilter, ALL_EVENT_TYPES};

/// Whether `event` should be delivered to a subscription with `filter`.
pub fn matches(event: &Event, filter: &EventSubscriptionFilter) -> bool {
    includes_type(event, filter) && matches_subject(event, filter)
}

/// Type half of [`matches`].
pub fn includes_type(event: &Event, filter: &EventSubscriptionFilter) -> bool {
    let Some(event_type) = event.event_type.as_deref() else {
        return false;
    };
    let Some(included) = filter.included_event_types.as_deref() else {
        return false;
    };

    included
        .iter()
        .any(|t| equal_fold(t, event_type) || equal_fold(t, ALL_EVENT_TYPES))
}

/// Subject half of [`matches`].
pub fn matches_subject(event: &Event, filter: &EventSubscriptionFilter) -> bool {
    let Some(subject) = event.subject.as_deref() else {
        return false;
    };

    if filter.subject_begins_with.is_none() && filter.subject_ends_with.is_none() {
        return true;
    }

    let case_sensitive = filter.is_subject_case_sensitive;
    let subject = normalize(subject, case_sensitive);

    let matches_prefix = filter
        .subject_begins_with
        .as_deref()
        .is_some_and(|prefix| subject.starts_with(normalize(prefix, case_sensitive).as_ref()));
    let matches_suffix = filter
        .subject_ends_with
        .as_deref()
        .is_some_and(|suffix| subject.ends_with(normalize(suffix, case_sensitive).as_ref()));

    matches_prefix || matches_suffix
}

fn normalize(s: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.to_uppercase())
    }
}

/// Unicode case-insensitive equality without allocating.
fn equal_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
