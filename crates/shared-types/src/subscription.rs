//! # Subscriptions
//!
//! A subscription pairs a callback [`Endpoint`] with the
//! [`EventSubscriptionFilter`] deciding which events reach it. Registration
//! arrives as an [`EventSubscription`], which mirrors the ARM resource body.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::errors::{EndpointError, SubscriptionPayloadError};

/// Included event type that matches every event type.
pub const ALL_EVENT_TYPES: &str = "all";

// =============================================================================
// ENDPOINT
// =============================================================================

/// Callback URI that matching events are POSTed to.
///
/// The endpoint string is the registry key. Two endpoints are the same
/// subscription only if their strings are identical: no URI normalization
/// is applied, so `http://a` and `http://a/` (or a differently cased host)
/// register as two separate subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    /// Validate and wrap a callback URI.
    ///
    /// The string must parse as an absolute URI with an `http` or `https`
    /// scheme. It is stored as given (trimmed), not normalized.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, EndpointError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EndpointError::Empty);
        }

        let parsed = url::Url::parse(trimmed).map_err(|e| EndpointError::Malformed {
            endpoint: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(Self(trimmed.to_string())),
            other => Err(EndpointError::UnsupportedScheme {
                endpoint: trimmed.to_string(),
                scheme: other.to_string(),
            }),
        }
    }

    /// The endpoint as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Endpoint::parse(raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// FILTER
// =============================================================================

/// Declarative criteria deciding whether an event reaches a subscription.
///
/// `included_event_types` distinguishes `None` (field absent) from
/// `Some(vec![])` (present but empty); both reject every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubscriptionFilter {
    /// Event types to deliver, compared case-insensitively. `"all"` matches any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_event_types: Option<Vec<String>>,

    /// Subject prefix bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_begins_with: Option<String>,

    /// Subject suffix bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_ends_with: Option<String>,

    /// Compare subject bounds exactly instead of case-folded.
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_subject_case_sensitive: bool,
}

impl EventSubscriptionFilter {
    /// Filter that accepts every typed event with a subject.
    pub fn all() -> Self {
        Self::for_types([ALL_EVENT_TYPES])
    }

    /// Filter restricted to the given event types.
    pub fn for_types<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            included_event_types: Some(types.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Set the subject prefix bound.
    #[must_use]
    pub fn with_subject_begins_with(mut self, prefix: impl Into<String>) -> Self {
        self.subject_begins_with = Some(prefix.into());
        self
    }

    /// Set the subject suffix bound.
    #[must_use]
    pub fn with_subject_ends_with(mut self, suffix: impl Into<String>) -> Self {
        self.subject_ends_with = Some(suffix.into());
        self
    }

    /// Set subject case sensitivity.
    #[must_use]
    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.is_subject_case_sensitive = sensitive;
        self
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// A registered endpoint with its filter, as held by a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub endpoint: Endpoint,
    pub filter: EventSubscriptionFilter,
}

// =============================================================================
// REGISTRATION PAYLOAD
// =============================================================================

/// Registration body, shaped like the ARM `eventSubscriptions` resource.
///
/// ```json
/// {
///   "name": "orders",
///   "properties": {
///     "destination": {
///       "endpointType": "WebHook",
///       "properties": { "endpointUrl": "https://example.com/hook" }
///     },
///     "filter": { "includedEventTypes": ["Created"] }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubscription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: EventSubscriptionProperties,
}

/// `properties` block of an [`EventSubscription`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubscriptionProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<EventSubscriptionDestination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<EventSubscriptionFilter>,
}

/// Where matching events are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSubscriptionDestination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<WebHookDestinationProperties>,
}

/// WebHook destination settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebHookDestinationProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

impl EventSubscription {
    /// Build a WebHook registration for `endpoint_url`.
    pub fn webhook(endpoint_url: impl Into<String>, filter: Option<EventSubscriptionFilter>) -> Self {
        Self {
            name: None,
            properties: EventSubscriptionProperties {
                destination: Some(EventSubscriptionDestination {
                    endpoint_type: Some("WebHook".to_string()),
                    properties: Some(WebHookDestinationProperties {
                        endpoint_url: Some(endpoint_url.into()),
                    }),
                }),
                filter,
            },
        }
    }

    /// The validated callback endpoint.
    pub fn endpoint(&self) -> Result<Endpoint, SubscriptionPayloadError> {
        let destination = self
            .properties
            .destination
            .as_ref()
            .ok_or(SubscriptionPayloadError::MissingDestination)?;

        let url = destination
            .properties
            .as_ref()
            .and_then(|p| p.endpoint_url.as_deref())
            .ok_or(SubscriptionPayloadError::MissingEndpointUrl)?;

        Ok(Endpoint::parse(url)?)
    }

    /// The supplied filter, or the catch-all filter when none was given.
    pub fn filter_or_default(&self) -> EventSubscriptionFilter {
        self.properties
            .filter
            .clone()
            .unwrap_or_else(EventSubscriptionFilter::all)
    }

    /// Split into the `(endpoint, filter)` pair a registry stores.
    pub fn into_parts(self) -> Result<(Endpoint, EventSubscriptionFilter), SubscriptionPayloadError> {
        let endpoint = self.endpoint()?;
        let filter = self.filter_or_default();
        Ok((endpoint, filter))
    }
}
