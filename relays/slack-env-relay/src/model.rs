//! Partner API records.
//!
//! The partner API is loosely shaped, so every field is optional and accessors own
//! the fallback text shown in Slack.

use crate::config::Region;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Number, Value};
use std::fmt;

pub const UNKNOWN_NAME: &str = "Unknown Name";
pub const UNKNOWN_ID: &str = "Unknown ID";
pub const UNNAMED_DEPLOYMENT: &str = "Unnamed Deployment";

/// Deployment state that gets the primary button style. Compared exactly.
pub const PRIMARY_STATE: &str = "Primary";

/// Identifier as the API sent it. Numbers stay numbers when echoed back in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(Number),
    Text(String),
}

impl Id {
    fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Id {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

/// Accepts strings and numbers; anything else reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<Id>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(Id::Text(s)),
        Value::Number(n) => Some(Id::Number(n)),
        _ => None,
    })
}

/// Decodes each entry on its own; an entry that isn't a record becomes the default
/// record. Anything other than an array reads as no list.
fn lenient_list<T: DeserializeOwned + Default>(value: Value) -> Option<Vec<T>> {
    let Value::Array(entries) = value else {
        return None;
    };

    Some(
        entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value(entry).unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "unreadable list entry, using defaults");
                    T::default()
                })
            })
            .collect(),
    )
}

fn lenient_items<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient_list(Value::deserialize(deserializer)?))
}

/// Outer `Some` once the key is present, even when its value is `null`.
fn present_lenient_items<'de, D, T>(deserializer: D) -> Result<Option<Option<Vec<T>>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(Some(lenient_list(Value::deserialize(deserializer)?)))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Response of the environment search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct EnvironmentPage {
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Option<Vec<Environment>>,
}

/// One environment as returned by a region's search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Environment {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<Id>,

    /// Some API versions capitalise the field.
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub title_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// Everything else the API sent, kept untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Environment {
    pub fn display_name(&self) -> &str {
        non_empty(&self.title_name)
            .or_else(|| non_empty(&self.name))
            .unwrap_or(UNKNOWN_NAME)
    }

    /// The API id, or `"Unknown ID"` when it is missing or empty.
    pub fn id_or_unknown(&self) -> Id {
        self.id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Id::from(UNKNOWN_ID))
    }

    pub fn display_id(&self) -> String {
        self.id_or_unknown().to_string()
    }
}

/// An environment tagged with everything needed to query its region again.
#[derive(Debug, Clone)]
pub struct TaggedEnvironment {
    pub environment: Environment,
    pub region: String,
    pub base_url: String,
    pub headers: HeaderMap,
}

impl TaggedEnvironment {
    pub fn new(environment: Environment, region: &Region, headers: &HeaderMap) -> Self {
        Self {
            environment,
            region: region.label.clone(),
            base_url: region.base_url.clone(),
            headers: headers.clone(),
        }
    }
}

/// Response of the deployments endpoint.
///
/// `None` when the key is absent, `Some(None)` when it is `null`.
#[derive(Debug, Default, Deserialize)]
pub struct DeploymentsPage {
    #[serde(
        rename = "detailedDeploymentsFormatted",
        default,
        deserialize_with = "present_lenient_items"
    )]
    pub deployments: Option<Option<Vec<Deployment>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Deployment {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<Id>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
}

impl Deployment {
    pub fn display_name(&self) -> &str {
        non_empty(&self.name).unwrap_or(UNNAMED_DEPLOYMENT)
    }

    pub fn is_primary(&self) -> bool {
        self.state.as_deref() == Some(PRIMARY_STATE)
    }
}
