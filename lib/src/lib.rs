//! Content listing bindings for Rust
//! Provides a typed client for the paginated post listings of the publishing backend

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Server responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Malformed response body: {0}")]
    Decode(String),
    #[error("Request rejected by backend: {0}")]
    Unsuccessful(String),
    #[error("Invalid header value")]
    InvalidHeader,
}

/// Identifier of a content item. The backend sends either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId(value.to_string())
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        ItemId(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct ItemIdVisitor;

        impl<'de> Visitor<'de> for ItemIdVisitor {
            type Value = ItemId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer id")
            }

            fn visit_i64<E>(self, v: i64) -> Result<ItemId, E> {
                Ok(ItemId(v.to_string()))
            }

            fn visit_u64<E>(self, v: u64) -> Result<ItemId, E> {
                Ok(ItemId(v.to_string()))
            }

            fn visit_str<E>(self, v: &str) -> Result<ItemId, E>
            where
                E: de::Error,
            {
                if v.is_empty() {
                    return Err(de::Error::custom("empty id"));
                }
                Ok(ItemId(v.to_string()))
            }
        }

        deserializer.deserialize_any(ItemIdVisitor)
    }
}

/// Backends send `null` for empty display fields; treat it like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AuthorRepr")]
pub struct Author {
    pub id: Option<ItemId>,
    pub name: String,
}

/// An author is either a bare display name or a user record
#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorRepr {
    Name(String),
    Record {
        #[serde(default)]
        id: Option<ItemId>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        username: Option<String>,
    },
}

impl From<AuthorRepr> for Author {
    fn from(repr: AuthorRepr) -> Self {
        match repr {
            AuthorRepr::Name(name) => Author { id: None, name },
            AuthorRepr::Record { id, name, username } => Author {
                id,
                name: name.or(username).unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Name(String),
    Record {
        name: String,
        #[serde(default)]
        slug: Option<String>,
    },
}

impl Tag {
    pub fn name(&self) -> &str {
        match self {
            Tag::Name(name) => name,
            Tag::Record { name, .. } => name,
        }
    }
}

/// A post as returned by the listing endpoints. Only `id` is required;
/// fields not modelled here are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ItemId,
    #[serde(default, alias = "title", deserialize_with = "null_as_default")]
    pub heading: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, alias = "excerpt")]
    pub summary: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContentItem {
    /// Publication date, falling back to the record's creation time
    pub fn published_at(&self) -> Option<&str> {
        self.date.as_deref().or(self.created_at.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    pub last_page: u32,
}

/// One decoded page of a listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub items: Vec<ContentItem>,
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

fn default_success() -> bool {
    true
}

/// Decode a listing body. Accepts both `{ data: [..], meta }` and the nested
/// `{ data: { data: [..], current_page, last_page, .. } }` shapes.
pub fn parse_listing(body: &str) -> Result<Listing, ContentApiError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| ContentApiError::Decode(e.to_string()))?;

    if !envelope.success {
        return Err(ContentApiError::Unsuccessful(
            envelope
                .message
                .unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    match envelope.data {
        Some(serde_json::Value::Array(items)) => Ok(Listing {
            items: decode_items(items)?,
            meta: envelope.meta,
        }),
        Some(serde_json::Value::Object(mut page)) => {
            let items = match page.remove("data") {
                Some(serde_json::Value::Array(items)) => decode_items(items)?,
                _ => {
                    return Err(ContentApiError::Decode(
                        "data is neither a list of items nor a paginated object".to_string(),
                    ))
                }
            };
            let meta = serde_json::from_value::<PageMeta>(serde_json::Value::Object(page)).ok();
            Ok(Listing {
                items,
                meta: meta.or(envelope.meta),
            })
        }
        Some(other) => Err(ContentApiError::Decode(format!(
            "data is neither a list of items nor a paginated object: {}",
            other
        ))),
        None => Err(ContentApiError::Decode("missing data field".to_string())),
    }
}

/// Decode items one by one so the error names the offending item
fn decode_items(values: Vec<serde_json::Value>) -> Result<Vec<ContentItem>, ContentApiError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value)
                .map_err(|e| ContentApiError::Decode(format!("item {}: {}", index, e)))
        })
        .collect()
}

/// A single page request against a listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub path: String,
    pub page: u32,
    pub page_size: u32,
    pub page_size_param: &'static str,
    pub params: Vec<(String, String)>,
}

impl PageRequest {
    pub fn new(path: impl Into<String>, page: u32, page_size: u32) -> Self {
        Self {
            path: path.into(),
            page,
            page_size,
            page_size_param: "limit",
            params: Vec::new(),
        }
    }

    pub fn with_page_size_param(mut self, name: &'static str) -> Self {
        self.page_size_param = name;
        self
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Query pairs in the order they are sent
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            (self.page_size_param.to_string(), self.page_size.to_string()),
        ];
        pairs.extend(self.params.iter().cloned());
        pairs
    }
}

/// Credentials of a signed-in user. Passed to the client explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

pub struct ContentClient {
    url: String,
    client: Client,
}

impl ContentClient {
    pub fn new(
        url: &str,
        session: Option<&Session>,
        timeout: Duration,
    ) -> Result<Self, ContentApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(session) = session {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", session.token))
                    .map_err(|_| ContentApiError::InvalidHeader)?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Full URL of a request path, without query string
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }

    /// Fetch one page of a listing
    pub async fn fetch_listing(&self, request: &PageRequest) -> Result<Listing, ContentApiError> {
        let response = self
            .client
            .get(self.endpoint(&request.path))
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ContentApiError::Status {
                status: status.as_u16(),
                message: status_message(status, &body),
            });
        }

        parse_listing(&body)
    }
}

/// Prefer the backend's `message` field, fall back to the reason phrase
fn status_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        })
}
