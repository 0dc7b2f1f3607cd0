use serde::Deserialize;
use serde_json::Value;

/// Generic listing envelope: `{"kind": "Listing", "data": {"children": [...]}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    pub children: Vec<Thing<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentData {
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Me {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub json: ApiResponseBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponseBody {
    #[serde(default)]
    pub errors: Vec<Value>,
}

impl<T> Listing<T> {
    pub fn into_items(self) -> impl Iterator<Item = T> {
        self.data.children.into_iter().map(|thing| thing.data)
    }

    /// Items whose kind tag matches, e.g. `t1` for comments.
    pub fn into_items_of_kind(self, kind: &str) -> Vec<T> {
        self.data
            .children
            .into_iter()
            .filter(|thing| thing.kind == kind)
            .map(|thing| thing.data)
            .collect()
    }
}
