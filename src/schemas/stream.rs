use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::types::StreamKind;

/// Direct stream item payload, used for announcements and other items that
/// carry no attached entity. Quiz, assignment and material saves create their
/// own stream items.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StreamItemData {
    #[serde(default)]
    pub id: Option<String>,
    pub class_id: String,
    pub author_id: String,
    pub kind: StreamKind,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamItemView {
    pub id: String,
    pub class_id: String,
    pub author_id: String,
    pub kind: StreamKind,
    pub title: String,
    pub content: Option<String>,
    pub archived: bool,
    pub created_at: String,
}
