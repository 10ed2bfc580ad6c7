use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MaterialData {
    #[serde(default)]
    pub stream_item_id: Option<String>,
    pub class_id: String,
    pub author_id: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Authoritative: stored attachments are replaced with this list, in order.
    #[validate(nested)]
    #[serde(default)]
    pub attachments: Vec<AttachmentData>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentData {
    #[validate(length(min = 1, message = "attachment title must not be empty"))]
    pub title: String,
    #[validate(url(message = "attachment url must be a valid url"))]
    pub url: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialView {
    pub id: String,
    pub stream_item_id: String,
    pub class_id: String,
    pub author_id: String,
    pub title: String,
    pub content: Option<String>,
    pub description: Option<String>,
    pub archived: bool,
    pub attachments: Vec<AttachmentView>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentView {
    pub id: String,
    pub title: String,
    pub url: String,
    pub kind: String,
    pub order_index: i32,
}
