use serde::{Deserialize, Serialize};

/// Body of a feedback submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRequest {
    /// Free-form category, e.g. `general` or `bug`.
    pub feedback_type: String,

    /// The feedback text.
    pub content: String,

    /// Optional 1-5 rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,

    /// Optional free-form context for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl FeedbackRequest {
    /// Creates a plain text feedback submission.
    pub fn new(feedback_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            feedback_type: feedback_type.into(),
            content: content.into(),
            rating: None,
            metadata: None,
        }
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Sets the metadata object.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn optional_fields_are_omitted() {
        let request = FeedbackRequest::new("general", "界面很好用");
        assert_eq!(
            to_value(&request).unwrap(),
            json!({
                "feedback_type": "general",
                "content": "界面很好用"
            })
        );
    }

    #[test]
    fn rating_and_metadata_serialize() {
        let request = FeedbackRequest::new("bug", "回复重复")
            .with_rating(2)
            .with_metadata(json!({"view": "chat"}));

        let value = to_value(&request).unwrap();
        assert_eq!(value["rating"], 2);
        assert_eq!(value["metadata"]["view"], "chat");
    }
}
