use serde::{Deserialize, Serialize};

/// A suggestion card attached to an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    /// Short card title.
    pub title: String,

    /// One-line description shown under the title.
    pub description: String,

    /// What clicking the card does.
    #[serde(flatten)]
    pub action: RecommendationAction,
}

/// The action carried by a recommendation card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum RecommendationAction {
    /// Jump to another view.
    Navigate {
        /// Route path understood by the routing collaborator.
        path: String,
    },

    /// Start practicing a subject area.
    Practice {
        /// The subject area to practice.
        area: String,
    },
}

impl Recommendation {
    /// The navigation target, for `navigate` cards.
    pub fn navigation_target(&self) -> Option<&str> {
        match &self.action {
            RecommendationAction::Navigate { path } => Some(path),
            RecommendationAction::Practice { .. } => None,
        }
    }

    /// The canned follow-up input a `practice` card expands to.
    pub fn follow_up_input(&self) -> Option<String> {
        match &self.action {
            RecommendationAction::Navigate { .. } => None,
            RecommendationAction::Practice { area } => {
                Some(format!("我想练习{area}相关的问题"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_navigate_card() {
        // The backend sends flat objects with an `action` discriminator and
        // a free `type` field we ignore.
        let json = json!({
            "type": "action",
            "title": "开始学习任务",
            "description": "完成专业学习任务，提升知识水平",
            "action": "navigate",
            "path": "/tasks"
        });

        let card: Recommendation = serde_json::from_value(json).unwrap();
        assert_eq!(card.title, "开始学习任务");
        assert_eq!(card.navigation_target(), Some("/tasks"));
        assert!(card.follow_up_input().is_none());
    }

    #[test]
    fn deserialize_practice_card() {
        let json = json!({
            "type": "suggestion",
            "title": "加强算法练习",
            "description": "你在算法方面得分较低，建议多练习",
            "action": "practice",
            "area": "算法"
        });

        let card: Recommendation = serde_json::from_value(json).unwrap();
        assert!(card.navigation_target().is_none());
        assert_eq!(
            card.follow_up_input().as_deref(),
            Some("我想练习算法相关的问题")
        );
    }

    #[test]
    fn serialize_flattens_action() {
        let card = Recommendation {
            title: "上传简历".to_string(),
            description: "上传简历获取个性化面试建议".to_string(),
            action: RecommendationAction::Navigate {
                path: "/personalized".to_string(),
            },
        };

        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["action"], "navigate");
        assert_eq!(value["path"], "/personalized");
    }
}
