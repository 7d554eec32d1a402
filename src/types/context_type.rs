use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The conversational context a chat session runs in.
///
/// The context selects which persona greets the user and how the backend
/// routes the conversation; client-side behavior is otherwise identical.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    /// The general-purpose assistant.
    #[default]
    General,

    /// The learning tutor.
    Learning,

    /// The personalized interview coach.
    Personalized,
}

impl ContextType {
    /// The wire representation of this context.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::General => "general",
            ContextType::Learning => "learning",
            ContextType::Personalized => "personalized",
        }
    }

    /// The fixed greeting shown when no backend greeting can be obtained.
    pub fn default_greeting(&self) -> &'static str {
        match self {
            ContextType::General => "你好！我是你的AI助手“小面”，有什么可以帮你的吗？",
            ContextType::Learning => {
                "欢迎进入学习模块！我是你的学习导师“学小面”。在这里，我会为你系统地讲解核心知识点，布置有针对性的学习任务，并提供练习题来巩固掌握程度。你现在想学习哪个方向的内容呢？"
            }
            ContextType::Personalized => {
                "欢迎进入个性化模块！我是你的个性化面试顾问“个小面”。在这里，我会基于你的简历提供个性化的面试建议和针对性问题。请先上传你的简历，让我为你定制专属的面试训练方案。"
            }
        }
    }

    /// All known contexts.
    pub fn all() -> [ContextType; 3] {
        [
            ContextType::General,
            ContextType::Learning,
            ContextType::Personalized,
        ]
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(ContextType::General),
            "learning" => Ok(ContextType::Learning),
            "personalized" => Ok(ContextType::Personalized),
            other => Err(format!("unknown context type: {other}")),
        }
    }
}
