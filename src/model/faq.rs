use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "question": "What are office hours?",
        "answer": "9-5 Mon-Fri",
        "category": "General"
    })
)]
pub struct FaqEntry {
    pub id: u64,
    pub question: String,
    pub answer: String,
    pub category: String,
}

/// A question/answer pair not yet persisted
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewFaq {
    #[schema(example = "What are office hours?")]
    pub question: String,
    #[schema(example = "9-5 Mon-Fri")]
    pub answer: String,
    #[serde(default)]
    #[schema(example = "General")]
    pub category: String,
}
