use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct ForumPost {
    pub id: i64,
    pub cohort_id: i64,
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub is_solved: bool,
    pub solved_answer_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct ForumAnswer {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub body: String,
    pub is_accepted: bool,
    pub is_endorsed: bool,
    pub endorsed_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 回答排序：采纳优先，其次认可，再按时间
pub fn sort_answers(answers: &mut [ForumAnswer]) {
    answers.sort_by(|a, b| {
        b.is_accepted
            .cmp(&a.is_accepted)
            .then(b.is_endorsed.cmp(&a.is_endorsed))
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(id: i64, accepted: bool, endorsed: bool, ts: i64) -> ForumAnswer {
        let at = chrono::DateTime::from_timestamp(ts, 0).unwrap();
        ForumAnswer {
            id,
            post_id: 1,
            author_id: 1,
            body: String::new(),
            is_accepted: accepted,
            is_endorsed: endorsed,
            endorsed_by: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_sort_answers() {
        let mut answers = vec![
            answer(1, false, false, 100),
            answer(2, false, true, 300),
            answer(3, true, false, 400),
            answer(4, false, false, 50),
        ];
        sort_answers(&mut answers);
        let ids: Vec<i64> = answers.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }
}
