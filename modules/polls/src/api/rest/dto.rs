use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::contract::model::{ImageSize, NewPoll, Poll, PollOption, PollPatch};

/// REST DTO for poll representation. Ids are exposed as `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub question: String,
    pub options: Vec<OptionDto>,
    pub image: String,
    pub image_size: ImageSizeDto,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub votes: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImageSizeDto {
    pub original: i64,
    pub optimized: i64,
}

/// `options` entries are `{ "text": "..." }`; anything else counts toward the
/// raw option total but is dropped as blank.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreatePollReq {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<Value>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePollReq {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<Value>>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Ids stay strings here; ones that do not parse are answered with 404.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VoteReq {
    pub poll_id: String,
    pub option_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollsResp {
    pub message: String,
    pub polls: Vec<PollDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResp {
    pub message: String,
    pub poll: PollDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResp {
    pub message: String,
}

fn option_text(v: &Value) -> String {
    match v {
        Value::Object(map) => map
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

impl From<PollOption> for OptionDto {
    fn from(o: PollOption) -> Self {
        Self {
            id: o.id,
            text: o.text,
            votes: o.votes,
        }
    }
}

impl From<ImageSize> for ImageSizeDto {
    fn from(s: ImageSize) -> Self {
        Self {
            original: s.original,
            optimized: s.optimized,
        }
    }
}

impl From<Poll> for PollDto {
    fn from(p: Poll) -> Self {
        Self {
            id: p.id,
            question: p.question,
            options: p.options.into_iter().map(Into::into).collect(),
            image: p.image,
            image_size: p.image_size.into(),
            created_by: p.created_by,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<CreatePollReq> for NewPoll {
    fn from(req: CreatePollReq) -> Self {
        Self {
            question: req.question,
            options: req.options.iter().map(option_text).collect(),
            image: req.image,
        }
    }
}

impl From<UpdatePollReq> for PollPatch {
    fn from(req: UpdatePollReq) -> Self {
        Self {
            question: req.question,
            options: req.options.map(|o| o.iter().map(option_text).collect()),
            image: req.image,
        }
    }
}

pub fn polls_dto(polls: Vec<Poll>) -> Vec<PollDto> {
    polls.into_iter().map(PollDto::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn poll_json_shape() {
        let now = Utc::now();
        let poll = Poll {
            id: Uuid::new_v4(),
            question: "Q?".into(),
            options: vec![PollOption {
                id: Uuid::new_v4(),
                text: "A".into(),
                votes: 3,
            }],
            image: "aGk=".into(),
            image_size: ImageSize {
                original: 10,
                optimized: 7,
            },
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let v = serde_json::to_value(PollDto::from(poll.clone())).unwrap();

        assert_eq!(v["_id"], poll.id.to_string());
        assert_eq!(v["options"][0]["_id"], poll.options[0].id.to_string());
        assert_eq!(v["options"][0]["votes"], 3);
        assert_eq!(v["imageSize"], json!({"original": 10, "optimized": 7}));
        assert_eq!(v["createdBy"], poll.created_by.to_string());
        assert!(v.get("createdAt").is_some());
        assert!(v.get("updatedAt").is_some());
    }

    #[test]
    fn malformed_options_become_blank() {
        let req: CreatePollReq = serde_json::from_value(json!({
            "question": "Q?",
            "options": [{"text": "A"}, {"text": 5}, "B", null, {}],
            "image": "aGk="
        }))
        .unwrap();
        let new_poll = NewPoll::from(req);
        assert_eq!(new_poll.options, vec!["A", "", "B", "", ""]);
    }

    #[test]
    fn vote_request_uses_camel_case() {
        let req: VoteReq =
            serde_json::from_value(json!({"pollId": "p", "optionId": "o"})).unwrap();
        assert_eq!(req.poll_id, "p");
        assert_eq!(req.option_id, "o");
    }
}
