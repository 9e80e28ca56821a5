use sea_orm::Set;
use uuid::Uuid;

use crate::contract::model::{ImageSize, Poll, PollOption};
use crate::infra::storage::entity::{poll, poll_option};

/// Assemble a contract poll from its row and its option rows (already ordered).
pub fn poll_from_rows(p: poll::Model, options: Vec<poll_option::Model>) -> Poll {
    Poll {
        id: p.id,
        question: p.question,
        options: options
            .into_iter()
            .map(|o| PollOption {
                id: o.id,
                text: o.text,
                votes: o.votes,
            })
            .collect(),
        image: p.image,
        image_size: ImageSize {
            original: p.image_original_size,
            optimized: p.image_optimized_size,
        },
        created_by: p.created_by,
        created_at: p.created_at,
        updated_at: p.updated_at,
    }
}

pub fn poll_to_active(p: &Poll) -> poll::ActiveModel {
    poll::ActiveModel {
        id: Set(p.id),
        question: Set(p.question.clone()),
        image: Set(p.image.clone()),
        image_original_size: Set(p.image_size.original),
        image_optimized_size: Set(p.image_size.optimized),
        created_by: Set(p.created_by),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

pub fn options_to_active(poll_id: Uuid, options: &[PollOption]) -> Vec<poll_option::ActiveModel> {
    options
        .iter()
        .zip(0..)
        .map(|(o, position)| poll_option::ActiveModel {
            id: Set(o.id),
            poll_id: Set(poll_id),
            position: Set(position),
            text: Set(o.text.clone()),
            votes: Set(o.votes),
        })
        .collect()
}
