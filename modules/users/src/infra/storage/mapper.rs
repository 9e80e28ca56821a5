use sea_orm::Set;

use crate::contract::model::User;
use crate::domain::repo::StoredUser;
use crate::infra::storage::entity::{ActiveModel, Model};

impl From<Model> for User {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            created_at: m.created_at,
        }
    }
}

impl From<Model> for StoredUser {
    fn from(m: Model) -> Self {
        let password_hash = m.password_hash.clone();
        Self {
            user: m.into(),
            password_hash,
        }
    }
}

impl From<StoredUser> for ActiveModel {
    fn from(s: StoredUser) -> Self {
        Self {
            id: Set(s.user.id),
            name: Set(s.user.name),
            email: Set(s.user.email),
            password_hash: Set(s.password_hash),
            created_at: Set(s.user.created_at),
        }
    }
}
