//! Tests to verify that the service layer emits expected tracing spans

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tracing_test::traced_test;
use uuid::Uuid;

use users::contract::model::User;
use users::domain::repo::{DuplicateEmail, StoredUser, UsersRepository};
use users::{JwtCodec, NewUser, PasswordHasher, Service, ServiceConfig};

/// In-memory repository; `reject_inserts` simulates losing the race to the unique index.
#[derive(Default)]
struct MockUsersRepository {
    users: Mutex<Vec<StoredUser>>,
    reject_inserts: bool,
}

#[async_trait::async_trait]
impl UsersRepository for MockUsersRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.user.id == id).map(|u| u.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.user.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn insert(&self, u: StoredUser) -> Result<()> {
        if self.reject_inserts {
            return Err(DuplicateEmail(u.user.email).into());
        }
        self.users.lock().unwrap().push(u);
        Ok(())
    }
}

fn service(repo: MockUsersRepository) -> Service {
    Service::new(
        Arc::new(repo),
        PasswordHasher::new(4),
        Arc::new(JwtCodec::new("k", Duration::from_secs(3600))),
        ServiceConfig::default(),
    )
}

fn ann() -> NewUser {
    NewUser {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        password: "secret1".into(),
    }
}

#[traced_test]
#[tokio::test]
async fn register_emits_spans() {
    let svc = service(MockUsersRepository::default());

    svc.register(ann()).await.unwrap();

    assert!(logs_contain("users.service.register"));
    assert!(logs_contain("User registered"));
    // the password never reaches the logs
    assert!(!logs_contain("secret1"));
}

#[traced_test]
#[tokio::test]
async fn login_emits_spans() {
    let svc = service(MockUsersRepository::default());
    svc.register(ann()).await.unwrap();

    svc.login("ann@example.com", "secret1").await.unwrap();

    assert!(logs_contain("users.service.login"));
    assert!(!logs_contain("secret1"));
}

#[tokio::test]
async fn unique_index_race_maps_to_already_exists() {
    let svc = service(MockUsersRepository {
        reject_inserts: true,
        ..Default::default()
    });

    let err = svc.register(ann()).await.unwrap_err();
    assert!(matches!(
        err,
        users::domain::error::DomainError::EmailAlreadyExists { ref email } if email == "ann@example.com"
    ));
}
