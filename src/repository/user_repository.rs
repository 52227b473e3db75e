use crate::config::database::{Database, DatabaseTrait};
use crate::config::logging::secure_log;
use crate::entity::user::User;
use async_trait::async_trait;
use sqlx::Error;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserRepository {
    pub(crate) db_conn: Arc<Database>,
}

#[async_trait]
pub trait UserRepositoryTrait {
    fn new(db_conn: &Arc<Database>) -> Self;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error>;
    async fn find(&self, id: &str) -> Result<User, Error>;
    async fn create(&self, user: &User) -> Result<(), Error>;
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let start = std::time::Instant::now();

        match sqlx::query_as::<_, User>(
            "SELECT id, email, firstname, lastname, role, auth_type, created_at, updated_at FROM users WHERE email = ?"
        )
        .bind(email)
        .fetch_optional(self.db_conn.get_pool())
        .await {
            Ok(user) => {
                let _duration = start.elapsed();
                secure_log::sensitive_debug!("Email lookup finished in {:?}", _duration);
                Ok(user)
            }
            Err(e) => {
                secure_log::secure_error!("Email lookup failed", e);
                Err(e)
            }
        }
    }

    async fn find(&self, id: &str) -> Result<User, Error> {
        match sqlx::query_as::<_, User>(
            "SELECT id, email, firstname, lastname, role, auth_type, created_at, updated_at FROM users WHERE id = ?"
        )
        .bind(id)
        .fetch_one(self.db_conn.get_pool())
        .await {
            Ok(user) => Ok(user),
            Err(e) => {
                secure_log::secure_error!("User fetch by id failed", e);
                Err(e)
            }
        }
    }

    async fn create(&self, user: &User) -> Result<(), Error> {
        match sqlx::query(
            "INSERT INTO users (id, email, firstname, lastname, role, auth_type, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(user.role)
        .bind(user.auth_type)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.db_conn.get_pool())
        .await {
            Ok(_) => {
                secure_log::sensitive_debug!("User row created for email: {}", user.email);
                Ok(())
            }
            Err(e) => {
                secure_log::secure_error!("User insert failed", e);
                Err(e)
            }
        }
    }
}
