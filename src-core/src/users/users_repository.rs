use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::get_connection;
use crate::schema::users;
use crate::users::users_errors::{Result, UserError};
use crate::users::users_model::{NewUser, User, UserDB};

/// Repository for the user balance store
pub struct UserRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl UserRepository {
    /// Creates a new UserRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    pub fn create(&self, new_user: NewUser) -> Result<User> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let now = Utc::now().naive_utc();
        let user_db = UserDB {
            id: new_user
                .id
                .unwrap_or_else(|| format!("user-{}", Uuid::new_v4())),
            display_name: new_user.display_name,
            balance: 0.0,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(users::table)
            .values(&user_db)
            .execute(&mut conn)?;

        Ok(user_db.into())
    }

    /// Retrieves a user by its ID
    pub fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .map(User::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    UserError::NotFound(format!("User with id {} not found", user_id))
                }
                _ => UserError::DatabaseError(e.to_string()),
            })
    }
}
