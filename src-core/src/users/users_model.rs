use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for users. This is the balance store standing in for the
/// user-management collaborator; profile data lives elsewhere.
#[derive(Queryable, Insertable, Identifiable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct UserDB {
    pub id: String,
    pub display_name: String,
    pub balance: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub balance: f64,
}

impl From<UserDB> for User {
    fn from(u: UserDB) -> Self {
        Self {
            id: u.id,
            display_name: u.display_name,
            balance: u.balance,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: Option<String>,
    pub display_name: String,
}
