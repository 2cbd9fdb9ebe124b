//! `SQLite` implementation of [`UserRepository`].
//!
//! Roles are stored as a JSON array of their snake case names. Parent
//! accounts are linked to students through `parent_children`.

use std::collections::BTreeSet;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use casebook_app::ports::UserRepository;
use casebook_domain::credential::PasswordDigest;
use casebook_domain::error::CasebookError;
use casebook_domain::id::{StudentId, UserId};
use casebook_domain::user::{Role, User};

use crate::error::StorageError;
use crate::store::{SqliteStore, decode_err, parse_id};

struct Wrapper(User);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let password: String = row.try_get("password")?;
        let roles: String = row.try_get("roles")?;
        let roles: BTreeSet<Role> = serde_json::from_str(&roles).map_err(decode_err)?;

        Ok(Self(User {
            id: parse_id(&id)?,
            login: row.try_get("login")?,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            password: PasswordDigest::from_stored(password),
            roles,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO users (id, login, full_name, email, password, roles)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = ?";
const SELECT_BY_LOGIN: &str = "SELECT * FROM users WHERE login = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM users WHERE email = ?";
const SELECT_ALL: &str = "SELECT * FROM users ORDER BY login";
const UPDATE: &str = r"
    UPDATE users SET login = ?, full_name = ?, email = ?, password = ?, roles = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM users WHERE id = ?";

const INSERT_CHILD: &str = r"
    INSERT INTO parent_children (parent_id, student_id, added_at) VALUES (?, ?, ?)
    ON CONFLICT (parent_id, student_id) DO NOTHING
";
const DELETE_CHILD: &str = "DELETE FROM parent_children WHERE parent_id = ? AND student_id = ?";
const SELECT_CHILDREN: &str =
    "SELECT student_id FROM parent_children WHERE parent_id = ? ORDER BY added_at, rowid";

impl SqliteStore {
    async fn find_user(&self, query: &str, value: &str) -> Result<Option<User>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }
}

impl UserRepository for SqliteStore {
    async fn create_user(&self, user: User) -> Result<User, CasebookError> {
        let roles = serde_json::to_string(&user.roles).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(user.id.to_string())
            .bind(&user.login)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(user.password.as_str())
            .bind(roles)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, CasebookError> {
        self.find_user(SELECT_BY_ID, &id.to_string()).await
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, CasebookError> {
        self.find_user(SELECT_BY_LOGIN, login).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CasebookError> {
        self.find_user(SELECT_BY_EMAIL, email).await
    }

    async fn list_users(&self) -> Result<Vec<User>, CasebookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update_user(&self, user: User) -> Result<User, CasebookError> {
        let roles = serde_json::to_string(&user.roles).map_err(StorageError::from)?;

        sqlx::query(UPDATE)
            .bind(&user.login)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(user.password.as_str())
            .bind(roles)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn add_child(&self, parent: UserId, student: StudentId) -> Result<(), CasebookError> {
        sqlx::query(INSERT_CHILD)
            .bind(parent.to_string())
            .bind(student.to_string())
            .bind(casebook_domain::time::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn remove_child(&self, parent: UserId, student: StudentId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_CHILD)
            .bind(parent.to_string())
            .bind(student.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn children_of(&self, parent: UserId) -> Result<Vec<StudentId>, CasebookError> {
        let rows: Vec<(String,)> = sqlx::query_as(SELECT_CHILDREN)
            .bind(parent.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let ids = rows
            .iter()
            .map(|(id,)| parse_id(id))
            .collect::<Result<Vec<StudentId>, _>>()
            .map_err(StorageError::from)?;
        Ok(ids)
    }
}
