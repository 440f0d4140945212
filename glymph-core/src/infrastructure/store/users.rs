use super::{Store, StoreError};
use crate::domain::{Permission, Role, User, UserUpdate};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteExecutor};

const USER_COLUMNS: &str = "id, username, email, is_active, created_at";

#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// A user together with the stored password hash, for login checks only.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(FromRow)]
struct NamedRow {
    id: i64,
    name: String,
    description: Option<String>,
}

async fn insert_user_row<'e, E>(
    executor: E,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, StoreError>
where
    E: SqliteExecutor<'e>,
{
    let created_at = Utc::now();
    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash, is_active, created_at) \
         VALUES (?, ?, ?, 0, ?)",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(created_at)
    .execute(executor)
    .await
    .map_err(StoreError::on_write("user", username))?;

    Ok(User {
        id: result.last_insert_rowid(),
        username: username.to_string(),
        email: email.to_string(),
        is_active: false,
        created_at,
    })
}

impl Store {
    /// New accounts start inactive.
    pub async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        insert_user_row(&self.pool, username, email, password_hash).await
    }

    /// Insert an account and, when it is the first one, grant it `admin_role`
    /// inside the same transaction. Returns whether the grant happened.
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        admin_role: &str,
    ) -> Result<(User, bool), StoreError> {
        let mut tx = self.pool.begin().await?;
        let user = insert_user_row(&mut *tx, username, email, password_hash).await?;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;
        let is_first = count == 1;
        if is_first {
            sqlx::query("INSERT OR IGNORE INTO roles (name) VALUES (?)")
                .bind(admin_role)
                .execute(&mut *tx)
                .await?;
            sqlx::query("INSERT INTO user_roles (user_id, role_id) SELECT ?, id FROM roles WHERE name = ?")
                .bind(user.id)
                .bind(admin_role)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok((user, is_first))
    }

    pub async fn user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(User::from))
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(User::from))
    }

    pub async fn credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, password_hash FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        let Some((id, password_hash)) = row else {
            return Ok(None);
        };
        Ok(self.user(id).await?.map(|user| UserCredentials {
            user,
            password_hash,
        }))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User, StoreError> {
        let mut user = self
            .user(id)
            .await?
            .ok_or_else(|| StoreError::not_found("user", id))?;
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        sqlx::query("UPDATE users SET email = ?, is_active = ? WHERE id = ?")
            .bind(&user.email)
            .bind(user.is_active)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::on_write("user email", &user.email))?;
        Ok(user)
    }

    pub async fn set_user_active(&self, id: i64, is_active: bool) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user", id));
        }
        Ok(())
    }

    pub async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user", id));
        }
        Ok(())
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user", id));
        }
        Ok(())
    }

    pub async fn insert_role(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Role, StoreError> {
        let result = sqlx::query("INSERT INTO roles (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(&self.pool)
            .await
            .map_err(StoreError::on_write("role", name))?;
        Ok(Role {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            description: description.map(str::to_string),
        })
    }

    pub async fn role(&self, id: i64) -> Result<Option<Role>, StoreError> {
        let row: Option<NamedRow> =
            sqlx::query_as("SELECT id, name, description FROM roles WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|row| Role {
            id: row.id,
            name: row.name,
            description: row.description,
        }))
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let rows: Vec<NamedRow> =
            sqlx::query_as("SELECT id, name, description FROM roles ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|row| Role {
                id: row.id,
                name: row.name,
                description: row.description,
            })
            .collect())
    }

    pub async fn assign_role(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        if self.user(user_id).await?.is_none() {
            return Err(StoreError::not_found("user", user_id));
        }
        if self.role(role_id).await?.is_none() {
            return Err(StoreError::not_found("role", role_id));
        }
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::on_write("role assignment", format!("{user_id}:{role_id}")))?;
        Ok(())
    }

    pub async fn remove_role(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = ? AND role_id = ?")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(
                "role assignment",
                format!("{user_id}:{role_id}"),
            ));
        }
        Ok(())
    }

    pub async fn user_role_names(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT r.name FROM roles r JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = ? ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    pub async fn insert_permission(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Permission, StoreError> {
        let result = sqlx::query("INSERT INTO permissions (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(&self.pool)
            .await
            .map_err(StoreError::on_write("permission", name))?;
        Ok(Permission {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            description: description.map(str::to_string),
        })
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, StoreError> {
        let rows: Vec<NamedRow> =
            sqlx::query_as("SELECT id, name, description FROM permissions ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|row| Permission {
                id: row.id,
                name: row.name,
                description: row.description,
            })
            .collect())
    }

    pub async fn assign_permission(
        &self,
        role_id: i64,
        permission_id: i64,
    ) -> Result<(), StoreError> {
        if self.role(role_id).await?.is_none() {
            return Err(StoreError::not_found("role", role_id));
        }
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM permissions WHERE id = ?")
            .bind(permission_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found("permission", permission_id));
        }
        sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES (?, ?)")
            .bind(role_id)
            .bind(permission_id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::on_write(
                "permission assignment",
                format!("{role_id}:{permission_id}"),
            ))?;
        Ok(())
    }

    /// Distinct permission names granted through any of the user's roles.
    pub async fn user_permissions(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT p.name FROM permissions p \
             JOIN role_permissions rp ON rp.permission_id = p.id \
             JOIN user_roles ur ON ur.role_id = rp.role_id \
             WHERE ur.user_id = ? ORDER BY p.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}
