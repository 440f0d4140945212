use super::{Store, StoreError};
use crate::domain::{Organization, OrganizationInput, OrganizationUpdate};
use sqlx::FromRow;

#[derive(FromRow)]
struct OrganizationRow {
    id: i64,
    name: String,
    description: Option<String>,
    owner_id: i64,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Organization {
            id: row.id,
            name: row.name,
            description: row.description,
            owner_id: row.owner_id,
        }
    }
}

impl Store {
    /// Creates the organization with its owner as first member.
    pub async fn insert_organization(
        &self,
        owner_id: i64,
        input: &OrganizationInput,
    ) -> Result<Organization, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result =
            sqlx::query("INSERT INTO organizations (name, description, owner_id) VALUES (?, ?, ?)")
                .bind(&input.name)
                .bind(&input.description)
                .bind(owner_id)
                .execute(&mut *tx)
                .await
                .map_err(StoreError::on_write("organization", &input.name))?;
        let id = result.last_insert_rowid();
        sqlx::query("INSERT INTO organization_members (org_id, user_id) VALUES (?, ?)")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Organization {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            owner_id,
        })
    }

    pub async fn organization(&self, id: i64) -> Result<Option<Organization>, StoreError> {
        let row: Option<OrganizationRow> = sqlx::query_as(
            "SELECT id, name, description, owner_id FROM organizations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Organization::from))
    }

    pub async fn organizations_for_member(
        &self,
        user_id: i64,
    ) -> Result<Vec<Organization>, StoreError> {
        let rows: Vec<OrganizationRow> = sqlx::query_as(
            "SELECT o.id, o.name, o.description, o.owner_id FROM organizations o \
             JOIN organization_members m ON m.org_id = o.id \
             WHERE m.user_id = ? ORDER BY o.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Organization::from).collect())
    }

    pub async fn update_organization(
        &self,
        id: i64,
        update: &OrganizationUpdate,
    ) -> Result<Organization, StoreError> {
        let mut organization = self
            .organization(id)
            .await?
            .ok_or_else(|| StoreError::not_found("organization", id))?;
        if let Some(name) = &update.name {
            organization.name = name.clone();
        }
        if let Some(description) = &update.description {
            organization.description = Some(description.clone());
        }
        sqlx::query("UPDATE organizations SET name = ?, description = ? WHERE id = ?")
            .bind(&organization.name)
            .bind(&organization.description)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::on_write("organization", &organization.name))?;
        Ok(organization)
    }

    pub async fn is_member(&self, org_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT user_id FROM organization_members WHERE org_id = ? AND user_id = ?",
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    pub async fn add_member(&self, org_id: i64, user_id: i64) -> Result<(), StoreError> {
        if self.user(user_id).await?.is_none() {
            return Err(StoreError::not_found("user", user_id));
        }
        sqlx::query("INSERT INTO organization_members (org_id, user_id) VALUES (?, ?)")
            .bind(org_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::on_write("membership", format!("{org_id}:{user_id}")))?;
        Ok(())
    }

    pub async fn remove_member(&self, org_id: i64, user_id: i64) -> Result<(), StoreError> {
        let result =
            sqlx::query("DELETE FROM organization_members WHERE org_id = ? AND user_id = ?")
                .bind(org_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(
                "membership",
                format!("{org_id}:{user_id}"),
            ));
        }
        Ok(())
    }

    /// The new owner becomes a member if not one already.
    pub async fn transfer_ownership(
        &self,
        org_id: i64,
        new_owner_id: i64,
    ) -> Result<Organization, StoreError> {
        let mut organization = self
            .organization(org_id)
            .await?
            .ok_or_else(|| StoreError::not_found("organization", org_id))?;
        if self.user(new_owner_id).await?.is_none() {
            return Err(StoreError::not_found("user", new_owner_id));
        }
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE organizations SET owner_id = ? WHERE id = ?")
            .bind(new_owner_id)
            .bind(org_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT OR IGNORE INTO organization_members (org_id, user_id) VALUES (?, ?)")
            .bind(org_id)
            .bind(new_owner_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        organization.owner_id = new_owner_id;
        Ok(organization)
    }
}
