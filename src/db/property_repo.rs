// src/db/property_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::client::CompletionStatus,
    models::property::{Property, PropertyInput, PropertyStatus},
};

const PROPERTY_COLUMNS: &str = r#"
    id, owner_id, label, full_address, surface_m2, type, legal_status, status, completion_status,
    has_bedding, has_blackout, has_hob, has_oven_or_microwave, has_fridge, has_freezer,
    has_tableware, has_kitchen_utensils, has_table, has_seating, has_storage_shelves,
    has_light_fixtures, has_cleaning_equipment,
    latitude, longitude, is_tight_zone, has_rent_control,
    created_at, updated_at
"#;

#[derive(Clone, Default)]
pub struct PropertyRepository;

impl PropertyRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        full_address: &str,
        input: &PropertyInput,
    ) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let f = &input.furniture;
        let sql = format!(
            r#"
            INSERT INTO properties (
                owner_id, full_address, label, surface_m2, type, legal_status, status,
                has_bedding, has_blackout, has_hob, has_oven_or_microwave, has_fridge, has_freezer,
                has_tableware, has_kitchen_utensils, has_table, has_seating, has_storage_shelves,
                has_light_fixtures, has_cleaning_equipment,
                latitude, longitude, is_tight_zone, has_rent_control
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, COALESCE($7, 'NON_LOUER'::property_status),
                $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                $21, $22, $23, $24
            )
            RETURNING {}
            "#,
            PROPERTY_COLUMNS
        );

        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(owner_id)
            .bind(full_address)
            .bind(input.label.as_deref())
            .bind(input.surface_m2)
            .bind(input.property_type)
            .bind(input.legal_status)
            .bind(input.status)
            .bind(f.has_bedding.unwrap_or(false))
            .bind(f.has_blackout.unwrap_or(false))
            .bind(f.has_hob.unwrap_or(false))
            .bind(f.has_oven_or_microwave.unwrap_or(false))
            .bind(f.has_fridge.unwrap_or(false))
            .bind(f.has_freezer.unwrap_or(false))
            .bind(f.has_tableware.unwrap_or(false))
            .bind(f.has_kitchen_utensils.unwrap_or(false))
            .bind(f.has_table.unwrap_or(false))
            .bind(f.has_seating.unwrap_or(false))
            .bind(f.has_storage_shelves.unwrap_or(false))
            .bind(f.has_light_fixtures.unwrap_or(false))
            .bind(f.has_cleaning_equipment.unwrap_or(false))
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.is_tight_zone.unwrap_or(false))
            .bind(input.has_rent_control.unwrap_or(false))
            .fetch_one(executor)
            .await?;

        Ok(property)
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM properties WHERE id = $1", PROPERTY_COLUMNS);
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(property)
    }

    pub async fn list<'e, E>(&self, executor: E, owner_id: Option<Uuid>) -> Result<Vec<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM properties WHERE ($1::uuid IS NULL OR owner_id = $1) ORDER BY created_at DESC",
            PROPERTY_COLUMNS
        );
        let properties = sqlx::query_as::<_, Property>(&sql)
            .bind(owner_id)
            .fetch_all(executor)
            .await?;

        Ok(properties)
    }

    /// Atualização parcial: campos `None` mantêm o valor atual.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &PropertyInput,
    ) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let f = &input.furniture;
        let sql = format!(
            r#"
            UPDATE properties SET
                label = COALESCE($2, label),
                full_address = COALESCE($3, full_address),
                surface_m2 = COALESCE($4, surface_m2),
                type = COALESCE($5, type),
                legal_status = COALESCE($6, legal_status),
                status = COALESCE($7, status),
                has_bedding = COALESCE($8, has_bedding),
                has_blackout = COALESCE($9, has_blackout),
                has_hob = COALESCE($10, has_hob),
                has_oven_or_microwave = COALESCE($11, has_oven_or_microwave),
                has_fridge = COALESCE($12, has_fridge),
                has_freezer = COALESCE($13, has_freezer),
                has_tableware = COALESCE($14, has_tableware),
                has_kitchen_utensils = COALESCE($15, has_kitchen_utensils),
                has_table = COALESCE($16, has_table),
                has_seating = COALESCE($17, has_seating),
                has_storage_shelves = COALESCE($18, has_storage_shelves),
                has_light_fixtures = COALESCE($19, has_light_fixtures),
                has_cleaning_equipment = COALESCE($20, has_cleaning_equipment),
                latitude = COALESCE($21, latitude),
                longitude = COALESCE($22, longitude),
                is_tight_zone = COALESCE($23, is_tight_zone),
                has_rent_control = COALESCE($24, has_rent_control),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROPERTY_COLUMNS
        );

        sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .bind(input.label.as_deref())
            .bind(input.full_address.as_deref())
            .bind(input.surface_m2)
            .bind(input.property_type)
            .bind(input.legal_status)
            .bind(input.status)
            .bind(f.has_bedding)
            .bind(f.has_blackout)
            .bind(f.has_hob)
            .bind(f.has_oven_or_microwave)
            .bind(f.has_fridge)
            .bind(f.has_freezer)
            .bind(f.has_tableware)
            .bind(f.has_kitchen_utensils)
            .bind(f.has_table)
            .bind(f.has_seating)
            .bind(f.has_storage_shelves)
            .bind(f.has_light_fixtures)
            .bind(f.has_cleaning_equipment)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.is_tight_zone)
            .bind(input.has_rent_control)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::PropertyNotFound)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: PropertyStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE properties SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn update_completion_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: CompletionStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE properties SET completion_status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn count_bails<'e, E>(&self, executor: E, id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bails WHERE property_id = $1")
            .bind(id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
