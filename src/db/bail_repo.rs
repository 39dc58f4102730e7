// src/db/bail_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::bail::{Bail, BailFamily, BailParty, BailPropagationView, BailStatus, BailType},
};

const BAIL_COLUMNS: &str = r#"
    id, property_id, bail_type, bail_family, status,
    rent_amount, monthly_charges, security_deposit,
    effective_date, end_date, payment_day,
    created_at, updated_at
"#;

// Para cada bail ainda aberto: status do proprietário, do locatário e do bem.
const PROPAGATION_SELECT: &str = r#"
    SELECT
        b.id AS bail_id,
        b.status,
        (SELECT c.completion_status
           FROM bail_parties bp JOIN clients c ON c.id = bp.client_id
          WHERE bp.bail_id = b.id AND c.profil_type = 'PROPRIETAIRE'
          LIMIT 1) AS owner_status,
        (SELECT c.completion_status
           FROM bail_parties bp JOIN clients c ON c.id = bp.client_id
          WHERE bp.bail_id = b.id AND c.profil_type = 'LOCATAIRE'
          LIMIT 1) AS tenant_status,
        p.completion_status AS property_status
    FROM bails b
    LEFT JOIN properties p ON p.id = b.property_id
    WHERE b.status IN ('DRAFT', 'PENDING_VALIDATION')
"#;

#[derive(Clone, Default)]
pub struct BailRepository;

impl BailRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
        bail_type: BailType,
        bail_family: BailFamily,
        rent_amount: Decimal,
        monthly_charges: Decimal,
        security_deposit: Decimal,
        effective_date: NaiveDate,
        end_date: Option<NaiveDate>,
        payment_day: Option<i32>,
    ) -> Result<Bail, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO bails (
                property_id, bail_type, bail_family, rent_amount, monthly_charges,
                security_deposit, effective_date, end_date, payment_day
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            BAIL_COLUMNS
        );

        let bail = sqlx::query_as::<_, Bail>(&sql)
            .bind(property_id)
            .bind(bail_type)
            .bind(bail_family)
            .bind(rent_amount)
            .bind(monthly_charges)
            .bind(security_deposit)
            .bind(effective_date)
            .bind(end_date)
            .bind(payment_day)
            .fetch_one(executor)
            .await?;

        Ok(bail)
    }

    pub async fn add_party<'e, E>(&self, executor: E, bail_id: Uuid, client_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO bail_parties (bail_id, client_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(bail_id)
            .bind(client_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Bail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM bails WHERE id = $1", BAIL_COLUMNS);
        let bail = sqlx::query_as::<_, Bail>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(bail)
    }

    pub async fn list_by_property<'e, E>(&self, executor: E, property_id: Uuid) -> Result<Vec<Bail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM bails WHERE property_id = $1 ORDER BY created_at DESC",
            BAIL_COLUMNS
        );
        let bails = sqlx::query_as::<_, Bail>(&sql)
            .bind(property_id)
            .fetch_all(executor)
            .await?;

        Ok(bails)
    }

    pub async fn list_parties<'e, E>(&self, executor: E, bail_id: Uuid) -> Result<Vec<BailParty>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let parties = sqlx::query_as::<_, BailParty>(
            r#"
            SELECT c.id AS client_id, c.profil_type, c.completion_status
            FROM bail_parties bp
            JOIN clients c ON c.id = bp.client_id
            WHERE bp.bail_id = $1
            "#,
        )
        .bind(bail_id)
        .fetch_all(executor)
        .await?;

        Ok(parties)
    }

    pub async fn update_status<'e, E>(&self, executor: E, id: Uuid, status: BailStatus) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE bails SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Troca o status apenas se ele ainda for `from`. Retorna se a linha mudou.
    pub async fn transition_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        from: BailStatus,
        to: BailStatus,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE bails SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(from)
            .bind(to)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn propagation_views_for_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<Vec<BailPropagationView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "{} AND EXISTS (SELECT 1 FROM bail_parties x WHERE x.bail_id = b.id AND x.client_id = $1)",
            PROPAGATION_SELECT
        );
        let views = sqlx::query_as::<_, BailPropagationView>(&sql)
            .bind(client_id)
            .fetch_all(executor)
            .await?;

        Ok(views)
    }

    pub async fn propagation_views_for_property<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
    ) -> Result<Vec<BailPropagationView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} AND b.property_id = $1", PROPAGATION_SELECT);
        let views = sqlx::query_as::<_, BailPropagationView>(&sql)
            .bind(property_id)
            .fetch_all(executor)
            .await?;

        Ok(views)
    }
}
