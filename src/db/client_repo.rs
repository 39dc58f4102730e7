// src/db/client_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::client::{
        Client, ClientType, CompletionStatus, Entreprise, EntrepriseInput, Person, PersonInput,
        ProfilType,
    },
};

const PERSON_COLUMNS: &str = r#"
    id, client_id, is_primary, first_name, last_name, email, phone, full_address,
    nationality, birth_date, birth_place, profession, family_status, matrimonial_regime,
    created_at, updated_at
"#;

const ENTREPRISE_COLUMNS: &str = r#"
    id, client_id, legal_name, name, registration, email, phone, full_address,
    created_at, updated_at
"#;

#[derive(Clone, Default)]
pub struct ClientRepository;

impl ClientRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        client_type: ClientType,
        profil_type: ProfilType,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (type, profil_type)
            VALUES ($1, $2)
            RETURNING id, type, profil_type, completion_status, created_at, updated_at
            "#,
        )
        .bind(client_type)
        .bind(profil_type)
        .fetch_one(executor)
        .await?;

        Ok(client)
    }

    pub async fn find_client<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, type, profil_type, completion_status, created_at, updated_at FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(client)
    }

    pub async fn list_clients<'e, E>(
        &self,
        executor: E,
        profil_type: Option<ProfilType>,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, type, profil_type, completion_status, created_at, updated_at
            FROM clients
            WHERE ($1::profil_type IS NULL OR profil_type = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(profil_type)
        .fetch_all(executor)
        .await?;

        Ok(clients)
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
        sqlx::query("UPDATE clients SET completion_status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Grava perfil e status juntos (ver `Client::convert_to`).
    pub async fn update_profil_type<'e, E>(&self, executor: E, client: &Client) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients SET profil_type = $2, completion_status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, type, profil_type, completion_status, created_at, updated_at
            "#,
        )
        .bind(client.id)
        .bind(client.profil_type)
        .bind(client.completion_status)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ClientNotFound)
    }

    /// Quantos bens ou baux ainda impedem a exclusão do cliente.
    pub async fn count_blocking_links<'e, E>(&self, executor: E, id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                (SELECT COUNT(*) FROM properties WHERE owner_id = $1)
              + (SELECT COUNT(*) FROM bail_parties WHERE client_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn delete_client<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PESSOAS
    // =========================================================================

    /// Ordem de criação: a "primeira pessoa" é a mais antiga.
    pub async fn list_persons<'e, E>(&self, executor: E, client_id: Uuid) -> Result<Vec<Person>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM persons WHERE client_id = $1 ORDER BY created_at ASC, id ASC",
            PERSON_COLUMNS
        );
        let persons = sqlx::query_as::<_, Person>(&sql)
            .bind(client_id)
            .fetch_all(executor)
            .await?;

        Ok(persons)
    }

    pub async fn find_person<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Person>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM persons WHERE id = $1", PERSON_COLUMNS);
        let person = sqlx::query_as::<_, Person>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(person)
    }

    pub async fn insert_person<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        is_primary: bool,
        input: &PersonInput,
    ) -> Result<Person, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO persons (
                client_id, is_primary, first_name, last_name, email, phone, full_address,
                nationality, birth_date, birth_place, profession, family_status, matrimonial_regime
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            PERSON_COLUMNS
        );

        let person = sqlx::query_as::<_, Person>(&sql)
            .bind(client_id)
            .bind(is_primary)
            .bind(input.first_name.as_deref())
            .bind(input.last_name.as_deref())
            .bind(input.email.as_deref())
            .bind(input.phone.as_deref())
            .bind(input.full_address.as_deref())
            .bind(input.nationality.as_deref())
            .bind(input.birth_date)
            .bind(input.birth_place.as_deref())
            .bind(input.profession.as_deref())
            .bind(input.family_status)
            .bind(input.matrimonial_regime)
            .fetch_one(executor)
            .await?;

        Ok(person)
    }

    /// Atualização parcial: campos `None` mantêm o valor atual.
    pub async fn update_person<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &PersonInput,
    ) -> Result<Person, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE persons SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                full_address = COALESCE($6, full_address),
                nationality = COALESCE($7, nationality),
                birth_date = COALESCE($8, birth_date),
                birth_place = COALESCE($9, birth_place),
                profession = COALESCE($10, profession),
                family_status = COALESCE($11, family_status),
                matrimonial_regime = COALESCE($12, matrimonial_regime),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PERSON_COLUMNS
        );

        sqlx::query_as::<_, Person>(&sql)
            .bind(id)
            .bind(input.first_name.as_deref())
            .bind(input.last_name.as_deref())
            .bind(input.email.as_deref())
            .bind(input.phone.as_deref())
            .bind(input.full_address.as_deref())
            .bind(input.nationality.as_deref())
            .bind(input.birth_date)
            .bind(input.birth_place.as_deref())
            .bind(input.profession.as_deref())
            .bind(input.family_status)
            .bind(input.matrimonial_regime)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::PersonNotFound)
    }

    pub async fn clear_primary<'e, E>(&self, executor: E, client_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE persons SET is_primary = FALSE, updated_at = NOW() WHERE client_id = $1 AND is_primary")
            .bind(client_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn mark_primary<'e, E>(&self, executor: E, person_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE persons SET is_primary = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(person_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn delete_person<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    // =========================================================================
    //  EMPRESAS
    // =========================================================================

    pub async fn find_entreprise_by_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<Option<Entreprise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM entreprises WHERE client_id = $1", ENTREPRISE_COLUMNS);
        let entreprise = sqlx::query_as::<_, Entreprise>(&sql)
            .bind(client_id)
            .fetch_optional(executor)
            .await?;

        Ok(entreprise)
    }

    pub async fn find_entreprise<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Entreprise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM entreprises WHERE id = $1", ENTREPRISE_COLUMNS);
        let entreprise = sqlx::query_as::<_, Entreprise>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(entreprise)
    }

    pub async fn insert_entreprise<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        input: &EntrepriseInput,
    ) -> Result<Entreprise, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO entreprises (client_id, legal_name, name, registration, email, phone, full_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ENTREPRISE_COLUMNS
        );

        sqlx::query_as::<_, Entreprise>(&sql)
            .bind(client_id)
            .bind(input.legal_name.as_deref())
            .bind(input.name.as_deref())
            .bind(input.registration.as_deref())
            .bind(input.email.as_deref())
            .bind(input.phone.as_deref())
            .bind(input.full_address.as_deref())
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::UniqueConstraintViolation("entreprise".to_string());
                    }
                }
                e.into()
            })
    }

    pub async fn update_entreprise<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &EntrepriseInput,
    ) -> Result<Entreprise, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE entreprises SET
                legal_name = COALESCE($2, legal_name),
                name = COALESCE($3, name),
                registration = COALESCE($4, registration),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                full_address = COALESCE($7, full_address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ENTREPRISE_COLUMNS
        );

        sqlx::query_as::<_, Entreprise>(&sql)
            .bind(id)
            .bind(input.legal_name.as_deref())
            .bind(input.name.as_deref())
            .bind(input.registration.as_deref())
            .bind(input.email.as_deref())
            .bind(input.phone.as_deref())
            .bind(input.full_address.as_deref())
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::EntrepriseNotFound)
    }
}
