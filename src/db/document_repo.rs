// src/db/document_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::document::{Document, DocumentKind, DocumentOwner},
};

const DOCUMENT_COLUMNS: &str = r#"
    id, kind, file_key, mime_type, label,
    client_id, person_id, entreprise_id, property_id, bail_id,
    uploaded_by, created_at
"#;

#[derive(Clone, Default)]
pub struct DocumentRepository;

impl DocumentRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        kind: DocumentKind,
        file_key: &str,
        mime_type: &str,
        label: Option<&str>,
        owner: DocumentOwner,
        uploaded_by: Option<Uuid>,
    ) -> Result<Document, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let [client_id, person_id, entreprise_id, property_id, bail_id] = owner.columns();

        let sql = format!(
            r#"
            INSERT INTO documents (
                kind, file_key, mime_type, label,
                client_id, person_id, entreprise_id, property_id, bail_id, uploaded_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            DOCUMENT_COLUMNS
        );

        let document = sqlx::query_as::<_, Document>(&sql)
            .bind(kind)
            .bind(file_key)
            .bind(mime_type)
            .bind(label)
            .bind(client_id)
            .bind(person_id)
            .bind(entreprise_id)
            .bind(property_id)
            .bind(bail_id)
            .bind(uploaded_by)
            .fetch_one(executor)
            .await?;

        Ok(document)
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Document>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM documents WHERE id = $1", DOCUMENT_COLUMNS);
        let document = sqlx::query_as::<_, Document>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(document)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn list_for_owner<'e, E>(
        &self,
        executor: E,
        owner: DocumentOwner,
    ) -> Result<Vec<Document>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let column = match owner {
            DocumentOwner::Client(_) => "client_id",
            DocumentOwner::Person(_) => "person_id",
            DocumentOwner::Entreprise(_) => "entreprise_id",
            DocumentOwner::Property(_) => "property_id",
            DocumentOwner::Bail(_) => "bail_id",
        };
        let id = owner.columns().into_iter().flatten().next();

        let sql = format!(
            "SELECT {} FROM documents WHERE {} = $1 ORDER BY created_at ASC",
            DOCUMENT_COLUMNS, column
        );
        let documents = sqlx::query_as::<_, Document>(&sql)
            .bind(id)
            .fetch_all(executor)
            .await?;

        Ok(documents)
    }

    /// Todos os documentos da árvore do cliente: nível cliente, pessoas e empresa.
    pub async fn list_for_client_tree<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<Vec<Document>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {} FROM documents
            WHERE client_id = $1
               OR person_id IN (SELECT id FROM persons WHERE client_id = $1)
               OR entreprise_id IN (SELECT id FROM entreprises WHERE client_id = $1)
            ORDER BY created_at ASC
            "#,
            DOCUMENT_COLUMNS
        );
        let documents = sqlx::query_as::<_, Document>(&sql)
            .bind(client_id)
            .fetch_all(executor)
            .await?;

        Ok(documents)
    }
}
