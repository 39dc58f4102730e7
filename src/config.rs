// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        BailRepository, ClientRepository, DocumentRepository, IntakeRepository, NotaireRepository,
        NotificationRepository, PgCompletionStore, PropertyRepository, UserRepository,
    },
    services::{
        auth::AuthService,
        bail_service::BailService,
        client_service::ClientService,
        completion_service::CompletionService,
        document_service::DocumentService,
        intake_service::IntakeService,
        mailer::{HttpMailer, HttpMailerOptions, LogMailer, Mailer},
        notaire_service::NotaireService,
        notification_service::NotificationService,
        property_service::PropertyService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MAIL_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub app_base_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub mail: Option<HttpMailerOptions>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let app_base_url = env::var("APP_BASE_URL").context("APP_BASE_URL deve ser definida")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {}", raw))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        // Sem chave, os e-mails vão só para o log
        let mail = match env::var("MAIL_API_KEY") {
            Ok(api_key) if !api_key.is_empty() => Some(HttpMailerOptions {
                api_url: env::var("MAIL_API_URL").unwrap_or_else(|_| DEFAULT_MAIL_API_URL.to_string()),
                api_key,
                from: env::var("MAIL_FROM").context("MAIL_FROM deve ser definido quando MAIL_API_KEY existe")?,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            app_base_url,
            bind_addr,
            db_max_connections,
            mail,
        })
    }

    pub fn mailer(&self) -> Arc<dyn Mailer> {
        match &self.mail {
            Some(options) => Arc::new(HttpMailer::new(options.clone())),
            None => {
                tracing::warn!("MAIL_API_KEY ausente: e-mails de status só serão registrados no log");
                Arc::new(LogMailer)
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub completion_service: CompletionService,
    pub client_service: ClientService,
    pub property_service: PropertyService,
    pub bail_service: BailService,
    pub document_service: DocumentService,
    pub intake_service: IntakeService,
    pub notaire_service: NotaireService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::build(db_pool, config, config.mailer()))
    }

    // --- Monta o gráfico de dependências ---
    pub fn build(db_pool: PgPool, config: &Config, mailer: Arc<dyn Mailer>) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let auth_service = AuthService::new(user_repo.clone(), config.jwt_secret.clone());

        let store = Arc::new(PgCompletionStore::new(db_pool.clone()));
        let completion_service = CompletionService::new(store, mailer, config.app_base_url.clone());

        let clients = ClientRepository::new();
        let properties = PropertyRepository::new();
        let bails = BailRepository::new();
        let notifications = NotificationRepository::new();

        let client_service = ClientService::new(clients.clone(), completion_service.clone());
        let property_service = PropertyService::new(properties.clone(), clients.clone(), completion_service.clone());
        let bail_service = BailService::new(
            bails.clone(),
            properties.clone(),
            clients.clone(),
            notifications.clone(),
            completion_service.clone(),
        );
        let document_service = DocumentService::new(
            DocumentRepository::new(),
            clients.clone(),
            properties.clone(),
            bails.clone(),
            completion_service.clone(),
        );
        let intake_service = IntakeService::new(
            IntakeRepository::new(),
            clients,
            properties,
            bails.clone(),
            notifications.clone(),
            completion_service.clone(),
        );
        let notaire_service = NotaireService::new(NotaireRepository::new(), bails, user_repo, notifications.clone());
        let notification_service = NotificationService::new(notifications);

        Self {
            db_pool,
            auth_service,
            completion_service,
            client_service,
            property_service,
            bail_service,
            document_service,
            intake_service,
            notaire_service,
            notification_service,
        }
    }
}
