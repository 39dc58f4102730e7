// src/services/mailer.rs

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::models::client::{CompletionStatus, ProfilType};

/// E-mail de mudança de status enviado ao dono do dossiê.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChangeEmail {
    pub recipient: String,
    pub entity_name: String,
    pub old_status: CompletionStatus,
    pub new_status: CompletionStatus,
    pub dashboard_url: String,
    pub profil_type: ProfilType,
}

impl StatusChangeEmail {
    pub fn subject(&self) -> String {
        match self.new_status {
            CompletionStatus::PendingCheck => format!("{} : dossier complet, en cours de vérification", self.entity_name),
            CompletionStatus::Completed => format!("{} : dossier validé", self.entity_name),
            _ => format!("{} : votre dossier a été mis à jour", self.entity_name),
        }
    }

    pub fn body(&self) -> String {
        let role = match self.profil_type {
            ProfilType::Proprietaire => "propriétaire",
            ProfilType::Locataire => "locataire",
            ProfilType::Lead => "contact",
        };

        format!(
            "Bonjour,\n\nLe statut de votre dossier {} ({}) est passé de {} à {}.\n\nSuivez son avancement ici : {}\n",
            self.entity_name,
            role,
            self.old_status.as_str(),
            self.new_status.as_str(),
            self.dashboard_url,
        )
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_status_change(&self, email: &StatusChangeEmail) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct HttpMailerOptions {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

/// Envia pela API HTTP de um provedor transacional.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    options: HttpMailerOptions,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(options: HttpMailerOptions) -> Self {
        Self {
            options,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_status_change(&self, email: &StatusChangeEmail) -> Result<()> {
        let payload = json!({
            "from": self.options.from,
            "to": [email.recipient],
            "subject": email.subject(),
            "text": email.body(),
        });

        let response = self
            .client
            .post(&self.options.api_url)
            .bearer_auth(&self.options.api_key)
            .json(&payload)
            .send()
            .await
            .context("falha ao contactar a API de e-mail")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            bail!("API de e-mail respondeu {}: {}", status, error_body);
        }

        Ok(())
    }
}

/// Usado quando nenhuma chave de API está configurada: só registra no log.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_status_change(&self, email: &StatusChangeEmail) -> Result<()> {
        tracing::info!(
            recipient = %email.recipient,
            subject = %email.subject(),
            "e-mail de status (não enviado, sem provedor configurado)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_mentions_both_statuses_and_the_link() {
        let email = StatusChangeEmail {
            recipient: "camille@example.fr".into(),
            entity_name: "Camille Martin".into(),
            old_status: CompletionStatus::Partial,
            new_status: CompletionStatus::PendingCheck,
            dashboard_url: "https://app.bailnotarie.fr/clients/1".into(),
            profil_type: ProfilType::Locataire,
        };

        let body = email.body();
        assert!(body.contains("PARTIAL"));
        assert!(body.contains("PENDING_CHECK"));
        assert!(body.contains("https://app.bailnotarie.fr/clients/1"));
        assert!(email.subject().contains("vérification"));
    }
}
