// BookWise Contact Service
// Delivers contact-form messages through the EmailJS REST endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::types::contact::ContactMessage;
use crate::types::errors::ContactError;
use crate::types::settings::ContactSettings;

/// Request body expected by `POST /api/v1.0/email/send`.
#[derive(Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Serialize)]
struct TemplateParams<'a> {
    from_name: &'a str,
    from_email: &'a str,
    subject: &'a str,
    message: &'a str,
}

#[derive(Clone)]
pub struct ContactService {
    client: Client,
    settings: ContactSettings,
}

impl ContactService {
    pub fn new(settings: ContactSettings, timeout_secs: u64) -> Result<Self, ContactError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| ContactError::DeliveryFailed(e.to_string()))?;
        Ok(Self { client, settings })
    }

    /// Names of the credentials that are still blank.
    fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.settings.service_id.trim().is_empty() {
            missing.push("serviceId");
        }
        if self.settings.template_id.trim().is_empty() {
            missing.push("templateId");
        }
        if self.settings.public_key.trim().is_empty() {
            missing.push("publicKey");
        }
        missing
    }

    pub fn is_configured(&self) -> bool {
        self.missing_credentials().is_empty()
    }

    /// Checks the form fields without sending anything.
    pub fn validate(message: &ContactMessage) -> Result<(), ContactError> {
        if message.name.trim().is_empty() {
            return Err(ContactError::InvalidField("name is required".to_string()));
        }
        let email = message.email.trim();
        match email.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => {}
            _ => {
                return Err(ContactError::InvalidField(format!(
                    "'{}' is not an email address",
                    email
                )))
            }
        }
        if message.message.trim().is_empty() {
            return Err(ContactError::InvalidField("message is required".to_string()));
        }
        Ok(())
    }

    pub async fn send(&self, message: &ContactMessage) -> Result<(), ContactError> {
        Self::validate(message)?;

        let missing = self.missing_credentials();
        if !missing.is_empty() {
            return Err(ContactError::NotConfigured(missing.join(", ")));
        }

        let body = EmailJsRequest {
            service_id: self.settings.service_id.trim(),
            template_id: self.settings.template_id.trim(),
            user_id: self.settings.public_key.trim(),
            template_params: TemplateParams {
                from_name: message.name.trim(),
                from_email: message.email.trim(),
                subject: message.subject.trim(),
                message: message.message.trim(),
            },
        };

        let response = self
            .client
            .post(&self.settings.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("contact delivery failed: {}", e);
                ContactError::DeliveryFailed(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("contact message sent");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        tracing::error!("contact delivery rejected: status={}, body={}", status, text);
        Err(ContactError::DeliveryFailed(if text.trim().is_empty() {
            format!("status {}", status.as_u16())
        } else {
            text.trim().to_string()
        }))
    }
}
