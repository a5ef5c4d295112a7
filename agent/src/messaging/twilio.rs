//! WhatsApp delivery through the Twilio REST API

use async_trait::async_trait;
use content_flow::{DeliveryError, Messenger, OutboundMessage};
use serde::Deserialize;

use crate::config::TwilioConfig;
use crate::http::{endpoint, preview};

const WHATSAPP_PREFIX: &str = "whatsapp:";
const INVALID_FROM_CODE: i64 = 63007;

const INVALID_SENDER_MESSAGE: &str = "Twilio error 63007: Invalid WhatsApp 'From' number. \
Use the WhatsApp Sandbox number (e.g. +14155238886) from Twilio Console → Messaging → Try it out → \
Send a WhatsApp message, or an approved WhatsApp Sender. Set it as TWILIO_WHATSAPP_NUMBER.";

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Twilio WhatsApp messenger
pub struct TwilioMessenger {
    http_client: reqwest::Client,
    base_url: String,
    account_sid: Option<String>,
    auth_token: Option<String>,
    from: Option<String>,
}

impl TwilioMessenger {
    pub fn from_config(config: &TwilioConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from: config.whatsapp_number.clone(),
        }
    }

    async fn send_one(
        &self,
        url: url::Url,
        (sid, token): (&str, &str),
        from: &str,
        to: &str,
        message: &OutboundMessage,
    ) -> Result<String, DeliveryError> {
        let mut form = vec![
            ("To", to),
            ("From", from),
            ("Body", message.text.as_deref().unwrap_or("")),
        ];
        if let Some(media) = message.image.as_deref() {
            form.push(("MediaUrl", media));
        }

        let response = self
            .http_client
            .post(url)
            .basic_auth(sid, Some(token))
            .form(&form)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(provider_error(status.as_u16(), &body));
        }

        let resource: MessageResource = serde_json::from_str(&body).map_err(|e| {
            DeliveryError::Transport(format!("Unexpected Twilio response: {}", e))
        })?;
        Ok(resource.sid)
    }
}

fn with_prefix(number: &str) -> String {
    if number.starts_with(WHATSAPP_PREFIX) {
        number.to_string()
    } else {
        format!("{}{}", WHATSAPP_PREFIX, number)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn provider_error(status: u16, body: &str) -> DeliveryError {
    match serde_json::from_str::<TwilioErrorBody>(body) {
        Ok(TwilioErrorBody {
            code: Some(INVALID_FROM_CODE),
            ..
        }) => DeliveryError::InvalidSender(INVALID_SENDER_MESSAGE.to_string()),
        Ok(TwilioErrorBody {
            code: Some(code),
            message,
        }) => DeliveryError::Provider {
            code,
            message: message.unwrap_or_else(|| format!("HTTP {}", status)),
        },
        _ => DeliveryError::Provider {
            code: i64::from(status),
            message: preview(body, 300).to_string(),
        },
    }
}

#[async_trait]
impl Messenger for TwilioMessenger {
    async fn send(
        &self,
        destination: &str,
        messages: &[OutboundMessage],
    ) -> Result<Vec<String>, DeliveryError> {
        let (Some(sid), Some(token)) = (non_empty(&self.account_sid), non_empty(&self.auth_token))
        else {
            return Err(DeliveryError::NotConfigured(
                "TWILIO_ACCOUNT_SID and TWILIO_AUTH_TOKEN must be set".to_string(),
            ));
        };
        let Some(from) = non_empty(&self.from) else {
            return Err(DeliveryError::NotConfigured(
                "TWILIO_WHATSAPP_NUMBER must be set".to_string(),
            ));
        };

        let url = endpoint(
            &self.base_url,
            &format!("2010-04-01/Accounts/{}/Messages.json", sid),
        )
        .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        let from = with_prefix(from);
        let to = with_prefix(destination);

        let mut sids = Vec::with_capacity(messages.len());
        for message in messages {
            let message_sid = self
                .send_one(url.clone(), (sid, token), &from, &to, message)
                .await?;
            tracing::info!("WhatsApp message sent: {}", message_sid);
            sids.push(message_sid);
        }
        Ok(sids)
    }
}
