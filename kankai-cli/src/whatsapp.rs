//! WhatsApp delivery through the Twilio Messages REST API.

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use crate::config::WhatsAppSection;
use crate::notify::Notifier;

#[derive(Debug, Clone)]
struct Credentials {
    account_sid: String,
    auth_token: String,
    from: String,
    to: String,
}

/// Gateway that degrades to a no-op when credentials are missing or invalid.
#[derive(Debug, Clone)]
pub struct WhatsAppGateway {
    client: reqwest::Client,
    api_base: String,
    creds: Option<Credentials>,
}

impl WhatsAppGateway {
    pub fn from_config(cfg: &WhatsAppSection) -> Self {
        let creds = match (&cfg.account_sid, &cfg.auth_token, &cfg.from, &cfg.to) {
            (Some(sid), Some(token), Some(from), Some(to)) => {
                let from = strip_channel(from);
                let to = strip_channel(to);
                if is_valid_e164(from) && is_valid_e164(to) {
                    Some(Credentials {
                        account_sid: sid.clone(),
                        auth_token: token.clone(),
                        from: from.to_string(),
                        to: to.to_string(),
                    })
                } else {
                    warn!("whatsapp numbers must be E.164 (+1234567890); notifications disabled");
                    None
                }
            }
            _ => None,
        };

        Self {
            client: reqwest::Client::new(),
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            creds,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.creds.is_some()
    }

    fn messages_url(&self, account_sid: &str) -> String {
        format!("{}/2010-04-01/Accounts/{}/Messages.json", self.api_base, account_sid)
    }

    async fn deliver(&self, creds: &Credentials, text: &str) -> Result<()> {
        let from = format!("whatsapp:{}", creds.from);
        let to = format!("whatsapp:{}", creds.to);
        let form = [("From", from.as_str()), ("To", to.as_str()), ("Body", text)];

        let resp = self
            .client
            .post(self.messages_url(&creds.account_sid))
            .basic_auth(&creds.account_sid, Some(&creds.auth_token))
            .form(&form)
            .send()
            .await
            .context("twilio request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("twilio error: {status} {txt}");
        }
        Ok(())
    }
}

impl Notifier for WhatsAppGateway {
    async fn send(&self, text: &str) -> bool {
        let Some(creds) = &self.creds else {
            debug!("whatsapp gateway not configured; skipping notification");
            return false;
        };

        match self.deliver(creds, text).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "whatsapp delivery failed");
                false
            }
        }
    }
}

/// Accept numbers given with or without the `whatsapp:` prefix.
fn strip_channel(number: &str) -> &str {
    let number = number.trim();
    number.strip_prefix("whatsapp:").unwrap_or(number)
}

fn is_valid_e164(target: &str) -> bool {
    let Some(digits) = target.strip_prefix('+') else {
        return false;
    };
    digits.chars().all(|c| c.is_ascii_digit()) && (7..=15).contains(&digits.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_section() -> WhatsAppSection {
        WhatsAppSection {
            account_sid: Some("AC123".to_string()),
            auth_token: Some("token".to_string()),
            from: Some("whatsapp:+14155238886".to_string()),
            to: Some("+15551234567".to_string()),
            ..WhatsAppSection::default()
        }
    }

    #[test]
    fn e164_validation() {
        assert!(is_valid_e164("+15551234567"));
        assert!(!is_valid_e164("15551234567"));
        assert!(!is_valid_e164("+1555-123"));
        assert!(!is_valid_e164("+123"));
    }

    #[test]
    fn complete_section_is_configured() {
        let gw = WhatsAppGateway::from_config(&full_section());
        assert!(gw.is_configured());
        assert_eq!(
            gw.messages_url("AC123"),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn invalid_number_disables_gateway() {
        let mut section = full_section();
        section.to = Some("not-a-number".to_string());
        assert!(!WhatsAppGateway::from_config(&section).is_configured());
    }

    #[tokio::test]
    async fn unconfigured_send_reports_failure() {
        let gw = WhatsAppGateway::from_config(&WhatsAppSection::default());
        assert!(!gw.is_configured());
        assert!(!gw.send("hello").await);
    }
}
