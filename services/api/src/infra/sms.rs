use std::time::Duration;

use anyhow::Context as _;

use crate::domain::repository::SmsSender;

const KAVENEGAR_BASE_URL: &str = "https://api.kavenegar.com/v1";

/// Per-request timeout for the SMS gateway.
pub const SMS_TIMEOUT: Duration = Duration::from_secs(10);

/// Text of the verification SMS.
pub fn otp_message(code: &str) -> String {
    format!("کد تایید مناره: {code}")
}

/// Kavenegar REST client. Without an API key every send fails.
#[derive(Clone)]
pub struct KavenegarSms {
    client: reqwest::Client,
    api_key: Option<String>,
    sender: String,
    base_url: String,
}

impl KavenegarSms {
    pub fn new(api_key: Option<String>, sender: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SMS_TIMEOUT)
            .build()
            .context("build sms http client")?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            sender,
            base_url: KAVENEGAR_BASE_URL.to_owned(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn send_url(&self, api_key: &str) -> String {
        format!("{}/{api_key}/sms/send.json", self.base_url)
    }
}

impl SmsSender for KavenegarSms {
    async fn send_code(&self, phone_number: &str, code: &str) -> anyhow::Result<()> {
        let api_key = self
            .api_key
            .as_deref()
            .context("sms gateway is not configured")?;
        let message = otp_message(code);
        let params = [
            ("receptor", phone_number),
            ("sender", self.sender.as_str()),
            ("message", message.as_str()),
        ];
        let response = self
            .client
            .post(self.send_url(api_key))
            .form(&params)
            .send()
            .await
            .context("send sms request")?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("sms gateway returned {status}");
        }
        tracing::debug!(receptor = phone_number, "sms accepted by gateway");
        Ok(())
    }
}
