//! Best-effort winner notification.
//!
//! The draw is the source of truth; a failed or disabled notification is
//! logged and reported but never undoes a persisted winner row.

use log::{error, info, warn};

use crate::config::SmsConfig;

pub trait Notifier: Send + Sync {
    /// Returns whether the message went out. Callers must not treat
    /// `false` as a reason to roll anything back.
    fn notify(&self, contact: &str, event_name: &str, prize_name: &str) -> bool;
}

fn winner_message(event_name: &str, prize_name: &str) -> String {
    format!(
        "Congratulations! You have won the {} in the {} Lucky Draw! Contact admin to claim your prize.",
        prize_name, event_name
    )
}

/// Twilio-backed SMS notifier.
pub struct SmsNotifier {
    config: SmsConfig,
}

impl SmsNotifier {
    pub fn new(config: SmsConfig) -> SmsNotifier {
        SmsNotifier { config }
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.config.account_sid
        )
    }
}

impl Notifier for SmsNotifier {
    fn notify(&self, contact: &str, event_name: &str, prize_name: &str) -> bool {
        let body = winner_message(event_name, prize_name);
        // Built per call: notify runs on a blocking worker thread and
        // draws are rare enough that client reuse buys nothing.
        let client = match reqwest::blocking::Client::builder().build() {
            Ok(client) => client,
            Err(e) => {
                error!("could not build SMS client: {}", e);
                return false;
            }
        };
        let result = client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", contact),
                ("From", self.config.from_number.as_str()),
                ("Body", body.as_str()),
            ])
            .send()
            .and_then(|response| response.error_for_status());
        match result {
            Ok(_) => {
                info!("winner SMS sent to {}", contact);
                true
            }
            Err(e) => {
                error!("failed to send winner SMS to {}: {}", contact, e);
                false
            }
        }
    }
}

/// Stand-in when no SMS credentials are configured.
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn notify(&self, contact: &str, _event_name: &str, _prize_name: &str) -> bool {
        warn!("SMS disabled, no notification sent to {}", contact);
        false
    }
}
