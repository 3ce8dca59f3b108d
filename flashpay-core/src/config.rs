//! Configuration management
//!
//! Settings live in `settings.json` inside the FlashPay directory:
//! ```json
//! {
//!   "wallet": { "starterBalance": 100000, "activationBonus": 100000, "enforceActivation": false },
//!   "activation": { "accountNumber": "9163110673", "accountName": "Abdullahi", "bankName": "Opay", "fee": 6000 },
//!   "settlement": { "delayMs": 3000, "timeoutMs": null }
//! }
//! ```
//! Every field is optional. Unknown fields are kept when saving.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::PaymentRail;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    wallet: WalletSettings,
    #[serde(default)]
    activation: ActivationSettings,
    #[serde(default)]
    settlement: SettlementSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    starter_balance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    activation_bonus: Option<Decimal>,
    #[serde(default)]
    enforce_activation: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fee: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettlementSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,
}

/// FlashPay configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Balance a user gets on login
    pub starter_balance: Decimal,
    /// Balance a user has after paying the activation fee
    pub activation_bonus: Decimal,
    /// Refuse transfers from wallets that have not been activated
    pub enforce_activation: bool,
    pub payment_rail: PaymentRail,
    pub settlement_delay: Duration,
    /// Fail a pending transfer whose settlement takes longer than this
    pub settlement_timeout: Option<Duration>,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(SettingsFile::default())
    }
}

impl Config {
    /// Load config from the FlashPay directory
    ///
    /// Environment overrides (for CI/testing):
    /// - `FLASHPAY_ENFORCE_ACTIVATION` (true/false)
    /// - `FLASHPAY_SETTLEMENT_DELAY_MS`
    pub fn load(flashpay_dir: &Path) -> Result<Self> {
        let settings_path = flashpay_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let mut config = Self::from_settings(raw);

        match std::env::var("FLASHPAY_ENFORCE_ACTIVATION").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => config.enforce_activation = true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => config.enforce_activation = false,
            _ => {}
        }

        if let Some(delay_ms) = std::env::var("FLASHPAY_SETTLEMENT_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.settlement_delay = Duration::from_millis(delay_ms);
        }

        Ok(config)
    }

    fn from_settings(raw: SettingsFile) -> Self {
        let default_rail = PaymentRail::default();
        let payment_rail = PaymentRail {
            account_number: raw
                .activation
                .account_number
                .clone()
                .unwrap_or(default_rail.account_number),
            account_name: raw
                .activation
                .account_name
                .clone()
                .unwrap_or(default_rail.account_name),
            bank_name: raw
                .activation
                .bank_name
                .clone()
                .unwrap_or(default_rail.bank_name),
            fee: raw.activation.fee.unwrap_or(default_rail.fee),
        };

        Self {
            starter_balance: raw
                .wallet
                .starter_balance
                .filter(|b| *b >= Decimal::ZERO)
                .unwrap_or(Decimal::new(100_000, 0)),
            activation_bonus: raw
                .wallet
                .activation_bonus
                .filter(|b| *b >= Decimal::ZERO)
                .unwrap_or(Decimal::new(100_000, 0)),
            enforce_activation: raw.wallet.enforce_activation,
            payment_rail,
            settlement_delay: Duration::from_millis(raw.settlement.delay_ms.unwrap_or(3000)),
            settlement_timeout: raw.settlement.timeout_ms.map(Duration::from_millis),
            _raw_settings: raw,
        }
    }

    /// Save config to the FlashPay directory
    /// Preserves settings this crate doesn't manage
    pub fn save(&self, flashpay_dir: &Path) -> Result<()> {
        let settings_path = flashpay_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            self._raw_settings.clone()
        };

        settings.wallet = WalletSettings {
            starter_balance: Some(self.starter_balance),
            activation_bonus: Some(self.activation_bonus),
            enforce_activation: self.enforce_activation,
        };
        settings.activation = ActivationSettings {
            account_number: Some(self.payment_rail.account_number.clone()),
            account_name: Some(self.payment_rail.account_name.clone()),
            bank_name: Some(self.payment_rail.bank_name.clone()),
            fee: Some(self.payment_rail.fee),
        };
        settings.settlement = SettlementSettings {
            delay_ms: Some(self.settlement_delay.as_millis() as u64),
            timeout_ms: self.settlement_timeout.map(|t| t.as_millis() as u64),
        };

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.starter_balance, Decimal::new(100_000, 0));
        assert_eq!(config.activation_bonus, Decimal::new(100_000, 0));
        assert!(!config.enforce_activation);
        assert_eq!(config.payment_rail, PaymentRail::default());
        assert_eq!(config.settlement_delay, Duration::from_millis(3000));
        assert!(config.settlement_timeout.is_none());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.payment_rail.fee, Decimal::new(6000, 0));
    }

    #[test]
    fn test_load_partial_settings() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{
                "wallet": { "activationBonus": 50000, "enforceActivation": true },
                "activation": { "fee": "7500.50" },
                "settlement": { "timeoutMs": 10000 }
            }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.activation_bonus, Decimal::new(50000, 0));
        assert_eq!(config.starter_balance, Decimal::new(100_000, 0));
        assert!(config.enforce_activation);
        assert_eq!(config.payment_rail.fee, Decimal::new(750050, 2));
        assert_eq!(config.payment_rail.bank_name, "Opay");
        assert_eq!(config.settlement_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_garbage_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.starter_balance, Decimal::new(100_000, 0));
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "theme": "dark", "wallet": { "starterBalance": 10 } }"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.activation_bonus = Decimal::new(250, 0);
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("settings.json")).unwrap())
                .unwrap();
        assert_eq!(saved["theme"], "dark");

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.starter_balance, Decimal::new(10, 0));
        assert_eq!(reloaded.activation_bonus, Decimal::new(250, 0));
    }
}
