use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::state::ensure_kankai_home;

pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub monitor: MonitorSection,
    #[serde(default)]
    pub whatsapp: WhatsAppSection,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSection {
    pub enabled: bool,
    /// Seconds between delay scans.
    pub interval_secs: u64,
}

/// Credentials for the WhatsApp gateway. All absent by default, in which
/// case notifications are skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppSection {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    /// Sender number (E.164), e.g. "+14155238886"
    pub from: Option<String>,
    /// Recipient number (E.164)
    pub to: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// IANA timezone for report timestamps.
    pub timezone: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_base() -> String {
    TWILIO_API_BASE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            monitor: MonitorSection::default(),
            whatsapp: WhatsAppSection::default(),
            report: ReportSection::default(),
        }
    }
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
        }
    }
}

impl Default for WhatsAppSection {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from: None,
            to: None,
            api_base: default_api_base(),
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

impl MonitorSection {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl WhatsAppSection {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.account_sid.is_none() {
            missing.push("account_sid");
        }
        if self.auth_token.is_none() {
            missing.push("auth_token");
        }
        if self.from.is_none() {
            missing.push("from");
        }
        if self.to.is_none() {
            missing.push("to");
        }
        missing
    }
}

impl ReportSection {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| anyhow!("invalid timezone: {}", self.timezone))
    }
}

/// Variables that override `[whatsapp]` keys, in field order.
pub const WHATSAPP_ENV_VARS: [&str; 4] = [
    "KANKAI_WHATSAPP_ACCOUNT_SID",
    "KANKAI_WHATSAPP_AUTH_TOKEN",
    "KANKAI_WHATSAPP_FROM",
    "KANKAI_WHATSAPP_TO",
];

impl Config {
    /// Fill WhatsApp secrets from `KANKAI_WHATSAPP_*` variables.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let wa = &mut self.whatsapp;
        let slots = [&mut wa.account_sid, &mut wa.auth_token, &mut wa.from, &mut wa.to];
        for (var, slot) in WHATSAPP_ENV_VARS.into_iter().zip(slots) {
            if let Some(v) = lookup(var).filter(|v| !v.trim().is_empty()) {
                *slot = Some(v.trim().to_string());
            }
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_kankai_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    let mut cfg = if p.exists() {
        let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
        toml::from_str(&s).context("parse config.toml")?
    } else {
        Config::default()
    };
    cfg.apply_env_overrides(|k| std::env::var(k).ok());
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
    } else {
        save_config(&Config::default())?;
        println!("Wrote {}", p.display());
    }
    println!("\n{}", secrets_hint());
    Ok(())
}

/// Where WhatsApp credentials can come from, for `init-config`.
fn secrets_hint() -> String {
    let mut hint = String::from(
        "WhatsApp notifications stay off until [whatsapp] account_sid, auth_token, from and to are set.\n\
         Secrets can be kept out of the file with environment variables:",
    );
    for var in WHATSAPP_ENV_VARS {
        hint.push_str("\n  ");
        hint.push_str(var);
    }
    hint.push_str("\nRun `kankai config-check` to see what is still missing.");
    hint
}

pub fn config_check(cfg: &Config) -> Result<()> {
    println!("Kankai config ({}):\n", config_path()?.display());
    println!("- log_level: {}", cfg.log_level);
    println!(
        "- monitor: {} (every {}s)",
        if cfg.monitor.enabled { "enabled" } else { "disabled" },
        cfg.monitor.interval().as_secs()
    );
    println!("- report.timezone: {}", cfg.report.timezone);
    println!("- whatsapp.api_base: {}", cfg.whatsapp.api_base);
    println!(
        "- whatsapp.account_sid: {}",
        cfg.whatsapp.account_sid.as_deref().map(redact).unwrap_or_else(|| "<not set>".into())
    );
    println!(
        "- whatsapp.auth_token: {}",
        if cfg.whatsapp.auth_token.is_some() { "<set>" } else { "<not set>" }
    );
    println!("- whatsapp.from: {}", cfg.whatsapp.from.as_deref().unwrap_or("<not set>"));
    println!("- whatsapp.to: {}", cfg.whatsapp.to.as_deref().unwrap_or("<not set>"));

    if let Err(e) = cfg.report.tz() {
        println!("\nWarning: {e}; reports will fail until this is fixed.");
    }

    let missing = cfg.whatsapp.missing_fields();
    if !missing.is_empty() {
        println!("\nNotifications are disabled. Missing: {}", missing.join(", "));
        println!("Set ~/.kankai/config.toml:");
        println!("[whatsapp]");
        println!("account_sid = \"AC...\"");
        println!("auth_token = \"...\"");
        println!("from = \"+14155238886\"");
        println!("to = \"+15551234567\"");
        println!("\nor export KANKAI_WHATSAPP_ACCOUNT_SID / _AUTH_TOKEN / _FROM / _TO.");
    }

    Ok(())
}

/// Keep the first four characters of an identifier.
fn redact(s: &str) -> String {
    let head: String = s.chars().take(4).collect();
    format!("{head}…")
}
