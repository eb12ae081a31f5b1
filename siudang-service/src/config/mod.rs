use rust_decimal::Decimal;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

use crate::reports::{AccrualInputs, AdjustmentMode};

#[derive(Debug, Clone)]
pub struct SiudangConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub store: StoreConfig,
    pub email: EmailConfig,
    pub session: SessionConfig,
    pub otp: OtpConfig,
    pub adjustments: AdjustmentConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Hosted PostgREST endpoint (Supabase).
    Postgrest,
    /// Direct PostgreSQL connection.
    Postgres,
    /// Process-local tables, lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<Secret<String>>,
    pub database_url: Option<Secret<String>>,
    pub max_connections: u32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Sender account; `None` only in dev, where codes are logged instead.
    pub sender: Option<String>,
    pub app_password: Secret<String>,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub inactivity_hours: i64,
    pub secure_cookie: bool,
}

#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub expiry_seconds: i64,
    pub max_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct AdjustmentConfig {
    pub mode: AdjustmentMode,
    pub accrued_wages: Decimal,
    pub supplies_used: Decimal,
}

impl AdjustmentConfig {
    pub fn accruals(&self) -> AccrualInputs {
        AccrualInputs {
            accrued_wages: self.accrued_wages,
            supplies_used: self.supplies_used,
        }
    }
}

impl SiudangConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let backend: StoreBackend = get_env_parsed("STORE_BACKEND", Some("postgrest"), is_prod)?;
        let store = StoreConfig {
            backend,
            supabase_url: match backend {
                StoreBackend::Postgrest => Some(get_env("SUPABASE_URL", None, is_prod)?),
                _ => None,
            },
            supabase_key: match backend {
                StoreBackend::Postgrest => Some(Secret::new(get_env("SUPABASE_KEY", None, is_prod)?)),
                _ => None,
            },
            database_url: match backend {
                StoreBackend::Postgres => Some(Secret::new(get_env("DATABASE_URL", None, is_prod)?)),
                _ => None,
            },
            max_connections: get_env_parsed("DATABASE_MAX_CONNECTIONS", Some("5"), is_prod)?,
            timeout_seconds: get_env_parsed("STORE_TIMEOUT_SECONDS", Some("10"), is_prod)?,
        };

        let email = EmailConfig {
            smtp_host: get_env("SMTP_HOST", Some("smtp.gmail.com"), is_prod)?,
            smtp_port: get_env_parsed("SMTP_PORT", Some("465"), is_prod)?,
            sender: match get_env("EMAIL_SENDER", Some(""), is_prod)? {
                sender if sender.trim().is_empty() => None,
                sender => Some(sender),
            },
            app_password: Secret::new(get_env("EMAIL_APP_PASSWORD", Some(""), is_prod)?),
        };

        let config = SiudangConfig {
            common: common_config,
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("siudang-service"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            store,
            email,
            session: SessionConfig {
                inactivity_hours: get_env_parsed("SESSION_INACTIVITY_HOURS", Some("24"), is_prod)?,
                secure_cookie: get_env_parsed("SESSION_SECURE_COOKIE", Some("false"), is_prod)?,
            },
            otp: OtpConfig {
                expiry_seconds: get_env_parsed("OTP_EXPIRY_SECONDS", Some("300"), is_prod)?,
                max_attempts: get_env_parsed("OTP_MAX_ATTEMPTS", Some("5"), is_prod)?,
            },
            adjustments: AdjustmentConfig {
                mode: get_env_parsed("ADJUSTMENT_MODE", Some("fixed"), is_prod)?,
                accrued_wages: get_env_parsed("ADJUSTMENT_ACCRUED_WAGES", Some("0"), is_prod)?,
                supplies_used: get_env_parsed("ADJUSTMENT_SUPPLIES_USED", Some("0"), is_prod)?,
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Local defaults: in-memory store, no mail relay, fixed adjustments.
    pub fn development() -> Self {
        Self {
            common: core_config::Config::default(),
            environment: Environment::Dev,
            service_name: "siudang-service".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
            store: StoreConfig {
                backend: StoreBackend::Memory,
                supabase_url: None,
                supabase_key: None,
                database_url: None,
                max_connections: 5,
                timeout_seconds: 10,
            },
            email: EmailConfig {
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 465,
                sender: None,
                app_password: Secret::new(String::new()),
            },
            session: SessionConfig {
                inactivity_hours: 24,
                secure_cookie: false,
            },
            otp: OtpConfig {
                expiry_seconds: 300,
                max_attempts: 5,
            },
            adjustments: AdjustmentConfig {
                mode: AdjustmentMode::Fixed,
                accrued_wages: Decimal::ZERO,
                supplies_used: Decimal::ZERO,
            },
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }
        if self.otp.expiry_seconds <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OTP_EXPIRY_SECONDS must be positive"
            )));
        }
        if self.otp.max_attempts == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OTP_MAX_ATTEMPTS must be at least 1"
            )));
        }
        if self.session.inactivity_hours <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "SESSION_INACTIVITY_HOURS must be positive"
            )));
        }
        if self.adjustments.accrued_wages.is_sign_negative()
            || self.adjustments.supplies_used.is_sign_negative()
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Adjustment accruals must not be negative"
            )));
        }
        if self.environment == Environment::Prod {
            if self.email.sender.is_none() {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "EMAIL_SENDER is required in production"
                )));
            }
            if self.store.backend == StoreBackend::Memory {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "In-memory store not allowed in production"
                )));
            }
            if !self.session.secure_cookie {
                tracing::warn!("Session cookie is not marked Secure in production");
            }
        }
        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn get_env_parsed<T>(key: &str, default: Option<&str>, is_prod: bool) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key, default, is_prod)?
        .trim()
        .parse()
        .map_err(|e: T::Err| AppError::ConfigError(anyhow::anyhow!("{} is invalid: {}", key, e)))
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgrest" | "supabase" => Ok(StoreBackend::Postgrest),
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}
