use std::{env, time::Duration};

use secrecy::{ExposeSecret, SecretString};

use crate::{
    errors::{AppError, AppResult},
    services::{
        campus_clock::CampusClock,
        mastery::{LapsePolicy, ReviewIntervals, ReviewPolicy},
    },
};

const DEV_JWT_SECRET: &str = "dev_secret_key_change_in_production";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub cors_allowed_origin: Option<String>,
    pub review_policy: ReviewPolicy,
    pub campus_clock: CampusClock,
    pub scheduler_enabled: bool,
    pub scheduler_retry_delay: Duration,
    pub schedule_retention_days: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "woodie-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok(),
            review_policy: review_policy_from_env(),
            campus_clock: campus_clock_from_env(),
            scheduler_enabled: env::var("SCHEDULER_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            scheduler_retry_delay: Duration::from_secs(
                env::var("SCHEDULER_RETRY_DELAY_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
            ),
            schedule_retention_days: env::var("SCHEDULE_RETENTION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|days: &i64| *days > 0)
                .unwrap_or(30),
        }
    }

    /// Rejects settings that are only acceptable in development.
    pub fn validate_for_production(&self) -> AppResult<()> {
        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEV_JWT_SECRET {
            return Err(AppError::InternalError(
                "JWT_SECRET is using the default value".to_string(),
            ));
        }

        if jwt_secret.len() < 32 {
            return Err(AppError::InternalError(format!(
                "JWT_SECRET is too short ({}). Must be at least 32 characters",
                jwt_secret.len()
            )));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "woodie-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            cors_allowed_origin: None,
            review_policy: ReviewPolicy::default(),
            campus_clock: CampusClock::default(),
            scheduler_enabled: false,
            scheduler_retry_delay: Duration::from_millis(10),
            schedule_retention_days: 30,
        }
    }
}

fn review_policy_from_env() -> ReviewPolicy {
    let intervals = match env::var("REVIEW_INTERVAL_DAYS") {
        Ok(raw) => ReviewIntervals::parse(&raw).unwrap_or_else(|e| {
            log::warn!("Ignoring REVIEW_INTERVAL_DAYS: {}", e);
            ReviewIntervals::default()
        }),
        Err(_) => ReviewIntervals::default(),
    };

    let lapse = match env::var("REVIEW_LAPSE_POLICY") {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            log::warn!("Ignoring REVIEW_LAPSE_POLICY: {}", e);
            LapsePolicy::default()
        }),
        Err(_) => LapsePolicy::default(),
    };

    ReviewPolicy::new(intervals, lapse)
}

fn campus_clock_from_env() -> CampusClock {
    let hours = env::var("CAMPUS_UTC_OFFSET_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or(9);

    CampusClock::from_offset_hours(hours).unwrap_or_else(|| {
        log::warn!("CAMPUS_UTC_OFFSET_HOURS={} is out of range, using UTC", hours);
        CampusClock::default()
    })
}
