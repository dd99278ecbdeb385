//! CLI configuration: built-in defaults, overridden by command-line flags
//! or their `ECOMENTOR_*` environment variables.

use std::time::Duration;

use ecomentor_app::AppSettings;
use ecomentor_app::notify::Permission;
use ecomentor_core::Platform;

/// Runtime configuration for the `ecomentor` binary.
///
/// Every field has a default so the CLI runs against a local backend
/// without any environment set. The environment is read by `clap` alone;
/// see `GlobalArgs` in `main.rs`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (default: `"http://localhost:8000"`).
    pub api_url: String,

    /// Remote push gateway endpoint.
    pub gateway_url: String,

    /// Push environment; `"off"` disables remote push entirely.
    pub push_env: String,

    /// User id attached to ratings and analytics queries.
    pub user_id: i64,

    pub platform: Platform,

    /// Push token this device reports, if it has one.
    pub device_push_token: Option<String>,

    /// Whether local notifications are allowed.
    pub local_notifications: bool,

    /// Bearer token of a previous `login`.
    pub session_token: Option<String>,

    /// `tracing` filter string, e.g. `"info"` or `"ecomentor_api=debug"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".into(),
            gateway_url: ecomentor_api::push::DEFAULT_GATEWAY_URL.into(),
            push_env: "dev".into(),
            user_id: 1,
            platform: Platform::Desktop,
            device_push_token: None,
            local_notifications: true,
            session_token: None,
            log_level: "info".into(),
            log_json: false,
        }
    }
}

impl Config {
    pub fn push_enabled(&self) -> bool {
        !self.push_env.trim().eq_ignore_ascii_case("off")
    }

    pub fn local_permission(&self) -> Permission {
        if self.local_notifications {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            api_url: self.api_url.clone(),
            gateway_url: self.gateway_url.clone(),
            push_enabled: self.push_enabled(),
            user_id: self.user_id,
            platform: self.platform,
            local_delay: Duration::from_secs(1),
            ..AppSettings::default()
        }
    }
}

/// Truthy spellings accepted for boolean settings.
pub(crate) fn flag(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("granted")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(push_env: &str) -> Config {
        Config {
            api_url: "http://api.test".into(),
            gateway_url: "http://push.test".into(),
            push_env: push_env.into(),
            user_id: 7,
            platform: Platform::Android,
            device_push_token: None,
            local_notifications: false,
            session_token: None,
            log_level: "info".into(),
            log_json: false,
        }
    }

    #[test]
    fn push_env_off_disables_push() {
        assert!(config("dev").push_enabled());
        assert!(config("prod").push_enabled());
        assert!(!config("off").push_enabled());
        assert!(!config(" OFF ").push_enabled());
    }

    #[test]
    fn settings_carry_identity() {
        let settings = config("off").app_settings();
        assert_eq!(settings.user_id, 7);
        assert_eq!(settings.platform, Platform::Android);
        assert!(!settings.push_enabled);
        assert_eq!(config("dev").local_permission(), Permission::Denied);
    }

    #[test]
    fn defaults_target_local_backend() {
        let cfg = Config::default();
        assert_eq!(cfg.api_url, "http://localhost:8000");
        assert_eq!(cfg.push_env, "dev");
        assert!(cfg.push_enabled());
        assert_eq!(cfg.platform, Platform::Desktop);
        assert_eq!(cfg.local_permission(), Permission::Granted);
        assert_eq!(cfg.log_level, "info");
        assert!(!cfg.log_json);
    }

    #[test]
    fn flag_values() {
        assert!(flag("1"));
        assert!(flag("TRUE"));
        assert!(flag("granted"));
        assert!(!flag("0"));
        assert!(!flag("denied"));
    }
}
