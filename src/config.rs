//! Configuration for the mock ledger
//!
//! CLI arguments and environment variable handling using clap,
//! following the same Args-with-env pattern as the rest of the stack.

use clap::Parser;
use std::net::SocketAddr;
use uuid::Uuid;

/// Scrip - mock ledger JSON API for receivables financing
#[derive(Parser, Debug, Clone)]
#[command(name = "scrip")]
#[command(about = "Mock ledger JSON API emulating query/create/exercise semantics")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5757")]
    pub listen: SocketAddr,

    /// Ledger package id advertised to clients (optional)
    ///
    /// Deployment templates ship placeholder values wrapped in angle
    /// brackets (e.g. "<replace-with-package-id>"); those are treated
    /// as unset rather than passed through to clients.
    #[arg(long, env = "LEDGER_PACKAGE_ID")]
    pub package_id: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Effective package id: trimmed, with placeholder values dropped
    pub fn effective_package_id(&self) -> Option<String> {
        let trimmed = self.package_id.as_deref()?.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with('<') && trimmed.ends_with('>') {
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(format!("Unknown log level: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with_package(package_id: Option<&str>) -> Args {
        Args {
            node_id: Uuid::new_v4(),
            listen: "127.0.0.1:5757".parse().unwrap(),
            package_id: package_id.map(str::to_string),
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_placeholder_package_id_is_unset() {
        let args = args_with_package(Some("<replace-with-package-id>"));
        assert_eq!(args.effective_package_id(), None);
    }

    #[test]
    fn test_real_package_id_passes_through() {
        let args = args_with_package(Some("  pkg123  "));
        assert_eq!(args.effective_package_id().as_deref(), Some("pkg123"));
    }

    #[test]
    fn test_blank_package_id_is_unset() {
        assert_eq!(args_with_package(Some("   ")).effective_package_id(), None);
        assert_eq!(args_with_package(None).effective_package_id(), None);
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut args = args_with_package(None);
        args.log_level = "verbose".to_string();
        assert!(args.validate().is_err());
    }
}
