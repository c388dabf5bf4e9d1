//! Layered configuration: CLI flags overridden by environment variables.
//!
//! `dotenvy` is loaded before this is parsed, matching the teacher's `main.rs`
//! convention, so a developer can keep secrets in `.env` without exporting them.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about = "Loyalty points accounting service")]
struct Args {
    /// HTTP listen address.
    #[arg(short = 'a', long, default_value = ":8080")]
    address: String,

    /// Database DSN.
    #[arg(short = 'd', long, default_value = "")]
    database_uri: String,

    /// Accrual provider base URL.
    #[arg(short = 'r', long, default_value = "")]
    accrual_system_address: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub database_uri: String,
    pub accrual_system_address: String,
    pub token_secret: String,
    pub worker_count: usize,
}

impl AppConfig {
    /// Parses CLI args, then lets environment variables win wherever set.
    pub fn load() -> Self {
        let args = Args::parse();

        let base_url = std::env::var("BASE_URL").unwrap_or(args.address);
        let database_uri = std::env::var("DATABASE_URI").unwrap_or(args.database_uri);
        let accrual_system_address =
            std::env::var("ACCRUAL_SYSTEM_ADDRESS").unwrap_or(args.accrual_system_address);
        let token_secret =
            std::env::var("TOKEN_SECRET").unwrap_or_else(|_| "insecure-dev-secret".to_owned());
        let worker_count = std::env::var("WORKER_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        Self {
            base_url,
            database_uri,
            accrual_system_address,
            token_secret,
            worker_count,
        }
    }

    /// Turns Go's `:8080` shorthand (bind every interface) into the explicit
    /// host Rust's `TcpListener` requires.
    pub fn listen_address(&self) -> String {
        match self.base_url.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => self.base_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_base_url(base_url: &str) -> AppConfig {
        AppConfig {
            base_url: base_url.to_owned(),
            database_uri: String::new(),
            accrual_system_address: String::new(),
            token_secret: String::new(),
            worker_count: 3,
        }
    }

    #[test]
    fn go_style_port_shorthand_binds_every_interface() {
        assert_eq!(config_with_base_url(":8080").listen_address(), "0.0.0.0:8080");
    }

    #[test]
    fn explicit_host_is_left_untouched() {
        assert_eq!(
            config_with_base_url("127.0.0.1:9090").listen_address(),
            "127.0.0.1:9090"
        );
    }
}
