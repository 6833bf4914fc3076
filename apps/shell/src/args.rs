//! Command-line interface of the `sailor` binary.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sailor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal host for the Sailor Utility module shell")]
pub struct Cli {
    /// Configuration file. Defaults to `shell.*` in the working directory when present
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Entitlement document (`{ "modules": [..] }`). Overrides `session.entitlements`
    #[arg(short, long, value_name = "FILE")]
    pub entitlements: Option<PathBuf>,

    /// User identity as JSON. Overrides `session.user`
    #[arg(short, long, value_name = "FILE")]
    pub user: Option<PathBuf>,

    /// Username to sign in with when no identity file is given
    #[arg(long, default_value = "sailor")]
    pub username: String,

    /// Sign in with the administrator role
    #[arg(long)]
    pub admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["sailor"]);
        assert_eq!(cli.username, "sailor");
        assert!(!cli.admin);
        assert!(cli.entitlements.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["sailor", "-e", "rights.json", "--username", "ada", "--admin"]);
        assert_eq!(cli.entitlements, Some(PathBuf::from("rights.json")));
        assert_eq!(cli.username, "ada");
        assert!(cli.admin);
    }
}
