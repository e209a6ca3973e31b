//! CLI argument and environment definitions for the wattshell binary.

use clap::Parser;

/// Interactive shell for a network-attached EV charging controller.
///
/// Connection parameters are usually supplied through the environment so
/// the shell can be started without arguments.
#[derive(Parser, Debug)]
#[command(name = "wattshell", version, about, long_about = None)]
pub struct Cli {
    /// Controller host (hostname or host:port)
    #[arg(long, env = "WATTSHELL_HOST", required = true)]
    pub host: String,

    /// Controller password
    #[arg(long, env = "WATTSHELL_PASSWORD", required = true, hide_env_values = true)]
    pub password: String,

    /// Initial log verbosity (trace, debug, info, warn, error)
    #[arg(long, env = "WATTSHELL_LOG", default_value = "warn")]
    pub log: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_host_and_password() {
        let result = Cli::try_parse_from(["wattshell"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_log_defaults_to_warn() {
        let cli =
            Cli::try_parse_from(["wattshell", "--host", "charger.local", "--password", "secret"])
                .unwrap();
        assert_eq!(cli.log, "warn");
    }
}
