//! The fixed shell command set.
//!
//! Commands are a closed enum rather than a map of name to closure: the
//! set is small and fixed, and exhaustive matching keeps every action in
//! one place. Lookup is exact-match only.

use console::style;

use crate::device::DeviceSession;
use crate::export;

/// One shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Disconnect,
    Status,
    Get,
    Set,
    Properties,
    Dump,
    Update,
    Log,
}

impl Command {
    /// Exact-match lookup by command name.
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "connect" => Some(Self::Connect),
            "disconnect" => Some(Self::Disconnect),
            "status" => Some(Self::Status),
            "get" => Some(Self::Get),
            "set" => Some(Self::Set),
            "properties" => Some(Self::Properties),
            "dump" => Some(Self::Dump),
            "update" => Some(Self::Update),
            "log" => Some(Self::Log),
            _ => None,
        }
    }

    /// Minimum positional arguments required before the action runs.
    /// An invocation with fewer arguments is a silent no-op.
    pub const fn min_args(self) -> usize {
        match self {
            Self::Get | Self::Log => 1,
            Self::Set => 2,
            _ => 0,
        }
    }

    /// Run the action against the session. Errors are reported to the
    /// operator here; nothing propagates, the loop always continues.
    pub async fn run(self, session: &dyn DeviceSession, args: &[String]) {
        match self {
            Self::Connect => match session.connect().await {
                Ok(info) => {
                    println!("Connected to {} (serial {})", info.name, info.serial);
                }
                Err(e) => report(&e),
            },
            Self::Disconnect => session.disconnect().await,
            Self::Status => match session.status_info().await {
                Ok(report) => {
                    let state = if report.connected { "online" } else { "offline" };
                    println!("{} (serial {}) [{state}]", report.name, report.serial);
                    for (alias, value) in &report.properties {
                        println!("  {alias}: {value}");
                    }
                }
                Err(e) => report(&e),
            },
            Self::Get => match session.get_property(&args[0]).await {
                Ok(value) => println!("{value}"),
                Err(e) => report(&e),
            },
            Self::Set => {
                if let Err(e) = session.set_property(&args[0], &args[1]).await {
                    report(&e);
                }
            }
            Self::Properties => {
                for alias in session.aliases() {
                    let raw = session.lookup_alias(&alias).unwrap_or_default();
                    match session.get_property(&alias).await {
                        Ok(value) => println!("- {alias}: {raw}\n  {value}"),
                        Err(_) => println!("- {alias}: {raw}\n  -"),
                    }
                }
            }
            Self::Dump => {
                let path = args
                    .first()
                    .map_or(export::DEFAULT_DUMP_PATH, String::as_str);
                match export::dump_csv(session, std::path::Path::new(path)).await {
                    Ok(()) => println!("export written to {path}"),
                    Err(e) => report(&e),
                }
            }
            Self::Update => {
                if let Err(e) = session.request_status_update().await {
                    report(&e);
                }
            }
            Self::Log => {
                if let Err(e) = session.parse_log_level(&args[0]) {
                    report(&e);
                }
            }
        }
    }
}

fn report(error: &crate::error::WshError) {
    println!("{}: {error}", style("error").red());
    if let Some(suggestion) = error.suggestion() {
        println!("{}: {suggestion}", style("hint").yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_exact_match() {
        assert_eq!(Command::lookup("get"), Some(Command::Get));
        assert_eq!(Command::lookup("GET"), None);
        assert_eq!(Command::lookup("ge"), None);
        assert_eq!(Command::lookup(""), None);
    }

    #[test]
    fn test_min_args() {
        assert_eq!(Command::Get.min_args(), 1);
        assert_eq!(Command::Log.min_args(), 1);
        assert_eq!(Command::Set.min_args(), 2);
        assert_eq!(Command::Dump.min_args(), 0);
        assert_eq!(Command::Status.min_args(), 0);
    }
}
