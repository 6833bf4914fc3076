use crate::args::Cli;
use crate::command::{Command, HELP};
use crate::render;
use anyhow::Context;
use sailor_domain::config::ShellConfig;
use sailor_domain::constants::LOGOUT;
use sailor_event_bus::EventBus;
use sailor_modules::{
    EntitlementRecord, EntitlementSource, JsonFileEntitlements, ModuleRegistry, ModuleSession,
    PendingLoad, Selection, SessionError, StaticEntitlements, UserIdentity,
};
use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Entitlements as configured for this process.
#[derive(Debug)]
pub enum ShellEntitlements {
    File(JsonFileEntitlements),
    /// No document configured: every registered module is enabled.
    Static(StaticEntitlements),
}

impl ShellEntitlements {
    pub fn resolve(cli: &Cli, config: &ShellConfig, registry: &ModuleRegistry) -> Self {
        match cli.entitlements.as_ref().or(config.session.entitlements.as_ref()) {
            Some(path) => Self::File(JsonFileEntitlements::new(path)),
            None => {
                warn!("No entitlement document configured, enabling every module");
                Self::Static(StaticEntitlements::all_enabled(registry.names()))
            },
        }
    }
}

impl EntitlementSource for ShellEntitlements {
    async fn fetch(&self, user: &UserIdentity) -> Result<Vec<EntitlementRecord>, SessionError> {
        match self {
            Self::File(source) => source.fetch(user).await,
            Self::Static(source) => source.fetch(user).await,
        }
    }

    async fn toggle(&self, user: &UserIdentity, name: &str) -> Result<(), SessionError> {
        match self {
            Self::File(source) => source.toggle(user, name).await,
            Self::Static(source) => source.toggle(user, name).await,
        }
    }
}

/// Identity file when one is configured, otherwise `--username`.
/// `--admin` grants the role either way.
async fn identity(cli: &Cli, config: &ShellConfig) -> anyhow::Result<UserIdentity> {
    let mut user = match cli.user.as_ref().or(config.session.user.as_ref()) {
        Some(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read identity file {}", path.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("Malformed identity file {}", path.display()))?
        },
        None => UserIdentity::new(cli.username.clone()),
    };
    user.is_admin |= cli.admin;
    Ok(user)
}

/// What the host does after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Screen,
    Text(String),
    Nothing,
    Logout,
    Quit,
}

/// Line-oriented host around one [`ModuleSession`].
#[derive(Debug)]
pub struct Shell<S> {
    session: ModuleSession<S>,
    icons: bool,
}

impl Shell<ShellEntitlements> {
    /// Signs the configured user in and opens their default module.
    ///
    /// # Errors
    /// Fails when an identity file is configured but cannot be read.
    pub async fn start(cli: &Cli, config: &ShellConfig) -> anyhow::Result<Self> {
        let registry = ModuleRegistry::builtin();
        let user = identity(cli, config).await?;
        let source = ShellEntitlements::resolve(cli, config, &registry);
        let session = ModuleSession::start(user, source, registry, config, EventBus::new()).await;

        let shell = Self::new(session, config.shell.icons);
        if let Some(load) = shell.session.open_default() {
            load.run().await;
        }
        Ok(shell)
    }
}

impl<S: EntitlementSource> Shell<S> {
    pub const fn new(session: ModuleSession<S>, icons: bool) -> Self {
        Self { session, icons }
    }

    pub const fn session(&self) -> &ModuleSession<S> {
        &self.session
    }

    /// Navigation pane followed by the content area.
    pub fn screen(&self) -> String {
        let mut out = render::navigation(&self.session.navigation(), self.icons);
        if let Some(error) = self.session.last_error() {
            let _ = writeln!(out, "! Entitlements unavailable: {error}");
        }
        out.push('\n');
        out.push_str(&render::content(&self.session.state(), self.session.user()));
        out
    }

    pub async fn execute(&mut self, command: Command) -> Reply {
        debug!(?command, "Shell command");
        match command {
            Command::Select(name) => self.open(&name).await,
            Command::Close => self.open("").await,
            Command::Logout => self.open(LOGOUT).await,
            Command::Retry => match self.session.retry() {
                Some(load) => settle(load).await,
                None => Reply::Text("Nothing to retry.".to_owned()),
            },
            Command::Reload(name) => match self.session.reload(&name).await {
                Some(load) => settle(load).await,
                None => Reply::Screen,
            },
            Command::Toggle(name) => match self.session.toggle(&name).await {
                Ok(()) => Reply::Screen,
                Err(err) => Reply::Text(format!("Error: {err}")),
            },
            Command::Refresh => match self.session.refresh().await {
                Ok(()) => Reply::Screen,
                Err(err) => Reply::Text(format!("Error: {err}")),
            },
            Command::Collapse => {
                self.session.toggle_collapsed();
                Reply::Screen
            },
            Command::List => Reply::Text(self.list()),
            Command::Help => Reply::Text(HELP.to_owned()),
            Command::Quit => Reply::Quit,
            Command::Nothing => Reply::Nothing,
        }
    }

    async fn open(&self, name: &str) -> Reply {
        match self.session.select(name) {
            Selection::Logout => Reply::Logout,
            Selection::Ignored => Reply::Text(format!("{name} is still loading.")),
            Selection::Settled => Reply::Screen,
            Selection::Pending(load) => settle(load).await,
        }
    }

    fn list(&self) -> String {
        let available = self.session.available();
        if available.is_empty() {
            return "No modules available.".to_owned();
        }
        available
            .iter()
            .map(|module| {
                format!("{:<12} {}: {}", module.name, module.display_name, module.description)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Reads commands until `logout`, `quit` or end of input, writing a fresh
    /// screen after every command. The session is ended on the way out.
    ///
    /// # Errors
    /// Only I/O errors on `input` or `output` end the loop early.
    pub async fn run<R, W>(mut self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        output.write_all(self.screen().as_bytes()).await?;
        output.flush().await?;

        let mut lines = input.lines();
        let farewell = loop {
            let Some(line) = lines.next_line().await? else {
                break "Goodbye.";
            };
            let reply = match line.parse::<Command>() {
                Ok(command) => self.execute(command).await,
                Err(err) => Reply::Text(err.to_string()),
            };
            match reply {
                Reply::Screen => {
                    let screen = format!("\n{}", self.screen());
                    output.write_all(screen.as_bytes()).await?;
                },
                Reply::Text(text) => output.write_all(format!("{text}\n").as_bytes()).await?,
                Reply::Nothing => {},
                Reply::Logout => break "Signed out.",
                Reply::Quit => break "Goodbye.",
            }
            output.flush().await?;
        };

        self.session.logout().await;
        output.write_all(format!("{farewell}\n").as_bytes()).await?;
        output.flush().await?;
        Ok(())
    }
}

async fn settle(load: PendingLoad) -> Reply {
    load.run().await;
    Reply::Screen
}

#[cfg(test)]
mod tests {
    use super::*;
    use sailor_modules::LoaderState;

    async fn shell(names: &[&str], user: UserIdentity) -> Shell<StaticEntitlements> {
        let source = StaticEntitlements::all_enabled(names.iter().copied());
        let config = ShellConfig::default();
        let session =
            ModuleSession::start(user, source, ModuleRegistry::builtin(), &config, EventBus::new())
                .await;
        Shell::new(session, true)
    }

    #[tokio::test]
    async fn test_select_renders_the_module() {
        let mut shell = shell(&["dashboard", "boats"], UserIdentity::new("skipper")).await;
        assert_eq!(shell.execute(Command::Select("boats".to_owned())).await, Reply::Screen);

        let screen = shell.screen();
        assert!(screen.contains("> ⛵ Fleet Management (boats)"));
        assert!(screen.contains("# Fleet Management"));
        assert!(screen.contains("🚧 Under Development"));
    }

    #[tokio::test]
    async fn test_logout_and_quit_end_the_loop() {
        let mut shell = shell(&["dashboard"], UserIdentity::new("skipper")).await;
        assert_eq!(shell.execute(Command::Logout).await, Reply::Logout);
        assert_eq!(shell.execute(Command::Quit).await, Reply::Quit);
        assert!(matches!(shell.session().state(), LoaderState::Idle));
    }

    #[tokio::test]
    async fn test_retry_without_failure_is_a_no_op() {
        let mut shell = shell(&["dashboard"], UserIdentity::new("skipper")).await;
        assert_eq!(
            shell.execute(Command::Retry).await,
            Reply::Text("Nothing to retry.".to_owned())
        );
    }

    #[tokio::test]
    async fn test_denied_module_shows_the_lock() {
        let mut shell = shell(&["dashboard", "admin"], UserIdentity::new("deckhand")).await;
        shell.execute(Command::Select("admin".to_owned())).await;
        assert!(shell.screen().contains("🔒 Access Denied"));

        let Reply::Text(list) = shell.execute(Command::List).await else {
            panic!("list replies with text");
        };
        assert!(list.starts_with("dashboard"));
        assert!(!list.contains("admin"));
    }

    #[tokio::test]
    async fn test_run_writes_a_screen_per_command() {
        let shell = shell(&["dashboard"], UserIdentity::new("skipper")).await;
        let mut output = Vec::new();
        shell.run(&b"dashboard\nbogus extra words\nlogout\n"[..], &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("== Sailor Utility =="));
        assert!(text.contains("Welcome back, skipper!"));
        assert!(text.contains("Unexpected argument for 'bogus'"));
        assert!(text.ends_with("Signed out.\n"));
    }
}
