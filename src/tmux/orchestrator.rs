//! Session orchestration
//!
//! Given a chosen project, reuse a matching tmux session or create one, then
//! attach to it (or switch to it when already inside tmux).

use tracing::{debug, info, instrument};

use super::Multiplexer;
use crate::discovery::Project;
use crate::error::{Result, TmuxError};

/// How many times a missing session is created before giving up
pub const MAX_CREATE_ATTEMPTS: usize = 1;

/// Environment variable tmux sets inside a client
pub const TMUX_ENV: &str = "TMUX";

/// What the orchestrator did to reach the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// `attach-session` from outside tmux
    Attached,
    /// `switch-client` from inside tmux
    Switched,
}

/// Result of [`SessionOrchestrator::ensure_session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureOutcome {
    /// Session that was attached or switched to
    pub session: String,
    /// Attach or switch
    pub action: SessionAction,
    /// Whether the session had to be created first
    pub created: bool,
}

/// Creates, attaches and switches tmux sessions for projects
pub struct SessionOrchestrator<M> {
    mux: M,
    /// Whether this process runs inside a tmux client
    inside_client: bool,
}

impl<M: Multiplexer> SessionOrchestrator<M> {
    /// Create an orchestrator, reading `$TMUX` once
    pub fn new(mux: M) -> Self {
        let inside_client = std::env::var_os(TMUX_ENV).is_some_and(|v| !v.is_empty());
        Self::with_inside_client(mux, inside_client)
    }

    /// Create an orchestrator with an explicit inside-tmux flag
    pub fn with_inside_client(mux: M, inside_client: bool) -> Self {
        Self { mux, inside_client }
    }

    /// The underlying multiplexer
    pub fn multiplexer(&self) -> &M {
        &self.mux
    }

    /// Attach or switch to the project's session, creating it if needed.
    ///
    /// Creation happens at most [`MAX_CREATE_ATTEMPTS`] times; if the session
    /// still cannot be found afterwards the call fails.
    #[instrument(skip(self, project), fields(project = %project.name))]
    pub async fn ensure_session(&self, project: &Project) -> Result<EnsureOutcome> {
        let name = project.session_name();
        let mut created = false;

        for attempt in 0..=MAX_CREATE_ATTEMPTS {
            let sessions = self.mux.list_sessions().await?;
            debug!("Live sessions: {:?}", sessions);

            if let Some(existing) = find_session(&sessions, &name) {
                let session = existing.to_string();
                // `=` makes tmux match the name exactly instead of by prefix
                let target = format!("={}", session);

                let action = if self.inside_client {
                    info!("Switching client to session '{}'", session);
                    self.mux.switch_client(&target).await?;
                    SessionAction::Switched
                } else {
                    info!("Attaching to session '{}'", session);
                    self.mux.attach_session(&target).await?;
                    SessionAction::Attached
                };

                return Ok(EnsureOutcome {
                    session,
                    action,
                    created,
                });
            }

            if attempt == MAX_CREATE_ATTEMPTS {
                break;
            }

            info!("Creating session '{}' in {:?}", name, project.full_path);
            self.mux.new_session(&name, &project.full_path).await?;
            created = true;
        }

        Err(TmuxError::SessionNotFound(name).into())
    }
}

/// Find the session belonging to a project name.
///
/// An exact match wins; otherwise the first session whose name contains
/// `name` is used.
pub fn find_session<'a>(sessions: &'a [String], name: &str) -> Option<&'a str> {
    sessions
        .iter()
        .find(|s| s.as_str() == name)
        .or_else(|| sessions.iter().find(|s| s.contains(name)))
        .map(String::as_str)
}
