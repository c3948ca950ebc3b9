//! Integration tests for tmuxer
//!
//! Discovery tests build throwaway directory trees under a fake home.
//! The tmux tests need tmux installed and run against a private server
//! socket so they never touch the user's sessions.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use tmuxer::config::Config;
use tmuxer::discovery::ProjectResolver;
use tmuxer::error::{ConfigError, Error};
use tmuxer::tmux::{Multiplexer, TmuxExecutor};

/// Create `rel` (and parents) under `root`
fn mkdir(root: &Path, rel: &str) {
    fs::create_dir_all(root.join(rel)).unwrap();
}

/// Fake home with a handful of repositories and one ignorable build dir
fn create_home() -> TempDir {
    let home = TempDir::new().unwrap();
    mkdir(home.path(), "code/tmuxer/.git");
    mkdir(home.path(), "code/work/billing/.git");
    mkdir(home.path(), "code/work/Api/.git");
    mkdir(home.path(), "code/scratch/.hg");
    mkdir(home.path(), "code/node_modules/dep/.git");
    mkdir(home.path(), "notes");
    home
}

fn names(resolver: &ProjectResolver, bases: &[&str]) -> Vec<String> {
    let bases: Vec<String> = bases.iter().map(|b| b.to_string()).collect();
    resolver
        .resolve(&bases)
        .projects
        .into_iter()
        .map(|p| p.name)
        .collect()
}

async fn tmux_available() -> bool {
    tokio::process::Command::new("tmux")
        .arg("-V")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Stop the private tmux server a test started
async fn shutdown_server(executor: &TmuxExecutor) {
    let _ = executor.execute(&["kill-server"]).await;
}

/// Executor bound to a socket unique to this test run
fn isolated_executor(tag: &str) -> TmuxExecutor {
    TmuxExecutor::new().with_socket_name(format!("tmuxer-test-{}-{}", tag, std::process::id()))
}

#[test]
fn test_marker_pattern_discovers_repositories() {
    let home = create_home();
    let resolver = ProjectResolver::new(Some(home.path().to_path_buf()))
        .with_markers(vec![".git".to_string()]);

    let found = names(&resolver, &["~/code/**"]);

    assert_eq!(found, vec!["node_modules/dep", "tmuxer", "work/Api", "work/billing"]);
}

#[test]
fn test_multiple_markers_and_ignore() {
    let home = create_home();
    let resolver = ProjectResolver::new(Some(home.path().to_path_buf()))
        .with_markers(vec![".git".to_string(), ".hg".to_string()])
        .with_ignore(&["node_modules".to_string()])
        .unwrap();

    let found = names(&resolver, &["~/code/**"]);

    assert_eq!(found, vec!["scratch", "tmuxer", "work/Api", "work/billing"]);
}

#[test]
fn test_overlapping_bases_are_deduplicated() {
    let home = create_home();
    let resolver = ProjectResolver::new(Some(home.path().to_path_buf()))
        .with_markers(vec![".git".to_string()]);

    let resolution = resolver.resolve(&[
        "~/code/work/*/{.git}".to_string(),
        "$HOME/code/**".to_string(),
        "${HOME}/code/work/**/{.git}".to_string(),
    ]);

    let billing_path = home.path().join("code/work/billing");
    let billing: Vec<_> = resolution
        .projects
        .iter()
        .filter(|p| p.full_path == billing_path)
        .collect();
    assert_eq!(billing.len(), 1);
    // First base to reach a directory names it
    assert_eq!(billing[0].name, "billing");
    assert_eq!(billing[0].home_path, Path::new("code/work/billing"));
    assert_eq!(billing[0].display_path(), "~/code/work/billing");
    assert!(resolution.failures.is_empty());
}

#[test]
fn test_failing_base_does_not_hide_others() {
    let home = create_home();
    let resolver = ProjectResolver::new(Some(home.path().to_path_buf()));

    let resolution = resolver.resolve(&[
        "~/does-not-exist/*".to_string(),
        "~/code/work/*/{.git}".to_string(),
    ]);

    let found: Vec<_> = resolution.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(found, vec!["Api", "billing"]);
    assert_eq!(resolution.failures.len(), 1);
}

#[test]
fn test_config_file_drives_discovery() {
    let home = create_home();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("tmuxer.yaml");
    fs::write(
        &config_path,
        "base:\n  - ~/code/**\nmarker:\n  - .hg\nignore:\n  - node_modules\n",
    )
    .unwrap();

    let config = Config::load_from(Some(&config_path)).unwrap();
    config.validate().unwrap();
    assert_eq!(config.marker, vec![".hg"]);

    let resolver = ProjectResolver::new(Some(home.path().to_path_buf()))
        .with_markers(config.marker.clone())
        .with_ignore(&config.ignore)
        .unwrap();

    let resolution = resolver.resolve(&config.base);
    let found: Vec<_> = resolution.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(found, vec!["scratch"]);
}

#[test]
fn test_explicit_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.yaml");

    let err = Config::load(Some(missing.to_str().unwrap())).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::FileNotFound(_))));
}

#[tokio::test]
async fn test_fresh_server_has_no_sessions() {
    if !tmux_available().await {
        eprintln!("Skipping test: tmux not available");
        return;
    }

    let executor = isolated_executor("empty");
    let sessions = executor.list_sessions().await.unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_new_session_is_listed() {
    if !tmux_available().await {
        eprintln!("Skipping test: tmux not available");
        return;
    }

    let dir = TempDir::new().unwrap();
    let executor = isolated_executor("create");
    let session = "tmuxer_it_project";

    executor.new_session(session, dir.path()).await.unwrap();
    let sessions = executor.list_sessions().await.unwrap();

    // Cleanup before asserting so a failure doesn't leak the server
    shutdown_server(&executor).await;

    assert!(sessions.iter().any(|s| s == session));
}
