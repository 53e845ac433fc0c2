//! Integration tests for the workspace-backed backend.
//!
//! Tests cover:
//! - Running a full creation attempt through the navigator
//! - Failing at a configured phase
//! - Rejecting unknown departments and duplicate projects
//! - Retrying after a failed or abandoned attempt
//! - Listing projects and departments

mod common;

use std::path::Path;

use common::*;
use mapmaker::AppConfig;

fn backend_in(dir: &Path, fail_at: Option<&str>) -> anyhow::Result<LocalBackend> {
    let config = AppConfig {
        workspace_dir: dir.to_path_buf(),
        phase_delay_ms: 0,
        fail_at: fail_at.map(str::to_string),
    };
    Ok(LocalBackend::from_config(&config)?)
}

async fn run_attempt(backend: &LocalBackend, draft: ProjectDraft) -> (CreationTracker, Vec<usize>) {
    let mut tracker = CreationTracker::new(draft);
    let mut events = tracker.activate(backend).expect("first activation");
    let indices = drain(&mut tracker, &mut events).await;
    (tracker, indices)
}

#[tokio::test]
async fn test_create_project_through_navigator() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let backend = backend_in(dir.path(), None)?;
    backend.setup_check().await?;

    let mut navigator = Navigator::new();
    navigator.go_new_project();
    let tracker = navigator.start_loading("2A", "Ajaccio")?;
    let mut events = tracker.activate(&backend).expect("first activation");
    let indices = drain(tracker, &mut events).await;

    assert_eq!(indices, vec![1, 2, 3, 4, 5, 5]);
    let tracker = navigator.tracker().expect("still on the loading screen");
    assert!(tracker.state().is_completed());
    assert_eq!(tracker.status(), TrackerStatus::Succeeded);
    assert_eq!(navigator.current(), ScreenState::Loading);

    let project_file = backend.projects_dir().join("Ajaccio").join("Ajaccio.qgz");
    assert!(project_file.exists());

    navigator.go_home();
    assert_eq!(backend.hub().released_count(), 1);

    let projects = backend.list_projects().await?;
    let entry = projects.get("Ajaccio").expect("project is listed");
    assert_eq!(entry.project_path, project_file);
    assert_eq!(entry.image_path, None);

    Ok(())
}

#[tokio::test]
async fn test_configured_failure_freezes_progress() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let backend = backend_in(dir.path(), Some("download"))?;

    let (tracker, indices) = run_attempt(&backend, ProjectDraft::new("75", "Paris")).await;

    assert_eq!(indices, vec![1, 2, 3, 3]);
    assert_eq!(
        tracker.state().error(),
        Some("Downloading data failed for project Paris")
    );
    assert_eq!(tracker.status(), TrackerStatus::Failed);

    Ok(())
}

#[tokio::test]
async fn test_unknown_department_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let backend = backend_in(dir.path(), None)?;

    let (tracker, indices) = run_attempt(&backend, ProjectDraft::new("99", "Nowhere")).await;

    assert_eq!(indices, vec![0]);
    assert_eq!(
        tracker.state().error(),
        Some(BackendError::UnknownDepartment("99".into()).to_string().as_str())
    );
    assert!(!backend.projects_dir().join("Nowhere").exists());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_project_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let backend = backend_in(dir.path(), None)?;

    let (first, _) = run_attempt(&backend, ProjectDraft::new("33", "Bordeaux")).await;
    assert!(first.state().is_completed());

    let (second, indices) = run_attempt(&backend, ProjectDraft::new("33", "Bordeaux")).await;
    assert_eq!(indices, vec![0]);
    assert_eq!(
        second.state().error(),
        Some(BackendError::ProjectExists("Bordeaux".into()).to_string().as_str())
    );

    Ok(())
}

#[tokio::test]
async fn test_retry_after_failure_succeeds() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let failing = backend_in(dir.path(), Some("download"))?;

    let (first, _) = run_attempt(&failing, ProjectDraft::new("75", "Paris")).await;
    assert_eq!(first.status(), TrackerStatus::Failed);
    assert!(!failing.projects_dir().join("Paris").exists());
    assert!(failing.list_projects().await?.is_empty());

    let healthy = backend_in(dir.path(), None)?;
    let (retry, indices) = run_attempt(&healthy, ProjectDraft::new("75", "Paris")).await;
    assert_eq!(indices, vec![1, 2, 3, 4, 5, 5]);
    assert_eq!(retry.status(), TrackerStatus::Succeeded);
    assert!(healthy.list_projects().await?.contains_key("Paris"));

    Ok(())
}

#[tokio::test]
async fn test_leftover_folder_does_not_block_creation() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let backend = backend_in(dir.path(), None)?;
    std::fs::create_dir_all(backend.projects_dir().join("Lille"))?;

    let (tracker, _) = run_attempt(&backend, ProjectDraft::new("59", "Lille")).await;
    assert!(tracker.state().is_completed());
    assert!(backend.projects_dir().join("Lille").join("Lille.qgz").exists());

    Ok(())
}

#[tokio::test]
async fn test_leaving_mid_creation_removes_the_folder() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let backend = LocalBackend::from_config(&AppConfig {
        workspace_dir: dir.path().to_path_buf(),
        phase_delay_ms: 200,
        fail_at: None,
    })?;

    let mut navigator = Navigator::new();
    navigator.go_new_project();
    let tracker = navigator.start_loading("13", "Marseille")?;
    let mut events = tracker.activate(&backend).expect("first activation");
    assert_eq!(step(&mut *tracker, &mut events).await, Some(1));
    assert_eq!(step(&mut *tracker, &mut events).await, Some(2));
    assert!(backend.projects_dir().join("Marseille").exists());

    navigator.go_home();
    drop(events);
    assert!(!backend.projects_dir().join("Marseille").exists());

    Ok(())
}

#[tokio::test]
async fn test_listing_an_empty_workspace() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let backend = backend_in(dir.path(), None)?;

    assert!(backend.list_projects().await?.is_empty());

    // Folders without a project file are skipped; previews are picked up
    let projects_dir = backend.projects_dir();
    std::fs::create_dir_all(projects_dir.join("Draft"))?;
    std::fs::create_dir_all(projects_dir.join("Lyon"))?;
    std::fs::write(projects_dir.join("Lyon").join("Lyon.qgz"), b"")?;
    std::fs::write(projects_dir.join("Lyon").join("Lyon.png"), b"")?;

    let projects = backend.list_projects().await?;
    assert_eq!(projects.keys().collect::<Vec<_>>(), vec!["Lyon"]);
    assert_eq!(
        projects["Lyon"].image_path,
        Some(projects_dir.join("Lyon").join("Lyon.png"))
    );

    let departments = backend.list_departments().await?;
    assert_eq!(departments.get("69").map(String::as_str), Some("Rhône"));

    Ok(())
}

#[test]
fn test_unknown_fail_phase_is_a_config_error() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(backend_in(dir.path(), Some("teleport")).is_err());
}
