//! Integration tests for reading workflow templates and saved project files.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use buffalo_core::{Error, Project, WorkStatus, PROJECT_FILE_NAME};

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn load_template(contents: &str) -> Result<Project, Error> {
    let temp_dir = TempDir::new().unwrap();
    let path = write(temp_dir.path(), "template.yml", contents);
    let mut project = Project::new("doc", None)?;
    project.load_workflow_description(&path)?;
    Ok(project)
}

fn load_saved(contents: &str) -> Result<Project, Error> {
    let temp_dir = TempDir::new().unwrap();
    let project_dir = temp_dir.path().join("doc");
    std::fs::create_dir_all(&project_dir).unwrap();
    write(&project_dir, PROJECT_FILE_NAME, contents);
    Project::load("doc", temp_dir.path())
}

#[test]
fn test_template_statuses_are_ignored() {
    let project = load_template(
        "workflow:\n  works:\n    - name: a\n      status: done\n      output_file: a.md\n      comment: A\n",
    )
    .unwrap();
    assert_eq!(project.works()[0].status, WorkStatus::NotStarted);
    assert_eq!(project.works()[0].index, 1);
}

#[test]
fn test_template_missing_workflow() {
    let err = load_template("other: 1\n").unwrap_err();
    assert!(matches!(err, Error::WorkflowDescription(ref m) if m.contains("workflow field")));
}

#[test]
fn test_template_missing_works() {
    let err = load_template("workflow:\n  steps: []\n").unwrap_err();
    assert!(matches!(err, Error::WorkflowDescription(ref m) if m.contains("works field")));
}

#[test]
fn test_template_work_missing_field_names_the_work() {
    let err = load_template(
        "workflow:\n  works:\n    - name: a\n      status: not_started\n      comment: A\n",
    )
    .unwrap_err();
    match err {
        Error::WorkflowDescription(message) => {
            assert!(message.contains("output_file"));
            assert!(message.contains("work a"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_template_malformed_yaml() {
    let err = load_template("workflow: [unclosed").unwrap_err();
    assert!(matches!(err, Error::WorkflowFormat(_)));
}

#[test]
fn test_template_missing_file() {
    let mut project = Project::new("doc", None).unwrap();
    let err = project
        .load_workflow_description(Path::new("/nonexistent/template.yml"))
        .unwrap_err();
    assert!(matches!(err, Error::WorkflowFormat(_)));
}

#[test]
fn test_saved_project_restores_statuses() {
    let project = load_saved(
        "name: doc\nworkflow:\n  works:\n  - name: a\n    status: done\n    output_file: a.md\n    comment: A\n  - name: b\n    status: in_progress\n    output_file: b.md\n    comment: B\n",
    )
    .unwrap();
    assert_eq!(project.name(), "doc");
    assert!(project.works()[0].is_done());
    assert!(project.works()[1].is_in_progress());
    assert_eq!(project.works()[1].index, 2);
}

#[test]
fn test_saved_project_missing_name() {
    let err = load_saved("workflow:\n  works: []\n").unwrap_err();
    assert!(matches!(err, Error::ProjectLoad(ref m) if m.contains("name field")));
}

#[test]
fn test_saved_project_unknown_status() {
    let err = load_saved(
        "name: doc\nworkflow:\n  works:\n  - name: a\n    status: paused\n    output_file: a.md\n    comment: A\n",
    )
    .unwrap_err();
    assert!(matches!(err, Error::ProjectLoad(ref m) if m.contains("paused")));
}

#[test]
fn test_saved_project_malformed_yaml() {
    let err = load_saved("name: [unclosed").unwrap_err();
    assert!(matches!(err, Error::ProjectLoad(_)));
}

#[test]
fn test_load_missing_project_directory() {
    let temp_dir = TempDir::new().unwrap();
    let err = Project::load("absent", temp_dir.path()).unwrap_err();
    assert!(matches!(err, Error::ProjectNotFound(ref name) if name == "absent"));
}

#[test]
fn test_load_directory_without_project_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("empty")).unwrap();
    let err = Project::load("empty", temp_dir.path()).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
}

#[test]
fn test_save_and_reload_round_trip_keeps_order() {
    let temp_dir = TempDir::new().unwrap();
    let template = write(
        temp_dir.path(),
        "template.yml",
        "workflow:\n  works:\n    - name: z\n      status: not_started\n      output_file: z.md\n      comment: Z\n    - name: a\n      status: not_started\n      output_file: a.md\n      comment: A\n",
    );

    let mut project = Project::create("order", temp_dir.path(), &template).unwrap();
    project.update_work_status("z", WorkStatus::Done).unwrap();

    let reloaded = Project::load("order", temp_dir.path()).unwrap();
    let names: Vec<&str> = reloaded.works().iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["z", "a"]);
    assert!(reloaded.works()[0].is_done());
}

#[test]
fn test_template_null_field_reads_as_empty() {
    let project = load_template(
        "workflow:\n  works:\n    - name: a\n      status: not_started\n      output_file: a.md\n      comment:\n",
    )
    .unwrap();
    assert_eq!(project.works()[0].comment, "");
    assert_eq!(project.works()[0].output_file, "a.md");
}

#[test]
fn test_saved_project_null_comment_reads_as_empty() {
    let project = load_saved(
        "name: doc\nworkflow:\n  works:\n  - name: a\n    status: done\n    output_file: a.md\n    comment: null\n",
    )
    .unwrap();
    assert_eq!(project.works()[0].comment, "");
    assert!(project.works()[0].is_done());
}
