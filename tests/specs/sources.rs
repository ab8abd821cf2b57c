// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task-source contracts as the loop depends on them.

use coders_core::{TaskFilter, TaskStatus};
use coders_sources::{MultiSource, SourceSpec, TodolistSource};
use std::io::Write as _;

fn checklist(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.md");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    (dir, path)
}

#[tokio::test]
async fn aggregator_task_source_tag_round_trips() {
    let (_dir, path) = checklist("[ ] one\n[ ] two\n");
    let mut multi = MultiSource::new();
    multi.push(Box::new(TodolistSource::new(&path)));

    for task in multi.list(&TaskFilter::default()).await {
        let again = multi.get(&task.id).await.unwrap();
        assert_eq!(again.source, task.source);
        assert_eq!(again.source, "todolist");
    }
}

#[tokio::test]
async fn checklist_complete_is_idempotent_through_the_aggregator() {
    let (_dir, path) = checklist("[ ] ship it\n");
    let mut multi = MultiSource::new();
    multi.push(Box::new(TodolistSource::new(&path)));

    let task = multi.get("todo-todo.md-1").await.unwrap();
    multi.mark_complete(&task).await.unwrap();
    let after_first = std::fs::read_to_string(&path).unwrap();
    multi.mark_complete(&task).await.unwrap();
    let after_second = std::fs::read_to_string(&path).unwrap();

    assert_eq!(after_first, "[x] ship it\n");
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn duplicate_titles_both_flip() {
    let (_dir, path) = checklist("[ ] same title\n[ ] same title\n");
    let mut multi = MultiSource::new();
    multi.push(Box::new(TodolistSource::new(&path)));

    let task = multi.get("todo-todo.md-1").await.unwrap();
    multi.mark_complete(&task).await.unwrap();

    // Unanchored rewrite by design: both occurrences convert
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "[x] same title\n[x] same title\n"
    );
    let open: Vec<_> = multi
        .list(&TaskFilter {
            statuses: vec![TaskStatus::Open],
            ..Default::default()
        })
        .await;
    assert!(open.is_empty());
}

#[test]
fn spec_grammar_round_trips_for_reexec() {
    // Background loops re-exec with Display output; it must be exact.
    for raw in [
        "todolist:path=/tmp/list.md",
        "beads:bin=/opt/bd",
        "linear:key=lin_123,team=ENG",
        "github:repo=me/proj,token=ghp_x",
    ] {
        let spec: SourceSpec = raw.parse().unwrap();
        assert_eq!(spec.to_string(), raw);
    }
}

#[test]
fn malformed_specs_fail_parse() {
    for raw in ["todolist", ":x=1", "github:repo"] {
        assert!(raw.parse::<SourceSpec>().is_err(), "should reject {}", raw);
    }
}
