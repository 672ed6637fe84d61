//! Loader fan-out tests
//!
//! Exercise the concurrent load through a canned lister: permission errors
//! degrade the snapshot, anything else aborts it.

mod common;

use common::*;
use kstatus::loader::{LoaderTask, make_graph, run_loaders};
use kstatus::models::ResourceKind;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_every_loadable_kind_is_listed_once() {
    let lister = Arc::new(FakeLister::default());
    make_graph(lister.clone(), Some(NS)).await.unwrap();

    let mut calls = lister.calls.lock().unwrap().clone();
    calls.sort_by_key(|(_, kind)| *kind);
    let mut expected: Vec<(Option<String>, ResourceKind)> = ResourceKind::loadable()
        .iter()
        .map(|kind| (Some(NS.to_string()), *kind))
        .collect();
    expected.sort_by_key(|(_, kind)| *kind);
    assert_eq!(calls, expected);
}

#[tokio::test]
async fn test_all_namespaces_lists_without_namespace() {
    let lister = Arc::new(FakeLister::default());
    make_graph(lister.clone(), None).await.unwrap();
    assert!(lister.calls.lock().unwrap().iter().all(|(ns, _)| ns.is_none()));
}

#[tokio::test]
async fn test_forbidden_kinds_degrade_the_snapshot() {
    let lister = FakeLister::with_manifests(vec![pod("web", json!({"app": "web"}), "nginx")])
        .failing(ResourceKind::Secret, Failure::Forbidden)
        .failing(ResourceKind::Route, Failure::Forbidden);

    let outcome = make_graph(Arc::new(lister), Some(NS)).await.unwrap();
    assert_eq!(outcome.graph.len(), 1);
    assert_eq!(
        outcome.forbidden.into_iter().collect::<Vec<_>>(),
        vec![ResourceKind::Secret, ResourceKind::Route]
    );
}

#[tokio::test]
async fn test_genuine_failures_are_aggregated() {
    let lister = FakeLister::with_manifests(vec![pod("web", json!({}), "nginx")])
        .failing(ResourceKind::Pod, Failure::Failed("connection reset".to_string()))
        .failing(ResourceKind::Service, Failure::NotFound)
        .failing(ResourceKind::Secret, Failure::Forbidden);

    let err = make_graph(Arc::new(lister), Some(NS)).await.unwrap_err();
    let kinds: Vec<ResourceKind> = err.errors().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec![ResourceKind::Service, ResourceKind::Pod]);
    assert_eq!(
        err.to_string(),
        "[the server could not find the requested resource (services), \
         failed to list pods: connection reset]"
    );
}

#[tokio::test]
async fn test_single_failure_is_not_bracketed() {
    let lister = FakeLister::default().failing(ResourceKind::Route, Failure::Failed("EOF".into()));
    let err = make_graph(Arc::new(lister), Some(NS)).await.unwrap_err();
    assert_eq!(err.to_string(), "failed to list routes: EOF");
}

#[tokio::test]
async fn test_missing_build_api_is_tolerated() {
    let lister = FakeLister::default()
        .failing(ResourceKind::BuildConfig, Failure::NotFound)
        .failing(ResourceKind::Build, Failure::NotFound);

    let outcome = make_graph(Arc::new(lister), Some(NS)).await.unwrap();
    assert!(outcome.graph.is_empty());
    assert!(outcome.forbidden.is_empty());
}

#[tokio::test]
async fn test_custom_task_list() {
    let lister = FakeLister::with_manifests(vec![
        pod("web", json!({}), "nginx"),
        service("web", json!({"app": "web"})),
    ]);
    let tasks = [LoaderTask::new(ResourceKind::Pod)];

    let outcome = run_loaders(Arc::new(lister), Some(NS), &tasks).await.unwrap();
    assert_eq!(outcome.graph.len(), 1);
    assert!(outcome.graph.find(ResourceKind::Pod, NS, "web").is_some());
}

#[tokio::test]
async fn test_image_streams_contribute_tag_nodes() {
    let outcome = load(vec![image_stream("app", &["latest", "v1"])]).await;
    let graph = outcome.graph;
    assert_eq!(graph.len(), 3);
    assert!(graph.find(ResourceKind::ImageStreamTag, NS, "app:latest").is_some());
    assert!(graph.find(ResourceKind::ImageStreamTag, NS, "app:v1").is_some());
}
