//! End-to-end report rendering tests
//!
//! Each scenario is loaded through the fake lister, then rendered with a
//! fixed clock so relative times are stable.

mod common;

use chrono::{DateTime, Utc};
use common::*;
use insta::assert_snapshot;
use kstatus::analysis::default_analyzers;
use kstatus::describe::{ReportOptions, StatusDescriber, render_report};
use kstatus::models::ResourceKind;
use serde_json::{Value, json};
use std::sync::Arc;

const SERVER: &str = "https://api.example.com:6443";

fn now() -> DateTime<Utc> {
    "2024-01-01T12:00:00Z".parse().unwrap()
}

fn options(suggest: bool) -> ReportOptions {
    ReportOptions {
        suggest,
        now: now(),
        ..ReportOptions::new("oc", SERVER)
    }
}

fn frontend() -> Vec<Value> {
    let labels = json!({"app": "frontend"});
    vec![
        service("frontend", labels.clone()),
        route("www", "frontend", "www.example.com", true),
        deployment_config("frontend", labels.clone(), "docker.io/nginx:latest", 1),
        deployment("frontend", 1, "Complete", "2024-01-01T10:00:00Z", labels),
        pod(
            "frontend-1-abc",
            json!({"app": "frontend", "deployment": "frontend-1"}),
            "docker.io/nginx:latest",
        ),
        pod("debug", json!({}), "busybox"),
    ]
}

async fn render(manifests: Vec<Value>, namespace: Option<&str>, suggest: bool) -> String {
    let lister = Arc::new(FakeLister::with_manifests(manifests));
    let outcome = kstatus::loader::make_graph(lister, namespace).await.unwrap();
    render_report(
        &outcome.graph,
        &outcome.forbidden,
        namespace,
        &options(suggest),
        &default_analyzers("oc"),
    )
}

#[tokio::test]
async fn test_service_group_report() {
    let report = render(frontend(), Some(NS), false).await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    http://www.example.com (svc/frontend)
      dc/frontend deploys docker.io/nginx:latest
        deployment #1 deployed 2 hours ago - 1 pod

    pod/debug runs busybox

    1 warning identified, use 'oc status -v' to see details.
    ");
}

#[tokio::test]
async fn test_verbose_report_lists_warnings() {
    let report = render(frontend(), Some(NS), true).await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    http://www.example.com (svc/frontend)
      dc/frontend deploys docker.io/nginx:latest
        deployment #1 deployed 2 hours ago - 1 pod

    pod/debug runs busybox

    Warnings:
      * dc/frontend has no readiness probe to verify pods are ready to accept traffic or ensure deployment is successful.
        try: oc set probe dc/frontend --readiness ...

    View details with 'oc describe <resource>/<name>' or list everything with 'oc get all'.
    ");
}

#[tokio::test]
async fn test_all_namespaces_report_qualifies_names() {
    let report = render(frontend(), None, false).await;
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "Showing all projects on server https://api.example.com:6443");
    assert!(lines.contains(&"http://www.example.com (svc/frontend[example])"));
    assert!(lines.contains(&"pod/debug[example] runs busybox"));
    assert_eq!(
        lines.last().copied(),
        Some("1 warning identified, use 'oc status -v' to see details.")
    );
}

#[tokio::test]
async fn test_rejected_route_is_an_error() {
    let report = render(
        vec![
            service("web", json!({"app": "web"})),
            route("www", "web", "www.example.com", false),
        ],
        Some(NS),
        false,
    )
    .await;
    assert_snapshot!(report.trim_end(), @r#"
    In project example on server https://api.example.com:6443

    route/www not accepted: HostAlreadyClaimed (svc/web)

    Errors:
      * route/www was not accepted by router "default": HostAlreadyClaimed

    View details with 'oc describe <resource>/<name>' or list everything with 'oc get all'.
    "#);
}

#[tokio::test]
async fn test_standalone_build_report() {
    let report = render(
        vec![
            image_stream("app", &["latest"]),
            build_config("app", "app:latest"),
            build("app", 1, "Complete", "2024-01-01T11:00:00Z"),
        ],
        Some(NS),
        false,
    )
    .await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    bc/app docker build of https://github.com/org/app
      pushes to istag/app:latest
      build #1 succeeded about an hour ago

    View details with 'oc describe <resource>/<name>' or list everything with 'oc get all'.
    ");
}

#[tokio::test]
async fn test_describer_matches_render() {
    let describer = StatusDescriber::new(
        Arc::new(FakeLister::with_manifests(frontend())),
        options(false),
    );
    assert_eq!(describer.options().cli_name, "oc");

    let described = describer.describe(Some(NS)).await.unwrap();
    assert_eq!(described, render(frontend(), Some(NS), false).await);
}

#[tokio::test]
async fn test_describer_reports_forbidden_kinds_and_fails_on_errors() {
    let forbidden = StatusDescriber::new(
        Arc::new(FakeLister::with_manifests(frontend()).failing(ResourceKind::Secret, Failure::Forbidden)),
        options(true),
    );
    let report = forbidden.describe(Some(NS)).await.unwrap();
    assert!(report.contains(
        "Warnings:\n  * Unable to list secrets resources.  Not all status relationships can be established.\n"
    ));

    let broken = StatusDescriber::new(
        Arc::new(
            FakeLister::with_manifests(frontend())
                .failing(ResourceKind::Pod, Failure::Failed("connection refused".into())),
        ),
        options(false),
    );
    let err = broken.describe(Some(NS)).await.unwrap_err();
    assert_eq!(err.to_string(), "failed to list pods: connection refused");
}

#[tokio::test]
async fn test_no_analyzers_means_no_summary_counts() {
    let describer = StatusDescriber::new(
        Arc::new(FakeLister::with_manifests(frontend())),
        options(false),
    )
    .with_analyzers(Vec::new());
    let report = describer.describe(Some(NS)).await.unwrap();
    assert!(report.ends_with(
        "\n\nView details with 'oc describe <resource>/<name>' or list everything with 'oc get all'.\n"
    ));
}

/// Build of `bc` that carries no creation, start or completion time
fn untimed_build(bc: &str, number: u32, phase: &str) -> Value {
    let mut value = build(bc, number, phase, "2024-01-01T00:00:00Z");
    value["metadata"].as_object_mut().unwrap().remove("creationTimestamp");
    value["status"].as_object_mut().unwrap().remove("completionTimestamp");
    value
}

fn standalone_build(builds: Vec<Value>) -> Vec<Value> {
    let mut manifests = vec![image_stream("app", &["latest"]), build_config("app", "app:latest")];
    manifests.extend(builds);
    manifests
}

#[tokio::test]
async fn test_new_app_waiting_on_unbuilt_tag() {
    let labels = json!({"app": "web"});
    let manifests = vec![
        service("web", labels.clone()),
        with_image_trigger(deployment_config("web", labels, "web", 0), "web:latest"),
        build_config("web", "web:latest"),
        build("web", 1, "Failed", "2024-01-01T11:00:00Z"),
        image_stream("web", &[]),
    ];
    let report = render(manifests.clone(), Some(NS), true).await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    svc/web - 172.30.0.10:80 -> 8080
      dc/web deploys istag/web:latest <- bc/web docker build of https://github.com/org/web
          build #1 failed about an hour ago
        deployment #1 waiting on image or update

    Errors:
      * bc/web has failed builds and istag/web:latest is not available.
        try: oc logs build/web-1
    Warnings:
      * dc/web has no readiness probe to verify pods are ready to accept traffic or ensure deployment is successful.
        try: oc set probe dc/web --readiness ...

    View details with 'oc describe <resource>/<name>' or list everything with 'oc get all'.
    ");

    let quiet = render(manifests, Some(NS), false).await;
    assert!(!quiet.contains("can't push to image"));
    assert!(quiet.ends_with("1 error and 1 warning identified, use 'oc status -v' to see details.\n"));
}

#[tokio::test]
async fn test_active_build_newer_than_last_result_comes_first() {
    let report = render(
        standalone_build(vec![
            build("app", 1, "Complete", "2024-01-01T09:00:00Z"),
            build("app", 2, "Failed", "2024-01-01T10:00:00Z"),
            build("app", 3, "Running", "2024-01-01T11:30:00Z"),
        ]),
        Some(NS),
        false,
    )
    .await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    bc/app docker build of https://github.com/org/app
      pushes to istag/app:latest
      build #3 running for 30 minutes
      build #1 succeeded 3 hours ago
      build #2 failed 2 hours ago

    View details with 'oc describe <resource>/<name>' or list everything with 'oc get all'.
    ");
}

#[tokio::test]
async fn test_active_build_older_than_last_result_comes_last() {
    let report = render(
        standalone_build(vec![
            build("app", 1, "Pending", "2024-01-01T08:00:00Z"),
            build("app", 2, "Complete", "2024-01-01T11:00:00Z"),
        ]),
        Some(NS),
        false,
    )
    .await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    bc/app docker build of https://github.com/org/app
      pushes to istag/app:latest
      build #2 succeeded about an hour ago
      build #1 pending for 4 hours

    View details with 'oc describe <resource>/<name>' or list everything with 'oc get all'.
    ");
}

#[tokio::test]
async fn test_builds_without_timestamps() {
    let report = render(
        standalone_build(vec![untimed_build("app", 1, "Failed"), untimed_build("app", 2, "Running")]),
        Some(NS),
        false,
    )
    .await;
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines[2..5],
        [
            "bc/app docker build of https://github.com/org/app",
            "  pushes to istag/app:latest",
            "  build #2 running for <unknown>",
        ]
    );
    assert!(!report.contains("build #1"));

    let failed_only = render(standalone_build(vec![untimed_build("app", 1, "Failed")]), Some(NS), false).await;
    assert!(failed_only.contains("\n  pushes to istag/app:latest\n  not built yet\n"));
}

#[tokio::test]
async fn test_build_pushing_to_missing_stream() {
    let report = render(
        vec![
            build_config("app", "app:latest"),
            build("app", 1, "Failed", "2024-01-01T11:00:00Z"),
        ],
        Some(NS),
        false,
    )
    .await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    bc/app docker build of https://github.com/org/app
      pushes to istag/app:latest
      build #1 failed about an hour ago (can't push to image)

    Errors:
      * bc/app is pushing to istag/app:latest, but the image stream for that tag does not exist.

    View details with 'oc describe <resource>/<name>' or list everything with 'oc get all'.
    ");
}

#[tokio::test]
async fn test_build_config_never_built() {
    let report = render(standalone_build(Vec::new()), Some(NS), false).await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    bc/app docker build of https://github.com/org/app
      pushes to istag/app:latest
      not built yet

    View details with 'oc describe <resource>/<name>' or list everything with 'oc get all'.
    ");
}

#[tokio::test]
async fn test_deployment_waiting_and_pending() {
    let labels = json!({"app": "web"});
    let mut image_only = with_image_trigger(deployment_config("web", labels.clone(), "web", 0), "web:latest");
    image_only["spec"]["triggers"].as_array_mut().unwrap().remove(0);
    let report = render(vec![image_only, image_stream("web", &["latest"])], Some(NS), false).await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    dc/web deploys istag/web:latest
      deployment #1 waiting on image

    1 warning identified, use 'oc status -v' to see details.
    ");

    let report = render(
        vec![
            deployment_config("web", labels.clone(), "nginx", 2),
            deployment("web", 1, "Complete", "2024-01-01T10:00:00Z", labels),
        ],
        Some(NS),
        false,
    )
    .await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    dc/web deploys nginx
      deployment #2 pending on update
      deployment #1 deployed 2 hours ago - 1 pod

    1 warning identified, use 'oc status -v' to see details.
    ");
}

#[tokio::test]
async fn test_deployment_history_shows_three_newest() {
    let labels = json!({"app": "web"});
    let mut failed = deployment("web", 4, "Failed", "2024-01-01T11:00:00Z", labels.clone());
    failed["metadata"]["annotations"]["openshift.io/deployment.status-reason"] = json!("deadline exceeded");
    let report = render(
        vec![
            deployment_config("web", labels.clone(), "nginx", 5),
            deployment("web", 1, "Complete", "2024-01-01T08:00:00Z", labels.clone()),
            deployment("web", 2, "Complete", "2024-01-01T09:00:00Z", labels.clone()),
            deployment("web", 3, "Complete", "2024-01-01T10:00:00Z", labels.clone()),
            failed,
            deployment("web", 5, "Running", "2024-01-01T11:30:00Z", labels),
        ],
        Some(NS),
        false,
    )
    .await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    dc/web deploys nginx
      deployment #5 running for 30 minutes - 1 pod
      deployment #4 failed about an hour ago: deadline exceeded - 1 pod
      deployment #3 deployed 2 hours ago - 1 pod

    1 warning identified, use 'oc status -v' to see details.
    ");
}

#[tokio::test]
async fn test_deployment_config_in_test_mode() {
    let labels = json!({"app": "web"});
    let mut dc = deployment_config("web", labels.clone(), "nginx", 2);
    dc["spec"]["test"] = json!(true);
    let report = render(
        vec![
            dc,
            deployment("web", 1, "Complete", "2024-01-01T10:00:00Z", labels.clone()),
            deployment("web", 2, "Running", "2024-01-01T11:30:00Z", labels),
        ],
        Some(NS),
        false,
    )
    .await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    dc/web test deploys nginx
      test deployment #2 running for 30 minutes - 1 pod
      test deployment #1 deployed 2 hours ago

    1 warning identified, use 'oc status -v' to see details.
    ");
}

#[tokio::test]
async fn test_long_deployment_line_wraps_at_build() {
    let labels = json!({"app": "web"});
    let mut bc = build_config("web", "web:latest");
    bc["spec"]["source"]["git"]["uri"] = json!(
        "https://github.com/some-organization-with-a-long-name/a-repository-with-an-even-longer-name.git"
    );
    let report = render(
        vec![
            with_image_trigger(deployment_config("web", labels.clone(), "web", 1), "web:latest"),
            deployment("web", 1, "Complete", "2024-01-01T10:00:00Z", labels),
            bc,
            build("web", 1, "Complete", "2024-01-01T09:30:00Z"),
            image_stream("web", &["latest"]),
        ],
        Some(NS),
        false,
    )
    .await;
    assert_snapshot!(report.trim_end(), @r"
    In project example on server https://api.example.com:6443

    dc/web deploys istag/web:latest <-
      bc/web docker build of https://github.com/some-organization-with-a-long-name/a-repository-with-an-even-longer-name.git
      deployment #1 deployed 2 hours ago - 1 pod

    1 warning identified, use 'oc status -v' to see details.
    ");
}
