use super::*;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use pulsewatch_config::SchedulerConfig;
use pulsewatch_ledger::{ExecutionLedger, ExecutionQueryService, MemoryLedger, NewExecution};
use pulsewatch_monitor::JobExecutor;
use pulsewatch_scheduler::JobScheduler;

struct NoopExecutor;

#[async_trait]
impl JobExecutor for NoopExecutor {
    async fn run(&self, _job_name: &str, _url: &str) {}
}

struct TestApp {
    router: Router,
    scheduler: Arc<JobScheduler>,
}

async fn create_test_app(max_jobs_allowed: usize) -> TestApp {
    let ledger = Arc::new(MemoryLedger::new());
    for rt in [30u64, 10, 20] {
        ledger
            .append(NewExecution::succeeded("ping", "http://a.test/ping", rt))
            .await
            .unwrap();
    }
    ledger
        .append(NewExecution::failed("ping404", "http://a.test/missing", 4, "404 Not Found"))
        .await
        .unwrap();

    let config = SchedulerConfig {
        max_jobs_allowed,
        ..Default::default()
    };
    let scheduler = Arc::new(JobScheduler::new(&config, Arc::new(NoopExecutor)));
    let executions = Arc::new(ExecutionQueryService::new(ledger, 50));
    let state = Arc::new(AppState::new(scheduler.clone(), executions));

    TestApp {
        router: create_router(state),
        scheduler,
    }
}

fn post_job(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/jobs")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn job(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "description": "health check",
        "url": "http://localhost:9/ping",
        "cronExpression": "0 0 0 1 1 *",
        "timezone": "Europe/Berlin"
    })
}

#[tokio::test]
async fn test_create_job_endpoint() {
    let app = create_test_app(5).await;

    let response = app.router.oneshot(post_job(job("ping"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["name"], "ping");
    assert_eq!(body["cronExpression"], "0 0 0 1 1 *");
    assert_eq!(body["timezone"], "Europe/Berlin");
    assert!(app.scheduler.contains("ping"));

    app.scheduler.shutdown().await;
}

#[tokio::test]
async fn test_duplicate_job_is_conflict() {
    let app = create_test_app(5).await;
    app.router.clone().oneshot(post_job(job("ping"))).await.unwrap();

    let response = app.router.oneshot(post_job(job("ping"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["code"], "job_already_exists");

    app.scheduler.shutdown().await;
}

#[tokio::test]
async fn test_max_jobs_is_unprocessable() {
    let app = create_test_app(1).await;
    app.router.clone().oneshot(post_job(job("a"))).await.unwrap();

    let response = app.router.oneshot(post_job(job("b"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["code"], "max_jobs_reach");
    assert_eq!(body["status"], 422);

    app.scheduler.shutdown().await;
}

#[tokio::test]
async fn test_invalid_cron_is_bad_request() {
    let app = create_test_app(5).await;
    let mut body = job("ping");
    body["cronExpression"] = Value::from("whenever");

    let response = app.router.oneshot(post_job(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "invalid_request_params");
    assert_eq!(body["invalidParams"][0]["name"], "cronExpression");
    assert_eq!(app.scheduler.job_count(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = create_test_app(5).await;
    let request = Request::builder()
        .method("POST")
        .uri("/jobs")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_jobs_endpoint() {
    let app = create_test_app(5).await;
    app.router.clone().oneshot(post_job(job("ping"))).await.unwrap();

    let response = app.router.oneshot(get_request("/jobs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["jobs"][0]["name"], "ping");

    app.scheduler.shutdown().await;
}

#[tokio::test]
async fn test_list_executions_defaults() {
    let app = create_test_app(5).await;

    let response = app.router.oneshot(get_request("/jobs/executions")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["totalElements"], 4);
    assert_eq!(body["totalPages"], 1);
    let list = body["jobExecutionList"].as_array().unwrap();
    assert_eq!(list.len(), 4);
    assert_eq!(list[0]["jobName"], "ping404");
}

#[tokio::test]
async fn test_list_executions_filtered_and_sorted() {
    let app = create_test_app(5).await;

    let response = app
        .router
        .oneshot(get_request(
            "/jobs/executions?jobName=ping&status=succeeded&sortProperties=responseTime&sortDirection=asc&limit=2&offset=0",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["totalElements"], 3);
    assert_eq!(body["totalPages"], 2);
    let times: Vec<u64> = body["jobExecutionList"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["responseTime"].as_u64().unwrap())
        .collect();
    assert_eq!(times, vec![10, 20]);
}

#[tokio::test]
async fn test_list_executions_rejects_bad_status() {
    let app = create_test_app(5).await;

    let response = app
        .router
        .oneshot(get_request("/jobs/executions?status=RUNNING"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "invalid_request_params");
    assert_eq!(body["invalidParams"][0]["name"], "status");
}

#[tokio::test]
async fn test_list_executions_rejects_inverted_range() {
    let app = create_test_app(5).await;

    let response = app
        .router
        .oneshot(get_request(
            "/jobs/executions?from=2024-05-02T00:00:00Z&to=2024-05-01T00:00:00Z",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "invalid_date_range");
}

#[tokio::test]
async fn test_list_executions_rejects_oversized_page() {
    let app = create_test_app(5).await;

    let response = app
        .router
        .oneshot(get_request("/jobs/executions?limit=500"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["invalidParams"][0]["name"], "limit");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(5).await;
    app.router.clone().oneshot(post_job(job("ping"))).await.unwrap();

    let response = app.router.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["registeredJobs"], 1);
    assert!(body["uptimeSecs"].is_u64());

    app.scheduler.shutdown().await;
}
