//! Integration tests for the API client against a mock HTTP server.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskdeck_api::{
    ApiClient, ApiError, NewTask, ProjectQuery, ProjectStatus, TaskPatch, TaskStatus,
};

fn project_json(id: &str, title: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": title,
        "description": "This is a test project description",
        "status": status,
        "owner": "user1",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-02T00:00:00.000Z",
    })
}

fn task_json(id: &str, title: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": title,
        "description": "A task description long enough",
        "status": status,
        "project": "p1",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z",
    })
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "alice@example.com",
            "password": "secret",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "t0k3n",
            "user": { "id": "u1", "email": "alice@example.com", "name": "Alice" },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let auth = client.login("alice@example.com", "secret").await.unwrap();

    assert_eq!(auth.access_token, "t0k3n");
    assert_eq!(auth.user.name, "Alice");
}

#[tokio::test]
async fn bearer_token_is_attached_when_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1"))
        .and(header("authorization", "Bearer t0k3n"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(project_json("p1", "Test Project", "active")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap().with_token("t0k3n");
    let project = client.get_project("p1").await.unwrap();

    assert_eq!(project.id, "p1");
    assert_eq!(project.status, ProjectStatus::Active);
}

#[tokio::test]
async fn list_projects_sends_filters_and_decodes_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "6"))
        .and(query_param("search", "deploy"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [project_json("p7", "Deploy pipeline", "active")],
            "total": 7,
            "page": 2,
            "limit": 6,
            "totalPages": 2,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let query = ProjectQuery {
        page: 2,
        limit: 6,
        search: Some("deploy".to_string()),
        status: Some(ProjectStatus::Active),
    };
    let page = client.list_projects(&query).await.unwrap();

    assert_eq!(page.total_pages, 2);
    assert_eq!(page.projects.len(), 1);
    assert_eq!(page.projects[0].title, "Deploy pipeline");
}

#[tokio::test]
async fn list_projects_omits_absent_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("page", "1"))
        .and(query_param_is_missing("search"))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [],
            "total": 0,
            "page": 1,
            "limit": 6,
            "totalPages": 0,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let page = client.list_projects(&ProjectQuery::new(1, 6)).await.unwrap();

    assert!(page.projects.is_empty());
}

#[tokio::test]
async fn non_2xx_maps_to_api_error_with_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Project not found" })),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let err = client.get_project("missing").await.unwrap_err();

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Project not found");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn create_task_posts_under_project() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/p1/tasks"))
        .and(body_json(json!({
            "title": "Write docs",
            "description": "Document the new endpoints",
            "status": "todo",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_json("t1", "Write docs", "todo")))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let task = client
        .create_task(
            "p1",
            &NewTask {
                title: "Write docs".to_string(),
                description: "Document the new endpoints".to_string(),
                status: Some(TaskStatus::Todo),
                due_date: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(task.id, "t1");
    assert_eq!(task.status, TaskStatus::Todo);
}

#[tokio::test]
async fn update_task_patches_only_given_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/tasks/t1"))
        .and(body_json(json!({ "status": "done" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json("t1", "Write docs", "done")))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let task = client
        .update_task("t1", &TaskPatch::status(TaskStatus::Done))
        .await
        .unwrap();

    assert_eq!(task.status, TaskStatus::Done);
}

#[tokio::test]
async fn project_tasks_scopes_to_status_when_given() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1/tasks"))
        .and(query_param("status", "in-progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_json("t2", "Ship it", "in-progress"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let tasks = client
        .project_tasks("p1", Some(TaskStatus::InProgress))
        .await
        .unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::InProgress);
}

#[tokio::test]
async fn delete_project_sends_delete_and_succeeds_on_204() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/projects/p1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    client.delete_project("p1").await.unwrap();
}
