use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use checklist_store::{MemorySessionStore, SessionStore};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::StartError;
use crate::handlers;
use crate::health::{self, HealthResponse};
use crate::shutdown::{TaskGroup, DEFAULT_GRACE};
use crate::views::Views;

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub views: Arc<Views>,
    pub config: Arc<ServerConfig>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn SessionStore>) -> Result<Self, StartError> {
        Ok(Self {
            store,
            views: Arc::new(Views::new()?),
            config: Arc::new(config),
            start_time: Instant::now(),
        })
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(health_handler))
        .route("/lists", get(handlers::index).post(handlers::create_list))
        .route("/lists/new", get(handlers::new_list))
        .route("/lists/{id}", get(handlers::show_list))
        .route(
            "/lists/{id}/edit",
            get(handlers::edit_list).post(handlers::rename_list),
        )
        .route("/lists/{id}/destroy", post(handlers::destroy_list))
        .route("/lists/{id}/todos", post(handlers::add_todo))
        .route(
            "/lists/{id}/todos/complete_all",
            post(handlers::complete_all),
        )
        .route(
            "/lists/{id}/todos/{todo_id}/destroy",
            post(handlers::destroy_todo),
        )
        .route(
            "/lists/{id}/todos/{todo_id}/check",
            post(handlers::check_todo),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(
        state.start_time,
        state.store.len(),
        state.config.max_sessions,
    ))
}

/// In-memory store sized by `config.max_sessions`.
fn session_store(config: &ServerConfig) -> MemorySessionStore {
    match config.max_sessions {
        Some(limit) => MemorySessionStore::new().with_max_sessions(limit),
        None => MemorySessionStore::new(),
    }
}

/// Periodically drop idle sessions until `token` is cancelled.
async fn sweep_idle_sessions(
    store: Arc<MemorySessionStore>,
    config: &ServerConfig,
    token: CancellationToken,
) {
    let interval = config.sweep_interval;
    let idle = match chrono::Duration::from_std(config.idle_timeout) {
        Ok(idle) => idle,
        Err(e) => {
            warn!(error = %e, "idle timeout out of range, using one day");
            chrono::Duration::days(1)
        }
    };

    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = ticker.tick() => {
                let _ = store.sweep_expired(chrono::Utc::now(), idle);
            }
        }
    }
}

/// Bind the listener and start serving. Returns a handle to shut it down.
pub async fn start(config: ServerConfig) -> Result<ServerHandle, StartError> {
    let store = Arc::new(session_store(&config));
    let mut tasks = TaskGroup::new();

    let addr = format!("{}:{}", config.host, config.port);
    let sweeper = {
        let store = Arc::clone(&store);
        let config = config.clone();
        let token = tasks.token();
        async move { sweep_idle_sessions(store, &config, token).await }
    };
    let state = AppState::new(config, store)?;
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "checklist server listening");

    let token = tasks.token();
    tasks.spawn("http", async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await;
        if let Err(e) = result {
            warn!(error = %e, "server exited with error");
        }
    });
    tasks.spawn("session-sweeper", sweeper);

    Ok(ServerHandle {
        port: local_addr.port(),
        tasks,
    })
}

/// Handle returned by `start()`; keeps background tasks alive.
pub struct ServerHandle {
    pub port: u16,
    tasks: TaskGroup,
}

impl ServerHandle {
    /// Stop accepting connections and wait for in-flight work.
    pub async fn shutdown(self) {
        let aborted = self.tasks.stop(DEFAULT_GRACE).await;
        if aborted > 0 {
            warn!(aborted, "shutdown grace period elapsed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use checklist_core::ids::SessionId;
    use checklist_core::lists::RenamePolicy;
    use checklist_store::SessionData;
    use tower::ServiceExt;

    struct Client {
        router: Router,
        store: Arc<MemorySessionStore>,
        cookie: Option<String>,
    }

    impl Client {
        fn new() -> Self {
            Self::with_config(ServerConfig::default())
        }

        fn with_config(config: ServerConfig) -> Self {
            let store = Arc::new(session_store(&config));
            let state = AppState::new(config, store.clone()).unwrap();
            Self {
                router: build_router(state),
                store,
                cookie: None,
            }
        }

        async fn send(&mut self, req: axum::http::request::Builder, body: Body) -> Response {
            let req = match &self.cookie {
                Some(cookie) => req.header(header::COOKIE, cookie),
                None => req,
            };
            let resp = self.router.clone().oneshot(req.body(body).unwrap()).await.unwrap();
            if let Some(set) = resp.headers().get(header::SET_COOKIE) {
                let pair = set.to_str().unwrap().split(';').next().unwrap();
                self.cookie = Some(pair.to_string());
            }
            resp
        }

        async fn get(&mut self, uri: &str) -> Response {
            self.send(Request::builder().uri(uri), Body::empty()).await
        }

        async fn post(&mut self, uri: &str, form: &str) -> Response {
            let req = Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            self.send(req, Body::from(form.to_string())).await
        }

        fn session_id(&self) -> SessionId {
            let cookie = self.cookie.as_ref().expect("no session cookie yet");
            SessionId::from_raw(cookie.split_once('=').unwrap().1)
        }

        fn session(&self) -> SessionData {
            self.store.get(&self.session_id()).unwrap()
        }
    }

    fn location(resp: &Response) -> &str {
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    async fn body(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn root_redirects_to_lists() {
        let mut client = Client::new();
        let resp = client.get("/").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/lists");
    }

    #[tokio::test]
    async fn first_write_sets_session_cookie() {
        let mut client = Client::new();
        let resp = client.post("/lists", "list_name=Work").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let set = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set.starts_with("checklist_session=sess_"));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("SameSite=Lax"));
        assert_eq!(client.store.len(), 1);
    }

    #[tokio::test]
    async fn anonymous_reads_store_nothing() {
        let mut client = Client::new();
        for uri in ["/lists", "/lists/new", "/health"] {
            let resp = client.get(uri).await;
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
            assert!(resp.headers().get(header::SET_COOKIE).is_none(), "{uri}");
        }
        assert!(client.store.is_empty());
    }

    #[tokio::test]
    async fn anonymous_reads_do_not_exhaust_capacity() {
        let config = ServerConfig {
            max_sessions: Some(3),
            ..ServerConfig::default()
        };
        let mut visitor = Client::with_config(config);
        for _ in 0..3 {
            let _ = visitor.get("/lists").await;
        }
        assert_eq!(visitor.store.len(), 0);

        let mut user = Client {
            router: visitor.router.clone(),
            store: visitor.store.clone(),
            cookie: None,
        };
        let resp = user.post("/lists", "list_name=Work").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(user.store.len(), 1);
    }

    #[tokio::test]
    async fn capacity_still_applies_to_sessions_with_lists() {
        let config = ServerConfig {
            max_sessions: Some(1),
            ..ServerConfig::default()
        };
        let mut first = Client::with_config(config);
        let _ = first.post("/lists", "list_name=Work").await;

        let mut second = Client {
            router: first.router.clone(),
            store: first.store.clone(),
            cookie: None,
        };
        let resp = second.post("/lists", "list_name=Home").await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        // existing sessions keep working
        let resp = first.post("/lists", "list_name=Home").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn emptied_session_releases_its_slot() {
        let mut client = Client::new();
        let _ = client.post("/lists", "list_name=Work").await;
        let _ = client.post("/lists/0/destroy", "").await;
        // the delete flash is still pending
        assert_eq!(client.store.len(), 1);

        let html = body(client.get("/lists").await).await;
        assert!(html.contains("The list has been deleted."));
        assert!(client.store.is_empty());
    }

    #[tokio::test]
    async fn malformed_cookie_gets_replaced() {
        let mut client = Client::new();
        client.cookie = Some("checklist_session=forged".to_string());
        let _ = client.post("/lists", "list_name=Work").await;
        assert!(client.session_id().as_str().starts_with("sess_"));
        assert_eq!(client.session().lists.len(), 1);
    }

    #[tokio::test]
    async fn create_list_flow() {
        let mut client = Client::new();
        let resp = client.post("/lists", "list_name=++Groceries++").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/lists");
        assert_eq!(client.session().lists.get(0).unwrap().name, "Groceries");

        let html = body(client.get("/lists").await).await;
        assert!(html.contains("The list has been created."));
        assert!(html.contains("Groceries"));

        // flash is shown once
        let html = body(client.get("/lists").await).await;
        assert!(!html.contains("The list has been created."));
    }

    #[tokio::test]
    async fn duplicate_list_rerenders_form() {
        let mut client = Client::new();
        let _ = client.post("/lists", "list_name=Work").await;
        let resp = client.post("/lists", "list_name=Work").await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body(resp).await;
        assert!(html.contains("The list name must be unique."));
        assert!(html.contains(r#"action="/lists""#));
        assert_eq!(client.session().lists.len(), 1);
    }

    #[tokio::test]
    async fn empty_list_name_rejected() {
        let mut client = Client::new();
        let resp = client.post("/lists", "list_name=+++").await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body(resp).await.contains("between 1 and 100"));
        assert!(client.store.is_empty());
    }

    #[tokio::test]
    async fn show_missing_list_redirects_with_error() {
        let mut client = Client::new();
        for uri in ["/lists/0", "/lists/abc", "/lists/-1/edit", "/lists/+0"] {
            let resp = client.get(uri).await;
            assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(location(&resp), "/lists");
        }
        let html = body(client.get("/lists").await).await;
        assert!(html.contains("The specified list was not found."));
    }

    #[tokio::test]
    async fn rename_flow() {
        let mut client = Client::new();
        let _ = client.post("/lists", "list_name=Work").await;
        let _ = client.post("/lists", "list_name=Home").await;

        let resp = client.post("/lists/0/edit", "list_name=Office").await;
        assert_eq!(location(&resp), "/lists/0");
        assert_eq!(client.session().lists.get(0).unwrap().name, "Office");

        let resp = client.post("/lists/0/edit", "list_name=Home").await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body(resp).await;
        assert!(html.contains("The list name must be unique."));
        assert!(html.contains(r#"action="/lists/0/edit""#));
    }

    #[tokio::test]
    async fn rename_to_same_name_depends_on_policy() {
        let mut lenient = Client::new();
        let _ = lenient.post("/lists", "list_name=Work").await;
        let resp = lenient.post("/lists/0/edit", "list_name=Work").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let mut strict = Client::with_config(ServerConfig {
            rename_policy: RenamePolicy::Strict,
            ..ServerConfig::default()
        });
        let _ = strict.post("/lists", "list_name=Work").await;
        let resp = strict.post("/lists/0/edit", "list_name=Work").await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn destroy_list_shifts_indices() {
        let mut client = Client::new();
        for name in ["A", "B", "C"] {
            let _ = client.post("/lists", &format!("list_name={name}")).await;
        }
        let resp = client.post("/lists/0/destroy", "").await;
        assert_eq!(location(&resp), "/lists");
        let data = client.session();
        assert_eq!(data.lists.len(), 2);
        assert_eq!(data.lists.get(1).unwrap().name, "C");
        assert_eq!(data.flash.delete.as_deref(), Some("The list has been deleted."));

        let resp = client.post("/lists/5/destroy", "").await;
        assert_eq!(location(&resp), "/lists");
        assert_eq!(client.session().lists.len(), 2);
    }

    #[tokio::test]
    async fn todo_lifecycle() {
        let mut client = Client::new();
        let _ = client.post("/lists", "list_name=Work").await;

        let resp = client.post("/lists/0/todos", "todo=Write+report").await;
        assert_eq!(location(&resp), "/lists/0");
        let _ = client.post("/lists/0/todos", "todo=Review").await;

        let resp = client.post("/lists/0/todos/0/check", "completed=true").await;
        assert_eq!(location(&resp), "/lists/0");
        let list = client.session().lists.get(0).unwrap().clone();
        assert!(list.todos[0].completed);
        assert_eq!(list.remaining_count(), 1);

        // completed todo renders last but its actions keep position 0
        let html = body(client.get("/lists/0").await).await;
        let review = html.find("/lists/0/todos/1/check").unwrap();
        let report = html.find("/lists/0/todos/0/check").unwrap();
        assert!(review < report);

        let _ = client.post("/lists/0/todos/0/check", "completed=nope").await;
        assert!(!client.session().lists.get(0).unwrap().todos[0].completed);

        let _ = client.post("/lists/0/todos/0/destroy", "").await;
        let list = client.session().lists.get(0).unwrap().clone();
        assert_eq!(list.todos.len(), 1);
        assert_eq!(list.todos[0].name, "Review");

        let _ = client.post("/lists/0/todos", "todo=Ship").await;
        let ids: Vec<u64> = client
            .session()
            .lists
            .get(0)
            .unwrap()
            .todos
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn invalid_todo_rerenders_list() {
        let mut client = Client::new();
        let _ = client.post("/lists", "list_name=Work").await;
        let resp = client.post("/lists/0/todos", "todo=").await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body(resp).await;
        assert!(html.contains("The todo name must be between 1 and 100 characters."));
        assert!(client.session().lists.get(0).unwrap().todos.is_empty());
    }

    #[tokio::test]
    async fn missing_todo_redirects_with_error() {
        let mut client = Client::new();
        let _ = client.post("/lists", "list_name=Work").await;
        let resp = client.post("/lists/0/todos/3/destroy", "").await;
        assert_eq!(location(&resp), "/lists");
        assert_eq!(
            client.session().flash.error.as_deref(),
            Some("The specified todo was not found.")
        );

        let resp = client.post("/lists/4/todos", "todo=x").await;
        assert_eq!(location(&resp), "/lists");
    }

    #[tokio::test]
    async fn complete_all_marks_list_complete() {
        let mut client = Client::new();
        let _ = client.post("/lists", "list_name=Chores").await;
        for todo in ["a", "b", "c"] {
            let _ = client.post("/lists/0/todos", &format!("todo={todo}")).await;
        }
        let _ = client.post("/lists/0/todos/1/check", "completed=true").await;

        let resp = client.post("/lists/0/todos/complete_all", "").await;
        assert_eq!(location(&resp), "/lists/0");
        let list = client.session().lists.get(0).unwrap().clone();
        assert!(list.is_complete());
        assert_eq!(list.remaining_count(), 0);
    }

    #[tokio::test]
    async fn sessions_do_not_share_lists() {
        let mut alice = Client::new();
        let _ = alice.post("/lists", "list_name=Private").await;

        let mut bob = Client {
            router: alice.router.clone(),
            store: alice.store.clone(),
            cookie: None,
        };
        let _ = bob.post("/lists", "list_name=Shared").await;
        let html = body(bob.get("/lists").await).await;
        assert!(!html.contains("Private"));
        assert!(html.contains("Shared"));
        assert_eq!(alice.store.len(), 2);
        assert_eq!(alice.session().lists.len(), 1);
    }

    #[tokio::test]
    async fn health_endpoint_reports_sessions() {
        let mut client = Client::new();
        let _ = client.post("/lists", "list_name=Work").await;
        let resp = client.get("/health").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let parsed: serde_json::Value = serde_json::from_str(&body(resp).await).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["active_sessions"], 1);
        assert_eq!(parsed["session_limit"], 10_000);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let mut client = Client::new();
        let resp = client.get("/nonexistent").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn server_starts_and_serves_health() {
        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        let handle = start(config).await.unwrap();
        assert!(handle.port > 0);

        let url = format!("http://127.0.0.1:{}/health", handle.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "ok");

        handle.shutdown().await;
    }
}
