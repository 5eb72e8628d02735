use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use hemmy_auth::RouteGuard;
use hemmy_web::app::{build_app, shell_pages};
use reqwest::redirect::Policy;
use tower::ServiceExt;

fn app() -> axum::Router {
    build_app(shell_pages(), RouteGuard::default())
}

async fn get(path: &str, cookie: Option<&str>) -> axum::response::Response {
    let mut req = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    app().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
}

fn location(res: &axum::response::Response) -> Option<&str> {
    res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn anonymous_navigation_goes_to_login() {
    let res = get("/clients", None).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), Some("/login"));
}

#[tokio::test]
async fn login_page_is_open_without_session() {
    let res = get("/login", None).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn signed_in_user_is_bounced_off_login() {
    let res = get("/login", Some("grupo_hemmy_auth=tok")).await;
    assert_eq!(location(&res), Some("/"));

    let res = get("/login", Some("grupo_hemmy_auth=tok; is_locked=true")).await;
    assert_eq!(location(&res), Some("/lock-screen"));
}

#[tokio::test]
async fn locked_session_is_held_at_lock_screen() {
    let res = get("/payments?page=2", Some("grupo_hemmy_auth=tok; is_locked=true")).await;
    assert_eq!(location(&res), Some("/lock-screen"));

    let res = get("/lock-screen", Some("grupo_hemmy_auth=tok; is_locked=true")).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn open_session_reaches_pages() {
    let res = get("/", Some("grupo_hemmy_auth=tok")).await;
    assert_eq!(res.status(), StatusCode::OK);

    // Passes the guard, then hits the shell's fallback.
    let res = get("/clients", Some("grupo_hemmy_auth=tok")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assets_and_health_bypass_the_guard() {
    let res = get("/logo.svg", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = get("/health", None).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn black_box_redirect_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app()).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap();
    let res = client
        .get(format!("http://{addr}/devices"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 307);
    assert_eq!(
        res.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/login")
    );

    handle.abort();
}
