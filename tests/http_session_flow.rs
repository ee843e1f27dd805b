use serde_json::{Value, json};
use sessionward::api::v1::{CookieExchange, WarpCookieTransport, recover_error, routes};
use sessionward::application_impl::SessionAuthService;
use sessionward::domain_port::FnChecker;
use sessionward::server::{Server, Username};
use sessionward::settings::parse_settings_str;
use std::collections::BTreeSet;
use std::sync::Arc;
use time::OffsetDateTime;
use warp::Filter;
use warp::http::StatusCode;
use warp::http::header::SET_COOKIE;
use warp::hyper::body::Bytes;

const SETTINGS: &str = r#"
    [http]
    address = "127.0.0.1:0"

    [log]
    filter = "warn"

    [[users]]
    username = "alice"
    password = "pw"
    permissions = ["admin"]

    [[users]]
    username = "bob"
    password = "hunter2"
"#;

type Reply = warp::http::Response<Bytes>;

fn api(
    server: Server,
) -> impl Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone {
    warp::path("api")
        .and(warp::path("v1"))
        .and(routes(Arc::new(server)))
        .recover(recover_error)
}

fn demo_server() -> Server {
    Server::try_new(&parse_settings_str(SETTINGS).unwrap()).unwrap()
}

fn set_cookies(reply: &Reply) -> Vec<String> {
    reply
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn parse(set_cookie: &str) -> cookie::Cookie<'static> {
    cookie::Cookie::parse(set_cookie.to_string()).unwrap()
}

/// `name=value` pair of a `Set-Cookie` header, ready to send back.
fn cookie_pair(set_cookie: &str) -> String {
    parse(set_cookie).stripped().to_string()
}

fn body(reply: &Reply) -> Value {
    serde_json::from_slice(reply.body()).unwrap()
}

async fn login<F>(api: &F, username: &str, password: &str) -> Reply
where
    F: Filter + 'static,
    F::Extract: warp::Reply + Send,
{
    warp::test::request()
        .method("POST")
        .path("/api/v1/login")
        .json(&json!({ "username": username, "password": password }))
        .reply(api)
        .await
}

async fn get<F>(api: &F, path: &str, cookie: Option<&str>) -> Reply
where
    F: Filter + 'static,
    F::Extract: warp::Reply + Send,
{
    let mut request = warp::test::request().method("GET").path(path);
    if let Some(cookie) = cookie {
        request = request.header("cookie", cookie);
    }
    request.reply(api).await
}

async fn logout<F>(api: &F, cookie: Option<&str>) -> Reply
where
    F: Filter + 'static,
    F::Extract: warp::Reply + Send,
{
    let mut request = warp::test::request().method("POST").path("/api/v1/logout");
    if let Some(cookie) = cookie {
        request = request.header("cookie", cookie);
    }
    request.reply(api).await
}

#[tokio::test]
async fn login_me_logout_round_trip() {
    let api = api(demo_server());

    let reply = login(&api, "alice", "pw").await;
    assert_eq!(reply.status(), StatusCode::OK);
    assert_eq!(body(&reply)["data"]["username"], "alice");

    let issued = set_cookies(&reply);
    assert_eq!(issued.len(), 1);
    let sid = parse(&issued[0]);
    assert_eq!(sid.name(), "sid");
    assert!(!sid.value().is_empty());
    assert_eq!(sid.path(), Some("/"));
    assert_eq!(sid.http_only(), Some(true));
    assert!(sid.expires_datetime().unwrap() > OffsetDateTime::now_utc());
    let cookie = cookie_pair(&issued[0]);

    let reply = get(&api, "/api/v1/me", Some(&cookie)).await;
    assert_eq!(reply.status(), StatusCode::OK);
    assert_eq!(body(&reply)["data"]["username"], "alice");

    let reply = get(&api, "/api/v1/admin", Some(&cookie)).await;
    assert_eq!(reply.status(), StatusCode::OK);
    assert_eq!(body(&reply)["data"]["admin"], true);

    let reply = logout(&api, Some(&cookie)).await;
    assert_eq!(reply.status(), StatusCode::OK);
    let cleared = set_cookies(&reply);
    assert_eq!(cleared.len(), 1);
    let cleared = parse(&cleared[0]);
    assert_eq!(cleared.name(), "sid");
    assert_eq!(cleared.value(), "");
    assert_eq!(cleared.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));

    let reply = get(&api, "/api/v1/me", Some(&cookie)).await;
    assert_eq!(reply.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(&reply)["error"]["code"], "InvalidSession");
}

#[tokio::test]
async fn rejected_login_sets_no_cookie() {
    let api = api(demo_server());

    for (username, password) in [("alice", "wrong"), ("nobody", "pw")] {
        let reply = login(&api, username, password).await;
        assert_eq!(reply.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body(&reply)["error"]["code"], "NotAuthorized");
        assert!(set_cookies(&reply).is_empty());
    }
}

#[tokio::test]
async fn anonymous_requests_need_login() {
    let api = api(demo_server());

    let reply = get(&api, "/api/v1/me", None).await;
    assert_eq!(reply.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(&reply)["error"]["code"], "LoginRequired");

    let reply = get(&api, "/api/v1/me", Some("sid=forged")).await;
    assert_eq!(reply.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(&reply)["error"]["code"], "InvalidSession");
}

#[tokio::test]
async fn admin_route_requires_permission() {
    let api = api(demo_server());

    let reply = login(&api, "bob", "hunter2").await;
    let cookie = cookie_pair(&set_cookies(&reply)[0]);

    let reply = get(&api, "/api/v1/admin", Some(&cookie)).await;
    assert_eq!(reply.status(), StatusCode::FORBIDDEN);
    assert_eq!(body(&reply)["error"]["code"], "Forbidden");
}

#[tokio::test]
async fn logout_without_session_still_clears_cookie() {
    let api = api(demo_server());

    let reply = logout(&api, None).await;
    assert_eq!(reply.status(), StatusCode::OK);
    let cleared = set_cookies(&reply);
    assert_eq!(cleared.len(), 1);
    assert_eq!(parse(&cleared[0]).value(), "");

    let reply = logout(&api, Some("sid=stale")).await;
    assert_eq!(reply.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(set_cookies(&reply).len(), 1);
}

#[tokio::test]
async fn malformed_login_body_is_bad_request() {
    let api = api(demo_server());

    let reply = warp::test::request()
        .method("POST")
        .path("/api/v1/login")
        .json(&json!({ "user": "alice" }))
        .reply(&api)
        .await;
    assert_eq!(reply.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn permission_route_without_permission_checker_is_misconfigured() {
    let checker = FnChecker::new(
        |username, password| async move { Ok(username == "alice" && password == "pw") },
        |username| async move { Ok(username) },
    );
    let auth_service: SessionAuthService<Username, CookieExchange> =
        SessionAuthService::builder(Arc::new(checker), Arc::new(WarpCookieTransport))
            .cookie_name("session")
            .build()
            .unwrap();
    let server = Server::new(
        Arc::new(auth_service),
        BTreeSet::from(["admin".to_string()]),
    );
    let api = api(server);

    let reply = login(&api, "alice", "pw").await;
    let issued = set_cookies(&reply);
    assert_eq!(parse(&issued[0]).name(), "session");
    let cookie = cookie_pair(&issued[0]);

    let reply = get(&api, "/api/v1/me", Some(&cookie)).await;
    assert_eq!(reply.status(), StatusCode::OK);

    for _ in 0..2 {
        let reply = get(&api, "/api/v1/admin", Some(&cookie)).await;
        assert_eq!(reply.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&reply)["error"]["code"], "Misconfigured");
    }
}

#[test]
fn unsound_cookie_settings_refuse_to_start() {
    for session in [
        "cookie_path = \"/; Domain=evil.example\"",
        "cookie_duration_secs = 9223372036854775807",
    ] {
        let settings = parse_settings_str(&format!("{SETTINGS}\n[session]\n{session}\n")).unwrap();
        assert!(Server::try_new(&settings).is_err(), "{session}");
    }
}
