/// Walks one login/logout cycle against the in-memory store without HTTP,
/// printing the cookies the transport would have sent.
///
/// $ cargo run --bin session_demo -- --settings=settings/dev.toml
use sessionward::api::v1::{CookieExchange, render_set_cookie};
use sessionward::application_port::{AuthService, LoginInput};
use sessionward::logger::*;
use sessionward::server::Server;
use sessionward::settings::*;
use warp::http::header::COOKIE;
use warp::http::{HeaderMap, HeaderValue};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap()?;
    let cli = Cli::parse();
    let project_settings = parse_settings(cli.settings.as_deref())?;
    logger.reload_from_config(&LogConfig {
        filter: project_settings.log.filter.clone(),
    })?;

    let Some(user) = project_settings.users.first() else {
        return Err(anyhow::anyhow!("settings contain no [[users]] to log in with"));
    };
    let server = Server::try_new(&project_settings)?;
    let auth = server.auth_service.clone();

    let mut login = CookieExchange::default();
    auth.login(
        &mut login,
        LoginInput {
            username: user.username.clone(),
            password: user.password.clone(),
        },
    )
    .await?;
    let issued = login
        .outbound()
        .next()
        .ok_or_else(|| anyhow::anyhow!("login wrote no cookie"))?
        .clone();
    println!("Set-Cookie: {}", render_set_cookie(&issued)?);

    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!("{}={}", issued.name, issued.value))?,
    );
    let mut request = CookieExchange::from_headers(&headers);
    println!("request_user -> {:?}", auth.request_user(&request).await?);

    auth.logout(&mut request).await?;
    for cookie in request.outbound() {
        println!("Set-Cookie: {}", render_set_cookie(cookie)?);
    }
    println!(
        "is_logged after logout -> {:?}",
        auth.is_logged(&CookieExchange::from_headers(&headers)).await
    );

    Ok(())
}
