//! End-to-end redirect tests for the gateway.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::sync::mpsc;
use xui_gateway::config::GatewayConfig;
use xui_gateway::filter::XuiFlag;
use xui_gateway::http::HttpServer;
use xui_gateway::lifecycle::Shutdown;

mod common;

fn gateway_config(gateway: SocketAddr, backend: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = gateway.to_string();
    config.upstream.address = backend.to_string();
    config.upstream.context_path = "/openam".to_string();
    config
}

async fn start_gateway(config: GatewayConfig) -> (XuiFlag, Shutdown) {
    let addr = config.listener.bind_address.clone();
    let flag = XuiFlag::new(config.xui.enabled);

    let shutdown = Shutdown::new();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config, flag.clone());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;

    (flag, shutdown)
}

fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

fn location(res: &reqwest::Response) -> &str {
    res.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[tokio::test]
async fn test_disabled_flag_forwards_to_upstream() {
    let backend_addr: SocketAddr = "127.0.0.1:28481".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28482".parse().unwrap();

    let hits = common::start_mock_backend(backend_addr, "legacy-ok").await;

    let mut config = gateway_config(gateway_addr, backend_addr);
    config.xui.enabled = false;
    let (_flag, shutdown) = start_gateway(config).await;

    let client = no_redirect_client();
    let res = client
        .get(format!("http://{}/openam/UI/Logout", gateway_addr))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 200);
    assert!(res.headers().get("location").is_none());
    assert_eq!(res.text().await.unwrap(), "legacy-ok");
    assert_eq!(hits.load(Ordering::SeqCst), 1, "Upstream should be hit once");

    shutdown.trigger();
}

#[tokio::test]
async fn test_logout_redirects_with_query_preserved() {
    let backend_addr: SocketAddr = "127.0.0.1:28483".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28484".parse().unwrap();

    let hits = common::start_mock_backend(backend_addr, "unused").await;
    let (_flag, shutdown) = start_gateway(gateway_config(gateway_addr, backend_addr)).await;

    let client = no_redirect_client();
    let res = client
        .get(format!("http://{}/openam/UI/Logout?realm=/", gateway_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 302);
    assert_eq!(location(&res), "/openam/XUI/#logout/&realm=/");
    assert_eq!(hits.load(Ordering::SeqCst), 0, "Upstream must not be hit");

    shutdown.trigger();
}

#[tokio::test]
async fn test_profile_redirect_without_query() {
    let backend_addr: SocketAddr = "127.0.0.1:28485".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28486".parse().unwrap();

    common::start_mock_backend(backend_addr, "unused").await;
    let (_flag, shutdown) = start_gateway(gateway_config(gateway_addr, backend_addr)).await;

    let client = no_redirect_client();
    let res = client
        .get(format!("http://{}/openam/idm/EndUser", gateway_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 302);
    assert_eq!(location(&res), "/openam/XUI/#profile/");

    shutdown.trigger();
}

#[tokio::test]
async fn test_login_passes_query_through_verbatim() {
    let backend_addr: SocketAddr = "127.0.0.1:28487".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28488".parse().unwrap();

    common::start_mock_backend(backend_addr, "unused").await;
    let (_flag, shutdown) = start_gateway(gateway_config(gateway_addr, backend_addr)).await;

    let client = no_redirect_client();
    let res = client
        .get(format!(
            "http://{}/openam/UI/Login?goto=http://x/y",
            gateway_addr
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 302);
    assert_eq!(location(&res), "/openam/XUI/#login/&goto=http://x/y");

    shutdown.trigger();
}

#[tokio::test]
async fn test_composite_advice_is_rewritten() {
    let backend_addr: SocketAddr = "127.0.0.1:28489".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28490".parse().unwrap();

    common::start_mock_backend(backend_addr, "unused").await;
    let (_flag, shutdown) = start_gateway(gateway_config(gateway_addr, backend_addr)).await;

    let client = no_redirect_client();
    let res = client
        .get(format!(
            "http://{}/openam/UI/Login?sunamcompositeadvice=%3CAdvices%2F%3E&goto=http%3A%2F%2Fx%2Fy",
            gateway_addr
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 302);
    assert_eq!(
        location(&res),
        "/openam/XUI/#login/&goto=http%3A%2F%2Fx%2Fy&authIndexType=composite_advice&authIndexValue=%3CAdvices%2F%3E"
    );
    assert!(!location(&res).contains("sunamcompositeadvice"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_advice_parameter_matches_case_insensitively() {
    let backend_addr: SocketAddr = "127.0.0.1:28491".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28492".parse().unwrap();

    common::start_mock_backend(backend_addr, "unused").await;
    let (_flag, shutdown) = start_gateway(gateway_config(gateway_addr, backend_addr)).await;

    let client = no_redirect_client();
    let res = client
        .get(format!(
            "http://{}/openam/UI/Login?SunAmCompositeAdvice=X",
            gateway_addr
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 302);
    assert!(location(&res).contains("authIndexValue=X"));
    assert!(!location(&res).contains("SunAmCompositeAdvice="));

    shutdown.trigger();
}

#[tokio::test]
async fn test_xui_assets_are_forwarded() {
    let backend_addr: SocketAddr = "127.0.0.1:28493".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28494".parse().unwrap();

    let hits = common::start_mock_backend(backend_addr, "app-js").await;
    let (_flag, shutdown) = start_gateway(gateway_config(gateway_addr, backend_addr)).await;

    let client = no_redirect_client();
    let res = client
        .get(format!("http://{}/openam/XUI/app.js", gateway_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "app-js");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_flag_toggle_switches_behavior() {
    let backend_addr: SocketAddr = "127.0.0.1:28495".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28496".parse().unwrap();

    common::start_mock_backend(backend_addr, "legacy-ok").await;
    let (flag, shutdown) = start_gateway(gateway_config(gateway_addr, backend_addr)).await;

    let client = no_redirect_client();
    let url = format!("http://{}/openam/UI/Logout", gateway_addr);

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 302);

    flag.set(false);
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 200);

    flag.set(true);
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 302);

    shutdown.trigger();
}
