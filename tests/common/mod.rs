//! Shared utilities for integration testing.

#![allow(dead_code)]

use alloy::primitives::{Address, U256};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::future::{BoxFuture, FutureExt};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use verified_profile::blockchain::{
    Asset, BlockchainError, ConfirmationStatus, WalletGateway,
};
use verified_profile::blockchain::types::BlockchainResult;
use verified_profile::config::{ConfirmationMode, FrontendConfig, TokensConfig};
use verified_profile::lifecycle::{initialize_with_gateway, Shutdown};
use verified_profile::withdraw::TokenSpec;
use verified_profile::HttpServer;

pub const KNOWN_PROFILE: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const WALLET: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Start a mock profile API that knows exactly one profile.
///
/// Unknown ids get `200 {"error": ...}`, which is how the real service
/// reports a missing profile.
pub async fn start_profile_api() -> SocketAddr {
    let app = Router::new().route(
        "/api/profile",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            match params.get("eth_profile_addr").map(String::as_str) {
                Some(KNOWN_PROFILE) => Json(json!({
                    "displayName": "Ada Lovelace",
                    "username": "ada",
                    "profileAddr": KNOWN_PROFILE,
                    "twitterHandle": "ada_l",
                    "twitterCred": { "type": "TwitterCredential" },
                    "domainName": "ada.dev",
                    "domainCred": { "type": "DomainCredential" }
                })),
                _ => Json(json!({ "error": "profile not found" })),
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start a profile API that answers every lookup with a non-JSON 500.
pub async fn start_broken_profile_api() -> SocketAddr {
    let app = Router::new().route(
        "/api/profile",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// In-memory chain; withdrawing zeroes the asset's balance after `delay`.
pub struct MockGateway {
    account: Option<Address>,
    balances: Mutex<HashMap<Asset, U256>>,
    revert_with: Mutex<Option<String>>,
    fail_reads: Mutex<bool>,
    delay: Duration,
}

impl MockGateway {
    pub fn new(account: Option<Address>) -> Self {
        let specs = TokenSpec::from_config(&TokensConfig::default()).unwrap();
        let balances = [
            (specs[0].asset, U256::from(2_500_000_000_000_000_000u128)),
            (specs[1].asset, U256::from(10_000_000_000_000_000_000u128)),
            (specs[2].asset, U256::from(7_250_000u64)),
        ]
        .into_iter()
        .collect();
        Self {
            account,
            balances: Mutex::new(balances),
            revert_with: Mutex::new(None),
            fail_reads: Mutex::new(false),
            delay: Duration::from_millis(0),
        }
    }

    pub fn connected() -> Self {
        Self::new(Some(WALLET.parse().unwrap()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn revert_with(&self, reason: &str) {
        *self.revert_with.lock().unwrap() = Some(reason.to_string());
    }

    pub fn fail_reads(&self) {
        *self.fail_reads.lock().unwrap() = true;
    }
}

impl WalletGateway for MockGateway {
    fn connected_account(&self) -> Option<Address> {
        self.account
    }

    fn balance_of(&self, _holder: Address, asset: Asset) -> BoxFuture<'_, BlockchainResult<U256>> {
        async move {
            if *self.fail_reads.lock().unwrap() {
                return Err(BlockchainError::Rpc("connection refused".to_string()));
            }
            Ok(self.balances.lock().unwrap().get(&asset).copied().unwrap_or_default())
        }
        .boxed()
    }

    fn withdraw(
        &self,
        _profile: Address,
        asset: Asset,
        _mode: ConfirmationMode,
    ) -> BoxFuture<'_, BlockchainResult<ConfirmationStatus>> {
        async move {
            tokio::time::sleep(self.delay).await;
            if let Some(reason) = self.revert_with.lock().unwrap().clone() {
                return Err(BlockchainError::Rpc(reason));
            }
            self.balances.lock().unwrap().insert(asset, U256::ZERO);
            Ok(ConfirmationStatus::Confirmed { block_number: 42 })
        }
        .boxed()
    }

    fn is_healthy(&self) -> BoxFuture<'_, bool> {
        async { true }.boxed()
    }
}

/// A running front end bound to an ephemeral port.
pub struct TestFrontend {
    pub base_url: String,
    pub shutdown: Shutdown,
}

impl TestFrontend {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestFrontend {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the HTTP server against the mock profile API and `gateway`.
pub async fn start_frontend(
    gateway: Arc<MockGateway>,
    profile_addr: Option<&str>,
) -> TestFrontend {
    let api_addr = start_profile_api().await;
    start_frontend_with_api(gateway, profile_addr, &format!("http://{}", api_addr)).await
}

/// Like [`start_frontend`], but against an arbitrary profile API host.
pub async fn start_frontend_with_api(
    gateway: Arc<MockGateway>,
    profile_addr: Option<&str>,
    api_host: &str,
) -> TestFrontend {
    let mut config = FrontendConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.api.host = api_host.to_string();
    config.api.timeout_secs = 2;
    config.session.profile_addr = profile_addr.map(str::to_string);

    let frontend = initialize_with_gateway(config, gateway).unwrap();
    if frontend.withdraw.profile_addr().is_some() {
        frontend.withdraw.fetch_balances().await.unwrap();
    }

    let listener = TcpListener::bind(&frontend.config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(frontend.config, frontend.profiles, frontend.withdraw);
    tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestFrontend {
        base_url: format!("http://{}", addr),
        shutdown,
    }
}

/// Poll `GET /api/withdraw` until `done` holds or a second passes.
pub async fn poll_withdraw<F>(client: &reqwest::Client, frontend: &TestFrontend, done: F) -> Value
where
    F: Fn(&Value) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    loop {
        let view: Value = client
            .get(frontend.url("/api/withdraw"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if done(&view) || tokio::time::Instant::now() >= deadline {
            return view;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
