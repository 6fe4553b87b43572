use alloy::primitives::{address, Address};
use axum::{body::Body, extract::Request, Extension, Router};
use http::{header, StatusCode};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

use crate::{
	config::Config,
	ens::{tests::StaticLookup, AvatarUrlBuilder, Resolver},
	server,
	types::CDN_CACHE_CONTROL,
};

const VITALIK: Address = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
const AVATAR_BASE: &str = "https://metadata.ens.domains/mainnet/avatar";

fn app(lookup: Arc<StaticLookup>) -> Router {
	let config = Config {
		rpc_url: "http://localhost:8545".parse().unwrap(),
		shadow_rpc_url: None,
		rpc_timeout: Duration::from_secs(1),
		ens_registry: Address::ZERO,
		avatars: AvatarUrlBuilder::new(&AVATAR_BASE.parse().unwrap()),
	};

	server::router(config, Extension(Arc::new(Resolver::new(lookup))))
}

async fn get(app: Router, uri: &str) -> (StatusCode, http::HeaderMap, Value) {
	let response = app
		.oneshot(Request::get(uri).body(Body::empty()).unwrap())
		.await
		.unwrap();

	let status = response.status();
	let headers = response.headers().clone();
	let body = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	let json = if body.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&body).unwrap()
	};

	(status, headers, json)
}

#[tokio::test]
async fn mixed_case_address_redirects_to_lowercase() {
	let lookup = Arc::new(StaticLookup::default());
	let (status, headers, _) = get(
		app(lookup.clone()),
		"/api/ens/resolve/0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
	)
	.await;

	assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
	assert_eq!(
		headers[header::LOCATION],
		"/api/ens/resolve/0xd8da6bf26964af9d7eed9e03e53415d37aa96045"
	);
	assert_eq!(lookup.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn redirect_preserves_query_string() {
	let (status, headers, _) = get(
		app(Arc::new(StaticLookup::default())),
		"/api/ens/resolve/Vitalik.ETH?ref=Home&x=1",
	)
	.await;

	assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
	assert_eq!(
		headers[header::LOCATION],
		"/api/ens/resolve/vitalik.eth?ref=Home&x=1"
	);
}

#[tokio::test]
async fn address_without_primary_name_uses_elided_address() {
	let (status, headers, body) = get(
		app(Arc::new(StaticLookup::default())),
		"/api/ens/resolve/0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		headers[CDN_CACHE_CONTROL],
		"s-maxage=86400, stale-while-revalidate"
	);
	assert_eq!(
		body,
		json!({
			"address": "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
			"name": null,
			"displayName": "0xd8d…6045",
			"avatar": null,
		})
	);
}

#[tokio::test]
async fn address_with_primary_name_uses_name_and_avatar() {
	let lookup = Arc::new(StaticLookup::default().with_name(VITALIK, "vitalik.eth"));
	let (status, _, body) = get(
		app(lookup),
		"/api/ens/resolve/0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		body,
		json!({
			"address": "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
			"name": "vitalik.eth",
			"displayName": "vitalik.eth",
			"avatar": format!("{AVATAR_BASE}/vitalik.eth"),
		})
	);
}

#[tokio::test]
async fn name_resolves_to_checksummed_address() {
	let lookup = Arc::new(StaticLookup::default().with_name(VITALIK, "vitalik.eth"));
	let (status, headers, body) = get(app(lookup), "/api/ens/resolve/vitalik.eth").await;

	assert_eq!(status, StatusCode::OK);
	assert!(headers.contains_key(CDN_CACHE_CONTROL));
	assert_eq!(
		body,
		json!({
			"address": "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
			"name": "vitalik.eth",
			"displayName": "vitalik.eth",
			"avatar": format!("{AVATAR_BASE}/vitalik.eth"),
		})
	);
}

#[tokio::test]
async fn unknown_name_still_has_avatar() {
	let (status, _, body) = get(
		app(Arc::new(StaticLookup::default())),
		"/api/ens/resolve/caf%C3%A9.eth",
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["address"], Value::Null);
	assert_eq!(body["displayName"], "café.eth");
	assert_eq!(body["avatar"], format!("{AVATAR_BASE}/caf%C3%A9.eth"));
	assert!(body.get("error").is_none());
}

#[tokio::test]
async fn forward_lookup_uses_normalized_name() {
	let lookup = Arc::new(StaticLookup::default().with_name(VITALIK, "vitalik.eth"));
	// fullwidth "ｖ" is already lower-case but normalizes to "v"
	let (status, _, body) = get(app(lookup.clone()), "/api/ens/resolve/%EF%BD%96italik.eth").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["displayName"], "ｖitalik.eth");
	assert_eq!(body["address"], "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
	assert_eq!(*lookup.seen_names.lock().unwrap(), vec!["vitalik.eth"]);
}

#[tokio::test]
async fn failed_reverse_lookup_returns_partial_result() {
	let (status, headers, body) = get(
		app(Arc::new(StaticLookup::failing())),
		"/api/ens/resolve/0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
	)
	.await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert!(!headers.contains_key(CDN_CACHE_CONTROL));
	assert_eq!(body["address"], "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
	assert_eq!(body["name"], Value::Null);
	assert_eq!(body["displayName"], "0xd8d…6045");
	assert_eq!(body["avatar"], Value::Null);
	assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn failed_forward_lookup_keeps_avatar() {
	let (status, _, body) = get(
		app(Arc::new(StaticLookup::failing())),
		"/api/ens/resolve/vitalik.eth",
	)
	.await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["address"], Value::Null);
	assert_eq!(body["name"], "vitalik.eth");
	assert_eq!(body["displayName"], "vitalik.eth");
	assert_eq!(body["avatar"], format!("{AVATAR_BASE}/vitalik.eth"));
	assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_name_is_reported_as_error() {
	let lookup = Arc::new(StaticLookup::default());
	let (status, _, body) = get(app(lookup.clone()), "/api/ens/resolve/foo..eth").await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["displayName"], "foo..eth");
	assert!(body["avatar"].is_string());
	assert!(body["error"].is_string());
	assert!(lookup.seen_names.lock().unwrap().is_empty());
}

#[tokio::test]
async fn repeated_requests_return_identical_bodies() {
	let lookup = Arc::new(StaticLookup::default().with_name(VITALIK, "vitalik.eth"));
	let uri = "/api/ens/resolve/0xd8da6bf26964af9d7eed9e03e53415d37aa96045";

	let (_, _, first) = get(app(lookup.clone()), uri).await;
	let (_, _, second) = get(app(lookup), uri).await;

	assert_eq!(first, second);
}

#[tokio::test]
async fn health_and_unknown_routes() {
	let lookup = Arc::new(StaticLookup::default());

	let (status, _, _) = get(app(lookup.clone()), "/health").await;
	assert_eq!(status, StatusCode::OK);

	let (status, _, body) = get(app(lookup), "/api/ens/unknown").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body, json!({ "error": "Route not found." }));
}
