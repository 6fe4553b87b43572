use alloy::primitives::Address;
use axum::{
	extract::{OriginalUri, Path},
	response::{IntoResponse, Redirect, Response},
	Extension,
};
use axum_jsonschema::Json;
use http::Uri;

use crate::{
	config::{ConfigExt, ResolverExt},
	ens::{encode_path_segment, normalize, AvatarUrlBuilder, LookupError, Resolver},
	types::{Identity, ResolutionResult, ResolvePath},
	utils::elide_address,
};

#[tracing::instrument(skip_all)]
pub async fn resolve(
	Extension(config): ConfigExt,
	Extension(resolver): ResolverExt,
	OriginalUri(uri): OriginalUri,
	Path(ResolvePath { address: input }): Path<ResolvePath>,
) -> Response {
	let canonical = input.to_lowercase();
	if canonical != input {
		return Redirect::temporary(&canonical_location(&uri, &canonical)).into_response();
	}

	let result = match Identity::classify(&canonical) {
		Identity::Address(address) => resolve_address(&resolver, &config.avatars, address).await,
		Identity::Name(name) => resolve_name(&resolver, &config.avatars, name).await,
	};

	result.into_response()
}

pub fn docs(op: aide::transform::TransformOperation) -> aide::transform::TransformOperation {
	op.description("Resolve an address to its primary ENS name, or an ENS name to its address.")
		.response_with::<200, Json<ResolutionResult>, _>(|op| {
			op.description("The resolved identity. Cacheable by CDNs for a day.")
		})
		.response_with::<307, Redirect, _>(|op| {
			op.description("A redirect to the lower-cased equivalent of the requested path.")
		})
		.response_with::<500, Json<ResolutionResult>, _>(|op| {
			op.description("The lookup failed. The body holds partial data and an error message.")
		})
}

/// The request path with its last segment replaced by `canonical`, keeping the query string.
fn canonical_location(uri: &Uri, canonical: &str) -> String {
	let prefix = uri.path().rsplit_once('/').map_or("", |(prefix, _)| prefix);
	let mut location = format!("{prefix}/{}", encode_path_segment(canonical));

	if let Some(query) = uri.query() {
		location.push('?');
		location.push_str(query);
	}

	location
}

pub async fn resolve_address(
	resolver: &Resolver,
	avatars: &AvatarUrlBuilder,
	address: Address,
) -> ResolutionResult {
	let checksummed = address.to_checksum(None);
	let fallback = elide_address(&checksummed);

	match resolver.lookup_address(address).await {
		Ok(name) => ResolutionResult {
			avatar: name.as_deref().map(|name| avatars.build(name)),
			display_name: name.clone().unwrap_or(fallback),
			address: Some(checksummed),
			error: None,
			name,
		},
		Err(e) => {
			tracing::error!(address = %checksummed, error = ?e, "Failed to resolve address {checksummed}");

			failed(Some(checksummed), None, fallback, None, &e)
		},
	}
}

pub async fn resolve_name(
	resolver: &Resolver,
	avatars: &AvatarUrlBuilder,
	name: String,
) -> ResolutionResult {
	let avatar = avatars.build(&name);

	let address = match normalize(&name) {
		Ok(normalized) => resolver.resolve_name(&normalized).await,
		Err(e) => Err(LookupError::from(e)),
	};

	match address {
		Ok(address) => ResolutionResult {
			address: address.map(|address| address.to_checksum(None)),
			display_name: name.clone(),
			name: Some(name),
			avatar: Some(avatar),
			error: None,
		},
		Err(e) => {
			tracing::error!(name, error = ?e, "Failed to resolve name {name}");

			failed(None, Some(name.clone()), name, Some(avatar), &e)
		},
	}
}

fn failed(
	address: Option<String>,
	name: Option<String>,
	display_name: String,
	avatar: Option<String>,
	error: &LookupError,
) -> ResolutionResult {
	ResolutionResult {
		address,
		name,
		display_name,
		avatar,
		error: Some(error.to_string()),
	}
}
