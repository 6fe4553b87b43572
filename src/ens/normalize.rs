use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

/// Characters escaped when a name is embedded as a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'/')
	.add(b'<')
	.add(b'>')
	.add(b'?')
	.add(b'`')
	.add(b'{')
	.add(b'}');

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NormalizeError {
	#[error("Name is empty.")]
	Empty,
	#[error("Name \"{0}\" contains an empty label.")]
	EmptyLabel(String),
	#[error("Name \"{name}\" is not a valid ENS name: {reason}")]
	Invalid { name: String, reason: String },
}

/// Normalizes a name with UTS-46 mapping, the way ENS names are hashed on-chain.
pub fn normalize(name: &str) -> Result<String, NormalizeError> {
	if name.is_empty() {
		return Err(NormalizeError::Empty);
	}

	let (normalized, result) = idna::domain_to_unicode(name);
	result.map_err(|e| NormalizeError::Invalid {
		name: name.to_string(),
		reason: e.to_string(),
	})?;

	if normalized.split('.').any(str::is_empty) {
		return Err(NormalizeError::EmptyLabel(name.to_string()));
	}

	Ok(normalized)
}

/// Percent-encodes `segment` so it can be used as exactly one path segment.
pub fn encode_path_segment(segment: &str) -> String {
	utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Builds the metadata-service avatar URL for `name`.
///
/// Nothing is fetched, so the URL may not point at an actual image. Names that fail
/// normalization are embedded as given.
#[derive(Debug, Clone)]
pub struct AvatarUrlBuilder {
	base: String,
}

impl AvatarUrlBuilder {
	pub fn new(base: &Url) -> Self {
		Self {
			base: base.as_str().trim_end_matches('/').to_string(),
		}
	}

	pub fn build(&self, name: &str) -> String {
		let normalized = normalize(name).unwrap_or_else(|_| name.to_string());

		format!("{}/{}", self.base, encode_path_segment(&normalized))
	}
}
