/// Shortens a checksummed address to `0xAbC…1234`, used when no name is set.
pub fn elide_address(checksummed: &str) -> String {
	let hex = checksummed.strip_prefix("0x").unwrap_or(checksummed);
	if hex.len() <= 7 || !hex.is_ascii() {
		return checksummed.to_string();
	}

	format!("0x{}…{}", &hex[..3], &hex[hex.len() - 4..])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn elides_middle_of_address() {
		assert_eq!(
			elide_address("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"),
			"0xd8d…6045"
		);
		assert_eq!(elide_address("0x1234"), "0x1234");
	}
}
