//! Slug normalization, shared by post slugs and tag slugs.
//!
//! The rule: lowercase the input, collapse every run of characters outside
//! `[a-z0-9]` into a single hyphen, and strip leading/trailing hyphens.

/// Normalizes a display string into a URL-safe slug.
pub fn normalize(input: &str) -> String {
	let mut slug = String::with_capacity(input.len());
	let mut pending_hyphen = false;

	for c in input.chars() {
		if c.is_ascii_alphanumeric() {
			if pending_hyphen && !slug.is_empty() {
				slug.push('-');
			}

			pending_hyphen = false;
			slug.extend(c.to_lowercase());
		} else {
			pending_hyphen = true;
		}
	}

	slug
}

/// Derives a unique post slug from its title by appending the current unix
/// timestamp in milliseconds.
///
/// Two posts with colliding normalized titles created in the same
/// millisecond would still collide; the slug's unique constraint surfaces
/// that as an error instead of silently overwriting.
pub fn for_title(title: &str) -> String {
	format!("{}-{}", normalize(title), chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_normalize_lowercases() {
		assert_eq!(normalize("Tech"), "tech");
		assert_eq!(normalize("TECH"), "tech");
	}

	#[test]
	fn test_normalize_collapses_runs() {
		assert_eq!(normalize("Hello,   World!"), "hello-world");
		assert_eq!(normalize("Rust & WebAssembly"), "rust-webassembly");
	}

	#[test]
	fn test_normalize_strips_edges() {
		assert_eq!(normalize("  TECH "), "tech");
		assert_eq!(normalize("--already-slugged--"), "already-slugged");
	}

	#[test]
	fn test_normalize_empty_when_no_alphanumerics() {
		assert_eq!(normalize("!!!"), "");
		assert_eq!(normalize(""), "");
	}

	#[test]
	fn test_for_title_keeps_normalized_prefix() {
		let slug = for_title("Hello World");

		assert!(slug.starts_with("hello-world-"));
		assert!(slug["hello-world-".len()..].chars().all(|c| c.is_ascii_digit()));
	}
}
