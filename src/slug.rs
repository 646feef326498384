//! Derives local role slugs from remote role names.

/// Normalize a role name into an identifier-safe slug.
///
/// Lowercases alphanumerics, collapses whitespace, underscores and hyphen runs
/// into a single `-` and drops everything else. Distinct names may collide
/// (e.g. `"Mod"` and `"mod"`); the first role definition seen wins.
pub fn slugify(name: &str) -> String {
	let mut slug = String::with_capacity(name.len());
	let mut separated = false;

	for c in name.trim().chars() {
		if c.is_alphanumeric() {
			if separated && !slug.is_empty() {
				slug.push('-');
			}
			separated = false;
			slug.extend(c.to_lowercase());
		} else if c.is_whitespace() || c == '-' || c == '_' {
			separated = true;
		}
		// remaining punctuation is dropped without acting as a separator
	}

	slug
}
