use regex::Regex;
use std::sync::LazyLock;
use wasm_bindgen::prelude::wasm_bindgen;

pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];
pub const DEFAULT_MAX_FILE_SIZE_MB: f64 = 50.0;
const MIN_PASSWORD_LENGTH: usize = 8;
const MIN_PASSWORD_CHARACTER_CLASSES: usize = 3;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PASSWORD_CLASSES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new("[A-Z]").expect("valid uppercase regex"),
        Regex::new("[a-z]").expect("valid lowercase regex"),
        Regex::new(r"\d").expect("valid digit regex"),
        Regex::new(r"[!@#$%^&*()_+\-=\[\]{}|;:,.<>?]").expect("valid special character regex"),
    ]
});

#[wasm_bindgen]
pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Whether the browser can parse `url` as an absolute URL.
#[wasm_bindgen]
pub fn validate_url(url: &str) -> bool {
    web_sys::Url::new(url).is_ok()
}

/// At least 8 characters, drawn from at least 3 of: uppercase, lowercase, digits, specials.
#[wasm_bindgen]
pub fn validate_password(password: &str) -> bool {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return false;
    }

    PASSWORD_CLASSES
        .iter()
        .filter(|class| class.is_match(password))
        .count()
        >= MIN_PASSWORD_CHARACTER_CLASSES
}

/// Lowercased text after the last dot; the whole name when there is no dot.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .map_or_else(String::new, str::to_lowercase)
}

#[wasm_bindgen]
pub fn validate_file_type(file_name: &str, allowed_types: Option<Vec<String>>) -> bool {
    let extension = file_extension(file_name);
    match allowed_types {
        Some(allowed_types) => allowed_types
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&extension)),
        None => DEFAULT_ALLOWED_EXTENSIONS.contains(&extension.as_str()),
    }
}

#[wasm_bindgen]
pub fn validate_file_size(size: f64, max_size_mb: Option<f64>) -> bool {
    let max_size_bytes = max_size_mb.unwrap_or(DEFAULT_MAX_FILE_SIZE_MB) * 1024.0 * 1024.0;
    size <= max_size_bytes
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn should_validate_url() {
        assert!(validate_url("https://example.com/path?query=1"));
        assert!(validate_url("mailto:admin@example.com"));
        assert!(!validate_url("example.com"));
        assert!(!validate_url(""));
    }
}
