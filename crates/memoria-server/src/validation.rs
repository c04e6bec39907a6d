//! Input validation performed at the tool boundary (spec §4.8), before
//! any service method is invoked. Failures here never touch the
//! service or the store.

use memoria_core::constants::MAX_CONTENT_CHARS;

pub fn validate_content_length(content: &str) -> Result<(), String> {
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(format!(
            "content exceeds the maximum of {MAX_CONTENT_CHARS} characters"
        ));
    }
    Ok(())
}

pub fn validate_threshold(threshold: f64) -> Result<(), String> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err("threshold must be between 0.0 and 1.0".to_string());
    }
    Ok(())
}

pub fn validate_min_array_size(items: &[String], min: usize, field: &str) -> Result<(), String> {
    if items.len() < min {
        return Err(format!("{field} must contain at least {min} entries"));
    }
    Ok(())
}
