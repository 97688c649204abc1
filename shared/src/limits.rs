//! Length limits of user-entered text, matching the column sizes
//!
//! Lengths count characters, as `VARCHAR(n)` does.

pub const ITEM_NAME_MAX_LEN: usize = 100;
pub const BRAND_NAME_MAX_LEN: usize = 100;
pub const PRODUCT_NAME_MAX_LEN: usize = 250;
pub const VARIANT_NAME_MAX_LEN: usize = 250;
pub const CATEGORY_NAME_MAX_LEN: usize = 50;
pub const PRODUCT_URL_MAX_LEN: usize = 250;
pub const NOTES_MAX_LEN: usize = 1000;

/// Whether `value` is longer than `max` characters
pub fn exceeds(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceeds_counts_characters() {
        assert!(!exceeds("Tent", ITEM_NAME_MAX_LEN));
        assert!(exceeds(&"a".repeat(51), CATEGORY_NAME_MAX_LEN));
        // multi-byte characters count once
        assert!(!exceeds(&"é".repeat(50), CATEGORY_NAME_MAX_LEN));
    }
}
