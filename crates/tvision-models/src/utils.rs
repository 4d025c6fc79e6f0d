//! Small shared helpers.

/// Suffix appended to every generated ad download.
const AD_FILE_SUFFIX: &str = "_tiktok_ad.mp4";

/// Build the download file name for a product's generated ad.
///
/// Every character outside `[a-z0-9]` is replaced with an underscore and
/// letters are lowercased, so the name is safe on any filesystem.
pub fn ad_file_name(product_name: &str) -> String {
    let safe: String = product_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}{AD_FILE_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name() {
        assert_eq!(ad_file_name("ledmask"), "ledmask_tiktok_ad.mp4");
    }

    #[test]
    fn test_spaces_and_punctuation_become_underscores() {
        assert_eq!(
            ad_file_name("Mini Flying Drone!"),
            "mini_flying_drone__tiktok_ad.mp4"
        );
    }

    #[test]
    fn test_uppercase_is_lowered() {
        assert_eq!(ad_file_name("GlowUp2000"), "glowup2000_tiktok_ad.mp4");
    }

    #[test]
    fn test_non_ascii_is_replaced() {
        assert_eq!(ad_file_name("café"), "caf__tiktok_ad.mp4");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(ad_file_name(""), "_tiktok_ad.mp4");
    }
}
