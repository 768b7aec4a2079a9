//! Platform information provider.
//!
//! Vendor policies are gated by board identifiers. The provider is injected
//! rather than read from global properties so that one binary covers all
//! vendor platforms and tests can fake any board.

/// Source of platform/board identifiers.
pub trait PlatformInfo {
    /// The board identifier, e.g. `"msm8998"`. Empty when unknown.
    fn platform_id(&self) -> &str;
}

/// Fixed platform identifier.
#[derive(Debug, Clone, Default)]
pub struct StaticPlatform {
    id: String,
}

impl StaticPlatform {
    /// Create a provider reporting `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl PlatformInfo for StaticPlatform {
    fn platform_id(&self) -> &str {
        &self.id
    }
}

impl PlatformInfo for &str {
    fn platform_id(&self) -> &str {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_platform() {
        let p = StaticPlatform::new("msm8998");
        assert_eq!(p.platform_id(), "msm8998");
        assert_eq!(StaticPlatform::default().platform_id(), "");
    }

    #[test]
    fn test_str_platform() {
        let p: &str = "msm8996";
        assert_eq!(p.platform_id(), "msm8996");
    }
}
