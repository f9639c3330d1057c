//! Core traits for Vitrine.
//!
//! [`ConfigProvider`] is what binaries implement so that shared code can
//! find the content store without knowing the concrete config type.

use std::path::PathBuf;

use crate::Result;

/// Application configuration seen by shared code.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration must be shareable across threads
/// - `Clone`: Configuration can be duplicated for passing to subsystems
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use vitrine_core::traits::ConfigProvider;
/// use vitrine_core::Result;
///
/// #[derive(Clone)]
/// struct SiteConfig {
///     data_dir: PathBuf,
/// }
///
/// impl ConfigProvider for SiteConfig {
///     fn project_name(&self) -> &str {
///         "portfolio"
///     }
///
///     fn store_path(&self) -> Result<PathBuf> {
///         Ok(self.data_dir.join("content.json"))
///     }
/// }
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used for env var prefixes and default paths.
    fn project_name(&self) -> &str;

    /// Path of the content store snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined.
    fn store_path(&self) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestConfig {
        name: String,
        base: PathBuf,
    }

    impl ConfigProvider for TestConfig {
        fn project_name(&self) -> &str {
            &self.name
        }

        fn store_path(&self) -> Result<PathBuf> {
            Ok(self.base.join("content.json"))
        }
    }

    #[test]
    fn test_config_provider_accessors() {
        let config = TestConfig {
            name: "portfolio".into(),
            base: PathBuf::from("/data"),
        };
        assert_eq!(config.project_name(), "portfolio");
        assert_eq!(
            config.store_path().unwrap(),
            PathBuf::from("/data/content.json")
        );
    }

    #[test]
    fn test_config_provider_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TestConfig>();
    }
}
