use super::error::IoError;
use super::gaussian_log::GaussianLog;
use super::traits::GeometrySource;
use super::xyz::XyzFile;
use std::collections::BTreeMap;
use std::path::Path;

/// Maps file extensions to the geometry source that reads them.
///
/// Extensions are stored lowercase and without a leading dot.
pub struct SourceRegistry {
    sources: BTreeMap<String, Box<dyn GeometrySource + Send + Sync>>,
}

impl SourceRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            sources: BTreeMap::new(),
        }
    }

    /// Registry with the built-in readers: Gaussian logs (`log`, `out`) and `xyz`.
    ///
    /// `accept_unconverged` controls whether Gaussian logs without a
    /// converged optimization fall back to their last geometry.
    pub fn with_defaults(accept_unconverged: bool) -> Self {
        let log = if accept_unconverged {
            GaussianLog::last_geometry()
        } else {
            GaussianLog::new()
        };
        let mut registry = Self::empty();
        registry.register("log", log);
        registry.register("out", log);
        registry.register("xyz", XyzFile);
        registry
    }

    /// Registers (or replaces) the source for an extension.
    pub fn register<S>(&mut self, extension: &str, source: S)
    where
        S: GeometrySource + Send + Sync + 'static,
    {
        self.sources
            .insert(normalize_extension(extension), Box::new(source));
    }

    pub fn get(&self, extension: &str) -> Option<&(dyn GeometrySource + Send + Sync)> {
        self.sources
            .get(&normalize_extension(extension))
            .map(|s| s.as_ref())
    }

    /// Picks the source for `path` by its extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnsupportedExtension`] when the path has no
    /// extension or none is registered for it.
    pub fn lookup(&self, path: &Path) -> Result<&(dyn GeometrySource + Send + Sync), IoError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        self.get(extension)
            .ok_or_else(|| IoError::UnsupportedExtension(extension.to_string()))
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::with_defaults(false)
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::traits::GeometryRecord;
    use std::io::BufRead;

    struct Fixed;

    impl GeometrySource for Fixed {
        fn format_name(&self) -> &'static str {
            "fixed"
        }

        fn read_from(&self, _reader: &mut dyn BufRead) -> Result<Vec<GeometryRecord>, IoError> {
            Ok(vec![GeometryRecord::new("He", 0.0, 0.0, 0.0)])
        }
    }

    #[test]
    fn defaults_cover_logs_and_xyz() {
        let registry = SourceRegistry::default();
        let extensions: Vec<_> = registry.extensions().collect();
        assert_eq!(extensions, vec!["log", "out", "xyz"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = SourceRegistry::default();
        let source = registry.lookup(Path::new("dir/Benzene.LOG")).unwrap();
        assert_eq!(source.format_name(), "Gaussian log");
        assert_eq!(
            registry.lookup(Path::new("a.xyz")).unwrap().format_name(),
            "XYZ"
        );
    }

    #[test]
    fn unknown_or_missing_extension_is_rejected() {
        let registry = SourceRegistry::default();
        assert!(matches!(
            registry.lookup(Path::new("notes.txt")),
            Err(IoError::UnsupportedExtension(ext)) if ext == "txt"
        ));
        assert!(matches!(
            registry.lookup(Path::new("README")),
            Err(IoError::UnsupportedExtension(ext)) if ext.is_empty()
        ));
    }

    #[test]
    fn custom_sources_can_be_registered() {
        let mut registry = SourceRegistry::empty();
        registry.register(".FIX", Fixed);
        let source = registry.get("fix").unwrap();
        let records = source.read_from(&mut std::io::empty()).unwrap();
        assert_eq!(records[0].symbol, "He");
    }
}
