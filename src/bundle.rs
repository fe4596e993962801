//! Named syntax bundles
//!
//! A bundle is the middle configuration layer selected by the `syntax`
//! parameter. Resolvers look bundles up by name; failing to find one is
//! never fatal for formatting.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::config::Properties;
use crate::error::{ColorCodeError, Result};
use crate::syntax::builtin;

/// Looks up syntax bundles by name
pub trait BundleResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<Properties>;
}

/// The bundles compiled into the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinBundles;

impl BundleResolver for BuiltinBundles {
    fn resolve(&self, name: &str) -> Result<Properties> {
        builtin::bundle(name).ok_or_else(|| ColorCodeError::BundleNotFound(name.to_string()))
    }
}

/// Resolves nothing; every lookup reports not found
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBundles;

impl BundleResolver for NoBundles {
    fn resolve(&self, name: &str) -> Result<Properties> {
        Err(ColorCodeError::BundleNotFound(name.to_string()))
    }
}

/// Bundles registered in memory by the host
#[derive(Debug, Clone, Default)]
pub struct BundleRegistry {
    bundles: HashMap<String, Properties>,
}

impl BundleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bundle, replacing any bundle of the same name
    pub fn add(&mut self, name: &str, bundle: Properties) {
        self.bundles.insert(name.to_string(), bundle);
    }

    /// Builder: register a bundle
    pub fn with(mut self, name: &str, bundle: Properties) -> Self {
        self.add(name, bundle);
        self
    }

    /// List registered names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.bundles.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

impl BundleResolver for BundleRegistry {
    fn resolve(&self, name: &str) -> Result<Properties> {
        self.bundles
            .get(name)
            .cloned()
            .ok_or_else(|| ColorCodeError::BundleNotFound(name.to_string()))
    }
}

/// Reads `<name>.properties` or `<name>.toml` from a directory
#[derive(Debug, Clone)]
pub struct DirectoryBundles {
    root: PathBuf,
}

impl DirectoryBundles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BundleResolver for DirectoryBundles {
    fn resolve(&self, name: &str) -> Result<Properties> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(ColorCodeError::InvalidBundle {
                name: name.to_string(),
                message: "bundle names must not contain path components".to_string(),
            });
        }

        let properties = self.root.join(format!("{name}.properties"));
        if properties.is_file() {
            return Ok(Properties::parse(&fs::read_to_string(properties)?));
        }

        let toml_path = self.root.join(format!("{name}.toml"));
        if toml_path.is_file() {
            return Properties::from_toml(&fs::read_to_string(toml_path)?);
        }

        Err(ColorCodeError::BundleNotFound(name.to_string()))
    }
}

/// Tries several resolvers in order
///
/// A resolver reporting "not found" passes the lookup on; any other error
/// stops the chain.
#[derive(Default)]
pub struct ChainedResolver {
    resolvers: Vec<Box<dyn BundleResolver>>,
}

impl ChainedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a resolver
    pub fn then(mut self, resolver: impl BundleResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }
}

impl BundleResolver for ChainedResolver {
    fn resolve(&self, name: &str) -> Result<Properties> {
        for resolver in &self.resolvers {
            match resolver.resolve(name) {
                Err(ColorCodeError::BundleNotFound(_)) => continue,
                other => return other,
            }
        }
        Err(ColorCodeError::BundleNotFound(name.to_string()))
    }
}

/// Read-through cache of successfully resolved bundles
pub struct CachingResolver<R> {
    inner: R,
    cache: RwLock<HashMap<String, Properties>>,
}

impl<R: BundleResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Drop every cached bundle
    pub fn invalidate_all(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }
}

impl<R: BundleResolver> BundleResolver for CachingResolver<R> {
    fn resolve(&self, name: &str) -> Result<Properties> {
        if let Some(hit) = self.cache.read().ok().and_then(|cache| cache.get(name).cloned()) {
            return Ok(hit);
        }

        let bundle = self.inner.resolve(name)?;
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(name.to_string(), bundle.clone());
        }
        Ok(bundle)
    }
}
