//! Translator framework: format adapters that read and write nanopubs.
//!
//! Each format ships a static [`TranslatorDescriptor`] and a factory. The host
//! pairs them into a [`TranslatorPlugin`] and registers it with a
//! [`TranslatorRegistry`] at startup; lookups then go by id, file extension,
//! or media type.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::model::Nanopub;

/// A bidirectional format adapter.
pub trait Translator {
    /// Parse a whole document into nanopubs, in input order.
    fn read(&self, data: &str) -> Result<Vec<Nanopub>>;

    /// Append `nanopubs` to `out`, in input order.
    fn write(&self, nanopubs: &[Nanopub], out: &mut dyn Write) -> Result<()>;
}

/// Static metadata describing a translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub media_types: &'static [&'static str],
    pub extensions: &'static [&'static str],
}

impl TranslatorDescriptor {
    /// Case-insensitive; a leading `.` is ignored.
    pub fn handles_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn handles_media_type(&self, media_type: &str) -> bool {
        // Ignore parameters such as "; charset=utf-8"
        let essence = media_type.split(';').next().unwrap_or("").trim();
        self.media_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(essence))
    }
}

/// Per-translator settings, as a JSON object.
///
/// Each translator decodes the bag into its own typed options with
/// [`TranslatorOptions::decode`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslatorOptions(serde_json::Map<String, serde_json::Value>);

impl TranslatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from any serializable value that maps to a JSON object
    /// (a `toml::Table`, a `serde_json::Value`, a typed options struct, ...).
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value).context("serialize translator options")? {
            serde_json::Value::Object(map) => Ok(Self(map)),
            serde_json::Value::Null => Ok(Self::default()),
            other => bail!("translator options must be a table, got: {other}"),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode into a typed options struct. Empty options decode to the
    /// struct's `#[serde(default)]` values.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(serde_json::Value::Object(self.0.clone()))
            .context("decode translator options")
    }
}

pub type TranslatorFactory = fn(&TranslatorOptions) -> Result<Box<dyn Translator>>;

/// A descriptor paired with the factory that builds its translator.
#[derive(Clone, Copy)]
pub struct TranslatorPlugin {
    pub descriptor: &'static TranslatorDescriptor,
    pub factory: TranslatorFactory,
}

impl TranslatorPlugin {
    pub fn create(&self, options: &TranslatorOptions) -> Result<Box<dyn Translator>> {
        (self.factory)(options)
            .with_context(|| format!("create '{}' translator", self.descriptor.id))
    }
}

impl std::fmt::Debug for TranslatorPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorPlugin")
            .field("descriptor", self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Explicitly populated set of available translators.
#[derive(Debug, Default)]
pub struct TranslatorRegistry {
    plugins: Vec<TranslatorPlugin>,
}

impl TranslatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin. Ids must be unique.
    pub fn register(&mut self, plugin: TranslatorPlugin) -> Result<()> {
        let id = plugin.descriptor.id;
        if self.get(id).is_some() {
            bail!("translator '{id}' is already registered");
        }
        tracing::debug!(id, name = plugin.descriptor.name, "registered translator");
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&TranslatorPlugin> {
        self.plugins
            .iter()
            .find(|p| p.descriptor.id.eq_ignore_ascii_case(id))
    }

    pub fn for_extension(&self, ext: &str) -> Option<&TranslatorPlugin> {
        self.plugins
            .iter()
            .find(|p| p.descriptor.handles_extension(ext))
    }

    pub fn for_media_type(&self, media_type: &str) -> Option<&TranslatorPlugin> {
        self.plugins
            .iter()
            .find(|p| p.descriptor.handles_media_type(media_type))
    }

    pub fn for_path(&self, path: &Path) -> Option<&TranslatorPlugin> {
        let ext = path.extension()?.to_str()?;
        self.for_extension(ext)
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static TranslatorDescriptor> + '_ {
        self.plugins.iter().map(|p| p.descriptor)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Build the translator registered under `id`.
    pub fn create(&self, id: &str, options: &TranslatorOptions) -> Result<Box<dyn Translator>> {
        match self.get(id) {
            Some(plugin) => plugin.create(options),
            None => bail!("unknown translator: {id}"),
        }
    }
}
