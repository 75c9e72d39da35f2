use redisk_store::ListStore;
use serde::{Deserialize, Serialize};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "redisk";

/// Options for configuring a [`Redisk`](crate::Redisk) handle.
#[derive(Clone, Debug)]
pub struct RediskOptions<S>
where
    S: ListStore,
{
    /// The list store every stream opened through the handle talks to.
    pub store: S,

    /// Prefix for backing keys, so that `name` maps to `{namespace}:list:{name}`.
    pub namespace: String,
}

impl<S> RediskOptions<S>
where
    S: ListStore,
{
    /// Creates options for `store` using the default namespace.
    pub fn new(store: S) -> Self {
        Self {
            store,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Plain-data part of the configuration, loadable from any serde format.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct RediskConfig {
    /// Prefix for backing keys.
    pub namespace: String,
}

impl Default for RediskConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl RediskConfig {
    /// Pairs this configuration with a store.
    pub fn into_options<S: ListStore>(self, store: S) -> RediskOptions<S> {
        RediskOptions {
            store,
            namespace: self.namespace,
        }
    }
}
