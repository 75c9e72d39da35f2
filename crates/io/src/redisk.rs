use crate::config::RediskOptions;
use crate::stream::IoStream;
use crate::Result;

use bytes::Bytes;
use redisk_store::ListStore;
use tracing::info;

/// Entry point for opening streams against a list store.
///
/// The handle is cheap to clone; every stream it opens gets its own cursor
/// over the shared store.
#[derive(Clone, Debug)]
pub struct Redisk<S>
where
    S: ListStore,
{
    store: S,
    namespace: String,
}

impl<S> Redisk<S>
where
    S: ListStore,
{
    /// Creates a new handle from the given options.
    pub fn new(RediskOptions { store, namespace }: RediskOptions<S>) -> Self {
        info!(%namespace, "creating redisk handle");

        Self { store, namespace }
    }

    /// Returns the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the key of the list backing the stream called `name`.
    ///
    /// Keys follow `{namespace}:list:{name}` so external tools can find the
    /// same list.
    #[must_use]
    pub fn list_key(&self, name: &str) -> String {
        format!("{}:list:{name}", self.namespace)
    }

    /// Opens a stream called `name`. The backing list need not exist.
    pub fn open(&self, name: impl Into<String>) -> IoStream<S> {
        let name = name.into();
        let key = self.list_key(&name);

        IoStream::new(self.store.clone(), name, key)
    }

    /// Opens a stream called `name`, runs `f` with it and returns what `f`
    /// returns. The stream is dropped once `f` completes.
    pub async fn open_with<F, T>(&self, name: impl Into<String>, f: F) -> T
    where
        F: AsyncFnOnce(&mut IoStream<S>) -> T,
    {
        let mut stream = self.open(name);

        f(&mut stream).await
    }

    /// Calls `f` with every line of the stream called `name`.
    pub async fn foreach<F>(&self, name: impl Into<String>, f: F) -> Result<()>
    where
        F: FnMut(String),
    {
        self.open(name).each(f).await
    }

    /// Reads the stream called `name`, starting at line `offset` if given.
    ///
    /// Follows the contract of [`IoStream::read`].
    pub async fn read(
        &self,
        name: impl Into<String>,
        length: Option<usize>,
        offset: Option<u64>,
    ) -> Result<Option<Bytes>> {
        let mut stream = self.open(name);
        if let Some(offset) = offset {
            stream.set_lineno(offset).await?;
        }

        stream.read(length).await
    }

    /// Reads every line of the stream called `name`.
    pub async fn readlines(&self, name: impl Into<String>) -> Result<Vec<String>> {
        self.open(name).readlines().await
    }
}
