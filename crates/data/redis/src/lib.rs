use std::fmt;

use r2d2::Pool;
use redis::{Client, Commands as _, IntoConnectionInfo};
use slot_store::{Blake3Hasher, DataBackend, Hash, Hasher as _};

/// A Redis data backend.
///
/// Every key is scoped by the backend namespace, so several deployments can share a server.
#[derive(Clone)]
pub struct RedisBackend {
    pool: Pool<Client>,
    namespace: String,
}

impl RedisBackend {
    /// Opens a new connection into redis.
    pub fn open<T: IntoConnectionInfo>(params: T) -> anyhow::Result<Self> {
        let client = Client::open(params)?;

        // test the connection
        client.get_connection()?;

        let pool = Pool::builder().build(client)?;
        let namespace = Default::default();

        Ok(Self { pool, namespace })
    }

    /// Associate this dataset with a namespace.
    pub fn with_namespace<N: Into<String>>(mut self, namespace: N) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Computes the prefix key.
    pub fn prefix(&self, bytes: &[u8]) -> Hash {
        Blake3Hasher::digest([self.namespace.as_bytes(), bytes])
    }

    /// Computes an internal redis key
    pub fn key(&self, prefix: &[u8], key: &[u8]) -> Vec<u8> {
        let prefix = self.prefix(prefix);

        [prefix.as_slice(), key].concat()
    }
}

impl fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisBackend")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl DataBackend for RedisBackend {
    fn get(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        let key = self.key(prefix, key);

        Ok(self.pool.get()?.get(&key)?)
    }

    fn has(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<bool> {
        let key = self.key(prefix, key);

        Ok(self.pool.get()?.exists(&key)?)
    }

    fn set(&self, prefix: &[u8], key: &[u8], data: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        let key = self.key(prefix, key);
        let mut conn = self.pool.get()?;

        let old: Option<Vec<u8>> = redis::cmd("SET")
            .arg(&key)
            .arg(data)
            .arg("GET")
            .query(&mut *conn)?;

        Ok(old)
    }

    fn set_batch(&self, prefix: &[u8], entries: &[(&[u8], &[u8])]) -> anyhow::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let items: Vec<(Vec<u8>, Vec<u8>)> = entries
            .iter()
            .map(|(k, v)| (self.key(prefix, k), v.to_vec()))
            .collect();

        tracing::trace!("writing {} redis key(s)", items.len());

        // MSET is applied atomically by the server.
        let _: () = self.pool.get()?.mset(&items)?;

        Ok(())
    }
}

#[test]
#[ignore = "depends on running docker"]
fn test_redis_connection() {
    // depends on `docker run --rm -p 56379:6379 redis`

    let client = RedisBackend::open("redis://127.0.0.1:56379/")
        .unwrap()
        .with_namespace("slot-store-test");
    let prf: &[u8] = b"prefix";
    let key: &[u8] = b"key";
    let other: &[u8] = b"other";
    let val: &[u8] = b"val";
    let vxl: &[u8] = b"vxl";
    let empty: &[u8] = &[];

    client.set_batch(prf, &[(key, empty)]).unwrap();
    assert!(client.has(prf, key).unwrap());

    assert_eq!(client.set(prf, key, val).unwrap(), Some(vec![]));
    assert_eq!(client.get(prf, key).unwrap(), Some(val.to_vec()));
    assert_eq!(client.set(prf, key, vxl).unwrap(), Some(val.to_vec()));

    client.set_batch(prf, &[(key, val), (other, vxl)]).unwrap();

    assert_eq!(client.get(prf, key).unwrap(), Some(val.to_vec()));
    assert_eq!(client.get(prf, other).unwrap(), Some(vxl.to_vec()));
    assert!(client.get(b"missing", key).unwrap().is_none());
}
