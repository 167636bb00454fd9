use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};

use super::{Endpoint, SerialBackend, SerialConnection};

pub fn endpoint(path: &str, manufacturer: Option<&str>) -> Endpoint {
    Endpoint {
        path: path.into(),
        manufacturer: manufacturer.map(Into::into),
        product_id: None,
    }
}

/// Scriptable in-memory serial world. The world and the backend it hands
/// out share state, so a test can rewire endpoints or kill the connection
/// while the subsystem under test is running.
#[derive(Clone, Default)]
pub struct MockWorld {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    endpoints: Mutex<Vec<Endpoint>>,
    lists: AtomicUsize,
    opens: AtomicUsize,
    closes: AtomicUsize,
    written: Mutex<Vec<Vec<u8>>>,
    fail_open: AtomicBool,
    fail_write: AtomicBool,
    dead: AtomicBool,
}

impl MockWorld {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        let world = Self::default();
        world.set_endpoints(endpoints);
        world
    }

    pub fn backend(&self) -> Arc<dyn SerialBackend> {
        Arc::new(MockBackend {
            inner: self.inner.clone(),
        })
    }

    pub fn set_endpoints(&self, endpoints: Vec<Endpoint>) {
        *self.inner.endpoints.lock().unwrap() = endpoints;
    }

    /// Controls what `is_open` reports on every handed-out connection;
    /// flipping it to `false` simulates a spontaneous close.
    pub fn set_alive(&self, alive: bool) {
        self.inner.dead.store(!alive, Ordering::SeqCst);
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.inner.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_write(&self, fail: bool) {
        self.inner.fail_write.store(fail, Ordering::SeqCst);
    }

    pub fn lists(&self) -> usize {
        self.inner.lists.load(Ordering::SeqCst)
    }

    pub fn opens(&self) -> usize {
        self.inner.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.inner.closes.load(Ordering::SeqCst)
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.inner.written.lock().unwrap().clone()
    }
}

struct MockBackend {
    inner: Arc<Inner>,
}

impl SerialBackend for MockBackend {
    fn list(&self) -> Result<Vec<Endpoint>> {
        self.inner.lists.fetch_add(1, Ordering::SeqCst);
        Ok(self.inner.endpoints.lock().unwrap().clone())
    }

    fn open(&self, _path: &str, _baud: u32) -> Result<Box<dyn SerialConnection>> {
        self.inner.opens.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_open.load(Ordering::SeqCst) {
            bail!("mock open refused");
        }
        Ok(Box::new(MockConnection {
            inner: self.inner.clone(),
        }))
    }
}

struct MockConnection {
    inner: Arc<Inner>,
}

impl SerialConnection for MockConnection {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.inner.fail_write.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock write refused"));
        }
        self.inner.written.lock().unwrap().push(bytes.to_vec());
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.inner.dead.load(Ordering::SeqCst)
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.inner.closes.fetch_add(1, Ordering::SeqCst);
    }
}
