use parking_lot::Mutex;

/// Free-list of equally sized scratch buffers, keyed by the block size
/// it was built for. Operators hold one per run (injectable, never a
/// process global) and drain it when they finish, so tests can reason
/// about allocation deterministically.
pub struct ScratchPool<T> {
    block: usize,
    free: Mutex<Vec<Vec<T>>>,
}

impl<T: Clone + Default> ScratchPool<T> {
    pub fn new(block: usize) -> Self {
        ScratchPool { block, free: Mutex::new(Vec::new()) }
    }

    pub fn block(&self) -> usize {
        self.block
    }

    /// Pop a cached buffer or allocate a fresh zeroed one.
    pub fn take(&self) -> Vec<T> {
        self.free
            .lock()
            .pop()
            .unwrap_or_else(|| vec![T::default(); self.block])
    }

    /// Return a buffer to the free list; undersized buffers (not taken
    /// from this pool) are dropped instead.
    pub fn put(&self, mut buf: Vec<T>) {
        if buf.capacity() >= self.block {
            buf.resize(self.block, T::default());
            self.free.lock().push(buf);
        }
    }

    pub fn drain(&self) {
        self.free.lock().clear();
    }

    pub fn cached(&self) -> usize {
        self.free.lock().len()
    }
}
