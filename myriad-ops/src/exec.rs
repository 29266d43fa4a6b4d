use myriad_base::{Error, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Executor configuration, read once per run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ExecPolicy {
    /// Upper bound on worker tasks.
    pub available_cores: usize,
    /// Force one task for every operator, making all reductions
    /// strictly left-to-right deterministic (floating-point summation
    /// is single-task regardless).
    pub strict: bool,
    /// Emit a tracing event with elapsed nanoseconds per run.
    pub profiling: bool,
}

impl Default for ExecPolicy {
    fn default() -> Self {
        ExecPolicy { available_cores: num_cpus::get(), strict: false, profiling: false }
    }
}

impl ExecPolicy {
    pub fn single_task() -> Self {
        ExecPolicy { available_cores: 1, strict: false, profiling: false }
    }
}

/// Cooperative cancellation flag, checked between blocks. In-flight
/// blocks always run to completion.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One bulk operation, split into blocks folded into per-task state.
pub trait BlockOp: Sync {
    type Task: Send;

    /// Fresh state for worker task `task_index`; buffers inside it are
    /// allocated lazily and reused across the task's blocks.
    fn new_task(&self, task_index: usize) -> Self::Task;

    /// Process the block `[pos, pos + count)`.
    fn process_block(&self, task: &mut Self::Task, pos: i64, count: i64) -> Result<()>;
}

/// The reusable block scheduler.
pub struct BlockExec {
    num_tasks: usize,
    block_size: i64,
    token: CancelToken,
    profiling: bool,
}

impl BlockExec {
    /// `op_cap` is the operator's block-size maximum; `hint` optionally
    /// caps it further (e.g. to a storage tile size).
    pub fn new(policy: &ExecPolicy, op_cap: usize, hint: Option<usize>) -> Self {
        let cap = hint.map_or(op_cap, |h| h.min(op_cap)).max(1);
        let num_tasks = if policy.strict { 1 } else { policy.available_cores.max(1) };
        BlockExec {
            num_tasks,
            block_size: cap as i64,
            token: CancelToken::default(),
            profiling: policy.profiling,
        }
    }

    /// Pin the run to one task regardless of policy.
    pub fn single_task(mut self) -> Self {
        self.num_tasks = 1;
        self
    }

    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = token;
        self
    }

    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    pub fn block_size(&self) -> i64 {
        self.block_size
    }

    /// Run `op` over `[0, n)` and return the per-task states in task
    /// order; the caller merges them (its "finish" step, always on the
    /// calling thread). Blocks are claimed in strictly increasing
    /// position order. On cancellation the remaining blocks are
    /// skipped and the partial states are still returned.
    pub fn run<Op: BlockOp>(&self, n: i64, op: &Op) -> Result<Vec<Op::Task>> {
        let started = Instant::now();
        let blocks = if n <= 0 { 0 } else { (n + self.block_size - 1) / self.block_size };
        let ntasks = self.num_tasks.min(blocks.max(1) as usize);
        let result = if ntasks <= 1 {
            let mut task = op.new_task(0);
            let mut pos = 0i64;
            while pos < n && !self.token.is_cancelled() {
                let count = (n - pos).min(self.block_size);
                op.process_block(&mut task, pos, count)?;
                pos += count;
            }
            Ok(vec![task])
        } else {
            let cursor = AtomicI64::new(0);
            let failed: Mutex<Option<Error>> = Mutex::new(None);
            let mut slots: Vec<Option<Op::Task>> = (0..ntasks).map(|_| None).collect();
            let block_size = self.block_size;
            let token = &self.token;
            rayon::scope(|s| {
                for (ti, slot) in slots.iter_mut().enumerate() {
                    let cursor = &cursor;
                    let failed = &failed;
                    s.spawn(move |_| {
                        let mut task = op.new_task(ti);
                        loop {
                            if token.is_cancelled() || failed.lock().is_some() {
                                break;
                            }
                            let pos = cursor.fetch_add(block_size, Ordering::Relaxed);
                            if pos >= n {
                                break;
                            }
                            let count = (n - pos).min(block_size);
                            if let Err(e) = op.process_block(&mut task, pos, count) {
                                let mut f = failed.lock();
                                if f.is_none() {
                                    *f = Some(e);
                                }
                                break;
                            }
                        }
                        *slot = Some(task);
                    });
                }
            });
            match failed.into_inner() {
                Some(e) => Err(e),
                None => Ok(slots.into_iter().flatten().collect()),
            }
        };
        if self.profiling {
            debug!(
                target: "myriad",
                n,
                block_size = self.block_size,
                tasks = ntasks,
                elapsed_ns = started.elapsed().as_nanos() as u64,
                "bulk run"
            );
        }
        result
    }
}
