use std::{
    cell::{Cell, RefCell},
    future::Future,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering}
};

use tokio::sync::Notify;

use crate::environment::prelude::Value;

use super::{error::Unwind, EvalResult};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    /// Deferreds that settled with a failure during the current run.
    static FAILED: RefCell<Vec<Deferred>> = const { RefCell::new(Vec::new()) };
}

/// Result slot of a computation running on the current `LocalSet`.
/// Cloning shares the slot.
#[derive(Clone)]
pub struct Deferred {
    state: Rc<DeferredState>
}

struct DeferredState {
    id: u64,
    outcome: RefCell<Option<EvalResult>>,
    settled: Notify,
    observed: Cell<bool>,
}

impl Deferred {
    fn new() -> Self {
        Self {
            state: Rc::new(DeferredState {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                outcome: RefCell::new(None),
                settled: Notify::new(),
                observed: Cell::new(false),
            })
        }
    }

    /// Schedules `future` as a local task. Must be called from within a
    /// `LocalSet`; a pending outcome is flattened before it is stored.
    pub fn spawn<F>(future: F) -> Self
        where F: Future<Output = EvalResult> + 'static
    {
        let deferred = Self::new();
        let handle = deferred.clone();

        log::trace!("spawning deferred #{}", deferred.id());

        tokio::task::spawn_local(async move {
            let outcome = match future.await {
                Ok(Value::Pending(inner)) => inner.settled().await,
                other => other
            };

            if outcome.is_err() {
                log::debug!("deferred #{} failed", handle.id());
                FAILED.with(|failed| failed.borrow_mut().push(handle.clone()));
            }

            handle.settle(outcome);
        });

        deferred
    }

    pub fn id(&self) -> u64 {
        self.state.id
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    fn settle(&self, outcome: EvalResult) {
        log::trace!("deferred #{} settled", self.id());

        *self.state.outcome.borrow_mut() = Some(outcome);
        self.state.settled.notify_waiters();
    }

    /// Waits for the outcome. Any number of waiters observe the same one.
    pub async fn settled(&self) -> EvalResult {
        self.state.observed.set(true);

        loop {
            let notified = self.state.settled.notified();

            if let Some(outcome) = self.state.outcome.borrow().as_ref() {
                return outcome.clone();
            }

            notified.await;
        }
    }
}

/// Waits for `value` if it is pending, passes it through otherwise.
pub async fn resolve(value: Value) -> EvalResult {
    match value {
        Value::Pending(deferred) => deferred.settled().await,
        other => Ok(other)
    }
}

/// Forgets failures recorded by an earlier run on this thread.
pub(super) fn clear_failures() {
    FAILED.with(|failed| failed.borrow_mut().clear());
}

/// First failure of a deferred that nothing ever waited for.
pub(super) fn take_unobserved_failure() -> Option<Unwind> {
    let failed = FAILED.with(|failed| std::mem::take(&mut *failed.borrow_mut()));

    failed.into_iter()
        .filter(|deferred| !deferred.state.observed.get())
        .find_map(|deferred| {
            let outcome = deferred.state.outcome.borrow().clone();
            outcome?.err()
        })
}
