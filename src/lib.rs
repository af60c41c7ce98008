use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;
mod logging;
mod notify;
mod storage;

pub use logging::init_logging;
pub use storage::LocalStorage;

#[wasm_bindgen]
pub struct TeamFlow {
    pub(crate) inner: teamflow::TeamFlow,
    pub(crate) notify: notify::Notifier,
}

impl TeamFlow {
    pub fn rs_new(mut inner: teamflow::TeamFlow) -> TeamFlow {
        let notify = notify::Notifier::attach(&mut inner);
        TeamFlow { inner, notify }
    }
    /// Deliver transitions queued by the last call, then hand back its result.
    pub(crate) fn settle<T>(&mut self, out: T) -> T {
        self.notify.flush(&self.inner);
        out
    }
}
