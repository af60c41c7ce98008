//! JS subscribers. Core transitions are queued while the inner flow runs and
//! delivered by `flush`, after the projection has been reconciled.

use crate::interop::to_js;
use js_sys::Function;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use teamflow::{RenderEdge, RenderNode, Snapshot};
use wasm_bindgen::JsValue;

/// What a subscriber receives: the new snapshot plus the view built from it.
#[derive(Serialize)]
struct Update<'a> {
    revision: u64,
    snapshot: &'a Snapshot,
    nodes: &'a [Rc<RenderNode>],
    edges: &'a [Rc<RenderEdge>],
}

pub struct Notifier {
    queue: Rc<RefCell<Vec<Snapshot>>>,
    listeners: Vec<(u32, Function)>,
    next: u32,
}

impl Notifier {
    pub fn attach(flow: &mut teamflow::TeamFlow) -> Notifier {
        let queue: Rc<RefCell<Vec<Snapshot>>> = Rc::default();
        let sink = Rc::clone(&queue);
        flow.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.clone()));
        Notifier { queue, listeners: Vec::new(), next: 0 }
    }

    pub fn add(&mut self, callback: Function) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        self.listeners.push((id, callback));
        id
    }
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// One callback per queued transition. A throwing callback is reported on
    /// the console and does not stop the others.
    pub fn flush(&mut self, flow: &teamflow::TeamFlow) {
        let pending: Vec<Snapshot> = self.queue.borrow_mut().drain(..).collect();
        if pending.is_empty() || self.listeners.is_empty() { return; }
        for snapshot in &pending {
            let update = Update {
                revision: flow.store().revision(),
                snapshot,
                nodes: flow.nodes(),
                edges: flow.edges(),
            };
            let value = match to_js(&update) {
                Ok(v) => v,
                Err(e) => { log::error!("subscriber payload conversion failed: {}", e); continue; }
            };
            for (_, callback) in &self.listeners {
                if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                    web_sys::console::error_2(&JsValue::from_str("teamflow subscriber threw:"), &e);
                }
            }
        }
    }
}
