use crate::error;
use crate::interop::{is_absent, to_js_or_null};
use crate::storage::LocalStorage;
use crate::TeamFlow;
use teamflow::{
    default_palette, CanvasEvent, CommandOutcome, FlowConfig, MemberPatch, MemoryStorage,
    NewMember, PaletteDrop, PaletteItem, Position, Storage,
};
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn parse_config(config: &JsValue) -> Result<FlowConfig, JsValue> {
    if is_absent(config) { return Ok(FlowConfig::default()); }
    serde_wasm_bindgen::from_value(config.clone()).map_err(|e| error::invalid_config(e.to_string()))
}

fn outcome_value(outcome: Option<CommandOutcome>) -> JsValue {
    match outcome {
        None => JsValue::NULL,
        Some(CommandOutcome::MemberAdded(id)) | Some(CommandOutcome::EdgeAdded(id)) => JsValue::from_str(&id),
        Some(CommandOutcome::Applied(applied)) => JsValue::from_bool(applied),
    }
}

fn check_position(x: f64, y: f64) -> Result<Position, JsValue> {
    if !x.is_finite() { return Err(error::non_finite("x")); }
    if !y.is_finite() { return Err(error::non_finite("y")); }
    Ok(Position::new(x, y))
}

#[wasm_bindgen]
impl TeamFlow {
    /// Rehydrates from `localStorage`; falls back to an unpersisted store when
    /// the browser offers none.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TeamFlow, JsValue> {
        let config = parse_config(&config)?;
        let storage: Box<dyn Storage> = match LocalStorage::open() {
            Ok(local) => Box::new(local),
            Err(e) => {
                log::warn!("localStorage unavailable, state will not persist: {}", e);
                Box::new(MemoryStorage::new())
            }
        };
        Ok(TeamFlow::rs_new(teamflow::TeamFlow::open(storage, config)))
    }

    /// Seeded store that never touches `localStorage`.
    pub fn in_memory(config: JsValue) -> Result<TeamFlow, JsValue> {
        let config = parse_config(&config)?;
        Ok(TeamFlow::rs_new(teamflow::TeamFlow::in_memory(config)))
    }

    pub fn revision(&self) -> u64 { self.inner.store().revision() }
    pub fn config(&self) -> JsValue { to_js_or_null(self.inner.config()) }

    // Members
    /// Non-finite coordinates place the member at the origin; see `add_member_res`.
    pub fn add_member(&mut self, name: String, role: String, x: f64, y: f64) -> String {
        let id = self.inner.add_member(NewMember::new(name, role, Position::new(x, y)));
        self.settle(id)
    }
    pub fn add_member_res(&mut self, name: String, role: String, x: f64, y: f64) -> JsValue {
        let position = match check_position(x, y) { Ok(p) => p, Err(e) => return e };
        let id = self.inner.add_member(NewMember::new(name, role, position));
        self.settle(error::ok(JsValue::from_str(&id)))
    }
    pub fn update_member(&mut self, id: &str, name: Option<String>, role: Option<String>) -> bool {
        let ok = self.inner.update_member(id, MemberPatch { name, role });
        self.settle(ok)
    }
    pub fn update_member_res(&mut self, id: &str, name: Option<String>, role: Option<String>) -> JsValue {
        if self.inner.store().member(id).is_none() { return error::invalid_id("member", id); }
        let ok = self.inner.update_member(id, MemberPatch { name, role });
        self.settle(error::ok(JsValue::from_bool(ok)))
    }
    /// `false` for unknown ids and non-finite coordinates.
    pub fn update_member_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        let ok = self.inner.update_member_position(id, Position::new(x, y));
        self.settle(ok)
    }
    pub fn update_member_position_res(&mut self, id: &str, x: f64, y: f64) -> JsValue {
        let position = match check_position(x, y) { Ok(p) => p, Err(e) => return e };
        if self.inner.store().member(id).is_none() { return error::invalid_id("member", id); }
        let ok = self.inner.update_member_position(id, position);
        self.settle(error::ok(JsValue::from_bool(ok)))
    }
    pub fn delete_member(&mut self, id: &str) -> bool {
        let ok = self.inner.delete_member(id);
        self.settle(ok)
    }
    pub fn delete_member_res(&mut self, id: &str) -> JsValue {
        if self.inner.store().member(id).is_none() { return error::invalid_id("member", id); }
        let ok = self.inner.delete_member(id);
        self.settle(error::ok(JsValue::from_bool(ok)))
    }
    pub fn member(&self, id: &str) -> JsValue {
        self.inner.store().member(id).map_or(JsValue::NULL, to_js_or_null)
    }

    // Edges
    /// Endpoints are not checked; see `add_edge_res`.
    pub fn add_edge(&mut self, source: &str, target: &str) -> String {
        let id = self.inner.add_edge(source, target);
        self.settle(id)
    }
    pub fn add_edge_res(&mut self, source: &str, target: &str) -> JsValue {
        for end in [source, target] {
            if self.inner.store().member(end).is_none() { return error::invalid_id("member", end); }
        }
        let id = self.inner.add_edge(source, target);
        self.settle(error::ok(JsValue::from_str(&id)))
    }
    pub fn delete_edge(&mut self, id: &str) -> bool {
        let ok = self.inner.delete_edge(id);
        self.settle(ok)
    }
    pub fn delete_edge_res(&mut self, id: &str) -> JsValue {
        if self.inner.store().edge(id).is_none() { return error::invalid_id("edge", id); }
        let ok = self.inner.delete_edge(id);
        self.settle(error::ok(JsValue::from_bool(ok)))
    }

    // Snapshot
    pub fn snapshot(&self) -> JsValue { to_js_or_null(self.inner.store().current()) }
    pub fn member_count(&self) -> u32 { self.inner.store().member_count() as u32 }
    pub fn edge_count(&self) -> u32 { self.inner.store().edge_count() as u32 }
    /// Accepts `{members, edges}` or the `{state, version}` envelope.
    pub fn replace_snapshot(&mut self, snapshot: JsValue) -> JsValue {
        let value: serde_json::Value = match serde_wasm_bindgen::from_value(snapshot) {
            Ok(v) => v,
            Err(e) => return error::invalid_snapshot(e.to_string()),
        };
        let replaced = teamflow::json::from_json_value(value)
            .and_then(|snapshot| self.inner.replace_snapshot(snapshot));
        match replaced {
            Ok(()) => self.settle(error::ok(JsValue::from_bool(true))),
            Err(e) => error::invalid_snapshot(e.to_string()),
        }
    }
    pub fn reset(&mut self) {
        self.inner.reset();
        self.settle(())
    }

    /// `callback({revision, snapshot, nodes, edges})` once per state change,
    /// after the view has caught up. Read the payload rather than calling
    /// back into this object, which is still borrowed at that point.
    pub fn subscribe(&mut self, callback: js_sys::Function) -> u32 { self.notify.add(callback) }
    pub fn unsubscribe(&mut self, id: u32) -> bool { self.notify.remove(id) }

    // Projection
    pub fn nodes(&self) -> JsValue { to_js_or_null(self.inner.nodes()) }
    pub fn edges(&self) -> JsValue { to_js_or_null(self.inner.edges()) }
    pub fn modal(&self) -> JsValue { to_js_or_null(&self.inner.modal()) }

    /// `value` is the new member/edge id, `true`/`false` for applied commands,
    /// or `null` when the event only touched view state.
    pub fn handle_event(&mut self, event: JsValue) -> JsValue {
        let event: CanvasEvent = match serde_wasm_bindgen::from_value(event) {
            Ok(ev) => ev,
            Err(e) => return error::invalid_event(e.to_string()),
        };
        if let Err(e) = event.validate() { return error::from_event_error(&e); }
        let outcome = self.inner.handle_event(event);
        self.settle(error::ok(outcome_value(outcome)))
    }

    // Edit modal
    pub fn open_editor(&mut self, id: &str) -> bool { self.inner.open_editor(id) }
    pub fn set_draft_name(&mut self, name: String) -> bool { self.inner.set_draft_name(name) }
    pub fn set_draft_role(&mut self, role: String) -> bool { self.inner.set_draft_role(role) }
    pub fn save_edit(&mut self) -> bool {
        let ok = self.inner.save_edit();
        self.settle(ok)
    }
    pub fn delete_edit(&mut self) -> bool {
        let ok = self.inner.delete_edit();
        self.settle(ok)
    }
    pub fn cancel_edit(&mut self) -> bool { self.inner.cancel_edit() }

    // Creation
    pub fn add_default_member(&mut self) -> String {
        let id = self.inner.add_default_member();
        self.settle(id)
    }
    pub fn palette(&self) -> JsValue { to_js_or_null(&default_palette()) }
    pub fn drop_palette_item(&mut self, item: JsValue, drop: JsValue) -> JsValue {
        let item: PaletteItem = match serde_wasm_bindgen::from_value(item) {
            Ok(i) => i,
            Err(e) => return error::invalid_event(e.to_string()),
        };
        let drop: PaletteDrop = match serde_wasm_bindgen::from_value(drop) {
            Ok(d) => d,
            Err(e) => return error::invalid_event(e.to_string()),
        };
        let zoom = drop.viewport.zoom;
        if zoom.is_finite() && zoom <= 0.0 { return error::not_positive("zoom", zoom); }
        match self.inner.drop_palette_item(&item, &drop) {
            Some(id) => self.settle(error::ok(JsValue::from_str(&id))),
            None => error::non_finite("drop"),
        }
    }
}
