//! `{ok:true, value}` / `{ok:false, error:{code, message, data?}}` results.

use crate::interop::{new_obj, set_kv};
use wasm_bindgen::JsValue;

fn data(fields: &[(&str, JsValue)]) -> JsValue {
    let d = new_obj();
    for (k, v) in fields { set_kv(&d, k, v); }
    d.into()
}

pub fn ok(value: JsValue) -> JsValue {
    data(&[("ok", JsValue::TRUE), ("value", value)])
}

pub fn err(code: &'static str, message: impl Into<String>, detail: Option<JsValue>) -> JsValue {
    let e = data(&[("code", JsValue::from_str(code)), ("message", JsValue::from_str(&message.into()))]);
    if let Some(d) = detail { let _ = js_sys::Reflect::set(&e, &JsValue::from_str("data"), &d); }
    data(&[("ok", JsValue::FALSE), ("error", e)])
}

pub fn non_finite(param: &str) -> JsValue {
    err("non_finite", format!("parameter '{}' must be finite", param), Some(data(&[("param", param.into())])))
}

/// `out_of_range` for a value that must be strictly above zero.
pub fn not_positive(param: &str, got: f64) -> JsValue {
    let d = data(&[("param", param.into()), ("exclusive_min", 0.0.into()), ("got", got.into())]);
    err("out_of_range", format!("parameter '{}' must be greater than 0", param), Some(d))
}

pub fn invalid_id(kind: &str, id: &str) -> JsValue {
    err("invalid_id", format!("invalid {} id", kind), Some(data(&[("kind", kind.into()), ("id", id.into())])))
}

pub fn invalid_event(message: impl Into<String>) -> JsValue { err("invalid_event", message, None) }
pub fn invalid_config(message: impl Into<String>) -> JsValue { err("invalid_config", message, None) }
pub fn invalid_snapshot(message: impl Into<String>) -> JsValue { err("invalid_snapshot", message, None) }

pub fn from_event_error(e: &teamflow::EventError) -> JsValue {
    match e {
        teamflow::EventError::NonFinite(param) => non_finite(param),
        teamflow::EventError::EmptyId(_) => invalid_event(e.to_string()),
    }
}
