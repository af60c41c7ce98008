use js_sys::{Object, Reflect};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}

/// Plain JS objects (not `Map`s) so hosts can read fields directly.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}
pub fn to_js_or_null<T: Serialize + ?Sized>(value: &T) -> JsValue { to_js(value).unwrap_or(JsValue::NULL) }

/// `undefined` and `null` read as "not supplied".
pub fn is_absent(v: &JsValue) -> bool { v.is_undefined() || v.is_null() }
