#![cfg(target_arch = "wasm32")]

use js_sys::Reflect;
use teamflow_wasm::{init_logging, TeamFlow};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

fn parse(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

#[wasm_bindgen_test]
fn invalid_ids_return_typed_errors() {
    let mut f = TeamFlow::in_memory(JsValue::UNDEFINED).unwrap();
    let rev = f.revision();

    assert!(is_err(&f.update_member_res("nobody", Some("X".into()), None), "invalid_id"));
    assert!(is_err(&f.update_member_position_res("nobody", 1.0, 1.0), "invalid_id"));
    assert!(is_err(&f.delete_member_res("nobody"), "invalid_id"));
    assert!(is_err(&f.delete_edge_res("nope"), "invalid_id"));
    assert!(is_err(&f.add_edge_res("1", "nobody"), "invalid_id"));
    assert_eq!(f.revision(), rev, "state mutated on error");
    assert_eq!(f.edge_count(), 1);
}

#[wasm_bindgen_test]
fn non_finite_positions_are_rejected() {
    let mut f = TeamFlow::in_memory(JsValue::UNDEFINED).unwrap();
    let rev = f.revision();
    assert!(is_err(&f.add_member_res("A".into(), "R".into(), f64::NAN, 0.0), "non_finite"));
    assert!(is_err(&f.update_member_position_res("1", 0.0, f64::INFINITY), "non_finite"));
    // JSON has no NaN, so build the event by hand
    let ev = parse(r#"{"kind":"position_changed","id":"1","position":{"x":0,"y":0},"dragging":false}"#);
    let pos = Reflect::get(&ev, &JsValue::from_str("position")).unwrap();
    Reflect::set(&pos, &JsValue::from_str("x"), &JsValue::from_f64(f64::NAN)).unwrap();
    assert!(is_err(&f.handle_event(ev), "non_finite"));
    assert!(!f.update_member_position("1", f64::NAN, 0.0));
    assert_eq!(f.revision(), rev);

    let id = f.add_member("B".into(), "R".into(), f64::INFINITY, 3.0);
    let m: teamflow::Member = serde_wasm_bindgen::from_value(f.member(&id)).unwrap();
    assert_eq!((m.position.x, m.position.y), (0.0, 0.0));
}

#[wasm_bindgen_test]
fn malformed_events_are_rejected() {
    let mut f = TeamFlow::in_memory(JsValue::UNDEFINED).unwrap();
    assert!(is_err(&f.handle_event(parse(r#"{"kind":"teleport","id":"1"}"#)), "invalid_event"));
    assert!(is_err(&f.handle_event(parse(r#"{"kind":"node_clicked"}"#)), "invalid_event"));
    assert!(is_err(&f.handle_event(parse(r#"{"kind":"edge_clicked","id":""}"#)), "invalid_event"));
    assert!(is_err(&f.handle_event(JsValue::from_f64(3.0)), "invalid_event"));
    assert_eq!(f.edge_count(), 1);
}

#[wasm_bindgen_test]
fn palette_drop_errors() {
    let mut f = TeamFlow::in_memory(JsValue::UNDEFINED).unwrap();
    let item = parse(r#"{"name":"New Developer","role":"Developer"}"#);
    let zero_zoom = parse(r#"{"pointer":{"x":1,"y":1},"viewport":{"x":0,"y":0,"zoom":0}}"#);
    let r = f.drop_palette_item(item.clone(), zero_zoom);
    assert!(is_err(&r, "out_of_range"));
    let data = Reflect::get(&Reflect::get(&r, &JsValue::from_str("error")).unwrap(), &JsValue::from_str("data")).unwrap();
    assert_eq!(Reflect::get(&data, &JsValue::from_str("exclusive_min")).unwrap().as_f64(), Some(0.0));
    assert!(Reflect::get(&data, &JsValue::from_str("max")).unwrap().is_undefined());
    assert!(is_err(&f.drop_palette_item(parse("{}"), parse(r#"{"pointer":{"x":1,"y":1}}"#)), "invalid_event"));
    assert_eq!(f.member_count(), 2);
}

#[wasm_bindgen_test]
fn config_and_snapshot_errors() {
    let bad = TeamFlow::in_memory(parse(r#"{"storage_key":42}"#));
    assert!(bad.is_err());

    let mut f = TeamFlow::in_memory(JsValue::NULL).unwrap();
    let dup = parse(
        r#"{"members":[{"id":"a","name":"A","role":"R","position":{"x":0,"y":0}},{"id":"a","name":"B","role":"R","position":{"x":0,"y":0}}],"edges":[]}"#,
    );
    assert!(is_err(&f.replace_snapshot(dup), "invalid_snapshot"));
    assert!(is_err(&f.replace_snapshot(parse(r#"{"members":5}"#)), "invalid_snapshot"));
    assert_eq!(f.member_count(), 2);

    assert!(is_err(&init_logging("loud"), "invalid_config"));
    assert!(!is_err(&init_logging("warn"), "invalid_config"));
}
