use areas_wasm::AreaBoard;
use serde_json::{json, Value};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js(v: Value) -> JsValue {
    serde_wasm_bindgen::to_value(&v).unwrap()
}

fn back(v: JsValue) -> Value {
    serde_wasm_bindgen::from_value(v).unwrap()
}

fn quad_feature(id: &str, x: f64) -> Value {
    json!({
        "type": "Feature",
        "id": id,
        "properties": {},
        "geometry": {"type": "Polygon", "coordinates": [
            [[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]
        ]},
    })
}

fn hexagon_feature(id: &str) -> Value {
    json!({
        "type": "Feature",
        "id": id,
        "properties": {},
        "geometry": {"type": "Polygon", "coordinates": [
            [[0.0, 0.0], [2.0, 0.0], [3.0, 1.0], [2.0, 2.0], [0.0, 2.0], [-1.0, 1.0], [0.0, 0.0]]
        ]},
    })
}

#[wasm_bindgen_test]
fn create_attach_and_project() {
    let mut board = AreaBoard::new();
    assert!(board.on_create(js(json!([quad_feature("a", 0.0)]))));
    assert_eq!(board.feature_count(), 1);

    assert!(board.attach_image(js(json!("a")), "blob:a".to_string()));
    let overlays = back(board.overlays());
    let overlays = overlays.as_array().unwrap();
    assert_eq!(overlays.len(), 1);
    assert_eq!(overlays[0]["id"], "a");
    assert_eq!(overlays[0]["imageUrl"], "blob:a");
    assert_eq!(overlays[0]["opacity"], 0.5);
    assert_eq!(
        overlays[0]["corners"],
        json!([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
    );
}

#[wasm_bindgen_test]
fn default_names_count_up() {
    let mut board = AreaBoard::new();
    board.on_create(js(json!([quad_feature("a", 0.0), quad_feature("b", 2.0)])));
    let props = back(board.properties(js(json!("b"))));
    assert_eq!(props["name"], "Area 2");
    assert_eq!(props["includeInGeoJSON"], true);
    assert!(props["fillImageUrl"].is_null());
}

#[wasm_bindgen_test]
fn live_update_bursts_are_throttled() {
    let mut board = AreaBoard::with_throttle_window(100.0);
    board.on_create(js(json!([quad_feature("a", 0.0)])));
    board.attach_image(js(json!("a")), "blob:a".to_string());

    // Leading tick applies immediately; the rest of the burst coalesces.
    assert!(board.on_live_update(js(json!([quad_feature("a", 1.0)])), 0.0));
    assert!(!board.on_live_update(js(json!([quad_feature("a", 2.0)])), 20.0));
    assert!(!board.on_live_update(js(json!([quad_feature("a", 3.0)])), 40.0));
    assert!(board.has_pending_live_update());

    // Not due yet.
    assert!(!board.tick(60.0));
    // Due: the trailing payload is the latest one.
    assert!(board.tick(150.0));
    let overlays = back(board.overlays());
    assert_eq!(overlays[0]["corners"][0], json!([3.0, 0.0]));
    assert!(!board.has_pending_live_update());
}

#[wasm_bindgen_test]
fn delete_flushes_and_wins_over_pending_live_update() {
    let mut board = AreaBoard::with_throttle_window(200.0);
    board.on_create(js(json!([quad_feature("z", 0.0)])));

    board.on_live_update(js(json!([quad_feature("z", 1.0)])), 0.0);
    board.on_live_update(js(json!([quad_feature("z", 2.0)])), 30.0);
    assert!(board.has_pending_live_update());

    assert!(board.on_delete(js(json!([quad_feature("z", 2.0)]))));
    assert_eq!(board.feature_count(), 0);
    assert!(!board.has_pending_live_update());
    assert!(!board.tick(10_000.0));
    assert!(board.properties(js(json!("z"))).is_null());
}

#[wasm_bindgen_test]
fn committed_update_out_of_quad_shape_clears_the_image() {
    let mut board = AreaBoard::new();
    board.on_create(js(json!([quad_feature("a", 0.0)])));
    board.attach_image(js(json!("a")), "blob:a".to_string());

    assert!(board.on_update(js(json!([hexagon_feature("a")]))));
    let props = back(board.properties(js(json!("a"))));
    assert!(props["fillImageUrl"].is_null());
    assert_eq!(back(board.overlays()).as_array().unwrap().len(), 0);
    assert!(!board.supports_background_image(js(json!("a"))));
}

#[wasm_bindgen_test]
fn selection_follows_single_feature_events() {
    let mut board = AreaBoard::new();
    board.on_create(js(json!([quad_feature("a", 0.0), quad_feature("b", 2.0)])));

    board.on_selection_change(js(json!([quad_feature("a", 0.0)])));
    assert_eq!(back(board.selected_id()), json!("a"));

    board.on_selection_change(js(json!([quad_feature("a", 0.0), quad_feature("b", 2.0)])));
    assert!(board.selected_id().is_null());

    board.on_selection_change(js(json!([quad_feature("b", 2.0)])));
    board.on_delete(js(json!([quad_feature("b", 2.0)])));
    assert!(board.selected_id().is_null());
}

#[wasm_bindgen_test]
fn metadata_edits_round_trip_through_the_board() {
    let mut board = AreaBoard::new();
    board.on_create(js(json!([quad_feature("a", 0.0)])));

    assert!(board.set_name(js(json!("a")), "Depot".to_string()));
    assert!(board.set_include_in_geojson(js(json!("a")), false));
    assert!(board.set_image_opacity(js(json!("a")), 0.8));

    let props = back(board.properties(js(json!("a"))));
    assert_eq!(props["name"], "Depot");
    assert_eq!(props["includeInGeoJSON"], false);
    assert_eq!(props["imageOpacity"], 0.8);
    assert_eq!(board.included_count(), 0);

    // Stale ids are inert.
    assert!(!board.set_name(js(json!("ghost")), "x".to_string()));
    assert!(board.properties(js(json!("ghost"))).is_null());
}
