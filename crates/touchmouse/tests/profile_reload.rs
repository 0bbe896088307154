#![forbid(unsafe_code)]

//! A profile reload retunes attached adapters between touches.

use std::sync::Arc;

use touchmouse::prelude::*;
use touchmouse::{PointerListener, RegionSource};
use touchmouse_harness::{RegionTree, ScriptedHost};
use web_time::Instant;

fn touch(adapter: &TouchInputAdapter, host: &ScriptedHost, kind: PointerEventKind, x: i32, y: i32) {
    let event = PointerEvent::new(kind, PointerButton::Primary, Point::new(x, y), Instant::now());
    host.inject(event);
    if kind == PointerEventKind::Down {
        host.run_authoritative();
        adapter.poll_probes();
    }
}

#[test]
fn reload_applies_to_next_session() {
    let host = Arc::new(ScriptedHost::new(RegionTree::default()));
    let profile = TouchProfile::from_config(TouchConfig::default()).expect("default config");
    let adapter = profile.adapter(host.bindings(Arc::new(Thresholds::default())));
    adapter.attach(&*host, &*host);

    touch(&adapter, &host, PointerEventKind::Down, 100, 100);
    let mut config = TouchConfig::default();
    config.gesture.rotate_distance = 5;
    profile.reload(&config).expect("valid reload");

    // The open session keeps its snapshot.
    touch(&adapter, &host, PointerEventKind::Move, 100, 110);
    assert_eq!(adapter.gesture_state(), GestureState::RotateArmed);
    touch(&adapter, &host, PointerEventKind::Up, 100, 110);
    host.tick(Instant::now());
    assert_eq!(adapter.gesture_state(), GestureState::Idle);

    touch(&adapter, &host, PointerEventKind::Down, 100, 100);
    touch(&adapter, &host, PointerEventKind::Move, 100, 110);
    assert_eq!(adapter.gesture_state(), GestureState::Rotating);
}

#[test]
fn profile_catalog_reaches_the_adapter() {
    use touchmouse_harness::RegionSpec;

    let tree = RegionTree::build([(
        RegionId(7),
        RegionSpec::new(touchmouse::Rect::new(0, 0, 100, 100)),
    )]);
    assert!(tree.region(RegionId(7)).is_some());
    let host = Arc::new(ScriptedHost::new(tree));

    let mut config = TouchConfig::default();
    config.regions.scrollable = RegionSet::new("scrollable", [RegionId(7)]);
    let profile = TouchProfile::from_config(config).expect("valid");
    let adapter = profile.adapter(host.bindings(Arc::new(Thresholds::default())));
    adapter.attach(&*host, &*host);

    let down = PointerEvent::new(
        PointerEventKind::Down,
        PointerButton::Primary,
        Point::new(50, 50),
        Instant::now(),
    );
    assert!(adapter.pointer_pressed(down).is_consumed());
    host.run_authoritative();
    adapter.poll_probes();
    assert_eq!(adapter.gesture_state(), GestureState::ScrollArmed);
}
