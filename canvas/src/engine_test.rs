#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use super::*;

// =============================================================
// Helpers
// =============================================================

fn created_id(action: &Action) -> ElementId {
    match action {
        Action::ElementCreated(record) => record.id,
        other => panic!("expected ElementCreated, got {other:?}"),
    }
}

fn position_of(core: &EngineCore, id: ElementId) -> Point {
    core.element(id).map(CanvasElement::position).unwrap()
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn rect(left: f64, top: f64) -> Option<SurfaceRect> {
    Some(SurfaceRect::at(left, top))
}

// =============================================================
// EngineCore: construction
// =============================================================

#[test]
fn core_new_is_empty_with_default_title() {
    let core = EngineCore::new();
    assert!(core.elements().is_empty());
    assert!(core.selection().is_none());
    assert!(core.drag.is_idle());
    assert_eq!(core.title(), "Coaching Framework Canvas");
}

#[test]
fn each_core_gets_its_own_canvas_id() {
    assert_ne!(EngineCore::new().canvas_id(), EngineCore::new().canvas_id());
}

#[test]
fn with_title_overrides_title() {
    assert_eq!(EngineCore::with_title("Executive Presence").title(), "Executive Presence");
}

// =============================================================
// add_element
// =============================================================

#[test]
fn add_element_returns_created_record() {
    let mut core = EngineCore::new();
    let action = core.add_element(ElementKind::Link);
    let Action::ElementCreated(record) = &action else {
        panic!("expected ElementCreated, got {action:?}");
    };
    assert_eq!(record.kind, ElementKind::Link);
    assert_eq!(record.content, "Link URL");
    assert_eq!(record.size.height(), 150.0);
    assert_eq!(core.elements().len(), 1);
}

#[test]
fn add_element_stacks_newest_on_top() {
    let mut core = EngineCore::new();
    let a = created_id(&core.add_element(ElementKind::Text));
    let b = created_id(&core.add_element(ElementKind::Image));
    let order: Vec<_> = core.elements().iter().map(CanvasElement::id).collect();
    assert_eq!(order, vec![a, b]);
    assert_eq!(core.store.topmost_at(pt(150.0, 150.0)), Some(b));
}

#[test]
fn add_does_not_select() {
    let mut core = EngineCore::new();
    core.add_element(ElementKind::Text);
    assert!(core.selection().is_none());
}

// =============================================================
// update_element_content / resize_element
// =============================================================

#[test]
fn update_content_reports_patch() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Text));
    let action = core.update_element_content(id, "Values and strengths");
    assert_eq!(action, Action::ElementUpdated { id, fields: ElementPatch::content("Values and strengths") });
    assert_eq!(core.element(id).unwrap().content().as_str(), "Values and strengths");
}

#[test]
fn update_content_unknown_id_is_none() {
    let mut core = EngineCore::new();
    core.add_element(ElementKind::Text);
    let ghost = factory::create(ElementKind::Text).id();
    assert_eq!(core.update_element_content(ghost, "x"), Action::None);
}

#[test]
fn resize_element_applies_size() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Image));
    let size = Size::new(400.0, 300.0).unwrap();
    assert!(matches!(core.resize_element(id, size), Action::ElementUpdated { .. }));
    assert_eq!(core.element(id).unwrap().size(), size);
}

// =============================================================
// delete_element / select_element
// =============================================================

#[test]
fn delete_selected_clears_selection() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Text));
    core.select_element(Some(id));
    assert_eq!(core.delete_element(id), Action::ElementDeleted { id });
    assert!(core.selection().is_none());
    assert!(core.elements().is_empty());
}

#[test]
fn delete_unselected_keeps_selection() {
    let mut core = EngineCore::new();
    let a = created_id(&core.add_element(ElementKind::Text));
    let b = created_id(&core.add_element(ElementKind::Link));
    core.select_element(Some(a));
    core.delete_element(b);
    assert_eq!(core.selection(), Some(a));
}

#[test]
fn delete_unknown_is_none() {
    let mut core = EngineCore::new();
    let ghost = factory::create(ElementKind::Text).id();
    assert_eq!(core.delete_element(ghost), Action::None);
}

#[test]
fn delete_dragged_element_ends_drag() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Text));
    core.begin_drag(id);
    core.delete_element(id);
    assert!(core.drag.is_idle());
}

#[test]
fn select_reports_change_once() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Image));
    assert_eq!(core.select_element(Some(id)), Action::SelectionChanged { id: Some(id) });
    assert_eq!(core.select_element(Some(id)), Action::None);
    assert_eq!(core.select_element(None), Action::SelectionChanged { id: None });
    assert!(core.selection().is_none());
}

// =============================================================
// Drag / drop
// =============================================================

#[test]
fn begin_drag_then_drop_moves_element() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Text));
    core.begin_drag(id);
    let action = core.on_drop(id, pt(250.0, 300.0), rect(50.0, 50.0));
    assert_eq!(action, Action::ElementUpdated { id, fields: ElementPatch::position(pt(200.0, 250.0)) });
    assert_eq!(position_of(&core, id), pt(200.0, 250.0));
    assert!(core.drag.is_idle());
}

#[test]
fn drop_without_begin_is_one_step_move() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Link));
    let action = core.on_drop(id, pt(30.0, 40.0), rect(10.0, 10.0));
    assert!(matches!(action, Action::ElementUpdated { .. }));
    assert_eq!(position_of(&core, id), pt(20.0, 30.0));
    assert!(core.drag.is_idle());
}

#[test]
fn drop_unavailable_surface_is_noop() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Text));
    core.begin_drag(id);
    assert_eq!(core.on_drop(id, pt(250.0, 300.0), None), Action::None);
    assert_eq!(position_of(&core, id), pt(100.0, 100.0));
    assert!(core.drag.is_idle());
}

#[test]
fn drop_at_nan_pointer_is_noop() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Text));
    core.begin_drag(id);
    assert_eq!(core.on_drop(id, pt(f64::NAN, 50.0), rect(0.0, 0.0)), Action::None);
    assert_eq!(position_of(&core, id), pt(100.0, 100.0));
    assert!(core.drag.is_idle());
}

#[test]
fn drop_at_infinite_pointer_keeps_export_readable() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Image));
    assert_eq!(core.on_drop(id, pt(f64::INFINITY, 50.0), rect(0.0, 0.0)), Action::None);

    let text = serde_json::to_string(&core.export()).unwrap();
    let back: CanvasSnapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(back.elements[0].position, pt(100.0, 100.0));
}

#[test]
fn drop_on_border_reports_clamped_position() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Text));
    let action = core.on_drop(id, pt(9.0, 60.0), rect(10.0, 10.0));
    assert_eq!(action, Action::ElementUpdated { id, fields: ElementPatch::position(pt(0.0, 50.0)) });
    assert_eq!(position_of(&core, id), pt(0.0, 50.0));
}

#[test]
fn drop_of_other_element_cancels_active_drag() {
    let mut core = EngineCore::new();
    let a = created_id(&core.add_element(ElementKind::Text));
    let b = created_id(&core.add_element(ElementKind::Image));
    core.begin_drag(a);
    assert_eq!(core.on_drop(b, pt(10.0, 10.0), rect(0.0, 0.0)), Action::None);
    assert_eq!(position_of(&core, a), pt(100.0, 100.0));
    assert_eq!(position_of(&core, b), pt(100.0, 100.0));
    assert!(core.drag.is_idle());
}

#[test]
fn drop_unknown_element_is_noop() {
    let mut core = EngineCore::new();
    let ghost = factory::create(ElementKind::Text).id();
    assert_eq!(core.on_drop(ghost, pt(10.0, 10.0), rect(0.0, 0.0)), Action::None);
    assert!(core.drag.is_idle());
}

#[test]
fn begin_drag_unknown_element_stays_idle() {
    let mut core = EngineCore::new();
    let ghost = factory::create(ElementKind::Text).id();
    core.begin_drag(ghost);
    assert!(core.drag.is_idle());
}

#[test]
fn second_begin_drag_keeps_first() {
    let mut core = EngineCore::new();
    let a = created_id(&core.add_element(ElementKind::Text));
    let b = created_id(&core.add_element(ElementKind::Text));
    core.begin_drag(a);
    core.begin_drag(b);
    assert_eq!(core.drag.dragging(), Some(a));
}

#[test]
fn cancel_drag_leaves_position() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Image));
    core.begin_drag(id);
    assert_eq!(core.cancel_drag(), Action::None);
    assert!(core.drag.is_idle());
    assert_eq!(position_of(&core, id), pt(100.0, 100.0));
}

// =============================================================
// export
// =============================================================

#[test]
fn export_is_independent_of_live_canvas() {
    let mut core = EngineCore::new();
    let id = created_id(&core.add_element(ElementKind::Text));
    core.select_element(Some(id));
    let snap = core.export();

    core.update_element_content(id, "after");
    core.delete_element(id);

    assert_eq!(snap.canvas_id, core.canvas_id());
    assert_eq!(snap.elements.len(), 1);
    assert_eq!(snap.elements[0].content, "New Text");
    assert_eq!(snap.selected_id, Some(id));
    assert!(core.export().is_empty());
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn export_logs_below_info() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let core = EngineCore::new();
        let _snap = core.export();
    });

    let text = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
    let line = text.lines().find(|l| l.contains("canvas exported")).unwrap();
    assert!(line.contains("DEBUG"), "{line}");
}

// =============================================================
// Engine (with surface)
// =============================================================

#[test]
fn engine_measures_surface_at_drop_time() {
    let mounted = Rc::new(Cell::new(Some(SurfaceRect::at(10.0, 20.0))));
    let source = Rc::clone(&mounted);
    let mut engine = Engine::new(move || source.get());

    let id = created_id(&engine.add_element(ElementKind::Text));
    engine.begin_drag(id);
    engine.on_drop(id, 110.0, 220.0);
    assert_eq!(engine.element(id).unwrap().position(), pt(100.0, 200.0));

    mounted.set(None);
    engine.begin_drag(id);
    assert_eq!(engine.on_drop(id, 500.0, 500.0), Action::None);
    assert_eq!(engine.element(id).unwrap().position(), pt(100.0, 200.0));

    mounted.set(Some(SurfaceRect::at(0.0, 0.0)));
    engine.on_drop(id, 5.0, 6.0);
    assert_eq!(engine.element(id).unwrap().position(), pt(5.0, 6.0));
}

#[test]
fn engine_delegates_intents() {
    let mut engine = Engine::with_core(|| Some(SurfaceRect::at(0.0, 0.0)), EngineCore::with_title("Delegation"));
    let id = created_id(&engine.add_element(ElementKind::Image));
    engine.update_element_content(id, "https://example.com/cat.png");
    engine.resize_element(id, Size::new(10.0, 10.0).unwrap());
    engine.select_element(Some(id));
    assert_eq!(engine.selection(), Some(id));

    let snap = engine.export();
    assert_eq!(snap.title, "Delegation");
    assert_eq!(snap.elements[0].content, "https://example.com/cat.png");

    engine.begin_drag(id);
    engine.cancel_drag();
    engine.delete_element(id);
    assert!(engine.selection().is_none());
    assert!(engine.export().is_empty());
}
