use crate::support::{editor, record};
use geoedit_core::{AppEvent, ViewEvent, ViewSnapshot};
use geoedit_editor::{MapEvent, ViewHistory};
use geoedit_settings::EditorConfig;
use proptest::prelude::*;

fn move_to(editor: &mut crate::support::Editor, center: (f64, f64), zoom: f64) {
    editor
        .backend_mut()
        .set_view(ViewSnapshot::new(center, zoom));
    editor.handle_event(MapEvent::ViewChanged);
}

#[test]
fn test_near_views_are_deduplicated() {
    let mut history = ViewHistory::new(10);
    assert!(history.push(ViewSnapshot::new((0.0, 0.0), 10.0)));
    assert!(!history.push(ViewSnapshot::new((5.0, 3.0), 10.05)));
    assert_eq!(history.len(), 1);
}

#[test]
fn test_prev_after_next_returns_to_same_entry() {
    let mut editor = editor(EditorConfig::default());
    move_to(&mut editor, (0.0, 0.0), 10.0);
    move_to(&mut editor, (1000.0, 0.0), 10.0);
    move_to(&mut editor, (2000.0, 0.0), 10.0);
    assert_eq!(editor.history().len(), 3);

    assert!(editor.history_prev());
    editor.handle_event(MapEvent::ViewChanged);
    assert!(editor.history_prev());
    editor.handle_event(MapEvent::ViewChanged);
    let before = editor.backend().viewport().snapshot();

    assert!(editor.history_next());
    editor.handle_event(MapEvent::ViewChanged);
    assert!(editor.history_prev());
    editor.handle_event(MapEvent::ViewChanged);

    assert_eq!(editor.backend().viewport().snapshot(), before);
    assert_eq!(editor.history().len(), 3);
    assert_eq!(editor.history().index(), 0);
    assert!(!editor.history().is_navigating());
}

#[test]
fn test_history_wraps_at_both_ends() {
    let mut editor = editor(EditorConfig::default());
    move_to(&mut editor, (0.0, 0.0), 10.0);
    move_to(&mut editor, (1000.0, 0.0), 10.0);
    assert_eq!(editor.history().index(), 1);

    // next from the newest entry wraps to the oldest
    assert!(editor.history_next());
    editor.handle_event(MapEvent::ViewChanged);
    assert_eq!(editor.history().index(), 0);
    assert_eq!(editor.backend().viewport().center(), geo::Coord { x: 0.0, y: 0.0 });

    // prev from the oldest entry wraps to the newest
    assert!(editor.history_prev());
    editor.handle_event(MapEvent::ViewChanged);
    assert_eq!(editor.history().index(), 1);
    assert_eq!(editor.backend().viewport().center(), geo::Coord { x: 1000.0, y: 0.0 });

    assert_eq!(editor.history().len(), 2);
    assert!(!editor.history().is_navigating());
}

#[test]
fn test_history_navigation_on_empty_history() {
    let mut editor = editor(EditorConfig::default());
    assert!(editor.history().is_empty());
    assert!(!editor.history_prev());
    assert!(!editor.history_next());
}

#[test]
fn test_goto_current_view_clears_navigation() {
    let mut editor = editor(EditorConfig::default());
    move_to(&mut editor, (0.0, 0.0), 10.0);

    assert!(editor.history_goto(-1));
    assert!(!editor.history().is_navigating());

    // the next real move is recorded
    move_to(&mut editor, (1000.0, 0.0), 10.0);
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn test_navigated_carries_scale() {
    let mut editor = editor(EditorConfig::default());
    let events = record(&editor);
    move_to(&mut editor, (0.0, 0.0), 10.0);

    let resolution = editor.backend().viewport().resolution();
    let scales: Vec<f64> = events
        .lock()
        .iter()
        .filter_map(|event| match event {
            AppEvent::View(ViewEvent::Navigated { scale, .. }) => Some(*scale),
            _ => None,
        })
        .collect();
    assert_eq!(scales, vec![resolution * 39.37 * 96.0]);
}

proptest! {
    #[test]
    fn prop_history_keeps_most_recent(max in 1usize..20, count in 0usize..60) {
        let mut history = ViewHistory::new(max);
        for i in 0..count {
            history.push(ViewSnapshot::new((i as f64 * 100.0, 0.0), 10.0));
        }

        prop_assert_eq!(history.len(), count.min(max));
        if count > 0 {
            let newest = ViewSnapshot::new(((count - 1) as f64 * 100.0, 0.0), 10.0);
            prop_assert_eq!(history.entries().last(), Some(&newest));
            prop_assert_eq!(history.current(), Some(&newest));
        }
    }

    #[test]
    fn prop_prev_then_next_is_stable(count in 2usize..15) {
        let mut history = ViewHistory::new(20);
        for i in 0..count {
            history.push(ViewSnapshot::new((i as f64 * 100.0, 0.0), 10.0));
        }
        let start = history.index();
        history.prev();
        history.finish_navigation();
        history.next();
        history.finish_navigation();
        prop_assert_eq!(history.index(), start);
    }
}
