//! Pane focus, resize, split, swap, and close — the region-tree side of the
//! dispatcher. Geometry itself lives in `mosaic-layout`; this module is the
//! glue between a keystroke, the tree, and the window/file arenas a split or
//! close has to keep in sync with it.

use mosaic_layout::LayoutError;

use super::report_error;
use crate::App;

/// Columns/rows a single `ResizeGrow`/`ResizeShrink` keystroke moves a
/// region's boundary by.
pub(super) const RESIZE_STEP: i32 = 2;

pub(super) fn focus_next(app: &mut App) {
    let region = app.focused_region();
    let next = app.layout.next_region(region);
    let window = app.layout.window_of(next).expect("leaf region has a window");
    app.set_focused_window_id(window);
}

pub(super) fn focus_previous(app: &mut App) {
    let region = app.focused_region();
    let previous = app.layout.previous_region(region);
    let window = app.layout.window_of(previous).expect("leaf region has a window");
    app.set_focused_window_id(window);
}

pub(super) fn resize(app: &mut App, amount: i32) {
    let region = app.focused_region();
    if let Err(err) = app.layout.resize(region, amount) {
        let window_id = app.focused_window_id();
        report_error(app, window_id, layout_error_message(err));
    }
}

pub(super) fn swap(app: &mut App) {
    let region = app.focused_region();
    app.layout.swap(region);
}

/// Closes the focused pane's region, freeing its window slot and handing
/// focus to whatever region the tree says should take it over.
pub(super) fn close(app: &mut App) {
    let region = app.focused_region();
    let closed_window = app.focused_window_id();

    match app.layout.close(region) {
        Some((next_focus, _closed)) => {
            app.state.free_window(closed_window);
            app.remove_window(closed_window);
            app.set_focused_window_id(next_focus);
        }
        None => {
            report_error(app, closed_window, "cannot close the only pane".to_string());
        }
    }
}

/// `split -` (stacked) or `split |` (side by side): divides the focused
/// pane's region in two and gives the new half an empty, fileless window
/// per §4.4, rolling the window slot back if the tree rejects the split
/// for being too small to divide further.
pub(super) fn split(app: &mut App, vertical: bool) {
    let leaf = app.focused_region();
    let new_window = app.state.alloc_empty_window();

    match app.layout.split(leaf, vertical, new_window) {
        Ok(_new_region) => {
            app.insert_window(new_window, mosaic_view::Window::new(None));
        }
        Err(err) => {
            app.state.free_window(new_window);
            let focused = app.focused_window_id();
            report_error(app, focused, layout_error_message(err));
        }
    }
}

fn layout_error_message(err: LayoutError) -> String {
    match err {
        LayoutError::NoParent => "cannot resize the root pane".to_string(),
        LayoutError::WouldViolateMinimum => "pane too small to split further".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::tests::new_app;

    #[test]
    fn split_creates_a_second_fileless_pane() {
        let mut app = new_app();
        split(&mut app, true);
        assert_eq!(app.panes().len(), 2);
        let (_, new_window) = app
            .panes()
            .into_iter()
            .find(|(_, w)| *w != app.focused_window_id())
            .unwrap();
        assert_eq!(app.window(new_window).file, None);
    }

    #[test]
    fn close_on_root_reports_error_and_keeps_single_pane() {
        let mut app = new_app();
        close(&mut app);
        assert!(app.focused_window().error_present);
        assert_eq!(app.panes().len(), 1);
    }

    #[test]
    fn close_after_split_returns_focus_to_sibling() {
        let mut app = new_app();
        let original = app.focused_window_id();
        split(&mut app, true);
        let (_, new_window) = app
            .panes()
            .into_iter()
            .find(|(_, w)| *w != original)
            .unwrap();
        app.set_focused_window_id(new_window);
        close(&mut app);
        assert_eq!(app.panes().len(), 1);
        assert_eq!(app.focused_window_id(), original);
    }

    #[test]
    fn focus_next_on_single_pane_is_a_noop() {
        let mut app = new_app();
        let before = app.focused_window_id();
        focus_next(&mut app);
        assert_eq!(app.focused_window_id(), before);
    }

    #[test]
    fn resize_on_root_reports_error() {
        let mut app = new_app();
        resize(&mut app, RESIZE_STEP);
        assert!(app.focused_window().error_present);
    }
}
