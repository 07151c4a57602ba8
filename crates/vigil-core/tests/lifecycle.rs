//! Lifecycle integration tests
//!
//! Attachment-driven show/hide, re-entrancy guards, resume handling, and
//! failure semantics, all through the public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vigil_core::{ElementConfig, LifecycleError, LoadOptions, Runtime, names};

fn runtime() -> Runtime {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let mut rt = Runtime::new();
    rt.initialize();
    rt
}

fn counter() -> (Rc<Cell<u32>>, impl Fn() -> u32) {
    let cell = Rc::new(Cell::new(0));
    let reader = {
        let cell = cell.clone();
        move || cell.get()
    };
    (cell, reader)
}

#[test]
fn test_attach_shows_exactly_once() {
    let mut rt = runtime();
    let (shows, show_count) = counter();

    let el = rt
        .create_element(ElementConfig::new().on_show(move |_, _| {
            shows.set(shows.get() + 1);
            Ok(())
        }))
        .unwrap();

    assert!(!rt.document().element(el).unwrap().state.shown);

    rt.append_to_root(el).unwrap();
    // Batch delivery is deferred to the next turn.
    assert_eq!(show_count(), 0);

    rt.run_until_idle().unwrap();
    assert_eq!(show_count(), 1);
    assert!(rt.document().element(el).unwrap().state.shown);

    // A quiet turn does not show again.
    rt.run_until_idle().unwrap();
    assert_eq!(show_count(), 1);
}

#[test]
fn test_detach_hides_once_and_flag_flips_after_callback() {
    let mut rt = runtime();
    let (hides, hide_count) = counter();
    let shown_during_hide = Rc::new(Cell::new(false));

    let el = rt
        .create_element(ElementConfig::new().on_hide({
            let shown_during_hide = shown_during_hide.clone();
            move |rt, el| {
                hides.set(hides.get() + 1);
                shown_during_hide.set(rt.document().element(el).unwrap().state.shown);
                Ok(())
            }
        }))
        .unwrap();

    rt.append_to_root(el).unwrap();
    rt.run_until_idle().unwrap();

    rt.detach(el).unwrap();
    rt.run_until_idle().unwrap();

    assert_eq!(hide_count(), 1);
    // `shown` was still set while the callback ran; it flips afterwards.
    assert!(shown_during_hide.get());
    assert!(!rt.document().element(el).unwrap().state.shown);

    rt.run_until_idle().unwrap();
    assert_eq!(hide_count(), 1);
}

#[test]
fn test_element_moved_within_document_stays_shown() {
    let mut rt = runtime();
    let (hides, hide_count) = counter();

    let section = rt.document_mut().create_element("section");
    rt.append_to_root(section).unwrap();

    let el = rt
        .create_element(ElementConfig::new().on_hide(move |_, _| {
            hides.set(hides.get() + 1);
            Ok(())
        }))
        .unwrap();
    rt.append_to_root(el).unwrap();
    rt.run_until_idle().unwrap();

    // Moving under another attached parent is not a detach.
    rt.append_child(section, el).unwrap();
    rt.run_until_idle().unwrap();

    assert_eq!(hide_count(), 0);
    assert!(rt.document().element(el).unwrap().state.shown);
}

#[test]
fn test_show_pending_guard_suppresses_reentry() {
    let mut rt = runtime();
    let (shows, show_count) = counter();

    let el = rt
        .create_element(ElementConfig::new().on_show(move |rt, el| {
            shows.set(shows.get() + 1);
            // Re-entering while this show is in flight must be a no-op.
            rt.show(el, LoadOptions::default())?;
            Ok(())
        }))
        .unwrap();

    rt.append_to_root(el).unwrap();
    rt.run_until_idle().unwrap();
    assert_eq!(show_count(), 1);
}

#[test]
fn test_hide_on_non_shown_element_is_noop() {
    let mut rt = runtime();
    let (hides, hide_count) = counter();
    let (unloads, unload_count) = counter();

    let el = rt
        .create_element(
            ElementConfig::new()
                .on_hide(move |_, _| {
                    hides.set(hides.get() + 1);
                    Ok(())
                })
                .on_unload(move |_, _| {
                    unloads.set(unloads.get() + 1);
                    Ok(())
                }),
        )
        .unwrap();

    rt.hide(el).unwrap();
    assert_eq!(hide_count(), 0);
    assert_eq!(unload_count(), 0);
}

#[test]
fn test_freed_element_entry_dropped_silently() {
    let mut rt = runtime();
    let (hides, hide_count) = counter();

    let el = rt
        .create_element(ElementConfig::new().on_hide(move |_, _| {
            hides.set(hides.get() + 1);
            Ok(())
        }))
        .unwrap();

    rt.append_to_root(el).unwrap();
    rt.run_until_idle().unwrap();
    assert_eq!(rt.managed_count(), 1);

    rt.free(el).unwrap();
    rt.run_until_idle().unwrap();

    // The dead entry is purged without a hide and without an error.
    assert_eq!(hide_count(), 0);
    assert_eq!(rt.managed_count(), 0);
}

#[test]
fn test_trigger_show_is_deferred() {
    let mut rt = runtime();
    let (shows, show_count) = counter();

    let el = rt
        .create_element(ElementConfig::new().on_show(move |_, _| {
            shows.set(shows.get() + 1);
            Ok(())
        }))
        .unwrap();

    rt.trigger_show(el, LoadOptions::default());
    assert_eq!(show_count(), 0);

    rt.run_until_idle().unwrap();
    assert_eq!(show_count(), 1);
}

#[test]
fn test_load_runs_once_unless_reload() {
    let mut rt = runtime();
    let (loads, load_count) = counter();

    let el = rt
        .create_element(ElementConfig::new().on_load(move |_, _| {
            loads.set(loads.get() + 1);
            Ok(())
        }))
        .unwrap();

    rt.trigger_show(el, LoadOptions::default());
    rt.run_until_idle().unwrap();
    assert_eq!(load_count(), 1);

    rt.trigger_show(el, LoadOptions::default());
    rt.run_until_idle().unwrap();
    assert_eq!(load_count(), 1);

    rt.trigger_show(el, LoadOptions::reload());
    rt.run_until_idle().unwrap();
    assert_eq!(load_count(), 2);
}

#[test]
fn test_lifecycle_notification_order() {
    let mut rt = runtime();
    let log = Rc::new(RefCell::new(Vec::new()));

    let el = rt.create_element(ElementConfig::new()).unwrap();
    for name in [
        names::LOADING,
        names::LOADED,
        names::SHOWING,
        names::SHOWN,
        names::HIDDEN,
    ] {
        let log = log.clone();
        rt.add_listener(el, name, "", move |_, event| {
            log.borrow_mut().push(event.name().to_string());
            Ok(())
        });
    }

    rt.append_to_root(el).unwrap();
    rt.run_until_idle().unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["showing", "loading", "loaded", "shown"],
    );

    log.borrow_mut().clear();
    rt.detach(el).unwrap();
    rt.run_until_idle().unwrap();
    // No "hiding" counterpart exists; only the completion fires.
    assert_eq!(*log.borrow(), vec!["hidden"]);
}

#[test]
fn test_counter_scenario() {
    let mut rt = runtime();
    let (shown_events, shown_event_count) = counter();

    let el = rt
        .create_element(
            ElementConfig::new()
                .prop("count", 0)
                .on_show(|rt, el| {
                    let count = rt
                        .document()
                        .element(el)?
                        .prop("count")
                        .and_then(|v| v.as_int())
                        .unwrap_or(0);
                    rt.set_text(el, &format!("Clicked {count} times"))?;
                    Ok(())
                })
                .listener("click", "", |rt, event| {
                    let el = event.target();
                    let data = rt.document_mut().element_mut(el)?;
                    let next = data.prop("count").and_then(|v| v.as_int()).unwrap_or(0) + 1;
                    data.set_prop("count", next);
                    rt.trigger_show(el, LoadOptions::default());
                    Ok(())
                }),
        )
        .unwrap();

    rt.add_listener(el, names::SHOWN, "", move |_, _| {
        shown_events.set(shown_events.get() + 1);
        Ok(())
    });

    rt.append_to_root(el).unwrap();
    rt.run_until_idle().unwrap();
    assert!(rt.document().element(el).unwrap().state.shown);
    assert_eq!(rt.document().text_content(el), "Clicked 0 times");
    assert_eq!(shown_event_count(), 1);

    rt.dispatch(el, "click").unwrap();
    rt.run_until_idle().unwrap();
    assert_eq!(rt.document().text_content(el), "Clicked 1 times");
    assert!(rt.document().element(el).unwrap().state.shown);
    assert_eq!(shown_event_count(), 2);
}

#[test]
fn test_failing_load_blocks_show() {
    let mut rt = runtime();
    let (shows, show_count) = counter();
    let payload = Rc::new(RefCell::new(None::<String>));

    let el = rt
        .create_element(
            ElementConfig::new()
                .on_load(|_, _| Err("network-fail".into()))
                .on_show(move |_, _| {
                    shows.set(shows.get() + 1);
                    Ok(())
                })
                .listener(names::LOAD_ERROR, "", {
                    let payload = payload.clone();
                    move |_, event| {
                        *payload.borrow_mut() = event.error().map(String::from);
                        Ok(())
                    }
                }),
        )
        .unwrap();

    rt.trigger_show(el, LoadOptions::default());
    let err = rt.run_until_idle().unwrap_err();

    assert!(matches!(err, LifecycleError::Load(_)));
    assert_eq!(err.callback_error().to_string(), "network-fail");
    assert_eq!(payload.borrow().as_deref(), Some("network-fail"));
    assert_eq!(show_count(), 0);
    assert!(!rt.document().element(el).unwrap().state.shown);
}

#[test]
fn test_failed_show_resets_pending_and_can_retry() {
    let mut rt = runtime();
    let fail = Rc::new(Cell::new(true));

    let el = rt
        .create_element(ElementConfig::new().on_show({
            let fail = fail.clone();
            move |_, _| {
                if fail.get() {
                    Err("render-fail".into())
                } else {
                    Ok(())
                }
            }
        }))
        .unwrap();

    rt.trigger_show(el, LoadOptions::default());
    let err = rt.run_until_idle().unwrap_err();
    assert!(matches!(err, LifecycleError::Show(_)));

    let state = rt.document().element(el).unwrap().state;
    assert!(!state.shown);
    assert!(!state.show_pending);

    fail.set(false);
    rt.trigger_show(el, LoadOptions::default());
    rt.run_until_idle().unwrap();
    assert!(rt.document().element(el).unwrap().state.shown);
}

#[test]
fn test_failing_hide_emits_hide_error() {
    let mut rt = runtime();
    let payload = Rc::new(RefCell::new(None::<String>));

    let el = rt
        .create_element(
            ElementConfig::new()
                .on_hide(|_, _| Err("teardown-fail".into()))
                .listener(names::HIDE_ERROR, "", {
                    let payload = payload.clone();
                    move |_, event| {
                        *payload.borrow_mut() = event.error().map(String::from);
                        Ok(())
                    }
                }),
        )
        .unwrap();

    rt.append_to_root(el).unwrap();
    rt.run_until_idle().unwrap();

    rt.detach(el).unwrap();
    let err = rt.run_until_idle().unwrap_err();

    assert!(matches!(err, LifecycleError::Hide(_)));
    assert_eq!(payload.borrow().as_deref(), Some("teardown-fail"));
    // The hide never completed, so the tracked state still says shown.
    assert!(rt.document().element(el).unwrap().state.shown);
}

#[test]
fn test_hidden_fires_after_flags_reset() {
    let mut rt = runtime();
    let observed = Rc::new(Cell::new((true, true)));

    let el = rt.create_element(ElementConfig::new()).unwrap();
    rt.add_listener(el, names::HIDDEN, "", {
        let observed = observed.clone();
        move |rt, event| {
            let state = rt.document().element(event.target()).unwrap().state;
            observed.set((state.shown, state.hide_pending));
            Ok(())
        }
    });

    rt.append_to_root(el).unwrap();
    rt.run_until_idle().unwrap();
    rt.detach(el).unwrap();
    rt.run_until_idle().unwrap();

    assert_eq!(observed.get(), (false, false));
}

#[test]
fn test_resume_reshows_until_hide_unsubscribes() {
    let mut rt = runtime();
    let (shows, show_count) = counter();

    let el = rt
        .create_element(
            ElementConfig::new()
                .show_on_resume(true)
                .on_show(move |_, _| {
                    shows.set(shows.get() + 1);
                    Ok(())
                }),
        )
        .unwrap();

    rt.append_to_root(el).unwrap();
    rt.run_until_idle().unwrap();
    assert_eq!(show_count(), 1);

    rt.fire_resume();
    rt.run_until_idle().unwrap();
    assert_eq!(show_count(), 2);

    // Hide drops the subscription.
    rt.detach(el).unwrap();
    rt.run_until_idle().unwrap();

    rt.fire_resume();
    rt.run_until_idle().unwrap();
    assert_eq!(show_count(), 2);
}

#[test]
fn test_teardown_flushes_pending_batch() {
    let mut rt = runtime();
    let (shows, show_count) = counter();
    let (hides, hide_count) = counter();

    let el = rt
        .create_element(
            ElementConfig::new()
                .on_show(move |_, _| {
                    shows.set(shows.get() + 1);
                    Ok(())
                })
                .on_hide(move |_, _| {
                    hides.set(hides.get() + 1);
                    Ok(())
                }),
        )
        .unwrap();

    rt.append_to_root(el).unwrap();
    // The batch has not run yet; teardown must deliver it synchronously.
    rt.teardown().unwrap();
    assert_eq!(show_count(), 1);
    assert!(rt.document().element(el).unwrap().state.shown);

    // After teardown structural changes are no longer observed.
    rt.detach(el).unwrap();
    rt.run_until_idle().unwrap();
    assert_eq!(hide_count(), 0);
    assert!(rt.document().element(el).unwrap().state.shown);
}

#[test]
fn test_initialize_picks_up_existing_attachment() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let mut rt = Runtime::new();
    let (shows, show_count) = counter();

    let el = rt
        .create_element(ElementConfig::new().on_show(move |_, _| {
            shows.set(shows.get() + 1);
            Ok(())
        }))
        .unwrap();
    rt.append_to_root(el).unwrap();

    // Not observing yet, so nothing happens.
    rt.run_until_idle().unwrap();
    assert_eq!(show_count(), 0);

    rt.initialize();
    rt.run_until_idle().unwrap();
    assert_eq!(show_count(), 1);
}
