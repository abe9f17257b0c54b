//! Integration Tests for Hot Reload
//!
//! These tests drive the graph through `HotReloader` the way the dev server
//! does: re-parses go through `cook`, changes through `on_file_event`.

use std::sync::Arc;

use parking_lot::Mutex;

use cascade_core::graph::{Boundary, DeclineReason, Propagation};
use cascade_core::reload::UpdateInstruction;
use cascade_core::{FileEvent, FileEventKind, HotReloadConfig, HotReloader, ReloadMessage, ResourceUpdate};

const ROOT: &str = "http://localhost:3456/";

fn url(path: &str) -> String {
    format!("{ROOT}{path}")
}

fn reloader() -> HotReloader {
    HotReloader::new(HotReloadConfig::with_root_url(ROOT)).unwrap()
}

fn propagate(reloader: &HotReloader, path: &str) -> Propagation {
    reloader.graph().propagate_url(&url(path)).unwrap()
}

/// A self-accepting module is its own boundary.
#[test]
fn self_accepting_module_hot_reloads() {
    let reloader = reloader();
    reloader.cook(&url("a.html"), ResourceUpdate::new().kind("html").dependencies([url("b.js")]));
    reloader.cook(&url("b.js"), ResourceUpdate::new().kind("js_module").self_accepts_update(true));

    assert_eq!(
        propagate(&reloader, "b.js"),
        Propagation::Accepted {
            boundaries: vec![Boundary::new(url("b.js"), url("b.js"))]
        }
    );

    let message = reloader.on_file_event(&FileEvent::modified(url("b.js"))).unwrap();
    assert_eq!(
        message,
        ReloadMessage::HotReload {
            cause: "b.js modified".into(),
            updates: vec![UpdateInstruction {
                kind: "js_module".into(),
                boundary: "b.js".into(),
                accepted_by: "b.js".into(),
            }],
        }
    );
}

/// Nothing accepting the update along the only path means a full reload.
#[test]
fn unaccepted_update_is_a_full_reload() {
    let reloader = reloader();
    reloader.cook(&url("c.js"), ResourceUpdate::new().kind("js_module").dependencies([url("d.js")]));

    assert_eq!(
        propagate(&reloader, "d.js").decline_reason(),
        Some(DeclineReason::NothingAccepts)
    );

    let message = reloader.on_file_event(&FileEvent::modified(url("d.js"))).unwrap();
    assert!(message.is_full_reload());
}

/// A dependent accepting a specific dependency is the boundary for it.
#[test]
fn accepted_dependency_hot_reloads() {
    let reloader = reloader();
    reloader.cook(
        &url("e.js"),
        ResourceUpdate::new()
            .kind("js_module")
            .dependencies([url("f.js")])
            .accepts_dependencies([url("f.js")]),
    );

    assert_eq!(
        propagate(&reloader, "f.js").boundaries(),
        &[Boundary::new(url("e.js"), url("f.js"))]
    );

    let message = reloader.on_file_event(&FileEvent::modified(url("f.js"))).unwrap();
    assert_eq!(
        message,
        ReloadMessage::HotReload {
            cause: "f.js modified".into(),
            updates: vec![UpdateInstruction {
                kind: "js_module".into(),
                boundary: "e.js".into(),
                accepted_by: "f.js".into(),
            }],
        }
    );
}

/// A cycle with no acceptor terminates with a circular dependency decline.
#[test]
fn cycle_without_acceptor_is_declined() {
    let reloader = reloader();
    reloader.cook(&url("g.js"), ResourceUpdate::new().dependencies([url("h.js")]));
    reloader.cook(&url("h.js"), ResourceUpdate::new().dependencies([url("g.js")]));

    let message = reloader.on_file_event(&FileEvent::modified(url("g.js"))).unwrap();
    match message {
        ReloadMessage::FullReload { reason, .. } => assert!(reason.contains("circular dependency")),
        other => panic!("expected full reload, got {other:?}"),
    }
}

/// Dropping the only reference to a file reports it as pruned.
#[test]
fn dropped_reference_is_pruned() {
    let reloader = reloader();
    reloader.cook(&url("main.css"), ResourceUpdate::new().kind("css").dependencies([url("reset.css")]));

    let pruned = reloader
        .graph()
        .reconcile(&url("main.css"), ResourceUpdate::new().dependencies(Vec::<String>::new()));

    assert_eq!(pruned, vec![url("reset.css")]);
}

/// A declining dependent wins over a self-accepting sibling.
#[test]
fn declining_dependent_beats_accepting_sibling() {
    let reloader = reloader();
    reloader.cook(&url("k.js"), ResourceUpdate::new().self_accepts_update(true).dependencies([url("i.js")]));
    reloader.cook(&url("j.js"), ResourceUpdate::new().declines_hot_update(true).dependencies([url("i.js")]));

    assert_eq!(
        propagate(&reloader, "i.js"),
        Propagation::Declined {
            reason: DeclineReason::DependentDeclines,
            declined_by: Some(url("j.js")),
        }
    );

    let message = reloader.on_file_event(&FileEvent::modified(url("i.js"))).unwrap();
    assert_eq!(
        message,
        ReloadMessage::FullReload {
            cause: "i.js modified".into(),
            reason: "a dependent file declines hot reload".into(),
            declined_by: Some("j.js".into()),
        }
    );
}

/// The full dev server flow: page, stylesheet, modules, edits and prunes.
#[test]
fn dev_server_session() {
    let reloader = reloader();
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    reloader.subscribe(move |message| sink.lock().push(message.clone()));

    reloader.cook(
        &url("index.html"),
        ResourceUpdate::new()
            .kind("html")
            .dependencies([url("main.css"), url("app.js")]),
    );
    reloader.cook(
        &url("main.css"),
        ResourceUpdate::new()
            .kind("css")
            .self_accepts_update(true)
            .dependencies([url("theme.css")]),
    );
    reloader.cook(
        &url("app.js"),
        ResourceUpdate::new()
            .kind("js_module")
            .dependencies([url("util.js")])
            .accepts_dependencies([url("util.js")]),
    );
    assert!(received.lock().is_empty());

    // Editing a stylesheet imported by a self-accepting stylesheet.
    let message = reloader.on_file_event(&FileEvent::modified(url("theme.css"))).unwrap();
    assert_eq!(message.kind(), "hot_reload");

    // Editing app.js itself: nothing accepts it, the page reloads.
    let message = reloader.on_file_event(&FileEvent::modified(url("app.js"))).unwrap();
    assert!(message.is_full_reload());

    // main.css stops importing theme.css; main.css self-accepts so it is a prune.
    let message = reloader
        .cook(&url("main.css"), ResourceUpdate::new().dependencies(Vec::<String>::new()))
        .unwrap();
    assert_eq!(
        message,
        ReloadMessage::HotReload {
            cause: "following files are no longer referenced: theme.css".into(),
            updates: vec![UpdateInstruction {
                kind: "prune".into(),
                boundary: "theme.css".into(),
                accepted_by: "main.css".into(),
            }],
        }
    );

    // A change to a file nobody ever served is ignored.
    assert!(reloader
        .on_file_event(&FileEvent::new(url("new.js"), FileEventKind::Added))
        .is_none());

    assert_eq!(received.lock().len(), 3);

    let snapshot = reloader.graph().read().inspect();
    assert_eq!(snapshot[&url("index.html")].dependencies, vec![url("main.css"), url("app.js")]);
    assert!(snapshot[&url("theme.css")].dependents.is_empty());
}
