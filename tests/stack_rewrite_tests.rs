//! Integration tests for the register → rewrite pipeline.
//!
//! These exercise `FragmentRegistry`, `locate_first_frame` and
//! `StackRewriter` together through the public API.

use std::sync::Arc;
use worklet_trace::{
    CapturedError, FragmentRecord, FragmentRegistry, ResolvedLocation, StackRewriter,
    locate_first_frame,
};

fn record(stack: &str, line_offset: i64, column_offset: i64) -> FragmentRecord {
    FragmentRecord::new(CapturedError::with_stack(stack), line_offset, column_offset)
}

// ---------------------------------------------------------------------------
// Frame location
// ---------------------------------------------------------------------------

#[test]
fn frame_without_at_sign_falls_back() {
    let error = CapturedError::with_stack("garbage text with no at sign");
    assert_eq!(
        locate_first_frame(&error),
        ResolvedLocation {
            file: "unknown".to_string(),
            line: 0,
            column: 0,
        }
    );
}

#[test]
fn frame_missing_stack_falls_back() {
    assert_eq!(
        locate_first_frame(&CapturedError::default()),
        ResolvedLocation::default()
    );
}

#[test]
fn frame_uses_first_line_only() {
    let error = CapturedError::with_stack("fn@a/b/c.js:55:9\nmore lines...");
    assert_eq!(
        locate_first_frame(&error),
        ResolvedLocation {
            file: "a/b/c.js".to_string(),
            line: 55,
            column: 9,
        }
    );
}

// ---------------------------------------------------------------------------
// Rewriting
// ---------------------------------------------------------------------------

#[test]
fn empty_registry_leaves_marker_unchanged() {
    let rewriter = StackRewriter::new(Arc::new(FragmentRegistry::new()));
    assert_eq!(
        rewriter.rewrite("at foo (worklet_7:3:4)"),
        "at foo (worklet_7:3:4)"
    );
}

#[test]
fn registered_marker_resolves_with_all_offsets() {
    let registry = Arc::new(FragmentRegistry::new());
    registry.register(7, record("myFn@bundle.js:100:10", 1, 2));
    let rewriter = StackRewriter::new(registry);

    assert_eq!(
        rewriter.rewrite("at foo (worklet_7:3:4)"),
        "at foo (bundle.js:104:16)"
    );
}

#[test]
fn offset_additivity_over_several_inputs() {
    let cases: &[(u64, u64, i64, i64, u64, u64)] = &[
        (100, 10, 1, 2, 3, 4),
        (1, 1, 0, 0, 0, 0),
        (500, 0, -3, 7, 12, 40),
        (0, 0, 0, 0, 999, 1),
    ];

    for &(bundle_line, bundle_col, line_offset, col_offset, origin_line, origin_col) in cases {
        let registry = Arc::new(FragmentRegistry::new());
        registry.register(
            1,
            record(
                &format!("f@src/app.js:{bundle_line}:{bundle_col}"),
                line_offset,
                col_offset,
            ),
        );
        let rewriter = StackRewriter::new(registry);

        let expected_line = origin_line as i64 + bundle_line as i64 + line_offset;
        let expected_col = origin_col as i64 + bundle_col as i64 + col_offset;
        assert_eq!(
            rewriter.rewrite(&format!("worklet_1:{origin_line}:{origin_col}")),
            format!("src/app.js:{expected_line}:{expected_col}")
        );
    }
}

#[test]
fn text_without_markers_is_identity() {
    let registry = Arc::new(FragmentRegistry::new());
    registry.register(1, record("f@a.js:1:1", 0, 0));
    let rewriter = StackRewriter::new(registry);

    for text in [
        "",
        "Error: boom",
        "at foo (bundle.js:1:2)\nat bar (native)",
        "worklet_1:2",
        "worklet-1:2:3",
        "WORKLET_1:2:3",
    ] {
        assert_eq!(rewriter.rewrite(text), text);
    }
}

#[test]
fn two_markers_resolve_independently() {
    let registry = Arc::new(FragmentRegistry::new());
    registry.register(1, record("f@one.js:10:1", 0, 0));
    registry.register(2, record("g@two.js:20:2", 0, 0));
    let rewriter = StackRewriter::new(registry);

    assert_eq!(
        rewriter.rewrite("at f (worklet_1:0:0)\nat g (worklet_2:0:0)"),
        "at f (one.js:10:1)\nat g (two.js:20:2)"
    );
}

#[test]
fn unresolved_marker_does_not_affect_neighbours() {
    let registry = Arc::new(FragmentRegistry::new());
    registry.register(1, record("f@one.js:10:1", 0, 0));
    registry.register(3, record("h@three.js:30:3", 0, 0));
    let rewriter = StackRewriter::new(registry);

    let summary = rewriter
        .rewrite_with_summary("at f (worklet_1:1:1)\nat g (worklet_2:5:5)\nat h (worklet_3:1:1)");
    assert_eq!(
        summary.text,
        "at f (one.js:11:2)\nat g (worklet_2:5:5)\nat h (three.js:31:4)"
    );
    assert_eq!(summary.resolved, 2);
    assert_eq!(summary.unresolved, 1);
}

#[test]
fn re_registration_changes_resolution() {
    let registry = Arc::new(FragmentRegistry::new());
    let rewriter = StackRewriter::new(Arc::clone(&registry));

    registry.register(5, record("f@old.js:1:1", 0, 0));
    registry.register(5, record("f@new.js:2:2", 0, 0));

    assert_eq!(rewriter.rewrite("worklet_5:0:0"), "new.js:2:2");
    assert_eq!(registry.lookup(5).unwrap().captured_error.stack.as_deref(), Some("f@new.js:2:2"));
}

#[test]
fn registration_after_rewriter_creation_is_visible() {
    let registry = Arc::new(FragmentRegistry::new());
    let rewriter = StackRewriter::new(Arc::clone(&registry));
    assert_eq!(rewriter.rewrite("worklet_9:1:1"), "worklet_9:1:1");

    registry.register(9, record("f@late.js:1:1", 0, 0));
    assert_eq!(rewriter.rewrite("worklet_9:1:1"), "late.js:2:2");
}

#[test]
fn concurrent_register_and_rewrite() {
    let registry = Arc::new(FragmentRegistry::new());
    let rewriter = Arc::new(StackRewriter::new(Arc::clone(&registry)));

    let writer = {
        let registry = Arc::clone(&registry);
        std::thread::spawn(move || {
            for id in 0..200u64 {
                registry.register(id, record("f@a.js:1:1", 0, 0));
            }
        })
    };
    let reader = {
        let rewriter = Arc::clone(&rewriter);
        std::thread::spawn(move || {
            for id in 0..200u64 {
                let out = rewriter.rewrite(&format!("worklet_{id}:0:0"));
                // Either still unregistered or fully resolved, never anything else
                assert!(out == format!("worklet_{id}:0:0") || out == "a.js:1:1");
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();

    assert_eq!(rewriter.rewrite("worklet_199:0:0"), "a.js:1:1");
}
