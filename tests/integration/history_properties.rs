// =====
// TESTS: 8
// =====
//
// History property tests.
// Drives the edit/history controller through timed edit sequences.

use markedit::app::EditController;
use markedit::config::EditorSettings;
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

use crate::helpers::{DEBOUNCE, controller};

/// Deterministic pseudo-random edit script (xorshift), so failures reproduce.
fn edit_script(seed: u64, steps: usize) -> Vec<(String, bool)> {
    let mut state = seed.max(1);
    let mut text = String::new();
    (0..steps)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            if state % 5 == 0 && !text.is_empty() {
                text.pop();
            } else {
                text.push(char::from(b'a' + u8::try_from(state % 26).unwrap()));
            }
            (text.clone(), state % 3 == 0)
        })
        .collect()
}

/// Apply a script; `true` entries are followed by a pause long enough to commit.
fn run_script(ed: &mut EditController, script: &[(String, bool)]) -> Instant {
    let mut now = Instant::now();
    for (text, pause) in script {
        ed.on_edit(text, now);
        now += if *pause { DEBOUNCE } else { Duration::from_millis(100) };
        ed.poll(now);
    }
    now
}

#[test]
fn undo_until_exhausted_reaches_first_snapshot() {
    for seed in 1..20 {
        let mut ed = controller("seed");
        run_script(&mut ed, &edit_script(seed, 15));
        while ed.undo() {}
        assert_eq!(ed.text(), "seed", "seed {seed}");
    }
}

#[test]
fn undo_until_exhausted_after_overflow_reaches_oldest_retained() {
    let mut ed = controller("");
    let script = edit_script(7, 200);
    run_script(&mut ed, &script);
    ed.flush();
    let len = ed.history().len();
    assert_eq!(len, 20);
    let mut undos = 0;
    while ed.undo() {
        undos += 1;
    }
    assert_eq!(undos, len - 1);
}

#[test]
fn redo_after_undo_restores_pre_undo_text() {
    for seed in 1..20 {
        let mut ed = controller("");
        run_script(&mut ed, &edit_script(seed, 12));
        let before = ed.text();
        if ed.undo() {
            assert!(ed.redo());
        }
        assert_eq!(ed.text(), before, "seed {seed}");
    }
}

#[test]
fn edit_after_undo_discards_redo_tail() {
    let t0 = Instant::now();
    let mut ed = controller("a");
    ed.on_edit("ab", t0);
    ed.poll(t0 + DEBOUNCE);
    ed.on_edit("abc", t0 + DEBOUNCE * 2);
    ed.poll(t0 + DEBOUNCE * 3);

    ed.undo();
    ed.on_edit("X", t0 + DEBOUNCE * 4);
    ed.redo();
    assert_eq!(ed.text(), "X");
    ed.undo();
    assert_eq!(ed.text(), "ab");
}

#[test]
fn history_length_never_exceeds_capacity() {
    for capacity in [1, 2, 5, 20] {
        let settings = EditorSettings { debounce: DEBOUNCE, history_capacity: capacity };
        let mut ed = EditController::new("", &settings);
        let mut now = Instant::now();
        for (i, (text, _)) in edit_script(3, 100).into_iter().enumerate() {
            ed.on_edit(&text, now);
            now += DEBOUNCE;
            ed.poll(now);
            if i % 7 == 0 {
                ed.undo();
            }
            assert!(ed.history().len() <= capacity);
            let (pos, len) = ed.history_position();
            assert!(pos >= 1 && pos <= len);
        }
    }
}

#[test]
fn rapid_burst_produces_one_entry() {
    let mut ed = controller("");
    let mut now = Instant::now();
    for i in 1..=30 {
        ed.on_edit(&"x".repeat(i), now);
        now += Duration::from_millis(50);
        ed.poll(now);
    }
    assert_eq!(ed.history().len(), 1);
    ed.poll(now + DEBOUNCE);
    assert_eq!(ed.history().len(), 2);
    assert_eq!(ed.history().current().text, "x".repeat(30));
}

#[test]
fn buffer_matches_history_after_every_undo_and_redo() {
    let mut ed = controller("");
    run_script(&mut ed, &edit_script(11, 40));
    while ed.undo() {
        assert_eq!(ed.text(), ed.history().current().text);
    }
    while ed.redo() {
        assert_eq!(ed.text(), ed.history().current().text);
    }
}

#[test]
fn worked_example() {
    let t0 = Instant::now();
    let mut ed = controller("a");
    ed.on_edit("ab", t0);
    ed.poll(t0 + DEBOUNCE);
    ed.on_edit("abc", t0 + DEBOUNCE * 2);
    ed.poll(t0 + DEBOUNCE * 3);
    ed.undo();
    assert_eq!(ed.text(), "ab");
    ed.undo();
    assert_eq!(ed.text(), "a");
    ed.redo();
    assert_eq!(ed.text(), "ab");
}
