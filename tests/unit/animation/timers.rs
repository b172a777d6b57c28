use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Label {
    A,
    B,
}

#[test]
fn fresh_set_is_unarmed() {
    let t = TimerSet::new([Label::A, Label::B]);
    assert!(!t.is_armed(Label::A));
    assert_eq!(t.elapsed_since(Label::B, TickIndex(10)), None);
    assert!(!t.has_elapsed(Label::A, 0, TickIndex(10)));
    assert_eq!(t.labels().collect::<Vec<_>>(), vec![Label::A, Label::B]);
}

#[test]
fn arm_is_idempotent() {
    let mut t = TimerSet::new([Label::A]);
    assert_eq!(t.arm(Label::A, TickIndex(5)), TickIndex(5));
    assert_eq!(t.arm(Label::A, TickIndex(9)), TickIndex(5));
    assert_eq!(t.armed_at(Label::A), Some(TickIndex(5)));
    assert_eq!(t.elapsed_since(Label::A, TickIndex(9)), Some(4));
}

#[test]
fn has_elapsed_gates_staggered_reveals() {
    let mut t = TimerSet::new([Label::A, Label::B]);
    t.arm(Label::A, TickIndex(100));
    assert!(!t.has_elapsed(Label::A, 60, TickIndex(159)));
    assert!(t.has_elapsed(Label::A, 60, TickIndex(160)));
    assert!(!t.has_elapsed(Label::B, 60, TickIndex(1000)));
}
