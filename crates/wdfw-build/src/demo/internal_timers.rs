use super::{Board, DemoSpec};

/// Core-internal timer demo.
pub fn internal_timers() -> DemoSpec {
    let mut demo = DemoSpec::new("internal_timers");
    demo.public_defs = vec!["D_TICK_TIME_MS=4".into(), "D_ISR_STACK_SIZE=400".into()];
    demo.sconscripts = vec!["demo_internal_timers".into()];
    // The HiFive1 core has no internal timers.
    demo.targets = vec![Board::Eh1, Board::El2, Board::Eh2];
    demo
}
