use super::{Board, DemoSpec};

pub fn trap_baremetal() -> DemoSpec {
    let mut demo = DemoSpec::new("trap_baremetal");
    demo.public_defs = vec![
        "D_BARE_METAL".into(),
        "D_TICK_TIME_MS=4".into(),
        "D_ISR_STACK_SIZE=400".into(),
    ];
    demo.sconscripts = vec!["demo_trap_baremetal".into()];
    demo.targets = vec![Board::Eh1, Board::Eh2, Board::El2, Board::Hifive1];
    demo
}
