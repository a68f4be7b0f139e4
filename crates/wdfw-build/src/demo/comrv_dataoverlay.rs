use std::path::Path;

use super::{Board, ComrvLayout, DemoSpec};

const LAYOUT: ComrvLayout = ComrvLayout {
    cache_size: 1536,
    cache_alignment: 512,
    overlay_storage_size: 2048,
};

/// Overlay engine demo with overlay data support enabled.
pub fn comrv_dataoverlay() -> DemoSpec {
    let grouping_file = Path::new("..").join("comrv-dataoverlay.csv");

    let mut demo = DemoSpec::new("comrv_dataoverlay");
    demo.comrv = Some(LAYOUT);
    demo.public_defs = [
        "D_BARE_METAL",
        "D_TICK_TIME_MS=4",
        "D_ISR_STACK_SIZE=400",
        "D_COMRV_ENABLE_ERROR_NOTIFICATIONS",
        "D_COMRV_MIN_GROUP_SIZE_IN_BYTES=512",
        "D_COMRV_MAX_GROUP_SIZE_IN_BYTES=4096",
        "D_COMRV_MAX_CALL_STACK_DEPTH=10",
    ]
    .into_iter()
    .map(String::from)
    .chain([
        format!("D_COMRV_MAX_OVL_CACHE_SIZE_IN_BYTES={}", LAYOUT.cache_size),
        "D_COMRV_ENABLE_OVL_DATA_SUPPORT".to_string(),
        "D_COMRV_ENABLE_CODE_SIZE".to_string(),
    ])
    .collect();
    demo.sconscripts = vec!["comrv".into(), "demo_comrv_dataoverlay".into()];
    // Enables clang's overlay function/data support.
    demo.c_flags = vec!["-moverlay".into()];
    demo.linker_flags = std::iter::once(format!(
        "-Wl,--grouping-file={}",
        grouping_file.display()
    ))
    .chain(LAYOUT.linker_defsyms())
    .collect();
    demo.grouping_file = Some(grouping_file);
    demo.targets = vec![Board::Eh1, Board::Eh2, Board::El2, Board::Hifive1];
    demo
}
