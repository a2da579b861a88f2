#![no_main]

use libfuzzer_sys::fuzz_target;
use lctrace::extractor::TableExtractor;
use lctrace::locator::{BlockKind, BlockLocator, PointCountMode};
use lctrace::report::ReportFile;

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must either parse or fail with an error, never panic
    let text = String::from_utf8_lossy(data);
    let report = ReportFile::from_text("01.txt", &text);
    let extractor = TableExtractor::default();

    for mode in [PointCountMode::PerBlock, PointCountMode::Shared] {
        let locator = BlockLocator::new().with_point_count_mode(mode);
        for kind in [BlockKind::Uv, BlockKind::Fluorescence] {
            if let Ok(spec) = locator.locate(report.lines(), kind) {
                let _ = extractor.extract(&report, &spec);
            }
        }
    }
});
