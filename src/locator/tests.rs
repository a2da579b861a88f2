use super::*;

/// Two-detector report laid out the way LabSolutions exports it
const TWO_DETECTOR_REPORT: &str = "[Header]
Application Name\tLabSolutions
Version\t5.97
[LC Chromatogram(Detector A-Ch1)]
Interval(msec)\t500
# of Points\t3
Start Time(min)\t0.000
End Time(min)\t0.300
Intensity Units\tmAU
Intensity Multiplier\t0.001
R.Time (min)\tIntensity
0.1\t10
0.2\t20
0.3\t30
[LC Chromatogram(Detector B-Ch1)]
Interval(msec)\t500
# of Points\t2
Start Time(min)\t0.000
R.Time (min)\tIntensity
0.5\t1
0.6\t2
";

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[test]
fn test_locate_uv_block() {
    let spec = locate(&lines(TWO_DETECTOR_REPORT), BlockKind::Uv).unwrap();
    assert_eq!(spec.kind, BlockKind::Uv);
    assert_eq!(spec.data_start_line, 10);
    assert_eq!(spec.point_count, 3);
}

#[test]
fn test_locate_fluorescence_block() {
    let spec = locate(&lines(TWO_DETECTOR_REPORT), BlockKind::Fluorescence).unwrap();
    assert_eq!(spec.data_start_line, 18);
    assert_eq!(spec.point_count, 2);
}

#[test]
fn test_scan_records_last_line() {
    let summary = BlockLocator::new()
        .scan(&lines(TWO_DETECTOR_REPORT))
        .unwrap();
    assert_eq!(summary.last_line, Some(20));
    assert!(summary.has_block(BlockKind::Uv));
    assert!(summary.has_block(BlockKind::Fluorescence));

    let empty: Vec<&str> = Vec::new();
    assert_eq!(BlockLocator::new().scan(&empty).unwrap().last_line, None);
}

#[test]
fn test_missing_header_is_block_not_found() {
    let report = "[LC Chromatogram(Detector A-Ch1)]
# of Points\t1
R.Time (min)\tIntensity
0.1\t1
";
    let err = locate(&lines(report), BlockKind::Fluorescence).unwrap_err();
    assert!(matches!(
        err,
        ParseError::BlockNotFound {
            kind: BlockKind::Fluorescence,
            reason: MissingMarker::Header
        }
    ));
}

#[test]
fn test_missing_column_header_is_block_not_found() {
    let report = "[LC Chromatogram(Detector A-Ch1)]
# of Points\t1
R.Time (min)\tIntensity
0.1\t1
[LC Chromatogram(Detector B-Ch1)]
# of Points\t1
";
    let err = locate(&lines(report), BlockKind::Fluorescence).unwrap_err();
    assert!(matches!(
        err,
        ParseError::BlockNotFound {
            reason: MissingMarker::ColumnHeader,
            ..
        }
    ));
    // The UV block is unaffected
    assert!(locate(&lines(report), BlockKind::Uv).is_ok());
}

#[test]
fn test_column_header_before_any_block_is_ignored() {
    let report = "R.Time (min)\tIntensity
[LC Chromatogram(Detector A-Ch1)]
# of Points\t1
R.Time (min)\tIntensity
0.1\t1
";
    let spec = locate(&lines(report), BlockKind::Uv).unwrap();
    assert_eq!(spec.data_start_line, 3);
}

#[test]
fn test_malformed_point_count() {
    let report = "[LC Chromatogram(Detector A-Ch1)]
# of Points\tmany
R.Time (min)\tIntensity
";
    let err = locate(&lines(report), BlockKind::Uv).unwrap_err();
    match err {
        ParseError::MalformedPointCount { line, content } => {
            assert_eq!(line, 2);
            assert_eq!(content, "# of Points\tmany");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_point_count_without_fourth_token() {
    let report = "[LC Chromatogram(Detector A-Ch1)]\n# of Points\n";
    let err = locate(&lines(report), BlockKind::Uv).unwrap_err();
    assert!(matches!(err, ParseError::MalformedPointCount { line: 2, .. }));
}

#[test]
fn test_negative_point_count_is_malformed() {
    let report = "[LC Chromatogram(Detector A-Ch1)]\n# of Points\t-4\n";
    let err = locate(&lines(report), BlockKind::Uv).unwrap_err();
    assert!(matches!(err, ParseError::MalformedPointCount { .. }));
}

/// Fluorescence section without its own point count
const FL_WITHOUT_COUNT: &str = "[LC Chromatogram(Detector A-Ch1)]
# of Points\t3
R.Time (min)\tIntensity
0.1\t10
0.2\t20
0.3\t30
[LC Chromatogram(Detector B-Ch1)]
R.Time (min)\tIntensity
0.1\t1
0.2\t2
0.3\t3
";

#[test]
fn test_per_block_mode_requires_own_point_count() {
    let err = locate(&lines(FL_WITHOUT_COUNT), BlockKind::Fluorescence).unwrap_err();
    assert!(matches!(
        err,
        ParseError::MissingPointCount {
            kind: BlockKind::Fluorescence
        }
    ));
}

#[test]
fn test_shared_mode_carries_point_count_over() {
    let locator = BlockLocator::new().with_point_count_mode(PointCountMode::Shared);
    let spec = locator
        .locate(&lines(FL_WITHOUT_COUNT), BlockKind::Fluorescence)
        .unwrap();
    assert_eq!(spec.point_count, 3);
    assert_eq!(spec.data_start_line, 7);
}

#[test]
fn test_shared_mode_uses_count_in_effect_at_column_header() {
    let report = "[LC Chromatogram(Detector A-Ch1)]
# of Points\t2
R.Time (min)\tIntensity
0.1\t10
0.2\t20
[LC Chromatogram(Detector B-Ch1)]
# of Points\t1
R.Time (min)\tIntensity
0.1\t1
";
    let locator = BlockLocator::new().with_point_count_mode(PointCountMode::Shared);
    assert_eq!(locator.locate(&lines(report), BlockKind::Uv).unwrap().point_count, 2);
    assert_eq!(
        locator
            .locate(&lines(report), BlockKind::Fluorescence)
            .unwrap()
            .point_count,
        1
    );
}

#[test]
fn test_point_count_outside_block_is_ignored_per_block() {
    let report = "[Header]
# of Points\t99
[LC Chromatogram(Detector A-Ch1)]
# of Points\t1
R.Time (min)\tIntensity
0.1\t1
[PDA Multi Chromatogram(Ch1)]
# of Points\t50
";
    let spec = locate(&lines(report), BlockKind::Uv).unwrap();
    assert_eq!(spec.point_count, 1);
}

#[test]
fn test_repeated_header_later_block_wins() {
    let report = "[LC Chromatogram(Detector A-Ch1)]
# of Points\t1
R.Time (min)\tIntensity
0.1\t1
[LC Chromatogram(Detector A-Ch1)]
# of Points\t2
R.Time (min)\tIntensity
0.1\t1
0.2\t2
";
    let spec = locate(&lines(report), BlockKind::Uv).unwrap();
    assert_eq!(spec.data_start_line, 6);
    assert_eq!(spec.point_count, 2);
}

#[test]
fn test_transition_priority() {
    // A header always wins over a column header on the same line
    let (state, event) = ScanState::AwaitingFlData.step(&format!("{UV_HEADER} {COLUMN_HEADER}"));
    assert_eq!(state, ScanState::AwaitingUvData);
    assert_eq!(event, Event::Header(BlockKind::Uv));

    // A pending UV block takes a column header before the fluorescence header is considered
    let (state, event) =
        ScanState::AwaitingUvData.step(&format!("{FL_HEADER} {COLUMN_HEADER}"));
    assert_eq!(state, ScanState::Idle);
    assert_eq!(event, Event::DataStart(BlockKind::Uv));

    // Point counts never change state
    let (state, event) = ScanState::AwaitingFlData.step("# of Points\t5");
    assert_eq!(state, ScanState::AwaitingFlData);
    assert_eq!(event, Event::PointCount);

    let (state, event) = ScanState::Idle.step(COLUMN_HEADER);
    assert_eq!(state, ScanState::Idle);
    assert_eq!(event, Event::Nothing);
}

#[test]
fn test_block_kind_from_str() {
    assert_eq!("uv".parse::<BlockKind>().unwrap(), BlockKind::Uv);
    assert_eq!(" FL ".parse::<BlockKind>().unwrap(), BlockKind::Fluorescence);
    assert_eq!(
        "fluorescence".parse::<BlockKind>().unwrap(),
        BlockKind::Fluorescence
    );
    assert!("pda".parse::<BlockKind>().is_err());
    assert_eq!(BlockKind::Uv.label_prefix(), "uv");
    assert_eq!(BlockKind::Fluorescence.header_marker(), FL_HEADER);
}
