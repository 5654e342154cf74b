/*!
 * Integration tests for the archive translation pipeline
 */

use std::fs;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use rwmodtrans::app_config::MergeMode;
use rwmodtrans::pipeline::{process_tree, translate_archive, TranslationRequest};
use rwmodtrans::archive::{extract_archive, pack_archive};
use rwmodtrans::providers::mock::MockBackend;

use crate::common;

fn request() -> TranslationRequest {
    TranslationRequest {
        source_language: "en".to_string(),
        target_language: "fr".to_string(),
        mode: MergeMode::Add,
    }
}

/// Test a full archive round trip: qualifying files are rewritten,
/// everything else passes through byte-identical
#[tokio::test]
async fn test_translate_archive_withMixedContent_shouldRewriteOnlyConfigFiles() {
    let source = common::create_temp_dir().unwrap();
    common::create_test_file(source.path(), "units/tank.ini", "[attack]\ntitle: Heavy Cannon")
        .unwrap();
    common::create_test_file(source.path(), "img/icon.png", "fake-png-bytes").unwrap();
    common::create_test_file(source.path(), "notes.md", "# design notes").unwrap();

    let mut input = Cursor::new(Vec::new());
    pack_archive(source.path(), &mut input).unwrap();
    input.set_position(0);

    let (service, _tracker) = common::mock_service();
    let mut output = Cursor::new(Vec::new());
    let report = translate_archive(input, &mut output, &service, &request(), 2, Box::new(|_, _| {}))
        .await
        .unwrap();

    assert_eq!(report.total_files, 1);
    assert_eq!(report.processed_files, 1);
    assert_eq!(report.failed_files, 0);
    assert_eq!(report.translated_fields, 1);

    let dest = common::create_temp_dir().unwrap();
    output.set_position(0);
    extract_archive(output, dest.path()).unwrap();

    let rewritten = fs::read_to_string(dest.path().join("units/tank.ini")).unwrap();
    assert!(rewritten.contains("title: Heavy Cannon"));
    assert!(rewritten.contains("title_fr: [fr] Heavy Cannon"));

    assert_eq!(
        fs::read(dest.path().join("img/icon.png")).unwrap(),
        b"fake-png-bytes"
    );
    assert_eq!(
        fs::read(dest.path().join("notes.md")).unwrap(),
        b"# design notes"
    );
}

/// Test an archive with no qualifying files survives untouched
#[tokio::test]
async fn test_translate_archive_withNoConfigFiles_shouldPassThrough() {
    let source = common::create_temp_dir().unwrap();
    common::create_test_file(source.path(), "img/icon.png", "fake-png-bytes").unwrap();
    common::create_test_file(source.path(), "sound/shot.ogg", "fake-ogg-bytes").unwrap();

    let mut input = Cursor::new(Vec::new());
    pack_archive(source.path(), &mut input).unwrap();
    input.set_position(0);

    let (service, tracker) = common::mock_service();
    let mut output = Cursor::new(Vec::new());
    let report = translate_archive(input, &mut output, &service, &request(), 2, Box::new(|_, _| {}))
        .await
        .unwrap();

    assert_eq!(report.total_files, 0);
    assert!(tracker.lock().unwrap().requests.is_empty());

    let dest = common::create_temp_dir().unwrap();
    output.set_position(0);
    extract_archive(output, dest.path()).unwrap();
    assert_eq!(
        fs::read(dest.path().join("img/icon.png")).unwrap(),
        b"fake-png-bytes"
    );
    assert_eq!(
        fs::read(dest.path().join("sound/shot.ogg")).unwrap(),
        b"fake-ogg-bytes"
    );
}

/// Test concurrent completions deliver serialized, non-decreasing
/// progress updates ending at (total, total)
#[tokio::test]
async fn test_process_tree_withConcurrentWorkers_shouldReportMonotonicProgress() {
    let root = common::create_temp_dir().unwrap();
    for index in 0..8 {
        common::create_test_unit_config(root.path(), &format!("unit_{}.ini", index)).unwrap();
    }

    let updates: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let recorder = updates.clone();
    let progress = Box::new(move |completed: usize, total: usize| {
        recorder.lock().unwrap().push((completed, total));
    });

    let (service, _tracker) = common::mock_service();
    let report = process_tree(root.path(), &service, &request(), 4, progress)
        .await
        .unwrap();

    assert_eq!(report.total_files, 8);
    assert_eq!(report.processed_files, 8);

    let updates = updates.lock().unwrap();
    assert_eq!(updates.len(), 8);
    assert_eq!(*updates.last().unwrap(), (8, 8));
    for pair in updates.windows(2) {
        assert!(pair[0].0 < pair[1].0, "progress went backwards: {:?}", updates);
    }
    assert!(updates.iter().all(|(_, total)| *total == 8));
}

/// Test a failing backend records field failures without failing the batch
#[tokio::test]
async fn test_translate_archive_withFailingBackend_shouldRecordFailuresPerField() {
    let source = common::create_temp_dir().unwrap();
    common::create_test_file(source.path(), "a.ini", "title: Alpha").unwrap();
    common::create_test_file(source.path(), "b.ini", "title: Beta").unwrap();

    let mut input = Cursor::new(Vec::new());
    pack_archive(source.path(), &mut input).unwrap();
    input.set_position(0);

    let (service, _tracker) = common::mock_service_with_backend(MockBackend::failing(100));
    let mut output = Cursor::new(Vec::new());
    let report = translate_archive(input, &mut output, &service, &request(), 2, Box::new(|_, _| {}))
        .await
        .unwrap();

    assert_eq!(report.total_files, 2);
    assert_eq!(report.processed_files, 2);
    assert_eq!(report.failed_files, 0);
    assert_eq!(report.translated_fields, 0);
    assert_eq!(report.field_failures(), 2);

    // Original lines survive in the repacked archive
    let dest = common::create_temp_dir().unwrap();
    output.set_position(0);
    extract_archive(output, dest.path()).unwrap();
    assert_eq!(
        fs::read_to_string(dest.path().join("a.ini")).unwrap(),
        "title: Alpha"
    );
}
