//! Integration tests for growth logging
//!
//! These tests verify what a growth run reports through a custom logger.
//!
//! Run with: cargo test --test logging_integration_tests

use selection_growth::glam::Vec3;
use selection_growth::growth::log::{self, Logger, LogEntry, LogSeverity};
use selection_growth::growth::scene::{Scene, SceneInstanceDesc};
use selection_growth::growth::{GrowConstraintConfig, SelectionSet};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn three_in_a_row() -> Scene {
    let mut scene = Scene::new();
    let first = scene.create_instance(SceneInstanceDesc::mesh("a", Vec3::ZERO));
    scene.create_instance(SceneInstanceDesc::mesh("b", Vec3::X * 1.05));
    scene.create_instance(SceneInstanceDesc::mesh("c", Vec3::X * 2.1));
    scene.set_selection([first].into_iter().collect::<SelectionSet>());
    scene
}

fn from_grower(entries: &[LogEntry]) -> Vec<LogEntry> {
    entries
        .iter()
        .filter(|entry| entry.source == "growth::SelectionGrower")
        .cloned()
        .collect()
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_grow_logs_start_and_completion() {
    let (logger, entries) = TestLogger::new();
    log::set_logger(logger);
    log::set_min_severity(LogSeverity::Debug);

    let mut scene = three_in_a_row();
    let outcome = scene.grow_selection(&GrowConstraintConfig::default(), None).unwrap();

    log::reset_logger();

    assert_eq!(outcome.grown_by(), 2);
    let grower = from_grower(&entries.lock().unwrap());
    assert!(grower.iter().any(|e| e.severity == LogSeverity::Debug && e.message.starts_with("Growing 1 seed")));
    let completion = grower.iter().find(|e| e.severity == LogSeverity::Info).unwrap();
    assert!(completion.message.starts_with("Grew by 2"));
}

#[test]
#[serial]
fn test_integration_trace_reports_passes() {
    let (logger, entries) = TestLogger::new();
    log::set_logger(logger);
    log::set_min_severity(LogSeverity::Trace);

    let mut scene = three_in_a_row();
    scene.grow_selection(&GrowConstraintConfig::default(), None).unwrap();

    log::reset_logger();

    let grower = from_grower(&entries.lock().unwrap());
    let passes = grower.iter().filter(|e| e.message.starts_with("Pass ")).count();
    assert_eq!(passes, 3);
}

#[test]
#[serial]
fn test_integration_default_threshold_hides_debug() {
    let (logger, entries) = TestLogger::new();
    log::set_logger(logger);

    let mut scene = three_in_a_row();
    scene.grow_selection(&GrowConstraintConfig::default(), None).unwrap();

    log::reset_logger();

    let grower = from_grower(&entries.lock().unwrap());
    assert_eq!(grower.len(), 1);
    assert_eq!(grower[0].severity, LogSeverity::Info);
}

#[test]
#[serial]
fn test_integration_refusal_logs_warning() {
    let (logger, entries) = TestLogger::new();
    log::set_logger(logger);

    let mut scene = three_in_a_row();
    scene.begin_transform_session();
    let outcome = scene.grow_selection(&GrowConstraintConfig::default(), None).unwrap();

    log::reset_logger();

    assert!(outcome.is_refused());
    let grower = from_grower(&entries.lock().unwrap());
    assert_eq!(grower.len(), 1);
    assert_eq!(grower[0].severity, LogSeverity::Warn);
    assert!(grower[0].message.contains("transform session"));
}

#[test]
#[serial]
fn test_integration_invalid_config_logs_error_with_location() {
    let (logger, entries) = TestLogger::new();
    log::set_logger(logger);

    let mut scene = three_in_a_row();
    let config = GrowConstraintConfig::default().with_max_count(0);
    assert!(scene.grow_selection(&config, None).is_err());

    log::reset_logger();

    let entries = entries.lock().unwrap();
    let error = entries
        .iter()
        .find(|e| e.source == "growth::GrowConstraintConfig")
        .unwrap();
    assert_eq!(error.severity, LogSeverity::Error);
    assert!(error.message.contains("max count"));
    assert!(error.file.is_some());
    assert!(error.line.is_some());
}
