use std::path::PathBuf;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tempfile::TempDir;

use super::debouncer::{ChangeKind, Debouncer, is_temp_file};
use super::roots::WatchRoots;
use super::{rebuild, relevant_changes};
use crate::config::{Config, SourceConfig};
use crate::utils::path::normalize_path;

const SHORT: Duration = Duration::from_millis(20);

fn make_debouncer() -> Debouncer {
    Debouncer::new(Duration::from_millis(300), Duration::from_millis(800))
}

fn make_config() -> (TempDir, Config) {
    let temp = TempDir::new().unwrap();
    let mut config = Config {
        root: normalize_path(temp.path()),
        ..Config::default()
    };
    config.finalize();
    std::fs::create_dir_all(&config.source.dir).unwrap();
    (temp, config)
}

fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

fn metadata_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
        notify::event::MetadataKind::WriteTime,
    ))
}

#[test]
fn test_debouncer_empty() {
    let debouncer = make_debouncer();
    assert!(!debouncer.is_ready());
    assert_eq!(debouncer.sleep_duration(), Duration::from_secs(86400));
}

#[test]
fn test_event_routing_by_kind() {
    let mut debouncer = make_debouncer();

    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], create_kind()));
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/b.scss"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/c.scss"], remove_kind()));

    assert_eq!(debouncer.changes.len(), 3);
    assert_eq!(
        debouncer.changes[&PathBuf::from("/ampcss/_sass/a.scss")],
        ChangeKind::Created
    );
    assert_eq!(
        debouncer.changes[&PathBuf::from("/ampcss/_sass/b.scss")],
        ChangeKind::Modified
    );
    assert_eq!(
        debouncer.changes[&PathBuf::from("/ampcss/_sass/c.scss")],
        ChangeKind::Removed
    );
}

#[test]
fn test_metadata_events_ignored() {
    let mut debouncer = make_debouncer();
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], metadata_kind()));
    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_event.is_none());
}

#[test]
fn test_temp_file_ignored() {
    let mut debouncer = make_debouncer();

    debouncer.add_event(&make_event(vec!["/ampcss/_sass/site.scss"], modify_kind()));
    let first_time = debouncer.last_event.unwrap();

    std::thread::sleep(Duration::from_millis(5));

    debouncer.add_event(&make_event(vec!["/ampcss/_sass/.site.scss.swp"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/site.scss~"], modify_kind()));
    assert_eq!(debouncer.last_event.unwrap(), first_time);
    assert_eq!(debouncer.changes.len(), 1);
}

#[test]
fn test_is_temp_file() {
    assert!(is_temp_file(&PathBuf::from("_sass/site.scss.bak")));
    assert!(is_temp_file(&PathBuf::from("_sass/4913.tmp")));
    assert!(is_temp_file(&PathBuf::from("_sass/.#site.scss")));
    assert!(!is_temp_file(&PathBuf::from("_sass/_variables.scss")));
}

#[test]
fn test_dedup_first_event_wins() {
    let mut debouncer = make_debouncer();

    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], create_kind()));
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], modify_kind()));

    assert_eq!(debouncer.changes.len(), 1);
    assert_eq!(
        debouncer.changes[&PathBuf::from("/ampcss/_sass/a.scss")],
        ChangeKind::Created
    );
}

#[test]
fn test_dedup_same_event() {
    let mut debouncer = make_debouncer();
    debouncer.add_event(&make_event(
        vec!["/ampcss/_sass/a.scss", "/ampcss/_sass/a.scss"],
        modify_kind(),
    ));
    assert_eq!(debouncer.changes.len(), 1);
}

#[test]
fn test_remove_then_create_is_restore() {
    let mut debouncer = make_debouncer();
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], remove_kind()));
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], create_kind()));
    assert_eq!(
        debouncer.changes[&PathBuf::from("/ampcss/_sass/a.scss")],
        ChangeKind::Created
    );
}

#[test]
fn test_modify_then_remove_is_remove() {
    let mut debouncer = make_debouncer();
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], remove_kind()));
    assert_eq!(
        debouncer.changes[&PathBuf::from("/ampcss/_sass/a.scss")],
        ChangeKind::Removed
    );
}

#[test]
fn test_create_then_remove_is_discarded() {
    let mut debouncer = Debouncer::new(SHORT, Duration::ZERO);
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], create_kind()));
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], remove_kind()));

    assert!(debouncer.changes.is_empty());
    std::thread::sleep(SHORT * 2);
    assert!(debouncer.take_if_ready().is_none());
    // nothing pending, so the loop goes back to idle waiting
    assert_eq!(debouncer.sleep_duration(), Duration::from_secs(86400));
}

#[test]
fn test_ready_after_debounce() {
    let mut debouncer = Debouncer::new(SHORT, Duration::ZERO);
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], modify_kind()));

    assert!(!debouncer.is_ready());
    assert!(debouncer.sleep_duration() <= SHORT);

    std::thread::sleep(SHORT * 2);
    let changes = debouncer.take_if_ready().unwrap();
    assert_eq!(changes.len(), 1);
    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_event.is_none());
    assert!(debouncer.last_build.is_some());
}

#[test]
fn test_cooldown_delays_next_build() {
    let mut debouncer = Debouncer::new(Duration::from_millis(1), Duration::from_secs(60));
    debouncer.add_event(&make_event(vec!["/ampcss/_sass/a.scss"], modify_kind()));
    std::thread::sleep(Duration::from_millis(10));
    assert!(debouncer.take_if_ready().is_some());

    debouncer.add_event(&make_event(vec!["/ampcss/_sass/b.scss"], modify_kind()));
    std::thread::sleep(Duration::from_millis(10));
    assert!(!debouncer.is_ready());
    assert!(debouncer.sleep_duration() > Duration::from_secs(50));
}

#[test]
fn test_relevant_changes_filters_extensions() {
    let source = SourceConfig::default();
    let mut changes = FxHashMap::default();
    changes.insert(PathBuf::from("/s/_sass/site.scss"), ChangeKind::Modified);
    changes.insert(PathBuf::from("/s/_sass/_mixins.SASS"), ChangeKind::Created);
    changes.insert(PathBuf::from("/s/_sass/notes.md"), ChangeKind::Modified);
    changes.insert(PathBuf::from("/s/_sass/img"), ChangeKind::Removed);

    assert_eq!(
        relevant_changes(changes, &source),
        vec![
            PathBuf::from("/s/_sass/_mixins.SASS"),
            PathBuf::from("/s/_sass/site.scss"),
        ]
    );
}

#[test]
fn test_watch_roots_reattach() {
    let temp = TempDir::new().unwrap();
    let present = temp.path().join("_sass");
    let later = temp.path().join("vendor");
    std::fs::create_dir_all(&present).unwrap();

    let mut watcher =
        notify::recommended_watcher(|_: notify::Result<notify::Event>| {}).unwrap();
    let mut roots = WatchRoots::new(vec![present.clone(), later.clone()]);
    roots.attach_existing(&mut watcher).unwrap();
    assert!(roots.is_attached(&present));
    assert!(!roots.is_attached(&later));

    std::fs::create_dir_all(&later).unwrap();
    assert_eq!(roots.maintain(&mut watcher), vec![later.clone()]);
    assert!(roots.is_attached(&later));
    assert!(roots.maintain(&mut watcher).is_empty());

    std::fs::remove_dir_all(&present).unwrap();
    assert!(roots.maintain(&mut watcher).is_empty());
    assert!(!roots.is_attached(&present));

    std::fs::create_dir_all(&present).unwrap();
    assert_eq!(roots.maintain(&mut watcher), vec![present.clone()]);
}

#[test]
fn test_failed_rebuild_keeps_previous_output() {
    let (_temp, config) = make_config();
    let entry = config.source.dir.join("site.scss");
    std::fs::write(&entry, "a { color: red !important; }").unwrap();

    rebuild(&config, &[]);
    let site = std::fs::read(config.output.dir.join("site.css")).unwrap();
    let amp = std::fs::read(config.output.dir.join("amp.css")).unwrap();

    std::fs::write(&entry, "a { color: $missing; ").unwrap();
    rebuild(&config, &[entry.clone()]);

    assert_eq!(std::fs::read(config.output.dir.join("site.css")).unwrap(), site);
    assert_eq!(std::fs::read(config.output.dir.join("amp.css")).unwrap(), amp);

    // the next good build goes through again
    std::fs::write(&entry, "a { color: blue; }").unwrap();
    rebuild(&config, &[entry]);
    let site = std::fs::read_to_string(config.output.dir.join("site.css")).unwrap();
    assert!(site.contains("blue"));
}
