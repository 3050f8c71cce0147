//! Meta buffer against a real database.

mod support;

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use roverdb::config::Config;
use roverdb::service::MetaBuffer;
use roverdb::store::Database;
use support::temp_db::TempDb;

fn today_comments(db: &Database) -> i32 {
    db.select_day_from_meta(Utc::now().date_naive())
        .unwrap()
        .map_or(0, |meta| meta.seen_comments)
}

#[test]
fn dropping_the_buffer_persists_pending_counts() {
    let temp = TempDb::create();
    {
        let mut buffer = MetaBuffer::new(temp.db().clone());
        buffer.add_comments(3).unwrap();
        buffer.add_update_cycles(1).unwrap();
        assert_eq!(today_comments(temp.db()), 0);
    }
    let meta = temp
        .db()
        .select_day_from_meta(Utc::now().date_naive())
        .unwrap()
        .unwrap();
    assert_eq!(meta.seen_comments, 3);
    assert_eq!(meta.update_cycles, 1);
}

#[test]
fn forced_flush_writes_through() {
    let temp = TempDb::create();
    let mut buffer = MetaBuffer::new(temp.db().clone());
    buffer.record_seen("t1_cukvign").unwrap();
    buffer.record_seen("t1_cukvigo").unwrap();
    buffer.record_seen("t3_3i0lgl").unwrap();
    buffer.flush(true).unwrap();

    let meta = temp
        .db()
        .select_day_from_meta(buffer.day())
        .unwrap()
        .unwrap();
    assert_eq!(meta.seen_comments, 2);
    assert_eq!(meta.seen_submissions, 1);
    assert_eq!(buffer.pending_total(), 0);
}

#[test]
fn threshold_bounds_the_cached_total() {
    let temp = TempDb::create();
    let mut buffer = MetaBuffer::with_threshold(temp.db().clone(), 10);
    for _ in 0..25 {
        buffer.add_comments(1).unwrap();
    }

    assert!(buffer.pending_total() <= 10);
    let written = temp
        .db()
        .select_day_from_meta(buffer.day())
        .unwrap()
        .map_or(0, |meta| meta.seen_comments);
    assert_eq!(i64::from(written) + buffer.pending_total(), 25);
}

#[test]
fn configured_threshold_is_honoured() {
    let temp = TempDb::create();
    let config = Config::parse_toml("[meta]\nflush_threshold = 4\n").unwrap();
    let mut buffer = MetaBuffer::from_config(temp.db().clone(), &config.meta);
    for _ in 0..9 {
        buffer.add_submissions(1).unwrap();
    }

    assert!(buffer.pending_total() <= 4);
    let written = temp
        .db()
        .select_day_from_meta(buffer.day())
        .unwrap()
        .map_or(0, |meta| meta.seen_submissions);
    assert_eq!(i64::from(written) + buffer.pending_total(), 9);
}

#[test]
fn shared_buffer_counts_every_thread() {
    let temp = TempDb::create();
    let shared = Arc::new(Mutex::new(MetaBuffer::with_threshold(temp.db().clone(), 7)));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                for _ in 0..20 {
                    shared.lock().add_comments(1).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    shared.lock().flush(true).unwrap();

    let total: i32 = temp
        .db()
        .all_meta()
        .unwrap()
        .iter()
        .map(|meta| meta.seen_comments)
        .sum();
    assert_eq!(total, 80);
}
