//! Durable state over the redb backend.

mod common;

use common::*;

// ── Test: state survives reopen ──

#[test]
fn test_committed_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut cs = redb_consensus(dir.path());
        assert_eq!(run_block(&mut cs, &["foo=bar", "baz=qux"]), vec![0, 0]);
    }

    let mut cs = redb_consensus(dir.path());
    assert_eq!(query(&mut cs, "foo").value, b"bar");
    assert_eq!(query(&mut cs, "baz").value, b"qux");
    assert_eq!(check_tx(&mut cs, "foo=bar").code, 2);
}

// ── Test: uncommitted block is lost on reopen ──

#[test]
fn test_open_block_not_persisted() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut cs = redb_consensus(dir.path());
        run_block(&mut cs, &["kept=1"]);
        cs.handle(kvstore_primitives::Request::begin_block()).unwrap();
        deliver_tx(&mut cs, "lost=1");
    }

    let mut cs = redb_consensus(dir.path());
    assert_eq!(query(&mut cs, "kept").log, "exists");
    assert_eq!(query(&mut cs, "lost").log, "does not exist");
}

// ── Test: binary values round through storage ──

#[test]
fn test_value_with_separator_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let mut cs = redb_consensus(dir.path());

    run_block(&mut cs, &["url=a=b&c=d"]);
    assert_eq!(query(&mut cs, "url").value, b"a=b&c=d");
    assert_eq!(check_tx(&mut cs, "url=a=b&c=d").code, 2);
}
