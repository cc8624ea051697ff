// Drives the compiled binary through a PTY: pick the base mode, clear the
// board with the number keys and quit from the results screen.
//
// Requires a TTY, so it is Unix-only and ignored by default.
// Run with `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};
use numtap::scores::{FileKeyValueStore, ScoreBoard};

#[test]
#[ignore]
fn base_mode_session_is_recorded() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("numtap");
    let cmd = format!("{} --seed 1 --data-dir {}", bin.display(), dir.path().display());

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(300));

    // menu quick pick: Basic (1-9)
    p.send("1")?;
    std::thread::sleep(Duration::from_millis(100));
    for c in '1'..='9' {
        p.send(c.to_string())?;
        std::thread::sleep(Duration::from_millis(20));
    }
    std::thread::sleep(Duration::from_millis(200));

    p.send("q")?;
    p.expect(Eof)?;

    let board = ScoreBoard::load(&FileKeyValueStore::new(dir.path()));
    assert_eq!(board.len(), 1);
    assert_eq!(board.records()[0].mode_key, "Basic (1-9)");
    assert!(dir.path().join("numtap.log").exists());
    Ok(())
}
