use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vibe(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vibe").unwrap();
    cmd.current_dir(dir.path()).env("VIBE_ROOT", dir.path());
    cmd
}

fn init_project(dir: &TempDir) {
    vibe(dir).arg("init").assert().success();
}

// ---------------------------------------------------------------------------
// vibe init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_data_files() {
    let dir = TempDir::new().unwrap();
    vibe(&dir).arg("init").assert().success();

    assert!(dir.path().join(".vibe").is_dir());
    assert!(dir.path().join(".vibe/catalog.yaml").exists());
    assert!(dir.path().join(".vibe/store.json").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    vibe(&dir).arg("init").assert().success();
    vibe(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists"));
}

// ---------------------------------------------------------------------------
// vibe check
// ---------------------------------------------------------------------------

#[test]
fn check_awards_first_day_privately() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "alice", "--streak", "1", "--seed", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First Day"))
        .stdout(predicate::str::contains("Announce to the board: no"));
}

#[test]
fn check_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "alice", "--streak", "7"])
        .assert()
        .success();
    vibe(&dir)
        .args(["check", "alice", "--streak", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No new badges for alice."));
}

#[test]
fn check_catches_up_all_milestones() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "alice", "--streak", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 new badges"))
        .stdout(predicate::str::contains("First Day"))
        .stdout(predicate::str::contains("Early Bird"))
        .stdout(predicate::str::contains("Week Warrior"))
        .stdout(predicate::str::contains("Fortnight Hero"))
        .stdout(predicate::str::contains("Monthly Legend"));
}

#[test]
fn week_milestone_announces_to_board() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "alice", "--streak", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Announce to the board: yes"));
}

#[test]
fn counter_update_awards_ship_badge() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "alice", "--counter", "ships=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First Ship"));
}

#[test]
fn check_without_metrics_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to check"));
}

#[test]
fn at_prefixed_and_bare_handles_share_a_record() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "@Alice", "--streak", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First Day"));
    vibe(&dir)
        .args(["check", "alice", "--streak", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No new badges"));
}

#[test]
fn invalid_handle_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "not a handle", "--streak", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid handle"));
}

#[test]
fn unexplained_streak_regression_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "alice", "--streak", "10"])
        .assert()
        .success();
    vibe(&dir)
        .args(["check", "alice", "--streak", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid metric update"));
}

#[test]
fn check_json_output_is_parseable() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let output = vibe(&dir)
        .args(["check", "alice", "--streak", "3", "--seed", "0", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(v["handle"], "alice");
    assert_eq!(v["newly_earned"].as_array().unwrap().len(), 2);
    assert_eq!(v["celebration"]["should_announce_publicly"], false);
}

// ---------------------------------------------------------------------------
// vibe award
// ---------------------------------------------------------------------------

#[test]
fn award_then_duplicate_is_a_noop() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["award", "alice", "game_master"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Awarded"));
    vibe(&dir)
        .args(["award", "alice", "game_master"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already has"));
}

#[test]
fn award_unknown_badge_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["award", "alice", "galaxy_brain"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown badge"));
}

// ---------------------------------------------------------------------------
// vibe user / list / leaderboard / stats / log
// ---------------------------------------------------------------------------

#[test]
fn user_shows_badges_and_rank() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "alice", "--streak", "7"])
        .assert()
        .success();

    vibe(&dir)
        .args(["user", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("User: alice"))
        .stdout(predicate::str::contains("Week Warrior"))
        .stdout(predicate::str::contains("5 points"))
        .stdout(predicate::str::contains("Next up:"));
}

#[test]
fn list_shows_catalog() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("first_day"))
        .stdout(predicate::str::contains("century_club"))
        .stdout(predicate::str::contains("current_streak >= 7"));
}

#[test]
fn leaderboard_ranks_by_points() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "alice", "--streak", "7"])
        .assert()
        .success();
    vibe(&dir)
        .args(["check", "bob", "--streak", "1"])
        .assert()
        .success();

    let output = vibe(&dir)
        .arg("leaderboard")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    let alice = text.find("alice").unwrap();
    let bob = text.find("bob").unwrap();
    assert!(alice < bob, "alice should rank above bob:\n{text}");
}

#[test]
fn stats_reports_totals() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "alice", "--streak", "1"])
        .assert()
        .success();

    vibe(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Badges awarded: 1"))
        .stdout(predicate::str::contains("Badge earners:  1"));
}

#[test]
fn log_lists_recent_celebrations() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vibe(&dir)
        .args(["check", "alice", "--streak", "3"])
        .assert()
        .success();

    vibe(&dir)
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("first_day"))
        .stdout(predicate::str::contains("early_bird"));
}

// ---------------------------------------------------------------------------
// vibe migrate
// ---------------------------------------------------------------------------

#[test]
fn migrate_imports_legacy_badges() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let legacy = dir.path().join("badges.json");
    std::fs::write(
        &legacy,
        r#"{"user_badges": {"@alice": ["first_day", "week_warrior"]}, "badge_log": []}"#,
    )
    .unwrap();

    vibe(&dir)
        .args(["migrate", legacy.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("badges:  2"));

    vibe(&dir)
        .args(["user", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Week Warrior"));
}

#[test]
fn migrate_unrecognized_layout_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let legacy = dir.path().join("weird.json");
    std::fs::write(&legacy, r#"[1, 2, 3]"#).unwrap();

    vibe(&dir)
        .args(["migrate", legacy.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized legacy"));
}
