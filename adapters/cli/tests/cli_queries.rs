use std::process::{Command, Output};

const DEMO_LEVEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../levels/demo.toml");

fn seamgrid(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seamgrid"))
        .args(["--level", DEMO_LEVEL])
        .args(args)
        .output()
        .expect("failed to invoke the seamgrid binary")
}

fn stdout_of(args: &[&str]) -> String {
    let output = seamgrid(args);
    assert!(
        output.status.success(),
        "seamgrid {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is utf-8")
}

#[test]
fn point_queries_cover_tiles_relocators_and_colliders() {
    let cases = [
        (["0.1", "0.1"], "solid"),
        (["0.1", "1.2"], "clear"),
        (["2.0", "3.0"], "solid"),
        (["-2.0", "3.0"], "clear"),
        (["0.0", "3.0"], "clear"),
        (["-1.75", "0.75"], "solid"),
        (["4.1", "0.6"], "solid"),
        (["4.4", "0.9"], "clear"),
    ];
    for (position, expected) in cases {
        let stdout = stdout_of(&["point", position[0], position[1]]);
        assert_eq!(stdout.trim(), expected, "point {position:?}");
    }
}

#[test]
fn box_queries_wrap_across_the_seam() {
    assert_eq!(stdout_of(&["box", "-7.9", "1.25", "0.5", "0.5"]).trim(), "solid");
    assert_eq!(stdout_of(&["box", "0.0", "2.5", "0.4", "0.4"]).trim(), "clear");
}

#[test]
fn cell_reports_wrapped_coordinates() {
    let stdout = stdout_of(&["cell", "8.1", "0.1"]);
    assert!(stdout.contains("cell -16 0 layer 0"), "{stdout}");
    assert!(stdout.contains("tile ground"), "{stdout}");
    assert!(stdout.contains("collider full_cell"), "{stdout}");
    assert!(stdout.contains("wraps to"), "{stdout}");
}

#[test]
fn distance_takes_the_short_way_round() {
    assert_eq!(stdout_of(&["distance", "-7.5", "0", "7.5", "0"]).trim(), "1.000");
    assert_eq!(stdout_of(&["distance", "0", "0", "3", "4"]).trim(), "5.000");
}

#[test]
fn diff_round_trips_through_the_transfer_string() {
    let payload = stdout_of(&["diff", "--set", "0,3,brick", "--clear", "1,0"]);
    let payload = payload.trim();
    assert!(payload.starts_with("tiles:v1:32x4:"), "{payload}");

    let stdout = stdout_of(&["apply-diff", payload]);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5, "{stdout}");
    assert_eq!(lines[0], "applied 2 cells");

    let top: Vec<char> = lines[1].chars().collect();
    assert_eq!(top[16], '#');
    assert_eq!(top[18], 'o');
    let second: Vec<char> = lines[3].chars().collect();
    assert_eq!(second[12], 'o');
    assert_eq!(second[24], '/');
    assert_eq!(lines[4], format!("{}.{}", "#".repeat(17), "#".repeat(14)));
}

#[test]
fn apply_diff_rejects_mismatched_blocks() {
    let output = seamgrid(&["apply-diff", "tiles:v1:4x4:eyJ0aWxlcyI6W10sImNoYW5nZXMiOnt9fQ"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("baseline is 32x4"), "{stderr}");
}

#[test]
fn draws_skip_disabled_candidates() {
    let stdout = stdout_of(&["draw", "--score", "0", "--leader", "4", "--count", "40"]);
    let names: Vec<&str> = stdout.lines().collect();
    assert_eq!(names.len(), 40);
    assert!(names.iter().all(|name| *name != "propeller"));

    let replay = stdout_of(&["draw", "--score", "0", "--leader", "4", "--count", "40"]);
    assert_eq!(stdout, replay);
}

#[test]
fn missing_level_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_seamgrid"))
        .args(["--level", "does/not/exist.toml", "point", "0", "0"])
        .output()
        .expect("failed to invoke the seamgrid binary");
    assert!(!output.status.success());
}
