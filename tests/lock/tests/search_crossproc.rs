//! Cross-process determinism: spawns the `search_fixture` binary under
//! several environment variants and asserts all produce identical output.

use std::path::Path;
use std::process::Command;

fn binary_path() -> String {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push("search_fixture");
    path.to_string_lossy().to_string()
}

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();

    let mut command = Command::new(&bin);
    command.current_dir(work_dir);
    command
        .env_remove("LC_ALL")
        .env_remove("LANG")
        .env_remove("RUST_LOG")
        .env_remove("RAYON_NUM_THREADS");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "search_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

fn value<'a>(output: &'a str, key: &str) -> &'a str {
    output
        .lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix('='))
        .unwrap_or_else(|| panic!("output missing {key}:\n{output}"))
}

#[test]
fn fixture_reports_known_answers() {
    let baseline = run_variant(&workspace_root(), &[]);

    assert_eq!(value(&baseline, "grid_termination"), "goal_reached");
    assert_eq!(value(&baseline, "grid_moves"), "22");
    assert_eq!(value(&baseline, "elevator_moves"), "11");
    assert_eq!(value(&baseline, "cubicle_moves"), "11");
    assert_eq!(value(&baseline, "vault_shortest"), "DDRRRD");
    assert_eq!(value(&baseline, "storage_moves"), "7");
    assert_eq!(value(&baseline, "duct_moves"), "20");

    let grid_stats: serde_json::Value =
        serde_json::from_str(value(&baseline, "grid_stats")).expect("grid_stats is JSON");
    assert_eq!(grid_stats["expansions"], 71);
    assert_eq!(
        grid_stats["expansions"].to_string(),
        value(&baseline, "grid_expansions")
    );
    assert_eq!(grid_stats["states_seen"], 82);
    assert!(value(&baseline, "fixture_digest").starts_with("sha256:"));
    assert_eq!(
        value(&baseline, "elevator_layered_digest"),
        value(&baseline, "elevator_parallel_digest"),
        "worker pool changed the layered expansion order"
    );
}

#[test]
fn crossproc_determinism_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    let alt_cwd = std::env::temp_dir();
    let alt_cwd = alt_cwd.to_string_lossy();
    let variant_cwd = run_variant(&alt_cwd, &[]);
    assert_eq!(baseline, variant_cwd, "output differs when cwd changes from {root} to {alt_cwd}");

    let variant_locale = run_variant(&root, &[("LC_ALL", "C"), ("LANG", "C")]);
    assert_eq!(baseline, variant_locale, "output differs when LC_ALL=C LANG=C");

    let variant_threads = run_variant(&root, &[("RAYON_NUM_THREADS", "1")]);
    assert_eq!(baseline, variant_threads, "output differs with a single rayon thread");

    let variant_noise = run_variant(&root, &[("RUST_LOG", "trace"), ("WAYMARK_NOISE", "1")]);
    assert_eq!(baseline, variant_noise, "output differs with logging switched on");
}
