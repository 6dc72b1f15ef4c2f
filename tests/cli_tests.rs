//! Integration tests for the entrygen CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SVELTE_CONFIG: &str = r#"import adapter from '@sveltejs/adapter-static';

const config = {
    kit: {
        adapter: adapter(),
        prerender: { crawl: true }
    }
};

export default config;
"#;

fn entrygen_cmd() -> Command {
    Command::cargo_bin("entrygen").unwrap()
}

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let posts = dir.path().join("src/posts");
    fs::create_dir_all(&posts).unwrap();
    fs::write(posts.join("hello.md"), "# hello").unwrap();
    fs::write(posts.join("world.md"), "# world").unwrap();
    fs::write(dir.path().join("svelte.config.js"), SVELTE_CONFIG).unwrap();
    dir
}

fn write_run_config(dir: &Path, body: &str) {
    fs::write(
        dir.join("entrygen.toml"),
        format!("[entrygen]\nschema_version = 1\n\n{body}"),
    )
    .unwrap();
}

#[test]
fn test_help_flag() {
    entrygen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_patches_svelte_config() {
    let dir = site();
    write_run_config(
        dir.path(),
        r#"
[[paths]]
glob = "src/posts/*.md"
prefix = "/blog/"

[[paths]]
path = "pages/about.svelte"
"#,
    );

    entrygen_cmd().current_dir(dir.path()).assert().success();

    let patched = fs::read_to_string(dir.path().join("svelte.config.js")).unwrap();
    assert_eq!(
        patched,
        SVELTE_CONFIG.replace(
            "prerender: { crawl: true }",
            r#"prerender: { entries: ["*","/blog/hello","/blog/world","about"], crawl: true }"#
        )
    );

    // A second run reaches the same text.
    entrygen_cmd().current_dir(dir.path()).assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("svelte.config.js")).unwrap(),
        patched
    );
}

#[test]
fn test_dry_run_prints_and_keeps_file() {
    let dir = site();
    write_run_config(dir.path(), "[[paths]]\nglob = \"src/posts/*.md\"\nprefix = \"/blog/\"\n");

    entrygen_cmd()
        .current_dir(dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"prerender: { entries: ["*","/blog/hello","/blog/world"], crawl: true }"#,
        ));

    assert_eq!(
        fs::read_to_string(dir.path().join("svelte.config.js")).unwrap(),
        SVELTE_CONFIG
    );
}

#[test]
fn test_template_transform_from_content_file() {
    let dir = site();
    fs::create_dir_all(dir.path().join("content")).unwrap();
    fs::write(
        dir.path().join("content/authors.json"),
        r#"[{"slug": "ada"}, {"slug": "grace"}]"#,
    )
    .unwrap();
    write_run_config(
        dir.path(),
        r#"
[[paths]]
path = "content/authors.json"
transform = { type = "template", data = "json", template = "{% for a in data %}/authors/{{ a.slug }}\n{% endfor %}" }
"#,
    );

    entrygen_cmd()
        .current_dir(dir.path())
        .args(["--report", "full"])
        .assert()
        .success()
        .stderr(predicate::str::contains("content/authors.json (2 entries)"));

    let patched = fs::read_to_string(dir.path().join("svelte.config.js")).unwrap();
    assert!(patched.contains(r#"entries: ["*","/authors/ada","/authors/grace"]"#));
}

#[test]
fn test_failing_path_spec_does_not_fail_run() {
    let dir = site();
    write_run_config(
        dir.path(),
        r#"
[[paths]]
path = "content/missing.json"
transform = { type = "template", data = "json", template = "{{ data.slug }}" }

[[paths]]
glob = "src/posts/*.md"
prefix = "/blog/"
"#,
    );

    entrygen_cmd()
        .current_dir(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping path spec"));

    let patched = fs::read_to_string(dir.path().join("svelte.config.js")).unwrap();
    assert!(patched.contains(r#"entries: ["*","/blog/hello","/blog/world"]"#));
}

#[test]
fn test_invalid_glob_is_still_announced() {
    let dir = site();
    write_run_config(dir.path(), "[[paths]]\nglob = \"src/[posts.md\"\n");

    let output = entrygen_cmd()
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("running transform").count(), 1);
    assert!(stderr.contains("skipping path spec"));
}

#[test]
fn test_missing_svelte_config_fails() {
    let dir = TempDir::new().unwrap();
    write_run_config(dir.path(), "[[paths]]\npath = \"a.md\"\n");

    entrygen_cmd()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"))
        .stderr(predicate::str::contains("svelte.config.js"));

    assert!(!dir.path().join("svelte.config.js").exists());
}

#[test]
fn test_root_flag_and_explicit_config() {
    let dir = site();
    let elsewhere = TempDir::new().unwrap();
    let run_config = elsewhere.path().join("gen.toml");
    fs::write(
        &run_config,
        "[entrygen]\nschema_version = 1\n\n[[paths]]\nglob = \"src/posts/*.md\"\n",
    )
    .unwrap();

    entrygen_cmd()
        .current_dir(elsewhere.path())
        .arg("--config")
        .arg(&run_config)
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success();

    let patched = fs::read_to_string(dir.path().join("svelte.config.js")).unwrap();
    assert!(patched.contains(r#"entries: ["*","hello","world"]"#));
}

#[test]
fn test_missing_run_config_fails() {
    let dir = TempDir::new().unwrap();
    entrygen_cmd()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("entrygen init"));
}

#[test]
fn test_init_writes_starter_config() {
    let dir = TempDir::new().unwrap();

    entrygen_cmd()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    let written = fs::read_to_string(dir.path().join("entrygen.toml")).unwrap();
    assert!(written.contains("schema_version = 1"));
}
