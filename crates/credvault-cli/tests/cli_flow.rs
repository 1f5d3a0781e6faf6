use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use rusqlite::Connection;
use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_credvault"))
}

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("config")).expect("create config dir");
        std::fs::create_dir_all(dir.path().join("data")).expect("create data dir");
        Self { dir }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config").join("credvault").join("config.toml")
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("data").join("credvault").join("vault.db")
    }

    fn command(&self, user: Option<&str>, args: &[&str]) -> Command {
        let mut cmd = Command::new(bin());
        cmd.args(args)
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env_remove("CREDVAULT_CONFIG")
            .env_remove("CREDVAULT_DB")
            .env_remove("CREDVAULT_USER")
            .env_remove("RUST_LOG")
            .stdin(Stdio::null());
        if let Some(user) = user {
            cmd.env("CREDVAULT_USER", user);
        }
        cmd
    }

    fn run(&self, user: Option<&str>, args: &[&str]) -> Output {
        self.command(user, args).output().expect("run credvault")
    }

    fn run_with_stdin(&self, user: Option<&str>, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(user, args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn credvault");
        child
            .stdin
            .take()
            .expect("stdin handle")
            .write_all(input.as_bytes())
            .expect("write stdin");
        child.wait_with_output().expect("wait for credvault")
    }

    fn init(&self) {
        let output = self.run(None, &["init"]);
        assert_success(&output);
    }
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed: status={:?}\nstdout={}\nstderr={}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn add(env: &Env, user: &str, site: &str, secret: &str) -> i64 {
    let output = env.run(Some(user), &["add", site, "--secret", secret, "--json"]);
    assert_success(&output);
    json(&output)["id"].as_i64().expect("numeric id")
}

#[test]
fn test_init_writes_config_and_vault() {
    let env = Env::new();
    env.init();

    assert!(env.db_path().exists());
    let config = std::fs::read_to_string(env.config_path()).expect("config written");
    assert!(config.contains("[storage]"));
    assert!(config.contains("vault.db"));

    let again = env.run(None, &["init"]);
    assert_eq!(again.status.code(), Some(4));
}

#[test]
fn test_commands_before_init_report_not_found() {
    let env = Env::new();
    let output = env.run(Some("alice"), &["list"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("credvault init"));
}

#[test]
fn test_alice_github_flow() {
    let env = Env::new();
    env.init();
    assert_success(&env.run(Some("alice"), &["register"]));

    let id = add(&env, "alice", "github", "p@ss1");

    let get = env.run(Some("alice"), &["get", &id.to_string(), "--json"]);
    assert_success(&get);
    let credential = json(&get);
    assert_eq!(credential["site"], "github");
    assert_eq!(credential["secret"], "p@ss1");

    let list = env.run(Some("alice"), &["list", "--json"]);
    assert_success(&list);
    let entries = json(&list);
    let entries = entries.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["site"], "github");
    assert!(entries[0].get("secret").is_none());
    assert!(!stdout(&list).contains("p@ss1"));

    let secret_only = env.run(Some("alice"), &["get", &id.to_string(), "--secret-only"]);
    assert_success(&secret_only);
    assert_eq!(stdout(&secret_only), "p@ss1\n");
}

#[test]
fn test_secret_from_stdin_is_verbatim() {
    let env = Env::new();
    env.init();
    assert_success(&env.run(Some("alice"), &["register"]));

    let output = env.run_with_stdin(Some("alice"), &["add", "bank", "--json"], "  spaced secret \n");
    assert_success(&output);
    let id = json(&output)["id"].as_i64().expect("numeric id");

    let get = env.run(Some("alice"), &["get", &id.to_string(), "--json"]);
    assert_eq!(json(&get)["secret"], "  spaced secret ");
}

#[test]
fn test_users_cannot_see_each_other() {
    let env = Env::new();
    env.init();
    assert_success(&env.run(Some("alice"), &["register"]));
    assert_success(&env.run(Some("bob"), &["register"]));

    let id = add(&env, "alice", "github", "p@ss1").to_string();

    for args in [
        vec!["get", id.as_str()],
        vec!["update", id.as_str(), "--secret", "stolen"],
        vec!["delete", id.as_str()],
    ] {
        let output = env.run(Some("bob"), &args);
        assert_eq!(output.status.code(), Some(3), "{:?}", args);
    }

    let list = env.run(Some("bob"), &["list", "--json"]);
    assert_eq!(json(&list), serde_json::json!([]));

    let get = env.run(Some("alice"), &["get", &id, "--json"]);
    assert_eq!(json(&get)["secret"], "p@ss1");
}

#[test]
fn test_auth_failures() {
    let env = Env::new();
    env.init();

    let anonymous = env.run(None, &["list"]);
    assert_eq!(anonymous.status.code(), Some(5));

    let unregistered = env.run(Some("mallory"), &["list"]);
    assert_eq!(unregistered.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&unregistered.stderr).contains("register"));

    assert_success(&env.run(Some("alice"), &["register"]));
    let twice = env.run(Some("alice"), &["register"]);
    assert_eq!(twice.status.code(), Some(6));
}

#[test]
fn test_update_and_double_delete() {
    let env = Env::new();
    env.init();
    assert_success(&env.run(Some("alice"), &["register"]));
    let id = add(&env, "alice", "github", "p@ss1").to_string();

    assert_success(&env.run(
        Some("alice"),
        &["update", &id, "--username", "alice@example.com", "--secret", "n3w"],
    ));
    let get = json(&env.run(Some("alice"), &["get", &id, "--json"]));
    assert_eq!(get["secret"], "n3w");
    assert_eq!(get["username"], "alice@example.com");

    let nothing = env.run(Some("alice"), &["update", &id]);
    assert_eq!(nothing.status.code(), Some(4));

    assert_success(&env.run(Some("alice"), &["delete", &id]));
    let again = env.run(Some("alice"), &["delete", &id]);
    assert_eq!(again.status.code(), Some(3));
}

#[test]
fn test_validation_exit_code() {
    let env = Env::new();
    env.init();
    assert_success(&env.run(Some("alice"), &["register"]));

    let output = env.run(Some("alice"), &["add", "   ", "--secret", "x"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_profile_and_unregister() {
    let env = Env::new();
    env.init();
    assert_success(&env.run(Some("alice"), &["register"]));
    add(&env, "alice", "github", "one");
    add(&env, "alice", "email", "two");

    let profile = json(&env.run(Some("alice"), &["profile", "--json"]));
    assert_eq!(profile["id"], "alice");
    assert_eq!(profile["credential_count"], 2);

    let refused = env.run(Some("alice"), &["unregister"]);
    assert_eq!(refused.status.code(), Some(4));

    assert_success(&env.run(Some("alice"), &["unregister", "--yes"]));
    let after = env.run(Some("alice"), &["list"]);
    assert_eq!(after.status.code(), Some(5));

    let conn = Connection::open(env.db_path()).expect("open vault");
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM credentials", [], |row| row.get(0))
        .expect("count credentials");
    assert_eq!(remaining, 0);
}

#[test]
fn test_tampered_vault_reads_as_not_found() {
    let env = Env::new();
    env.init();
    assert_success(&env.run(Some("alice"), &["register"]));
    let id = add(&env, "alice", "github", "p@ss1");

    tamper_token(&env.db_path(), id);

    let output = env.run(Some("alice"), &["get", &id.to_string()]);
    assert_eq!(output.status.code(), Some(3));
    assert!(!stdout(&output).contains("p@ss1"));
}

fn tamper_token(db: &Path, id: i64) {
    let conn = Connection::open(db).expect("open vault");
    let token: String = conn
        .query_row(
            "SELECT cipher_text FROM credentials WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .expect("token");
    let mut chars: Vec<char> = token.chars().collect();
    chars[20] = if chars[20] == 'A' { 'B' } else { 'A' };
    let tampered: String = chars.into_iter().collect();
    conn.execute(
        "UPDATE credentials SET cipher_text = ?1 WHERE id = ?2",
        rusqlite::params![tampered, id],
    )
    .expect("tamper token");
}

#[test]
fn test_check_reports_ok() {
    let env = Env::new();
    env.init();
    let output = env.run(None, &["check"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Integrity check: OK"));
}

#[test]
fn test_db_flag_overrides_config() {
    let env = Env::new();
    env.init();
    let other = env.dir.path().join("other.db");
    let other_str = other.to_string_lossy().to_string();

    let init_other = env.run(None, &["--db", &other_str, "init", "--force"]);
    assert_success(&init_other);
    assert!(other.exists());

    assert_success(&env.run(Some("alice"), &["--db", &other_str, "register"]));
    let list = env.run(Some("alice"), &["--db", &other_str, "list", "--json"]);
    assert_success(&list);
}
