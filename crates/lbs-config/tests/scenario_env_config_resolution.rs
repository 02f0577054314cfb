//! Environment config resolution
//!
//! GREEN when:
//! - Only the three required variables are needed; everything else defaults.
//! - Every missing required variable is named in a single error.
//! - Invalid numbers, years, webhook URLs and addresses fail with the
//!   variable name and without echoing secrets.
//! - `LBS_LAYOUT_FILE` overrides rendering settings from YAML.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use lbs_config::AppConfig;

const HOOK: &str = "https://discord.com/api/webhooks/424242/tok-en_SECRET";

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn required() -> Vec<(&'static str, &'static str)> {
    vec![
        ("AOC_SESSION_COOKIE", "cookie-SECRET"),
        ("AOC_LEADERBOARD_ID", "987654"),
        ("DISCORD_WEBHOOK_URL", HOOK),
    ]
}

fn resolve(vars: &HashMap<String, String>) -> anyhow::Result<AppConfig> {
    AppConfig::from_lookup(|k| vars.get(k).cloned())
}

#[test]
fn required_only_uses_defaults() {
    let cfg = resolve(&env(&required())).unwrap();
    assert_eq!(cfg.session_cookie.expose(), "cookie-SECRET");
    assert_eq!(cfg.leaderboard_id, "987654");
    assert_eq!(cfg.webhook.id(), "424242");
    assert_eq!(cfg.aoc_base_url, "https://adventofcode.com");
    assert_eq!(cfg.year, 2024);
    assert_eq!(cfg.store_file, PathBuf::from("discord_messages.json"));
    assert_eq!(cfg.update_interval, Duration::from_secs(900));
    assert_eq!(cfg.error_backoff, Duration::from_secs(60));
    assert_eq!(cfg.http_timeout, Duration::from_secs(30));
    assert_eq!(cfg.log_file, Some(PathBuf::from("bot.log")));
    assert_eq!(cfg.layout, lbs_config::LayoutSettings::default());
    assert!(cfg.daemon_addr.is_none());
}

#[test]
fn all_missing_required_are_reported_together() {
    let err = resolve(&env(&[("AOC_LEADERBOARD_ID", "  ")])).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("AOC_SESSION_COOKIE"), "{msg}");
    assert!(msg.contains("AOC_LEADERBOARD_ID"), "{msg}");
    assert!(msg.contains("DISCORD_WEBHOOK_URL"), "{msg}");
}

#[test]
fn optional_overrides_are_applied() {
    let mut pairs = required();
    pairs.extend([
        ("AOC_BASE_URL", "http://127.0.0.1:9999"),
        ("AOC_LEADERBOARD_YEAR", "2023"),
        ("MESSAGE_STORE_FILE", "/var/lib/lbs/state.json"),
        ("UPDATE_INTERVAL", "300"),
        ("ERROR_BACKOFF", "0"),
        ("HTTP_TIMEOUT", "5"),
        ("LOG_FILE", ""),
        ("LBS_DAEMON_ADDR", "127.0.0.1:8899"),
    ]);
    let cfg = resolve(&env(&pairs)).unwrap();
    assert_eq!(cfg.aoc_base_url, "http://127.0.0.1:9999");
    assert_eq!(cfg.year, 2023);
    assert_eq!(cfg.store_file, PathBuf::from("/var/lib/lbs/state.json"));
    assert_eq!(cfg.update_interval, Duration::from_secs(300));
    assert_eq!(cfg.error_backoff, Duration::ZERO);
    assert_eq!(cfg.http_timeout, Duration::from_secs(5));
    assert_eq!(cfg.log_file, None);
    assert_eq!(cfg.daemon_addr, Some("127.0.0.1:8899".parse().unwrap()));
}

#[test]
fn invalid_values_name_the_variable() {
    for (name, value) in [
        ("UPDATE_INTERVAL", "soon"),
        ("UPDATE_INTERVAL", "0"),
        ("HTTP_TIMEOUT", "-1"),
        ("AOC_LEADERBOARD_YEAR", "1999"),
        ("AOC_LEADERBOARD_YEAR", "twenty"),
        ("LBS_DAEMON_ADDR", "localhost"),
    ] {
        let mut pairs = required();
        pairs.push((name, value));
        let err = resolve(&env(&pairs)).unwrap_err();
        assert!(format!("{err:#}").contains(name), "{name}={value}: {err:#}");
    }
}

#[test]
fn bad_webhook_url_fails_without_echoing_it() {
    let mut pairs = required();
    pairs.retain(|(k, _)| *k != "DISCORD_WEBHOOK_URL");
    pairs.push(("DISCORD_WEBHOOK_URL", "https://discord.com/SECRET"));
    let err = resolve(&env(&pairs)).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("DISCORD_WEBHOOK_URL"));
    assert!(!msg.contains("SECRET"));
}

#[test]
fn debug_output_redacts_credentials() {
    let cfg = resolve(&env(&required())).unwrap();
    let dbg = format!("{cfg:?}");
    assert!(!dbg.contains("cookie-SECRET"));
    assert!(!dbg.contains("tok-en_SECRET"));
    assert!(dbg.contains("424242"));
}

#[test]
fn layout_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.yaml");
    std::fs::write(
        &path,
        "layout:\n  page_size: 10\n  color: 16711680\nusername: \"Elf Bot\"\n",
    )
    .unwrap();

    let mut pairs: Vec<(&str, String)> = required()
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
    pairs.push(("LBS_LAYOUT_FILE", path.display().to_string()));
    let vars: HashMap<String, String> = pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    let cfg = resolve(&vars).unwrap();
    assert_eq!(cfg.layout.layout.page_size, 10);
    assert_eq!(cfg.layout.layout.color, 0xff0000);
    assert_eq!(cfg.layout.username.as_deref(), Some("Elf Bot"));
    assert_eq!(cfg.layout.avatar_url, None);
}

#[test]
fn missing_layout_file_is_an_error() {
    let mut pairs = required();
    pairs.push(("LBS_LAYOUT_FILE", "/definitely/not/here.yaml"));
    let err = resolve(&env(&pairs)).unwrap_err();
    assert!(format!("{err:#}").contains("read layout file failed"));
}
