use std::sync::Mutex;
use std::time::Duration;

use tempfile::NamedTempFile;

use proctor_engine::config::EngineConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "PROCTOR_CONFIG",
        "PROCTOR_COOLDOWN_MS",
        "PROCTOR_PERSON_SCORE",
        "PROCTOR_MOVEMENT_THRESHOLD",
        "PROCTOR_PROHIBITED_LABELS",
        "PROCTOR_REFRESH_HZ",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_defaults_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = EngineConfig::load().expect("load config");
    assert_eq!(cfg, EngineConfig::default());
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "cooldown_ms": 3000,
        "person_score_threshold": 0.75,
        "movement_threshold_px": 22.5,
        "prohibited_labels": ["cell phone", "book"],
        "refresh_hz": 30
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("PROCTOR_CONFIG", file.path());
    std::env::set_var("PROCTOR_COOLDOWN_MS", "8000");
    std::env::set_var("PROCTOR_PROHIBITED_LABELS", "laptop, tv ,,remote");

    let cfg = EngineConfig::load().expect("load config");

    assert_eq!(cfg.cooldown, Duration::from_millis(8000));
    assert_eq!(cfg.person_score_threshold, 0.75);
    assert_eq!(cfg.movement_threshold_px, 22.5);
    assert_eq!(cfg.prohibited_labels, vec!["laptop", "tv", "remote"]);
    assert_eq!(cfg.refresh_hz, 30);

    clear_env();
}

#[test]
fn rejects_invalid_env_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("PROCTOR_COOLDOWN_MS", "five seconds");
    assert!(EngineConfig::load().is_err());
    clear_env();

    std::env::set_var("PROCTOR_PERSON_SCORE", "1.2");
    assert!(EngineConfig::load().is_err());
    clear_env();

    std::env::set_var("PROCTOR_REFRESH_HZ", "0");
    assert!(EngineConfig::load().is_err());
    clear_env();
}

#[test]
fn rejects_unreadable_or_malformed_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("PROCTOR_CONFIG", "/nonexistent/proctor.json");
    assert!(EngineConfig::load().is_err());

    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, b"{ not json").expect("write config");
    std::env::set_var("PROCTOR_CONFIG", file.path());
    assert!(EngineConfig::load().is_err());

    clear_env();
}
