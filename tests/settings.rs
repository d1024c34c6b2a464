extern crate gloss;
extern crate serde_json;
extern crate tempfile;

use std::fs;

use gloss::errors::Error;
use gloss::settings::Settings;

#[test]
fn defaults() {
    let settings = Settings::default();
    assert!(!settings.debug_output);
    assert!(settings.synchronous_debug_output);
    assert!(settings.hot_reload);
    assert_eq!(settings.pack_alignment, 1);
    assert_eq!(settings.unpack_alignment, 1);

    let settings = Settings::from_json("{}").unwrap();
    assert!(settings.hot_reload);
}

#[test]
fn partial() {
    let settings = Settings::from_json(r#"{ "debug_output": true, "unpack_alignment": 4 }"#).unwrap();
    assert!(settings.debug_output);
    assert!(settings.synchronous_debug_output);
    assert_eq!(settings.pack_alignment, 1);
    assert_eq!(settings.unpack_alignment, 4);
}

#[test]
fn invalid() {
    match Settings::from_json(r#"{ "pack_alignment": 3 }"#) {
        Err(Error::Settings(msg)) => assert!(msg.contains("pack_alignment")),
        _ => panic!(),
    }

    match Settings::from_json(r#"{ "hot_reload": "yes" }"#) {
        Err(Error::Settings(_)) => {}
        _ => panic!(),
    }
}

#[test]
fn load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gloss.json");

    let mut settings = Settings::default();
    settings.hot_reload = false;
    settings.pack_alignment = 8;
    fs::write(&path, serde_json::to_string(&settings).unwrap()).unwrap();

    let loaded = Settings::load(&path).unwrap();
    assert!(!loaded.hot_reload);
    assert_eq!(loaded.pack_alignment, 8);

    match Settings::load(dir.path().join("missing.json")) {
        Err(Error::Io(_)) => {}
        _ => panic!(),
    }
}
