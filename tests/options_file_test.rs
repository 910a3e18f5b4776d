/// Integrationstest: Optionen-Datei schreiben, lesen und fehlerhafte Dateien tolerieren
use facility_scene_authoring::EngineOptions;

fn temp_file(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("fsa-{}-{}", std::process::id(), name))
}

#[test]
fn test_options_survive_save_and_load() {
    let path = temp_file("options.toml");
    let mut opts = EngineOptions::default();
    opts.floor_expand_interval = 6.0;
    opts.train_min_body_cars = 3;

    opts.save_to_file(&path).unwrap();
    let loaded = EngineOptions::load_from_file(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, opts);
}

#[test]
fn test_broken_file_falls_back_to_defaults() {
    let path = temp_file("broken.toml");
    std::fs::write(&path, "rotate_smoothing = \"schnell\"\n").unwrap();

    let loaded = EngineOptions::load_from_file(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, EngineOptions::default());
}
