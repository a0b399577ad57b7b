use chapterize::config::Config;
use chapterize::util::{hash_input, job_id, HashMode};
use std::path::PathBuf;

fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("chapterize-jobs-{}-{name}", std::process::id()));
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn mode_strings_map_to_hash_modes() {
    assert_eq!(HashMode::from_config("full_sha256").unwrap(), HashMode::Full);
    assert_eq!(
        HashMode::from_config("fast_2x16mb").unwrap(),
        HashMode::Windowed
    );
    assert!(HashMode::from_config("crc32").is_err());
}

#[test]
fn same_config_and_input_resolve_to_the_same_job() {
    let cfg = Config::default();
    let path = temp_file("same.pdf", b"not really a pdf but stable bytes");

    let a = job_id(&cfg, &path).unwrap();
    let b = job_id(&cfg, &path).unwrap();
    assert_eq!(a, b);

    std::fs::remove_file(&path).ok();
}

#[test]
fn changed_input_or_config_changes_the_job() {
    let cfg = Config::default();
    let a = temp_file("a.pdf", b"first document");
    let b = temp_file("b.pdf", b"second document");

    let id_a = job_id(&cfg, &a).unwrap();
    let id_b = job_id(&cfg, &b).unwrap();
    assert_ne!(id_a, id_b);

    let mut other_cfg = Config::default();
    other_cfg.toc.scan_pages = 3;
    let id_a2 = job_id(&other_cfg, &a).unwrap();
    assert_ne!(id_a, id_a2);

    std::fs::remove_file(&a).ok();
    std::fs::remove_file(&b).ok();
}

#[test]
fn windowed_hash_sees_head_tail_and_length() {
    let mut cfg = Config::default();
    cfg.hashing.fast_window_bytes = 4;

    // Same 4-byte head and tail, different middles.
    let a = temp_file("win-a.bin", b"headMIDDLEtail");
    let b = temp_file("win-b.bin", b"headCENTERtail");
    assert_eq!(hash_input(&cfg, &a).unwrap(), hash_input(&cfg, &b).unwrap());

    // A longer middle changes the length and therefore the hash.
    let c = temp_file("win-c.bin", b"headMIDDLEMIDDLEtail");
    assert_ne!(hash_input(&cfg, &a).unwrap(), hash_input(&cfg, &c).unwrap());

    // The full mode does see the middle.
    cfg.hashing.mode = "full_sha256".to_string();
    assert_ne!(hash_input(&cfg, &a).unwrap(), hash_input(&cfg, &b).unwrap());

    for p in [a, b, c] {
        std::fs::remove_file(&p).ok();
    }
}
