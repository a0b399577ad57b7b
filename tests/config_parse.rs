use chapterize::config::Config;

#[test]
fn example_config_parses() {
    let cfg: Config = toml::from_str(include_str!("../chapterize.example.toml")).unwrap();
    assert_eq!(cfg.toc.scan_pages, 15);
    assert_eq!(cfg.ocr.density_sample_pages, 5);
    assert_eq!(cfg.ocr.density_min_chars, 50);
    assert!(!cfg.classify.strict);
    assert_eq!(cfg.paths.scripts_dir, "scripts");
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg: Config = toml::from_str("[toc]\nscan_pages = 3\n").unwrap();
    assert_eq!(cfg.toc.scan_pages, 3);
    assert_eq!(cfg.ocr.dpi, 300);
    assert_eq!(cfg.source.python_exe, "python3");
    assert!(cfg.security.reject_url_inputs);
}

#[test]
fn normalized_form_is_stable() {
    let a = Config::default().normalized_for_hash();
    let b = Config::default().normalized_for_hash();
    assert_eq!(a, b);
    assert!(!a.is_empty());
}
