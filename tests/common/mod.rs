#![allow(dead_code)]

pub mod fake_browser;

use std::fs;
use std::path::Path;

use fnol_harness::config::Config;

/// Config pointing fixtures and results at `dir`, with short waits.
pub fn test_config(dir: &Path, extra: &[(&str, &str)]) -> Config {
    let data = dir.join("test-data");
    let results = dir.join("results");
    let mut pairs: Vec<(String, String)> = vec![
        ("browser".into(), "chrome".into()),
        ("environment".into(), "qa".into()),
        ("base.url.qa".into(), "https://cc.test/ClaimCenter.do".into()),
        ("explicit.wait".into(), "1".into()),
        ("implicit.wait".into(), "0".into()),
        ("test.data.dir".into(), data.display().to_string()),
        ("results.dir".into(), results.display().to_string()),
    ];
    pairs.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Config::from_pairs(pairs)
}

/// Write `content` to `dir/rel`, creating parent directories.
pub fn write_file(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
