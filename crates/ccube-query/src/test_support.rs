//! Temporary QA stores for unit tests.

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;

use ccube_store::QaStore;

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// A QA store in a temp directory that lives as long as the fixture.
pub struct StoreFixture {
    dir: TempDir,
}

impl StoreFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> QaStore {
        QaStore::open(self.dir.path())
    }

    pub fn index(&self, ids: &[&str]) {
        write(
            self.path(),
            "questions/index.json",
            &serde_json::to_string(ids).unwrap(),
        );
    }

    pub fn question(&self, q: Value) {
        let id = q["id"].as_str().unwrap().to_string();
        write(self.path(), &format!("questions/{id}.json"), &q.to_string());
    }

    pub fn answer(&self, question_id: &str, a: Value) {
        let id = a["id"].as_str().unwrap().to_string();
        write(
            self.path(),
            &format!("answers/{question_id}/{id}.json"),
            &a.to_string(),
        );
    }

    pub fn tag(&self, t: Value) {
        let name = t["name"].as_str().unwrap().to_string();
        write(self.path(), &format!("tags/{name}.json"), &t.to_string());
    }
}
