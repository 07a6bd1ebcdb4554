//! Recipe directory and SQLite database shared by command tests.

use std::fs;
use std::path::{Path, PathBuf};

use deft_core::datasource::{DataSource, Params, Record};
use deft_core::recipe::SourceSpec;
use tempfile::TempDir;

use super::CommandContext;

const FORM: &str = r#"
title: Ticket
comments: Keep subjects short.
source: main
columns:
  - name: id
    perms: [noedit]
  - name: subject
    title: Subject
  - name: status
    default: open
detail: SELECT id, subject, status FROM tickets WHERE id = :pk
insert: INSERT INTO tickets (id, subject, status) VALUES (:id, :subject, :status)
update: UPDATE tickets SET subject = :subject, status = :status WHERE id = :pk
"#;

const VIEW: &str = r#"
title: Tickets
source: main
list: SELECT id, subject, status FROM tickets ORDER BY id;
detail: SELECT * FROM tickets ORDER BY id
columns:
  - name: subject
    title: Subject
"#;

pub struct Fixture {
    dir: TempDir,
    source: SourceSpec,
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

impl Fixture {
    /// Creates a recipe directory and a database holding ticket 1.
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("records.db");
        fs::File::create(&db_path).unwrap();

        let source_yaml = format!("dialect: sqlite\ndbname: '{}'\n", db_path.display());
        let recipe = dir.path().join("recipe");
        write(&recipe, "sources/main.yaml", &source_yaml);
        write(&recipe, "forms/ticket.yaml", FORM);
        write(&recipe, "views/tickets.yaml", VIEW);

        let source: SourceSpec = serde_yaml_ng::from_str(&source_yaml).unwrap();
        let mut db = DataSource::open(&source).await.unwrap();
        db.execute(
            "CREATE TABLE tickets (id INTEGER PRIMARY KEY, subject TEXT NOT NULL, status TEXT NOT NULL)",
            &Params::new(),
        )
        .await
        .unwrap();
        db.execute(
            "INSERT INTO tickets (id, subject, status) VALUES (1, 'Printer jam', 'open')",
            &Params::new(),
        )
        .await
        .unwrap();
        db.close().await.unwrap();

        Self { dir, source }
    }

    pub fn recipe_dir(&self) -> PathBuf {
        self.dir.path().join("recipe")
    }

    /// All tickets ordered by id.
    pub async fn rows(&self) -> Vec<Record> {
        let mut db = DataSource::open(&self.source).await.unwrap();
        let rows = db
            .fetch_all("SELECT id, subject, status FROM tickets ORDER BY id", &Params::new())
            .await
            .unwrap();
        db.close().await.unwrap();
        rows
    }
}

/// A quiet, colorless context pointing at the fixture's recipe directory.
pub fn context(fixture: &Fixture) -> CommandContext {
    CommandContext {
        json_output: false,
        use_colors: false,
        quiet: true,
        verbose: false,
        recipe: Some(fixture.recipe_dir()),
        editor: None,
    }
}
