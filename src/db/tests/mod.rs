use super::*;
use tempfile::NamedTempFile;


/// Molecule inventory columns the finder reads and writes
const CREATE_MOLECULE_TABLE: &str = r#"
    CREATE TABLE molecule (
        molecule_id INTEGER PRIMARY KEY,
        cas_nr TEXT NOT NULL DEFAULT '',
        default_safety_sheet_blob BLOB,
        default_safety_sheet_by TEXT,
        default_safety_sheet_url TEXT,
        default_safety_sheet_mime TEXT
    )
"#;

/// Fresh SQLite database with an empty `molecule` table
async fn molecule_db() -> (Database, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let url = format!("sqlite://{}?mode=rwc", temp_file.path().display());
    let db = Database::connect(&url).await.unwrap();
    sqlx::query(CREATE_MOLECULE_TABLE)
        .execute(db.pool())
        .await
        .unwrap();
    (db, temp_file)
}

/// Insert a molecule row; `None` columns stay NULL
async fn insert_molecule(db: &Database, cas_nr: &str, sheet: Option<&[u8]>, by: Option<&str>) {
    let mut query = String::from("INSERT INTO molecule (cas_nr, default_safety_sheet_blob, default_safety_sheet_by, default_safety_sheet_url) VALUES (?, ");
    query.push_str(if sheet.is_some() { "?, " } else { "NULL, " });
    query.push_str(if by.is_some() { "?, " } else { "NULL, " });
    query.push_str("'https://old.example/sds.pdf')");

    let mut insert = sqlx::query(&query).bind(cas_nr.to_string());
    if let Some(sheet) = sheet {
        insert = insert.bind(sheet.to_vec());
    }
    if let Some(by) = by {
        insert = insert.bind(by.to_string());
    }
    insert.execute(db.pool()).await.unwrap();
}
