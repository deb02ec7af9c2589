//! Worklist query and SDS updates on the `molecule` table.

use crate::error::DatabaseError;
use crate::types::Worklist;
use crate::{Error, Result};
use async_trait::async_trait;

use super::{Database, MoleculeStore};

#[async_trait]
impl MoleculeStore for Database {
    async fn missing_sds_cas_numbers(&self, legacy_source_label: &str) -> Result<Worklist> {
        let rows: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT cas_nr FROM molecule
            WHERE cas_nr != ''
              AND (default_safety_sheet_blob IS NULL
                   OR default_safety_sheet_by IS NULL
                   OR default_safety_sheet_by = ?)
            "#,
        )
        .bind(legacy_source_label)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to list molecules without SDS: {}",
                e
            )))
        })?;

        Ok(rows.into_iter().collect())
    }

    async fn store_sds(
        &self,
        cas_nr: &str,
        source_label: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE molecule SET
                default_safety_sheet_blob = ?,
                default_safety_sheet_by = ?,
                default_safety_sheet_url = NULL,
                default_safety_sheet_mime = ?
            WHERE cas_nr = ?
            "#,
        )
        .bind(bytes.to_vec())
        .bind(source_label)
        .bind(mime_type)
        .bind(cas_nr)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::UpdateFailed {
                cas_nr: cas_nr.to_string(),
                reason: e.to_string(),
            })
        })?;

        Ok(result.rows_affected())
    }
}
