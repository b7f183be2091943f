//! Generic SQL statement construction
//!
//! All statements are derived from the declarative table schemas, so column
//! names and ordinals have a single source of truth. Values are always
//! bound as numbered parameters; no value is ever spliced into the text.

use pandamonium_core::TableSchema;

/// `INSERT INTO t (c1, c2, ...) VALUES (?1, ?2, ...)` over every column.
pub fn insert_statement(schema: &TableSchema) -> String {
    let columns: Vec<&str> = schema.columns().collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("?{n}")).collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.table,
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// `SELECT c1, c2, ... FROM t WHERE column = ?1`, selecting every column in
/// schema order so rows decode positionally.
pub fn select_by_statement(schema: &TableSchema, column: &str) -> String {
    let columns: Vec<&str> = schema.columns().collect();

    format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        columns.join(", "),
        schema.table,
        column
    )
}

/// `UPDATE t SET a = ?1, b = ?2 WHERE uuid = ?3` over the given columns.
pub fn update_statement(schema: &TableSchema, columns: &[&'static str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{} = ?{}", column, index + 1))
        .collect();

    format!(
        "UPDATE {} SET {} WHERE uuid = ?{}",
        schema.table,
        assignments.join(", "),
        columns.len() + 1
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pandamonium_core::entities::BRANCH_SCHEMA;

    #[test]
    fn test_insert_statement() {
        assert_eq!(
            insert_statement(&BRANCH_SCHEMA),
            "INSERT INTO branches (uuid, name, bamboo_uuid) VALUES (?1, ?2, ?3)"
        );
    }

    #[test]
    fn test_select_by_statement() {
        assert_eq!(
            select_by_statement(&BRANCH_SCHEMA, "bamboo_uuid"),
            "SELECT uuid, name, bamboo_uuid FROM branches WHERE bamboo_uuid = ?1"
        );
    }

    #[test]
    fn test_update_statement() {
        assert_eq!(
            update_statement(&BRANCH_SCHEMA, &["name"]),
            "UPDATE branches SET name = ?1 WHERE uuid = ?2"
        );
        assert_eq!(
            update_statement(&BRANCH_SCHEMA, &["name", "bamboo_uuid"]),
            "UPDATE branches SET name = ?1, bamboo_uuid = ?2 WHERE uuid = ?3"
        );
    }
}
