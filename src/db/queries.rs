//! SQL query constants and builders
//!
//! Contains all SQL used by the PostgreSQL store.

/// Advisors table
pub const CREATE_ORIENTADORES: &str = r#"
    CREATE TABLE IF NOT EXISTS orientadores (
        id SERIAL PRIMARY KEY,
        nome VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        instituicao VARCHAR(255) NOT NULL
    )
"#;

/// Projects table
pub const CREATE_PROJETOS: &str = r#"
    CREATE TABLE IF NOT EXISTS projetos (
        id SERIAL PRIMARY KEY,
        titulo VARCHAR(255) NOT NULL,
        descricao TEXT NOT NULL,
        data_inicio DATE,
        data_fim DATE
    )
"#;

/// Participants table
///
/// `projeto_id` deliberately carries no foreign key constraint.
pub const CREATE_PARTICIPANTES: &str = r#"
    CREATE TABLE IF NOT EXISTS participantes (
        id SERIAL PRIMARY KEY,
        nome VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        colegio VARCHAR(255) NOT NULL,
        cidade VARCHAR(255) NOT NULL,
        projeto_id INTEGER
    )
"#;

/// Schema bootstrap, in execution order
pub const SCHEMA: &[&str] = &[CREATE_ORIENTADORES, CREATE_PROJETOS, CREATE_PARTICIPANTES];

/// Connectivity probe
pub const PING: &str = "SELECT 1";

/// SQL builder for single-table CRUD statements
pub struct SqlBuilder;

impl SqlBuilder {
    /// Quote an identifier (table/column name) safely
    pub fn quote_ident(ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn column_list(columns: &[&str]) -> String {
        std::iter::once("id")
            .chain(columns.iter().copied())
            .map(Self::quote_ident)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `SELECT id, <columns> FROM <table> ORDER BY id`
    pub fn select_all(table: &str, columns: &[&str]) -> String {
        format!(
            "SELECT {} FROM {} ORDER BY \"id\"",
            Self::column_list(columns),
            Self::quote_ident(table)
        )
    }

    /// `SELECT id, <columns> FROM <table> WHERE id = $1`
    pub fn select_by_id(table: &str, columns: &[&str]) -> String {
        format!(
            "SELECT {} FROM {} WHERE \"id\" = $1",
            Self::column_list(columns),
            Self::quote_ident(table)
        )
    }

    /// `INSERT INTO <table> (<columns>) VALUES ($1..$n) RETURNING id, <columns>`
    pub fn insert(table: &str, columns: &[&str]) -> String {
        let names = columns
            .iter()
            .map(|c| Self::quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=columns.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            Self::quote_ident(table),
            names,
            placeholders,
            Self::column_list(columns)
        )
    }

    /// `UPDATE <table> SET c1 = $1, .. WHERE id = $n+1`
    pub fn update(table: &str, columns: &[&str]) -> String {
        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ${}", Self::quote_ident(c), i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {} WHERE \"id\" = ${}",
            Self::quote_ident(table),
            assignments,
            columns.len() + 1
        )
    }

    /// `DELETE FROM <table> WHERE id = $1`
    pub fn delete(table: &str) -> String {
        format!("DELETE FROM {} WHERE \"id\" = $1", Self::quote_ident(table))
    }
}
