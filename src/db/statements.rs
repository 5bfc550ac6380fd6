//! SQL for account lifecycle operations.
//!
//! Statements are assembled from fixed keyword fragments plus quoted values.
//! MySQL rejects placeholders in account names, so names, hosts and secrets are
//! embedded as escaped string literals; the catalog lookup binds its filter.
//!
//! Escaping assumes the default SQL mode. Under `NO_BACKSLASH_ESCAPES` a
//! backslash in a name, host or password is stored doubled.

use sea_orm::{DbBackend, Statement, Value};

use crate::domain::{PasswordDialect, UserSpec};
use crate::services::user_service::UserError;

const REDACTED: &str = "'<redacted>'";

#[derive(Debug, Clone)]
enum Fragment {
    Keyword(&'static str),
    Literal(String),
    Secret(String),
    Param(Value),
}

/// A statement built from fragments, renderable with or without its secrets.
#[derive(Debug, Clone, Default)]
pub struct StatementTemplate {
    fragments: Vec<Fragment>,
}

impl StatementTemplate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn keyword(mut self, sql: &'static str) -> Self {
        self.fragments.push(Fragment::Keyword(sql));
        self
    }

    /// A single-quoted string literal.
    #[must_use]
    pub fn literal(mut self, value: &str) -> Self {
        self.fragments.push(Fragment::Literal(value.to_string()));
        self
    }

    /// A single-quoted string literal hidden from [`Self::redacted`].
    #[must_use]
    pub fn secret(mut self, value: &str) -> Self {
        self.fragments.push(Fragment::Secret(value.to_string()));
        self
    }

    /// `'name'@'host'`
    #[must_use]
    pub fn account(self, name: &str, host: &str) -> Self {
        self.literal(name).keyword("@").literal(host)
    }

    /// A `?` placeholder bound to `value`.
    #[must_use]
    pub fn param(mut self, value: impl Into<Value>) -> Self {
        self.fragments.push(Fragment::Param(value.into()));
        self
    }

    /// Full SQL text as sent to the server.
    #[must_use]
    pub fn sql(&self) -> String {
        self.render(false)
    }

    /// SQL text safe for logs.
    #[must_use]
    pub fn redacted(&self) -> String {
        self.render(true)
    }

    #[must_use]
    pub fn into_statement(self) -> Statement {
        let sql = self.sql();
        let values: Vec<Value> = self
            .fragments
            .into_iter()
            .filter_map(|fragment| match fragment {
                Fragment::Param(value) => Some(value),
                _ => None,
            })
            .collect();

        Statement::from_sql_and_values(DbBackend::MySql, sql, values)
    }

    fn render(&self, redact: bool) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Keyword(sql) => out.push_str(sql),
                Fragment::Literal(value) => push_quoted(&mut out, value),
                Fragment::Secret(_) if redact => out.push_str(REDACTED),
                Fragment::Secret(value) => push_quoted(&mut out, value),
                Fragment::Param(_) => out.push('?'),
            }
        }
        out
    }
}

fn push_quoted(out: &mut String, value: &str) {
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            _ => out.push(c),
        }
    }
    out.push('\'');
}

/// `CREATE USER`, with either an auth plugin clause or a password.
///
/// # Errors
///
/// Returns [`UserError::Validation`] for combinations rejected by
/// [`UserSpec::validate`]; no statement is produced in that case.
pub fn build_create(spec: &UserSpec) -> Result<StatementTemplate, UserError> {
    spec.validate()?;

    let stmt = StatementTemplate::new()
        .keyword("CREATE USER ")
        .account(&spec.name, &spec.host);

    Ok(match spec.auth_plugin {
        Some(plugin) => stmt.keyword(plugin.identified_with()),
        None => stmt
            .keyword(" IDENTIFIED BY ")
            .secret(spec.credential().secret()),
    })
}

#[must_use]
pub fn build_password_change(
    spec: &UserSpec,
    password: &str,
    dialect: PasswordDialect,
) -> StatementTemplate {
    match dialect {
        PasswordDialect::Legacy => StatementTemplate::new()
            .keyword("SET PASSWORD FOR ")
            .account(&spec.name, &spec.host)
            .keyword(" = PASSWORD(")
            .secret(password)
            .keyword(")"),
        PasswordDialect::Modern => StatementTemplate::new()
            .keyword("ALTER USER ")
            .account(&spec.name, &spec.host)
            .keyword(" IDENTIFIED BY ")
            .secret(password),
    }
}

/// Existence check by user name only; any host counts.
#[must_use]
pub fn build_read(name: &str) -> StatementTemplate {
    StatementTemplate::new()
        .keyword("SELECT USER FROM mysql.user WHERE USER = ")
        .param(name)
}

#[must_use]
pub fn build_drop(spec: &UserSpec) -> StatementTemplate {
    StatementTemplate::new()
        .keyword("DROP USER ")
        .account(&spec.name, &spec.host)
}
