//! Database access for views and forms.
//!
//! Every command opens a single [`DataSource`] through sqlx's `Any` driver,
//! so one binary talks to PostgreSQL, MySQL/MariaDB and SQLite. Statements
//! use named `:name` placeholders; [`bind_named`] rewrites them into the
//! positional form each database expects.

mod params;
mod record;

pub use params::{bind_named, infer_params, ParamValue, Params};
pub use record::Record;

use std::fmt;

use sqlx::any::AnyArguments;
use sqlx::AnyConnection;
use sqlx::query::Query;
use sqlx::{Any, Connection};
use thiserror::Error;
use tracing::debug;

use crate::recipe::SourceSpec;

pub type DataSourceResult<T> = std::result::Result<T, DataSourceError>;

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("unsupported database dialect '{0}' (expected postgresql, mysql or sqlite)")]
    UnsupportedDialect(String),

    #[error("cannot connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("missing value for parameter ':{0}'")]
    MissingParameter(String),

    #[error("duplicate key{}", .constraint.as_deref().map(|c| format!(" violates '{c}'")).unwrap_or_default())]
    DuplicateKey { constraint: Option<String> },

    #[error("{0}")]
    Statement(String),

    #[error("cannot decode column '{column}': {message}")]
    Decode { column: String, message: String },

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl DataSourceError {
    /// Classifies an error reported while running a statement.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => DataSourceError::DuplicateKey {
                constraint: db.constraint().map(str::to_string),
            },
            sqlx::Error::Database(db) => {
                let message = db.message();
                let first = message.lines().next().unwrap_or(message).trim();
                DataSourceError::Statement(first.to_string())
            }
            sqlx::Error::ColumnDecode { index, source } => DataSourceError::Decode {
                column: index,
                message: source.to_string(),
            },
            other => DataSourceError::Database(other),
        }
    }
}

/// Database family of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Resolves a recipe dialect name, case-insensitively.
    pub fn from_name(name: &str) -> DataSourceResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            _ => Err(DataSourceError::UnsupportedDialect(name.to_string())),
        }
    }

    /// Positional placeholder for the 1-based argument `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::MySql | Dialect::Sqlite => "?".to_string(),
        }
    }

    fn scheme(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

impl SourceSpec {
    pub fn dialect(&self) -> DataSourceResult<Dialect> {
        Dialect::from_name(&self.dialect)
    }

    /// Builds the connection URL for this source.
    pub fn url(&self) -> DataSourceResult<String> {
        let password = self
            .password
            .as_deref()
            .map(|p| urlencoding::encode(p).into_owned());
        self.build_url(password)
    }

    /// The connection URL with the password masked, for messages and logs.
    pub fn redacted_url(&self) -> DataSourceResult<String> {
        self.build_url(self.password.as_ref().map(|_| "***".to_string()))
    }

    fn build_url(&self, password: Option<String>) -> DataSourceResult<String> {
        let dialect = self.dialect()?;
        if dialect == Dialect::Sqlite {
            return Ok(if self.dbname.is_empty() || self.dbname == ":memory:" {
                "sqlite::memory:".to_string()
            } else {
                format!("sqlite://{}", self.dbname)
            });
        }

        let mut url = format!("{}://", dialect.scheme());
        if let Some(user) = &self.user {
            url.push_str(&urlencoding::encode(user));
            if let Some(password) = password {
                url.push(':');
                url.push_str(&password);
            }
            url.push('@');
        }
        url.push_str(self.host.as_deref().unwrap_or("localhost"));
        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }
        url.push('/');
        url.push_str(&urlencoding::encode(&self.dbname));
        Ok(url)
    }
}

/// An open connection to one data source.
pub struct DataSource {
    conn: AnyConnection,
    dialect: Dialect,
}

impl DataSource {
    /// Connects to the database described by `spec`.
    pub async fn open(spec: &SourceSpec) -> DataSourceResult<Self> {
        sqlx::any::install_default_drivers();
        let dialect = spec.dialect()?;
        let url = spec.url()?;
        let redacted = spec.redacted_url()?;
        debug!(url = %redacted, "connecting to data source");

        let conn = AnyConnection::connect(&url)
            .await
            .map_err(|source| DataSourceError::Connect {
                url: redacted,
                source,
            })?;
        Ok(Self { conn, dialect })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Runs a query and decodes every row.
    pub async fn fetch_all(&mut self, sql: &str, params: &Params) -> DataSourceResult<Vec<Record>> {
        let (sql, args) = bind_named(sql, params, self.dialect)?;
        debug!(sql = %sql, args = args.len(), "fetching rows");
        let rows = bind_all(sqlx::query(&sql), args)
            .fetch_all(&mut self.conn)
            .await
            .map_err(DataSourceError::from_sqlx)?;
        rows.iter().map(Record::from_row).collect()
    }

    /// Runs a query and decodes the first row, if any.
    pub async fn fetch_optional(
        &mut self,
        sql: &str,
        params: &Params,
    ) -> DataSourceResult<Option<Record>> {
        let (sql, args) = bind_named(sql, params, self.dialect)?;
        debug!(sql = %sql, args = args.len(), "fetching one row");
        let row = bind_all(sqlx::query(&sql), args)
            .fetch_optional(&mut self.conn)
            .await
            .map_err(DataSourceError::from_sqlx)?;
        row.as_ref().map(Record::from_row).transpose()
    }

    /// Executes a statement and returns the number of affected rows.
    pub async fn execute(&mut self, sql: &str, params: &Params) -> DataSourceResult<u64> {
        let (sql, args) = bind_named(sql, params, self.dialect)?;
        debug!(sql = %sql, args = args.len(), "executing statement");
        let result = bind_all(sqlx::query(&sql), args)
            .execute(&mut self.conn)
            .await
            .map_err(DataSourceError::from_sqlx)?;
        Ok(result.rows_affected())
    }

    pub async fn close(self) -> DataSourceResult<()> {
        self.conn.close().await.map_err(DataSourceError::from_sqlx)
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    args: Vec<ParamValue>,
) -> Query<'q, Any, AnyArguments<'q>> {
    for arg in args {
        query = match arg {
            ParamValue::Null => query.bind(None::<String>),
            ParamValue::Bool(b) => query.bind(b),
            ParamValue::Int(i) => query.bind(i),
            ParamValue::Float(f) => query.bind(f),
            ParamValue::Text(s) => query.bind(s),
        };
    }
    query
}
