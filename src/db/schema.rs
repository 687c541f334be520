use crate::error::{Result, StoreError};

/// SQL dialects the store knows how to create tables for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    /// Map the name reported by `AnyConnection::backend_name`
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "PostgreSQL" => Ok(Self::Postgres),
            "SQLite" => Ok(Self::Sqlite),
            other => Err(StoreError::UnsupportedBackend(other.to_string())),
        }
    }

    /// `CREATE TABLE IF NOT EXISTS` statements, parent table first
    pub fn schema(self) -> [&'static str; 2] {
        match self {
            Self::Postgres => [
                r#"
                CREATE TABLE IF NOT EXISTS clients (
                    client_id BIGSERIAL PRIMARY KEY,
                    first_name VARCHAR(50),
                    last_name VARCHAR(50),
                    email VARCHAR(100) UNIQUE
                )
                "#,
                r#"
                CREATE TABLE IF NOT EXISTS phones (
                    phone_id BIGSERIAL PRIMARY KEY,
                    client_id BIGINT NOT NULL REFERENCES clients(client_id),
                    phone_number VARCHAR(20) NOT NULL UNIQUE
                )
                "#,
            ],
            Self::Sqlite => [
                r#"
                CREATE TABLE IF NOT EXISTS clients (
                    client_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    first_name VARCHAR(50),
                    last_name VARCHAR(50),
                    email VARCHAR(100) UNIQUE
                )
                "#,
                r#"
                CREATE TABLE IF NOT EXISTS phones (
                    phone_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    client_id INTEGER NOT NULL REFERENCES clients(client_id),
                    phone_number VARCHAR(20) NOT NULL UNIQUE
                )
                "#,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_backend_names() {
        assert_eq!(Backend::from_name("PostgreSQL").unwrap(), Backend::Postgres);
        assert_eq!(Backend::from_name("SQLite").unwrap(), Backend::Sqlite);
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = Backend::from_name("MySQL").unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedBackend(name) if name == "MySQL"));
    }

    #[test]
    fn clients_table_is_created_before_phones() {
        for backend in [Backend::Postgres, Backend::Sqlite] {
            let [clients, phones] = backend.schema();
            assert!(clients.contains("CREATE TABLE IF NOT EXISTS clients"));
            assert!(phones.contains("REFERENCES clients(client_id)"));
        }
    }
}
