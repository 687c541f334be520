use sqlx::any::install_default_drivers;
use sqlx::{AnyConnection, Connection};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, StoreError, is_foreign_key_violation, is_unique_violation};
use crate::models::{Client, ClientChanges, ClientFilter, ClientMatch, NewClient, Phone};

mod schema;

pub use schema::Backend;

/// Contact store operating on a caller-owned connection.
///
/// Every operation is its own unit of work: it opens a transaction, runs its
/// statements in order and commits before returning. Opening, pooling and
/// closing the connection stay with the caller.
pub struct ContactStore<'c> {
    conn: &'c mut AnyConnection,
}

impl<'c> ContactStore<'c> {
    pub fn new(conn: &'c mut AnyConnection) -> Self {
        Self { conn }
    }

    /// Create the `clients` and `phones` tables if they do not exist yet
    pub async fn initialize_schema(&mut self) -> Result<()> {
        let backend = Backend::from_name(self.conn.backend_name())?;

        let mut tx = self.conn.begin().await.map_err(StoreError::Schema)?;
        for statement in backend.schema() {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(StoreError::Schema)?;
        }
        tx.commit().await.map_err(StoreError::Schema)?;

        info!(?backend, "schema ready");
        Ok(())
    }

    /// Insert a client and its phones atomically, returning the new id
    pub async fn create_client(&mut self, client: &NewClient) -> Result<i64> {
        let mut tx = self.conn.begin().await?;

        let client_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO clients (first_name, last_name, email)
            VALUES ($1, $2, $3)
            RETURNING client_id
            "#,
        )
        .bind(client.first_name.as_deref())
        .bind(client.last_name.as_deref())
        .bind(client.email.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| client_error(err, client.email.as_deref()))?;

        for phone_number in &client.phones {
            insert_phone(&mut tx, client_id, phone_number).await?;
        }

        tx.commit().await?;

        info!(client_id, phones = client.phones.len(), "client created");
        Ok(client_id)
    }

    /// Attach a phone number to an existing client
    pub async fn add_phone(&mut self, client_id: i64, phone_number: &str) -> Result<()> {
        let mut tx = self.conn.begin().await?;
        insert_phone(&mut tx, client_id, phone_number).await?;
        tx.commit().await?;

        debug!(client_id, phone_number, "phone added");
        Ok(())
    }

    /// Apply a partial update, then append any new phones.
    ///
    /// The field update and each phone insert commit separately: a failing
    /// phone leaves the field update and the phones added before it in place.
    /// A field update that matches no row yields [`StoreError::NotFound`].
    pub async fn update_client(&mut self, client_id: i64, changes: &ClientChanges) -> Result<()> {
        if changes.has_field_changes() {
            let mut tx = self.conn.begin().await?;

            let result = sqlx::query(
                r#"
                UPDATE clients
                SET first_name = COALESCE($1, first_name),
                    last_name = COALESCE($2, last_name),
                    email = COALESCE($3, email)
                WHERE client_id = $4
                "#,
            )
            .bind(changes.first_name_value())
            .bind(changes.last_name_value())
            .bind(changes.email_value())
            .bind(client_id)
            .execute(&mut *tx)
            .await
            .map_err(|err| client_error(err, changes.email_value()))?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(client_id));
            }

            tx.commit().await?;
            debug!(client_id, "client fields updated");
        }

        for phone_number in &changes.phones {
            self.add_phone(client_id, phone_number).await?;
        }

        Ok(())
    }

    /// Remove one phone of a client; returns the number of rows deleted
    pub async fn delete_phone(&mut self, client_id: i64, phone_number: &str) -> Result<u64> {
        let mut tx = self.conn.begin().await?;

        let deleted = sqlx::query("DELETE FROM phones WHERE client_id = $1 AND phone_number = $2")
            .bind(client_id)
            .bind(phone_number)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        debug!(client_id, phone_number, deleted, "phone delete");
        Ok(deleted)
    }

    /// Remove a client and all of its phones; returns the number of clients deleted
    pub async fn delete_client(&mut self, client_id: i64) -> Result<u64> {
        let mut tx = self.conn.begin().await?;

        // Phones first, the foreign key has no cascade
        let phones = sqlx::query("DELETE FROM phones WHERE client_id = $1")
            .bind(client_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM clients WHERE client_id = $1")
            .bind(client_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        info!(client_id, deleted, phones, "client delete");
        Ok(deleted)
    }

    /// Look clients up by exact match.
    ///
    /// A phone criterion takes precedence and joins the matching number into
    /// each row. Otherwise the given name and email criteria are combined with
    /// AND. With no criteria at all nothing is queried and the result is empty.
    pub async fn find_client(&mut self, filter: &ClientFilter) -> Result<Vec<ClientMatch>> {
        if let Some(phone) = filter.phone_value() {
            let rows = sqlx::query_as::<_, ClientMatch>(
                r#"
                SELECT c.client_id, c.first_name, c.last_name, c.email, p.phone_number
                FROM clients c
                INNER JOIN phones p ON c.client_id = p.client_id
                WHERE p.phone_number = $1
                "#,
            )
            .bind(phone)
            .fetch_all(&mut *self.conn)
            .await?;

            return Ok(rows);
        }

        if filter.is_empty() {
            debug!("find_client called without criteria");
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ClientMatch>(
            r#"
            SELECT client_id, first_name, last_name, email, CAST(NULL AS TEXT) AS phone_number
            FROM clients
            WHERE ($1 IS NULL OR first_name = $1)
              AND ($2 IS NULL OR last_name = $2)
              AND ($3 IS NULL OR email = $3)
            "#,
        )
        .bind(filter.first_name_value())
        .bind(filter.last_name_value())
        .bind(filter.email_value())
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }

    /// Fetch one client row, `None` when the id is unknown
    pub async fn get_client(&mut self, client_id: i64) -> Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT client_id, first_name, last_name, email FROM clients WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(client)
    }

    /// All phones of a client in insertion order
    pub async fn list_phones(&mut self, client_id: i64) -> Result<Vec<Phone>> {
        let phones = sqlx::query_as::<_, Phone>(
            "SELECT phone_id, client_id, phone_number FROM phones WHERE client_id = $1 ORDER BY phone_id",
        )
        .bind(client_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(phones)
    }
}

async fn insert_phone(conn: &mut AnyConnection, client_id: i64, phone_number: &str) -> Result<()> {
    sqlx::query("INSERT INTO phones (client_id, phone_number) VALUES ($1, $2)")
        .bind(client_id)
        .bind(phone_number)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::DuplicatePhone {
                    phone_number: phone_number.to_string(),
                    source: err,
                }
            } else if is_foreign_key_violation(&err) {
                StoreError::Reference { client_id, source: err }
            } else {
                StoreError::Database(err)
            }
        })?;

    Ok(())
}

// The only unique column on `clients` is `email`
fn client_error(err: sqlx::Error, email: Option<&str>) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::DuplicateEmail {
            email: email.unwrap_or_default().to_string(),
            source: err,
        }
    } else {
        StoreError::Database(err)
    }
}

/// Open a single connection from the configured URL
pub async fn connect(config: &Config) -> Result<AnyConnection> {
    install_default_drivers();

    let conn = AnyConnection::connect(config.database_url()).await?;
    debug!(backend = conn.backend_name(), "connection established");

    Ok(conn)
}
