use sqlx::PgConnection;

/// A checked-out database connection. The connection goes back to its provider when
/// the handle is dropped, so holding a handle in a local binding scopes the checkout
/// to that block.
pub trait ConnectionHandle {
    /// Retrieve a mutable reference to the live connection
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Supplies connections to external systems so business logic stays agnostic of how
/// those connections are obtained
pub trait ExternalConnectivity {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    /// Check out a single connection to the database
    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}
