use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool};
use std::env;
use std::future::Future;
use todo_service::app_env;
use todo_service::db::{self, PoolSettings};
use tokio::runtime::Runtime;

const SCHEMA: &str = include_str!("../../db/schema.sql");

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

/// A throwaway database which is dropped when the test finishes
struct TestDatabase {
    base_url: String,
    db_name: String,
}

impl TestDatabase {
    async fn create(base_url: &str) -> Result<Self, sqlx::Error> {
        let schema_id: u32 = thread_rng().gen_range(10_000..99_999);
        let db_name = format!("todo_test_db_{}", schema_id);
        let mut conn = PgConnection::connect(base_url).await?;

        sqlx::query(format!("CREATE DATABASE {}", db_name).as_str())
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        let mut test_conn = PgConnection::connect(&format!("{}/{}", base_url, db_name)).await?;
        sqlx::raw_sql(SCHEMA).execute(&mut test_conn).await?;
        test_conn.close().await?;

        Ok(Self {
            base_url: String::from(base_url),
            db_name,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.db_name)
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let db_to_drop = self.db_name.clone();
        let conn_str = self.base_url.clone();

        // Runs on a separate thread since the test itself is blocking on the runtime
        let drop_thread = std::thread::spawn(move || {
            TOKIO_RT.block_on(async move {
                let mut conn = match PgConnection::connect(conn_str.as_str()).await {
                    Ok(cxn) => cxn,
                    Err(conn_err) => {
                        println!(
                            "Failed to reconnect to database to drop test database {}, please remove it manually. Error: {}",
                            db_to_drop, conn_err
                        );
                        return;
                    }
                };

                let drop_query = format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", db_to_drop);
                if let Err(db_err) = sqlx::query(drop_query.as_str()).execute(&mut conn).await {
                    println!(
                        "Failed to drop test database {}, please remove it manually. Error: {}",
                        db_to_drop, db_err
                    );
                }
            })
        });
        let _ = drop_thread.join();
    }
}

/// Creates a temp database containing the to-do schema for a test, then hands the test a
/// pool connected to it.
///
/// Expects that the TEST_DB_URL environment variable is populated
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    R: Future<Output = ()>,
    F: FnOnce(PgPool) -> R,
{
    if dotenv::dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    let pg_connection_base_url = env::var(app_env::test::TEST_DB_URL).expect(
        "You must provide the TEST_DB_URL environment variable as the base postgres connection string",
    );
    let test_db = TOKIO_RT
        .block_on(TestDatabase::create(&pg_connection_base_url))
        .unwrap_or_else(|db_err| panic!("Failed to start test database: {}", db_err));

    TOKIO_RT.block_on(async {
        let sqlx_pool = db::connect_sqlx(&test_db.url(), &PoolSettings::default())
            .await
            .expect("Failed to connect to test database");
        test_fn(sqlx_pool.clone()).await;
        sqlx_pool.close().await;
    });
}
