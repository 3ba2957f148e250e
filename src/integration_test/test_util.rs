use crate::{app_env, persistence};
use dotenv::dotenv;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool};
use std::env;

/// Schema applied to every throwaway test database
const SCHEMA: &str = include_str!("../../db/schema.sql");

/// A throwaway database created for a single test. Call [TestDatabase::drop_db] when the
/// test is done with it.
pub struct TestDatabase {
    base_url: String,
    db_name: String,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Creates a fresh database with the todo schema applied, using the TEST_DB_URL
    /// environment variable as the server to create it on
    pub async fn create() -> TestDatabase {
        if dotenv().is_err() {
            println!("Test is running without .env file.");
        }

        let base_url = env::var(app_env::test::TEST_DB_URL)
            .expect("You must provide the TEST_DB_URL environment variable as the base postgres connection string");
        let db_name = format!("test_db_{}", thread_rng().gen_range(10_000..99_999));

        let mut conn = PgConnection::connect(&base_url)
            .await
            .expect("could not create initial connection to provision database");
        sqlx::query(format!("CREATE DATABASE {db_name}").as_str())
            .execute(&mut conn)
            .await
            .unwrap_or_else(|db_err| panic!("Failed to create test database {db_name}: {db_err}"));
        let _ = conn.close().await;

        let pool = persistence::connect_sqlx(format!("{base_url}/{db_name}").as_str())
            .await
            .expect("could not connect to the test database");
        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .expect("could not apply the todo schema");

        TestDatabase {
            base_url,
            db_name,
            pool,
        }
    }

    /// Closes the pool and removes the database
    pub async fn drop_db(self) {
        self.pool.close().await;

        let conn = PgConnection::connect(&self.base_url).await;
        let mut conn = match conn {
            Ok(cxn) => cxn,
            Err(conn_err) => {
                println!(
                    "Failed to reconnect to database to drop test database {}, please remove it manually. Error: {}",
                    self.db_name, conn_err
                );
                return;
            }
        };

        let drop_result = sqlx::query(format!("DROP DATABASE {}", self.db_name).as_str())
            .execute(&mut conn)
            .await;
        if let Err(db_err) = drop_result {
            println!(
                "Failed to drop test database {}, please remove it manually. Error: {}",
                self.db_name, db_err
            );
        }
    }
}
