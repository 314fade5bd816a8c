// src/db/customer_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::customer::{Customer, CustomerPayload},
};

const CUSTOMER_COLUMNS: &str = "id, name, phone, street, number, neighborhood, city, state, \
     postal_code, complement, created_at, updated_at";

#[derive(Clone, Default)]
pub struct CustomerRepository;

impl CustomerRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name ASC, id ASC"
        ))
        .fetch_all(executor)
        .await?;
        Ok(customers)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i32) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(customer)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &CustomerPayload) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO customers
                (name, phone, street, number, neighborhood, city, state, postal_code, complement)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(&payload.name)
        .bind(&payload.phone)
        .bind(&payload.street)
        .bind(&payload.number)
        .bind(&payload.neighborhood)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.postal_code)
        .bind(&payload.complement)
        .fetch_one(executor)
        .await?;
        Ok(customer)
    }

    // Atualização completa: campos ausentes no payload viram NULL.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i32,
        payload: &CustomerPayload,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "UPDATE customers SET
                name = $2, phone = $3, street = $4, number = $5, neighborhood = $6,
                city = $7, state = $8, postal_code = $9, complement = $10,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.phone)
        .bind(&payload.street)
        .bind(&payload.number)
        .bind(&payload.neighborhood)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.postal_code)
        .bind(&payload.complement)
        .fetch_optional(executor)
        .await?;
        Ok(customer)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
