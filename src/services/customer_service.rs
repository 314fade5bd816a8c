// src/services/customer_service.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::CustomerRepository,
    models::customer::{Customer, CustomerPayload},
};

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
}

impl CustomerService {
    pub fn new(repo: CustomerRepository) -> Self {
        Self { repo }
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor).await
    }

    pub async fn get<'e, E>(&self, executor: E, id: i32) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::CustomerNotFound(id))
    }

    pub async fn create<'e, E>(&self, executor: E, payload: CustomerPayload) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = self.repo.create(executor, &payload.normalized()).await?;
        tracing::info!(id = customer.id, "Cliente cadastrado");
        Ok(customer)
    }

    pub async fn update<'e, E>(&self, executor: E, id: i32, payload: CustomerPayload) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .update(executor, id, &payload.normalized())
            .await?
            .ok_or(AppError::CustomerNotFound(id))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if self.repo.delete(executor, id).await? == 0 {
            return Err(AppError::CustomerNotFound(id));
        }
        tracing::info!(id, "Cliente excluído");
        Ok(())
    }
}
