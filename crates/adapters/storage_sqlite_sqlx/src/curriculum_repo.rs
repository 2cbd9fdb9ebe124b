//! `SQLite` implementation of [`TeachingRepository`] and
//! [`AddressRepository`].
//!
//! An address keeps its teachings in `address_teachings`, in the order they
//! were assigned. Deleting a teaching withdraws it from every address.

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, Sqlite, Transaction};

use casebook_app::ports::{AddressRepository, TeachingRepository};
use casebook_domain::curriculum::{Address, Teaching};
use casebook_domain::error::CasebookError;
use casebook_domain::id::{AddressId, TeachingId};

use crate::error::StorageError;
use crate::store::{SqliteStore, parse_id};

struct TeachingWrapper(Teaching);

impl<'r> FromRow<'r, SqliteRow> for TeachingWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        Ok(Self(Teaching {
            id: parse_id(&id)?,
            name: row.try_get("name")?,
        }))
    }
}

/// Address row without its teachings.
struct AddressWrapper(Address);

impl<'r> FromRow<'r, SqliteRow> for AddressWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        Ok(Self(Address {
            id: parse_id(&id)?,
            name: row.try_get("name")?,
            teachings: Vec::new(),
        }))
    }
}

const INSERT_TEACHING: &str = "INSERT INTO teachings (id, name, name_key) VALUES (?, ?, ?)";
const SELECT_TEACHING: &str = "SELECT * FROM teachings WHERE id = ?";
const SELECT_TEACHING_BY_KEY: &str = "SELECT * FROM teachings WHERE name_key = ?";
const SELECT_TEACHINGS: &str = "SELECT * FROM teachings ORDER BY name";
const UPDATE_TEACHING: &str = "UPDATE teachings SET name = ?, name_key = ? WHERE id = ?";
const DELETE_TEACHING: &str = "DELETE FROM teachings WHERE id = ?";

const INSERT_ADDRESS: &str = "INSERT INTO addresses (id, name, name_key) VALUES (?, ?, ?)";
const SELECT_ADDRESS: &str = "SELECT * FROM addresses WHERE id = ?";
const SELECT_ADDRESS_BY_KEY: &str = "SELECT * FROM addresses WHERE name_key = ?";
const SELECT_ADDRESSES: &str = "SELECT * FROM addresses ORDER BY name";
const UPDATE_ADDRESS: &str = "UPDATE addresses SET name = ?, name_key = ? WHERE id = ?";
const DELETE_ADDRESS: &str = "DELETE FROM addresses WHERE id = ?";

const INSERT_OFFER: &str =
    "INSERT INTO address_teachings (address_id, teaching_id, position) VALUES (?, ?, ?)";
const DELETE_OFFERS: &str = "DELETE FROM address_teachings WHERE address_id = ?";
const SELECT_OFFERS: &str =
    "SELECT teaching_id FROM address_teachings WHERE address_id = ? ORDER BY position";
const SELECT_ALL_OFFERS: &str =
    "SELECT address_id, teaching_id FROM address_teachings ORDER BY address_id, position";

async fn write_offers(
    tx: &mut Transaction<'_, Sqlite>,
    address: &Address,
) -> Result<(), StorageError> {
    sqlx::query(DELETE_OFFERS)
        .bind(address.id.to_string())
        .execute(&mut **tx)
        .await?;
    for (position, teaching) in (0_i64..).zip(&address.teachings) {
        sqlx::query(INSERT_OFFER)
            .bind(address.id.to_string())
            .bind(teaching.to_string())
            .bind(position)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

impl SqliteStore {
    async fn find_teaching(&self, query: &str, value: &str) -> Result<Option<Teaching>, CasebookError> {
        let row: Option<TeachingWrapper> = sqlx::query_as(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn find_address(&self, query: &str, value: &str) -> Result<Option<Address>, CasebookError> {
        let row: Option<AddressWrapper> = sqlx::query_as(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        match row {
            Some(AddressWrapper(mut address)) => {
                address.teachings = self.offers_of(address.id).await?;
                Ok(Some(address))
            }
            None => Ok(None),
        }
    }

    async fn offers_of(&self, address: AddressId) -> Result<Vec<TeachingId>, StorageError> {
        let rows: Vec<(String,)> = sqlx::query_as(SELECT_OFFERS)
            .bind(address.to_string())
            .fetch_all(&self.pool)
            .await?;
        let teachings = rows
            .iter()
            .map(|(id,)| parse_id(id))
            .collect::<Result<_, _>>()?;
        Ok(teachings)
    }

    async fn all_offers(&self) -> Result<HashMap<AddressId, Vec<TeachingId>>, StorageError> {
        let rows: Vec<(String, String)> = sqlx::query_as(SELECT_ALL_OFFERS)
            .fetch_all(&self.pool)
            .await?;
        let mut offers: HashMap<AddressId, Vec<TeachingId>> = HashMap::new();
        for (address, teaching) in &rows {
            offers
                .entry(parse_id(address)?)
                .or_default()
                .push(parse_id(teaching)?);
        }
        Ok(offers)
    }
}

impl TeachingRepository for SqliteStore {
    async fn create_teaching(&self, teaching: Teaching) -> Result<Teaching, CasebookError> {
        sqlx::query(INSERT_TEACHING)
            .bind(teaching.id.to_string())
            .bind(&teaching.name)
            .bind(teaching.name_key())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(teaching)
    }

    async fn get_teaching(&self, id: TeachingId) -> Result<Option<Teaching>, CasebookError> {
        self.find_teaching(SELECT_TEACHING, &id.to_string()).await
    }

    async fn find_teaching_by_name(&self, name_key: &str) -> Result<Option<Teaching>, CasebookError> {
        self.find_teaching(SELECT_TEACHING_BY_KEY, name_key).await
    }

    async fn list_teachings(&self) -> Result<Vec<Teaching>, CasebookError> {
        let rows: Vec<TeachingWrapper> = sqlx::query_as(SELECT_TEACHINGS)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update_teaching(&self, teaching: Teaching) -> Result<Teaching, CasebookError> {
        sqlx::query(UPDATE_TEACHING)
            .bind(&teaching.name)
            .bind(teaching.name_key())
            .bind(teaching.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(teaching)
    }

    async fn delete_teaching(&self, id: TeachingId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_TEACHING)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

impl AddressRepository for SqliteStore {
    async fn create_address(&self, address: Address) -> Result<Address, CasebookError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        sqlx::query(INSERT_ADDRESS)
            .bind(address.id.to_string())
            .bind(&address.name)
            .bind(address.name_key())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        write_offers(&mut tx, &address).await?;
        tx.commit().await.map_err(StorageError::from)?;

        Ok(address)
    }

    async fn get_address(&self, id: AddressId) -> Result<Option<Address>, CasebookError> {
        self.find_address(SELECT_ADDRESS, &id.to_string()).await
    }

    async fn find_address_by_name(&self, name_key: &str) -> Result<Option<Address>, CasebookError> {
        self.find_address(SELECT_ADDRESS_BY_KEY, name_key).await
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, CasebookError> {
        let rows: Vec<AddressWrapper> = sqlx::query_as(SELECT_ADDRESSES)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let mut offers = self.all_offers().await?;

        Ok(rows
            .into_iter()
            .map(|AddressWrapper(mut address)| {
                address.teachings = offers.remove(&address.id).unwrap_or_default();
                address
            })
            .collect())
    }

    async fn update_address(&self, address: Address) -> Result<Address, CasebookError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        sqlx::query(UPDATE_ADDRESS)
            .bind(&address.name)
            .bind(address.name_key())
            .bind(address.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        write_offers(&mut tx, &address).await?;
        tx.commit().await.map_err(StorageError::from)?;

        Ok(address)
    }

    async fn delete_address(&self, id: AddressId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_ADDRESS)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
