//! Curriculum service: teachings and the study addresses offering them.

use casebook_domain::curriculum::{Address, Teaching, name_key};
use casebook_domain::error::{CasebookError, ConflictError};
use casebook_domain::id::{AddressId, TeachingId};

use crate::ports::{AddressRepository, TeachingRepository};

pub struct CurriculumService<S> {
    store: S,
}

impl<S: TeachingRepository + AddressRepository> CurriculumService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] for a blank or overlong name,
    /// [`ConflictError::TeachingExists`] when the name is taken ignoring
    /// case, or a storage error.
    pub async fn create_teaching(&self, name: &str) -> Result<Teaching, CasebookError> {
        let teaching = Teaching::new(name)?;
        self.ensure_teaching_name_free(&teaching, None).await?;
        let teaching = self.store.create_teaching(teaching).await?;
        tracing::info!(teaching_id = %teaching.id, name = %teaching.name, "teaching created");
        Ok(teaching)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn get_teaching(&self, id: TeachingId) -> Result<Teaching, CasebookError> {
        self.store
            .get_teaching(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_teachings(&self) -> Result<Vec<Teaching>, CasebookError> {
        self.store.list_teachings().await
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`], [`CasebookError::Validation`],
    /// [`ConflictError::TeachingExists`] or a storage error.
    pub async fn rename_teaching(&self, id: TeachingId, name: &str) -> Result<Teaching, CasebookError> {
        let mut teaching = self.get_teaching(id).await?;
        teaching.rename(name)?;
        self.ensure_teaching_name_free(&teaching, Some(id)).await?;
        let teaching = self.store.update_teaching(teaching).await?;
        tracing::info!(teaching_id = %id, name = %teaching.name, "teaching renamed");
        Ok(teaching)
    }

    /// Delete a teaching and withdraw it from every address.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn delete_teaching(&self, id: TeachingId) -> Result<(), CasebookError> {
        self.get_teaching(id).await?;
        self.store.delete_teaching(id).await?;
        tracing::info!(teaching_id = %id, "teaching deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] for a blank or overlong name,
    /// [`ConflictError::AddressExists`] when the name is taken ignoring case,
    /// or a storage error.
    pub async fn create_address(&self, name: &str) -> Result<Address, CasebookError> {
        let address = Address::new(name)?;
        if self
            .store
            .find_address_by_name(&address.name_key())
            .await?
            .is_some()
        {
            tracing::warn!(name = %address.name, "address creation rejected, name taken");
            return Err(ConflictError::AddressExists(address.name).into());
        }
        let address = self.store.create_address(address).await?;
        tracing::info!(address_id = %address.id, name = %address.name, "address created");
        Ok(address)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn get_address(&self, id: AddressId) -> Result<Address, CasebookError> {
        self.store
            .get_address(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_addresses(&self) -> Result<Vec<Address>, CasebookError> {
        self.store.list_addresses().await
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn delete_address(&self, id: AddressId) -> Result<(), CasebookError> {
        self.get_address(id).await?;
        self.store.delete_address(id).await?;
        tracing::info!(address_id = %id, "address deleted");
        Ok(())
    }

    /// Offer a teaching at an address. Assigning it twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the address or teaching is
    /// missing, or a storage error.
    pub async fn assign_teaching(
        &self,
        address: AddressId,
        teaching: TeachingId,
    ) -> Result<Address, CasebookError> {
        let mut target = self.get_address(address).await?;
        self.get_teaching(teaching).await?;
        if target.offers(teaching) {
            return Ok(target);
        }
        target.teachings.push(teaching);
        let target = self.store.update_address(target).await?;
        tracing::info!(address_id = %address, teaching_id = %teaching, "teaching assigned");
        Ok(target)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the address is missing, or a
    /// storage error.
    pub async fn remove_teaching(
        &self,
        address: AddressId,
        teaching: TeachingId,
    ) -> Result<Address, CasebookError> {
        let mut target = self.get_address(address).await?;
        if !target.offers(teaching) {
            return Ok(target);
        }
        target.teachings.retain(|t| *t != teaching);
        let target = self.store.update_address(target).await?;
        tracing::info!(address_id = %address, teaching_id = %teaching, "teaching removed");
        Ok(target)
    }

    async fn ensure_teaching_name_free(
        &self,
        teaching: &Teaching,
        except: Option<TeachingId>,
    ) -> Result<(), CasebookError> {
        match self.store.find_teaching_by_name(&name_key(&teaching.name)).await? {
            Some(existing) if Some(existing.id) != except => {
                tracing::warn!(name = %teaching.name, "teaching rejected, name taken");
                Err(ConflictError::TeachingExists(teaching.name.clone()).into())
            }
            _ => Ok(()),
        }
    }
}
