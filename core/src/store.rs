//! In-memory contact list with remote-or-local execution per operation.
//!
//! # Design
//! Each operation is a short, independent transaction: validate, probe the
//! remote, execute against the API or the local list, then publish the new
//! list. The list lives behind `RwLock<Arc<Vec<Contact>>>` and every mutation
//! builds a fresh vector and swaps it in within a single write-lock critical
//! section, so readers only ever see whole lists. No lock is held across a
//! network await; concurrent operations apply in completion order and the
//! last writer wins.
//!
//! Contacts coming back from the server pass the same schema as user input,
//! and must keep ids unique, before they reach the list. A reply that fails
//! either check is treated as a remote failure.
//!
//! Outcomes are explicit (`StoreOutcome`) and nothing propagates as an error
//! to the host. Each completed operation emits exactly one notification.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::client::ContactClient;
use crate::config::Config;
use crate::error::ApiError;
use crate::notify::{Notifier, TracingNotifier};
use crate::probe::AvailabilityProbe;
use crate::schema::{ContactSchema, FieldErrors};
use crate::seed::initial_contacts;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Contact, ContactFormData, ContactId, ContactPatch, NewContact};
use crate::validation::{Field, PHONE_DIGITS_ONLY};

/// Result of a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome<T> {
    Ok(T),
    /// Input failed the contact schema; nothing was sent or changed.
    ValidationFailed(FieldErrors),
    /// The remote call failed; the list is unchanged.
    RemoteFailed(String),
    /// The target id is not in the list.
    NotFound(ContactId),
}

impl<T> StoreOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, StoreOutcome::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            StoreOutcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            StoreOutcome::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }

    /// Collapses the outcome into the `{success, errors}` shape forms use.
    pub fn report(&self) -> OperationReport {
        OperationReport {
            success: self.is_ok(),
            errors: self.field_errors().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    pub success: bool,
    pub errors: Option<FieldErrors>,
}

pub struct StoreBuilder {
    config: Config,
    transport: Option<Arc<dyn Transport>>,
    notifier: Option<Arc<dyn Notifier>>,
    seed: Option<Vec<Contact>>,
}

impl StoreBuilder {
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Replaces the bundled fallback list.
    pub fn seed(mut self, contacts: Vec<Contact>) -> Self {
        self.seed = Some(contacts);
        self
    }

    /// Builds the store and loads the initial list.
    pub async fn init(self) -> ContactStore {
        let client = ContactClient::new(&self.config.base_url);
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier));
        let probe = AvailabilityProbe::new(client.clone(), transport.clone(), self.config.timeout);

        let mut store = ContactStore {
            client,
            transport,
            probe,
            notifier,
            schema: ContactSchema,
            contacts: RwLock::new(Arc::new(Vec::new())),
            load_error: None,
            last_local_id: AtomicI64::new(0),
        };
        let seed = self.seed.unwrap_or_else(initial_contacts);
        store.load(seed).await;
        store
    }
}

pub struct ContactStore {
    client: ContactClient,
    transport: Arc<dyn Transport>,
    probe: AvailabilityProbe,
    notifier: Arc<dyn Notifier>,
    schema: ContactSchema,
    contacts: RwLock<Arc<Vec<Contact>>>,
    load_error: Option<String>,
    last_local_id: AtomicI64,
}

impl ContactStore {
    pub fn builder(config: Config) -> StoreBuilder {
        StoreBuilder {
            config,
            transport: None,
            notifier: None,
            seed: None,
        }
    }

    /// Snapshot of the current list.
    pub async fn contacts(&self) -> Arc<Vec<Contact>> {
        self.contacts.read().await.clone()
    }

    pub async fn get(&self, id: &ContactId) -> Option<Contact> {
        self.contacts.read().await.iter().find(|c| &c.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.contacts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contacts.read().await.is_empty()
    }

    /// Non-fatal error recorded while loading the initial list.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub async fn is_remote_available(&self) -> bool {
        self.probe.is_remote_available().await
    }

    async fn load(&mut self, seed: Vec<Contact>) {
        let contacts = if self.probe.is_remote_available().await {
            match self.fetch_remote().await {
                Ok(list) => {
                    info!(count = list.len(), "loaded contacts from remote");
                    list
                }
                Err(e) => {
                    warn!(error = %e, "remote list failed, using bundled contacts");
                    let message = format!("Failed to load contacts: {e}");
                    self.notifier.error(&message);
                    self.load_error = Some(message);
                    seed
                }
            }
        } else {
            debug!("remote unavailable, using bundled contacts");
            seed
        };
        *self.contacts.get_mut() = Arc::new(contacts);
    }

    async fn fetch_remote(&self) -> Result<Vec<Contact>, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_list_contacts(), None)
            .await?;
        let list = self.client.parse_list_contacts(response)?;
        let mut seen = HashSet::with_capacity(list.len());
        for contact in &list {
            if !seen.insert(&contact.id) {
                return Err(ApiError::ConflictingId(contact.id.clone()));
            }
            self.check_remote(contact)?;
        }
        Ok(list)
    }

    async fn create_remote(&self, input: &NewContact) -> Result<Contact, ApiError> {
        let request = self.client.build_create_contact(input)?;
        let response = self.transport.execute(request, None).await?;
        let contact = self.client.parse_create_contact(response)?;
        self.check_remote(&contact)?;
        Ok(contact)
    }

    async fn update_remote(
        &self,
        id: &ContactId,
        patch: &ContactPatch,
    ) -> Result<Contact, ApiError> {
        let request = self.client.build_update_contact(id, patch)?;
        let response = self.transport.execute(request, None).await?;
        let contact = self.client.parse_update_contact(response)?;
        if &contact.id != id {
            return Err(ApiError::ConflictingId(contact.id));
        }
        self.check_remote(&contact)?;
        Ok(contact)
    }

    async fn delete_remote(&self, id: &ContactId) -> Result<(), ApiError> {
        let request = self.client.build_delete_contact(id);
        let response = self.transport.execute(request, None).await?;
        self.client.parse_delete_contact(response)
    }

    /// Validates `form` and appends the new contact.
    pub async fn add(&self, form: &ContactFormData) -> StoreOutcome<Contact> {
        debug!(?form, "adding contact");
        let validation = self.schema.validate(form);
        if let Some(errors) = validation.errors {
            return self.reject(errors);
        }
        let Some(new_contact) = form.to_new_contact() else {
            let errors = FieldErrors::from([(Field::PhoneNumber, PHONE_DIGITS_ONLY.to_string())]);
            return self.reject(errors);
        };

        if !self.probe.is_remote_available().await {
            let contact = {
                let mut guard = self.contacts.write().await;
                let id = ContactId::Int(self.next_local_id(&guard));
                let contact = new_contact.with_id(id);
                let mut next = Vec::with_capacity(guard.len() + 1);
                next.extend(guard.iter().cloned());
                next.push(contact.clone());
                *guard = Arc::new(next);
                contact
            };
            info!(id = %contact.id, "contact added locally");
            self.notifier.success("Contact added (offline mode)");
            return StoreOutcome::Ok(contact);
        }

        match self.create_remote(&new_contact).await {
            Ok(contact) => {
                self.publish(|list| {
                    let mut next: Vec<Contact> =
                        list.iter().filter(|c| c.id != contact.id).cloned().collect();
                    next.push(contact.clone());
                    next
                })
                .await;
                info!(id = %contact.id, "contact added remotely");
                self.notifier.success("Contact added");
                StoreOutcome::Ok(contact)
            }
            Err(e) => self.remote_failure("add", "Failed to add contact", e),
        }
    }

    /// Applies `patch` to the contact with `id`.
    ///
    /// The merged record is re-validated before anything is sent.
    pub async fn update(&self, id: &ContactId, patch: &ContactPatch) -> StoreOutcome<Contact> {
        debug!(%id, ?patch, "updating contact");
        let Some(current) = self.get(id).await else {
            return self.not_found(id);
        };
        let merged = patch.apply_to(&current);
        let validation = self.schema.validate(&merged.to_form_data());
        if let Some(errors) = validation.errors {
            return self.reject(errors);
        }

        if !self.probe.is_remote_available().await {
            let updated = {
                let mut guard = self.contacts.write().await;
                let Some(latest) = guard.iter().find(|c| &c.id == id) else {
                    drop(guard);
                    return self.not_found(id);
                };
                let updated = patch.apply_to(latest);
                let next = guard
                    .iter()
                    .map(|c| if &c.id == id { updated.clone() } else { c.clone() })
                    .collect();
                *guard = Arc::new(next);
                updated
            };
            info!(%id, "contact updated locally");
            self.notifier.success("Contact updated");
            return StoreOutcome::Ok(updated);
        }

        match self.update_remote(id, patch).await {
            Ok(updated) => {
                self.publish(|list| {
                    list.iter()
                        .map(|c| if &c.id == id { updated.clone() } else { c.clone() })
                        .collect()
                })
                .await;
                info!(%id, "contact updated remotely");
                self.notifier.success("Contact updated");
                StoreOutcome::Ok(updated)
            }
            Err(e) => self.remote_failure("update", "Failed to update contact", e),
        }
    }

    /// Removes the contact with `id`.
    ///
    /// Returns `Ok(false)` without touching the network when `id` is not in
    /// the list.
    pub async fn delete(&self, id: &ContactId) -> StoreOutcome<bool> {
        debug!(%id, "deleting contact");
        if self.get(id).await.is_none() {
            debug!(%id, "delete of absent contact ignored");
            self.notifier.info("Contact already removed");
            return StoreOutcome::Ok(false);
        }

        if self.probe.is_remote_available().await {
            if let Err(e) = self.delete_remote(id).await {
                return self.remote_failure("delete", "Failed to delete contact", e);
            }
        }

        self.publish(|list| list.iter().filter(|c| &c.id != id).cloned().collect())
            .await;
        info!(%id, "contact deleted");
        self.notifier.success("Contact deleted");
        StoreOutcome::Ok(true)
    }

    /// Runs a server-supplied contact through the schema.
    fn check_remote(&self, contact: &Contact) -> Result<(), ApiError> {
        match self.schema.validate(&contact.to_form_data()).errors {
            None => Ok(()),
            Some(errors) => Err(ApiError::InvalidContact {
                id: contact.id.clone(),
                reason: errors.into_values().collect::<Vec<_>>().join("; "),
            }),
        }
    }

    async fn publish<F>(&self, f: F)
    where
        F: FnOnce(&[Contact]) -> Vec<Contact>,
    {
        let mut guard = self.contacts.write().await;
        let next = f(&guard);
        *guard = Arc::new(next);
    }

    /// Timestamp-based id, bumped past every integer id in `list` and every
    /// id issued before. Once `i64::MAX` is taken, falls back to the lowest
    /// positive id not in `list`. Must be called with the write lock held.
    fn next_local_id(&self, list: &[Contact]) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let max_existing = list.iter().filter_map(|c| c.id.as_int()).max().unwrap_or(0);
        let last = self.last_local_id.load(Ordering::Relaxed);
        let id = match (max_existing.checked_add(1), last.checked_add(1)) {
            (Some(after_existing), Some(after_last)) => now.max(after_existing).max(after_last),
            _ => lowest_free_id(list),
        };
        self.last_local_id.store(id, Ordering::Relaxed);
        id
    }

    fn reject<T>(&self, errors: FieldErrors) -> StoreOutcome<T> {
        let message = errors
            .values()
            .next()
            .map(String::as_str)
            .unwrap_or("Validation failed");
        warn!(?errors, "validation failed");
        self.notifier.error(message);
        StoreOutcome::ValidationFailed(errors)
    }

    fn not_found<T>(&self, id: &ContactId) -> StoreOutcome<T> {
        warn!(%id, "contact not found");
        self.notifier.error("Contact not found");
        StoreOutcome::NotFound(id.clone())
    }

    fn remote_failure<T>(&self, op: &str, message: &str, error: ApiError) -> StoreOutcome<T> {
        warn!(op, error = %error, "remote operation failed");
        self.notifier.error(message);
        StoreOutcome::RemoteFailed(error.to_string())
    }
}

fn lowest_free_id(list: &[Contact]) -> i64 {
    let taken: HashSet<i64> = list.iter().filter_map(|c| c.id.as_int()).collect();
    // `list` is finite, so a gap always exists.
    (1..=i64::MAX).find(|n| !taken.contains(n)).unwrap_or(0)
}
