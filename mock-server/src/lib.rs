use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicI64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub nom: String,
    pub numero: u32,
}

#[derive(Deserialize)]
pub struct NewContact {
    pub nom: String,
    pub numero: u32,
}

#[derive(Deserialize)]
pub struct ContactPatch {
    pub nom: Option<String>,
    pub numero: Option<u32>,
}

/// Shared server state. Cloning yields another handle to the same state, so
/// tests can keep one to flip health or inspect the stored contacts while
/// the server runs.
#[derive(Clone, Default)]
pub struct MockState {
    contacts: Arc<RwLock<BTreeMap<i64, Contact>>>,
    next_id: Arc<AtomicI64>,
    unhealthy: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let next = contacts.iter().map(|c| c.id).max().unwrap_or(0);
        let mut state = Self::default();
        state.next_id.store(next, Ordering::SeqCst);
        state.contacts = Arc::new(RwLock::new(
            contacts.into_iter().map(|c| (c.id, c)).collect(),
        ));
        state
    }

    /// Makes `/health` answer 503.
    pub fn set_unhealthy(&self, unhealthy: bool) {
        self.unhealthy.store(unhealthy, Ordering::SeqCst);
    }

    /// Makes every POST/PUT/DELETE answer 500.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn contacts(&self) -> Vec<Contact> {
        self.contacts.read().await.values().cloned().collect()
    }

    fn writes_fail(&self) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
    }
}

pub fn app() -> Router {
    app_with(MockState::new())
}

pub fn app_with(state: MockState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/{id}", put(update_contact).delete(delete_contact))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockState::new()).await
}

pub async fn run_with(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock contacts API listening");
    }
    axum::serve(listener, app_with(state)).await
}

async fn health(State(state): State<MockState>) -> (StatusCode, Json<Value>) {
    if state.unhealthy.load(Ordering::SeqCst) {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"status": "down"})))
    } else {
        (StatusCode::OK, Json(json!({"status": "ok"})))
    }
}

async fn list_contacts(State(state): State<MockState>) -> Json<Vec<Contact>> {
    Json(state.contacts().await)
}

async fn create_contact(
    State(state): State<MockState>,
    Json(input): Json<NewContact>,
) -> Result<(StatusCode, Json<Contact>), StatusCode> {
    if state.writes_fail() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let contact = Contact {
        id: state.next_id.fetch_add(1, Ordering::SeqCst) + 1,
        nom: input.nom,
        numero: input.numero,
    };
    state.contacts.write().await.insert(contact.id, contact.clone());
    info!(id = contact.id, "created contact");
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn update_contact(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Json(input): Json<ContactPatch>,
) -> Result<Json<Contact>, StatusCode> {
    if state.writes_fail() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let mut contacts = state.contacts.write().await;
    let contact = contacts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(nom) = input.nom {
        contact.nom = nom;
    }
    if let Some(numero) = input.numero {
        contact.numero = numero;
    }
    Ok(Json(contact.clone()))
}

async fn delete_contact(
    State(state): State<MockState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    if state.writes_fail() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let mut contacts = state.contacts.write().await;
    contacts.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_serializes_to_json() {
        let contact = Contact {
            id: 1,
            nom: "Mamadou Diallo".to_string(),
            numero: 624123456,
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["nom"], "Mamadou Diallo");
        assert_eq!(json["numero"], 624123456);
    }

    #[test]
    fn new_contact_rejects_string_numero() {
        let result: Result<NewContact, _> =
            serde_json::from_str(r#"{"nom":"Ada","numero":"612345678"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn patch_all_fields_optional() {
        let input: ContactPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.nom.is_none());
        assert!(input.numero.is_none());
    }

    #[tokio::test]
    async fn seeded_state_continues_id_sequence() {
        let state = MockState::with_contacts(vec![Contact {
            id: 7,
            nom: "Seven".to_string(),
            numero: 612345678,
        }]);
        assert_eq!(state.contacts().await.len(), 1);
        assert_eq!(state.next_id.load(Ordering::SeqCst), 7);
    }
}
