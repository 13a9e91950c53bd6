//! Stateless HTTP request builder and response parser for the contacts API.
//!
//! # Design
//! `ContactClient` holds only a `base_url` and carries no mutable state
//! between calls. Each REST operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Any 2xx status counts as success; the backing API is not
//! consistent about 200 vs 201 vs 204.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Contact, ContactId, ContactPatch, NewContact};

pub const HEALTH_PATH: &str = "/health";
pub const CONTACTS_PATH: &str = "/contacts";

/// Synchronous, stateless client for the contacts API.
///
/// An empty base URL means remote mode is disabled; callers check
/// [`ContactClient::is_configured`] before building requests.
#[derive(Debug, Clone)]
pub struct ContactClient {
    base_url: String,
}

impl ContactClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }

    pub fn build_health(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, HEALTH_PATH.to_string())
    }

    pub fn build_list_contacts(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, CONTACTS_PATH.to_string())
    }

    pub fn build_create_contact(&self, input: &NewContact) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.json(HttpMethod::Post, CONTACTS_PATH.to_string(), body))
    }

    pub fn build_update_contact(
        &self,
        id: &ContactId,
        input: &ContactPatch,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.json(HttpMethod::Put, format!("{CONTACTS_PATH}/{id}"), body))
    }

    pub fn build_delete_contact(&self, id: &ContactId) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("{CONTACTS_PATH}/{id}"))
    }

    /// `true` for any 2xx health response.
    pub fn parse_health(&self, response: &HttpResponse) -> bool {
        response.is_success()
    }

    pub fn parse_list_contacts(&self, response: HttpResponse) -> Result<Vec<Contact>, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_contact(&self, response: HttpResponse) -> Result<Contact, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_contact(&self, response: HttpResponse) -> Result<Contact, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_contact(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json(&self, method: HttpMethod, path: String, body: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        }
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ContactClient {
        ContactClient::new("http://localhost:3000")
    }

    #[test]
    fn build_health_produces_correct_request() {
        let req = client().build_health();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/health");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_contact_sends_numeric_numero() {
        let input = NewContact {
            nom: "Jean Dupont".to_string(),
            numero: 612345678,
        };
        let req = client().build_create_contact(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/contacts");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["nom"], "Jean Dupont");
        assert_eq!(body["numero"], 612345678);
    }

    #[test]
    fn build_update_contact_sends_only_changed_fields() {
        let input = ContactPatch {
            nom: None,
            numero: Some(698765432),
        };
        let req = client().build_update_contact(&ContactId::Int(4), &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/contacts/4");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["numero"], 698765432);
        assert!(body.get("nom").is_none());
    }

    #[test]
    fn build_delete_contact_with_text_id() {
        let req = client().build_delete_contact(&ContactId::Text("abc".to_string()));
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/contacts/abc");
        assert!(req.body.is_none());
    }

    #[test]
    fn empty_base_url_is_not_configured() {
        assert!(!ContactClient::new("").is_configured());
        assert!(!ContactClient::new("   ").is_configured());
        assert!(client().is_configured());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ContactClient::new("http://localhost:3000/");
        assert_eq!(client.build_list_contacts().path, "http://localhost:3000/contacts");
    }

    #[test]
    fn health_accepts_any_2xx() {
        assert!(client().parse_health(&HttpResponse::new(200, "")));
        assert!(client().parse_health(&HttpResponse::new(204, "")));
        assert!(!client().parse_health(&HttpResponse::new(503, "")));
        assert!(!client().parse_health(&HttpResponse::new(301, "")));
    }

    #[test]
    fn parse_create_contact_keeps_server_id() {
        let response = HttpResponse::new(201, r#"{"id":99,"nom":"Ada Bah","numero":623456789}"#);
        let contact = client().parse_create_contact(response).unwrap();
        assert_eq!(contact.id, ContactId::Int(99));
        assert_eq!(contact.nom, "Ada Bah");
    }

    #[test]
    fn parse_create_contact_wrong_status() {
        let response = HttpResponse::new(500, "internal error");
        let err = client().parse_create_contact(response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn parse_update_contact_not_found() {
        let err = client()
            .parse_update_contact(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_delete_contact_accepts_200_and_204() {
        assert!(client().parse_delete_contact(HttpResponse::new(200, "")).is_ok());
        assert!(client().parse_delete_contact(HttpResponse::new(204, "")).is_ok());
    }

    #[test]
    fn parse_list_contacts_bad_json() {
        let err = client()
            .parse_list_contacts(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
