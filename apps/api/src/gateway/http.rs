use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::USER_ID_HEADER;
use crate::gateway::{GatewayError, ResumeGateway};
use crate::models::record::StoredResume;
use crate::models::resume::ResumeDocument;

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Transport(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client of the resume API. The owner travels in the session header the
/// identity layer would otherwise inject.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/v1/resumes", self.base_url)
    }

    fn item_url(&self, id: Uuid) -> String {
        format!("{}/api/v1/resumes/{id}", self.base_url)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        owner: Uuid,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = request
            .header(USER_ID_HEADER, owner.to_string())
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ApiError>().await {
            Ok(body) => body.error.message,
            Err(_) => status.to_string(),
        };
        debug!("Resume API returned {status}: {message}");
        Err(map_status(status, message))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        owner: Uuid,
    ) -> Result<T, GatewayError> {
        Ok(self.send(request, owner).await?.json::<T>().await?)
    }
}

fn map_status(status: StatusCode, message: String) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED => GatewayError::Unauthorized,
        StatusCode::NOT_FOUND => GatewayError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            GatewayError::Validation(message)
        }
        _ => {
            warn!("Resume API failure (status {status}): {message}");
            GatewayError::Transport(format!("status {status}: {message}"))
        }
    }
}

#[async_trait]
impl ResumeGateway for HttpGateway {
    async fn list(&self, owner: Uuid) -> Result<Vec<StoredResume>, GatewayError> {
        self.send_json(self.client.get(self.collection_url()), owner)
            .await
    }

    async fn get(&self, id: Uuid, owner: Uuid) -> Result<StoredResume, GatewayError> {
        self.send_json(self.client.get(self.item_url(id)), owner).await
    }

    async fn create(
        &self,
        owner: Uuid,
        document: &ResumeDocument,
    ) -> Result<StoredResume, GatewayError> {
        self.send_json(self.client.post(self.collection_url()).json(document), owner)
            .await
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        document: &ResumeDocument,
    ) -> Result<StoredResume, GatewayError> {
        self.send_json(self.client.put(self.item_url(id)).json(document), owner)
            .await
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), GatewayError> {
        self.send(self.client.delete(self.item_url(id)), owner)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::gateway::InMemoryGateway;
    use crate::routes::build_router;
    use crate::state::AppState;
    use crate::wizard::{DocumentStore, SaveOutcome, StoreOptions};

    /// Serves the API over the in-memory gateway on an ephemeral port.
    async fn serve() -> String {
        let app = build_router(AppState {
            gateway: Arc::new(InMemoryGateway::new()),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_store_round_trips_through_api() {
        let base = serve().await;
        let owner = Uuid::new_v4();
        let options = StoreOptions {
            autosave: false,
            ..Default::default()
        };
        let store = DocumentStore::new(Arc::new(HttpGateway::new(&base)), owner, options);
        store.set_summary("Compiler engineer");
        store.append_skill("Rust");

        let SaveOutcome::Created(id) = store.save_now().await.unwrap() else {
            panic!("expected a create");
        };
        assert!(!store.is_dirty());

        let reopened = DocumentStore::new(Arc::new(HttpGateway::new(&base)), owner, options);
        reopened.load(id).await.unwrap();
        assert_eq!(reopened.document(), store.document());

        let stranger =
            DocumentStore::new(Arc::new(HttpGateway::new(&base)), Uuid::new_v4(), options);
        assert_eq!(stranger.load(id).await, Err(GatewayError::NotFound));

        let gateway = HttpGateway::new(&base);
        assert_eq!(gateway.list(owner).await.unwrap().len(), 1);
        gateway.delete(id, owner).await.unwrap();
        assert_eq!(gateway.get(id, owner).await, Err(GatewayError::NotFound));
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let gateway = HttpGateway::new("http://localhost:8080/");
        let id = Uuid::nil();
        assert_eq!(
            gateway.collection_url(),
            "http://localhost:8080/api/v1/resumes"
        );
        assert_eq!(
            gateway.item_url(id),
            format!("http://localhost:8080/api/v1/resumes/{id}")
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            map_status(StatusCode::UNAUTHORIZED, String::new()),
            GatewayError::Unauthorized
        );
        assert_eq!(
            map_status(StatusCode::NOT_FOUND, String::new()),
            GatewayError::NotFound
        );
        assert_eq!(
            map_status(StatusCode::BAD_REQUEST, "bad title".to_string()),
            GatewayError::Validation("bad title".to_string())
        );
        assert!(matches!(
            map_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
            GatewayError::Transport(_)
        ));
    }
}
