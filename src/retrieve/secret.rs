//! Secrets Safe retrieval
//!
//! Text secrets carry their value inline in the listing; file secrets need a
//! second download by id.

use crate::api::client::{path_segment, SECRETS_PATH};
use crate::auth::AuthenticatedSession;
use crate::error::{Result, SafeError};
use crate::models::{FolderTitleRef, SecretEntry, SecretType};
use crate::path::SEPARATOR;
use tracing::{debug, info};

pub struct SecretRetriever<'a> {
    session: &'a AuthenticatedSession,
}

impl<'a> SecretRetriever<'a> {
    pub fn new(session: &'a AuthenticatedSession) -> Self {
        Self { session }
    }

    pub async fn retrieve(&self, reference: &FolderTitleRef) -> Result<String> {
        let entry = self.lookup(reference).await?;

        let value = match entry.secret_type {
            SecretType::File => self.download_file(&entry.id).await?,
            SecretType::Text | SecretType::Other => {
                entry.password.ok_or_else(|| SafeError::SecretLookup {
                    message: format!("secret {} has no inline value", entry.id),
                    status: 200,
                    path: reference.folder(),
                    title: reference.title.clone(),
                })?
            }
        };

        info!(path = %reference.folder(), title = %reference.title, "secret retrieved");
        Ok(value)
    }

    /// Find the single entry titled `reference.title` under its folder.
    pub async fn lookup(&self, reference: &FolderTitleRef) -> Result<SecretEntry> {
        let folder = reference.folder();
        let separator = SEPARATOR.to_string();
        debug!(path = %folder, title = %reference.title, "looking up secret");

        let response = self
            .session
            .get(
                SECRETS_PATH,
                &[
                    ("title", reference.title.as_str()),
                    ("path", folder.as_str()),
                    ("separator", separator.as_str()),
                ],
            )
            .await?;

        let status = response.status_code();
        let lookup_error = |message: String| SafeError::SecretLookup {
            message,
            status,
            path: folder.clone(),
            title: reference.title.clone(),
        };

        if !response.is_ok() {
            return Err(lookup_error(response.body));
        }

        let mut entries = response
            .json::<Vec<SecretEntry>>()
            .map_err(lookup_error)?;

        match entries.len() {
            1 => Ok(entries.remove(0)),
            0 => Err(lookup_error("no secret matched".to_string())),
            n => Err(lookup_error(format!(
                "{} secrets matched, expected exactly one",
                n
            ))),
        }
    }

    async fn download_file(&self, secret_id: &str) -> Result<String> {
        debug!(secret_id = %secret_id, "downloading file secret");
        let path = format!("{}/{}/file/download", SECRETS_PATH, path_segment(secret_id));
        let response = self.session.get(&path, &[]).await?;

        if !response.is_ok() {
            return Err(SafeError::FileRetrieval {
                status: response.status_code(),
                message: response.body,
                secret_id: secret_id.to_string(),
            });
        }
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_http_client;
    use crate::auth::SessionClient;
    use crate::models::AccessToken;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRET_ID: &str = "1ca2f649-5837-4bc4-235f-08db774dd40b";

    async fn session(server: &MockServer) -> AuthenticatedSession {
        Mock::given(method("POST"))
            .and(path("/Auth/SignAppIn"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
        SessionClient::new(build_http_client().unwrap(), server.uri())
            .sign_in(AccessToken::new("my_token"))
            .await
            .unwrap()
    }

    fn reference(folder: &[&str], title: &str) -> FolderTitleRef {
        FolderTitleRef {
            folder_path: folder.iter().map(|s| s.to_string()).collect(),
            title: title.to_string(),
        }
    }

    async fn mount_listing(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/secrets-safe/secrets"))
            .and(query_param("title", "secret_title"))
            .and(query_param("path", "path"))
            .and(query_param("separator", "/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn text_secret_returns_inline_value_without_download() {
        let server = MockServer::start().await;
        let session = session(&server).await;
        mount_listing(
            &server,
            serde_json::json!([{
                "Password": "line 1\nline 2\nline 3",
                "Id": SECRET_ID,
                "Title": "text2",
                "SecretType": "Text"
            }]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path(format!("/secrets-safe/secrets/{}/file/download", SECRET_ID)))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let value = SecretRetriever::new(&session)
            .retrieve(&reference(&["path"], "secret_title"))
            .await
            .unwrap();
        assert_eq!(value, "line 1\nline 2\nline 3");
    }

    #[tokio::test]
    async fn file_secret_is_downloaded_once() {
        let server = MockServer::start().await;
        let session = session(&server).await;
        mount_listing(
            &server,
            serde_json::json!([{ "Id": SECRET_ID, "Title": "text2", "SecretType": "File" }]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path(format!("/secrets-safe/secrets/{}/file/download", SECRET_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_string("secret_content"))
            .expect(1)
            .mount(&server)
            .await;

        let value = SecretRetriever::new(&session)
            .retrieve(&reference(&["path"], "secret_title"))
            .await
            .unwrap();
        assert_eq!(value, "secret_content");
    }

    #[tokio::test]
    async fn file_download_failure_is_reported() {
        let server = MockServer::start().await;
        let session = session(&server).await;
        mount_listing(
            &server,
            serde_json::json!([{ "Id": SECRET_ID, "Title": "text2", "SecretType": "File" }]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path(format!("/secrets-safe/secrets/{}/file/download", SECRET_ID)))
            .respond_with(ResponseTemplate::new(404).set_body_string("File not found"))
            .mount(&server)
            .await;

        let err = SecretRetriever::new(&session)
            .retrieve(&reference(&["path"], "secret_title"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Error getting the file by id, message: File not found, statuscode: 404, \
                 secret id: {}",
                SECRET_ID
            )
        );
    }

    #[tokio::test]
    async fn empty_listing_is_lookup_error() {
        let server = MockServer::start().await;
        let session = session(&server).await;
        mount_listing(&server, serde_json::json!([])).await;

        let err = SecretRetriever::new(&session)
            .retrieve(&reference(&["path"], "secret_title"))
            .await
            .unwrap_err();
        assert!(matches!(err, SafeError::SecretLookup { status: 200, .. }));
        assert!(err.to_string().contains("path: path, title: secret_title"));
    }

    #[tokio::test]
    async fn lookup_failure_carries_status() {
        let server = MockServer::start().await;
        let session = session(&server).await;
        Mock::given(method("GET"))
            .and(path("/secrets-safe/secrets"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Folder not found"))
            .mount(&server)
            .await;

        let err = SecretRetriever::new(&session)
            .retrieve(&reference(&["team", "prod"], "db"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error getting the secret by path, message: Folder not found, statuscode: 404, \
             path: team/prod, title: db"
        );
    }

    #[tokio::test]
    async fn ambiguous_listing_is_rejected() {
        let server = MockServer::start().await;
        let session = session(&server).await;
        mount_listing(
            &server,
            serde_json::json!([
                { "Id": "a", "Title": "secret_title", "SecretType": "Text", "Password": "1" },
                { "Id": "b", "Title": "secret_title", "SecretType": "Text", "Password": "2" }
            ]),
        )
        .await;

        let err = SecretRetriever::new(&session)
            .lookup(&reference(&["path"], "secret_title"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("2 secrets matched"));
    }
}
