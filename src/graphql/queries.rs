//! Read-side dashboard queries.

use super::{GraphQLClient, GraphQLError};
use serde::Deserialize;
use tracing::instrument;

pub const HELLO_QUERY: &str = r"
  query {
    hello
  }
";

pub const ALL_USERS_QUERY: &str = r"
  query {
    users {
      id
      firstName
      lastName
      email
      role
    }
  }
";

/// A row of the users table. Names are nullable in the backend.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub role: String,
}

#[derive(Deserialize)]
struct HelloData {
    hello: String,
}

#[derive(Deserialize)]
struct UsersData {
    users: Vec<UserSummary>,
}

/// Backend connectivity check.
///
/// # Errors
/// Returns a [`GraphQLError`] if the request fails.
#[instrument(skip_all)]
pub async fn hello(client: &GraphQLClient) -> Result<String, GraphQLError> {
    let data: HelloData = client.query::<(), _>(HELLO_QUERY, None).await?;
    Ok(data.hello)
}

/// List all users.
///
/// # Errors
/// Returns a [`GraphQLError`] if the request fails.
#[instrument(skip_all)]
pub async fn users(client: &GraphQLClient) -> Result<Vec<UserSummary>, GraphQLError> {
    let data: UsersData = client.query::<(), _>(ALL_USERS_QUERY, None).await?;
    Ok(data.users)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GraphQLClient {
        GraphQLClient::new(Url::parse(&format!("{}/query", server.uri())).unwrap())
    }

    #[tokio::test]
    async fn hello_returns_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_partial_json(json!({ "query": HELLO_QUERY })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "hello": "hi" } })),
            )
            .mount(&server)
            .await;

        assert_eq!(hello(&client_for(&server)).await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn users_decodes_nullable_names() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "users": [
                        { "id": "1", "firstName": "Ann", "lastName": "Lee", "email": "a@x.com", "role": "STAFF" },
                        { "id": "2", "firstName": null, "lastName": null, "email": "b@x.com", "role": "ADMIN" }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let users = users(&client_for(&server)).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].first_name.as_deref(), Some("Ann"));
        assert_eq!(users[1].first_name, None);
        assert_eq!(users[1].role, "ADMIN");
    }

    #[tokio::test]
    async fn users_surfaces_graphql_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "database unavailable", "path": ["users"] }]
            })))
            .mount(&server)
            .await;

        let err = users(&client_for(&server)).await.unwrap_err();
        assert_eq!(err.first_message(), Some("database unavailable"));
    }
}
