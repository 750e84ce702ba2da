#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct UserSessionData {
    /// The player whose badge was scanned on the join page.
    pub username: Option<String>,
    /// Set once the admin token was entered in this browser.
    #[serde(default)]
    pub admin: bool,
}

pub struct UserSession {
    pub session: tower_sessions::Session,
    data: UserSessionData,
}

impl UserSession {
    const KEY: &'static str = "user.data";

    pub fn data(&self) -> &UserSessionData {
        &self.data
    }

    pub async fn modify_data<F>(&mut self, func: F) -> Result<(), tower_sessions::session::Error>
    where
        F: FnOnce(&mut UserSessionData),
    {
        let entry = &mut self.data;
        func(entry);

        self.session.insert(Self::KEY, &*entry).await
    }
}

#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for UserSession
where
    S: Send + Sync,
{
    type Rejection = (axum::http::StatusCode, &'static str);

    async fn from_request_parts(
        req: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let session = tower_sessions::Session::from_request_parts(req, state).await?;

        let data: UserSessionData = session
            .get(Self::KEY)
            .await
            .map_err(|e| {
                tracing::error!("Loading session data: {:?}", e);
                (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "could not load session")
            })?
            .unwrap_or_default();

        Ok(Self { session, data })
    }
}
