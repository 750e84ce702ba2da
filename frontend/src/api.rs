use common::scan::ScanResponse;

pub const ROSTER_ENDPOINT: &str = "/api/admin/roster";
pub const ADMIN_LOGIN_ENDPOINT: &str = "/api/admin/login";
pub const PLAYERS_ENDPOINT: &str = "/api/admin/players";
pub const BADGE_ENDPOINT: &str = "/api/game/badge";
pub const STATE_ENDPOINT: &str = "/api/game/state";
pub const MOVE_ENDPOINT: &str = "/api/game/move";
pub const LOGOUT_ENDPOINT: &str = "/api/game/logout";

pub fn card_image_url(suit: common::CardSuit, rank: common::CardRank) -> String {
    format!("/api/admin/card/{}-{}.svg", suit.name(), rank.value())
}

pub fn qr_image_url(payload: &str) -> String {
    format!("/api/admin/qrimage?qr={}", String::from(js_sys::encode_uri_component(payload)))
}

fn player_url(username: &str) -> String {
    format!("{}/{}", PLAYERS_ENDPOINT, String::from(js_sys::encode_uri_component(username)))
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(#[from] reqwasm::Error),
    /// The server answered with a non-2xx status, the body is its message.
    #[error("{body}")]
    Status { status: u16, body: String },
    #[error("{0:?}")]
    Js(wasm_bindgen::JsValue),
}

impl From<wasm_bindgen::JsValue> for FetchError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value)
    }
}

impl FetchError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

async fn post_form(endpoint: &str, field: &str, value: &str) -> Result<reqwasm::http::Response, FetchError> {
    let params = web_sys::UrlSearchParams::new()?;
    params.append(field, value);

    let res = reqwasm::http::Request::post(endpoint).body(params).send().await?;
    checked(res).await
}

async fn checked(res: reqwasm::http::Response) -> Result<reqwasm::http::Response, FetchError> {
    if !res.ok() {
        let status = res.status();
        let body = res.text().await?;
        return Err(FetchError::Status { status, body });
    }

    Ok(res)
}

/// Posts a scanned QR payload as the `answer` field.
pub async fn submit_answer(endpoint: &str, answer: &str) -> Result<ScanResponse, FetchError> {
    let res = post_form(endpoint, "answer", answer).await?;
    Ok(res.json().await?)
}

/// Posts the roster as the `users` field, the server answers with plain text.
pub async fn save_roster(users: &str) -> Result<String, FetchError> {
    let res = post_form(ROSTER_ENDPOINT, "users", users).await?;
    Ok(res.text().await?)
}

pub async fn load_roster() -> Result<String, FetchError> {
    let res = reqwasm::http::Request::get(ROSTER_ENDPOINT).send().await?;
    Ok(checked(res).await?.text().await?)
}

pub async fn load_state() -> Result<ScanResponse, FetchError> {
    let res = reqwasm::http::Request::get(STATE_ENDPOINT).send().await?;
    Ok(checked(res).await?.json().await?)
}

pub async fn logout() -> Result<String, FetchError> {
    let res = reqwasm::http::Request::post(LOGOUT_ENDPOINT).send().await?;
    Ok(res.text().await?)
}

/// Trades the admin token for an admin session cookie.
pub async fn admin_login(token: &str) -> Result<(), FetchError> {
    post_form(ADMIN_LOGIN_ENDPOINT, "token", token).await?;
    Ok(())
}

pub async fn load_players() -> Result<Vec<common::PlayerOverview>, FetchError> {
    let res = reqwasm::http::Request::get(PLAYERS_ENDPOINT).send().await?;
    Ok(checked(res).await?.json().await?)
}

/// Overwrites a player's state with `state`, which is JSON.
pub async fn update_player(username: &str, state: &str) -> Result<String, FetchError> {
    let res = post_form(&player_url(username), "state", state).await?;
    Ok(res.text().await?)
}
