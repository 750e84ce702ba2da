use axum::extract::{Path, Query, Request, State};
use axum::http::header;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};

use common::{roster::RosterTable, CardRank, CardSuit, GameState, PlayerOverview, QrMappingSet};

use crate::store::UpdateError;
use crate::{AppError, AppState, UserSession};

/// Scripts can send the admin token in this header instead of logging in.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Side length in pixels of the badge QR images.
pub const QR_IMAGE_SIZE: u32 = 450;

pub fn router(state: AppState) -> axum::Router {
    let guarded = axum::Router::new()
        .route("/roster", axum::routing::get(roster).post(save_roster))
        .route("/card/:card", axum::routing::get(card))
        .route("/qrimage", axum::routing::get(qr_image))
        .route("/players", axum::routing::get(players))
        .route("/players/:username", axum::routing::post(update_player))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    axum::Router::new()
        .merge(guarded)
        .route("/login", axum::routing::post(login))
        .with_state(state)
}

/// Lets requests through that either carry the admin token or come from a
/// session that logged in with it.
async fn require_admin(
    State(state): State<AppState>,
    session: UserSession,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let has_token = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|token| state.is_admin_token(token))
        .unwrap_or(false);

    if !has_token && !session.data().admin {
        tracing::warn!(path = %req.uri(), "Rejected admin request");
        return Err(AppError::NotAdmin);
    }

    Ok(next.run(req).await)
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    token: String,
}

#[tracing::instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    mut session: UserSession,
    Form(form): Form<LoginForm>,
) -> Result<&'static str, AppError> {
    if !state.is_admin_token(&form.token) {
        tracing::warn!("Wrong admin token");
        return Err(AppError::NotAdmin);
    }

    session
        .modify_data(|data| {
            data.admin = true;
        })
        .await?;
    tracing::info!("Admin logged in");

    Ok("ok")
}

#[derive(Debug, serde::Deserialize)]
pub struct RosterForm {
    #[serde(default)]
    users: String,
}

/// The current roster as TSV, ready to be pasted into the roster editor.
#[tracing::instrument(skip(state))]
async fn roster(State(state): State<AppState>) -> String {
    let mappings = state.store.mappings().await;
    let mut tsv = RosterTable::from_mappings(&mappings).to_tsv();
    tsv.push('\n');
    tsv
}

#[tracing::instrument(skip(state, form))]
async fn save_roster(State(state): State<AppState>, Form(form): Form<RosterForm>) -> Result<&'static str, AppError> {
    if form.users.is_empty() {
        return Err(AppError::BadRequest("empty user data received"));
    }

    let mappings: QrMappingSet = serde_json::from_str(&form.users).map_err(|e| {
        tracing::warn!("Parsing user data: {}", e);
        AppError::BadRequest("could not parse user data")
    })?;

    state.store.replace_mappings(mappings).await;

    Ok("ok")
}

/// Every registered player, furthest along first.
#[tracing::instrument(skip(state))]
async fn players(State(state): State<AppState>) -> Json<Vec<PlayerOverview>> {
    Json(state.store.overview().await)
}

#[derive(Debug, serde::Deserialize)]
pub struct PlayerForm {
    #[serde(default)]
    state: String,
}

#[tracing::instrument(skip(state, form))]
async fn update_player(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Form(form): Form<PlayerForm>,
) -> Result<&'static str, AppError> {
    if form.state.is_empty() {
        return Err(AppError::BadRequest("empty player state received"));
    }

    let new_state: GameState = serde_json::from_str(&form.state).map_err(|e| {
        tracing::warn!("Parsing player state: {}", e);
        AppError::BadRequest("could not parse player state")
    })?;

    match state.store.update_player(&username, new_state).await {
        Ok(()) => Ok("ok"),
        Err(UpdateError::NotRegistered(_)) => Err(AppError::NotFound),
        Err(UpdateError::Invalid(e)) => Err(AppError::InvalidState(e)),
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct QrQuery {
    #[serde(default)]
    qr: String,
}

/// The QR code for `?qr=<payload>` as a PNG, for printing badges.
#[tracing::instrument]
async fn qr_image(Query(query): Query<QrQuery>) -> Result<impl IntoResponse, AppError> {
    let data = query.qr.strip_suffix(".png").unwrap_or(&query.qr);
    if data.is_empty() {
        return Err(AppError::BadRequest("could not find the qr param"));
    }

    let png = qr_png(data)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

#[derive(Debug, thiserror::Error)]
pub enum QrImageError {
    #[error("encoding qr code: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("writing png: {0}")]
    Png(#[from] image::ImageError),
}

pub fn qr_png(data: &str) -> Result<Vec<u8>, QrImageError> {
    let code = qrcode::QrCode::with_error_correction_level(data, qrcode::EcLevel::H)?;
    let image = code
        .render::<image::Luma<u8>>()
        .min_dimensions(QR_IMAGE_SIZE, QR_IMAGE_SIZE)
        .build();

    let mut png = std::io::Cursor::new(Vec::new());
    image.write_to(&mut png, image::ImageFormat::Png)?;
    Ok(png.into_inner())
}

/// Serves `/card/{SUIT}-{RANK}.svg`.
#[tracing::instrument]
async fn card(Path(card): Path<String>) -> Result<impl IntoResponse, AppError> {
    let (suit, rank) = card
        .strip_suffix(".svg")
        .and_then(|c| c.split_once('-'))
        .ok_or(AppError::BadRequest("could not figure out card value"))?;

    let suit: CardSuit = suit
        .parse()
        .map_err(|_| AppError::BadRequest("could not figure out card suit"))?;
    let rank: CardRank = rank
        .parse()
        .map_err(|_| AppError::BadRequest("could not figure out card rank"))?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], card_svg(suit, rank)))
}

pub fn card_svg(suit: CardSuit, rank: CardRank) -> String {
    let color = if suit.is_red() { "#f00" } else { "#000" };
    let symbol = suit.symbol();
    let label = rank.label();

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="140" viewBox="0 0 100 140">
  <rect x="1" y="1" width="98" height="138" rx="8" ry="8" fill="#fff" stroke="#000" stroke-width="2"/>
  <text x="8" y="24" font-family="sans-serif" font-size="20" fill="{color}">{label}</text>
  <text x="8" y="44" font-family="sans-serif" font-size="18" fill="{color}">{symbol}</text>
  <text x="50" y="88" font-family="sans-serif" font-size="48" fill="{color}" text-anchor="middle">{symbol}</text>
  <text x="92" y="132" font-family="sans-serif" font-size="20" fill="{color}" text-anchor="end">{label}</text>
</svg>
"##
    )
}
