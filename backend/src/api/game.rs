use axum::extract::State;
use axum::{Form, Json};

use common::scan::ScanResponse;

use crate::store::MoveError;
use crate::{AppError, AppState, UserSession};

pub const UNREGISTERED_ACTION: &str = "Unregistered QR.";
pub const UNREGISTERED_EXPLANATION: &str = "You have to scan your own QR code (which is on your badge). You have to do this again, even if you scanned it once to get to this page.";

pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/badge", axum::routing::post(badge))
        .route("/state", axum::routing::get(game_state))
        .route("/move", axum::routing::post(make_move))
        .route("/logout", axum::routing::post(logout))
        .with_state(state)
}

#[derive(Debug, serde::Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    answer: String,
}

/// Checks the badge scanned on the join page and binds the session to its
/// player.
#[tracing::instrument(skip(state, session))]
async fn badge(
    State(state): State<AppState>,
    mut session: UserSession,
    Form(form): Form<AnswerForm>,
) -> Result<Json<ScanResponse>, AppError> {
    if form.answer.is_empty() {
        return Err(AppError::NotFound);
    }

    let player = match state.store.lookup_badge(&form.answer).await {
        Some(p) => p,
        None => {
            tracing::info!("Badge is not on the roster");
            let mut response = ScanResponse::with_action(UNREGISTERED_ACTION);
            response.port_html = Some(UNREGISTERED_EXPLANATION.to_owned());
            return Ok(Json(response));
        }
    };

    state.store.register(&player.username).await;
    session
        .modify_data(|data| {
            data.username = Some(player.username.clone());
        })
        .await?;

    tracing::info!(username = %player.username, "Joined the game");

    Ok(Json(ScanResponse::redirect("/game")))
}

#[tracing::instrument(skip(state, session))]
async fn game_state(State(state): State<AppState>, session: UserSession) -> Result<Json<ScanResponse>, AppError> {
    let username = session.data().username.as_deref().ok_or(AppError::Unauthorized)?;
    let (game_state, clue) = state.store.player(username).await.ok_or(AppError::Unauthorized)?;

    Ok(Json(ScanResponse {
        game_artifacts: None,
        port_html: Some(clue),
        state: Some(game_state),
    }))
}

#[tracing::instrument(skip(state, session))]
async fn make_move(
    State(state): State<AppState>,
    session: UserSession,
    Form(form): Form<AnswerForm>,
) -> Result<Json<ScanResponse>, AppError> {
    let username = session.data().username.as_deref().ok_or(AppError::Unauthorized)?;

    if form.answer.is_empty() {
        return Err(AppError::NotFound);
    }

    let result = match state.store.make_move(username, &form.answer).await {
        Ok(r) => r,
        Err(MoveError::NotRegistered(_)) => return Err(AppError::Unauthorized),
        Err(MoveError::Step(e)) => {
            tracing::warn!(username, "Rejected move: {}", e);
            return Err(AppError::UnexpectedScan(e));
        }
    };

    let mut response = ScanResponse::with_action(result.action.label());
    response.port_html = Some(result.clue);
    response.state = Some(result.state);

    Ok(Json(response))
}

#[tracing::instrument(skip(session))]
async fn logout(mut session: UserSession) -> Result<&'static str, AppError> {
    let was_playing = session.data().username.is_some();

    session
        .modify_data(|data| {
            data.username = None;
        })
        .await?;

    Ok(if was_playing {
        "We've logged you out."
    } else {
        "Weird, you were already logged out."
    })
}
