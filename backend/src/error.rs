use axum::{http::StatusCode, response::IntoResponse};

/// Errors returned by the handlers. Clients show the body text as is.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("Not registered")]
    Unauthorized,
    #[error("Admin token required")]
    NotAdmin,
    #[error("Not Found")]
    NotFound,
    #[error("You scanned someone unexpected: {0}")]
    UnexpectedScan(#[from] game::StepError),
    #[error("{0}")]
    InvalidState(#[from] game::InvalidState),
    #[error("could not encode qrcode")]
    QrImage(#[from] crate::api::admin::QrImageError),
    #[error("could not update your session")]
    Session(#[from] tower_sessions::session::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::NotAdmin => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidState(_) => StatusCode::BAD_REQUEST,
            Self::UnexpectedScan(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::QrImage(e) => {
                tracing::error!("QR image: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Session(e) => {
                tracing::error!("Session store: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
