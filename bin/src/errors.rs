use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use failure::{Error, Fail};
use serde::Serialize;

use lucky_draw::errors::ValidationError;

/// Outcome of a draw that did not produce a winner.
///
/// `PrizeAlreadyAwarded` and `NoEligibleParticipants` are expected,
/// user-facing outcomes; only `StorageError` and `UnexpectedError` are
/// actual failures.
#[derive(Debug, Fail)]
pub enum DrawError {
    #[fail(display = "event {} does not exist", event_id)]
    EventNotFound { event_id: i32 },
    #[fail(display = "prize name must not be empty")]
    InvalidPrizeName,
    #[fail(
        display = "a winner has already been drawn for the prize \"{}\" in this event",
        prize_name
    )]
    PrizeAlreadyAwarded { prize_name: String },
    #[fail(display = "no eligible participants remaining for this draw")]
    NoEligibleParticipants,
    #[fail(display = "storage error during draw")]
    StorageError {
        #[cause]
        cause: Error,
    },
    #[fail(display = "unexpected error during draw")]
    UnexpectedError {
        #[cause]
        cause: Error,
    },
}

impl From<diesel::result::Error> for DrawError {
    fn from(cause: diesel::result::Error) -> Self {
        DrawError::StorageError {
            cause: cause.into(),
        }
    }
}

impl From<r2d2::Error> for DrawError {
    fn from(cause: r2d2::Error) -> Self {
        DrawError::StorageError {
            cause: cause.into(),
        }
    }
}

impl From<BlockingError> for DrawError {
    fn from(cause: BlockingError) -> Self {
        DrawError::UnexpectedError {
            cause: cause.into(),
        }
    }
}

impl ResponseError for DrawError {
    fn status_code(&self) -> StatusCode {
        match self {
            DrawError::EventNotFound { .. } => StatusCode::NOT_FOUND,
            DrawError::InvalidPrizeName => StatusCode::BAD_REQUEST,
            DrawError::PrizeAlreadyAwarded { .. } => StatusCode::CONFLICT,
            DrawError::NoEligibleParticipants => StatusCode::CONFLICT,
            DrawError::StorageError { .. } | DrawError::UnexpectedError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self)
    }
}

/// Errors of the non-draw endpoints.
#[derive(Debug, Fail)]
pub enum ApiError {
    #[fail(display = "{}", _0)]
    Validation(#[cause] ValidationError),
    #[fail(display = "an event named \"{}\" already exists", name)]
    DuplicateEventName { name: String },
    #[fail(display = "event {} does not exist", event_id)]
    EventNotFound { event_id: i32 },
    #[fail(display = "participant {} does not exist", participant_id)]
    ParticipantNotFound { participant_id: i32 },
    #[fail(display = "storage error")]
    Storage {
        #[cause]
        cause: Error,
    },
    #[fail(display = "unexpected error")]
    Unexpected {
        #[cause]
        cause: Error,
    },
}

impl From<ValidationError> for ApiError {
    fn from(cause: ValidationError) -> Self {
        ApiError::Validation(cause)
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(cause: diesel::result::Error) -> Self {
        ApiError::Storage {
            cause: cause.into(),
        }
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(cause: r2d2::Error) -> Self {
        ApiError::Storage {
            cause: cause.into(),
        }
    }
}

impl From<BlockingError> for ApiError {
    fn from(cause: BlockingError) -> Self {
        ApiError::Unexpected {
            cause: cause.into(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateEventName { .. } => StatusCode::CONFLICT,
            ApiError::EventNotFound { .. } | ApiError::ParticipantNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ApiError::Storage { .. } | ApiError::Unexpected { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_body<E: std::fmt::Display>(status: StatusCode, error: &E) -> HttpResponse {
    // Storage details stay in the logs, not in responses.
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        "internal error".to_string()
    } else {
        format!("{}", error)
    };
    HttpResponse::build(status).json(ErrorBody { error: message })
}
