use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::DatabaseErrorKind;
use diesel::SqliteConnection;
use log::info;
use rand::thread_rng;
use serde::{Deserialize, Serialize};

use lucky_draw::contact::validate_phone;

use crate::draw::{self, DrawnWinner};
use crate::errors::{ApiError, DrawError};
use crate::notify::Notifier;
use crate::record::db;
use crate::record::models::{Event, Participant, WinnerDetail};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// The home page shows the next few events only.
const UPCOMING_EVENTS_LIMIT: i64 = 3;

#[derive(Serialize)]
struct Message {
    message: String,
}

pub async fn upcoming_events_handler(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let today = Local::now().date_naive();
    let events = web::block(move || -> Result<Vec<Event>, ApiError> {
        let mut conn = pool.get()?;
        Ok(db::upcoming_events(&mut conn, today, UPCOMING_EVENTS_LIMIT)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(events))
}

pub async fn all_events_handler(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let events = web::block(move || -> Result<Vec<Event>, ApiError> {
        let mut conn = pool.get()?;
        Ok(db::all_events(&mut conn)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(events))
}

#[derive(Deserialize)]
pub struct CreateEventForm {
    pub name: String,
    pub event_date: NaiveDate,
}

pub async fn create_event_handler(
    pool: web::Data<DbPool>,
    form: web::Json<CreateEventForm>,
) -> Result<HttpResponse, ApiError> {
    let CreateEventForm { name, event_date } = form.into_inner();
    let event = web::block(move || -> Result<Event, ApiError> {
        let mut conn = pool.get()?;
        db::create_event(&mut conn, &name, event_date).map_err(|error| match error {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::DuplicateEventName { name: name.clone() }
            }
            other => other.into(),
        })
    })
    .await??;
    info!("event \"{}\" created for {}", event.name, event.event_date);
    Ok(HttpResponse::Created().json(event))
}

pub async fn delete_event_handler(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let event_id = path.into_inner();
    web::block(move || -> Result<(), ApiError> {
        let mut conn = pool.get()?;
        match db::delete_event(&mut conn, event_id)? {
            0 => Err(ApiError::EventNotFound { event_id }),
            _ => Ok(()),
        }
    })
    .await??;
    info!("event {} deleted with its participants and winners", event_id);
    Ok(HttpResponse::Ok().json(Message {
        message: "Event and associated participants deleted successfully!".to_string(),
    }))
}

#[derive(Serialize)]
struct RosterResponse {
    event: Event,
    participants: Vec<Participant>,
}

pub async fn participants_handler(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let event_id = path.into_inner();
    let roster = web::block(move || -> Result<RosterResponse, ApiError> {
        let mut conn = pool.get()?;
        let event =
            db::find_event(&mut conn, event_id)?.ok_or(ApiError::EventNotFound { event_id })?;
        let participants = db::participants_of_event(&mut conn, event_id)?;
        Ok(RosterResponse {
            event,
            participants,
        })
    })
    .await??;
    Ok(HttpResponse::Ok().json(roster))
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub contact_info: String,
}

pub async fn register_participant_handler(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    form: web::Json<RegisterForm>,
) -> Result<HttpResponse, ApiError> {
    let event_id = path.into_inner();
    let RegisterForm { name, contact_info } = form.into_inner();
    // Rejected before any storage access.
    validate_phone(&contact_info)?;
    let participant = web::block(move || -> Result<Participant, ApiError> {
        let mut conn = pool.get()?;
        db::find_event(&mut conn, event_id)?.ok_or(ApiError::EventNotFound { event_id })?;
        Ok(db::register_participant(
            &mut conn,
            event_id,
            &name,
            &contact_info,
        )?)
    })
    .await??;
    info!(
        "participant \"{}\" registered to event {}",
        participant.name, event_id
    );
    Ok(HttpResponse::Created().json(participant))
}

pub async fn delete_participant_handler(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let participant_id = path.into_inner();
    web::block(move || -> Result<(), ApiError> {
        let mut conn = pool.get()?;
        match db::delete_participant(&mut conn, participant_id)? {
            0 => Err(ApiError::ParticipantNotFound { participant_id }),
            _ => Ok(()),
        }
    })
    .await??;
    info!("participant {} deleted", participant_id);
    Ok(HttpResponse::Ok().json(Message {
        message: "Participant deleted successfully!".to_string(),
    }))
}

#[derive(Deserialize)]
pub struct DrawForm {
    pub prize_name: String,
}

#[derive(Serialize)]
struct DrawResponse {
    winner: DrawnWinner,
    notified: bool,
    message: String,
}

pub async fn draw_handler(
    pool: web::Data<DbPool>,
    notifier: web::Data<dyn Notifier>,
    path: web::Path<i32>,
    form: web::Json<DrawForm>,
) -> Result<HttpResponse, DrawError> {
    let event_id = path.into_inner();
    let prize_name = form.into_inner().prize_name;
    let response = web::block(move || -> Result<DrawResponse, DrawError> {
        let mut conn = pool.get()?;
        let winner = draw::draw(&mut conn, &mut thread_rng(), event_id, &prize_name)?;
        info!(
            "\"{}\" won \"{}\" at \"{}\"",
            winner.name, winner.prize_name, winner.event_name
        );
        // Fire-and-forget: the draw stands whatever the SMS outcome.
        let notified = notifier.notify(&winner.contact_info, &winner.event_name, &winner.prize_name);
        let message = if notified {
            format!("Winner drawn! SMS sent to {}!", winner.name)
        } else {
            format!("Winner drawn! Could not send SMS to {}.", winner.name)
        };
        Ok(DrawResponse {
            winner,
            notified,
            message,
        })
    })
    .await??;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn winners_handler(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let history = web::block(move || -> Result<Vec<WinnerDetail>, ApiError> {
        let mut conn = pool.get()?;
        Ok(db::winner_history(&mut conn)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(history))
}
