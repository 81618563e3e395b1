//! Draw engine.
//!
//! Runs a single draw inside one transaction: the already-awarded and
//! eligibility checks are the friendly fast path, the UNIQUE constraints
//! on the winners table are the enforcement that holds under concurrent
//! draws.

use diesel::prelude::*;
use rand::Rng;
use serde::Serialize;

use crate::errors::DrawError;
use crate::record::db;

/// A drawn winner with the context the notifier needs.
#[derive(Serialize, Debug, Clone)]
pub struct DrawnWinner {
    pub participant_id: i32,
    pub name: String,
    pub contact_info: String,
    pub event_name: String,
    pub prize_name: String,
}

pub fn draw<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    rng: &mut R,
    event_id: i32,
    prize_name: &str,
) -> Result<DrawnWinner, DrawError> {
    let prize_name = prize_name.trim();
    if prize_name.is_empty() {
        return Err(DrawError::InvalidPrizeName);
    }
    conn.transaction(|conn| {
        let event = db::find_event(conn, event_id)?
            .ok_or(DrawError::EventNotFound { event_id })?;
        if db::prize_already_awarded(conn, event_id, prize_name)? {
            return Err(DrawError::PrizeAlreadyAwarded {
                prize_name: prize_name.to_string(),
            });
        }
        let eligible = db::eligible_participants(conn, event_id)?;
        let winner =
            lucky_draw::draw::pick(rng, &eligible).ok_or(DrawError::NoEligibleParticipants)?;
        db::record_winner(conn, event_id, winner.participant_id, prize_name)?;
        Ok(DrawnWinner {
            participant_id: winner.participant_id,
            name: winner.name.clone(),
            contact_info: winner.contact_info.clone(),
            event_name: event.name,
            prize_name: prize_name.to_string(),
        })
    })
}
