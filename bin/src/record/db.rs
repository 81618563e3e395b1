//! Data store gateway.
//!
//! Every function takes an open connection and returns a plain
//! `QueryResult`; transactions around multi-statement deletes are owned
//! here so callers cannot half-delete an event.

use chrono::NaiveDate;
use diesel::dsl::{exists, select};
use diesel::prelude::*;

use super::models::{
    Event, NewEvent, NewParticipant, NewWinner, Participant, Winner, WinnerDetail,
};
use super::schema::{events, participants, winners};

pub fn create_event(
    conn: &mut SqliteConnection,
    name: &str,
    event_date: NaiveDate,
) -> QueryResult<Event> {
    diesel::insert_into(events::table)
        .values(&NewEvent { name, event_date })
        .get_result(conn)
}

/// Events on or after `today`, soonest first.
pub fn upcoming_events(
    conn: &mut SqliteConnection,
    today: NaiveDate,
    limit: i64,
) -> QueryResult<Vec<Event>> {
    events::table
        .filter(events::event_date.ge(today))
        .order(events::event_date.asc())
        .limit(limit)
        .load(conn)
}

pub fn all_events(conn: &mut SqliteConnection) -> QueryResult<Vec<Event>> {
    events::table.order(events::event_date.desc()).load(conn)
}

pub fn find_event(conn: &mut SqliteConnection, event_id: i32) -> QueryResult<Option<Event>> {
    events::table.find(event_id).first(conn).optional()
}

/// Delete an event with its winner rows and participants, in that order.
/// Returns the number of event rows removed (0 when the id is unknown).
pub fn delete_event(conn: &mut SqliteConnection, event_id: i32) -> QueryResult<usize> {
    conn.transaction(|conn| {
        diesel::delete(winners::table.filter(winners::event_id.eq(event_id))).execute(conn)?;
        diesel::delete(participants::table.filter(participants::event_id.eq(event_id)))
            .execute(conn)?;
        diesel::delete(events::table.find(event_id)).execute(conn)
    })
}

pub fn register_participant(
    conn: &mut SqliteConnection,
    event_id: i32,
    name: &str,
    contact_info: &str,
) -> QueryResult<Participant> {
    diesel::insert_into(participants::table)
        .values(&NewParticipant {
            event_id,
            name,
            contact_info,
        })
        .get_result(conn)
}

/// Roster of an event, most recent registration first.
pub fn participants_of_event(
    conn: &mut SqliteConnection,
    event_id: i32,
) -> QueryResult<Vec<Participant>> {
    participants::table
        .filter(participants::event_id.eq(event_id))
        .order(participants::registration_time.desc())
        .then_order_by(participants::participant_id.desc())
        .load(conn)
}

/// Delete a participant with any winner rows referencing them.
/// Returns the number of participant rows removed.
pub fn delete_participant(conn: &mut SqliteConnection, participant_id: i32) -> QueryResult<usize> {
    conn.transaction(|conn| {
        diesel::delete(winners::table.filter(winners::participant_id.eq(participant_id)))
            .execute(conn)?;
        diesel::delete(participants::table.find(participant_id)).execute(conn)
    })
}

/// Participants of the event with no winner row in the same event.
/// An unknown event id yields the empty set.
pub fn eligible_participants(
    conn: &mut SqliteConnection,
    event_id: i32,
) -> QueryResult<Vec<Participant>> {
    let already_won = winners::table
        .filter(winners::event_id.eq(event_id))
        .select(winners::participant_id);
    participants::table
        .filter(participants::event_id.eq(event_id))
        .filter(participants::participant_id.ne_all(already_won))
        .order(participants::participant_id.asc())
        .load(conn)
}

pub fn prize_already_awarded(
    conn: &mut SqliteConnection,
    event_id: i32,
    prize_name: &str,
) -> QueryResult<bool> {
    select(exists(
        winners::table
            .filter(winners::event_id.eq(event_id))
            .filter(winners::prize_name.eq(prize_name)),
    ))
    .get_result(conn)
}

pub fn record_winner(
    conn: &mut SqliteConnection,
    event_id: i32,
    participant_id: i32,
    prize_name: &str,
) -> QueryResult<Winner> {
    diesel::insert_into(winners::table)
        .values(&NewWinner {
            event_id,
            participant_id,
            prize_name,
        })
        .get_result(conn)
}

pub fn winners_of_event(conn: &mut SqliteConnection, event_id: i32) -> QueryResult<Vec<Winner>> {
    winners::table
        .filter(winners::event_id.eq(event_id))
        .order(winners::winner_id.asc())
        .load(conn)
}

/// Full draw history, newest draw first.
pub fn winner_history(conn: &mut SqliteConnection) -> QueryResult<Vec<WinnerDetail>> {
    winners::table
        .inner_join(events::table)
        .inner_join(participants::table)
        .select((
            winners::prize_name,
            winners::draw_time,
            events::name,
            participants::name,
            participants::contact_info,
        ))
        .order(winners::draw_time.desc())
        .then_order_by(winners::winner_id.desc())
        .load(conn)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::record::MIGRATIONS;
    use diesel_migrations::MigrationHarness;

    pub(crate) fn connection() -> SqliteConnection {
        let mut conn =
            SqliteConnection::establish(":memory:").expect("in-memory database connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("database migrations");
        conn
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_create_and_find_event() {
        let mut conn = connection();
        let event = create_event(&mut conn, "Spring Fest", date(2026, 4, 18)).unwrap();
        assert_eq!(event.name, "Spring Fest");
        assert_eq!(event.event_date, date(2026, 4, 18));

        let found = find_event(&mut conn, event.event_id).unwrap();
        assert_eq!(found, Some(event));
        assert_eq!(find_event(&mut conn, 999).unwrap(), None);
    }

    #[test]
    fn test_event_name_is_unique() {
        let mut conn = connection();
        create_event(&mut conn, "Spring Fest", date(2026, 4, 18)).unwrap();
        let duplicate = create_event(&mut conn, "Spring Fest", date(2026, 5, 2));
        assert!(matches!(
            duplicate,
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _
            ))
        ));
    }

    #[test]
    fn test_upcoming_events_filters_sorts_and_limits() {
        let mut conn = connection();
        create_event(&mut conn, "Past Gala", date(2026, 1, 10)).unwrap();
        create_event(&mut conn, "Summer Bash", date(2026, 7, 4)).unwrap();
        create_event(&mut conn, "Spring Fest", date(2026, 4, 18)).unwrap();
        create_event(&mut conn, "Autumn Fair", date(2026, 10, 1)).unwrap();
        create_event(&mut conn, "Winter Gala", date(2026, 12, 24)).unwrap();

        let today = date(2026, 3, 1);
        let upcoming = upcoming_events(&mut conn, today, 3).unwrap();
        let names: Vec<&str> = upcoming.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Spring Fest", "Summer Bash", "Autumn Fair"]);

        // An event on `today` itself still counts as upcoming.
        let upcoming = upcoming_events(&mut conn, date(2026, 7, 4), 10).unwrap();
        assert_eq!(upcoming[0].name, "Summer Bash");
    }

    #[test]
    fn test_roster_is_newest_first() {
        let mut conn = connection();
        let event = create_event(&mut conn, "Spring Fest", date(2026, 4, 18)).unwrap();
        register_participant(&mut conn, event.event_id, "Asha", "+919876543210").unwrap();
        register_participant(&mut conn, event.event_id, "Bala", "+919876543211").unwrap();
        register_participant(&mut conn, event.event_id, "Chitra", "+919876543212").unwrap();

        let roster = participants_of_event(&mut conn, event.event_id).unwrap();
        let names: Vec<&str> = roster.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Chitra", "Bala", "Asha"]);
    }

    #[test]
    fn test_eligibility_excludes_previous_winners() {
        let mut conn = connection();
        let event = create_event(&mut conn, "Spring Fest", date(2026, 4, 18)).unwrap();
        let asha = register_participant(&mut conn, event.event_id, "Asha", "+919876543210").unwrap();
        let bala = register_participant(&mut conn, event.event_id, "Bala", "+919876543211").unwrap();

        let eligible = eligible_participants(&mut conn, event.event_id).unwrap();
        assert_eq!(eligible.len(), 2);

        record_winner(&mut conn, event.event_id, asha.participant_id, "Grand Prize").unwrap();
        let eligible = eligible_participants(&mut conn, event.event_id).unwrap();
        assert_eq!(eligible, vec![bala]);
    }

    #[test]
    fn test_eligibility_is_scoped_to_the_event() {
        let mut conn = connection();
        let fest = create_event(&mut conn, "Spring Fest", date(2026, 4, 18)).unwrap();
        let gala = create_event(&mut conn, "Winter Gala", date(2026, 12, 24)).unwrap();
        let asha = register_participant(&mut conn, fest.event_id, "Asha", "+919876543210").unwrap();
        register_participant(&mut conn, gala.event_id, "Bala", "+919876543211").unwrap();

        // Winning in one event does not affect eligibility in another.
        record_winner(&mut conn, fest.event_id, asha.participant_id, "Grand Prize").unwrap();
        assert!(eligible_participants(&mut conn, fest.event_id)
            .unwrap()
            .is_empty());
        assert_eq!(
            eligible_participants(&mut conn, gala.event_id).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_eligibility_for_unknown_event_is_empty() {
        let mut conn = connection();
        assert!(eligible_participants(&mut conn, 42).unwrap().is_empty());
    }

    #[test]
    fn test_prize_already_awarded() {
        let mut conn = connection();
        let event = create_event(&mut conn, "Spring Fest", date(2026, 4, 18)).unwrap();
        let asha = register_participant(&mut conn, event.event_id, "Asha", "+919876543210").unwrap();

        assert!(!prize_already_awarded(&mut conn, event.event_id, "Grand Prize").unwrap());
        record_winner(&mut conn, event.event_id, asha.participant_id, "Grand Prize").unwrap();
        assert!(prize_already_awarded(&mut conn, event.event_id, "Grand Prize").unwrap());
        // Scoped per event and per prize.
        assert!(!prize_already_awarded(&mut conn, event.event_id, "Second Prize").unwrap());
        assert!(!prize_already_awarded(&mut conn, 999, "Grand Prize").unwrap());
    }

    #[test]
    fn test_winner_uniqueness_is_enforced_by_the_schema() {
        let mut conn = connection();
        let event = create_event(&mut conn, "Spring Fest", date(2026, 4, 18)).unwrap();
        let asha = register_participant(&mut conn, event.event_id, "Asha", "+919876543210").unwrap();
        let bala = register_participant(&mut conn, event.event_id, "Bala", "+919876543211").unwrap();
        record_winner(&mut conn, event.event_id, asha.participant_id, "Grand Prize").unwrap();

        // Same prize, different participant.
        let same_prize = record_winner(&mut conn, event.event_id, bala.participant_id, "Grand Prize");
        assert!(matches!(
            same_prize,
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _
            ))
        ));

        // Same participant, different prize.
        let same_participant =
            record_winner(&mut conn, event.event_id, asha.participant_id, "Second Prize");
        assert!(matches!(
            same_participant,
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _
            ))
        ));

        assert_eq!(winners_of_event(&mut conn, event.event_id).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_event_cascades() {
        let mut conn = connection();
        let event = create_event(&mut conn, "Spring Fest", date(2026, 4, 18)).unwrap();
        let asha = register_participant(&mut conn, event.event_id, "Asha", "+919876543210").unwrap();
        register_participant(&mut conn, event.event_id, "Bala", "+919876543211").unwrap();
        record_winner(&mut conn, event.event_id, asha.participant_id, "Grand Prize").unwrap();

        assert_eq!(delete_event(&mut conn, event.event_id).unwrap(), 1);
        assert_eq!(find_event(&mut conn, event.event_id).unwrap(), None);
        assert!(participants_of_event(&mut conn, event.event_id)
            .unwrap()
            .is_empty());
        assert!(winners_of_event(&mut conn, event.event_id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_event_removes_nothing() {
        let mut conn = connection();
        assert_eq!(delete_event(&mut conn, 42).unwrap(), 0);
    }

    #[test]
    fn test_delete_participant_cascades_winner_rows() {
        let mut conn = connection();
        let event = create_event(&mut conn, "Spring Fest", date(2026, 4, 18)).unwrap();
        let asha = register_participant(&mut conn, event.event_id, "Asha", "+919876543210").unwrap();
        record_winner(&mut conn, event.event_id, asha.participant_id, "Grand Prize").unwrap();

        assert_eq!(delete_participant(&mut conn, asha.participant_id).unwrap(), 1);
        assert!(participants_of_event(&mut conn, event.event_id)
            .unwrap()
            .is_empty());
        assert!(winners_of_event(&mut conn, event.event_id).unwrap().is_empty());
        // The prize is drawable again once its winner record is gone.
        assert!(!prize_already_awarded(&mut conn, event.event_id, "Grand Prize").unwrap());
    }

    #[test]
    fn test_winner_history_joins_event_and_participant() {
        let mut conn = connection();
        let event = create_event(&mut conn, "Spring Fest", date(2026, 4, 18)).unwrap();
        let asha = register_participant(&mut conn, event.event_id, "Asha", "+919876543210").unwrap();
        let bala = register_participant(&mut conn, event.event_id, "Bala", "+919876543211").unwrap();
        record_winner(&mut conn, event.event_id, asha.participant_id, "Grand Prize").unwrap();
        record_winner(&mut conn, event.event_id, bala.participant_id, "Second Prize").unwrap();

        let history = winner_history(&mut conn).unwrap();
        assert_eq!(history.len(), 2);
        // Newest draw first.
        assert_eq!(history[0].prize_name, "Second Prize");
        assert_eq!(history[0].winner_name, "Bala");
        assert_eq!(history[0].event_name, "Spring Fest");
        assert_eq!(history[1].prize_name, "Grand Prize");
        assert_eq!(history[1].contact_info, "+919876543210");
    }
}
