use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::Serialize;

use super::schema::{events, participants, winners};

#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub event_id: i32,
    pub name: String,
    pub event_date: NaiveDate,
}

#[derive(Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent<'a> {
    pub name: &'a str,
    pub event_date: NaiveDate,
}

#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct Participant {
    pub participant_id: i32,
    pub event_id: i32,
    pub name: String,
    pub contact_info: String,
    pub registration_time: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = participants)]
pub struct NewParticipant<'a> {
    pub event_id: i32,
    pub name: &'a str,
    pub contact_info: &'a str,
}

#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct Winner {
    pub winner_id: i32,
    pub event_id: i32,
    pub participant_id: i32,
    pub prize_name: String,
    pub draw_time: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = winners)]
pub struct NewWinner<'a> {
    pub event_id: i32,
    pub participant_id: i32,
    pub prize_name: &'a str,
}

/// One row of the winner history page: winner joined to its event and
/// participant.
#[derive(Queryable, Serialize, Debug, Clone)]
pub struct WinnerDetail {
    pub prize_name: String,
    pub draw_time: NaiveDateTime,
    pub event_name: String,
    pub winner_name: String,
    pub contact_info: String,
}
