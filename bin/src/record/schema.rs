diesel::table! {
    events (event_id) {
        event_id -> Integer,
        name -> Text,
        event_date -> Date,
    }
}

diesel::table! {
    participants (participant_id) {
        participant_id -> Integer,
        event_id -> Integer,
        name -> Text,
        contact_info -> Text,
        registration_time -> Timestamp,
    }
}

diesel::table! {
    winners (winner_id) {
        winner_id -> Integer,
        event_id -> Integer,
        participant_id -> Integer,
        prize_name -> Text,
        draw_time -> Timestamp,
    }
}

diesel::joinable!(participants -> events (event_id));
diesel::joinable!(winners -> events (event_id));
diesel::joinable!(winners -> participants (participant_id));

diesel::allow_tables_to_appear_in_same_query!(events, participants, winners);
