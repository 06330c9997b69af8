table! {
    appointments (aid) {
        aid -> Unsigned<Bigint>,
        pid -> Char,
        sid -> Unsigned<Bigint>,
        client_id -> Char,
        date -> Date,
        start_time -> Time,
        status -> Char,
        notes -> Nullable<Varchar>,
        created_at -> Datetime,
    }
}

table! {
    blocked_dates (date) {
        date -> Date,
        is_holiday -> Bool,
        reason -> Varchar,
    }
}

table! {
    professional_availability (pid, weekday) {
        pid -> Char,
        weekday -> Integer,
        is_open -> Bool,
        start_time -> Time,
        end_time -> Time,
    }
}

table! {
    professional_services (pid, sid) {
        pid -> Char,
        sid -> Unsigned<Bigint>,
    }
}

table! {
    professionals (pid) {
        pid -> Char,
        name -> Varchar,
        is_active -> Bool,
    }
}

table! {
    services (sid) {
        sid -> Unsigned<Bigint>,
        name -> Varchar,
        duration_minutes -> Integer,
    }
}

allow_tables_to_appear_in_same_query!(
    appointments,
    blocked_dates,
    professional_availability,
    professional_services,
    professionals,
    services,
);
