diesel::table! {
    users (user_id) {
        user_id -> Uuid,
        email -> Text,
        password_hash -> Text,
        push_subscription -> Nullable<Text>,
    }
}

diesel::table! {
    events (event_id) {
        event_id -> Uuid,
        user_id -> Uuid,
        title -> Text,
        start_time -> Timestamptz,
    }
}

diesel::joinable!(events -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(events, users);
