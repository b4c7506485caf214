// Mirrors the tables created by the SQL files in `migrations/`.

diesel::table! {
    accounts (id) {
        id -> Int4,
        username -> Text,
        email -> Text,
        password_hash -> Text,
        verify_code -> Nullable<Text>,
        verify_code_expires_at -> Nullable<Timestamp>,
        is_verified -> Bool,
        is_accepting_messages -> Bool,
        inserted_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    messages (id) {
        id -> Int4,
        account_id -> Int4,
        content -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    sessions (id) {
        id -> Int4,
        account_id -> Int4,
        token_hash -> Text,
        expires_at -> Timestamp,
        inserted_at -> Timestamp,
    }
}

diesel::joinable!(messages -> accounts (account_id));
diesel::joinable!(sessions -> accounts (account_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, messages, sessions,);
