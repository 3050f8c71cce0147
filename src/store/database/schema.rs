// Hand-maintained: none of the rover tables declares a primary key, so each
// table is keyed on SQLite's implicit `rowid`.

diesel::table! {
    storage (rowid) {
        rowid -> BigInt,
        thing_id -> Nullable<Text>,
        bot_module -> Nullable<BigInt>,
        timestamp -> Nullable<Timestamp>,
    }
}

diesel::table! {
    update_threads (rowid) {
        rowid -> BigInt,
        thing_id -> Text,
        bot_module -> Nullable<BigInt>,
        created -> Nullable<Timestamp>,
        lifetime -> Nullable<Timestamp>,
        last_updated -> Nullable<Timestamp>,
        interval -> Nullable<Integer>,
    }
}

diesel::table! {
    modules (rowid) {
        rowid -> BigInt,
        module_name -> Nullable<Text>,
    }
}

diesel::table! {
    userbans (rowid) {
        rowid -> BigInt,
        username -> Text,
        bot_module -> Nullable<BigInt>,
    }
}

diesel::table! {
    subbans (rowid) {
        rowid -> BigInt,
        subreddit -> Text,
        bot_module -> Nullable<BigInt>,
    }
}

diesel::table! {
    stats (rowid) {
        rowid -> BigInt,
        id -> Text,
        bot_module -> Nullable<BigInt>,
        created -> Nullable<Timestamp>,
        title -> Nullable<Text>,
        username -> Nullable<Text>,
        permalink -> Nullable<Text>,
        subreddit -> Nullable<Text>,
        upvotes_author -> Nullable<Integer>,
        upvotes_bot -> Nullable<Integer>,
    }
}

diesel::table! {
    messages (rowid) {
        rowid -> BigInt,
        id -> Text,
        bot_module -> Nullable<BigInt>,
        created -> Nullable<Timestamp>,
        title -> Nullable<Text>,
        author -> Nullable<Text>,
        body -> Nullable<Text>,
    }
}

diesel::table! {
    meta_stats (rowid) {
        rowid -> BigInt,
        day -> Date,
        seen_submissions -> Nullable<Integer>,
        seen_comments -> Nullable<Integer>,
        update_cycles -> Nullable<Integer>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    messages,
    meta_stats,
    modules,
    stats,
    storage,
    subbans,
    update_threads,
    userbans,
);
