table! {
    blog_posts (id) {
        id -> Int8,
        title -> Varchar,
        body -> Text,
        posted_by -> Varchar,
        year -> Int4,
        created_at -> Nullable<Timestamptz>,
    }
}

table! {
    bowls (id) {
        id -> Int8,
        name -> Varchar,
        city -> Varchar,
        state -> Varchar,
        stadium_name -> Varchar,
    }
}

table! {
    entries (id) {
        id -> Int8,
        user_id -> Int8,
        name -> Varchar,
        email -> Varchar,
        year -> Int4,
        tiebreaker_1 -> Nullable<Int8>,
        tiebreaker_2 -> Nullable<Int4>,
        paid -> Bool,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

table! {
    game_results (game_id) {
        game_id -> Int8,
        score_1 -> Int4,
        score_2 -> Int4,
        winning_school_id -> Nullable<Int8>,
        losing_school_id -> Nullable<Int8>,
        updated_at -> Nullable<Timestamptz>,
    }
}

table! {
    games (id) {
        id -> Int8,
        year -> Int4,
        bowl_id -> Int8,
        school_1_id -> Int8,
        school_2_id -> Int8,
        game_time -> Timestamptz,
        is_playoff -> Bool,
        is_championship -> Bool,
    }
}

table! {
    picks (id) {
        id -> Int8,
        entry_id -> Int8,
        game_id -> Int8,
        picked_school_id -> Nullable<Int8>,
        team_1 -> Bool,
        team_2 -> Bool,
        points -> Int2,
    }
}

table! {
    playoff_picks (entry_id) {
        entry_id -> Int8,
        year -> Int4,
        school_1_id -> Int8,
        school_2_id -> Int8,
        champion_school_id -> Int8,
    }
}

table! {
    playoff_results (year) {
        year -> Int4,
        school_1_id -> Int8,
        school_2_id -> Int8,
        champion_school_id -> Int8,
    }
}

table! {
    playoff_schools (id) {
        id -> Int8,
        year -> Int4,
        school_id -> Int8,
        seed_number -> Int2,
    }
}

table! {
    schools (id) {
        id -> Int8,
        name -> Varchar,
        logo_id -> Nullable<Varchar>,
    }
}

table! {
    users (id) {
        id -> Int8,
        username -> Varchar,
        password -> Varchar,
        is_admin -> Bool,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}

joinable!(entries -> users (user_id));
joinable!(game_results -> games (game_id));
joinable!(games -> bowls (bowl_id));
joinable!(picks -> entries (entry_id));
joinable!(picks -> games (game_id));
joinable!(playoff_picks -> entries (entry_id));
joinable!(playoff_schools -> schools (school_id));

allow_tables_to_appear_in_same_query!(
    blog_posts,
    bowls,
    entries,
    game_results,
    games,
    picks,
    playoff_picks,
    playoff_results,
    playoff_schools,
    schools,
    users,
);
