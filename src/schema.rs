diesel::table! {
    reports (id) {
        id -> Integer,
        problem -> Nullable<Text>,
        explanation -> Nullable<Text>,
        location -> Nullable<Text>,
        attachment -> Nullable<Text>,
        submitted_at -> Text,
    }
}
