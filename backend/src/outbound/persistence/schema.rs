//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation; regenerate with `diesel print-schema` after a migration
//! changes the schema.

diesel::table! {
    /// Registered accounts plus placeholder rows for anonymous like actors.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Account name shown as the publisher of a post.
        username -> Varchar,
        /// Login identifier, unique across the table.
        email -> Varchar,
        /// Argon2id PHC string; empty for placeholder visitor rows.
        password_hash -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blog posts, immutable after creation.
    posts (id) {
        id -> Uuid,
        title -> Varchar,
        content -> Text,
        /// Author account; every post has one.
        author_id -> Uuid,
        /// Relative reference under the `/uploads` static prefix.
        image_path -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Like facts. The composite primary key enforces at most one like per
    /// (post, actor) pair at the storage layer; counts are derived from
    /// these rows and never cached.
    likes (post_id, user_id) {
        post_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(likes -> posts (post_id));
diesel::joinable!(likes -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, posts, likes);
