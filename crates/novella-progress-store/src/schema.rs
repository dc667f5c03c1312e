//! Progress store database schema.

/// SQL to create the player progress table.
pub const CREATE_PLAYER_PROGRESS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS player_progress (
    player_id           UUID PRIMARY KEY,
    chapters_completed  INTEGER NOT NULL DEFAULT 0 CHECK (chapters_completed >= 0),
    chapters_unlocked   INTEGER NOT NULL DEFAULT 1 CHECK (chapters_unlocked >= 1),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";
