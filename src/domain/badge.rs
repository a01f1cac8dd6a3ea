//! Badge catalog entry

/// Static achievement badge. Linked to users (earned) and to campaigns
/// (targeting); carries no behavior of its own.
#[derive(Debug, Clone)]
pub struct Badge {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: String,
}

/// Fields for creating a new badge
#[derive(Debug, Clone)]
pub struct NewBadge {
    pub name: String,
    pub description: String,
    pub icon: String,
}
