//! Services running on top of the repositories

pub mod overdue;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub overdue: overdue::OverdueService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            overdue: overdue::OverdueService::new(repository),
        }
    }
}
