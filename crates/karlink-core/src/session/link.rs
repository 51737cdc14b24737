use crate::error::Result;

/// Outbound half of a multiworld session
pub trait SessionLink {
    /// Report checked locations. Reporting an id twice is harmless.
    fn report_locations(&mut self, locations: &[i64]) -> Result<()>;

    /// Tell the session the goal is complete
    fn send_goal(&mut self) -> Result<()>;

    /// Broadcast a death notice to death-link peers
    fn send_death(&mut self, message: &str) -> Result<()>;
}

impl<S: SessionLink + ?Sized> SessionLink for Box<S> {
    fn report_locations(&mut self, locations: &[i64]) -> Result<()> {
        (**self).report_locations(locations)
    }

    fn send_goal(&mut self) -> Result<()> {
        (**self).send_goal()
    }

    fn send_death(&mut self, message: &str) -> Result<()> {
        (**self).send_death(message)
    }
}
