use strum::{Display, IntoStaticStr};

/// Emulator connection status as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, IntoStaticStr)]
pub enum ConnectionStatus {
    #[default]
    #[strum(to_string = "Dolphin connection has not been initiated.")]
    NotStarted,
    #[strum(to_string = "Dolphin connected successfully.")]
    Connected,
    #[strum(
        to_string = "Dolphin connection was lost. Please restart your emulator and make sure Kirby Air Ride is running. Trying again in 5 seconds..."
    )]
    Lost,
    #[strum(
        to_string = "Dolphin failed to connect. Please load an ISO for Kirby Air Ride. Trying again in 5 seconds..."
    )]
    RefusedWrongGame,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}
