pub mod display;
pub mod game;

pub use display::{DisplayChannel, DisplayChannelReceiver, DisplayChannelSender, display_task};
pub use game::{Controls, game_task};
