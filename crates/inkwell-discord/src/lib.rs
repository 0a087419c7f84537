pub mod allow;
pub mod commands;
pub mod error;
pub mod extract;
pub mod followup;
pub mod interaction;
pub mod response;
pub mod verify;

pub use error::{DiscordError, VerifyError};
pub use followup::{DiscordFollowUp, FollowUpSender};
pub use interaction::{Interaction, InteractionContext, InteractionData, InteractionType};
pub use response::InteractionResponse;
pub use verify::SignatureVerifier;
