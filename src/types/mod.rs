//! Value types for controller state and commands.

mod channels;
mod controller_type;
mod mode;
mod power;
mod speed;

pub use channels::{ChannelLevels, level_to_percent, percent_to_level};
pub use controller_type::ControllerType;
pub use mode::{EffectMode, FunctionalMode};
pub use power::PowerState;
pub use speed::Speed;
