pub mod model;

pub use model::{ImageSize, NewPoll, Poll, PollOption, PollPatch};
