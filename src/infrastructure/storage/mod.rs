pub mod episode_index;

pub use episode_index::{latest_episode, next_episode};
