pub use self::{
    block::*, block_type::*, board::*, config::*, event::*, grid_position::*, input::*, motion::*,
};

pub(crate) mod block;
pub(crate) mod block_type;
pub(crate) mod board;
pub(crate) mod config;
pub(crate) mod event;
pub(crate) mod grid_position;
pub(crate) mod input;
pub(crate) mod motion;
