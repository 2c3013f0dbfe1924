pub use self::{bird::*, pipe::*, rect::*};

pub(crate) mod bird;
pub(crate) mod pipe;
pub(crate) mod rect;
