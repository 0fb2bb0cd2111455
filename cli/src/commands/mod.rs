pub(crate) mod batch_compile;
pub(crate) mod compile;
pub(crate) mod info;
mod path_helpers;

pub(crate) use batch_compile::command_batch_compile;
pub(crate) use compile::command_compile;
pub(crate) use info::command_info;
