pub mod dispatch;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatch::{DispatchTaskFailure, DispatchTaskUseCase};
