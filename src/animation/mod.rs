//! Second-order animation: the dynamics filter and the frame loop that
//! drives it.

mod driver;
mod dynamics;
mod frame;

pub use driver::AnimationDriver;
pub use dynamics::{SecondOrderDynamics, DEFAULT_RESPONSE, MAX_SUBSTEPS};
pub use frame::{Clock, FrameId, FrameRequests, FrameScheduler, SystemClock};
