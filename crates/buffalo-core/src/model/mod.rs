pub mod status;
pub mod work;

pub use status::WorkStatus;
pub use work::Work;
