pub mod subscribe;
pub mod subscribers;

pub use subscribe::subscribe;
pub use subscribers::subscribers_count;
