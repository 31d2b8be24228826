mod poller;
mod scheduler;
mod watermark;

pub use poller::NotificationPoller;
pub use scheduler::NotificationListener;
