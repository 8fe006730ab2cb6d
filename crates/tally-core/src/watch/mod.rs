//! Watched posts - posts subscribed for reaction events until their expiry

mod watch_list;

pub use watch_list::{end_of_hour, WatchList, WatchedPost};
