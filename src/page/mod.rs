//! Watch-page capture: context extraction from saved HTML and
//! navigation observation for the single-page UI.

pub mod extract;
pub mod observer;

pub use extract::{extract_video_context, fetch_video_context};
pub use observer::{NavigationEvent, PageObserver};
