pub mod debounce;
pub mod filter;
pub mod record;
pub mod timer;
pub mod visibility;
pub mod widget;

pub use record::{Reply, SearchRecord, Topic};
pub use timer::{TimerKind, TimerToken};
pub use visibility::{DismissReason, Region, Visibility};
pub use widget::{Effect, Event, SearchState, SearchWidget, WidgetConfig};
