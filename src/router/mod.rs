// Client-side Router
//
// Location parsing, the route table, the browser seams and the navigator
// that ties them to the page pipeline.

pub mod navigator;
pub mod route;
pub mod session;
pub mod table;

pub use navigator::{Anchor, AppState, Navigator, PageMarker};
pub use route::Route;
pub use session::{BufferSink, ContentSink, History, LocalStore, MemoryStore, SessionHistory};
pub use table::{resolve_route, Page};
