// Adapters layer: concrete implementations for external systems (http, markup).

pub mod http;
pub mod markup;

pub use http::ReqwestFetcher;
pub use markup::CalendarMarkup;
