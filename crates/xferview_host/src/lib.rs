pub mod client;
pub mod host;
pub mod memory;

pub use client::ReqwestHttpClient;
pub use host::{
    ActivationEvent, ActivationHandler, Cell, CookieStore, DomRenderer, HostError, HttpClient,
    HttpRequest, HttpResponse, TableRow,
};
pub use memory::{InMemoryDom, StaticCookieStore, StaticHttpClient};
