mod api;
mod server;

pub use api::ApiClient;
pub use server::SERVER_HTTP_URL;
